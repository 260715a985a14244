//! Create student payment table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StudentPayment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentPayment::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StudentPayment::StudentId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentPayment::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentPayment::Month)
                            .string_len(7)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentPayment::Method)
                            .string_len(16)
                            .not_null()
                            .default("CASH"),
                    )
                    .col(
                        ColumnDef::new(StudentPayment::RecordedBy)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentPayment::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_payment_student")
                            .from(StudentPayment::Table, StudentPayment::StudentId)
                            .to(Student::Table, Student::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: student_id (related-record counts and listing)
        manager
            .create_index(
                Index::create()
                    .name("idx_student_payment_student_id")
                    .table(StudentPayment::Table)
                    .col(StudentPayment::StudentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StudentPayment::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum StudentPayment {
    Table,
    Id,
    StudentId,
    Amount,
    Month,
    Method,
    RecordedBy,
    CreatedAt,
}

#[derive(Iden)]
enum Student {
    Table,
    Id,
}

//! Create teacher payment table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TeacherPayment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TeacherPayment::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TeacherPayment::TeacherId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeacherPayment::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeacherPayment::Month)
                            .string_len(7)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeacherPayment::RecordedBy)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeacherPayment::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_teacher_payment_teacher")
                            .from(TeacherPayment::Table, TeacherPayment::TeacherId)
                            .to(Teacher::Table, Teacher::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: teacher_id (related-record counts and listing)
        manager
            .create_index(
                Index::create()
                    .name("idx_teacher_payment_teacher_id")
                    .table(TeacherPayment::Table)
                    .col(TeacherPayment::TeacherId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TeacherPayment::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum TeacherPayment {
    Table,
    Id,
    TeacherId,
    Amount,
    Month,
    RecordedBy,
    CreatedAt,
}

#[derive(Iden)]
enum Teacher {
    Table,
    Id,
}

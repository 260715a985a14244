//! Create student table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Student::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Student::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Student::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Student::GuardianName).string_len(256))
                    .col(ColumnDef::new(Student::GuardianPhone).string_len(32))
                    .col(ColumnDef::new(Student::Level).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Student::EnrolledAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    // Deletion envelope
                    .col(
                        ColumnDef::new(Student::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Student::DeletedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Student::DeletedBy).string_len(32))
                    .col(ColumnDef::new(Student::DeleteReason).string_len(32))
                    .col(
                        ColumnDef::new(Student::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Student::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index: is_deleted (active-student queries always filter on it)
        manager
            .create_index(
                Index::create()
                    .name("idx_student_is_deleted")
                    .table(Student::Table)
                    .col(Student::IsDeleted)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Student::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Student {
    Table,
    Id,
    Name,
    GuardianName,
    GuardianPhone,
    Level,
    EnrolledAt,
    IsDeleted,
    DeletedAt,
    DeletedBy,
    DeleteReason,
    CreatedAt,
    UpdatedAt,
}

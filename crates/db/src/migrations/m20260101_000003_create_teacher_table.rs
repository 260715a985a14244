//! Create teacher table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Teacher::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Teacher::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Teacher::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Teacher::Phone).string_len(32))
                    .col(ColumnDef::new(Teacher::Subject).string_len(128).not_null())
                    .col(
                        ColumnDef::new(Teacher::MonthlySalary)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Teacher::HiredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    // Deletion envelope
                    .col(
                        ColumnDef::new(Teacher::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Teacher::DeletedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Teacher::DeletedBy).string_len(32))
                    .col(ColumnDef::new(Teacher::DeleteReason).string_len(32))
                    .col(
                        ColumnDef::new(Teacher::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Teacher::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index: is_deleted (active-teacher queries always filter on it)
        manager
            .create_index(
                Index::create()
                    .name("idx_teacher_is_deleted")
                    .table(Teacher::Table)
                    .col(Teacher::IsDeleted)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Teacher::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Teacher {
    Table,
    Id,
    Name,
    Phone,
    Subject,
    MonthlySalary,
    HiredAt,
    IsDeleted,
    DeletedAt,
    DeletedBy,
    DeleteReason,
    CreatedAt,
    UpdatedAt,
}

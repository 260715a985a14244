//! Create class section table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ClassSection::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClassSection::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ClassSection::Name).string_len(256).not_null())
                    .col(
                        ColumnDef::new(ClassSection::Subject)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClassSection::Level).string_len(64).not_null())
                    // Nullable: a section can be unassigned while awaiting
                    // a replacement teacher.
                    .col(ColumnDef::new(ClassSection::TeacherId).string_len(32))
                    .col(ColumnDef::new(ClassSection::Schedule).string_len(256))
                    .col(
                        ColumnDef::new(ClassSection::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_class_section_teacher")
                            .from(ClassSection::Table, ClassSection::TeacherId)
                            .to(Teacher::Table, Teacher::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: teacher_id (related-record counts and reassignment)
        manager
            .create_index(
                Index::create()
                    .name("idx_class_section_teacher_id")
                    .table(ClassSection::Table)
                    .col(ClassSection::TeacherId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ClassSection::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ClassSection {
    Table,
    Id,
    Name,
    Subject,
    Level,
    TeacherId,
    Schedule,
    CreatedAt,
}

#[derive(Iden)]
enum Teacher {
    Table,
    Id,
}

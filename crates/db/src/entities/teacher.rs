//! Teacher entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Reason a teacher record was archived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[derive(Default)]
pub enum TeacherDeleteReason {
    #[sea_orm(string_value = "RESIGNED")]
    Resigned,
    #[sea_orm(string_value = "TERMINATED")]
    Terminated,
    #[sea_orm(string_value = "REASSIGNED")]
    Reassigned,
    #[sea_orm(string_value = "ERROR")]
    Error,
    #[sea_orm(string_value = "OTHER")]
    #[default]
    Other,
}

/// Teacher model, carrying the same deletion envelope as [`super::student`].
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "teacher")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    #[sea_orm(nullable)]
    pub phone: Option<String>,

    pub subject: String,

    /// Monthly salary in the smallest currency unit.
    pub monthly_salary: i64,

    pub hired_at: DateTimeWithTimeZone,

    // === Deletion envelope ===
    #[sea_orm(default_value = false)]
    pub is_deleted: bool,

    #[sea_orm(nullable)]
    pub deleted_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(nullable)]
    pub deleted_by: Option<String>,

    #[sea_orm(nullable)]
    pub delete_reason: Option<TeacherDeleteReason>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::class_section::Entity")]
    ClassSections,

    #[sea_orm(has_many = "super::teacher_payment::Entity")]
    Payments,
}

impl Related<super::class_section::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassSections.def()
    }
}

impl Related<super::teacher_payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

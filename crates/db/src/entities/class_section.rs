//! Class section entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A class section (a scheduled group of students for one subject/level).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "class_section")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    pub subject: String,

    pub level: String,

    /// Assigned teacher. Nullable so a section can exist unassigned
    /// (after teacher removal, before reassignment).
    #[sea_orm(nullable)]
    pub teacher_id: Option<String>,

    /// Free-form schedule description, e.g. "Mon/Wed 16:00".
    #[sea_orm(nullable)]
    pub schedule: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teacher::Entity",
        from = "Column::TeacherId",
        to = "super::teacher::Column::Id"
    )]
    Teacher,

    #[sea_orm(has_many = "super::enrollment::Entity")]
    Enrollments,

    #[sea_orm(has_many = "super::attendance::Entity")]
    Attendances,
}

impl Related<super::teacher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl Related<super::attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Enrollment entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// How an enrollment row came to exist.
///
/// Auto-generated rows are derivable (e.g. created when a student joins a
/// level) and tagged explicitly so that cascade cleanup and restore can
/// tell them apart from manually entered ones after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[derive(Default)]
pub enum EnrollmentSource {
    #[sea_orm(string_value = "MANUAL")]
    #[default]
    Manual,
    #[sea_orm(string_value = "AUTO")]
    Auto,
}

/// Enrollment of a student in a class section.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "enrollment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub student_id: String,

    pub section_id: String,

    pub source: EnrollmentSource,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id"
    )]
    Student,

    #[sea_orm(
        belongs_to = "super::class_section::Entity",
        from = "Column::SectionId",
        to = "super::class_section::Column::Id"
    )]
    Section,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::class_section::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Section.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

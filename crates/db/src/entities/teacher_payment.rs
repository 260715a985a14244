//! Teacher salary payment entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Salary payment made to a teacher.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "teacher_payment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub teacher_id: String,

    /// Amount in the smallest currency unit.
    pub amount: i64,

    /// Salary month, `YYYY-MM`.
    pub month: String,

    /// Staff user who recorded the payment.
    pub recorded_by: String,

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
}

impl Related<super::teacher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Generic soft-delete primitives.
//!
//! Student and Teacher carry the same deletion envelope (`is_deleted`,
//! `deleted_at`, `deleted_by`, `delete_reason`). The [`SoftDeletable`]
//! trait exposes the envelope columns of an entity so the three mutations
//! (archive, restore, purge) are written once.
//!
//! Every mutation here is a single conditional statement: the
//! already-deleted / not-deleted precondition is part of the `WHERE`
//! clause, so the check is atomic with the write. Callers inspect the
//! affected-row count; zero rows after a passing precheck means another
//! request won the race, which callers report as the corresponding
//! already-in-state failure.

use institute_common::{AppError, AppResult};
use sea_orm::{
    ActiveEnum, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    entity::prelude::DateTimeWithTimeZone, sea_query::Expr,
};

/// An entity carrying the deletion envelope.
pub trait SoftDeletable: EntityTrait {
    /// The closed set of archival reasons for this entity type.
    type Reason: ActiveEnum + Default + Send;

    /// Primary key column.
    fn id_column() -> Self::Column;
    /// `is_deleted` flag column.
    fn is_deleted_column() -> Self::Column;
    /// `deleted_at` timestamp column.
    fn deleted_at_column() -> Self::Column;
    /// `deleted_by` actor column.
    fn deleted_by_column() -> Self::Column;
    /// `delete_reason` column.
    fn delete_reason_column() -> Self::Column;
}

impl SoftDeletable for crate::entities::student::Entity {
    type Reason = crate::entities::student::StudentDeleteReason;

    fn id_column() -> Self::Column {
        crate::entities::student::Column::Id
    }
    fn is_deleted_column() -> Self::Column {
        crate::entities::student::Column::IsDeleted
    }
    fn deleted_at_column() -> Self::Column {
        crate::entities::student::Column::DeletedAt
    }
    fn deleted_by_column() -> Self::Column {
        crate::entities::student::Column::DeletedBy
    }
    fn delete_reason_column() -> Self::Column {
        crate::entities::student::Column::DeleteReason
    }
}

impl SoftDeletable for crate::entities::teacher::Entity {
    type Reason = crate::entities::teacher::TeacherDeleteReason;

    fn id_column() -> Self::Column {
        crate::entities::teacher::Column::Id
    }
    fn is_deleted_column() -> Self::Column {
        crate::entities::teacher::Column::IsDeleted
    }
    fn deleted_at_column() -> Self::Column {
        crate::entities::teacher::Column::DeletedAt
    }
    fn deleted_by_column() -> Self::Column {
        crate::entities::teacher::Column::DeletedBy
    }
    fn delete_reason_column() -> Self::Column {
        crate::entities::teacher::Column::DeleteReason
    }
}

/// Stamp the deletion envelope on an active row.
///
/// Returns the number of rows affected: 1 on success, 0 when the row is
/// missing or already deleted.
pub async fn mark_deleted<E, C>(
    conn: &C,
    id: &str,
    reason: E::Reason,
    deleted_by: &str,
) -> AppResult<u64>
where
    E: SoftDeletable,
    C: ConnectionTrait,
{
    let reason_value: sea_orm::Value = reason.to_value().into();
    let result = E::update_many()
        .col_expr(E::is_deleted_column(), Expr::value(true))
        .col_expr(
            E::deleted_at_column(),
            Expr::value(chrono::Utc::now().fixed_offset()),
        )
        .col_expr(E::deleted_by_column(), Expr::value(deleted_by))
        .col_expr(E::delete_reason_column(), Expr::value(reason_value))
        .filter(E::id_column().eq(id))
        .filter(E::is_deleted_column().eq(false))
        .exec(conn)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(result.rows_affected)
}

/// Clear the deletion envelope of an archived row.
///
/// Returns the number of rows affected: 1 on success, 0 when the row is
/// missing or not currently deleted.
pub async fn clear_deletion<E, C>(conn: &C, id: &str) -> AppResult<u64>
where
    E: SoftDeletable,
    C: ConnectionTrait,
{
    let result = E::update_many()
        .col_expr(E::is_deleted_column(), Expr::value(false))
        .col_expr(
            E::deleted_at_column(),
            Expr::value(Option::<DateTimeWithTimeZone>::None),
        )
        .col_expr(E::deleted_by_column(), Expr::value(Option::<String>::None))
        .col_expr(
            E::delete_reason_column(),
            Expr::value(Option::<String>::None),
        )
        .filter(E::id_column().eq(id))
        .filter(E::is_deleted_column().eq(true))
        .exec(conn)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(result.rows_affected)
}

/// Remove a row from storage entirely. Irreversible.
///
/// With `only_if_deleted`, the statement only matches archived rows, which
/// enforces the "soft delete first" rule atomically. Cascade deletion
/// passes `false` since cascade is the explicit override.
pub async fn purge<E, C>(conn: &C, id: &str, only_if_deleted: bool) -> AppResult<u64>
where
    E: SoftDeletable,
    C: ConnectionTrait,
{
    let mut query = E::delete_many().filter(E::id_column().eq(id));
    if only_if_deleted {
        query = query.filter(E::is_deleted_column().eq(true));
    }

    let result = query
        .exec(conn)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(result.rows_affected)
}

//! Progressive deletion rule engine.
//!
//! Students and teachers share one deletion workflow: inspect dependents,
//! archive (soft delete), restore, permanently delete, or cascade. The
//! workflow is written once in [`DeletionService`], parameterized by a
//! [`DeletionTarget`] descriptor that supplies the entity label, the
//! allowed delete-reason enum and the storage primitives.
//!
//! Preconditions are checked in order and each failure is distinct:
//! missing row, already-in-state, blocked by dependents, forbidden. All
//! validation happens before any mutation; the mutating primitives are
//! conditional updates, so a zero-row result after a passing precheck
//! means another request won the race and is reported as the
//! corresponding already-in-state failure rather than a server error.

use async_trait::async_trait;
use institute_common::{AppError, AppResult, RelatedRecords};
use institute_db::repositories::CascadeOutcome;

use super::audit::{self, AuditPhase};

/// Authenticated caller identity, passed explicitly into every operation.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Staff user id.
    pub user_id: String,
    /// Whether the user holds the admin role.
    pub is_admin: bool,
}

/// Check that the caller may perform deletion operations.
///
/// Archival, restore, permanent deletion and reassignment are all
/// admin-only.
pub fn validate_deletion_permission(ctx: &AuthContext) -> AppResult<()> {
    if ctx.is_admin {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "the admin role is required for deletion operations".to_string(),
        ))
    }
}

/// Entity descriptor consumed by [`DeletionService`].
///
/// Implementations are thin adapters over the entity's repository.
#[async_trait]
pub trait DeletionTarget: Send + Sync {
    /// Closed set of archival reasons for this entity type.
    type Reason: Default + Send + 'static;

    /// Lowercase entity label used in messages and audit events.
    fn entity_type(&self) -> &'static str;

    /// The not-found error for this entity type.
    fn not_found(&self, id: &str) -> AppError;

    /// `Some(is_deleted)` if the row exists, `None` otherwise.
    async fn deletion_state(&self, id: &str) -> AppResult<Option<bool>>;

    /// Dependent-row counts per category, every category present.
    async fn related_records(&self, id: &str) -> AppResult<RelatedRecords>;

    /// Conditionally stamp the deletion envelope (`WHERE is_deleted = false`).
    async fn mark_deleted(
        &self,
        id: &str,
        reason: Self::Reason,
        deleted_by: &str,
    ) -> AppResult<u64>;

    /// Conditionally clear the deletion envelope (`WHERE is_deleted = true`).
    async fn clear_deletion(&self, id: &str) -> AppResult<u64>;

    /// Remove an archived row (`WHERE is_deleted = true`).
    async fn purge_archived(&self, id: &str) -> AppResult<u64>;

    /// Transactionally remove dependents then the row itself.
    async fn cascade_delete(&self, id: &str) -> AppResult<CascadeOutcome>;
}

/// Deletion workflow over one entity type.
#[derive(Clone)]
pub struct DeletionService<T> {
    target: T,
}

impl<T: DeletionTarget> DeletionService<T> {
    /// Create a new deletion service over a target.
    pub const fn new(target: T) -> Self {
        Self { target }
    }

    fn label(&self, id: &str) -> String {
        format!("{} {id}", self.target.entity_type())
    }

    /// Emit the error-phase audit event and hand the error back.
    fn fail(&self, id: &str, action: &str, actor: &str, err: AppError) -> AppError {
        audit::record(
            self.target.entity_type(),
            id,
            action,
            AuditPhase::Error,
            actor,
            Some(&err.to_string()),
        );
        err
    }

    /// Dependent-record breakdown for an existing entity.
    pub async fn related_records(&self, id: &str) -> AppResult<RelatedRecords> {
        if self.target.deletion_state(id).await?.is_none() {
            return Err(self.target.not_found(id));
        }
        self.target.related_records(id).await
    }

    /// Archive an active entity.
    ///
    /// Rejected when the entity is missing, already archived, or still has
    /// dependent records (the caller may retry with cascade). The reason
    /// defaults to the entity's OTHER variant.
    pub async fn soft_delete(
        &self,
        ctx: &AuthContext,
        id: &str,
        reason: Option<T::Reason>,
    ) -> AppResult<String> {
        let action = "soft_delete";
        validate_deletion_permission(ctx)
            .map_err(|e| self.fail(id, action, &ctx.user_id, e))?;

        audit::record(
            self.target.entity_type(),
            id,
            action,
            AuditPhase::Attempt,
            &ctx.user_id,
            None,
        );

        let state = self
            .target
            .deletion_state(id)
            .await
            .map_err(|e| self.fail(id, action, &ctx.user_id, e))?;
        let Some(is_deleted) = state else {
            return Err(self.fail(id, action, &ctx.user_id, self.target.not_found(id)));
        };
        if is_deleted {
            let err = AppError::AlreadyDeleted(self.label(id));
            return Err(self.fail(id, action, &ctx.user_id, err));
        }

        let related = self
            .target
            .related_records(id)
            .await
            .map_err(|e| self.fail(id, action, &ctx.user_id, e))?;
        if related.values().any(|&count| count > 0) {
            let err = AppError::BlockedByDependents {
                entity: self.label(id),
                details: related,
            };
            return Err(self.fail(id, action, &ctx.user_id, err));
        }

        let rows = self
            .target
            .mark_deleted(id, reason.unwrap_or_default(), &ctx.user_id)
            .await
            .map_err(|e| self.fail(id, action, &ctx.user_id, e))?;
        if rows == 0 {
            // Another request archived the row between check and write.
            let err = AppError::AlreadyDeleted(self.label(id));
            return Err(self.fail(id, action, &ctx.user_id, err));
        }

        audit::record(
            self.target.entity_type(),
            id,
            action,
            AuditPhase::Success,
            &ctx.user_id,
            Some("archived"),
        );
        Ok(format!("{} archived", self.label(id)))
    }

    /// Restore an archived entity.
    ///
    /// Restoring an active entity is rejected, not a no-op: the second of
    /// two racing restores fails with "not deleted", which callers treat
    /// as benign.
    pub async fn restore(&self, ctx: &AuthContext, id: &str) -> AppResult<String> {
        let action = "restore";
        validate_deletion_permission(ctx)
            .map_err(|e| self.fail(id, action, &ctx.user_id, e))?;

        audit::record(
            self.target.entity_type(),
            id,
            action,
            AuditPhase::Attempt,
            &ctx.user_id,
            None,
        );

        let state = self
            .target
            .deletion_state(id)
            .await
            .map_err(|e| self.fail(id, action, &ctx.user_id, e))?;
        let Some(is_deleted) = state else {
            return Err(self.fail(id, action, &ctx.user_id, self.target.not_found(id)));
        };
        if !is_deleted {
            let err = AppError::NotDeleted(self.label(id));
            return Err(self.fail(id, action, &ctx.user_id, err));
        }

        let rows = self
            .target
            .clear_deletion(id)
            .await
            .map_err(|e| self.fail(id, action, &ctx.user_id, e))?;
        if rows == 0 {
            let err = AppError::NotDeleted(self.label(id));
            return Err(self.fail(id, action, &ctx.user_id, err));
        }

        audit::record(
            self.target.entity_type(),
            id,
            action,
            AuditPhase::Success,
            &ctx.user_id,
            Some("restored"),
        );
        Ok(format!("{} restored", self.label(id)))
    }

    /// Permanently remove an archived entity. Irreversible.
    ///
    /// An active entity must be archived first; cascade is the explicit
    /// override and never routes through here.
    pub async fn permanent_delete(&self, ctx: &AuthContext, id: &str) -> AppResult<String> {
        let action = "permanent_delete";
        validate_deletion_permission(ctx)
            .map_err(|e| self.fail(id, action, &ctx.user_id, e))?;

        audit::record(
            self.target.entity_type(),
            id,
            action,
            AuditPhase::Attempt,
            &ctx.user_id,
            None,
        );

        let state = self
            .target
            .deletion_state(id)
            .await
            .map_err(|e| self.fail(id, action, &ctx.user_id, e))?;
        let Some(is_deleted) = state else {
            return Err(self.fail(id, action, &ctx.user_id, self.target.not_found(id)));
        };
        if !is_deleted {
            let err = AppError::BadRequest(format!(
                "{} must be archived before permanent deletion",
                self.label(id)
            ));
            return Err(self.fail(id, action, &ctx.user_id, err));
        }

        let rows = self
            .target
            .purge_archived(id)
            .await
            .map_err(|e| self.fail(id, action, &ctx.user_id, e))?;
        if rows == 0 {
            let err = AppError::NotDeleted(self.label(id));
            return Err(self.fail(id, action, &ctx.user_id, err));
        }

        audit::record(
            self.target.entity_type(),
            id,
            action,
            AuditPhase::Success,
            &ctx.user_id,
            Some("permanently deleted"),
        );
        Ok(format!("{} permanently deleted", self.label(id)))
    }

    /// Cascade-delete an entity and its dependent records.
    ///
    /// Only reached when the caller explicitly requested cascade. Runs in
    /// one transaction; the entity need not have been archived first.
    pub async fn cascade_delete(&self, ctx: &AuthContext, id: &str) -> AppResult<String> {
        let action = "cascade_delete";
        validate_deletion_permission(ctx)
            .map_err(|e| self.fail(id, action, &ctx.user_id, e))?;

        audit::record(
            self.target.entity_type(),
            id,
            action,
            AuditPhase::Attempt,
            &ctx.user_id,
            None,
        );

        let state = self
            .target
            .deletion_state(id)
            .await
            .map_err(|e| self.fail(id, action, &ctx.user_id, e))?;
        if state.is_none() {
            return Err(self.fail(id, action, &ctx.user_id, self.target.not_found(id)));
        }

        let outcome = self
            .target
            .cascade_delete(id)
            .await
            .map_err(|e| self.fail(id, action, &ctx.user_id, e))?;

        let detail = serde_json::to_string(&outcome.removed).unwrap_or_default();
        audit::record(
            self.target.entity_type(),
            id,
            action,
            AuditPhase::Success,
            &ctx.user_id,
            Some(&detail),
        );
        Ok(format!(
            "{} and related records permanently deleted",
            self.label(id)
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    enum TestReason {
        Graduated,
        #[default]
        Other,
    }

    /// In-memory target: id -> (is_deleted, dependent counts).
    struct MemoryTarget {
        rows: Mutex<HashMap<String, (bool, RelatedRecords)>>,
        last_reason: Mutex<Option<TestReason>>,
        /// When set, every write primitive fails like a lost connection.
        fail_writes: AtomicBool,
    }

    impl MemoryTarget {
        fn new() -> Self {
            Self {
                rows: Mutex::new(HashMap::new()),
                last_reason: Mutex::new(None),
                fail_writes: AtomicBool::new(false),
            }
        }

        fn check_writes(&self) -> AppResult<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(AppError::Database("connection reset".to_string()));
            }
            Ok(())
        }

        fn insert(&self, id: &str, is_deleted: bool, counts: &[(&str, u64)]) {
            let mut related = RelatedRecords::new();
            for (category, count) in counts {
                related.insert((*category).to_string(), *count);
            }
            self.rows
                .lock()
                .unwrap()
                .insert(id.to_string(), (is_deleted, related));
        }

        fn is_deleted(&self, id: &str) -> Option<bool> {
            self.rows.lock().unwrap().get(id).map(|(d, _)| *d)
        }
    }

    #[async_trait]
    impl DeletionTarget for &MemoryTarget {
        type Reason = TestReason;

        fn entity_type(&self) -> &'static str {
            "student"
        }

        fn not_found(&self, id: &str) -> AppError {
            AppError::StudentNotFound(id.to_string())
        }

        async fn deletion_state(&self, id: &str) -> AppResult<Option<bool>> {
            Ok(self.is_deleted(id))
        }

        async fn related_records(&self, id: &str) -> AppResult<RelatedRecords> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .get(id)
                .map(|(_, r)| r.clone())
                .unwrap_or_default())
        }

        async fn mark_deleted(
            &self,
            id: &str,
            reason: Self::Reason,
            _deleted_by: &str,
        ) -> AppResult<u64> {
            self.check_writes()?;
            let mut rows = self.rows.lock().unwrap();
            match rows.get_mut(id) {
                Some((is_deleted, _)) if !*is_deleted => {
                    *is_deleted = true;
                    *self.last_reason.lock().unwrap() = Some(reason);
                    Ok(1)
                }
                _ => Ok(0),
            }
        }

        async fn clear_deletion(&self, id: &str) -> AppResult<u64> {
            self.check_writes()?;
            let mut rows = self.rows.lock().unwrap();
            match rows.get_mut(id) {
                Some((is_deleted, _)) if *is_deleted => {
                    *is_deleted = false;
                    Ok(1)
                }
                _ => Ok(0),
            }
        }

        async fn purge_archived(&self, id: &str) -> AppResult<u64> {
            self.check_writes()?;
            let mut rows = self.rows.lock().unwrap();
            match rows.get(id) {
                Some((true, _)) => {
                    rows.remove(id);
                    Ok(1)
                }
                _ => Ok(0),
            }
        }

        async fn cascade_delete(&self, id: &str) -> AppResult<CascadeOutcome> {
            let mut rows = self.rows.lock().unwrap();
            let removed = rows
                .remove(id)
                .map(|(_, related)| related)
                .unwrap_or_default();
            Ok(CascadeOutcome {
                removed,
                entity_removed: true,
            })
        }
    }

    fn admin() -> AuthContext {
        AuthContext {
            user_id: "admin1".to_string(),
            is_admin: true,
        }
    }

    fn clerk() -> AuthContext {
        AuthContext {
            user_id: "clerk1".to_string(),
            is_admin: false,
        }
    }

    #[tokio::test]
    async fn test_soft_delete_archives_active_entity() {
        let target = MemoryTarget::new();
        target.insert("s1", false, &[("attendances", 0), ("enrollments", 0), ("payments", 0)]);
        let service = DeletionService::new(&target);

        let message = service
            .soft_delete(&admin(), "s1", Some(TestReason::Graduated))
            .await
            .unwrap();

        assert_eq!(message, "student s1 archived");
        assert_eq!(target.is_deleted("s1"), Some(true));
        assert_eq!(*target.last_reason.lock().unwrap(), Some(TestReason::Graduated));
    }

    #[tokio::test]
    async fn test_soft_delete_defaults_reason_to_other() {
        let target = MemoryTarget::new();
        target.insert("s1", false, &[("attendances", 0), ("enrollments", 0), ("payments", 0)]);
        let service = DeletionService::new(&target);

        service.soft_delete(&admin(), "s1", None).await.unwrap();

        assert_eq!(*target.last_reason.lock().unwrap(), Some(TestReason::Other));
    }

    #[tokio::test]
    async fn test_soft_delete_missing_entity() {
        let target = MemoryTarget::new();
        let service = DeletionService::new(&target);

        let result = service.soft_delete(&admin(), "ghost", None).await;

        assert!(matches!(result, Err(AppError::StudentNotFound(id)) if id == "ghost"));
    }

    #[tokio::test]
    async fn test_soft_delete_twice_fails_already_deleted() {
        let target = MemoryTarget::new();
        target.insert("s1", false, &[("attendances", 0), ("enrollments", 0), ("payments", 0)]);
        let service = DeletionService::new(&target);

        service.soft_delete(&admin(), "s1", None).await.unwrap();
        let second = service.soft_delete(&admin(), "s1", None).await;

        assert!(matches!(second, Err(AppError::AlreadyDeleted(_))));
        // Still archived, not corrupted.
        assert_eq!(target.is_deleted("s1"), Some(true));
    }

    #[tokio::test]
    async fn test_soft_delete_blocked_carries_exact_counts() {
        let target = MemoryTarget::new();
        target.insert("s1", false, &[("attendances", 3), ("enrollments", 2), ("payments", 0)]);
        let service = DeletionService::new(&target);

        let result = service.soft_delete(&admin(), "s1", None).await;

        match result {
            Err(AppError::BlockedByDependents { details, .. }) => {
                assert_eq!(details.get("attendances"), Some(&3));
                assert_eq!(details.get("enrollments"), Some(&2));
                assert_eq!(details.get("payments"), Some(&0));
            }
            other => panic!("expected BlockedByDependents, got {other:?}"),
        }
        // No mutation happened.
        assert_eq!(target.is_deleted("s1"), Some(false));
    }

    #[tokio::test]
    async fn test_non_admin_is_forbidden_without_mutation() {
        let target = MemoryTarget::new();
        target.insert("s1", false, &[("attendances", 0), ("enrollments", 0), ("payments", 0)]);
        let service = DeletionService::new(&target);

        let result = service.soft_delete(&clerk(), "s1", None).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
        assert_eq!(target.is_deleted("s1"), Some(false));
    }

    #[tokio::test]
    async fn test_restore_round_trip() {
        let target = MemoryTarget::new();
        target.insert("t1", true, &[]);
        let service = DeletionService::new(&target);

        let message = service.restore(&admin(), "t1").await.unwrap();

        assert_eq!(message, "student t1 restored");
        assert_eq!(target.is_deleted("t1"), Some(false));
    }

    #[tokio::test]
    async fn test_restore_active_entity_rejected() {
        let target = MemoryTarget::new();
        target.insert("s1", false, &[]);
        let service = DeletionService::new(&target);

        let result = service.restore(&admin(), "s1").await;

        assert!(matches!(result, Err(AppError::NotDeleted(_))));
    }

    #[tokio::test]
    async fn test_restore_twice_second_fails() {
        let target = MemoryTarget::new();
        target.insert("s1", true, &[]);
        let service = DeletionService::new(&target);

        service.restore(&admin(), "s1").await.unwrap();
        let second = service.restore(&admin(), "s1").await;

        assert!(matches!(second, Err(AppError::NotDeleted(_))));
    }

    #[tokio::test]
    async fn test_permanent_delete_requires_archive_first() {
        let target = MemoryTarget::new();
        target.insert("s1", false, &[]);
        let service = DeletionService::new(&target);

        let result = service.permanent_delete(&admin(), "s1").await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        // Row untouched.
        assert_eq!(target.is_deleted("s1"), Some(false));
    }

    #[tokio::test]
    async fn test_permanent_delete_archived_entity_removes_row() {
        let target = MemoryTarget::new();
        target.insert("s1", true, &[]);
        let service = DeletionService::new(&target);

        service.permanent_delete(&admin(), "s1").await.unwrap();

        assert_eq!(target.is_deleted("s1"), None);
    }

    #[tokio::test]
    async fn test_cascade_delete_removes_entity_with_dependents() {
        let target = MemoryTarget::new();
        target.insert("s1", false, &[("attendances", 3), ("enrollments", 2), ("payments", 1)]);
        let service = DeletionService::new(&target);

        let message = service.cascade_delete(&admin(), "s1").await.unwrap();

        assert_eq!(message, "student s1 and related records permanently deleted");
        assert_eq!(target.is_deleted("s1"), None);
    }

    #[tokio::test]
    async fn test_persistence_failure_emits_error_audit_event() {
        let target = MemoryTarget::new();
        target.insert("s1", false, &[("attendances", 0), ("enrollments", 0), ("payments", 0)]);
        target.fail_writes.store(true, Ordering::SeqCst);
        let service = DeletionService::new(&target);

        let buffer = audit::capture::LogBuffer::default();
        let guard = tracing::subscriber::set_default(audit::capture::subscriber(&buffer));
        let result = service.soft_delete(&admin(), "s1", None).await;
        drop(guard);

        assert!(matches!(result, Err(AppError::Database(_))));
        let logs = buffer.contents();
        // The attempt is closed out by an error event, not left dangling.
        assert!(logs.contains("phase=\"attempt\""));
        assert!(logs.contains("phase=\"error\""));
        assert!(logs.contains("connection reset"));
    }

    #[tokio::test]
    async fn test_restore_persistence_failure_emits_error_audit_event() {
        let target = MemoryTarget::new();
        target.insert("s1", true, &[]);
        target.fail_writes.store(true, Ordering::SeqCst);
        let service = DeletionService::new(&target);

        let buffer = audit::capture::LogBuffer::default();
        let guard = tracing::subscriber::set_default(audit::capture::subscriber(&buffer));
        let result = service.restore(&admin(), "s1").await;
        drop(guard);

        assert!(matches!(result, Err(AppError::Database(_))));
        assert!(buffer.contents().contains("phase=\"error\""));
    }

    #[tokio::test]
    async fn test_related_records_missing_entity() {
        let target = MemoryTarget::new();
        let service = DeletionService::new(&target);

        let result = service.related_records("ghost").await;

        assert!(matches!(result, Err(AppError::StudentNotFound(_))));
    }
}

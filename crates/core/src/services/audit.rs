//! Deletion audit logging.
//!
//! Every deletion, restore, cascade and reassignment attempt produces one
//! structured event per phase under the `deletion_audit` tracing target.
//! Events are for post-hoc traceability only; they are not persisted or
//! queried by the application.

/// Phase of a deletion operation being audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditPhase {
    /// Operation is about to run.
    Attempt,
    /// Operation completed.
    Success,
    /// Operation was rejected or failed.
    Error,
}

impl AuditPhase {
    /// Stable string form used in the log field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Attempt => "attempt",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Emit one audit event.
///
/// `action` is the operation name (`soft_delete`, `restore`,
/// `permanent_delete`, `cascade_delete`, `reassign`); `detail` carries the
/// reason, counts, or error summary for the phase.
pub fn record(
    entity_type: &str,
    entity_id: &str,
    action: &str,
    phase: AuditPhase,
    actor: &str,
    detail: Option<&str>,
) {
    match phase {
        AuditPhase::Error => {
            tracing::warn!(
                target: "deletion_audit",
                entity_type,
                entity_id,
                action,
                phase = phase.as_str(),
                actor,
                detail,
                "deletion audit"
            );
        }
        AuditPhase::Attempt | AuditPhase::Success => {
            tracing::info!(
                target: "deletion_audit",
                entity_type,
                entity_id,
                action,
                phase = phase.as_str(),
                actor,
                detail,
                "deletion audit"
            );
        }
    }
}

/// Test support: collect formatted tracing output in memory so audit
/// emission can be asserted on.
#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod capture {
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogBuffer {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    pub fn subscriber(buffer: &LogBuffer) -> impl tracing::Subscriber + Send + Sync {
        tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_ansi(false)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_strings() {
        assert_eq!(AuditPhase::Attempt.as_str(), "attempt");
        assert_eq!(AuditPhase::Success.as_str(), "success");
        assert_eq!(AuditPhase::Error.as_str(), "error");
    }
}

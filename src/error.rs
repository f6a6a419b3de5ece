//! Error kinds surfaced by every service in this crate.
//!
//! Callers can tell apart three situations and decide on their own whether
//! to prompt the user and resubmit. Nothing is retried automatically.

use sea_orm::{DbErr, SqlErr};

/// Errors returned by the bookings services.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The request was rejected before anything was written.
    ///
    /// Covers malformed codes, unknown enumeration values, scheduling
    /// violations and references to rows that do not exist.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The store refused the write because of a key, foreign-key or check
    /// constraint.
    #[error("storage conflict: {0}")]
    Conflict(String),

    /// Any other persistence failure.
    #[error("storage unavailable: {0}")]
    Unavailable(#[source] DbErr),
}

/// Result alias used throughout the crate.
pub type Result<T, E = StoreError> = std::result::Result<T, E>;

impl StoreError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        tracing::debug!(%reason, "request rejected");
        Self::InvalidInput(reason)
    }

    pub(crate) fn conflict(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        tracing::warn!(%reason, "write refused");
        Self::Conflict(reason)
    }

    /// Returns `true` for [`StoreError::InvalidInput`].
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Returns `true` for [`StoreError::Conflict`].
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => {
                tracing::warn!(%msg, "unique constraint rejected write");
                Self::Conflict(format!("duplicate key: {msg}"))
            }
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                tracing::warn!(%msg, "foreign key constraint rejected write");
                Self::Conflict(format!("missing or referenced row: {msg}"))
            }
            _ if is_check_violation(&err) => {
                tracing::warn!(error = %err, "check constraint rejected write");
                Self::Conflict(format!("check constraint violated: {err}"))
            }
            _ => Self::Unavailable(err),
        }
    }
}

// Postgres: `violates check constraint "..."`, SQLite: `CHECK constraint failed: ...`.
fn is_check_violation(err: &DbErr) -> bool {
    matches!(err, DbErr::Exec(_) | DbErr::Query(_))
        && err.to_string().to_ascii_lowercase().contains("check constraint")
}

#[cfg(test)]
mod tests {
    use sea_orm::RuntimeErr;

    use super::*;

    #[test]
    fn check_violation_becomes_conflict() {
        let err = DbErr::Exec(RuntimeErr::Internal(
            "new row for relation \"aircrafts_data\" violates check constraint \"aircrafts_range_check\""
                .to_string(),
        ));
        assert!(StoreError::from(err).is_conflict());
    }

    #[test]
    fn other_failures_are_unavailable() {
        let err = DbErr::Conn(RuntimeErr::Internal("connection refused".to_string()));
        assert!(matches!(StoreError::from(err), StoreError::Unavailable(_)));
    }
}

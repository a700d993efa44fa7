//! Database error handling utilities
//!
//! Classifies constraint violations so slices can turn them into
//! `AlreadyExists` / `InvalidReference` / conflict errors.

use sqlx::Error as SqlxError;

#[derive(Debug)]
pub enum ConstraintViolation {
    Unique { constraint: Option<String> },
    ForeignKey { constraint: Option<String> },
    /// Not a constraint violation
    Other(SqlxError),
}

pub fn check_constraint_violation(error: SqlxError) -> ConstraintViolation {
    if let SqlxError::Database(ref db_err) = error {
        let constraint = db_err.constraint().map(str::to_string);
        if db_err.is_unique_violation() {
            return ConstraintViolation::Unique { constraint };
        }
        if db_err.is_foreign_key_violation() {
            return ConstraintViolation::ForeignKey { constraint };
        }
    }
    ConstraintViolation::Other(error)
}

pub fn is_unique_violation(error: &SqlxError) -> bool {
    matches!(error, SqlxError::Database(db_err) if db_err.is_unique_violation())
}

pub fn is_foreign_key_violation(error: &SqlxError) -> bool {
    matches!(error, SqlxError::Database(db_err) if db_err.is_foreign_key_violation())
}

/// Map a unique violation to `unique_error`, anything else through `default_wrapper`
pub fn map_unique_violation<E, F>(error: SqlxError, unique_error: E, default_wrapper: F) -> E
where
    F: FnOnce(SqlxError) -> E,
{
    if is_unique_violation(&error) {
        unique_error
    } else {
        default_wrapper(error)
    }
}

/// Map a foreign key violation to `fk_error`, anything else through `default_wrapper`
pub fn map_foreign_key_violation<E, F>(error: SqlxError, fk_error: E, default_wrapper: F) -> E
where
    F: FnOnce(SqlxError) -> E,
{
    if is_foreign_key_violation(&error) {
        fk_error
    } else {
        default_wrapper(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum TestError {
        Duplicate,
        Database(String),
    }

    #[test]
    fn test_non_database_errors_are_other() {
        assert!(matches!(
            check_constraint_violation(SqlxError::RowNotFound),
            ConstraintViolation::Other(SqlxError::RowNotFound)
        ));
        assert!(!is_unique_violation(&SqlxError::PoolTimedOut));
        assert!(!is_foreign_key_violation(&SqlxError::PoolTimedOut));
    }

    #[test]
    fn test_map_helpers_fall_through() {
        let mapped = map_unique_violation(SqlxError::RowNotFound, TestError::Duplicate, |e| {
            TestError::Database(e.to_string())
        });
        assert!(matches!(mapped, TestError::Database(_)));

        let mapped = map_foreign_key_violation(SqlxError::PoolClosed, TestError::Duplicate, |e| {
            TestError::Database(e.to_string())
        });
        assert!(matches!(mapped, TestError::Database(_)));
    }
}

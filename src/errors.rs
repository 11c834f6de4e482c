// errors.rs
use std::fmt;

/// Errors originating from either the business rules
/// (validation, forbidden lifecycle actions) or downstream layers (DB).
#[derive(Debug)]
pub enum EstateError {
    /// A persisted value violates a declared invariant. The mutation is
    /// rejected before commit.
    Validation(String),
    /// An explicit action was attempted in a state that forbids it.
    UserAction(String),
    /// The requested record does not exist.
    NotFound,
    DbError(String),
}

impl fmt::Display for EstateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstateError::Validation(msg) => write!(f, "Validation error: {msg}"),
            EstateError::UserAction(msg) => write!(f, "User error: {msg}"),
            EstateError::NotFound => write!(f, "Not Found"),
            EstateError::DbError(msg) => write!(f, "Database Error: {msg}"),
        }
    }
}

impl std::error::Error for EstateError {}

impl From<rusqlite::Error> for EstateError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::QueryReturnedNoRows => EstateError::NotFound,
            // The storage layer enforces UNIQUE/CHECK constraints as a
            // backstop; surface those as validation failures, not DB faults.
            rusqlite::Error::SqliteFailure(e, msg)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                EstateError::Validation(
                    msg.clone()
                        .unwrap_or_else(|| "constraint violation".to_string()),
                )
            }
            _ => EstateError::DbError(err.to_string()),
        }
    }
}

use std::fmt;

use tokio_postgres::error::SqlState;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the persistence layer
#[derive(Debug)]
pub enum Error {
    /// Unique-key violation (e.g. duplicate username)
    Conflict(String),

    /// Requested row doesn't exist
    NotFound(String),

    /// Invalid input data
    Validation(String),

    /// Database unreachable or authentication failure
    Connection(String),

    /// Connection pool issues
    Pool(String),

    /// SQL errors, constraint violations other than unique keys
    Database(String),
}

impl Error {
    /// True when the error maps to a 404 at the HTTP boundary
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// True when the error maps to a 409 at the HTTP boundary
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Conflict(msg) => write!(f, "Conflict: {}", msg),
            Error::NotFound(msg) => write!(f, "Not found: {}", msg),
            Error::Validation(msg) => write!(f, "Validation error: {}", msg),
            Error::Connection(msg) => write!(f, "Connection error: {}", msg),
            Error::Pool(msg) => write!(f, "Pool error: {}", msg),
            Error::Database(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Convert tokio-postgres errors, mapping unique violations to Conflict so
/// the registration race net can rely on it
impl From<tokio_postgres::Error> for Error {
    fn from(err: tokio_postgres::Error) -> Self {
        if let Some(db_error) = err.as_db_error() {
            if db_error.code() == &SqlState::UNIQUE_VIOLATION {
                return Error::Conflict(db_error.message().to_string());
            }
            if db_error.code() == &SqlState::FOREIGN_KEY_VIOLATION {
                return Error::NotFound(db_error.message().to_string());
            }
            return Error::Database(format!(
                "{}: {}",
                db_error.code().code(),
                db_error.message()
            ));
        }

        Error::Database(format!("{:?}", err))
    }
}

impl From<deadpool_postgres::PoolError> for Error {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Error::Pool(err.to_string())
    }
}

impl From<deadpool_postgres::BuildError> for Error {
    fn from(err: deadpool_postgres::BuildError) -> Self {
        Error::Connection(err.to_string())
    }
}

impl From<uuid::Error> for Error {
    fn from(err: uuid::Error) -> Self {
        Error::Validation(format!("Invalid UUID: {}", err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_variants() {
        assert_eq!(
            Error::Conflict("username taken".to_string()).to_string(),
            "Conflict: username taken"
        );
        assert_eq!(
            Error::NotFound("chat room abc".to_string()).to_string(),
            "Not found: chat room abc"
        );
        assert!(Error::Database("boom".to_string())
            .to_string()
            .starts_with("Database error"));
    }

    #[test]
    fn test_classification_helpers() {
        assert!(Error::NotFound("x".to_string()).is_not_found());
        assert!(!Error::NotFound("x".to_string()).is_conflict());
        assert!(Error::Conflict("x".to_string()).is_conflict());
        assert!(!Error::Validation("x".to_string()).is_not_found());
    }

    #[test]
    fn test_from_uuid_error() {
        let err: Error = uuid::Uuid::parse_str("not-a-uuid").unwrap_err().into();
        assert!(matches!(err, Error::Validation(_)));
    }
}

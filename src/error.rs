//! Error types for the SQL frontend

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Name resolution errors
    #[error("Table {0} does not exist")]
    TableNotFound(String),

    #[error("Column {0} does not exist")]
    ColumnNotFound(String),

    #[error("Column {0} is ambiguous")]
    AmbiguousColumn(String),

    #[error("Range variable or table name {0} does not exist")]
    RangeVariableNotFound(String),

    #[error("User {0} does not exist")]
    UserNotFound(String),

    #[error("Database {0} does not exist")]
    DatabaseNotFound(String),

    // Type errors
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    // DDL errors
    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Not supported: {0}")]
    NotSupported(String),

    // System errors
    #[error("Internal error: {0}")]
    Internal(String),
}

//! Error types for textorm

use thiserror::Error;

/// Result type alias for textorm operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for statement building and execution
#[derive(Debug, Clone, Error)]
pub enum OrmError {
    /// A condition leaf is structurally broken (empty column, unknown operator)
    #[error("Malformed condition: {0}")]
    MalformedCondition(String),

    /// List value used without IN/NOT IN, or IN/NOT IN used without a list
    #[error("Operator/value mismatch: {0}")]
    OperatorValueMismatch(String),

    /// A value that is neither scalar, list, nor raw fragment
    #[error("Unsupported value type: {0}")]
    UnsupportedValueType(String),

    /// A condition group with no children
    #[error("Condition group has no children")]
    EmptyConditionGroup,

    /// Bad projection list (empty, or more than one DISTINCT entry)
    #[error("Invalid select argument: {0}")]
    InvalidSelectArgument(String),

    /// Join target does not expose a table name
    #[error("Invalid join target: {0}")]
    InvalidJoinTarget(String),

    /// A column was given the unset sentinel as its value
    #[error("Value for column '{0}' is unset")]
    UndefinedColumnValue(String),

    /// No table name set before render
    #[error("Undefined table name")]
    MissingTable,

    /// Insert or update rendered without any values
    #[error("Missing values: {0}")]
    MissingValues(String),

    /// A clause that is illegal for the statement kind being rendered
    #[error("Conflicting clause: {0}")]
    ConflictingClause(String),

    /// Driver error, passed through unmodified
    #[error("Driver error: {0}")]
    Driver(String),
}

impl OrmError {
    /// Create a malformed-condition error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedCondition(message.into())
    }

    /// Create an operator/value mismatch error
    pub fn mismatch(message: impl Into<String>) -> Self {
        Self::OperatorValueMismatch(message.into())
    }

    /// Create a conflicting-clause error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::ConflictingClause(message.into())
    }

    /// Create a driver error
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver(message.into())
    }

    /// Check if this is a conflicting-clause error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::ConflictingClause(_))
    }

    /// Check if this is a driver error
    pub fn is_driver(&self) -> bool {
        matches!(self, Self::Driver(_))
    }
}

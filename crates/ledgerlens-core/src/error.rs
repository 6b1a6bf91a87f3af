//! Error types for ledgerlens-core
//!
//! Store failures, report failures and the structured details handed
//! back to callers. Every error carries a stable code and a severity.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{OwnerId, ReportKind};

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Malformed month or year
    InvalidPeriod,
    /// Store query failed, timed out or store is closed
    StoreUnavailable,
    /// Utilization against a zero budget
    DivisionByZero,
    /// Record rejected by the store write path
    ValidationError,
    /// Internal error
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::InvalidPeriod => write!(f, "INVALID_PERIOD"),
            ErrorCode::StoreUnavailable => write!(f, "STORE_UNAVAILABLE"),
            ErrorCode::DivisionByZero => write!(f, "DIVISION_BY_ZERO"),
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Failures raised by a transaction store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store is closed")]
    Closed,

    #[error("query timed out after {after_ms} ms")]
    Timeout { after_ms: u64 },

    #[error("record rejected: {message}")]
    Validation { message: String },

    #[error("snapshot could not be read: {message}")]
    Snapshot { message: String },
}

/// Main error type for ledgerlens-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid period: {message}")]
    InvalidPeriod { message: String },

    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Division by zero: {context}")]
    DivisionByZero { context: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::InvalidPeriod { .. } => ErrorCode::InvalidPeriod,
            CoreError::StoreUnavailable { .. } => ErrorCode::StoreUnavailable,
            CoreError::DivisionByZero { .. } => ErrorCode::DivisionByZero,
            CoreError::ValidationError { .. } => ErrorCode::ValidationError,
            CoreError::InternalError { .. } => ErrorCode::InternalError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::InvalidPeriod { .. } => ErrorSeverity::Info,
            CoreError::StoreUnavailable { .. } => ErrorSeverity::Error,
            CoreError::DivisionByZero { .. } => ErrorSeverity::Warning,
            CoreError::ValidationError { .. } => ErrorSeverity::Warning,
            CoreError::InternalError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::InvalidPeriod { .. } => {
                details = details.with_suggestion(
                    "Use a month between 1 and 12 and a positive year.".to_string(),
                );
            }
            CoreError::StoreUnavailable { .. } => {
                details = details.with_suggestion(
                    "The transaction store did not answer; retry the request later.".to_string(),
                );
            }
            CoreError::DivisionByZero { context } => {
                details = details.with_detail(serde_json::json!({ "context": context }));
                details = details.with_suggestion(
                    "Budgets must have a total amount greater than 0.".to_string(),
                );
            }
            CoreError::ValidationError { message } => {
                details = details.with_detail(serde_json::json!({ "validation_message": message }));
            }
            CoreError::InternalError { .. } => {}
        }

        details
    }
}

impl From<StoreError> for CoreError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Validation { message } => CoreError::ValidationError { message },
            other => CoreError::StoreUnavailable {
                message: other.to_string(),
            },
        }
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

/// A failed report, with the request it belonged to
#[derive(Error, Debug)]
#[error("{kind} report for owner {owner} ({period}) failed: {source}")]
pub struct ReportError {
    pub kind: ReportKind,
    pub owner: OwnerId,
    /// Requested period as given by the caller
    pub period: String,
    #[source]
    pub source: CoreError,
}

impl ReportError {
    pub fn new(kind: ReportKind, owner: OwnerId, period: impl Into<String>, source: CoreError) -> Self {
        Self {
            kind,
            owner,
            period: period.into(),
            source,
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.source.code()
    }

    /// Details of the cause, annotated with the report request
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = self.source.to_details();
        let request = serde_json::json!({
            "report": self.kind,
            "owner": self.owner,
            "period": self.period,
        });
        details.details = Some(match details.details.take() {
            Some(cause) => serde_json::json!({ "request": request, "cause": cause }),
            None => serde_json::json!({ "request": request }),
        });
        details
    }

    pub fn context(&self) -> ErrorContext {
        ErrorContext::new(format!("{}_report", self.kind))
            .with_owner(self.owner)
            .with_data("period", serde_json::json!(self.period))
    }
}

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Owner the request was made for
    pub owner: Option<OwnerId>,
    /// Operation being performed
    pub operation: String,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: String) -> Self {
        Self {
            owner: None,
            operation,
            data: serde_json::json!({}),
        }
    }

    pub fn with_owner(mut self, owner: OwnerId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Add context data
    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger: Send + Sync {
    fn log_error(&self, error: &ReportError, context: &ErrorContext);
    fn log_warning(&self, message: &str, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &ReportError, context: &ErrorContext) {
        log::error!(
            target: "ledgerlens::error",
            "ERROR [{}] {} - Operation: {} - Owner: {:?} - Data: {}",
            error.code(),
            error,
            context.operation,
            context.owner,
            context.data
        );
    }

    fn log_warning(&self, message: &str, context: &ErrorContext) {
        log::warn!(
            target: "ledgerlens::error",
            "WARNING: {} - Operation: {} - Owner: {:?} - Data: {}",
            message,
            context.operation,
            context.owner,
            context.data
        );
    }
}

// ==================== Tests ====================

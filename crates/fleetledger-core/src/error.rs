//! Error types for fleetledger-core
//!
//! Every rejected operation leaves the chart or the journal entry exactly as
//! it was. Errors carry a machine code, a severity and suggestions so the API
//! layer can render them without knowing the variants.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Required input left blank
    MissingField,
    /// Parent code unknown or not a group
    InvalidParent,
    /// Account code already used
    DuplicateCode,
    /// No node with that id
    NodeNotFound,
    /// No journal line with that id
    LineNotFound,
    /// Removing would leave fewer than two lines
    LineFloor,
    /// Debit and credit both set on one line
    AmountConflict,
    /// Amount not a non-negative two-place decimal
    InvalidAmount,
    /// Debits and credits differ or are zero
    Unbalanced,
    /// Malformed input document
    InvalidFormat,
    /// Value not accepted for a field
    InvalidValue,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::MissingField => write!(f, "MISSING_FIELD"),
            ErrorCode::InvalidParent => write!(f, "INVALID_PARENT"),
            ErrorCode::DuplicateCode => write!(f, "DUPLICATE_CODE"),
            ErrorCode::NodeNotFound => write!(f, "NODE_NOT_FOUND"),
            ErrorCode::LineNotFound => write!(f, "LINE_NOT_FOUND"),
            ErrorCode::LineFloor => write!(f, "LINE_FLOOR"),
            ErrorCode::AmountConflict => write!(f, "AMOUNT_CONFLICT"),
            ErrorCode::InvalidAmount => write!(f, "INVALID_AMOUNT"),
            ErrorCode::Unbalanced => write!(f, "UNBALANCED"),
            ErrorCode::InvalidFormat => write!(f, "INVALID_FORMAT"),
            ErrorCode::InvalidValue => write!(f, "INVALID_VALUE"),
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
    /// Informational
    Info,
    /// Warning - input rejected, nothing changed
    Warning,
    /// Error - operation failed
    Error,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
        }
    }
}

/// Main error type for fleetledger-core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid parent group: {code}")]
    InvalidParent { code: String },

    #[error("Account code already exists: {code}")]
    DuplicateCode { code: String },

    #[error("Account node not found: {id}")]
    NodeNotFound { id: String },

    #[error("Journal line not found: {id}")]
    LineNotFound { id: u64 },

    #[error("A journal entry needs at least {minimum} lines")]
    LineFloor { minimum: usize },

    #[error("Line {id} already has a {existing} amount")]
    AmountConflict { id: u64, existing: String },

    #[error("Invalid amount: {value}")]
    InvalidAmount { value: String },

    #[error("Entry is not balanced: debit {debit}, credit {credit}")]
    Unbalanced { debit: Decimal, credit: Decimal },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::MissingField { .. } => ErrorCode::MissingField,
            CoreError::InvalidParent { .. } => ErrorCode::InvalidParent,
            CoreError::DuplicateCode { .. } => ErrorCode::DuplicateCode,
            CoreError::NodeNotFound { .. } => ErrorCode::NodeNotFound,
            CoreError::LineNotFound { .. } => ErrorCode::LineNotFound,
            CoreError::LineFloor { .. } => ErrorCode::LineFloor,
            CoreError::AmountConflict { .. } => ErrorCode::AmountConflict,
            CoreError::InvalidAmount { .. } => ErrorCode::InvalidAmount,
            CoreError::Unbalanced { .. } => ErrorCode::Unbalanced,
            CoreError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            CoreError::InvalidValue { .. } => ErrorCode::InvalidValue,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::NodeNotFound { .. } => ErrorSeverity::Info,
            CoreError::LineNotFound { .. } => ErrorSeverity::Info,
            CoreError::InvalidFormat { .. } => ErrorSeverity::Error,
            _ => ErrorSeverity::Warning,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::MissingField { field } => {
                details = details.with_detail(serde_json::json!({ "field": field }));
                details = details.with_suggestion(format!("Fill in the '{}' field.", field));
            }
            CoreError::InvalidParent { code } => {
                details = details.with_suggestion(format!(
                    "'{}' must be the code of an existing group.",
                    code
                ));
                details = details.with_suggestion(
                    "Use the /api/accounts endpoint to list the chart of accounts.".to_string(),
                );
            }
            CoreError::DuplicateCode { code } => {
                details = details.with_suggestion(format!(
                    "Pick a code other than '{}'; codes are unique across the chart.",
                    code
                ));
            }
            CoreError::LineFloor { minimum } => {
                details = details.with_suggestion(format!(
                    "Add a line before removing one; an entry keeps at least {} lines.",
                    minimum
                ));
            }
            CoreError::AmountConflict { existing, .. } => {
                details = details.with_suggestion(format!(
                    "Clear the {} amount first; a line is either a debit or a credit.",
                    existing
                ));
            }
            CoreError::InvalidAmount { .. } => {
                details = details.with_suggestion(
                    "Amounts are non-negative numbers with at most two decimal places.".to_string(),
                );
            }
            CoreError::Unbalanced { debit, credit } => {
                details = details.with_detail(serde_json::json!({
                    "total_debit": debit.to_string(),
                    "total_credit": credit.to_string(),
                    "difference": (*debit - *credit).abs().to_string(),
                }));
                details = details.with_suggestion(
                    "Total debits must equal total credits and be greater than zero.".to_string(),
                );
            }
            CoreError::InvalidFormat { message } => {
                details = details.with_detail(serde_json::json!({ "parse_message": message }));
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Session the request belongs to
    pub session_id: Option<String>,
    /// Operation being performed
    pub operation: String,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: &str) -> Self {
        Self {
            session_id: None,
            operation: operation.to_string(),
            data: serde_json::json!({}),
        }
    }

    /// Add session ID
    pub fn with_session(mut self, session_id: &str) -> Self {
        self.session_id = Some(session_id.to_string());
        self
    }

    /// Add context data
    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger {
    /// Log an error
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        match error.severity() {
            ErrorSeverity::Error => log::error!(
                target: "fleetledger::error",
                "[{}] {} - Operation: {} - Session: {:?} - Data: {}",
                error.code(),
                error,
                context.operation,
                context.session_id,
                context.data
            ),
            ErrorSeverity::Warning => log::warn!(
                target: "fleetledger::error",
                "[{}] {} - Operation: {} - Session: {:?} - Data: {}",
                error.code(),
                error,
                context.operation,
                context.session_id,
                context.data
            ),
            ErrorSeverity::Info => log::info!(
                target: "fleetledger::error",
                "[{}] {} - Operation: {} - Session: {:?}",
                error.code(),
                error,
                context.operation,
                context.session_id
            ),
        }
    }
}

// ==================== Tests ====================

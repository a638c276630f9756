//! Structured Error Handling for fuzzylab
//!
//! Provides a unified error type with:
//! - Error codes for programmatic handling
//! - Structured error responses (JSON-friendly)
//! - Context preservation through error chains
//! - HTTP status code mapping
//!
//! # Error Categories
//!
//! - Validation (1xxx) - request payloads rejected before inference
//! - Engine (2xxx) - evaluation failures inside a built profile
//! - Profile (3xxx) - profiles that could not be built or do not exist
//! - Config (7xxx) - configuration issues
//! - Internal (9xxx)
//!
//! The engine's own `DefinitionError` and `ComputeError` convert into
//! [`FuzzyError`] at the caller boundary.
//!
//! # Example
//!
//! ```rust
//! use fuzzylab::error::{ErrorCode, FuzzyError};
//!
//! let err = FuzzyError::out_of_range("Temperature must be between 0 and 50°C")
//!     .with_context("field", "temperature");
//! assert_eq!(err.code, ErrorCode::OutOfRange);
//! assert_eq!(err.http_status(), 400);
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::{ComputeError, DefinitionError};

// ============================================================================
// Error Codes
// ============================================================================

/// Unique error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (1xxx)
    /// Request body missing or not a JSON object
    NoData = 1001,
    /// Missing required field
    MissingRequired = 1002,
    /// Field present but not a number
    InvalidValue = 1003,
    /// Value outside the variable's universe
    OutOfRange = 1004,

    // Engine errors (2xxx)
    /// Generic evaluation error
    EngineError = 2000,
    /// Aggregated output set is empty
    DegenerateOutput = 2001,
    /// Rule references an input that was never set
    MissingInput = 2002,
    /// Unknown variable or term during evaluation
    UnknownVariable = 2003,

    // Profile errors (3xxx)
    /// Profile failed to build and is unavailable
    ProfileUnavailable = 3000,
    /// Malformed profile definition
    InvalidDefinition = 3001,
    /// No profile with that name
    UnknownProfile = 3002,

    // Config errors (7xxx)
    /// Config file unreadable or not serialisable
    ConfigError = 7000,
    /// Invalid config syntax
    InvalidConfigSyntax = 7002,
    /// Invalid config value
    InvalidConfigValue = 7004,

    // Internal errors (9xxx)
    /// Internal error
    InternalError = 9000,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a short description of the error code
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::NoData => "No data provided",
            ErrorCode::MissingRequired => "Missing required field",
            ErrorCode::InvalidValue => "Invalid value",
            ErrorCode::OutOfRange => "Value out of range",

            ErrorCode::EngineError => "Fuzzy computation error",
            ErrorCode::DegenerateOutput => "Output cannot be defuzzified",
            ErrorCode::MissingInput => "Missing engine input",
            ErrorCode::UnknownVariable => "Unknown variable",

            ErrorCode::ProfileUnavailable => "Fuzzy system is not initialised",
            ErrorCode::InvalidDefinition => "Invalid profile definition",
            ErrorCode::UnknownProfile => "Unknown profile",

            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::InvalidConfigSyntax => "Invalid configuration syntax",
            ErrorCode::InvalidConfigValue => "Invalid configuration value",

            ErrorCode::InternalError => "Internal error",
        }
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorCode::NoData
            | ErrorCode::MissingRequired
            | ErrorCode::InvalidValue
            | ErrorCode::OutOfRange => 400,

            ErrorCode::UnknownProfile => 404,

            ErrorCode::EngineError
            | ErrorCode::DegenerateOutput
            | ErrorCode::MissingInput
            | ErrorCode::UnknownVariable
            | ErrorCode::ProfileUnavailable
            | ErrorCode::InvalidDefinition
            | ErrorCode::ConfigError
            | ErrorCode::InvalidConfigSyntax
            | ErrorCode::InvalidConfigValue
            | ErrorCode::InternalError => 500,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

// ============================================================================
// Error Context
// ============================================================================

/// Additional context information for an error
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Key-value pairs of context information
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub fields: HashMap<String, String>,
    /// Source location (file:line)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Stack of error causes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================================
// Main Error Type
// ============================================================================

/// The main error type for fuzzylab
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuzzyError {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,
    /// Hint for resolving the error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl FuzzyError {
    /// Create a new error with a code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            hint: None,
        }
    }

    // ========================================================================
    // Factory methods
    // ========================================================================

    /// Body missing, empty, or not a JSON object
    pub fn no_data() -> Self {
        Self::new(ErrorCode::NoData, "No data provided")
    }

    pub fn missing_required(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MissingRequired, message)
    }

    pub fn invalid_value(field: &str) -> Self {
        Self::new(
            ErrorCode::InvalidValue,
            format!("{} must be a number", field),
        )
        .with_context("field", field)
    }

    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::OutOfRange, message)
    }

    /// A profile whose build failed (or was never attempted successfully)
    pub fn profile_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ProfileUnavailable, message)
    }

    pub fn unknown_profile(name: &str) -> Self {
        Self::new(ErrorCode::UnknownProfile, format!("Unknown profile '{}'", name))
            .with_hint("Available profiles: comfort, air-quality, light-comfort, plant-care")
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Add context to the error
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::new);
        ctx.fields.insert(key.into(), value.into());
        self
    }

    /// Add a cause to the error chain
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::new);
        ctx.causes.push(cause.into());
        self
    }

    /// Add source location
    pub fn at(mut self, location: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::new);
        ctx.location = Some(location.into());
        self
    }

    /// Add a hint for resolving the error
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Check if this is a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.http_status())
    }
}

impl fmt::Display for FuzzyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)?;

        if let Some(ref ctx) = self.context {
            if let Some(ref loc) = ctx.location {
                write!(f, " at {}", loc)?;
            }
            if !ctx.causes.is_empty() {
                write!(f, "\nCaused by:")?;
                for cause in &ctx.causes {
                    write!(f, "\n  - {}", cause)?;
                }
            }
        }

        if let Some(ref hint) = self.hint {
            write!(f, "\nHint: {}", hint)?;
        }

        Ok(())
    }
}

impl std::error::Error for FuzzyError {}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<ComputeError> for FuzzyError {
    fn from(err: ComputeError) -> Self {
        let code = match &err {
            ComputeError::DegenerateOutput(_) => ErrorCode::DegenerateOutput,
            ComputeError::MissingInput(_) => ErrorCode::MissingInput,
            ComputeError::UnknownVariable(_) | ComputeError::UnknownTerm { .. } => {
                ErrorCode::UnknownVariable
            }
            ComputeError::NonFiniteInput { .. } => ErrorCode::EngineError,
        };
        FuzzyError::new(code, err.to_string())
    }
}

impl From<DefinitionError> for FuzzyError {
    fn from(err: DefinitionError) -> Self {
        FuzzyError::new(ErrorCode::InvalidDefinition, err.to_string())
    }
}

/// Socket and runtime failures while serving
impl From<std::io::Error> for FuzzyError {
    fn from(err: std::io::Error) -> Self {
        FuzzyError::internal(err.to_string()).with_context("kind", format!("{:?}", err.kind()))
    }
}

/// An unparseable request body counts as no data
impl From<serde_json::Error> for FuzzyError {
    fn from(err: serde_json::Error) -> Self {
        FuzzyError::no_data()
            .with_cause(err.to_string())
            .with_context("format", "JSON")
    }
}

// ============================================================================
// Result type alias
// ============================================================================

/// A Result type using FuzzyError
pub type FuzzyResult<T> = Result<T, FuzzyError>;

// ============================================================================
// Error response for HTTP APIs
// ============================================================================

/// Body of every non-2xx API response: `{"error": message, "code", "status"}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,
    /// Error code (string form)
    pub code: ErrorCode,
    /// HTTP status code
    pub status: u16,
    /// Hint for resolution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl From<&FuzzyError> for ErrorResponse {
    fn from(err: &FuzzyError) -> Self {
        Self {
            error: err.message.clone(),
            code: err.code,
            status: err.http_status(),
            hint: err.hint.clone(),
        }
    }
}

// ============================================================================
// Macros for convenient error creation
// ============================================================================

/// Create a FuzzyError tagged with the current location
#[macro_export]
macro_rules! fuzzy_error {
    ($code:expr, $msg:expr) => {
        $crate::error::FuzzyError::new($code, $msg)
            .at(format!("{}:{}", file!(), line!()))
    };
    ($code:expr, $fmt:expr, $($arg:tt)*) => {
        $crate::error::FuzzyError::new($code, format!($fmt, $($arg)*))
            .at(format!("{}:{}", file!(), line!()))
    };
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = FuzzyError::missing_required("Temperature and humidity values are required");
        assert_eq!(err.code, ErrorCode::MissingRequired);
        assert_eq!(err.message, "Temperature and humidity values are required");
        assert!(err.context.is_none());
    }

    #[test]
    fn test_error_with_context() {
        let err = FuzzyError::out_of_range("Humidity must be between 0 and 100%")
            .with_context("field", "humidity")
            .with_context("value", "120");

        let ctx = err.context.as_ref().unwrap();
        assert_eq!(ctx.fields.get("field"), Some(&"humidity".to_string()));
        assert_eq!(ctx.fields.get("value"), Some(&"120".to_string()));
    }

    #[test]
    fn test_error_http_status() {
        assert_eq!(FuzzyError::no_data().http_status(), 400);
        assert_eq!(FuzzyError::missing_required("x").http_status(), 400);
        assert_eq!(FuzzyError::invalid_value("co2").http_status(), 400);
        assert_eq!(FuzzyError::out_of_range("x").http_status(), 400);
        assert_eq!(FuzzyError::unknown_profile("weather").http_status(), 404);
        assert_eq!(FuzzyError::profile_unavailable("x").http_status(), 500);
        assert_eq!(FuzzyError::internal("x").http_status(), 500);
    }

    #[test]
    fn test_server_errors() {
        assert!(!FuzzyError::no_data().is_server_error());
        assert!(FuzzyError::internal("x").is_server_error());
    }

    #[test]
    fn test_json_error_is_no_data() {
        let err: FuzzyError = serde_json::from_slice::<serde_json::Value>(b"{oops").unwrap_err().into();
        assert_eq!(err.code, ErrorCode::NoData);
        assert_eq!(err.message, "No data provided");
        assert_eq!(err.context.unwrap().causes.len(), 1);
    }

    #[test]
    fn test_io_error_is_internal() {
        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use");
        let err: FuzzyError = io.into();
        assert_eq!(err.code, ErrorCode::InternalError);
        assert_eq!(err.http_status(), 500);
    }

    #[test]
    fn test_compute_error_conversion() {
        let err: FuzzyError = ComputeError::DegenerateOutput("comfort".to_string()).into();
        assert_eq!(err.code, ErrorCode::DegenerateOutput);
        assert!(err.message.contains("comfort"));
        assert_eq!(err.http_status(), 500);

        let err: FuzzyError = ComputeError::MissingInput("humidity".to_string()).into();
        assert_eq!(err.code, ErrorCode::MissingInput);
    }

    #[test]
    fn test_definition_error_conversion() {
        let err: FuzzyError = DefinitionError::NoRules("comfort".to_string()).into();
        assert_eq!(err.code, ErrorCode::InvalidDefinition);
    }

    #[test]
    fn test_error_display() {
        let err = FuzzyError::internal("computation failed")
            .at("analysis/comfort.rs:42")
            .with_cause("no rule fired")
            .with_hint("Check the input values");

        let display = err.to_string();
        assert!(display.contains("[9000]"));
        assert!(display.contains("computation failed"));
        assert!(display.contains("analysis/comfort.rs:42"));
        assert!(display.contains("no rule fired"));
        assert!(display.contains("Check the input values"));
    }

    #[test]
    fn test_error_response_shape() {
        let resp = ErrorResponse::from(&FuzzyError::no_data());
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["error"], "No data provided");
        assert_eq!(json["code"], "NO_DATA");
        assert_eq!(json["status"], 400);
        assert!(json.get("hint").is_none());
    }

    #[test]
    fn test_macro_tags_location() {
        let err = fuzzy_error!(ErrorCode::OutOfRange, "{} is negative", -1.0);
        assert_eq!(err.code, ErrorCode::OutOfRange);
        assert_eq!(err.message, "-1 is negative");
        let location = err.context.unwrap().location.unwrap();
        assert!(location.contains("error.rs"));
    }
}

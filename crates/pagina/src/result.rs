//! Result and error types for Pagina.

use thiserror::Error;

/// Result type for Pagina operations
pub type PaginaResult<T> = Result<T, PaginaError>;

/// Errors that can occur in Pagina
#[derive(Debug, Error)]
pub enum PaginaError {
    /// Browser executable not found
    #[error("Browser not found. Install Chromium or set CHROMIUM_PATH")]
    BrowserNotFound,

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunchError {
        /// Error message
        message: String,
    },

    /// Session could not be created after the configured number of attempts
    #[error("The session hasn't been created after {attempts} attempts")]
    SessionNotCreated {
        /// Number of launch attempts made
        attempts: u32,
    },

    /// Page error
    #[error("Page error: {message}")]
    PageError {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    NavigationError {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Operation timed out
    #[error("Operation timed out after {ms}ms")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
    },

    /// A page-object field declares a kind the decorator cannot create
    #[error("Unsupported field kind for '{field}': {kind}")]
    UnsupportedFieldKind {
        /// Field name
        field: String,
        /// The offending kind
        kind: String,
    },

    /// Page-object fields whose declared dependencies could never be satisfied
    #[error("Unable to find dependencies for the following fields\nPage object: {page}\nFields: {fields}")]
    UnresolvedDependencies {
        /// Page-object type name
        page: String,
        /// Comma-separated stuck field names
        fields: String,
    },

    /// A field descriptor has no lookup attribute set
    #[error("Field '{field}' declares no lookup attribute")]
    MissingLookup {
        /// Field name
        field: String,
    },

    /// A resolved field was requested that the schema never produced
    #[error("No resolved field named '{field}'")]
    MissingField {
        /// Field name
        field: String,
    },

    /// Assertion error (from `expect()`)
    #[error("Assertion error: {message}")]
    AssertionError {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

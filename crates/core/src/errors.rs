use thiserror::Error;

/// Unified error type for the entire compound-tracker-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
///
/// The valuation engine itself never returns one: malformed dates degrade
/// to zero or empty results instead.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Storage / Documents ─────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    // ── File I/O (native only) ──────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── Baseline fetch ──────────────────────────────────────────────
    #[error("Network error: {0}")]
    Network(String),

    // ── Configuration ───────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    Config(String),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("Cannot delete the last remaining profile")]
    LastProfile,

    #[error("No active profile")]
    NoActiveProfile,

    #[error("Cannot withdraw {requested:.2}: current balance is only {available:.2}")]
    InsufficientBalance { requested: f64, available: f64 },
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<config::ConfigError> for CoreError {
    fn from(e: config::ConfigError) -> Self {
        CoreError::Config(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Baseline URLs may carry access tokens in the query string.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}

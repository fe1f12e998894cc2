use thiserror::Error;

/// Top-level error type for the export pipeline
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}

/// Configuration errors: wallets file, config file, flag combinations
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Wallets file not found: {0}")]
    WalletsFileNotFound(String),

    #[error("Wallets file is not a JSON array of address strings: {0}")]
    WalletsFileInvalid(String),

    #[error("Wallets file contains no addresses: {0}")]
    WalletsFileEmpty(String),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Configuration parsing failed: {0}")]
    Parsing(String),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid time window: start {start} is not before end {end}")]
    InvalidWindow { start: String, end: String },
}

/// API-key errors, surfaced separately so the CLI can point at the fix
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Missing API key: provide --api-key or set HELIUS_API_KEY")]
    MissingKey,

    #[error("API key rejected by the indexing service (HTTP {status})")]
    Rejected { status: u16 },
}

/// Network or API failures while paginating transaction history
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error for wallet {wallet}: HTTP {status}: {body}")]
    Status {
        wallet: String,
        status: u16,
        body: String,
    },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Failures writing the CSV output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Cannot write output file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ExportError>;

/// Error severity levels for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Errors that make the run impossible to start
    Critical,
    /// Errors that abort a run already in flight
    High,
    /// Everything else
    Medium,
}

impl ExportError {
    /// Severity drives the log level chosen by `ErrorLogger`
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ExportError::Config(_) => ErrorSeverity::Critical,
            ExportError::Auth(AuthError::MissingKey) => ErrorSeverity::Critical,
            ExportError::Auth(AuthError::Rejected { .. }) => ErrorSeverity::High,
            ExportError::Fetch(_) => ErrorSeverity::High,
            ExportError::Output(_) => ErrorSeverity::High,
        }
    }
}

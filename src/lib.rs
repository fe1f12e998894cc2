pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod helius;
pub mod logging;
pub mod models;

pub use cli::{Cli, Exporter};
pub use config::{ApiConfig, AppConfig, ExportConfig, LoggingConfig};
pub use error::{AuthError, ConfigError, ExportError, FetchError, OutputError, Result};
pub use helius::{Classifier, HeliusClient, TimeWindow};
pub use logging::{ErrorLogger, LogContext, MetricsLogger};
pub use models::{TaxRecord, TransactionType, WalletSet};

use crate::config::AppConfig;
use crate::error::{AuthError, ConfigError, Result};
use crate::export::write_records;
use crate::helius::{Classifier, HeliusClient, TimeWindow};
use crate::logging::MetricsLogger;
use crate::models::{NoPricing, PriceSource, WalletSet};
use chrono::{DateTime, Utc};
use clap::Parser;

/// Export Solana wallet transaction history to a tax-report CSV
#[derive(Parser, Debug)]
#[command(name = "helius-export", version)]
pub struct Cli {
    /// Helius API key; falls back to HELIUS_API_KEY or the config file
    #[arg(long)]
    pub api_key: Option<String>,

    /// Path to the wallets.json address list
    #[arg(long)]
    pub wallets: Option<String>,

    /// CSV output path
    #[arg(long)]
    pub output: Option<String>,

    /// Inclusive start of the time window (RFC 3339, e.g. 2024-01-01T00:00:00Z)
    #[arg(long)]
    pub start: Option<String>,

    /// Exclusive end of the time window (RFC 3339)
    #[arg(long)]
    pub end: Option<String>,

    /// Maximum in-window transactions fetched per wallet
    #[arg(long)]
    pub limit: Option<usize>,

    /// Base URL of the enriched-transactions API
    #[arg(long)]
    pub endpoint: Option<String>,
}

/// Drives the pipeline: load wallet set, fetch per wallet, classify, write.
///
/// Output ordering is wallet file order, then per-wallet descending recency
/// as fetched; there is no global timestamp sort. Any wallet's fetch failure
/// aborts the run before the CSV is written.
pub struct Exporter {
    client: HeliusClient,
    wallets: WalletSet,
    window: TimeWindow,
    limit: usize,
    output_path: String,
    pricing: Box<dyn PriceSource>,
}

impl Exporter {
    /// Resolve CLI flags against config defaults and build the pipeline
    pub fn from_cli(cli: &Cli, config: &AppConfig) -> Result<Self> {
        let api_key = cli
            .api_key
            .clone()
            .or_else(|| config.api.api_key.clone())
            .ok_or(AuthError::MissingKey)?;

        let mut api_config = config.api.clone();
        if let Some(endpoint) = &cli.endpoint {
            api_config.endpoint = endpoint.clone();
        }

        let wallets_path = cli
            .wallets
            .clone()
            .unwrap_or_else(|| config.export.wallets_path.clone());
        let wallets = WalletSet::load(&wallets_path)?;

        let start = cli.start.as_deref().map(parse_timestamp).transpose()?;
        let end = cli.end.as_deref().map(parse_timestamp).transpose()?;
        let window = TimeWindow::new(start, end)?;

        Ok(Self {
            client: HeliusClient::new(&api_config, api_key)?,
            wallets,
            window,
            limit: cli.limit.unwrap_or(config.export.limit),
            output_path: cli
                .output
                .clone()
                .unwrap_or_else(|| config.export.output_path.clone()),
            pricing: Box::new(NoPricing),
        })
    }

    /// Swap in a pricing backend for cost-basis computation
    pub fn with_price_source(mut self, pricing: Box<dyn PriceSource>) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn output_path(&self) -> &str {
        &self.output_path
    }

    /// Run the export; returns the number of rows written
    pub async fn run(&self) -> Result<usize> {
        let classifier = Classifier::new(&self.wallets);
        let mut rows = Vec::new();

        for wallet in self.wallets.iter() {
            let transactions = self
                .client
                .fetch_transactions(wallet, &self.window, self.limit)
                .await?;
            let fetched = transactions.len();

            for tx in &transactions {
                let mut record = classifier.classify(wallet, tx);
                record.cost_basis_usd = self
                    .pricing
                    .price_usd(&record.asset, None, tx.timestamp)
                    .map(|price| price * record.amount.abs());
                rows.push(record);
            }

            MetricsLogger::log_wallet_exported(wallet, fetched, fetched);
        }

        write_records(&self.output_path, &rows)?;
        MetricsLogger::log_export_summary(self.wallets.len(), rows.len(), &self.output_path);

        Ok(rows.len())
    }
}

fn parse_timestamp(value: &str) -> std::result::Result<DateTime<Utc>, ConfigError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ConfigError::InvalidTimestamp(value.to_string()))
}

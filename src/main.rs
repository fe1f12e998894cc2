use clap::Parser;
use helius_tax_export::cli::{Cli, Exporter};
use helius_tax_export::config::AppConfig;
use helius_tax_export::logging::{init_logging, ErrorLogger, LogContext};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.logging.level);

    let exporter = match Exporter::from_cli(&cli, &config) {
        Ok(exporter) => exporter,
        Err(e) => {
            ErrorLogger::log_error(&e, Some(LogContext::new("main", "startup")));
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match exporter.run().await {
        Ok(rows) => {
            println!("Wrote {} rows to {}", rows, exporter.output_path());
        }
        Err(e) => {
            ErrorLogger::log_error(&e, Some(LogContext::new("main", "run")));
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

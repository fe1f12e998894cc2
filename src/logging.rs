use log::{debug, error, info, trace, warn};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Structured logging context for the exporter
pub struct LogContext {
    pub component: String,
    pub operation: String,
    pub metadata: HashMap<String, Value>,
}

impl LogContext {
    pub fn new(component: &str, operation: &str) -> Self {
        Self {
            component: component.to_string(),
            operation: operation.to_string(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    pub fn with_wallet(self, wallet: &str) -> Self {
        self.with_metadata("wallet", json!(wallet))
    }

    pub fn with_signature(self, signature: &str) -> Self {
        self.with_metadata("signature", json!(signature))
    }

    pub fn with_duration_ms(self, duration_ms: u64) -> Self {
        self.with_metadata("duration_ms", json!(duration_ms))
    }

    fn format_message(&self, level: &str, message: &str) -> String {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        let mut log_entry = json!({
            "timestamp": timestamp,
            "level": level,
            "component": self.component,
            "operation": self.operation,
            "message": message,
        });

        for (key, value) in &self.metadata {
            log_entry[key] = value.clone();
        }

        log_entry.to_string()
    }

    pub fn info(&self, message: &str) {
        info!("{}", self.format_message("INFO", message));
    }

    pub fn warn(&self, message: &str) {
        warn!("{}", self.format_message("WARN", message));
    }

    pub fn error(&self, message: &str) {
        error!("{}", self.format_message("ERROR", message));
    }

    pub fn debug(&self, message: &str) {
        debug!("{}", self.format_message("DEBUG", message));
    }

    pub fn trace(&self, message: &str) {
        trace!("{}", self.format_message("TRACE", message));
    }
}

/// Error logging utilities
pub struct ErrorLogger;

impl ErrorLogger {
    pub fn log_error(error: &crate::error::ExportError, context: Option<LogContext>) {
        let severity = error.severity();

        let mut log_context = context.unwrap_or_else(|| LogContext::new("error", "unknown"));
        log_context = log_context
            .with_metadata("error_type", json!(format!("{:?}", error)))
            .with_metadata("severity", json!(format!("{:?}", severity)));

        let message = format!("Error occurred: {}", error);

        match severity {
            crate::error::ErrorSeverity::Critical => log_context.error(&message),
            crate::error::ErrorSeverity::High => log_context.error(&message),
            crate::error::ErrorSeverity::Medium => log_context.warn(&message),
        }
    }
}

/// Pipeline metrics
pub struct MetricsLogger;

impl MetricsLogger {
    pub fn log_api_call(wallet: &str, page: usize, records: usize, duration_ms: u64, success: bool) {
        let context = LogContext::new("metrics", "api_call")
            .with_wallet(wallet)
            .with_metadata("page", json!(page))
            .with_metadata("records", json!(records))
            .with_duration_ms(duration_ms)
            .with_metadata("success", json!(success));

        if success {
            context.debug(&format!(
                "Page {} for {} returned {} records in {}ms",
                page, wallet, records, duration_ms
            ));
        } else {
            context.warn(&format!(
                "Page {} for {} failed after {}ms",
                page, wallet, duration_ms
            ));
        }
    }

    pub fn log_wallet_exported(wallet: &str, fetched: usize, classified: usize) {
        let context = LogContext::new("metrics", "wallet_exported")
            .with_wallet(wallet)
            .with_metadata("fetched", json!(fetched))
            .with_metadata("classified", json!(classified));

        context.info(&format!(
            "Wallet {} exported: {} transactions fetched, {} records classified",
            wallet, fetched, classified
        ));
    }

    pub fn log_export_summary(wallets: usize, rows: usize, output_path: &str) {
        let context = LogContext::new("metrics", "export_summary")
            .with_metadata("wallets", json!(wallets))
            .with_metadata("rows", json!(rows))
            .with_metadata("output_path", json!(output_path));

        context.info(&format!(
            "Export complete: {} rows from {} wallets written to {}",
            rows, wallets, output_path
        ));
    }
}

/// Initialize logging for the application
pub fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            use std::io::Write;

            // Structured entries are already JSON; pass them through as-is
            if serde_json::from_str::<Value>(record.args().to_string().as_str()).is_ok() {
                writeln!(buf, "{}", record.args())
            } else {
                writeln!(
                    buf,
                    "{} [{}] {}: {}",
                    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                    record.level(),
                    record.target(),
                    record.args()
                )
            }
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_log_context_creation() {
        let context = LogContext::new("test_component", "test_operation");
        assert_eq!(context.component, "test_component");
        assert_eq!(context.operation, "test_operation");
        assert!(context.metadata.is_empty());
    }

    #[test]
    fn test_log_context_with_metadata() {
        let context = LogContext::new("test", "test")
            .with_wallet("9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin")
            .with_signature("5h3k")
            .with_duration_ms(42);

        assert_eq!(
            context.metadata.get("wallet"),
            Some(&json!("9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin"))
        );
        assert_eq!(context.metadata.get("signature"), Some(&json!("5h3k")));
        assert_eq!(context.metadata.get("duration_ms"), Some(&json!(42)));
    }

    #[test]
    fn test_log_context_format_message() {
        let context = LogContext::new("test", "test").with_metadata("key", json!("value"));

        let message = context.format_message("INFO", "test message");

        let parsed: Value = serde_json::from_str(&message).expect("Should be valid JSON");
        assert_eq!(parsed["level"], "INFO");
        assert_eq!(parsed["component"], "test");
        assert_eq!(parsed["operation"], "test");
        assert_eq!(parsed["message"], "test message");
        assert_eq!(parsed["key"], "value");
    }

    #[test]
    fn test_error_logging() {
        let error = crate::error::ExportError::Auth(crate::error::AuthError::MissingKey);
        let context = LogContext::new("test", "error_test");

        // Should not panic
        ErrorLogger::log_error(&error, Some(context));
    }

    #[test]
    fn test_metrics_logging() {
        // Should not panic
        MetricsLogger::log_api_call("wallet1", 0, 100, 120, true);
        MetricsLogger::log_wallet_exported("wallet1", 100, 100);
        MetricsLogger::log_export_summary(2, 200, "/tmp/out.csv");
    }
}

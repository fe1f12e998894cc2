use crate::error::OutputError;
use crate::models::TaxRecord;
use std::fs::File;

/// Fixed output column schema. Order matters to downstream importers.
pub const CSV_HEADER: [&str; 9] = [
    "timestamp",
    "wallet",
    "type",
    "asset",
    "amount",
    "counterparty",
    "is_self_transfer",
    "cost_basis_usd",
    "tx_id",
];

/// Write one header row plus one row per record, in the order received.
/// Overwrites any existing file at `path` without confirmation.
pub fn write_records(path: &str, records: &[TaxRecord]) -> Result<(), OutputError> {
    let file = File::create(path).map_err(|e| OutputError::Io {
        path: path.to_string(),
        source: e,
    })?;
    let mut writer = csv::Writer::from_writer(file);

    writer.write_record(CSV_HEADER)?;

    for record in records {
        let amount = format_amount(record.amount);
        let cost_basis = record
            .cost_basis_usd
            .map(|v| v.to_string())
            .unwrap_or_default();
        writer.write_record([
            record.timestamp.as_str(),
            record.wallet.as_str(),
            record.tx_type.as_str(),
            record.asset.as_str(),
            amount.as_str(),
            record.counterparty.as_str(),
            if record.is_self_transfer {
                "true"
            } else {
                "false"
            },
            cost_basis.as_str(),
            record.tx_id.as_str(),
        ])?;
    }

    writer.flush().map_err(|e| OutputError::Io {
        path: path.to_string(),
        source: e,
    })?;
    Ok(())
}

fn format_amount(amount: f64) -> String {
    if amount == 0.0 {
        "0".to_string()
    } else {
        amount.to_string()
    }
}

use serde::{Deserialize, Serialize};

/// Fixed transaction-type taxonomy used in the CSV `type` column
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransactionType {
    Spam,
    Swap,
    NftMint,
    NftSale,
    Stake,
    Unstake,
    TransferIn,
    TransferOut,
    Fee,
    Unknown,
}

impl TransactionType {
    /// Label as written to the CSV
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Spam => "SPAM",
            TransactionType::Swap => "SWAP",
            TransactionType::NftMint => "NFT_MINT",
            TransactionType::NftSale => "NFT_SALE",
            TransactionType::Stake => "STAKE",
            TransactionType::Unstake => "UNSTAKE",
            TransactionType::TransferIn => "TRANSFER_IN",
            TransactionType::TransferOut => "TRANSFER_OUT",
            TransactionType::Fee => "FEE",
            TransactionType::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One per-asset flow relative to the wallet set. Positive amounts move
/// into the set, negative amounts move out. Transfers that never cross the
/// wallet-set boundary produce no movement.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetMovement {
    pub asset: String,
    pub mint: Option<String>,
    /// Signed UI-scale amount
    pub amount: f64,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// One classified output row. Exactly one per fetched transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxRecord {
    /// RFC 3339 UTC timestamp; empty when the source record had none
    pub timestamp: String,
    /// The wallet whose history produced this record
    pub wallet: String,
    pub tx_type: TransactionType,
    pub asset: String,
    pub amount: f64,
    pub counterparty: String,
    pub is_self_transfer: bool,
    /// Deferred: always None in this version, filled by a future PriceSource
    pub cost_basis_usd: Option<f64>,
    pub tx_id: String,
}

/// Extension seam for cost-basis computation: given an asset and the moment
/// it moved, return its USD unit price. Not implemented in this version.
pub trait PriceSource {
    fn price_usd(&self, asset: &str, mint: Option<&str>, timestamp: i64) -> Option<f64>;
}

/// The default price source: prices are never available, so cost basis
/// stays empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPricing;

impl PriceSource for NoPricing {
    fn price_usd(&self, _asset: &str, _mint: Option<&str>, _timestamp: i64) -> Option<f64> {
        None
    }
}

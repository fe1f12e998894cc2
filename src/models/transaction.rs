use serde::{Deserialize, Serialize};

/// One enriched transaction as returned by the Helius
/// `/v0/addresses/{address}/transactions` endpoint. Unknown fields are
/// ignored; the ones mapped here are the fixed external contract this
/// exporter consumes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedTransaction {
    pub signature: String,
    /// Unix timestamp in seconds
    #[serde(default)]
    pub timestamp: i64,
    /// Semantic category tag, e.g. "TRANSFER", "SWAP", "NFT_SALE"
    #[serde(rename = "type", default)]
    pub category: String,
    /// Program/protocol source tag, e.g. "JUPITER", "MAGIC_EDEN"
    #[serde(default)]
    pub source: String,
    /// Transaction fee in lamports
    #[serde(default)]
    pub fee: u64,
    #[serde(default)]
    pub fee_payer: Option<String>,
    #[serde(default)]
    pub native_transfers: Vec<NativeTransfer>,
    #[serde(default)]
    pub token_transfers: Vec<TokenTransfer>,
    #[serde(default)]
    pub instructions: Vec<Instruction>,
    /// Some payloads carry the program id at the top level
    #[serde(default)]
    pub program_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NativeTransfer {
    #[serde(default)]
    pub from_user_account: Option<String>,
    #[serde(default)]
    pub to_user_account: Option<String>,
    /// Amount in lamports
    #[serde(default)]
    pub amount: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenTransfer {
    #[serde(default)]
    pub from_user_account: Option<String>,
    #[serde(default)]
    pub to_user_account: Option<String>,
    /// Raw token amount, scaled by `token_decimals` to obtain UI units
    #[serde(default)]
    pub token_amount: f64,
    #[serde(default)]
    pub token_decimals: u32,
    #[serde(default)]
    pub mint: Option<String>,
    #[serde(default)]
    pub token_symbol: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Instruction {
    #[serde(default)]
    pub program_id: Option<String>,
}

/// Endpoints and asset of a transaction's primary transfer: the first native
/// transfer, else the first token transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryTransfer<'a> {
    pub from: Option<&'a str>,
    pub to: Option<&'a str>,
    pub asset: String,
}

impl EnrichedTransaction {
    pub fn primary_transfer(&self) -> Option<PrimaryTransfer<'_>> {
        if let Some(nt) = self.native_transfers.first() {
            return Some(PrimaryTransfer {
                from: nt.from_user_account.as_deref(),
                to: nt.to_user_account.as_deref(),
                asset: "SOL".to_string(),
            });
        }
        self.token_transfers.first().map(|tt| PrimaryTransfer {
            from: tt.from_user_account.as_deref(),
            to: tt.to_user_account.as_deref(),
            asset: tt.display_symbol(),
        })
    }

    /// Program id of the transaction: the top-level field when present,
    /// otherwise the first instruction's program id.
    pub fn resolved_program_id(&self) -> Option<&str> {
        if let Some(pid) = self.program_id.as_deref() {
            if !pid.is_empty() {
                return Some(pid);
            }
        }
        self.instructions
            .iter()
            .find_map(|ix| ix.program_id.as_deref())
    }

    /// Fee in SOL units
    pub fn fee_sol(&self) -> f64 {
        self.fee as f64 / 1e9
    }
}

impl TokenTransfer {
    /// UI-scale token amount
    pub fn ui_amount(&self) -> f64 {
        if self.token_decimals > 0 {
            self.token_amount / 10f64.powi(self.token_decimals as i32)
        } else {
            self.token_amount
        }
    }

    /// Symbol used in the CSV: token symbol, else mint, else "TOKEN"
    pub fn display_symbol(&self) -> String {
        self.token_symbol
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| s.to_uppercase())
            .or_else(|| self.mint.clone())
            .unwrap_or_else(|| "TOKEN".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "signature": "5UfD",
            "timestamp": 1700000000,
            "type": "TRANSFER",
            "source": "SYSTEM_PROGRAM",
            "fee": 5000,
            "feePayer": "walletA",
            "nativeTransfers": [
                {"fromUserAccount": "walletA", "toUserAccount": "walletB", "amount": 1500000000}
            ],
            "tokenTransfers": [],
            "instructions": [{"programId": "11111111111111111111111111111111"}]
        }"#
    }

    #[test]
    fn test_deserialize_enriched_transaction() {
        let tx: EnrichedTransaction = serde_json::from_str(sample_json()).unwrap();

        assert_eq!(tx.signature, "5UfD");
        assert_eq!(tx.timestamp, 1700000000);
        assert_eq!(tx.category, "TRANSFER");
        assert_eq!(tx.source, "SYSTEM_PROGRAM");
        assert_eq!(tx.fee, 5000);
        assert_eq!(tx.native_transfers.len(), 1);
        assert_eq!(tx.native_transfers[0].amount, 1500000000);
        assert_eq!(
            tx.native_transfers[0].from_user_account.as_deref(),
            Some("walletA")
        );
    }

    #[test]
    fn test_missing_optional_fields() {
        // Only the signature is required
        let tx: EnrichedTransaction = serde_json::from_str(r#"{"signature": "abc"}"#).unwrap();

        assert_eq!(tx.signature, "abc");
        assert_eq!(tx.timestamp, 0);
        assert!(tx.category.is_empty());
        assert!(tx.native_transfers.is_empty());
        assert!(tx.token_transfers.is_empty());
        assert!(tx.primary_transfer().is_none());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let tx: EnrichedTransaction =
            serde_json::from_str(r#"{"signature": "abc", "slot": 123, "description": "x"}"#)
                .unwrap();
        assert_eq!(tx.signature, "abc");
    }

    #[test]
    fn test_primary_transfer_prefers_native() {
        let tx: EnrichedTransaction = serde_json::from_str(sample_json()).unwrap();
        let primary = tx.primary_transfer().unwrap();

        assert_eq!(primary.from, Some("walletA"));
        assert_eq!(primary.to, Some("walletB"));
        assert_eq!(primary.asset, "SOL");
    }

    #[test]
    fn test_primary_transfer_falls_back_to_token() {
        let tx = EnrichedTransaction {
            signature: "sig".to_string(),
            timestamp: 0,
            category: String::new(),
            source: String::new(),
            fee: 0,
            fee_payer: None,
            native_transfers: vec![],
            token_transfers: vec![TokenTransfer {
                from_user_account: Some("a".to_string()),
                to_user_account: Some("b".to_string()),
                token_amount: 1000000.0,
                token_decimals: 6,
                mint: Some("EPjFW".to_string()),
                token_symbol: Some("usdc".to_string()),
            }],
            instructions: vec![],
            program_id: None,
        };

        let primary = tx.primary_transfer().unwrap();
        assert_eq!(primary.asset, "USDC");
        assert_eq!(primary.from, Some("a"));
    }

    #[test]
    fn test_resolved_program_id() {
        let tx: EnrichedTransaction = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(
            tx.resolved_program_id(),
            Some("11111111111111111111111111111111")
        );

        let with_top_level = EnrichedTransaction {
            program_id: Some("BGUMtop".to_string()),
            ..tx.clone()
        };
        assert_eq!(with_top_level.resolved_program_id(), Some("BGUMtop"));
    }

    #[test]
    fn test_token_ui_amount() {
        let tt = TokenTransfer {
            from_user_account: None,
            to_user_account: None,
            token_amount: 2500000.0,
            token_decimals: 6,
            mint: None,
            token_symbol: None,
        };
        assert!((tt.ui_amount() - 2.5).abs() < 1e-9);
        assert_eq!(tt.display_symbol(), "TOKEN");
    }

    #[test]
    fn test_fee_sol() {
        let tx: EnrichedTransaction = serde_json::from_str(sample_json()).unwrap();
        assert!((tx.fee_sol() - 0.000005).abs() < 1e-12);
    }
}

use crate::models::{AssetMovement, EnrichedTransaction, TaxRecord, TransactionType, WalletSet};
use chrono::{DateTime, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Mainnet Bubblegum (compressed-NFT) program ids observed attaching
/// airdropped spam cNFTs to wallets
pub const BUBBLEGUM_PROGRAM_IDS: &[&str] = &[
    "BGUMApV3npVqfY3VhXv9Gqz3r3Gq5h5xQmYkYw2nVBoz",
    "BGUMAp7x2hAqHcC1EHnHCqB6fN5teLo75fW4rWuBbY",
];

static BUBBLEGUM_PROGRAM_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| BUBBLEGUM_PROGRAM_IDS.iter().copied().collect());

/// A spam cNFT attach moves effectively no SOL
const SPAM_SOL_EPSILON: f64 = 0.00001;

/// Inputs shared by every classification rule
pub struct RuleContext<'a> {
    pub tx: &'a EnrichedTransaction,
    pub movements: &'a [AssetMovement],
    /// Lowercased category tag
    pub category: String,
    /// Lowercased source tag
    pub source: String,
    /// Net flow across all movements; positive is into the wallet set
    pub net: f64,
}

type Predicate = fn(&RuleContext) -> bool;

/// The classification table. Rules are evaluated top to bottom and the
/// first match wins; when none match the label is UNKNOWN. Precedence is
/// part of the contract: reordering entries changes behavior.
pub const RULES: &[(&str, Predicate, TransactionType)] = &[
    ("spam-cnft", is_spam_cnft, TransactionType::Spam),
    ("swap", is_swap, TransactionType::Swap),
    ("nft-mint", is_nft_mint, TransactionType::NftMint),
    ("nft-sale", is_nft_sale, TransactionType::NftSale),
    ("unstake", is_unstake, TransactionType::Unstake),
    ("stake", is_stake, TransactionType::Stake),
    ("transfer-in", is_transfer_in, TransactionType::TransferIn),
    ("transfer-out", is_transfer_out, TransactionType::TransferOut),
    ("fee-only", is_fee_only, TransactionType::Fee),
];

fn is_spam_cnft(ctx: &RuleContext) -> bool {
    let bubblegum = ctx.source.contains("bubblegum")
        || ctx
            .tx
            .resolved_program_id()
            .map(|pid| BUBBLEGUM_PROGRAM_SET.contains(pid))
            .unwrap_or(false);
    if !bubblegum {
        return false;
    }
    let sol_net: f64 = ctx
        .movements
        .iter()
        .filter(|m| m.asset == "SOL")
        .map(|m| m.amount)
        .sum();
    sol_net.abs() <= SPAM_SOL_EPSILON
}

fn is_swap(ctx: &RuleContext) -> bool {
    if ctx.source.contains("swap") || ctx.category == "swap" {
        return true;
    }
    // Movements both in and out across at least two distinct assets
    let has_in = ctx.movements.iter().any(|m| m.amount > 0.0);
    let has_out = ctx.movements.iter().any(|m| m.amount < 0.0);
    let distinct_assets: HashSet<&str> =
        ctx.movements.iter().map(|m| m.asset.as_str()).collect();
    has_in && has_out && distinct_assets.len() >= 2
}

fn is_nft_mint(ctx: &RuleContext) -> bool {
    ctx.category == "nft_mint" || ctx.category == "compressed_nft_mint"
}

fn is_nft_sale(ctx: &RuleContext) -> bool {
    ctx.category.contains("nft") || ctx.source.contains("nft")
}

fn is_unstake(ctx: &RuleContext) -> bool {
    ctx.category == "unstake" || (ctx.source.contains("stake") && ctx.net > 0.0)
}

fn is_stake(ctx: &RuleContext) -> bool {
    ctx.category == "stake" || ctx.source.contains("stake")
}

fn is_transfer_in(ctx: &RuleContext) -> bool {
    ctx.net > 0.0
}

fn is_transfer_out(ctx: &RuleContext) -> bool {
    ctx.net < 0.0
}

fn is_fee_only(ctx: &RuleContext) -> bool {
    ctx.movements.is_empty() && ctx.tx.fee > 0
}

/// Heuristic transaction classifier. Pure: same transaction and wallet set
/// always produce the same record.
pub struct Classifier<'a> {
    wallets: &'a WalletSet,
}

impl<'a> Classifier<'a> {
    pub fn new(wallets: &'a WalletSet) -> Self {
        Self { wallets }
    }

    /// Classify one transaction into exactly one output record for the
    /// given subject wallet.
    pub fn classify(&self, wallet: &str, tx: &EnrichedTransaction) -> TaxRecord {
        let movements = self.movements(tx);
        let label = self.label(tx, &movements);
        let is_self_transfer = self.is_self_transfer(tx);

        let (asset, amount, counterparty) = match movements.first() {
            Some(movement) => {
                // Counterparty is the far endpoint of the flow
                let counterparty = if movement.amount > 0.0 {
                    movement.from.clone()
                } else {
                    movement.to.clone()
                };
                (
                    movement.asset.clone(),
                    movement.amount,
                    counterparty.unwrap_or_default(),
                )
            }
            None => match tx.primary_transfer() {
                Some(primary) => {
                    let counterparty = [primary.from, primary.to]
                        .into_iter()
                        .flatten()
                        .find(|addr| *addr != wallet)
                        .unwrap_or_default();
                    (primary.asset, 0.0, counterparty.to_string())
                }
                None => (String::new(), 0.0, String::new()),
            },
        };

        TaxRecord {
            timestamp: format_timestamp(tx.timestamp),
            wallet: wallet.to_string(),
            tx_type: label,
            asset,
            amount,
            counterparty,
            is_self_transfer,
            cost_basis_usd: None,
            tx_id: tx.signature.clone(),
        }
    }

    /// Run the rule table; UNKNOWN when nothing matches
    pub fn label(&self, tx: &EnrichedTransaction, movements: &[AssetMovement]) -> TransactionType {
        let ctx = RuleContext {
            tx,
            movements,
            category: tx.category.to_lowercase(),
            source: tx.source.to_lowercase(),
            net: movements.iter().map(|m| m.amount).sum(),
        };

        for (_name, predicate, label) in RULES {
            if predicate(&ctx) {
                return *label;
            }
        }
        TransactionType::Unknown
    }

    /// Per-asset flows relative to the wallet set. Transfers entirely inside
    /// or entirely outside the set cancel out and produce no movement.
    pub fn movements(&self, tx: &EnrichedTransaction) -> Vec<AssetMovement> {
        let mut movements = Vec::new();

        for nt in &tx.native_transfers {
            let from = nt.from_user_account.as_deref();
            let to = nt.to_user_account.as_deref();
            let from_ours = self.wallets.contains_opt(from);
            let to_ours = self.wallets.contains_opt(to);
            let sol = nt.amount as f64 / 1e9;

            let amount = match (from_ours, to_ours) {
                (false, true) => sol,
                (true, false) => -sol,
                _ => continue,
            };
            movements.push(AssetMovement {
                asset: "SOL".to_string(),
                mint: None,
                amount,
                from: from.map(str::to_string),
                to: to.map(str::to_string),
            });
        }

        for tt in &tx.token_transfers {
            let from = tt.from_user_account.as_deref();
            let to = tt.to_user_account.as_deref();
            let from_ours = self.wallets.contains_opt(from);
            let to_ours = self.wallets.contains_opt(to);
            let ui = tt.ui_amount();

            let amount = match (from_ours, to_ours) {
                (false, true) => ui,
                (true, false) => -ui,
                _ => continue,
            };
            movements.push(AssetMovement {
                asset: tt.display_symbol(),
                mint: tt.mint.clone(),
                amount,
                from: from.map(str::to_string),
                to: to.map(str::to_string),
            });
        }

        movements
    }

    /// A transaction is a self-transfer when both endpoints of its primary
    /// transfer belong to the wallet set. Independent of the type label.
    pub fn is_self_transfer(&self, tx: &EnrichedTransaction) -> bool {
        match tx.primary_transfer() {
            Some(primary) => {
                self.wallets.contains_opt(primary.from) && self.wallets.contains_opt(primary.to)
            }
            None => false,
        }
    }
}

/// RFC 3339 UTC rendering; empty for the zero timestamp some records carry
fn format_timestamp(ts: i64) -> String {
    if ts == 0 {
        return String::new();
    }
    DateTime::<Utc>::from_timestamp(ts, 0)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

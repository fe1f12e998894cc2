pub mod record;
pub mod transaction;
pub mod wallet_set;

pub use record::{AssetMovement, NoPricing, PriceSource, TaxRecord, TransactionType};
pub use transaction::{
    EnrichedTransaction, Instruction, NativeTransfer, PrimaryTransfer, TokenTransfer,
};
pub use wallet_set::WalletSet;

use aasettle_domain::{BillId, Identity};
use chrono::{DateTime, Utc};

use crate::{
    error::{LedgerError, StoreError},
    model::{BillsByOwner, Command, SettlementsByOwner},
};

pub trait CommandParser: Send + Sync {
    /// `Ok(None)` means the message is not addressed to this bot.
    fn parse(&self, content: &str) -> Result<Option<Command>, LedgerError>;
}

/// Persists the bills and the settlement records as separate documents.
///
/// A document that does not exist yet loads as empty.
pub trait LedgerStore: Send + Sync {
    fn load_bills(&self) -> Result<BillsByOwner, StoreError>;
    fn load_settlements(&self) -> Result<SettlementsByOwner, StoreError>;
    fn save_bills(&self, bills: &BillsByOwner) -> Result<(), StoreError>;
    fn save_settlements(&self, settlements: &SettlementsByOwner) -> Result<(), StoreError>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub trait BillIdGenerator: Send + Sync {
    fn generate(&self) -> BillId;
}

/// Delivers reply text back to the chat the command came from.
pub trait ReplySink {
    fn reply(&self, to: &Identity, text: &str);
}

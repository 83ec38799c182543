use std::fmt;

use aasettle_domain::{Bill, BillId, BillStatus, SettlementRecord};
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequest {
    pub participants: Vec<String>,
    /// Amount literal as typed, currency marks already stripped.
    pub amount: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    List { filter: Option<BillStatus> },
    Detail { bill_id: BillId },
    Clear { bill_id: BillId },
    Create(CreateRequest),
}

pub type BillsByOwner = IndexMap<String, Vec<Bill>>;
pub type SettlementsByOwner = IndexMap<String, Vec<SettlementRecord>>;

/// Everything the ledger persists, keyed by owner id in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub bills: BillsByOwner,
    pub settlements: SettlementsByOwner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerDocument {
    Bills,
    Settlements,
}

impl LedgerDocument {
    pub const ALL: [Self; 2] = [Self::Bills, Self::Settlements];
}

impl fmt::Display for LedgerDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LedgerDocument::Bills => "bills",
            LedgerDocument::Settlements => "settlement records",
        })
    }
}

/// Result of a mutating ledger call.
///
/// `durable` is false when the in-memory change went through but writing it
/// to the store failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persisted<T> {
    pub value: T,
    pub durable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearResult {
    Cleared(Bill),
    AlreadyCleared(Bill),
}

impl ClearResult {
    pub fn bill(&self) -> &Bill {
        match self {
            ClearResult::Cleared(bill) | ClearResult::AlreadyCleared(bill) => bill,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillListing {
    pub bills: Vec<Bill>,
    pub pending_count: usize,
    pub filter: Option<BillStatus>,
}

#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod ledger;
pub mod message_processor;
pub mod model;
pub mod ports;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{LedgerError, StoreError, Usage};
pub use ledger::{BillLedger, LedgerConfig};
pub use message_processor::{MessageProcessor, ProcessingOutcome};
pub use model::{
    BillListing, BillsByOwner, ClearResult, Command, CreateRequest, LedgerDocument,
    LedgerSnapshot, Persisted, SettlementsByOwner,
};
pub use ports::{BillIdGenerator, Clock, CommandParser, LedgerStore, ReplySink};

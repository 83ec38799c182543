#![warn(clippy::uninlined_format_args)]

pub mod model;
pub mod services;

pub use model::{
    AmountError, Bill, BillId, BillStatus, ClearOutcome, Debt, Identity, Money, SettlementRecord,
};
pub use services::{RoundingMode, Split, SplitCalculator, SplitError};

use std::path::PathBuf;

use aasettle_domain::{AmountError, BillId, SplitError};

use crate::model::LedgerDocument;

/// Which command's usage line a caller should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    Create,
    Detail,
    Clear,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not a valid ledger file: {detail}")]
    Corrupt { path: PathBuf, detail: String },
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),
    #[error("missing arguments for {0:?}")]
    MissingArguments(Usage),
    #[error("unknown status filter '{0}'")]
    InvalidFilter(String),
    #[error("bill {bill_id} not found")]
    NotFound { bill_id: BillId },
    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
    /// The document failed to load at startup, so writing it would lose data.
    #[error("{0} failed to load and are not written")]
    ReadOnly(LedgerDocument),
}

impl From<SplitError> for LedgerError {
    fn from(err: SplitError) -> Self {
        match err {
            SplitError::InvalidAmount(amount) => LedgerError::InvalidAmount(amount),
            // Normalization always adds the payer, so this only means no caller input.
            SplitError::NoParticipants => LedgerError::MissingArguments(Usage::Create),
        }
    }
}

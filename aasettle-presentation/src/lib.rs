#![warn(clippy::uninlined_format_args)]

pub mod bill_presenter;
pub mod error_presenter;

pub use bill_presenter::ReplyPresenter;
pub use error_presenter::format_ledger_error;

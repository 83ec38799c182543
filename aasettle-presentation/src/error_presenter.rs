use aasettle_application::{LedgerError, Usage};
use aasettle_domain::AmountError;
use aasettle_i18n as i18n;

pub fn format_ledger_error(error: &LedgerError, prefix: &str) -> String {
    match error {
        LedgerError::InvalidAmount(AmountError::OutOfRange) => i18n::AMOUNT_TOO_LARGE.to_string(),
        LedgerError::InvalidAmount(_) => i18n::INVALID_AMOUNT.to_string(),
        LedgerError::MissingArguments(Usage::Create) => i18n::create_usage(prefix),
        LedgerError::MissingArguments(Usage::Detail) => i18n::detail_usage(prefix),
        LedgerError::MissingArguments(Usage::Clear) => i18n::clear_usage(prefix),
        LedgerError::InvalidFilter(filter) => i18n::unknown_filter(filter, prefix),
        LedgerError::NotFound { bill_id } => i18n::not_found(bill_id, prefix),
        LedgerError::Persistence(_) | LedgerError::ReadOnly(_) => {
            i18n::PERSISTENCE_WARNING.to_string()
        }
    }
}

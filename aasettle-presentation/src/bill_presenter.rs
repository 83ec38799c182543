use std::fmt::Write;

use aasettle_application::{BillListing, ClearResult, Persisted, ProcessingOutcome};
use aasettle_domain::{Bill, BillStatus};
use aasettle_i18n as i18n;
use chrono::{DateTime, FixedOffset, Local, Offset, Utc};

use crate::error_presenter::format_ledger_error;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Turns processing outcomes into chat replies.
pub struct ReplyPresenter {
    prefix: String,
    offset: FixedOffset,
}

impl ReplyPresenter {
    /// Renders times in the host's current local offset.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::with_offset(prefix, Local::now().offset().fix())
    }

    pub fn with_offset(prefix: impl Into<String>, offset: FixedOffset) -> Self {
        Self {
            prefix: prefix.into(),
            offset,
        }
    }

    /// `None` when the message should go unanswered.
    pub fn render(&self, outcome: &ProcessingOutcome) -> Option<String> {
        let text = match outcome {
            ProcessingOutcome::Ignored => return None,
            ProcessingOutcome::Help => i18n::help(&self.prefix),
            ProcessingOutcome::Created(created) => self.render_created(created),
            ProcessingOutcome::Listed(listing) => self.render_listing(listing),
            ProcessingOutcome::Detail(bill) => self.render_detail(bill),
            ProcessingOutcome::Cleared(cleared) => render_cleared(cleared),
            ProcessingOutcome::Failed(err) => format_ledger_error(err, &self.prefix),
        };
        Some(text)
    }

    fn render_created(&self, created: &Persisted<Bill>) -> String {
        let bill = &created.value;
        let mut lines = vec![
            i18n::BILL_CREATED.to_string(),
            i18n::field(i18n::ID, bill.id()),
            format!(
                "{} | {}",
                i18n::field(i18n::AMOUNT, i18n::money(bill.amount())),
                i18n::field(i18n::PARTICIPANTS, bill.participants().join(", "))
            ),
            format!(
                "{} | {}",
                i18n::field(i18n::PER_PERSON, i18n::money(bill.per_person_share())),
                i18n::field(i18n::DESCRIPTION, bill.description())
            ),
        ];
        if !bill.remainder().is_zero() {
            lines.push(i18n::field(i18n::REMAINDER, i18n::money(bill.remainder())));
        }
        lines.push(i18n::next_steps(&self.prefix, bill.id()));
        with_durability(lines.join("\n"), created.durable)
    }

    fn render_listing(&self, listing: &BillListing) -> String {
        if listing.bills.is_empty() {
            return match listing.filter {
                None => i18n::no_bills(&self.prefix),
                Some(status) => {
                    i18n::no_bills_with_status(filter_label(status), listing.pending_count)
                }
            };
        }

        let mut out = format!("{}\n{}\n", i18n::list_header(listing.pending_count), i18n::RULE);
        for (index, bill) in listing.bills.iter().enumerate() {
            let _ = writeln!(
                out,
                "{}. {} | {}",
                index + 1,
                i18n::field(i18n::ID, bill.id()),
                status_label(bill.status())
            );
            let _ = writeln!(
                out,
                "   {} | {}",
                i18n::field(i18n::AMOUNT, i18n::money(bill.amount())),
                i18n::field(i18n::DESCRIPTION, bill.description())
            );
            let _ = writeln!(
                out,
                "   {}",
                i18n::field(i18n::TIME, self.format_time(bill.created_at()))
            );
            let _ = writeln!(out, "{}", i18n::RULE);
        }
        out.truncate(out.trim_end().len());
        out
    }

    fn render_detail(&self, bill: &Bill) -> String {
        let mut lines = vec![
            i18n::detail_header(bill.id()),
            i18n::RULE.to_string(),
            format!(
                "{} | {}",
                i18n::field(i18n::AMOUNT, i18n::money(bill.amount())),
                i18n::field(i18n::DESCRIPTION, bill.description())
            ),
            format!(
                "{} | {}",
                i18n::field(i18n::PARTICIPANTS, bill.participants().join(", ")),
                i18n::field(i18n::PER_PERSON, i18n::money(bill.per_person_share()))
            ),
            format!(
                "{} | {}",
                status_label(bill.status()),
                i18n::field(i18n::TIME, self.format_time(bill.created_at()))
            ),
        ];
        if !bill.remainder().is_zero() {
            lines.push(i18n::field(i18n::REMAINDER, i18n::money(bill.remainder())));
        }
        if let (Some(clearer), Some(at)) = (bill.clearer(), bill.cleared_at()) {
            lines.push(i18n::cleared_by(&clearer.name, self.format_time(at)));
        }

        lines.push(i18n::DEBTS.to_string());
        let debts = bill.debts();
        if debts.is_empty() {
            lines.push(i18n::NO_DEBTS.to_string());
        }
        lines.extend(
            debts
                .iter()
                .map(|debt| i18n::debt_line(&debt.debtor, &debt.creditor, debt.amount)),
        );
        lines.join("\n")
    }

    fn format_time(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.offset).format(TIME_FORMAT).to_string()
    }
}

fn render_cleared(cleared: &Persisted<ClearResult>) -> String {
    match &cleared.value {
        ClearResult::Cleared(bill) => {
            with_durability(i18n::bill_cleared(bill.id()), cleared.durable)
        }
        ClearResult::AlreadyCleared(bill) => i18n::already_cleared(bill.id()),
    }
}

fn status_label(status: BillStatus) -> &'static str {
    match status {
        BillStatus::Pending => i18n::STATUS_PENDING,
        BillStatus::Cleared => i18n::STATUS_CLEARED,
    }
}

fn filter_label(status: BillStatus) -> &'static str {
    match status {
        BillStatus::Pending => i18n::FILTER_PENDING,
        BillStatus::Cleared => i18n::FILTER_CLEARED,
    }
}

fn with_durability(text: String, durable: bool) -> String {
    if durable {
        text
    } else {
        format!("{text}\n{}", i18n::PERSISTENCE_WARNING)
    }
}

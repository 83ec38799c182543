//! Even split of a bill total among its participants.
//!
//! The share is rounded to cents and whatever does not divide evenly stays
//! with the payer as the remainder, so that
//! `per_person_share * n + remainder == total` holds exactly.

use indexmap::IndexSet;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::model::{AmountError, Debt, Money};

/// Rounding rule applied wherever ledger money is computed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RoundingMode {
    /// Round half away from zero (0.005 -> 0.01).
    #[default]
    HalfUp,
    /// Round half to nearest even digit (banker's rounding).
    HalfEven,
}

impl RoundingMode {
    pub(crate) fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SplitError {
    #[error(transparent)]
    InvalidAmount(#[from] AmountError),
    #[error("a bill needs at least one participant")]
    NoParticipants,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub total: Money,
    pub per_person_share: Money,
    pub remainder: Money,
    pub debts: Vec<Debt>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SplitCalculator {
    mode: RoundingMode,
}

impl SplitCalculator {
    pub fn new(mode: RoundingMode) -> Self {
        Self { mode }
    }

    pub fn rounding_mode(&self) -> RoundingMode {
        self.mode
    }

    /// Trims and de-duplicates names in first-seen order, then appends the
    /// payer when they are not already listed.
    pub fn normalize_participants<I, S>(names: I, payer_name: &str) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut participants: Vec<String> = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .filter(|name| !name.is_empty())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();
        if !participants.iter().any(|name| name == payer_name) {
            participants.push(payer_name.to_string());
        }
        participants
    }

    pub fn split(
        &self,
        total: Money,
        participants: &[String],
        payer_name: &str,
    ) -> Result<Split, SplitError> {
        let total = Money::quantize(total.as_decimal(), self.mode).checked()?;
        if !total.is_positive() {
            return Err(AmountError::NotPositive(total).into());
        }
        if participants.is_empty() {
            return Err(SplitError::NoParticipants);
        }

        let count = participants.len();
        let exact_share = total
            .as_decimal()
            .checked_div(Decimal::from(count))
            .ok_or(AmountError::OutOfRange)?;
        let per_person_share = Money::quantize(exact_share, self.mode);
        let distributed = per_person_share
            .checked_mul_count(count)
            .ok_or(AmountError::OutOfRange)?;
        let remainder = Money::quantize((total - distributed).as_decimal(), self.mode);
        if distributed.checked_add(remainder) != Some(total) {
            return Err(AmountError::OutOfRange.into());
        }

        Ok(Split {
            total,
            per_person_share,
            remainder,
            debts: debts_for(participants, payer_name, per_person_share),
        })
    }
}

pub(crate) fn debts_for(participants: &[String], payer_name: &str, share: Money) -> Vec<Debt> {
    participants
        .iter()
        .filter(|name| name.as_str() != payer_name)
        .map(|debtor| Debt {
            debtor: debtor.clone(),
            creditor: payer_name.to_string(),
            amount: share,
        })
        .collect()
}

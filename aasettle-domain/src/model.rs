use std::{
    fmt,
    ops::{Add, Neg, Sub},
    str::FromStr,
};

use chrono::{DateTime, SubsecRound, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::services::{RoundingMode, split_calculator::debts_for};

/// Fractional digits kept for every amount in the ledger.
pub const CURRENCY_SCALE: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("amount must be positive (got {0})")]
    NotPositive(Money),
    #[error("amount is out of range")]
    OutOfRange,
}

/// A currency amount held at [`CURRENCY_SCALE`] fractional digits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest accepted magnitude, 10^15 in major units. Cents stay exact
    /// through every split of an amount up to this size.
    pub const MAX: Self = Self(Decimal::from_parts(
        0x5D8A_0000,
        0x0163_4578,
        0,
        false,
        CURRENCY_SCALE,
    ));

    /// Rounds `value` to currency precision with the given mode.
    pub fn quantize(value: Decimal, mode: RoundingMode) -> Self {
        let mut rounded = value.round_dp_with_strategy(CURRENCY_SCALE, mode.strategy());
        rounded.rescale(CURRENCY_SCALE);
        Self(rounded)
    }

    /// Parses a plain decimal literal (`100`, `-5`, `12.345`) and rounds it.
    pub fn parse(input: &str, mode: RoundingMode) -> Result<Self, AmountError> {
        let value = Decimal::from_str(input.trim())
            .map_err(|_| AmountError::NotANumber(input.to_string()))?;
        Self::quantize(value, mode).checked()
    }

    /// `Err(OutOfRange)` when the amount exceeds [`Money::MAX`] in magnitude.
    pub fn checked(self) -> Result<Self, AmountError> {
        if self.0.abs() > Self::MAX.0 {
            return Err(AmountError::OutOfRange);
        }
        Ok(self)
    }

    pub fn from_minor_units(units: i64) -> Self {
        Self(Decimal::new(units, CURRENCY_SCALE))
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_mul_count(self, count: usize) -> Option<Self> {
        self.0.checked_mul(Decimal::from(count)).map(Self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Legacy files carry floats such as 33.33; pin them back to cents.
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Ok(Self::quantize(value, RoundingMode::HalfUp))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

/// Who sent a command: a stable host id plus the name shown in bills.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
}

impl Identity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BillId(String);

impl BillId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BillId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    Pending,
    Cleared,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Debt {
    pub debtor: String,
    pub creditor: String,
    pub amount: Money,
}

/// Audit entry written exactly once, when a bill becomes cleared.
///
/// Records from the chat plugin's own files carry only a local `time` string
/// and the clearer's bare name; those load with `amount` and `cleared_at`
/// unset and an empty clearer id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredSettlement")]
pub struct SettlementRecord {
    pub bill_id: BillId,
    #[serde(rename = "desc")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,
    pub clearer: Identity,
    #[serde(
        rename = "ts",
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_seconds_option"
    )]
    pub cleared_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

#[derive(Deserialize)]
struct StoredSettlement {
    bill_id: BillId,
    desc: String,
    #[serde(default)]
    amount: Option<Money>,
    clearer: StoredClearer,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    ts: Option<DateTime<Utc>>,
    #[serde(default)]
    time: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredClearer {
    Identity(Identity),
    Name(String),
}

impl From<StoredSettlement> for SettlementRecord {
    fn from(stored: StoredSettlement) -> Self {
        let clearer = match stored.clearer {
            StoredClearer::Identity(identity) => identity,
            StoredClearer::Name(name) => Identity::new(String::new(), name),
        };
        Self {
            bill_id: stored.bill_id,
            description: stored.desc,
            amount: stored.amount,
            clearer,
            cleared_at: stored.ts,
            time: stored.time,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ClearOutcome {
    Cleared(SettlementRecord),
    AlreadyCleared,
}

/// One shared expense.
///
/// The split figures are fixed at creation; the only later mutation is the
/// one-way transition to [`BillStatus::Cleared`] through [`Bill::clear`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    #[serde(rename = "bill_id")]
    id: BillId,
    payer: Identity,
    amount: Money,
    #[serde(rename = "desc")]
    description: String,
    #[serde(rename = "people")]
    participants: Vec<String>,
    #[serde(rename = "per")]
    per_person_share: Money,
    #[serde(rename = "diff")]
    remainder: Money,
    status: BillStatus,
    #[serde(rename = "ts", with = "chrono::serde::ts_seconds")]
    created_at: DateTime<Utc>,
    #[serde(
        rename = "clear_ts",
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_seconds_option"
    )]
    cleared_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    clearer: Option<Identity>,
}

impl Bill {
    /// Builds a pending bill from an already computed split.
    ///
    /// `participants` must be the normalized list the split was computed over.
    pub fn new(
        id: BillId,
        payer: Identity,
        description: impl Into<String>,
        participants: Vec<String>,
        split: &crate::Split,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            payer,
            amount: split.total,
            description: description.into(),
            participants,
            per_person_share: split.per_person_share,
            remainder: split.remainder,
            status: BillStatus::Pending,
            created_at: created_at.trunc_subsecs(0),
            cleared_at: None,
            clearer: None,
        }
    }

    pub fn id(&self) -> &BillId {
        &self.id
    }

    pub fn payer(&self) -> &Identity {
        &self.payer
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    pub fn per_person_share(&self) -> Money {
        self.per_person_share
    }

    pub fn remainder(&self) -> Money {
        self.remainder
    }

    pub fn status(&self) -> BillStatus {
        self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status == BillStatus::Pending
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn cleared_at(&self) -> Option<DateTime<Utc>> {
        self.cleared_at
    }

    pub fn clearer(&self) -> Option<&Identity> {
        self.clearer.as_ref()
    }

    /// Every participant except the payer owes the payer one share.
    pub fn debts(&self) -> Vec<Debt> {
        debts_for(&self.participants, &self.payer.name, self.per_person_share)
    }

    pub fn clear(&mut self, clearer: Identity, at: DateTime<Utc>) -> ClearOutcome {
        if self.status == BillStatus::Cleared {
            return ClearOutcome::AlreadyCleared;
        }

        let at = at.trunc_subsecs(0);
        self.status = BillStatus::Cleared;
        self.cleared_at = Some(at);
        self.clearer = Some(clearer.clone());

        ClearOutcome::Cleared(SettlementRecord {
            bill_id: self.id.clone(),
            description: self.description.clone(),
            amount: Some(self.amount),
            clearer,
            cleared_at: Some(at),
            time: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SplitCalculator;
    use chrono::TimeZone;
    use rstest::rstest;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().expect("valid timestamp")
    }

    fn sample_bill() -> Bill {
        let payer = Identity::new("u1", "Lin");
        let participants = SplitCalculator::normalize_participants(["Chen", "Wang"], &payer.name);
        let split = SplitCalculator::default()
            .split(Money::from_minor_units(10_000), &participants, &payer.name)
            .expect("split should succeed");
        Bill::new(
            BillId::from("abc123"),
            payer,
            "dinner",
            participants,
            &split,
            at(1_700_000_000),
        )
    }

    #[rstest]
    #[case::integer("100", "100.00")]
    #[case::half_up("12.345", "12.35")]
    #[case::negative("-5", "-5.00")]
    #[case::padded(" 7.1 ", "7.10")]
    fn parse_rounds_to_cents(#[case] input: &str, #[case] expected: &str) {
        let money = Money::parse(input, RoundingMode::HalfUp).expect("should parse");
        assert_eq!(money.to_string(), expected);
    }

    #[rstest]
    #[case::above_max("1000000000000000.01")]
    #[case::below_negative_max("-1000000000000000.01")]
    #[case::beyond_cent_precision("792281625142643375935439503.35")]
    fn parse_rejects_amounts_beyond_max(#[case] input: &str) {
        assert!(matches!(
            Money::parse(input, RoundingMode::HalfUp),
            Err(AmountError::OutOfRange)
        ));
    }

    #[test]
    fn parse_accepts_max() {
        let money = Money::parse("1000000000000000", RoundingMode::HalfUp).expect("should parse");
        assert_eq!(money, Money::MAX);
        assert_eq!(money.to_string(), "1000000000000000.00");
    }

    #[test]
    fn float_amounts_deserialize_to_cents() {
        let money: Money = serde_json::from_str("33.333").expect("deserialize");
        assert_eq!(money, Money::from_minor_units(3_333));
        assert_eq!(serde_json::to_string(&money).expect("serialize"), "\"33.33\"");
    }

    #[rstest]
    #[case::word("abc")]
    #[case::empty("")]
    #[case::trailing_text("100元")]
    fn parse_rejects_non_numbers(#[case] input: &str) {
        assert!(matches!(
            Money::parse(input, RoundingMode::HalfUp),
            Err(AmountError::NotANumber(_))
        ));
    }

    #[test]
    fn clear_is_one_way_and_idempotent() {
        let mut bill = sample_bill();
        let clearer = Identity::new("u2", "Chen");

        let first = bill.clear(clearer.clone(), at(1_700_000_100));
        let ClearOutcome::Cleared(record) = first else {
            panic!("first clear should transition");
        };
        assert_eq!(record.bill_id, BillId::from("abc123"));
        assert_eq!(record.clearer, clearer);
        assert_eq!(record.amount, Some(Money::from_minor_units(10_000)));

        let snapshot = bill.clone();
        assert_eq!(
            bill.clear(Identity::new("u3", "Wang"), at(1_700_000_200)),
            ClearOutcome::AlreadyCleared
        );
        assert_eq!(bill, snapshot);
        assert_eq!(bill.status(), BillStatus::Cleared);
        assert_eq!(bill.cleared_at(), Some(at(1_700_000_100)));
    }

    #[test]
    fn debts_exclude_payer() {
        let bill = sample_bill();
        let debtors: Vec<_> = bill.debts().into_iter().map(|debt| debt.debtor).collect();
        assert_eq!(debtors, vec!["Chen".to_string(), "Wang".to_string()]);
        assert!(bill.debts().iter().all(|debt| debt.creditor == "Lin"));
    }

    #[test]
    fn json_round_trip_preserves_every_field() {
        let mut bill = sample_bill();
        bill.clear(Identity::new("u2", "Chen"), at(1_700_000_500));

        let json = serde_json::to_string(&bill).expect("serialize");
        let restored: Bill = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, bill);
    }

    #[test]
    fn legacy_plugin_record_loads() {
        let json = r#"{
            "bill_id": "a1b2c3",
            "payer": {"id": "10001", "name": "陈"},
            "amount": 100.0,
            "desc": "日常消费",
            "people": ["陈", "李"],
            "per": 50.0,
            "diff": 0.0,
            "status": "pending",
            "time": "2024-01-01 12:00:00",
            "ts": 1704081600,
            "debts": [{"debtor": "李", "creditor": "陈", "amount": 50.0}]
        }"#;

        let bill: Bill = serde_json::from_str(json).expect("legacy bill should load");
        assert_eq!(bill.amount(), Money::from_minor_units(10_000));
        assert_eq!(bill.per_person_share(), Money::from_minor_units(5_000));
        assert!(bill.is_pending());
        assert_eq!(bill.debts().len(), 1);
        assert_eq!(bill.created_at(), at(1_704_081_600));
    }

    #[test]
    fn legacy_settlement_record_loads() {
        let json = r#"{
            "bill_id": "a1b2c3",
            "desc": "日常消费",
            "time": "2024-01-02 08:00:00",
            "clearer": "陈"
        }"#;

        let record: SettlementRecord =
            serde_json::from_str(json).expect("legacy record should load");
        assert_eq!(record.bill_id, BillId::from("a1b2c3"));
        assert_eq!(record.clearer, Identity::new("", "陈"));
        assert_eq!(record.amount, None);
        assert_eq!(record.cleared_at, None);
        assert_eq!(record.time.as_deref(), Some("2024-01-02 08:00:00"));

        let rewritten = serde_json::to_value(&record).expect("serialize");
        assert_eq!(rewritten["time"], "2024-01-02 08:00:00");
        assert!(rewritten.get("ts").is_none());
    }

    #[test]
    fn settlement_record_round_trips() {
        let mut bill = sample_bill();
        let outcome = bill.clear(Identity::new("u2", "Chen"), at(1_700_000_100));
        let ClearOutcome::Cleared(record) = outcome else {
            panic!("first clear should transition");
        };

        let json = serde_json::to_value(&record).expect("serialize");
        assert_eq!(json["ts"], 1_700_000_100);
        assert_eq!(json["clearer"]["name"], "Chen");
        let restored: SettlementRecord = serde_json::from_value(json).expect("deserialize");
        assert_eq!(restored, record);
    }
}

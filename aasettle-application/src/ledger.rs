use std::sync::Mutex;

use aasettle_domain::{
    Bill, BillId, BillStatus, ClearOutcome, Identity, Money, RoundingMode, SettlementRecord,
    SplitCalculator,
};
use dashmap::DashMap;
use indexmap::IndexMap;

use crate::{
    error::{LedgerError, StoreError},
    model::{ClearResult, LedgerDocument, LedgerSnapshot, Persisted},
    ports::{BillIdGenerator, Clock, LedgerStore},
};

/// Fresh ids tried before falling back to suffixing.
const MAX_ID_ATTEMPTS: usize = 8;

#[derive(Debug, Clone)]
pub struct LedgerConfig {
    pub rounding_mode: RoundingMode,
    pub default_description: String,
}

/// Per-owner bill lists plus the settlement audit trail.
///
/// Each owner's list is mutated under that owner's map entry. Saves take a
/// single lock and write only the documents a mutation touched; a failed
/// save leaves the in-memory state authoritative. A document that failed to
/// load is never written for the life of the ledger.
pub struct BillLedger<'a> {
    store: &'a dyn LedgerStore,
    clock: &'a dyn Clock,
    ids: &'a dyn BillIdGenerator,
    calculator: SplitCalculator,
    default_description: String,
    bills: DashMap<String, Vec<Bill>>,
    settlements: DashMap<String, Vec<SettlementRecord>>,
    bills_writable: bool,
    settlements_writable: bool,
    save_lock: Mutex<()>,
}

impl<'a> BillLedger<'a> {
    /// Loads each document on its own. One that cannot be read starts empty
    /// and stays read-only.
    pub fn open(
        store: &'a dyn LedgerStore,
        clock: &'a dyn Clock,
        ids: &'a dyn BillIdGenerator,
        config: LedgerConfig,
    ) -> Self {
        let (bills, bills_writable) = loaded(LedgerDocument::Bills, store.load_bills());
        let (settlements, settlements_writable) =
            loaded(LedgerDocument::Settlements, store.load_settlements());

        tracing::info!(
            owners = bills.len(),
            bills = bills.values().map(Vec::len).sum::<usize>(),
            settlements = settlements.values().map(Vec::len).sum::<usize>(),
            "Ledger loaded"
        );

        Self {
            store,
            clock,
            ids,
            calculator: SplitCalculator::new(config.rounding_mode),
            default_description: config.default_description,
            bills: bills.into_iter().collect(),
            settlements: settlements.into_iter().collect(),
            bills_writable,
            settlements_writable,
            save_lock: Mutex::new(()),
        }
    }

    pub fn rounding_mode(&self) -> RoundingMode {
        self.calculator.rounding_mode()
    }

    pub fn create_bill<S: AsRef<str>>(
        &self,
        owner: &Identity,
        participants: &[S],
        amount: Money,
        description: Option<&str>,
    ) -> Result<Persisted<Bill>, LedgerError> {
        let participants = SplitCalculator::normalize_participants(participants, &owner.name);
        let split = self.calculator.split(amount, &participants, &owner.name)?;
        let description = description
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or(&self.default_description);

        let bill = {
            let mut owned = self.bills.entry(owner.id.clone()).or_default();
            let id = self.unique_id(&owned);
            let bill = Bill::new(
                id,
                owner.clone(),
                description,
                participants,
                &split,
                self.clock.now(),
            );
            owned.push(bill.clone());
            bill
        };

        tracing::info!(
            owner = %owner.id,
            bill_id = %bill.id(),
            amount = %bill.amount(),
            participants = bill.participants().len(),
            "Bill created"
        );

        Ok(Persisted {
            value: bill,
            durable: self.save(&[LedgerDocument::Bills]),
        })
    }

    /// Owner's bills, newest first, optionally filtered and truncated.
    ///
    /// Bills created in the same second keep reverse insertion order.
    pub fn list_bills(
        &self,
        owner_id: &str,
        filter: Option<BillStatus>,
        limit: Option<usize>,
    ) -> Vec<Bill> {
        let Some(owned) = self.bills.get(owner_id) else {
            return Vec::new();
        };

        let mut bills: Vec<Bill> = owned
            .iter()
            .rev()
            .filter(|bill| filter.is_none_or(|status| bill.status() == status))
            .cloned()
            .collect();
        bills.sort_by_key(|bill| std::cmp::Reverse(bill.created_at()));
        if let Some(limit) = limit {
            bills.truncate(limit);
        }
        bills
    }

    pub fn pending_count(&self, owner_id: &str) -> usize {
        self.bills
            .get(owner_id)
            .map_or(0, |owned| owned.iter().filter(|bill| bill.is_pending()).count())
    }

    pub fn get_bill(&self, owner_id: &str, bill_id: &BillId) -> Result<Bill, LedgerError> {
        self.bills
            .get(owner_id)
            .and_then(|owned| owned.iter().find(|bill| bill.id() == bill_id).cloned())
            .ok_or_else(|| LedgerError::NotFound {
                bill_id: bill_id.clone(),
            })
    }

    /// Marks a bill cleared. Clearing an already cleared bill changes nothing.
    pub fn clear_bill(
        &self,
        owner_id: &str,
        bill_id: &BillId,
        clearer: &Identity,
    ) -> Result<Persisted<ClearResult>, LedgerError> {
        let (bill, outcome) = {
            let mut owned = self
                .bills
                .get_mut(owner_id)
                .ok_or_else(|| LedgerError::NotFound {
                    bill_id: bill_id.clone(),
                })?;
            let bill = owned
                .iter_mut()
                .find(|bill| bill.id() == bill_id)
                .ok_or_else(|| LedgerError::NotFound {
                    bill_id: bill_id.clone(),
                })?;
            let outcome = bill.clear(clearer.clone(), self.clock.now());
            (bill.clone(), outcome)
        };

        let ClearOutcome::Cleared(record) = outcome else {
            return Ok(Persisted {
                value: ClearResult::AlreadyCleared(bill),
                durable: true,
            });
        };

        self.settlements
            .entry(owner_id.to_string())
            .or_default()
            .push(record);

        tracing::info!(
            owner = %owner_id,
            bill_id = %bill_id,
            clearer = %clearer.id,
            "Bill cleared"
        );

        Ok(Persisted {
            value: ClearResult::Cleared(bill),
            durable: self.save(&LedgerDocument::ALL),
        })
    }

    pub fn settlements(&self, owner_id: &str) -> Vec<SettlementRecord> {
        self.settlements
            .get(owner_id)
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// Writes every writable document and reports the first failure.
    pub fn flush(&self) -> Result<(), LedgerError> {
        let _guard = self.save_lock.lock().unwrap_or_else(|e| e.into_inner());
        LedgerDocument::ALL
            .into_iter()
            .map(|document| self.write(document))
            .fold(Ok(()), Result::and)
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            bills: sorted_by_owner(&self.bills),
            settlements: sorted_by_owner(&self.settlements),
        }
    }

    fn save(&self, documents: &[LedgerDocument]) -> bool {
        let _guard = self.save_lock.lock().unwrap_or_else(|e| e.into_inner());
        documents
            .iter()
            .fold(true, |durable, &document| match self.write(document) {
                Ok(()) => durable,
                Err(e) => {
                    tracing::error!(
                        %document,
                        error = %e,
                        "Failed to save; keeping in-memory state"
                    );
                    false
                }
            })
    }

    fn write(&self, document: LedgerDocument) -> Result<(), LedgerError> {
        match document {
            LedgerDocument::Bills if self.bills_writable => {
                self.store.save_bills(&sorted_by_owner(&self.bills))?
            }
            LedgerDocument::Settlements if self.settlements_writable => self
                .store
                .save_settlements(&sorted_by_owner(&self.settlements))?,
            _ => return Err(LedgerError::ReadOnly(document)),
        }
        Ok(())
    }

    fn unique_id(&self, owned: &[Bill]) -> BillId {
        let taken = |id: &BillId| owned.iter().any(|bill| bill.id() == id);

        let mut candidate = self.ids.generate();
        for _ in 1..MAX_ID_ATTEMPTS {
            if !taken(&candidate) {
                return candidate;
            }
            candidate = self.ids.generate();
        }

        let base = candidate;
        (1..)
            .map(|n| BillId::new(format!("{base}{n}")))
            .find(|id| !taken(id))
            .unwrap_or(base)
    }
}

fn loaded<T: Default>(document: LedgerDocument, result: Result<T, StoreError>) -> (T, bool) {
    match result {
        Ok(value) => (value, true),
        Err(e) => {
            tracing::error!(
                %document,
                error = %e,
                "Failed to load; starting it empty and never writing it"
            );
            (T::default(), false)
        }
    }
}

fn sorted_by_owner<T: Clone>(map: &DashMap<String, Vec<T>>) -> IndexMap<String, Vec<T>> {
    let mut entries: Vec<(String, Vec<T>)> = map
        .iter()
        .map(|entry| (entry.key().clone(), entry.value().clone()))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries.into_iter().collect()
}

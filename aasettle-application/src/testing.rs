//! In-memory port implementations for tests in this and downstream crates.

use std::sync::{
    Mutex,
    atomic::{AtomicI64, AtomicUsize, Ordering},
};

use aasettle_domain::BillId;
use chrono::{DateTime, Utc};

use crate::{
    error::StoreError,
    model::{BillsByOwner, LedgerDocument, LedgerSnapshot, SettlementsByOwner},
    ports::{BillIdGenerator, Clock, LedgerStore},
};

/// Keeps the last saved documents and serves them back on load.
#[derive(Default)]
pub struct InMemoryStore {
    snapshot: Mutex<LedgerSnapshot>,
    unreadable: Mutex<Option<LedgerDocument>>,
    saves: AtomicUsize,
}

impl InMemoryStore {
    pub fn saved(&self) -> LedgerSnapshot {
        self.snapshot
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Every document write so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Makes later loads of `document` fail while its saved copy is kept.
    pub fn fail_loading(&self, document: LedgerDocument) {
        *self.unreadable.lock().unwrap_or_else(|e| e.into_inner()) = Some(document);
    }

    fn check_readable(&self, document: LedgerDocument) -> Result<(), StoreError> {
        if *self.unreadable.lock().unwrap_or_else(|e| e.into_inner()) == Some(document) {
            return Err(io_error(std::io::ErrorKind::InvalidData, "unreadable"));
        }
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut LedgerSnapshot)) {
        let mut snapshot = self.snapshot.lock().unwrap_or_else(|e| e.into_inner());
        apply(&mut *snapshot);
        self.saves.fetch_add(1, Ordering::SeqCst);
    }
}

impl LedgerStore for InMemoryStore {
    fn load_bills(&self) -> Result<BillsByOwner, StoreError> {
        self.check_readable(LedgerDocument::Bills)?;
        Ok(self.saved().bills)
    }

    fn load_settlements(&self) -> Result<SettlementsByOwner, StoreError> {
        self.check_readable(LedgerDocument::Settlements)?;
        Ok(self.saved().settlements)
    }

    fn save_bills(&self, bills: &BillsByOwner) -> Result<(), StoreError> {
        self.update(|snapshot| snapshot.bills = bills.clone());
        Ok(())
    }

    fn save_settlements(&self, settlements: &SettlementsByOwner) -> Result<(), StoreError> {
        self.update(|snapshot| snapshot.settlements = settlements.clone());
        Ok(())
    }
}

/// Loads as empty and fails every save, as an unwritable disk would.
pub struct FailingStore;

impl LedgerStore for FailingStore {
    fn load_bills(&self) -> Result<BillsByOwner, StoreError> {
        Ok(BillsByOwner::default())
    }

    fn load_settlements(&self) -> Result<SettlementsByOwner, StoreError> {
        Ok(SettlementsByOwner::default())
    }

    fn save_bills(&self, _bills: &BillsByOwner) -> Result<(), StoreError> {
        Err(io_error(std::io::ErrorKind::PermissionDenied, "read-only"))
    }

    fn save_settlements(&self, _settlements: &SettlementsByOwner) -> Result<(), StoreError> {
        Err(io_error(std::io::ErrorKind::PermissionDenied, "read-only"))
    }
}

fn io_error(kind: std::io::ErrorKind, message: &str) -> StoreError {
    StoreError::Io {
        path: "memory".into(),
        source: std::io::Error::new(kind, message.to_string()),
    }
}

/// A clock that only moves when told to, in whole seconds.
pub struct FixedClock {
    secs: AtomicI64,
}

impl FixedClock {
    pub fn at(secs: i64) -> Self {
        Self {
            secs: AtomicI64::new(secs),
        }
    }

    pub fn set(&self, secs: i64) {
        self.secs.store(secs, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.secs.load(Ordering::SeqCst), 0).unwrap_or_default()
    }
}

/// Hands out `b00001`, `b00002`, ... or the same id forever.
#[derive(Default)]
pub struct SequentialIds {
    next: AtomicUsize,
    fixed: Option<String>,
}

impl SequentialIds {
    pub fn repeating(id: &str) -> Self {
        Self {
            next: AtomicUsize::new(0),
            fixed: Some(id.to_string()),
        }
    }
}

impl BillIdGenerator for SequentialIds {
    fn generate(&self) -> BillId {
        match &self.fixed {
            Some(id) => BillId::new(id.clone()),
            None => {
                let n = self.next.fetch_add(1, Ordering::SeqCst) + 1;
                BillId::new(format!("b{n:05}"))
            }
        }
    }
}

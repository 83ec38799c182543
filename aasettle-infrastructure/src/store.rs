//! JSON files on disk holding the ledger between restarts.
//!
//! Bills and settlement records live in separate documents, each mapping an
//! owner id to that owner's entries. Each document loads and saves on its
//! own. Writes replace a file atomically by persisting a temporary sibling
//! over it.

use std::{
    fs,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use aasettle_application::{BillsByOwner, LedgerStore, SettlementsByOwner, StoreError};
use indexmap::IndexMap;
use serde::{Serialize, de::DeserializeOwned};
use tempfile::NamedTempFile;

pub const BILLS_FILE: &str = "aa_bills.json";
pub const SETTLEMENTS_FILE: &str = "settlement_records.json";

type Document<T> = IndexMap<String, Vec<T>>;

pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn bills_path(&self) -> PathBuf {
        self.dir.join(BILLS_FILE)
    }

    pub fn settlements_path(&self) -> PathBuf {
        self.dir.join(SETTLEMENTS_FILE)
    }

    fn load_document<T: DeserializeOwned>(&self, path: &Path) -> Result<Document<T>, StoreError> {
        match read_document(path) {
            Err(StoreError::Corrupt { path, detail }) => {
                let aside = quarantine_path(&path);
                if let Err(e) = fs::rename(&path, &aside) {
                    tracing::error!(
                        path = %path.display(),
                        error = %e,
                        "Failed to move corrupt ledger file aside"
                    );
                    return Err(StoreError::Corrupt { path, detail });
                }
                tracing::warn!(
                    path = %path.display(),
                    moved_to = %aside.display(),
                    %detail,
                    "Corrupt ledger file moved aside, starting it empty"
                );
                Ok(Document::default())
            }
            other => other,
        }
    }

    fn write_document<T: Serialize>(
        &self,
        path: &Path,
        document: &Document<T>,
    ) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let io_error = |source: io::Error| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = NamedTempFile::new_in(&self.dir).map_err(io_error)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, document).map_err(|e| io_error(e.into()))?;
        writer.write_all(b"\n").map_err(io_error)?;
        let file = writer.into_inner().map_err(|e| io_error(e.into_error()))?;
        file.as_file().sync_all().map_err(io_error)?;
        file.persist(path).map_err(|e| io_error(e.error))?;
        tracing::debug!(path = %path.display(), owners = document.len(), "Ledger file saved");
        Ok(())
    }
}

impl LedgerStore for JsonFileStore {
    fn load_bills(&self) -> Result<BillsByOwner, StoreError> {
        self.load_document(&self.bills_path())
    }

    fn load_settlements(&self) -> Result<SettlementsByOwner, StoreError> {
        self.load_document(&self.settlements_path())
    }

    fn save_bills(&self, bills: &BillsByOwner) -> Result<(), StoreError> {
        self.write_document(&self.bills_path(), bills)
    }

    fn save_settlements(&self, settlements: &SettlementsByOwner) -> Result<(), StoreError> {
        self.write_document(&self.settlements_path(), settlements)
    }
}

fn read_document<T: DeserializeOwned>(path: &Path) -> Result<Document<T>, StoreError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Document::default()),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Document::default());
    }
    serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

fn quarantine_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".corrupt");
    path.with_file_name(name)
}

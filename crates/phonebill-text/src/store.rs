//! Text-file backed bill storage
//!
//! Each customer's bill lives in its own file under a base directory,
//! named after the percent-encoded customer name.

use crate::codec;
use async_trait::async_trait;
use phonebill_core::{AppError, AppResult, BillStore, PhoneBill};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument};

const FILE_EXTENSION: &str = "txt";

/// `BillStore` writing one text file per customer
#[derive(Debug, Clone)]
pub struct TextFileStore {
    dir: PathBuf,
}

impl TextFileStore {
    /// Create a store rooted at `dir`; the directory is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding `customer`'s bill
    pub fn path_for(&self, customer: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", urlencoding::encode(customer), FILE_EXTENSION))
    }
}

/// Read a bill from a text file
///
/// A missing file is reported as `Ok(None)`.
pub async fn read_bill_file(path: &Path) -> AppResult<Option<PhoneBill>> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(Some(codec::decode(&text)?)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => {
            error!("Failed to read {}: {}", path.display(), e);
            Err(AppError::Io(format!("Failed to read {}: {}", path.display(), e)))
        }
    }
}

/// Write a bill to a text file, replacing it atomically
///
/// Nothing is written when the bill cannot be encoded.
pub async fn write_bill_file(path: &Path, bill: &PhoneBill) -> AppResult<()> {
    let text = codec::encode(bill)?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let staging = path.with_extension("tmp");
    tokio::fs::write(&staging, text).await.map_err(|e| {
        error!("Failed to write {}: {}", staging.display(), e);
        AppError::Io(format!("Failed to write {}: {}", staging.display(), e))
    })?;
    tokio::fs::rename(&staging, path).await?;
    Ok(())
}

#[async_trait]
impl BillStore for TextFileStore {
    fn backend_name(&self) -> &'static str {
        "text"
    }

    #[instrument(skip(self))]
    async fn load(&self, customer: &str) -> AppResult<PhoneBill> {
        let path = self.path_for(customer);
        debug!("Loading bill from {}", path.display());

        match read_bill_file(&path).await? {
            None => Ok(PhoneBill::new(customer)),
            Some(bill) if bill.customer() != customer => Err(AppError::CustomerMismatch {
                expected: customer.to_string(),
                found: bill.customer().to_string(),
            }),
            Some(bill) => Ok(bill),
        }
    }

    #[instrument(skip(self, bill), fields(customer = %bill.customer(), calls = bill.len()))]
    async fn persist(&self, bill: &PhoneBill) -> AppResult<()> {
        let path = self.path_for(bill.customer());
        write_bill_file(&path, bill).await?;
        debug!("Wrote bill to {}", path.display());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> AppResult<()> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0usize;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some(FILE_EXTENSION) {
                tokio::fs::remove_file(&path).await?;
                removed += 1;
            }
        }

        info!("Removed {} bill files from {}", removed, self.dir.display());
        Ok(())
    }
}

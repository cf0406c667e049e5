//! Import a text-encoded bill into another store

use phonebill_core::{AppError, AppResult, BillStore, PhoneBill};
use phonebill_text::read_bill_file;
use std::path::Path;
use tracing::{info, instrument};

/// Decode `path` and persist the bill to `store`
///
/// Returns the imported bill. A missing file is an error here, unlike a
/// store load, since there is nothing to convert.
#[instrument(skip(store), fields(path = %path.display(), backend = store.backend_name()))]
pub async fn convert_text_to_store(path: &Path, store: &dyn BillStore) -> AppResult<PhoneBill> {
    let bill = read_bill_file(path)
        .await?
        .ok_or_else(|| AppError::Io(format!("{} does not exist", path.display())))?;

    store.persist(&bill).await?;

    info!(
        "Imported {} calls for {} into the {} store",
        bill.len(),
        bill.customer(),
        store.backend_name()
    );
    Ok(bill)
}

#[cfg(test)]
mod tests {
    use super::*;
    use phonebill_db::{create_pool, SqliteBillRepository};

    const DAVE: &str = "Dave\n\
        Dave,503-245-2345,765-389-1273,02/27/2026 08:56,02/27/2026 10:27\n\
        \n\
        Dave,503-245-2345,111-222-3333,01/02/2026 18:00,01/02/2026 18:45\n";

    #[tokio::test]
    async fn test_text_file_into_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dave.txt");
        std::fs::write(&path, DAVE).unwrap();

        let repo = SqliteBillRepository::new(create_pool("sqlite::memory:", None).await.unwrap());
        let imported = convert_text_to_store(&path, &repo).await.unwrap();
        assert_eq!(imported.len(), 2);

        let loaded = repo.load("Dave").await.unwrap();
        assert_eq!(loaded.into_calls(), imported.into_calls());
        assert_eq!(repo.customer_names().await.unwrap(), vec!["Dave".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SqliteBillRepository::new(create_pool("sqlite::memory:", None).await.unwrap());

        let err = convert_text_to_store(&dir.path().join("none.txt"), &repo)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }

    #[tokio::test]
    async fn test_malformed_file_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, "Dave\nDave,503-245-2345,02/27/2026 08:56\n").unwrap();

        let repo = SqliteBillRepository::new(create_pool("sqlite::memory:", None).await.unwrap());
        let err = convert_text_to_store(&path, &repo).await.unwrap_err();

        assert!(matches!(err, AppError::Parse(_)));
        assert!(repo.customer_names().await.unwrap().is_empty());
    }
}

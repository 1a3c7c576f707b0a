//! Bulk loader for the corp-code listing
//!
//! Parses the listing, drops records without a code or name, and upserts the
//! rest in a single transaction. Startup uses [`Loader::load_at_startup`],
//! which never fails: a missing or broken document only leaves the table as
//! it was.

use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::error::LoadError;
use crate::store::CorporationStore;

mod document;

pub use document::{parse_document, RawCorporation};

/// Progress is logged once per this many records
const PROGRESS_INTERVAL: usize = 1000;

/// Outcome of one load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    /// `<list>` records found in the document
    pub records_seen: usize,
    pub records_accepted: usize,
    /// Records without a code or name
    pub records_skipped: usize,
    /// Rows in the table after commit
    pub total_rows: i64,
}

pub struct Loader {
    store: Arc<dyn CorporationStore>,
}

impl Loader {
    pub fn new(store: Arc<dyn CorporationStore>) -> Self {
        Self { store }
    }

    /// Load a listing held in memory.
    pub async fn load_str(&self, xml: &str) -> Result<LoadReport, LoadError> {
        let raw = parse_document(xml)?;
        let records_seen = raw.len();

        let mut accepted = Vec::with_capacity(records_seen);
        for (i, record) in raw.iter().enumerate() {
            if let Some(corp) = record.normalize() {
                accepted.push(corp);
            }
            if (i + 1) % PROGRESS_INTERVAL == 0 {
                debug!(processed = i + 1, total = records_seen, "Normalizing records");
            }
        }

        self.store.upsert_all(&accepted).await?;
        let total_rows = self.store.count().await?;

        Ok(LoadReport {
            records_seen,
            records_accepted: accepted.len(),
            records_skipped: records_seen - accepted.len(),
            total_rows,
        })
    }

    /// Load a listing from disk.
    pub async fn load_file(&self, path: &Path) -> Result<LoadReport, LoadError> {
        let xml = match tokio::fs::read_to_string(path).await {
            Ok(xml) => xml,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(LoadError::SourceMissing(path.to_path_buf()))
            }
            Err(e) => return Err(e.into()),
        };
        self.load_str(&xml).await
    }

    /// Startup variant of [`Loader::load_file`]: logs the outcome and
    /// swallows every error.
    pub async fn load_at_startup(&self, path: &Path) -> Option<LoadReport> {
        info!(path = %path.display(), "Loading corporation listing");

        match self.load_file(path).await {
            Ok(report) => {
                info!(
                    seen = report.records_seen,
                    accepted = report.records_accepted,
                    skipped = report.records_skipped,
                    total_rows = report.total_rows,
                    "Corporation listing loaded"
                );
                Some(report)
            }
            Err(LoadError::SourceMissing(missing)) => {
                warn!(
                    path = %missing.display(),
                    "Corporation listing not found, starting with an empty table"
                );
                None
            }
            Err(e) => {
                error!(error = %e, "Failed to load corporation listing, continuing without it");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::store::SqliteCorporationStore;
    use std::io::Write;

    const LISTING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<result>
    <list>
        <corp_code>00126380</corp_code>
        <corp_name>삼성전자</corp_name>
        <corp_eng_name>SAMSUNG ELECTRONICS CO,.LTD</corp_eng_name>
        <stock_code>005930</stock_code>
        <modify_date>20230110</modify_date>
    </list>
    <list>
        <corp_code>00164779</corp_code>
        <corp_name>SK하이닉스</corp_name>
        <corp_eng_name>SK hynix Inc.</corp_eng_name>
        <stock_code>000660</stock_code>
        <modify_date>20230301</modify_date>
    </list>
    <list>
        <corp_code>00434003</corp_code>
        <corp_name>다코</corp_name>
        <corp_eng_name> </corp_eng_name>
        <stock_code> </stock_code>
        <modify_date>20170630</modify_date>
    </list>
    <list>
        <corp_name>코드 없음</corp_name>
    </list>
    <list>
        <corp_code>00999999</corp_code>
        <corp_name>  </corp_name>
    </list>
</result>"#;

    async fn new_loader() -> (Loader, Arc<SqliteCorporationStore>) {
        let store = Arc::new(
            SqliteCorporationStore::connect_in_memory(&StoreConfig::default())
                .await
                .unwrap(),
        );
        (Loader::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_load_skips_invalid_records() {
        let (loader, store) = new_loader().await;

        let report = loader.load_str(LISTING).await.unwrap();
        assert_eq!(
            report,
            LoadReport {
                records_seen: 5,
                records_accepted: 3,
                records_skipped: 2,
                total_rows: 3,
            }
        );

        let daco = store.find_by_code("00434003").await.unwrap().unwrap();
        assert_eq!(daco.corp_eng_name, None);
        assert_eq!(daco.stock_code, None);
        assert!(store.find_by_code("00999999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_twice_is_idempotent() {
        let (loader, store) = new_loader().await;

        loader.load_str(LISTING).await.unwrap();
        let first = store.search_by_name("", 100).await.unwrap();

        let report = loader.load_str(LISTING).await.unwrap();
        assert_eq!(report.total_rows, 3);
        assert_eq!(store.search_by_name("", 100).await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_malformed_document_leaves_table_untouched() {
        let (loader, store) = new_loader().await;
        loader.load_str(LISTING).await.unwrap();

        let broken = "<result><list><corp_code>00000001</corp_code><corp_name>New</list>";
        assert!(loader.load_str(broken).await.is_err());
        assert_eq!(store.count().await.unwrap(), 3);
        assert!(store.find_by_code("00000001").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_file_missing() {
        let (loader, _store) = new_loader().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corp.xml");

        let err = loader.load_file(&path).await.unwrap_err();
        assert!(matches!(err, LoadError::SourceMissing(p) if p == path));
        assert!(loader.load_at_startup(&path).await.is_none());
    }

    #[tokio::test]
    async fn test_load_at_startup_from_file() {
        let (loader, store) = new_loader().await;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(LISTING.as_bytes()).unwrap();

        let report = loader.load_at_startup(file.path()).await.unwrap();
        assert_eq!(report.total_rows, 3);
        assert_eq!(store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_load_at_startup_swallows_malformed() {
        let (loader, store) = new_loader().await;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"<result><list>").unwrap();

        assert!(loader.load_at_startup(file.path()).await.is_none());
        assert_eq!(store.count().await.unwrap(), 0);
    }
}

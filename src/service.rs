//! Read-only query service over the corporation table

use std::sync::Arc;

use crate::error::StoreResult;
use crate::models::Corporation;
use crate::store::CorporationStore;

/// Maximum rows returned by a name search
pub const SEARCH_LIMIT: u32 = 100;

pub const HEALTH_MESSAGE: &str = "API server is running";

#[derive(Clone)]
pub struct CorporationService {
    store: Arc<dyn CorporationStore>,
}

impl CorporationService {
    pub fn new(store: Arc<dyn CorporationStore>) -> Self {
        Self { store }
    }

    /// Substring search on Korean or English name.
    ///
    /// A missing or blank query yields no rows rather than every row.
    pub async fn search_by_name(&self, query: Option<&str>) -> StoreResult<Vec<Corporation>> {
        match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(term) => self.store.search_by_name(term, SEARCH_LIMIT).await,
            None => Ok(Vec::new()),
        }
    }

    pub async fn get_by_code(&self, corp_code: &str) -> StoreResult<Option<Corporation>> {
        self.store.find_by_code(corp_code).await
    }

    pub async fn search_by_stock_code(&self, stock_code: &str) -> StoreResult<Vec<Corporation>> {
        let stock_code = stock_code.trim();
        if stock_code.is_empty() {
            return Ok(Vec::new());
        }
        self.store.find_by_stock_code(stock_code).await
    }

    pub async fn count(&self) -> StoreResult<i64> {
        self.store.count().await
    }
}

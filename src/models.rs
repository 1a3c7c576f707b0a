//! Corporation row type shared by the store, loader and HTTP layer.

use serde::{Deserialize, Serialize};

/// One registered corporation as stored in the `corporations` table.
///
/// Optional fields serialize as `null` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Corporation {
    pub corp_code: String,
    pub corp_name: String,
    pub corp_eng_name: Option<String>,
    pub stock_code: Option<String>,
    pub modify_date: Option<String>,
}

impl Corporation {
    pub fn new(corp_code: impl Into<String>, corp_name: impl Into<String>) -> Self {
        Self {
            corp_code: corp_code.into(),
            corp_name: corp_name.into(),
            corp_eng_name: None,
            stock_code: None,
            modify_date: None,
        }
    }

    pub fn with_eng_name(mut self, eng_name: impl Into<String>) -> Self {
        self.corp_eng_name = Some(eng_name.into());
        self
    }

    pub fn with_stock_code(mut self, stock_code: impl Into<String>) -> Self {
        self.stock_code = Some(stock_code.into());
        self
    }

    pub fn with_modify_date(mut self, modify_date: impl Into<String>) -> Self {
        self.modify_date = Some(modify_date.into());
        self
    }
}

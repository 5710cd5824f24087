use std::{sync::Arc, time::Duration};

use moka::future::Cache;
use uuid::Uuid;

use crate::{error::Error, report::Report};

/// In-process store of generated reports keyed by an opaque token.
///
/// Every upload gets a fresh v4 token, so concurrent uploads never write
/// the same entry. Entries leave the store after `ttl` or when `capacity`
/// is exceeded, and all of them are lost on restart.
#[derive(Clone)]
pub struct ReportStore {
    reports: Cache<String, Arc<Report>>,
}

impl ReportStore {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        let reports = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();

        Self { reports }
    }

    /// Stores `report` under a new token and returns the token.
    pub async fn insert(&self, report: Report) -> String {
        let id = Uuid::new_v4().simple().to_string();
        self.reports.insert(id.to_owned(), Arc::new(report)).await;
        id
    }

    pub async fn get(&self, id: &str) -> Result<Arc<Report>, Error> {
        self.reports
            .get(id)
            .await
            .ok_or_else(|| Error::NotFound(id.to_owned()))
    }

    /// Approximate number of live reports.
    pub fn entry_count(&self) -> u64 {
        self.reports.entry_count()
    }
}

impl std::fmt::Debug for ReportStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportStore")
            .field("entries", &self.entry_count())
            .finish()
    }
}

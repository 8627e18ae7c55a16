//! In-memory activity log store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use resqroute_core::result::AppResult;
use resqroute_core::types::pagination::{PageRequest, PageResponse};
use resqroute_entity::activity::{ActivityFilter, ActivityLog, NewActivityLog};

use super::newest_first;
use crate::store::ActivityStore;

/// [`ActivityStore`] held in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryActivityStore {
    logs: Arc<DashMap<Uuid, ActivityLog>>,
}

impl MemoryActivityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry with an explicit timestamp.
    pub fn insert_at(&self, entry: &NewActivityLog, created_at: DateTime<Utc>) -> ActivityLog {
        let log = ActivityLog {
            id: Uuid::now_v7(),
            user_id: entry.user_id,
            action: entry.action.clone(),
            description: entry.description.clone(),
            ip_address: entry.ip_address.clone(),
            user_agent: entry.user_agent.clone(),
            metadata: entry.metadata.clone(),
            created_at,
        };
        self.logs.insert(log.id, log.clone());
        log
    }
}

#[async_trait]
impl ActivityStore for MemoryActivityStore {
    async fn append(&self, entry: &NewActivityLog) -> AppResult<ActivityLog> {
        Ok(self.insert_at(entry, Utc::now()))
    }

    async fn list(
        &self,
        filter: &ActivityFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<ActivityLog>> {
        let mut logs: Vec<ActivityLog> = self
            .logs
            .iter()
            .filter(|e| filter.matches(e.value()))
            .map(|e| e.value().clone())
            .collect();
        newest_first(&mut logs, |l| (l.created_at, l.id));

        let total = logs.len() as u64;
        let items = logs
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(page.limit as usize)
            .collect();
        Ok(PageResponse::new(items, page, total))
    }

    async fn count_since(&self, since: DateTime<Utc>) -> AppResult<i64> {
        Ok(self
            .logs
            .iter()
            .filter(|e| e.value().created_at >= since)
            .count() as i64)
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let before = self.logs.len();
        self.logs.retain(|_, log| log.created_at >= cutoff);
        Ok((before - self.logs.len()) as u64)
    }
}

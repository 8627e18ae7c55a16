//! In-memory alert store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use resqroute_core::result::AppResult;
use resqroute_entity::alert::{Alert, AlertFilter, AlertStatus, CreateAlert, UpdateAlert};

use super::newest_first;
use crate::store::{AlertCounts, AlertStore, next_resolved_at};

/// [`AlertStore`] held in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryAlertStore {
    alerts: Arc<DashMap<Uuid, Alert>>,
}

impl MemoryAlertStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AlertStore for MemoryAlertStore {
    async fn create(&self, data: &CreateAlert) -> AppResult<Alert> {
        let now = Utc::now();
        let alert = Alert {
            id: Uuid::now_v7(),
            alert_type: data.alert_type,
            message: data.message.clone(),
            location: data.location.clone(),
            coordinates: data.coordinates,
            priority: data.priority,
            status: AlertStatus::Active,
            created_by: data.created_by,
            resolved_at: None,
            timestamp: now,
            created_at: now,
            updated_at: now,
        };
        self.alerts.insert(alert.id, alert.clone());
        Ok(alert)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Alert>> {
        Ok(self.alerts.get(&id).map(|a| a.value().clone()))
    }

    async fn list(&self, filter: &AlertFilter) -> AppResult<Vec<Alert>> {
        let mut alerts: Vec<Alert> = self
            .alerts
            .iter()
            .filter(|e| filter.matches(e.value()))
            .map(|e| e.value().clone())
            .collect();
        newest_first(&mut alerts, |a| (a.timestamp, a.id));
        Ok(alerts)
    }

    async fn update(&self, id: Uuid, data: &UpdateAlert) -> AppResult<Option<Alert>> {
        Ok(self.alerts.get_mut(&id).map(|mut alert| {
            data.apply(&mut alert);
            alert.updated_at = Utc::now();
            alert.clone()
        }))
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: AlertStatus,
        at: DateTime<Utc>,
    ) -> AppResult<Option<Alert>> {
        Ok(self.alerts.get_mut(&id).map(|mut alert| {
            alert.resolved_at = next_resolved_at(alert.resolved_at, status, at);
            alert.status = status;
            alert.updated_at = Utc::now();
            alert.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.alerts.remove(&id).is_some())
    }

    async fn count_by_status(&self) -> AppResult<AlertCounts> {
        let mut counts = AlertCounts::default();
        for entry in self.alerts.iter() {
            counts.total += 1;
            match entry.value().status {
                AlertStatus::Active => counts.active += 1,
                AlertStatus::Resolved => counts.resolved += 1,
                AlertStatus::Cancelled => counts.cancelled += 1,
            }
        }
        Ok(counts)
    }
}

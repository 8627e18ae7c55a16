//! Scheduled pruning of old activity log entries.

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use resqroute_core::config::ActivityConfig;
use resqroute_core::error::AppError;

use crate::activity::service::ActivityService;

/// Cron scheduler that prunes the activity log.
pub struct RetentionScheduler {
    scheduler: JobScheduler,
    service: ActivityService,
}

impl std::fmt::Debug for RetentionScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetentionScheduler").finish()
    }
}

impl RetentionScheduler {
    /// Create a scheduler; nothing runs until [`Self::register`] and
    /// [`Self::start`] are called.
    pub async fn new(service: ActivityService) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self { scheduler, service })
    }

    /// Register the prune job from configuration.
    pub async fn register(&self, config: &ActivityConfig) -> Result<(), AppError> {
        let service = self.service.clone();
        let days = config.retention_days;
        let job = CronJob::new_async(config.cleanup_cron.as_str(), move |_uuid, _lock| {
            let service = service.clone();
            Box::pin(async move {
                tracing::debug!(days, "Running activity log retention");
                if let Err(e) = service.cleanup(days).await {
                    tracing::error!("Activity log retention failed: {}", e);
                }
            })
        })
        .map_err(|e| {
            AppError::configuration(format!(
                "Invalid activity.cleanup_cron '{}': {e}",
                config.cleanup_cron
            ))
        })?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add retention schedule: {e}")))?;

        tracing::info!(
            cron = %config.cleanup_cron,
            days,
            "Registered: activity_log_retention"
        );
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Retention scheduler started");
        Ok(())
    }

    /// Shut the scheduler down.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        let mut scheduler = self.scheduler.clone();
        scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Retention scheduler shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resqroute_database::Stores;

    use crate::activity::logger::ActivityLogger;

    fn service() -> ActivityService {
        let stores = Stores::in_memory();
        ActivityService::new(
            stores.activity.clone(),
            stores.users.clone(),
            stores.alerts.clone(),
            ActivityLogger::new(stores.activity.clone()),
        )
    }

    #[tokio::test]
    async fn test_register_rejects_bad_cron() {
        let scheduler = RetentionScheduler::new(service()).await.unwrap();
        let config = ActivityConfig {
            cleanup_cron: "every night".to_string(),
            ..ActivityConfig::default()
        };
        let err = scheduler.register(&config).await.unwrap_err();
        assert!(err.message.contains("activity.cleanup_cron"));
    }

    #[tokio::test]
    async fn test_register_default_cron() {
        let scheduler = RetentionScheduler::new(service()).await.unwrap();
        scheduler.register(&ActivityConfig::default()).await.unwrap();
    }
}

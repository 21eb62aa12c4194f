//! In-memory alert sink for tests.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::alert::{
    domain::ManagementAlert,
    ports::{AlertSinkError, AlertSinkResult, ManagementAlertSink},
};

/// Thread-safe recording alert sink.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAlertSink {
    alerts: Arc<RwLock<Vec<ManagementAlert>>>,
}

impl InMemoryAlertSink {
    /// Creates an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every alert delivered so far.
    ///
    /// # Errors
    ///
    /// Returns [`AlertSinkError::Delivery`] when the sink lock is poisoned.
    pub fn delivered(&self) -> AlertSinkResult<Vec<ManagementAlert>> {
        let alerts = self
            .alerts
            .read()
            .map_err(|err| AlertSinkError::delivery(std::io::Error::other(err.to_string())))?;
        Ok(alerts.clone())
    }
}

#[async_trait]
impl ManagementAlertSink for InMemoryAlertSink {
    async fn create_alert(&self, alert: &ManagementAlert) -> AlertSinkResult<()> {
        let mut alerts = self
            .alerts
            .write()
            .map_err(|err| AlertSinkError::delivery(std::io::Error::other(err.to_string())))?;
        alerts.push(alert.clone());
        Ok(())
    }
}

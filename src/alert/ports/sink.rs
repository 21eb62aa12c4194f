//! Sink port for delivering management alerts.

use crate::alert::domain::ManagementAlert;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for alert sink operations.
pub type AlertSinkResult<T> = Result<T, AlertSinkError>;

/// Delivery contract for management alerts.
///
/// Raising an alert is a side channel: callers treat delivery failure as a
/// diagnostic concern, never as a reason to suppress the error the alert
/// describes.
#[async_trait]
pub trait ManagementAlertSink: Send + Sync {
    /// Delivers an alert to operators.
    ///
    /// # Errors
    ///
    /// Returns [`AlertSinkError::Delivery`] when the alert could not be
    /// recorded or forwarded.
    async fn create_alert(&self, alert: &ManagementAlert) -> AlertSinkResult<()>;
}

/// Errors returned by alert sink implementations.
#[derive(Debug, Clone, Error)]
pub enum AlertSinkError {
    /// The alert could not be recorded or forwarded.
    #[error("alert delivery failed: {0}")]
    Delivery(Arc<dyn std::error::Error + Send + Sync>),
}

impl AlertSinkError {
    /// Wraps a delivery failure.
    pub fn delivery(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Delivery(Arc::new(err))
    }
}

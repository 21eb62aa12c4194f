//! Management alert record raised towards project operators.

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

use crate::task::domain::{AssetId, TaskId, UserId};

/// Unique identifier for a management alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertId(Uuid);

impl AlertId {
    /// Creates a new random alert identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an alert identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for AlertId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Category of a management alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    /// Task or workflow history is in a state the pipeline cannot reconcile.
    DataIntegrityViolation,
}

impl AlertType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DataIntegrityViolation => "data_integrity_violation",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alert raised towards operators when the pipeline detects a problem it
/// must not silently correct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagementAlert {
    id: AlertId,
    alert_type: AlertType,
    task_id: TaskId,
    asset_id: AssetId,
    user_id: UserId,
    title: String,
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    extra: Option<Value>,
    raised_at: DateTime<Utc>,
}

impl ManagementAlert {
    /// Creates a new alert with a fresh identifier.
    #[must_use]
    pub fn new(
        alert_type: AlertType,
        task_id: TaskId,
        asset_id: AssetId,
        user_id: UserId,
        title: impl Into<String>,
        detail: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: AlertId::new(),
            alert_type,
            task_id,
            asset_id,
            user_id,
            title: title.into(),
            detail: detail.into(),
            extra: None,
            raised_at: clock.utc(),
        }
    }

    /// Attaches structured context to the alert.
    #[must_use]
    pub fn with_extra(mut self, extra: Value) -> Self {
        self.extra = Some(extra);
        self
    }

    /// Returns the alert identifier.
    #[must_use]
    pub const fn id(&self) -> AlertId {
        self.id
    }

    /// Returns the alert category.
    #[must_use]
    pub const fn alert_type(&self) -> AlertType {
        self.alert_type
    }

    /// Returns the task the alert concerns.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the asset the alert concerns.
    #[must_use]
    pub const fn asset_id(&self) -> AssetId {
        self.asset_id
    }

    /// Returns the user whose action surfaced the problem.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id.clone()
    }

    /// Returns the short operator-facing summary.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the rendered operator-facing body.
    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Returns attached structured context, if any.
    #[must_use]
    pub const fn extra(&self) -> Option<&Value> {
        self.extra.as_ref()
    }

    /// Returns when the alert was raised.
    #[must_use]
    pub const fn raised_at(&self) -> DateTime<Utc> {
        self.raised_at
    }
}

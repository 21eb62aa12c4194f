//! Domain model for management alerts.
//!
//! Alerts carry problems the pipeline refuses to correct silently (such as
//! data-integrity violations) to project operators for manual triage.

mod alert;

pub use alert::{AlertId, AlertType, ManagementAlert};

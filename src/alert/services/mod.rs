//! Application services for alert construction.

mod render;

pub use render::{AlertRenderError, IntegrityViolationReport, render_integrity_violation};

//! Template rendering for operator-facing alert bodies.

use minijinja::{Environment, context};
use thiserror::Error;

/// Body template for data-integrity violation alerts.
const INTEGRITY_VIOLATION_TEMPLATE: &str = "Annotation task {{ task_id }} for asset \
{{ asset_id }} was expected to be {{ expected }} before rework could be scheduled, but is \
currently '{{ found_status }}'.\
{% if reason %} Veto reason: {{ reason }}.{% endif %} \
Manual reconciliation is required before the veto can be retried.";

/// Error returned when an alert body fails to render.
#[derive(Debug, Error)]
#[error("alert body rendering failed: {0}")]
pub struct AlertRenderError(#[from] minijinja::Error);

/// Facts included in a data-integrity violation alert body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityViolationReport<'a> {
    /// The annotation task in the unexpected status.
    pub task_id: &'a str,
    /// The asset whose veto surfaced the violation.
    pub asset_id: &'a str,
    /// Statuses the pipeline would have accepted.
    pub expected: &'a str,
    /// Status actually found on the annotation task.
    pub found_status: &'a str,
    /// Veto reason supplied by the reviewer, if any.
    pub reason: Option<&'a str>,
}

/// Renders the operator-facing body for a data-integrity violation alert.
///
/// # Errors
///
/// Returns [`AlertRenderError`] when template evaluation fails.
pub fn render_integrity_violation(
    report: &IntegrityViolationReport<'_>,
) -> Result<String, AlertRenderError> {
    let env = Environment::new();
    let body = env.render_str(
        INTEGRITY_VIOLATION_TEMPLATE,
        context! {
            task_id => report.task_id,
            asset_id => report.asset_id,
            expected => report.expected,
            found_status => report.found_status,
            reason => report.reason,
        },
    )?;
    Ok(body)
}

//! Delivery tests for the in-memory alert sink.

use crate::alert::{
    adapters::memory::InMemoryAlertSink,
    domain::{AlertType, ManagementAlert},
    ports::ManagementAlertSink,
};
use crate::task::domain::{AssetId, TaskId, UserId};
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sink_records_delivered_alerts_in_order() {
    let sink = InMemoryAlertSink::new();
    let user = UserId::new("reviewer-1").expect("valid user id");
    let alert = ManagementAlert::new(
        AlertType::DataIntegrityViolation,
        TaskId::new(),
        AssetId::new(),
        user,
        "Data integrity violation detected during veto",
        "annotation task in unexpected status",
        &DefaultClock,
    )
    .with_extra(json!({"found_status": "in_progress"}));

    sink.create_alert(&alert).await.expect("delivery succeeds");

    let delivered = sink.delivered().expect("snapshot succeeds");
    assert_eq!(delivered, vec![alert]);
    let recorded = delivered.first().expect("one alert recorded");
    assert_eq!(recorded.alert_type(), AlertType::DataIntegrityViolation);
    assert_eq!(
        recorded.extra(),
        Some(&json!({"found_status": "in_progress"}))
    );
}

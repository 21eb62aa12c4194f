//! Unit tests for the task status state machine.

use crate::task::domain::TaskStatus;
use crate::workflow::domain::StageType;
use rstest::rstest;

const ALL_STATUSES: [TaskStatus; 11] = [
    TaskStatus::NotStarted,
    TaskStatus::ReadyForAnnotation,
    TaskStatus::InProgress,
    TaskStatus::Completed,
    TaskStatus::ReadyForReview,
    TaskStatus::ReadyForCompletion,
    TaskStatus::Vetoed,
    TaskStatus::ChangesRequired,
    TaskStatus::Suspended,
    TaskStatus::Archived,
    TaskStatus::Deferred,
];

#[rstest]
#[case(TaskStatus::NotStarted, true)]
#[case(TaskStatus::ReadyForAnnotation, true)]
#[case(TaskStatus::InProgress, true)]
#[case(TaskStatus::Completed, false)]
#[case(TaskStatus::ReadyForReview, true)]
#[case(TaskStatus::ReadyForCompletion, true)]
#[case(TaskStatus::Vetoed, false)]
#[case(TaskStatus::ChangesRequired, false)]
#[case(TaskStatus::Suspended, false)]
#[case(TaskStatus::Archived, false)]
#[case(TaskStatus::Deferred, false)]
fn is_active_returns_expected(#[case] status: TaskStatus, #[case] expected: bool) {
    assert_eq!(status.is_active(), expected);
}

#[rstest]
#[case(TaskStatus::Completed, true)]
#[case(TaskStatus::Vetoed, true)]
#[case(TaskStatus::Archived, true)]
#[case(TaskStatus::NotStarted, false)]
#[case(TaskStatus::InProgress, false)]
#[case(TaskStatus::ChangesRequired, false)]
#[case(TaskStatus::Suspended, false)]
#[case(TaskStatus::Deferred, false)]
fn is_historical_returns_expected(#[case] status: TaskStatus, #[case] expected: bool) {
    assert_eq!(status.is_historical(), expected);
}

#[rstest]
fn archived_is_the_only_terminal_status() {
    for status in ALL_STATUSES {
        assert_eq!(status.is_terminal(), status == TaskStatus::Archived);
    }
}

#[rstest]
fn no_status_permits_a_self_transition() {
    for status in ALL_STATUSES {
        assert!(!status.can_transition_to(status));
    }
}

#[rstest]
fn archived_permits_no_transitions() {
    for target in ALL_STATUSES {
        assert!(!TaskStatus::Archived.can_transition_to(target));
    }
}

#[rstest]
#[case(TaskStatus::InProgress, TaskStatus::Completed, true)]
#[case(TaskStatus::InProgress, TaskStatus::Vetoed, true)]
#[case(TaskStatus::InProgress, TaskStatus::Suspended, true)]
#[case(TaskStatus::InProgress, TaskStatus::Deferred, true)]
#[case(TaskStatus::InProgress, TaskStatus::NotStarted, false)]
#[case(TaskStatus::InProgress, TaskStatus::ReadyForReview, false)]
#[case(TaskStatus::NotStarted, TaskStatus::InProgress, true)]
#[case(TaskStatus::NotStarted, TaskStatus::Completed, false)]
#[case(TaskStatus::NotStarted, TaskStatus::Vetoed, false)]
#[case(TaskStatus::ReadyForAnnotation, TaskStatus::InProgress, true)]
#[case(TaskStatus::ReadyForReview, TaskStatus::InProgress, true)]
#[case(TaskStatus::ReadyForReview, TaskStatus::Completed, false)]
#[case(TaskStatus::ReadyForCompletion, TaskStatus::InProgress, true)]
#[case(TaskStatus::ChangesRequired, TaskStatus::InProgress, true)]
#[case(TaskStatus::ChangesRequired, TaskStatus::Completed, false)]
#[case(TaskStatus::Completed, TaskStatus::ChangesRequired, true)]
#[case(TaskStatus::Completed, TaskStatus::ReadyForReview, true)]
#[case(TaskStatus::Completed, TaskStatus::InProgress, false)]
#[case(TaskStatus::Vetoed, TaskStatus::ChangesRequired, true)]
#[case(TaskStatus::Vetoed, TaskStatus::ReadyForAnnotation, true)]
#[case(TaskStatus::Vetoed, TaskStatus::InProgress, false)]
#[case(TaskStatus::Suspended, TaskStatus::InProgress, true)]
#[case(TaskStatus::Suspended, TaskStatus::Completed, false)]
#[case(TaskStatus::Deferred, TaskStatus::InProgress, true)]
#[case(TaskStatus::Deferred, TaskStatus::Completed, false)]
fn can_transition_to_returns_expected(
    #[case] from: TaskStatus,
    #[case] to: TaskStatus,
    #[case] expected: bool,
) {
    assert_eq!(from.can_transition_to(to), expected);
}

#[rstest]
#[case(StageType::Annotation, TaskStatus::ReadyForAnnotation)]
#[case(StageType::Revision, TaskStatus::ReadyForReview)]
#[case(StageType::Completion, TaskStatus::ReadyForCompletion)]
fn ready_for_maps_stage_type_to_waiting_status(
    #[case] stage_type: StageType,
    #[case] expected: TaskStatus,
) {
    assert_eq!(TaskStatus::ready_for(stage_type), expected);
}

//! Unit tests for the task context.

mod status_transition_tests;
mod support;

//! Unit tests for the alert context.

mod sink_tests;

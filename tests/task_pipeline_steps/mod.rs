//! Step definitions shared by the task pipeline behaviour scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;

//! Management alerting for Atelier.
//!
//! The task pipeline reports data-integrity violations to operators instead
//! of correcting them silently. This module owns the alert record, the
//! delivery sink port, and the rendering of operator-facing alert bodies.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Rendering services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

//! Task workflow pipeline for Atelier.
//!
//! This module owns the unit-of-work model (tasks binding assets to
//! workflow stages), the task status state machine, and the rollback-capable
//! pipelines that fire when a task is completed or vetoed: status
//! transition, physical asset relocation between stage data sources, and
//! creation or update of the task record at the asset's next stop. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Pipeline services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

//! Adapter implementations of the task lifecycle ports.

pub mod fs;
pub mod memory;
pub mod postgres;

pub use fs::FsAssetRelocationService;

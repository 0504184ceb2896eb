//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&SqlitePool` as the first argument.

pub mod log_entry_repo;
pub mod vehicle_repo;

pub use log_entry_repo::LogEntryRepo;
pub use vehicle_repo::VehicleRepo;

//! Pure domain logic for the CarLog VIN service.
//!
//! Nothing in this crate performs I/O: VIN validation, decoding tables,
//! health-status values and shared input rules all live here so the store
//! and HTTP layers can share them.

pub mod decoder;
pub mod error;
pub mod health;
pub mod mileage;
pub mod model_year;
pub mod pagination;
pub mod types;
pub mod vin;
pub mod wmi;

//! Leave and shift-swap approval engine for healthcare unit rosters.
//!
//! The rule modules (`quota`, `penalty`, `eligibility`, `substitute`,
//! `batch`, `request`) are pure computations over in-memory snapshots;
//! `store` and `service` wrap them with sled persistence.

pub mod batch;
pub mod eligibility;
pub mod error;
pub mod penalty;
pub mod quota;
pub mod request;
pub mod service;
pub mod settings;
pub mod staff;
pub mod store;
pub mod substitute;
pub mod types;
pub mod utils;

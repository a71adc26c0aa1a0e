pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{HttpBindingDispatcher, HttpVehicleRegistry, TracingAuditSink};
pub use config::ServiceConfig;
pub use core::engine::{BatchReport, FineCollectionEngine};
pub use core::fine_calculator::calculate_fine;
pub use core::processor::{ProcessorSettings, ViolationProcessor};
pub use domain::model::{Fine, SpeedingViolation, VehicleInfo};
pub use utils::error::{FineError, Result};

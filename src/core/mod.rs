pub mod engine;
pub mod fine_calculator;
pub mod processor;
pub mod renderer;

pub use crate::domain::model::{
    EmailMetadata, Fine, NotificationMessage, ProcessedViolation, SpeedingViolation, VehicleInfo,
};
pub use crate::domain::ports::{AuditSink, NotificationDispatcher, VehicleRegistry};
pub use crate::utils::error::Result;

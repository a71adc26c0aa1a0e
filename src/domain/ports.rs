use crate::domain::model::{NotificationMessage, VehicleInfo};
use crate::utils::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait VehicleRegistry: Send + Sync {
    /// Fails with `FineError::Enrichment` when the plate is unknown or the registry is unreachable.
    async fn get_vehicle_info(&self, license_number: &str) -> Result<VehicleInfo>;
}

#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Resolves once the channel has acknowledged the message.
    async fn send(&self, message: &NotificationMessage) -> Result<()>;
}

/// Best-effort audit trail; recording never fails from the caller's point of view.
pub trait AuditSink: Send + Sync {
    fn record(&self, line: &str);
}

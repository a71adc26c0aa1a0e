// Adapters layer: concrete collaborators for the registry, the mail binding and the audit trail.

pub mod audit;
pub mod dispatch;
pub mod registry;

pub use audit::TracingAuditSink;
pub use dispatch::HttpBindingDispatcher;
pub use registry::HttpVehicleRegistry;

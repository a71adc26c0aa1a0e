// Domain layer: violation models and the ports to the registry, mail channel and audit trail.

pub mod model;
pub mod ports;

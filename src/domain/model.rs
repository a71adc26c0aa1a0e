use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A single speed-camera detection, as published by the traffic control service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedingViolation {
    pub license_number: String,
    pub road_id: String,
    /// km/h over the posted limit.
    pub excess_speed: u32,
    pub timestamp: NaiveDateTime,
}

/// Owner data returned by the vehicle registry.
///
/// Only the owner's name and e-mail address are interpreted; every other
/// registry field lands in `extra` and is carried along untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInfo {
    pub owner_name: String,
    pub owner_email: String,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl VehicleInfo {
    pub fn new(owner_name: impl Into<String>, owner_email: impl Into<String>) -> Self {
        Self {
            owner_name: owner_name.into(),
            owner_email: owner_email.into(),
            extra: HashMap::new(),
        }
    }
}

pub const PROSECUTOR_DECISION: &str = "to be decided by the prosecutor";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fine {
    /// Whole euros, administrative costs included.
    Amount(u32),
    /// Too severe for an automated fine; a prosecutor decides.
    Undetermined,
}

impl Fine {
    /// Text used in notifications and the audit trail.
    pub fn description(&self) -> String {
        match self {
            Fine::Amount(euros) => format!("EUR {:.2}", f64::from(*euros)),
            Fine::Undetermined => PROSECUTOR_DECISION.to_string(),
        }
    }
}

impl fmt::Display for Fine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

/// Routing metadata understood by the outbound mail binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailMetadata {
    pub email_from: String,
    pub email_to: String,
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub body: String,
    pub metadata: EmailMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedViolation {
    pub license_number: String,
    pub fine: Fine,
    pub recipient: String,
}

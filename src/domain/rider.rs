use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiderStatus {
    Available,
    Busy,
    Offline,
}

impl fmt::Display for RiderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiderStatus::Available => "available",
            RiderStatus::Busy => "busy",
            RiderStatus::Offline => "offline",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleKind {
    Bike,
    Scooter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub kind: VehicleKind,
    pub registration: String,
}

/// A fleet delivery worker.
///
/// Invariant: `status == Busy` iff `current_order_id` is set. The order id is a
/// weak back-reference maintained by the assignment workflow, never a second
/// source of truth about the order itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rider {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub status: RiderStatus,
    pub current_order_id: Option<String>,
    pub total_deliveries: u32,
    pub rating: f32,
    pub vehicle: Vehicle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiderCreate {
    pub name: String,
    pub phone: String,
    pub vehicle: Vehicle,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiderPatch {
    pub phone: Option<String>,
    pub rating: Option<f32>,
}

#[derive(Debug, Clone, Default)]
pub struct RiderFilter {
    pub status: Option<RiderStatus>,
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::store::Record;

/// A completed maintenance service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: String,
    /// Owning vehicle, by ID. The vehicle may since have been deleted.
    pub vehicle_id: String,
    /// Service category, e.g. "Oil Change"
    pub service: String,
    pub date: NaiveDate,
    /// Odometer reading when the service was performed
    pub mileage: u32,
    pub cost: f64,
    pub shop: String,
    #[serde(default)]
    pub notes: String,
}

impl Record for ServiceRecord {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Service categories offered when logging a new service.
pub const SERVICE_TYPES: &[&str] = &[
    "Oil Change",
    "Tire Rotation",
    "Brake Pad Replacement",
    "Air Filter Replacement",
    "Transmission Fluid Change",
    "Battery Replacement",
    "Spark Plug Replacement",
    "Coolant Flush",
    "Other",
];

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::store::Record;

/// An odometer reading for a vehicle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MileageEntry {
    pub id: String,
    pub vehicle_id: String,
    pub date: NaiveDate,
    pub mileage: u32,
}

impl Record for MileageEntry {
    fn id(&self) -> &str {
        &self.id
    }
}

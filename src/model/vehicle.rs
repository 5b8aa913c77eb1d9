use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::store::Record;

/// A vehicle in the garage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    /// Display name, e.g. "Family SUV"
    pub name: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_plate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<NaiveDate>,
}

impl Vehicle {
    /// "2019 Honda Civic"
    pub fn description(&self) -> String {
        format!("{} {} {}", self.year, self.make, self.model)
    }
}

impl Record for Vehicle {
    fn id(&self) -> &str {
        &self.id
    }
}

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::mileage::MileageEntry;
use super::reminder::Reminder;
use super::service::ServiceRecord;
use super::store::{RecordStore, StoreError};
use super::vehicle::Vehicle;

/// Which store a record lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Vehicles,
    Services,
    Reminders,
    Mileage,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Vehicles => write!(f, "vehicle"),
            Collection::Services => write!(f, "service"),
            Collection::Reminders => write!(f, "reminder"),
            Collection::Mileage => write!(f, "mileage entry"),
        }
    }
}

/// A record brought back by [`Garage::undo_at`]
#[derive(Debug, Clone, PartialEq)]
pub enum Restored {
    Vehicle(Vehicle),
    Service(ServiceRecord),
    Reminder(Reminder),
    Mileage(MileageEntry),
}

/// Plain serializable form of a garage, used for seed files and export
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GarageData {
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
    #[serde(default)]
    pub services: Vec<ServiceRecord>,
    #[serde(default)]
    pub reminders: Vec<Reminder>,
    #[serde(default)]
    pub mileage: Vec<MileageEntry>,
}

/// All record stores of one session. Constructed at session start and
/// dropped at session end; nothing is persisted.
#[derive(Debug, Clone)]
pub struct Garage {
    pub vehicles: RecordStore<Vehicle>,
    pub services: RecordStore<ServiceRecord>,
    pub reminders: RecordStore<Reminder>,
    pub mileage: RecordStore<MileageEntry>,
    /// Store holding the most recent deletion, cleared by any other mutation
    last_delete: Option<Collection>,
}

impl Garage {
    pub fn new(undo_window: Duration) -> Self {
        Garage {
            vehicles: RecordStore::new(undo_window),
            services: RecordStore::new(undo_window),
            reminders: RecordStore::new(undo_window),
            mileage: RecordStore::new(undo_window),
            last_delete: None,
        }
    }

    pub fn from_data(data: GarageData, undo_window: Duration) -> Result<Self, StoreError> {
        Ok(Garage {
            vehicles: RecordStore::from_records(data.vehicles, undo_window)?,
            services: RecordStore::from_records(data.services, undo_window)?,
            reminders: RecordStore::from_records(data.reminders, undo_window)?,
            mileage: RecordStore::from_records(data.mileage, undo_window)?,
            last_delete: None,
        })
    }

    pub fn to_data(&self) -> GarageData {
        GarageData {
            vehicles: self.vehicles.as_slice().to_vec(),
            services: self.services.as_slice().to_vec(),
            reminders: self.reminders.as_slice().to_vec(),
            mileage: self.mileage.as_slice().to_vec(),
        }
    }

    /// Record that a non-delete mutation happened; any pending undo is gone.
    pub fn mark_mutated(&mut self) {
        self.last_delete = None;
    }

    /// Record that `collection` now holds the session's pending deletion.
    pub fn mark_deleted(&mut self, collection: Collection) {
        self.last_delete = Some(collection);
    }

    pub fn last_delete(&self) -> Option<Collection> {
        self.last_delete
    }

    /// Restore the most recent deletion, if it is still undoable.
    pub fn undo_at(&mut self, now: Instant) -> Result<Restored, StoreError> {
        let collection = self.last_delete.take().ok_or(StoreError::NothingToUndo)?;
        let restored = match collection {
            Collection::Vehicles => Restored::Vehicle(self.vehicles.undo_at(now)?.clone()),
            Collection::Services => Restored::Service(self.services.undo_at(now)?.clone()),
            Collection::Reminders => Restored::Reminder(self.reminders.undo_at(now)?.clone()),
            Collection::Mileage => Restored::Mileage(self.mileage.undo_at(now)?.clone()),
        };
        Ok(restored)
    }

    /// Display name for a vehicle ID; the raw ID when the vehicle is gone.
    pub fn vehicle_name<'a>(&'a self, vehicle_id: &'a str) -> &'a str {
        self.vehicles
            .get(vehicle_id)
            .map(|v| v.name.as_str())
            .unwrap_or(vehicle_id)
    }

    /// Resolve a user-supplied vehicle reference: an ID, or an exact
    /// (case-insensitive) vehicle name.
    pub fn resolve_vehicle(&self, reference: &str) -> Option<&Vehicle> {
        self.vehicles.get(reference).or_else(|| {
            self.vehicles
                .iter()
                .find(|v| v.name.eq_ignore_ascii_case(reference))
        })
    }

    /// Latest known odometer reading: the highest value across the
    /// vehicle's mileage log and its service records.
    pub fn current_mileage(&self, vehicle_id: &str) -> Option<u32> {
        let logged = self
            .mileage
            .iter()
            .filter(|e| e.vehicle_id == vehicle_id)
            .map(|e| e.mileage)
            .max();
        let serviced = self
            .services
            .iter()
            .filter(|s| s.vehicle_id == vehicle_id)
            .map(|s| s.mileage)
            .max();
        logged.max(serviced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::seed::sample_data;

    fn garage() -> Garage {
        Garage::from_data(sample_data(), Duration::from_secs(10)).unwrap()
    }

    #[test]
    fn vehicle_name_falls_back_to_id() {
        let g = garage();
        assert_eq!(g.vehicle_name("1"), "My Honda Civic");
        assert_eq!(g.vehicle_name("42"), "42");
    }

    #[test]
    fn resolve_vehicle_by_id_or_name() {
        let g = garage();
        assert_eq!(g.resolve_vehicle("2").unwrap().name, "Family SUV");
        assert_eq!(g.resolve_vehicle("family suv").unwrap().id, "2");
        assert!(g.resolve_vehicle("Tractor").is_none());
    }

    #[test]
    fn current_mileage_takes_highest_reading() {
        let mut g = garage();
        assert_eq!(g.current_mileage("1"), Some(45289));
        g.mileage = RecordStore::new(Duration::from_secs(10));
        assert_eq!(g.current_mileage("1"), Some(42500));
        assert_eq!(g.current_mileage("99"), None);
    }

    #[test]
    fn service_reading_above_log_counts() {
        let mut g = garage();
        let mut record = g.services.get("1").unwrap().clone();
        record.id = g.services.next_id();
        record.mileage = 50000;
        g.services.insert(record).unwrap();
        assert_eq!(g.current_mileage("1"), Some(50000));
    }

    #[test]
    fn undo_targets_last_deleted_store() {
        let mut g = garage();
        let now = Instant::now();
        g.services.remove_at("3", now).unwrap();
        g.mark_deleted(Collection::Services);
        let restored = g.undo_at(now).unwrap();
        assert!(matches!(restored, Restored::Service(s) if s.id == "3"));
        assert!(g.services.contains("3"));
    }

    #[test]
    fn mutation_elsewhere_discards_undo() {
        let mut g = garage();
        let now = Instant::now();
        g.vehicles.remove_at("2", now).unwrap();
        g.mark_deleted(Collection::Vehicles);
        g.mark_mutated();
        assert!(matches!(g.undo_at(now), Err(StoreError::NothingToUndo)));
        assert!(!g.vehicles.contains("2"));
    }

    #[test]
    fn data_round_trips() {
        let g = garage();
        let again = Garage::from_data(g.to_data(), Duration::from_secs(10)).unwrap();
        assert_eq!(again.to_data(), g.to_data());
    }
}

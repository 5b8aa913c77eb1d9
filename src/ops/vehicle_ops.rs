use std::time::Instant;

use chrono::NaiveDate;
use tracing::info;

use crate::model::garage::{Collection, Garage};
use crate::model::vehicle::Vehicle;
use crate::ops::OpError;
use crate::ops::validate::VehicleForm;

pub fn add_vehicle(garage: &mut Garage, form: &VehicleForm, today: NaiveDate) -> Result<Vehicle, OpError> {
    let draft = form.validate(today)?;
    let vehicle = draft.into_vehicle(garage.vehicles.next_id());
    garage.vehicles.insert(vehicle.clone())?;
    garage.mark_mutated();
    info!(id = %vehicle.id, name = %vehicle.name, "vehicle added");
    Ok(vehicle)
}

/// Replace a vehicle's fields, keeping its ID and position.
pub fn edit_vehicle(
    garage: &mut Garage,
    id: &str,
    form: &VehicleForm,
    today: NaiveDate,
) -> Result<Vehicle, OpError> {
    let draft = form.validate(today)?;
    let vehicle = draft.into_vehicle(id.to_string());
    garage.vehicles.update(vehicle.clone())?;
    garage.mark_mutated();
    info!(id, "vehicle updated");
    Ok(vehicle)
}

/// Service records, reminders and mileage entries of the vehicle are left
/// in place; they show the raw vehicle ID afterwards.
pub fn delete_vehicle(garage: &mut Garage, id: &str, now: Instant) -> Result<Vehicle, OpError> {
    let vehicle = garage.vehicles.remove_at(id, now)?;
    garage.mark_deleted(Collection::Vehicles);
    info!(id, name = %vehicle.name, "vehicle deleted");
    Ok(vehicle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::seed::sample_data;
    use crate::ops::undo::undo_last;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn garage() -> Garage {
        Garage::from_data(sample_data(), Duration::from_secs(10)).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }

    fn form(year: &str) -> VehicleForm {
        VehicleForm {
            name: "Work Truck".into(),
            make: "Ford".into(),
            model: "F-150".into(),
            year: year.into(),
            ..Default::default()
        }
    }

    #[test]
    fn add_assigns_next_id() {
        let mut g = garage();
        let vehicle = add_vehicle(&mut g, &form("2018"), today()).unwrap();
        assert_eq!(vehicle.id, "3");
        assert_eq!(g.vehicles.len(), 3);
        assert_eq!(g.vehicles.as_slice()[2].name, "Work Truck");
    }

    #[test]
    fn invalid_year_leaves_store_unchanged() {
        let mut g = garage();
        let before = g.to_data();
        let err = add_vehicle(&mut g, &form("1899"), today()).unwrap_err();
        match err {
            OpError::Invalid(errors) => assert!(errors.get("year").is_some()),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(g.to_data(), before);
    }

    #[test]
    fn edit_keeps_position() {
        let mut g = garage();
        let mut f = VehicleForm::from_vehicle(g.vehicles.get("1").unwrap());
        f.name = "Daily Driver".into();
        edit_vehicle(&mut g, "1", &f, today()).unwrap();
        assert_eq!(g.vehicles.as_slice()[0].name, "Daily Driver");
        assert_eq!(g.vehicles.as_slice()[0].license_plate.as_deref(), Some("ABC-1234"));
    }

    #[test]
    fn edit_missing_vehicle() {
        let mut g = garage();
        let err = edit_vehicle(&mut g, "9", &form("2018"), today()).unwrap_err();
        assert!(matches!(err, OpError::Store(_)));
    }

    #[test]
    fn delete_then_undo_restores() {
        let mut g = garage();
        let before = g.to_data();
        let now = Instant::now();
        delete_vehicle(&mut g, "1", now).unwrap();
        assert_eq!(g.vehicles.len(), 1);
        undo_last(&mut g, now).unwrap();
        assert_eq!(g.to_data(), before);
    }
}

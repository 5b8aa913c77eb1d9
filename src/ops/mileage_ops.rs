use std::time::Instant;

use tracing::info;

use crate::model::garage::{Collection, Garage};
use crate::model::mileage::MileageEntry;
use crate::ops::OpError;
use crate::ops::validate::MileageForm;

/// Append an odometer reading for a vehicle.
pub fn log_mileage(garage: &mut Garage, form: &MileageForm) -> Result<MileageEntry, OpError> {
    let draft = form.validate(garage)?;
    let entry = MileageEntry {
        id: garage.mileage.next_id(),
        vehicle_id: draft.vehicle_id,
        date: draft.date,
        mileage: draft.mileage,
    };
    garage.mileage.insert(entry.clone())?;
    garage.mark_mutated();
    info!(id = %entry.id, vehicle = %entry.vehicle_id, mileage = entry.mileage, "mileage logged");
    Ok(entry)
}

pub fn delete_entry(garage: &mut Garage, id: &str, now: Instant) -> Result<MileageEntry, OpError> {
    let entry = garage.mileage.remove_at(id, now)?;
    garage.mark_deleted(Collection::Mileage);
    info!(id, vehicle = %entry.vehicle_id, "mileage entry deleted");
    Ok(entry)
}

use std::time::Instant;

use tracing::info;

use crate::model::garage::{Collection, Garage};
use crate::model::service::ServiceRecord;
use crate::model::store::StoreError;
use crate::ops::OpError;
use crate::ops::validate::ServiceForm;

pub fn add_service(garage: &mut Garage, form: &ServiceForm) -> Result<ServiceRecord, OpError> {
    let draft = form.validate(garage)?;
    let record = draft.into_record(garage.services.next_id());
    garage.services.insert(record.clone())?;
    garage.mark_mutated();
    info!(
        id = %record.id,
        vehicle = %record.vehicle_id,
        service = %record.service,
        cost = record.cost,
        "service record added"
    );
    Ok(record)
}

/// Records of a deleted vehicle stay editable.
pub fn edit_service(garage: &mut Garage, id: &str, form: &ServiceForm) -> Result<ServiceRecord, OpError> {
    let existing = garage
        .services
        .get(id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
    let draft = form.validate_edit(garage, existing)?;
    let record = draft.into_record(id.to_string());
    garage.services.update(record.clone())?;
    garage.mark_mutated();
    info!(id, "service record updated");
    Ok(record)
}

pub fn delete_service(garage: &mut Garage, id: &str, now: Instant) -> Result<ServiceRecord, OpError> {
    let record = garage.services.remove_at(id, now)?;
    garage.mark_deleted(Collection::Services);
    info!(id, service = %record.service, "service record deleted");
    Ok(record)
}

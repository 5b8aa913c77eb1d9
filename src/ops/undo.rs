use std::time::Instant;

use tracing::{debug, info};

use crate::model::garage::{Garage, Restored};
use crate::model::store::StoreError;
use crate::ops::OpError;

/// Restore the session's most recent deletion.
pub fn undo_last(garage: &mut Garage, now: Instant) -> Result<Restored, OpError> {
    let collection = garage.last_delete();
    match garage.undo_at(now) {
        Ok(restored) => {
            info!(collection = ?collection, "deletion undone");
            Ok(restored)
        }
        Err(e) => {
            if let StoreError::UndoExpired(ref id) = e {
                debug!(id = %id, "undo window closed");
            }
            Err(e.into())
        }
    }
}

pub mod aggregate;
pub mod due;
pub mod filter;
pub mod mileage_ops;
pub mod overview;
pub mod reminder_ops;
pub mod service_ops;
pub mod undo;
pub mod validate;
pub mod vehicle_ops;

use crate::model::store::StoreError;
use validate::FieldErrors;

/// Error type for entity operations
#[derive(Debug, thiserror::Error)]
pub enum OpError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Invalid(#[from] FieldErrors),
}

pub mod config;
pub mod garage;
pub mod mileage;
pub mod reminder;
pub mod seed;
pub mod service;
pub mod store;
pub mod vehicle;

pub use config::*;
pub use garage::*;
pub use mileage::*;
pub use reminder::*;
pub use service::*;
pub use store::*;
pub use vehicle::*;

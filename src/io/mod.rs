pub mod config_io;
pub mod garage_io;

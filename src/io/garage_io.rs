use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;

use crate::model::garage::{Garage, GarageData};
use crate::model::seed::sample_data;
use crate::model::store::StoreError;

/// Error type for loading and exporting garage data
#[derive(Debug, thiserror::Error)]
pub enum GarageIoError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid data in {path}: {source}")]
    InvalidData { path: PathBuf, source: StoreError },
    #[error("could not serialize garage: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// Build the session garage from a JSON seed file, or from the built-in
/// sample data when no file is given. The file is only ever read.
pub fn load_garage(seed: Option<&Path>, undo_window: Duration) -> Result<Garage, GarageIoError> {
    let Some(path) = seed else {
        return Garage::from_data(sample_data(), undo_window).map_err(|e| GarageIoError::InvalidData {
            path: PathBuf::from("<sample>"),
            source: e,
        });
    };
    let text = fs::read_to_string(path).map_err(|e| GarageIoError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let data: GarageData = serde_json::from_str(&text).map_err(|e| GarageIoError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let garage = Garage::from_data(data, undo_window).map_err(|e| GarageIoError::InvalidData {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!(
        path = %path.display(),
        vehicles = garage.vehicles.len(),
        services = garage.services.len(),
        reminders = garage.reminders.len(),
        "loaded seed data"
    );
    Ok(garage)
}

/// Session data as pretty JSON, in the seed file format.
pub fn export_json(garage: &Garage) -> Result<String, GarageIoError> {
    Ok(serde_json::to_string_pretty(&garage.to_data())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const WINDOW: Duration = Duration::from_secs(10);

    #[test]
    fn default_is_sample_data() {
        let garage = load_garage(None, WINDOW).unwrap();
        assert_eq!(garage.to_data(), sample_data());
    }

    #[test]
    fn export_then_load() {
        let tmp = TempDir::new().unwrap();
        let garage = load_garage(None, WINDOW).unwrap();
        let path = tmp.path().join("garage.json");
        fs::write(&path, export_json(&garage).unwrap()).unwrap();
        let loaded = load_garage(Some(&path), WINDOW).unwrap();
        assert_eq!(loaded.to_data(), garage.to_data());
    }

    #[test]
    fn partial_seed_defaults_missing_collections() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("garage.json");
        fs::write(
            &path,
            r#"{"vehicles":[{"id":"1","name":"Civic","make":"Honda","model":"Civic","year":2019}]}"#,
        )
        .unwrap();
        let garage = load_garage(Some(&path), WINDOW).unwrap();
        assert_eq!(garage.vehicles.len(), 1);
        assert!(garage.services.is_empty());
    }

    #[test]
    fn duplicate_ids_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("garage.json");
        let mut data = sample_data();
        data.vehicles.push(data.vehicles[0].clone());
        fs::write(&path, serde_json::to_string(&data).unwrap()).unwrap();
        let err = load_garage(Some(&path), WINDOW).unwrap_err();
        assert!(matches!(
            err,
            GarageIoError::InvalidData {
                source: StoreError::DuplicateId(_),
                ..
            }
        ));
    }

    #[test]
    fn malformed_json_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("garage.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            load_garage(Some(&path), WINDOW),
            Err(GarageIoError::ParseError { .. })
        ));
    }
}

use log::{error, info};
use thiserror::Error;
use crate::clock::Clock;
use crate::manager_storage::{ObjectStore, StorageError};
use crate::models::WeatherRecord;

pub const CSV_HEADER: [&str; 6] = ["city", "temperature", "feels_like", "humidity", "description", "timestamp"];
const CONTENT_TYPE: &str = "text/csv";

/// Serializes the records to CSV text, header first and records in the given order
///
/// # Arguments
///
/// * 'records' - records to serialize
pub fn to_csv(records: &[WeatherRecord]) -> Result<String, SnapshotError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }

    let bytes = writer.into_inner()
        .map_err(|e| SnapshotError::Serialize(e.to_string()))?;

    String::from_utf8(bytes).map_err(|e| SnapshotError::Serialize(e.to_string()))
}

/// Builds the object key for a snapshot written at the given timestamp
///
/// # Arguments
///
/// * 'prefix' - key prefix, i.e. the "directory" in the bucket
/// * 'timestamp' - write time formatted as `YYYYMMDD-HHMMSS`
pub fn snapshot_key(prefix: &str, timestamp: &str) -> String {
    format!("{}/all-cities-{}.csv", prefix.trim_end_matches('/'), timestamp)
}

/// Writes all records as one CSV object and returns the key it was written under.
/// Nothing is written for an empty record list.
///
/// # Arguments
///
/// * 'store' - object store to upload to
/// * 'records' - the snapshot records, in city processing order
/// * 'clock' - clock used for the object key timestamp
/// * 'prefix' - key prefix
pub fn write_snapshot(store: &dyn ObjectStore, records: &[WeatherRecord], clock: &dyn Clock, prefix: &str) -> Result<String, SnapshotError> {
    if records.is_empty() {
        return Err(SnapshotError::Empty);
    }

    let key = snapshot_key(prefix, &clock.timestamp());
    let body = to_csv(records)?;

    store.put_object(&key, body.as_bytes(), CONTENT_TYPE)
        .map_err(|e| {
            error!("error saving snapshot {} to bucket {}: {}", key, store.bucket_name(), e);
            SnapshotError::Upload(e)
        })?;

    info!("saved weather data for {} cities to {}/{}", records.len(), store.bucket_name(), key);
    Ok(key)
}

/// Error depicting errors that occur while writing a snapshot
///
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("EmptySnapshotError: no weather records to write")]
    Empty,
    #[error("SerializeError: {0}")]
    Serialize(String),
    #[error("UploadError: {0}")]
    Upload(#[from] StorageError),
}

impl From<csv::Error> for SnapshotError {
    fn from(e: csv::Error) -> Self {
        SnapshotError::Serialize(e.to_string())
    }
}

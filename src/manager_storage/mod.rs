mod s3_store;

use log::{error, info};
use thiserror::Error;

pub use crate::manager_storage::s3_store::S3Store;

/// Minimal object storage capability needed to persist snapshots
pub trait ObjectStore {
    fn bucket_name(&self) -> &str;

    /// Checks that the bucket exists and is reachable
    fn probe_bucket(&self) -> Result<(), StorageError>;

    fn create_bucket(&self) -> Result<(), StorageError>;

    fn put_object(&self, key: &str, body: &[u8], content_type: &str) -> Result<(), StorageError>;
}

/// Outcome of making sure the target bucket is there
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BucketState {
    Existing,
    Created,
    CreateFailed,
}

/// Makes sure the bucket exists, creating it if the probe says it is missing.
/// Creation failures are logged and reported as `CreateFailed`, a later upload may then fail.
/// Any other probe error is returned as is and no creation is attempted.
///
/// # Arguments
///
/// * 'store' - the object store holding the bucket
pub fn ensure_bucket(store: &dyn ObjectStore) -> Result<BucketState, StorageError> {
    match store.probe_bucket() {
        Ok(()) => {
            info!("bucket {} exists", store.bucket_name());
            Ok(BucketState::Existing)
        }
        Err(StorageError::NotFound) => {
            info!("creating bucket {}", store.bucket_name());
            match store.create_bucket() {
                Ok(()) => {
                    info!("successfully created bucket {}", store.bucket_name());
                    Ok(BucketState::Created)
                }
                Err(e) => {
                    error!("error creating bucket {}: {}", store.bucket_name(), e);
                    Ok(BucketState::CreateFailed)
                }
            }
        }
        Err(e) => Err(e),
    }
}

/// Error depicting errors that occur while talking to object storage
///
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("NotFoundError: bucket does not exist")]
    NotFound,
    #[error("PermissionDeniedError: {0}")]
    PermissionDenied(String),
    #[error("StatusError: http status {0}: {1}")]
    Status(u16, String),
    #[error("TransportError: {0}")]
    Transport(String),
    #[error("SetupError: {0}")]
    Setup(String),
}

use log::{debug, warn};
use s3::bucket_ops::BucketConfiguration;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::{Bucket, Region};
use crate::config::StorageParameters;
use crate::manager_storage::{ObjectStore, StorageError};

/// Object store backed by S3 or an S3-compatible service
pub struct S3Store {
    name: String,
    region: Region,
    credentials: Credentials,
    path_style: bool,
    bucket: Box<Bucket>,
}

impl S3Store {
    /// Returns a new S3 store for the given bucket.
    /// Credentials are picked up from the standard AWS environment variables or profile,
    /// without any the store is anonymous and the service will refuse our requests.
    ///
    /// # Arguments
    ///
    /// * 'config' - storage configuration parameters
    /// * 'bucket_name' - name of the bucket to write snapshots to
    pub fn new(config: &StorageParameters, bucket_name: &str) -> Result<Self, StorageError> {
        let credentials = match Credentials::default() {
            Ok(c) => c,
            Err(e) => {
                warn!("no storage credentials found, continuing anonymously: {}", e);
                Credentials::anonymous()
                    .map_err(|e| StorageError::Setup(format!("credentials: {}", e)))?
            }
        };

        Self::with_credentials(config, bucket_name, credentials)
    }

    /// Returns a new S3 store using the given credentials.
    /// Every storage call goes out exactly once, the client's own retries are switched off.
    ///
    /// # Arguments
    ///
    /// * 'config' - storage configuration parameters
    /// * 'bucket_name' - name of the bucket to write snapshots to
    /// * 'credentials' - credentials to sign requests with
    pub fn with_credentials(config: &StorageParameters, bucket_name: &str, credentials: Credentials) -> Result<Self, StorageError> {
        s3::set_retries(0);

        let (region, path_style) = match &config.endpoint {
            Some(endpoint) => (Region::Custom { region: config.region.clone(), endpoint: endpoint.clone() }, true),
            None => {
                let region = config.region.parse::<Region>()
                    .map_err(|e| StorageError::Setup(format!("region {}: {}", config.region, e)))?;
                (region, false)
            }
        };

        let mut bucket = Bucket::new(bucket_name, region.clone(), credentials.clone())
            .map_err(|e| StorageError::Setup(format!("bucket handle: {}", e)))?;
        if path_style {
            bucket = bucket.with_path_style();
        }

        Ok(Self {
            name: bucket_name.to_string(),
            region,
            credentials,
            path_style,
            bucket,
        })
    }
}

impl ObjectStore for S3Store {
    fn bucket_name(&self) -> &str {
        &self.name
    }

    /// Probes the bucket with a single key listing, which answers 404 for a missing bucket
    /// and 403 when we are not allowed to look into it
    fn probe_bucket(&self) -> Result<(), StorageError> {
        let (_, code) = self.bucket
            .list_page(String::new(), None, None, None, Some(1))
            .map_err(map_s3_error)?;
        debug!("bucket probe for {} answered {}", self.name, code);

        Ok(())
    }

    fn create_bucket(&self) -> Result<(), StorageError> {
        let config = BucketConfiguration::default();
        let response = if self.path_style {
            Bucket::create_with_path_style(&self.name, self.region.clone(), self.credentials.clone(), config)
        } else {
            Bucket::create(&self.name, self.region.clone(), self.credentials.clone(), config)
        }
        .map_err(map_s3_error)?;

        if !response.success() {
            return Err(StorageError::Status(response.response_code, response.response_text));
        }

        Ok(())
    }

    fn put_object(&self, key: &str, body: &[u8], content_type: &str) -> Result<(), StorageError> {
        let response = self.bucket
            .put_object_with_content_type(key, body, content_type)
            .map_err(map_s3_error)?;

        let code = response.status_code();
        if !(200..300).contains(&code) {
            return Err(StorageError::Status(code, String::from_utf8_lossy(response.as_slice()).to_string()));
        }

        Ok(())
    }
}

/// Sorts S3 errors into the conditions the snapshot writer cares about
///
/// # Arguments
///
/// * 'error' - the error returned by the S3 client
fn map_s3_error(error: S3Error) -> StorageError {
    match error {
        S3Error::HttpFailWithBody(404, _) => StorageError::NotFound,
        S3Error::HttpFailWithBody(403, body) => StorageError::PermissionDenied(body),
        S3Error::HttpFailWithBody(code, body) => StorageError::Status(code, body),
        S3Error::Credentials(e) => StorageError::Setup(format!("credentials: {}", e)),
        other => StorageError::Transport(other.to_string()),
    }
}

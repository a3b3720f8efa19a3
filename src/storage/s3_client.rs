// S3 client: a fresh bucket handle per call, nothing cached between requests

use async_trait::async_trait;
use bytes::Bytes;
use s3::creds::Credentials;
use s3::{Bucket, Region};
use tracing::debug;

use super::{public_url, ObjectStorage, StorageError};
use crate::config::StorageConfig;

#[derive(Debug, Clone)]
pub struct S3Storage {
    config: StorageConfig,
}

impl S3Storage {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    fn region(&self) -> Result<Region, StorageError> {
        match &self.config.endpoint {
            Some(endpoint) => Ok(Region::Custom {
                region: self.config.region.clone(),
                endpoint: endpoint.clone(),
            }),
            None => self
                .config
                .region
                .parse::<Region>()
                .map_err(|e| StorageError::Connect(Box::new(e))),
        }
    }

    /// Explicit keys when configured, otherwise the provider chain
    /// (environment, profile, instance metadata). The chain can make blocking
    /// HTTP calls, so it runs on the blocking pool.
    async fn credentials(&self) -> Result<Credentials, StorageError> {
        let access_key = self.config.access_key.clone();
        let secret_key = self.config.secret_key.clone();

        tokio::task::spawn_blocking(move || {
            Credentials::new(access_key.as_deref(), secret_key.as_deref(), None, None, None)
        })
        .await
        .map_err(|e| StorageError::Connect(Box::new(e)))?
        .map_err(|e| StorageError::Connect(Box::new(e)))
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put_object(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let credentials = self.credentials().await?;
        let bucket = Bucket::new(&self.config.bucket, self.region()?, credentials)
            .map_err(|e| StorageError::Connect(Box::new(e)))?;
        // custom endpoints are usually MinIO-style servers without DNS buckets
        let bucket = if self.config.endpoint.is_some() {
            bucket.with_path_style()
        } else {
            bucket
        };

        let response = bucket
            .put_object_with_content_type(key, &data, content_type)
            .await
            .map_err(|e| StorageError::Upload(Box::new(e)))?;

        let status = response.status_code();
        if !(200..300).contains(&status) {
            return Err(StorageError::Rejected { status });
        }

        debug!(key, size = data.len(), status, "object stored");
        Ok(())
    }

    fn object_url(&self, key: &str) -> String {
        public_url(&self.config.bucket, &self.config.region, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: Option<&str>) -> StorageConfig {
        StorageConfig {
            bucket: "uploads".to_string(),
            region: "eu-west-1".to_string(),
            access_key: Some("AKIDEXAMPLE".to_string()),
            secret_key: Some("secret".to_string()),
            endpoint: endpoint.map(str::to_string),
        }
    }

    #[test]
    fn test_region_from_name() {
        let storage = S3Storage::new(&config(None));
        assert_eq!(storage.region().unwrap(), Region::EuWest1);
    }

    #[test]
    fn test_region_with_custom_endpoint() {
        let storage = S3Storage::new(&config(Some("http://127.0.0.1:9000")));
        assert_eq!(
            storage.region().unwrap(),
            Region::Custom {
                region: "eu-west-1".to_string(),
                endpoint: "http://127.0.0.1:9000".to_string(),
            }
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_explicit_credentials() {
        let storage = S3Storage::new(&config(None));
        let creds = storage.credentials().await.unwrap();
        assert_eq!(creds.access_key.as_deref(), Some("AKIDEXAMPLE"));
        assert_eq!(creds.secret_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_object_url_ignores_endpoint() {
        let storage = S3Storage::new(&config(Some("http://127.0.0.1:9000")));
        assert_eq!(
            storage.object_url("notes.txt"),
            "https://uploads.s3.eu-west-1.amazonaws.com/notes.txt"
        );
    }
}

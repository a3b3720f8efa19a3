// Object storage layer (S3-compatible)

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error as ThisError;

pub mod s3_client;

pub use s3_client::*;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(ThisError, Debug)]
pub enum StorageError {
    /// The client could not be built (credentials, region, bucket name)
    #[error("failed to open storage client: {0}")]
    Connect(#[source] BoxError),

    #[error("failed to put object: {0}")]
    Upload(#[source] BoxError),

    #[error("storage rejected object with status {status}")]
    Rejected { status: u16 },
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Writes `data` under `key`, replacing any existing object.
    async fn put_object(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// Public URL of the object stored under `key`.
    fn object_url(&self, key: &str) -> String;
}

/// Virtual-hosted-style URL for `key` in `bucket`.
pub fn public_url(bucket: &str, region: &str, key: &str) -> String {
    format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_url() {
        assert_eq!(
            public_url("my-bucket", "us-east-1", "report.CSV"),
            "https://my-bucket.s3.us-east-1.amazonaws.com/report.CSV"
        );
    }
}

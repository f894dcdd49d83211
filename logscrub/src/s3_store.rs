// logscrub/src/s3_store.rs
//! `ObjectStore` backed by Amazon S3.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use log::debug;

use logscrub_core::{ObjectStore, ScrubError};

#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
}

impl S3Store {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from the standard AWS environment (region, credentials chain).
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self::new(Client::new(&config))
    }
}

fn store_error<E>(op: &'static str, bucket: &str, key: &str, err: E) -> ScrubError
where
    E: std::error::Error + Send + Sync + 'static,
{
    ScrubError::store(op, bucket, key, DisplayErrorContext(err).to_string())
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ScrubError> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| store_error("get", bucket, key, e))?;
        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| store_error("get", bucket, key, e))?
            .to_vec();
        debug!("S3Store: read {} bytes from s3://{}/{}", bytes.len(), bucket, key);
        Ok(bytes)
    }

    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), ScrubError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| store_error("put", bucket, key, e))?;
        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), ScrubError> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| store_error("delete", bucket, key, e))?;
        Ok(())
    }
}

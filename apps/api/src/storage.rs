use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;

use crate::config::Config;

/// Destination for uploaded page images.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()>;
}

/// S3 / MinIO backed object store.
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Constructs an S3 client configured for MinIO (local) or AWS (production).
    pub async fn from_config(config: &Config) -> Self {
        let credentials = Credentials::new(
            &config.aws_access_key_id,
            &config.aws_secret_access_key,
            None,
            None,
            "portfolio-static",
        );

        let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(credentials)
            .endpoint_url(&config.s3_endpoint)
            .load()
            .await;

        Self {
            client: aws_sdk_s3::Client::new(&s3_config),
            bucket: config.s3_bucket.clone(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("S3 upload failed: {e}"))?;

        info!("Uploaded s3://{}/{}", self.bucket, key);
        Ok(())
    }
}

/// Object key for an uploaded image: `pages/<page>/<section>/<uuid>.<ext>`.
pub fn image_key(page_key: &str, section_key: &str, extension: &str) -> String {
    format!(
        "pages/{}/{}/{}.{}",
        page_key,
        section_key,
        uuid::Uuid::new_v4(),
        extension
    )
}

/// Maps an accepted image content type to a file extension.
pub fn image_extension(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/png" => Some("png"),
        "image/jpeg" => Some("jpg"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        "image/avif" => Some("avif"),
        "image/svg+xml" => Some("svg"),
        _ => None,
    }
}

#[cfg(test)]
pub mod memory {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct MemoryObjectStore {
        pub objects: Mutex<Vec<(String, usize, String)>>,
    }

    #[async_trait]
    impl ObjectStore for MemoryObjectStore {
        async fn put(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()> {
            self.objects
                .lock()
                .unwrap()
                .push((key.to_string(), body.len(), content_type.to_string()));
            Ok(())
        }
    }
}

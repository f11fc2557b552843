//! Participant image uploads.
//!
//! Files are streamed straight from the multipart body into the object store
//! under `<unix-millis>-<file name>`, with the name reduced to `[A-Za-z0-9._-]`
//! so the key can be used verbatim in a URL. Two uploads of the same name within
//! the same millisecond share a key.

use std::sync::Arc;

use anyhow::Context;
use axum::body::Bytes;
use axum::extract::multipart::Field;
use chrono::Utc;
use futures::{Stream, StreamExt};
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::path::Path;
use object_store::{ObjectStore, WriteMultipart};

use crate::config::Config;
use crate::error::{WebError, WebResult};

pub const BACKGROUND_IMAGE: &str = "backgroundImage";
pub const PROFILE_PICTURE: &str = "profilePicture";

/// Form fields that may carry a file.
pub const FILE_SLOTS: &[&str] = &[BACKGROUND_IMAGE, PROFILE_PICTURE];

/// Parts buffered in memory before the writer waits on in-flight uploads.
const MAX_PARTS_IN_FLIGHT: usize = 4;

/// Public prefix of the local upload directory, relative to the API host.
pub const LOCAL_UPLOADS_URL: &str = "/uploads";

#[derive(Debug, Clone)]
pub struct StoredUpload {
    pub slot: String,
    pub path: Path,
    pub url: String,
}

#[derive(Clone)]
pub struct UploadStore {
    store: Arc<dyn ObjectStore>,
    public_base_url: String,
}

impl UploadStore {
    pub fn new(store: Arc<dyn ObjectStore>, public_base_url: impl Into<String>) -> Self {
        Self {
            store,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// S3 when a bucket is configured, otherwise the local uploads directory.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        match &config.aws_bucket_name {
            Some(bucket) => {
                let s3 = AmazonS3Builder::from_env()
                    .with_bucket_name(bucket)
                    .with_region(&config.aws_region)
                    .build()
                    .context("Failed to configure S3 upload store")?;

                let base_url = config.upload_public_url.clone().unwrap_or_else(|| {
                    format!("https://{}.s3.{}.amazonaws.com", bucket, config.aws_region)
                });

                tracing::info!("Uploads go to S3 bucket {}", bucket);
                Ok(Self::new(Arc::new(s3), base_url))
            }
            None => {
                std::fs::create_dir_all(&config.upload_dir).with_context(|| {
                    format!("Cannot create upload dir {}", config.upload_dir.display())
                })?;
                let local = LocalFileSystem::new_with_prefix(&config.upload_dir)
                    .context("Failed to open local upload store")?;

                let base_url = local_base_url(config);

                tracing::info!(
                    "No bucket configured, uploads go to {}",
                    config.upload_dir.display()
                );
                Ok(Self::new(Arc::new(local), base_url))
            }
        }
    }

    pub fn public_url(&self, path: &Path) -> String {
        format!("{}/{}", self.public_base_url, path)
    }

    /// Streams one file field into the store.
    pub async fn store_field(&self, slot: &str, field: Field<'_>) -> WebResult<StoredUpload> {
        let file_name = field.file_name().unwrap_or_default().to_string();
        let path = Path::from(object_key(&file_name, Utc::now().timestamp_millis()));

        let upload = self.store.put_multipart(&path).await?;
        stream_into(WriteMultipart::new(upload), field, &path).await?;
        tracing::debug!(slot, path = %path, "stored upload");

        Ok(StoredUpload {
            slot: slot.to_string(),
            url: self.public_url(&path),
            path,
        })
    }

    /// Removes objects whose participant was never saved.
    pub async fn discard(&self, uploads: &[StoredUpload]) {
        for upload in uploads {
            match self.store.delete(&upload.path).await {
                Ok(()) => tracing::info!("Discarded orphaned upload {}", upload.path),
                Err(e) => tracing::warn!("Failed to discard upload {}: {}", upload.path, e),
            }
        }
    }
}

/// `UPLOAD_PUBLIC_URL` if set, otherwise the host-relative `/uploads` mount.
/// The bind address is no use here since it is usually `0.0.0.0`.
fn local_base_url(config: &Config) -> String {
    config
        .upload_public_url
        .clone()
        .unwrap_or_else(|| LOCAL_UPLOADS_URL.to_string())
}

/// Writes a body stream through `writer`. Any failure before `finish` aborts the
/// multipart upload.
async fn stream_into<S, E>(mut writer: WriteMultipart, chunks: S, path: &Path) -> WebResult<()>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<WebError>,
{
    if let Err(e) = write_chunks(&mut writer, chunks).await {
        if let Err(abort_err) = writer.abort().await {
            tracing::warn!("Failed to abort upload of {}: {}", path, abort_err);
        }
        return Err(e);
    }

    writer.finish().await?;
    Ok(())
}

async fn write_chunks<S, E>(writer: &mut WriteMultipart, chunks: S) -> WebResult<()>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<WebError>,
{
    let mut chunks = std::pin::pin!(chunks);

    while let Some(chunk) = chunks.next().await {
        let chunk = chunk.map_err(Into::into)?;
        writer.wait_for_capacity(MAX_PARTS_IN_FLIGHT).await?;
        writer.write(&chunk);
    }

    Ok(())
}

/// `<millis>-<file name>` with any client-side directories dropped and every
/// character outside `[A-Za-z0-9._-]` replaced by `_`.
pub fn object_key(original_name: &str, millis: i64) -> String {
    let name: String = original_name
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let name = if name.is_empty() { "upload" } else { name.as_str() };

    format!("{}-{}", millis, name)
}

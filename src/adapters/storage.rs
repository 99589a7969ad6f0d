use crate::core::Storage;
use crate::utils::error::{EtlError, Result};
use std::path::{Component, Path, PathBuf};

#[cfg(feature = "lambda")]
use aws_sdk_s3::error::DisplayErrorContext;
#[cfg(feature = "lambda")]
use aws_sdk_s3::operation::get_object::GetObjectError;
#[cfg(feature = "lambda")]
use aws_sdk_s3::Client as S3Client;

/// Filesystem stand-in for the object store: `<base>/<bucket>/<key>`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    pub fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf> {
        let relative = Path::new(bucket).join(key);
        // 不允許跳出 base_path
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(EtlError::ProcessingError {
                message: format!("Invalid object location: {}/{}", bucket, key),
            });
        }
        Ok(Path::new(&self.base_path).join(relative))
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let full_path = self.object_path(bucket, key)?;
        tokio::fs::read(&full_path)
            .await
            .map_err(|e| EtlError::FetchError {
                message: format!("{}: {}", full_path.display(), e),
            })
    }

    async fn write_file(&self, bucket: &str, key: &str, data: &[u8]) -> Result<()> {
        let full_path = self.object_path(bucket, key)?;

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| EtlError::WriteError {
                    message: format!("{}: {}", parent.display(), e),
                })?;
        }

        tokio::fs::write(&full_path, data)
            .await
            .map_err(|e| EtlError::WriteError {
                message: format!("{}: {}", full_path.display(), e),
            })
    }
}

#[cfg(feature = "lambda")]
#[derive(Debug, Clone)]
pub struct S3Storage {
    client: S3Client,
}

#[cfg(feature = "lambda")]
impl S3Storage {
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }
}

#[cfg(feature = "lambda")]
impl Storage for S3Storage {
    async fn read_file(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let message = match e.as_service_error() {
                    Some(GetObjectError::NoSuchKey(_)) => {
                        format!("NoSuchKey: s3://{}/{} does not exist", bucket, key)
                    }
                    _ => format!(
                        "Failed to read s3://{}/{}: {}",
                        bucket,
                        key,
                        DisplayErrorContext(&e)
                    ),
                };
                EtlError::FetchError { message }
            })?;

        let data = resp.body.collect().await.map_err(|e| EtlError::FetchError {
            message: format!("Failed to collect S3 data: {}", e),
        })?;

        Ok(data.into_bytes().to_vec())
    }

    async fn write_file(&self, bucket: &str, key: &str, data: &[u8]) -> Result<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(data.to_vec().into())
            .send()
            .await
            .map_err(|e| EtlError::WriteError {
                message: format!(
                    "Failed to write s3://{}/{}: {}",
                    bucket,
                    key,
                    DisplayErrorContext(&e)
                ),
            })?;
        Ok(())
    }
}

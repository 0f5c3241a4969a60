//! S3 media object operations using the managed credentials.
//!
//! Every call takes the current [`CredentialSet`] and refuses expired sets.
//! An endpoint override with path-style addressing supports S3-compatible
//! providers (Oracle OCI compat mode, MinIO in testing).

use crate::error::{MediaError, MediaResult};
use crate::types::CredentialSet;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::primitives::ByteStream;
use chrono::{Datelike, Utc};
use tracing::debug;
use uuid::Uuid;

/// S3 transport for the media library.
pub struct MediaTransport {
    bucket: String,
    region: String,
    endpoint_override: Option<String>,
}

impl MediaTransport {
    pub fn new(bucket: String, region: String, endpoint_override: Option<String>) -> Self {
        Self {
            bucket,
            region,
            endpoint_override,
        }
    }

    pub fn from_config(config: &crate::config::MediaCloudConfig) -> Self {
        Self::new(
            config.bucket.clone(),
            config.region.clone(),
            config.s3_endpoint_override.clone(),
        )
    }

    /// Builds an S3 client from the current credentials.
    fn client(&self, creds: &CredentialSet) -> MediaResult<S3Client> {
        if creds.is_expired() {
            return Err(MediaError::CredentialExpired);
        }

        let credentials = aws_credential_types::Credentials::new(
            &creds.access_key_id,
            &creds.secret_access_key,
            Some(creds.session_token.clone()),
            None,
            "quill-media-sso",
        );

        let mut builder = aws_sdk_s3::Config::builder()
            .region(aws_types::region::Region::new(self.region.clone()))
            .credentials_provider(credentials)
            .behavior_version_latest();

        if let Some(ref endpoint) = self.endpoint_override {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Ok(S3Client::from_conf(builder.build()))
    }

    /// Uploads a media object with its browser-facing content type.
    pub async fn upload(
        &self,
        creds: &CredentialSet,
        key: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> MediaResult<()> {
        let client = self.client(creds)?;
        let size = data.len();

        client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| MediaError::S3(format!("upload failed for {key}: {e}")))?;

        debug!("uploaded {size} bytes to s3://{}/{key}", self.bucket);
        Ok(())
    }

    /// Downloads a media object.
    pub async fn download(&self, creds: &CredentialSet, key: &str) -> MediaResult<Vec<u8>> {
        let client = self.client(creds)?;

        let resp = client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| MediaError::S3(format!("download failed for {key}: {e}")))?;

        let body = resp
            .body
            .collect()
            .await
            .map_err(|e| MediaError::S3(format!("failed to read body for {key}: {e}")))?;

        let bytes = body.into_bytes().to_vec();
        debug!("downloaded {} bytes from s3://{}/{key}", bytes.len(), self.bucket);
        Ok(bytes)
    }

    /// Checks if a media object exists (HEAD request).
    pub async fn exists(&self, creds: &CredentialSet, key: &str) -> MediaResult<bool> {
        let client = self.client(creds)?;

        match client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                let service_err = e.into_service_error();
                if service_err.is_not_found() {
                    Ok(false)
                } else {
                    Err(MediaError::S3(format!(
                        "head object failed for {key}: {service_err}"
                    )))
                }
            }
        }
    }

    /// Deletes a media object.
    pub async fn delete(&self, creds: &CredentialSet, key: &str) -> MediaResult<()> {
        let client = self.client(creds)?;

        client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| MediaError::S3(format!("delete failed for {key}: {e}")))?;

        debug!("deleted s3://{}/{key}", self.bucket);
        Ok(())
    }

    /// Lists media object keys under a prefix.
    pub async fn list_keys(&self, creds: &CredentialSet, prefix: &str) -> MediaResult<Vec<String>> {
        let client = self.client(creds)?;

        let resp = client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .send()
            .await
            .map_err(|e| MediaError::S3(format!("list failed for prefix {prefix}: {e}")))?;

        let keys = resp
            .contents()
            .iter()
            .filter_map(|obj| obj.key().map(|k| k.to_string()))
            .collect();

        Ok(keys)
    }
}

/// Object key for a newly uploaded media file: `media/<yyyy>/<mm>/<uuid>-<name>`.
pub fn media_key(file_name: &str) -> String {
    let now = Utc::now();
    format!(
        "media/{:04}/{:02}/{}-{}",
        now.year(),
        now.month(),
        Uuid::new_v4(),
        sanitize_file_name(file_name)
    )
}

/// Keeps object keys URL- and console-safe.
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

/// Content type served for a media file, by extension.
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mp3") => "audio/mpeg",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

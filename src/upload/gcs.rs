use std::path::Path;
use std::time::Duration;

use crate::upload::{UploadError, Uploader, content_type_for};

pub const DEFAULT_UPLOAD_BASE_URL: &str = "https://storage.googleapis.com";

/// Uploads objects to a Google Cloud Storage (or Firebase Storage) bucket with the JSON API's
/// simple media upload, marking each object `publicRead`.
pub struct GcsUploader {
    http: reqwest::blocking::Client,
    base_url: String,
    bucket: String,
    access_token: String,
}

impl GcsUploader {
    pub fn new(
        bucket: impl Into<String>,
        access_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, UploadError> {
        let bucket = bucket.into();
        let access_token = access_token.into();
        if bucket.trim().is_empty() {
            return Err(UploadError::Auth("bucket name is empty".to_string()));
        }
        if access_token.trim().is_empty() {
            return Err(UploadError::Auth("access token is empty".to_string()));
        }
        let http = reqwest::blocking::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: DEFAULT_UPLOAD_BASE_URL.to_string(),
            bucket,
            access_token,
        })
    }

    /// Point at a different endpoint (emulators, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/upload/storage/v1/b/{}/o",
            self.base_url.trim_end_matches('/'),
            self.bucket
        )
    }

    /// Public download URL of an uploaded object.
    pub fn public_url(&self, remote_path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.bucket,
            remote_path
        )
    }
}

impl Uploader for GcsUploader {
    #[tracing::instrument(skip(self, local), fields(bucket = %self.bucket))]
    fn upload(&self, local: &Path, remote_path: &str) -> Result<(), UploadError> {
        let body = std::fs::read(local).map_err(|source| UploadError::Read {
            path: local.to_path_buf(),
            source,
        })?;
        let resp = self
            .http
            .post(self.upload_url())
            .query(&[
                ("uploadType", "media"),
                ("name", remote_path),
                ("predefinedAcl", "publicRead"),
            ])
            .bearer_auth(&self.access_token)
            .header(reqwest::header::CONTENT_TYPE, content_type_for(local))
            .body(body)
            .send()?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let body = resp.text().unwrap_or_default();
        Err(match status.as_u16() {
            401 | 403 => UploadError::Auth(body),
            code => UploadError::Status {
                remote: remote_path.to_string(),
                status: code,
                body,
            },
        })
    }
}

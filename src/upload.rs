//! Publishing finished batch folders to object storage.

pub mod gcs;

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use walkdir::WalkDir;

pub use gcs::GcsUploader;

/// Stores one local file under `remote_path`, publicly readable.
pub trait Uploader {
    fn upload(&self, local: &Path, remote_path: &str) -> Result<(), UploadError>;
}

impl<T: Uploader + ?Sized> Uploader for &T {
    fn upload(&self, local: &Path, remote_path: &str) -> Result<(), UploadError> {
        (**self).upload(local, remote_path)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("upload authentication failed: {0}")]
    Auth(String),

    #[error("could not read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not list '{}': {message}", path.display())]
    Walk { path: PathBuf, message: String },

    #[error("upload of '{remote}' returned HTTP {status}: {body}")]
    Status {
        remote: String,
        status: u16,
        body: String,
    },

    #[error("upload network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Outcome of [`upload_dir`]: what went up and what did not.
#[derive(Debug, Default)]
pub struct UploadReport {
    pub uploaded: Vec<String>,
    pub failed: Vec<(String, UploadError)>,
}

impl UploadReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Remote object name for `relative` under `prefix`, always `/`-separated.
pub fn remote_path_for(prefix: &str, relative: &Path) -> String {
    let rel = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        rel
    } else {
        format!("{prefix}/{rel}")
    }
}

pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("mp4") => "video/mp4",
        Some("txt") => "text/plain; charset=utf-8",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}

/// Upload every file under `dir` (recursively) to `prefix/<relative path>`.
///
/// Failures are collected per file; the walk never stops early.
#[tracing::instrument(skip(uploader), fields(dir = %dir.display()))]
pub fn upload_dir(uploader: &dyn Uploader, dir: &Path, prefix: &str) -> UploadReport {
    let mut report = UploadReport::default();
    let mut entries: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        match entry {
            Ok(e) if e.file_type().is_file() => entries.push(e.into_path()),
            Ok(_) => {}
            Err(err) => {
                let path = err.path().unwrap_or(dir).to_path_buf();
                warn!(path = %path.display(), error = %err, "skipping unreadable entry");
                report.failed.push((
                    path.display().to_string(),
                    UploadError::Walk {
                        path,
                        message: err.to_string(),
                    },
                ));
            }
        }
    }

    for path in entries {
        let Ok(relative) = path.strip_prefix(dir) else {
            continue;
        };
        let remote = remote_path_for(prefix, relative);
        match uploader.upload(&path, &remote) {
            Ok(()) => {
                info!(%remote, "uploaded");
                report.uploaded.push(remote);
            }
            Err(err) => {
                warn!(%remote, error = %err, "upload failed");
                report.failed.push((remote, err));
            }
        }
    }
    report
}

#[cfg(test)]
#[path = "../tests/unit/upload/upload.rs"]
mod tests;

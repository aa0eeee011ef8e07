use std::path::PathBuf;

use anyhow::Context;
use bytes::Bytes;
use tokio::fs;
use uuid::Uuid;

/// Disk-backed store for uploaded ad images. Files land under `root` with a
/// fresh uuid name and are served back via the static `/uploads` route.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the upload directory if it is missing.
    pub async fn init(&self) -> anyhow::Result<()> {
        fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("create upload dir {}", self.root.display()))?;
        Ok(())
    }

    /// Persist one uploaded file and return its public relative URL.
    pub async fn save(
        &self,
        filename: Option<&str>,
        content_type: Option<&str>,
        body: Bytes,
    ) -> anyhow::Result<String> {
        let ext: &str = match content_type.and_then(ext_from_mime) {
            Some(ext) => ext,
            None => filename.and_then(ext_from_filename).unwrap_or("bin"),
        };
        let stored_name = format!("{}.{}", Uuid::new_v4(), ext);
        let path = self.root.join(&stored_name);
        fs::write(&path, &body)
            .await
            .with_context(|| format!("write {}", path.display()))?;
        Ok(format!("/uploads/{}", stored_name))
    }
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/svg+xml" => Some("svg"),
        _ => None,
    }
}

/// Extension taken from the client filename; only short alphanumeric ones,
/// so the stored name cannot smuggle path separators.
fn ext_from_filename(name: &str) -> Option<&str> {
    let ext = name.rsplit('.').next()?;
    if ext.is_empty()
        || ext.len() == name.len()
        || ext.len() > 5
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext)
}

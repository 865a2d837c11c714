use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use uuid::Uuid;

/// Where uploaded scan images end up.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn store(&self, filename: &str, data: &[u8]) -> Result<()>;
}

/// Writes uploads to a local directory, created on first use.
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store(&self, filename: &str, data: &[u8]) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.root.join(filename), data).await?;
        Ok(())
    }
}

/// Collision-resistant storage name: random prefix plus the sanitized
/// original name.
pub fn unique_filename(original: &str) -> String {
    format!("{}_{}", Uuid::new_v4().simple(), sanitize(original))
}

/// Strip path components and anything outside [A-Za-z0-9._-].
fn sanitize(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_filename_keeps_original_name() {
        let name = unique_filename("scan.jpg");
        assert!(name.ends_with("_scan.jpg"));
        assert_ne!(unique_filename("scan.jpg"), unique_filename("scan.jpg"));
    }

    #[test]
    fn test_sanitize_strips_paths_and_odd_characters() {
        assert_eq!(sanitize("../../etc/passwd"), "passwd");
        assert_eq!(sanitize("my scan (1).png"), "my_scan__1_.png");
        assert_eq!(sanitize("C:\\scans\\head.jpg"), "head.jpg");
    }

    #[tokio::test]
    async fn test_local_store_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path());
        store.store("scan.jpg", b"bytes").await.unwrap();
        let written = tokio::fs::read(dir.path().join("scan.jpg")).await.unwrap();
        assert_eq!(written, b"bytes");
    }
}

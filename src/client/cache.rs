use crate::error::Result;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// On-disk store of response bodies keyed by the SHA-256 of the URL.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    directory: PathBuf,
}

impl ResponseCache {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn entry_path(&self, url: &str) -> PathBuf {
        let digest = Sha256::digest(url.as_bytes());
        self.directory.join(format!("{}.body", hex::encode(digest)))
    }

    pub fn get(&self, url: &str) -> Option<Vec<u8>> {
        fs::read(self.entry_path(url)).ok()
    }

    pub fn put(&self, url: &str, body: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.directory)?;
        let mut tmp = NamedTempFile::new_in(&self.directory)?;
        tmp.write_all(body)?;
        tmp.persist(self.entry_path(url)).map_err(|e| e.error)?;
        Ok(())
    }

    /// Removes every cached entry. Returns how many were deleted.
    pub fn clear(&self) -> Result<usize> {
        if !self.directory.exists() {
            return Ok(0);
        }
        let mut removed = 0;
        for entry in fs::read_dir(&self.directory)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) == Some("body") {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path().join("cache"));

        assert!(cache.get("https://peps.python.org/").is_none());
        cache.put("https://peps.python.org/", b"<html></html>").unwrap();
        assert_eq!(
            cache.get("https://peps.python.org/").unwrap(),
            b"<html></html>".to_vec()
        );
        assert!(cache.get("https://peps.python.org/pep-0008/").is_none());
    }

    #[test]
    fn test_clear_removes_entries() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path());
        cache.put("https://a.example/", b"a").unwrap();
        cache.put("https://b.example/", b"b").unwrap();
        fs::write(dir.path().join("unrelated.txt"), "keep").unwrap();

        assert_eq!(cache.clear().unwrap(), 2);
        assert!(cache.get("https://a.example/").is_none());
        assert!(dir.path().join("unrelated.txt").exists());
    }

    #[test]
    fn test_clear_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path().join("never-created"));
        assert_eq!(cache.clear().unwrap(), 0);
    }
}

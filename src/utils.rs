use crate::error::Result;
use chrono::{DateTime, Local};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Sortable and safe in file names on every platform.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Writes `content` to `dir/file_name` through a temporary file in the same
/// directory. The final name only appears once every byte is on disk; on any
/// error the temporary file is removed when it drops.
pub fn write_atomic(dir: &Path, file_name: &str, content: &[u8]) -> Result<PathBuf> {
    ensure_directory(dir)?;
    let path = dir.join(file_name);

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;
    tmp.persist(&path).map_err(|e| e.error)?;

    Ok(path)
}

pub fn timestamp(at: DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_write_atomic_leaves_only_final_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("downloads");

        let path = write_atomic(&target, "docs.zip", b"PK\x03\x04").unwrap();

        assert_eq!(path, target.join("docs.zip"));
        assert_eq!(fs::read(&path).unwrap(), b"PK\x03\x04");
        assert_eq!(fs::read_dir(&target).unwrap().count(), 1);
    }

    #[test]
    fn test_write_atomic_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.zip"), "old").unwrap();
        write_atomic(dir.path(), "a.zip", b"new").unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("a.zip")).unwrap(), "new");
    }

    #[test]
    fn test_timestamp_format() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(timestamp(at), "2024-03-09_07-05-01");
    }
}

//! JSON file credential store.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use edtecg_core::error::{Error, StorageError};
use edtecg_core::{CredentialStore, Result};

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

/// Credential store backed by a single JSON object on disk.
///
/// Updates are read-modify-write under an exclusive `fs2` lock on a sibling
/// `.lock` file, and land through a temp file plus rename, so readers see
/// either the old document or the new one. On Unix the file is created
/// `0600`. An update over a corrupt document replaces it.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store at the given file path. The file is created on first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the credential file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn map_io(&self, err: std::io::Error) -> Error {
        Error::Storage(StorageError::Io {
            path: self.path.display().to_string(),
            message: err.to_string(),
        })
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(self.map_io(e)),
        };

        if json.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&json).map_err(|e| {
            Error::Storage(StorageError::Corrupt {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if entries.is_empty() {
            return match fs::remove_file(&self.path) {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(self.map_io(e)),
                _ => Ok(()),
            };
        }

        let json = serde_json::to_string_pretty(entries)?;

        let temp_path = self
            .path
            .with_extension(format!("{}.tmp", Uuid::new_v4().simple()));

        let written = Self::write_private(&temp_path, json.as_bytes())
            .and_then(|()| fs::rename(&temp_path, &self.path));
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(self.map_io(e));
        }
        Ok(())
    }

    /// Create `path` readable by the owner only and write `bytes` to it.
    fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(path)?;
        file.write_all(bytes)?;
        file.sync_all()
    }

    /// Apply `update` to the stored entries while holding the write lock.
    fn update(&self, update: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.map_io(e))?;
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())
            .map_err(|e| self.map_io(e))?;

        lock_file.lock_exclusive().map_err(|e| self.map_io(e))?;

        let mut entries = match self.read_entries() {
            Err(Error::Storage(StorageError::Corrupt { message, .. })) => {
                warn!(path = %self.path.display(), error = %message, "Overwriting corrupt credential file");
                BTreeMap::new()
            }
            other => other?,
        };
        update(&mut entries);
        self.write_entries(&entries)?;

        lock_file.unlock().map_err(|e| self.map_io(e))?;
        Ok(())
    }
}

impl CredentialStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_entries()?.remove(key))
    }

    #[instrument(skip(self, entries), fields(path = %self.path.display()))]
    fn set_all(&self, entries: &[(&str, &str)]) -> Result<()> {
        self.update(|map| {
            for (key, value) in entries {
                map.insert((*key).to_string(), (*value).to_string());
            }
        })?;
        debug!(count = entries.len(), "Stored credentials");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn remove_all(&self, keys: &[&str]) -> Result<()> {
        self.update(|map| {
            for key in keys {
                map.remove(*key);
            }
        })?;
        debug!("Removed credentials");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("credentials.json"));
        assert_eq!(store.get("accessToken").unwrap(), None);
    }

    #[test]
    fn pair_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("credentials.json");

        let store = FileStore::new(&path);
        store
            .set_all(&[("accessToken", "A1"), ("refreshToken", "R1")])
            .unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("accessToken").unwrap().as_deref(), Some("A1"));
        assert_eq!(reopened.get("refreshToken").unwrap().as_deref(), Some("R1"));
    }

    #[test]
    fn removing_every_key_deletes_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        let store = FileStore::new(&path);

        store
            .set_all(&[("accessToken", "A1"), ("refreshToken", "R1")])
            .unwrap();
        assert!(path.exists());

        store.remove_all(&["accessToken", "refreshToken"]).unwrap();
        assert!(!path.exists());

        // Idempotent.
        store.remove_all(&["accessToken", "refreshToken"]).unwrap();
    }

    #[test]
    fn unrelated_keys_are_preserved() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("credentials.json"));

        store.set("apiUrl", "http://localhost:8000").unwrap();
        store
            .set_all(&[("accessToken", "A1"), ("refreshToken", "R1")])
            .unwrap();
        store.remove_all(&["accessToken", "refreshToken"]).unwrap();

        assert_eq!(
            store.get("apiUrl").unwrap().as_deref(),
            Some("http://localhost:8000")
        );
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, "{not json").unwrap();

        let err = FileStore::new(&path).get("accessToken").unwrap_err();
        assert!(matches!(err, Error::Storage(StorageError::Corrupt { .. })));
    }

    #[test]
    fn corrupt_file_is_overwritten_by_updates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, "{not json").unwrap();
        let store = FileStore::new(&path);

        store.remove_all(&["accessToken", "refreshToken"]).unwrap();
        assert!(!path.exists());

        fs::write(&path, "{not json").unwrap();
        store
            .set_all(&[("accessToken", "A2"), ("refreshToken", "R2")])
            .unwrap();
        assert_eq!(store.get("accessToken").unwrap().as_deref(), Some("A2"));
        assert_eq!(store.get("refreshToken").unwrap().as_deref(), Some("R2"));
    }

    #[test]
    fn writes_leave_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("credentials.json"));

        store.set("accessToken", "A1").unwrap();
        store.set("accessToken", "A2").unwrap();

        let mut names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, ["credentials.json", "credentials.lock"]);
    }

    #[cfg(unix)]
    #[test]
    fn file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        FileStore::new(&path).set("accessToken", "A1").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

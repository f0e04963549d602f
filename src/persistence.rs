//! JSON snapshot files for a [`Dictionary`].
//!
//! The on-disk shape is `{"words": {"<word>": "<definition>", ...}}`. Saves are
//! written to a temporary file next to the target and renamed over it, so the
//! target path only ever holds a complete snapshot. The data is not fsynced;
//! a power loss right after `save` may still lose the new file contents.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::dictionary::Dictionary;
use crate::error::PersistError;

/// Serialized form of a dictionary. Fields other than `words` are ignored.
#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    #[serde(default)]
    pub words: BTreeMap<String, String>,
}

impl Snapshot {
    pub fn capture(dict: &Dictionary) -> Self {
        Snapshot {
            words: dict.snapshot().into_iter().collect(),
        }
    }

    /// Read and decode the snapshot stored at `path`.
    pub fn read_from(path: &Path) -> Result<Self, PersistError> {
        let bytes = std::fs::read(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => PersistError::Missing {
                path: path.to_path_buf(),
            },
            _ => PersistError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;
        let malformed = |source: serde_json::Error| PersistError::Serialization {
            path: path.to_path_buf(),
            source,
        };
        // The derived impl would also take `[...]` as a struct in sequence form.
        let value: Value = serde_json::from_slice(&bytes).map_err(malformed)?;
        if !value.is_object() {
            return Err(malformed(serde::de::Error::custom(
                "snapshot must be a JSON object",
            )));
        }
        serde_json::from_value(value).map_err(malformed)
    }

    /// Atomically write this snapshot to `path` (temp file + rename).
    pub fn write_to(&self, path: &Path) -> Result<(), PersistError> {
        let io_err = |source: io::Error| PersistError::Io {
            path: path.to_path_buf(),
            source,
        };
        let bytes = serde_json::to_vec_pretty(self).map_err(|source| PersistError::Serialization {
            path: path.to_path_buf(),
            source,
        })?;

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(&bytes).map_err(io_err)?;
        tmp.flush().map_err(io_err)?;
        debug!("renaming {} into {}", tmp.path().display(), path.display());
        tmp.persist(path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

impl Dictionary {
    /// Write the current contents to `path`, returning the number of words saved.
    ///
    /// The shared lock is held only while the map is copied; encoding and disk
    /// I/O happen after it is released, so writers are never blocked on the file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<usize, PersistError> {
        let path = path.as_ref();
        let snapshot = Snapshot::capture(self);
        snapshot.write_to(path)?;
        let count = snapshot.words.len();
        info!("saved {} words to {}", count, path.display());
        Ok(count)
    }

    /// Replace the entire contents with the snapshot stored at `path`,
    /// returning the number of words loaded.
    ///
    /// On error the dictionary is left untouched.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<usize, PersistError> {
        let path = path.as_ref();
        let snapshot = Snapshot::read_from(path)?;
        let count = snapshot.words.len();
        self.replace(snapshot.words.into_iter().collect());
        info!("loaded {} words from {}", count, path.display());
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn save_then_load_into_fresh_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("d.json");

        let dict = Dictionary::new();
        dict.add("paris", "France");
        dict.add("lisbonne", "Portugal");
        dict.remove("lisbonne");
        dict.save(&path).unwrap();

        let fresh = Dictionary::new();
        fresh.load(&path).unwrap();
        assert_eq!(fresh.snapshot(), dict.snapshot());
        assert_eq!(fresh.get("paris").as_deref(), Some("France"));
        assert_eq!(fresh.get("lisbonne"), None);
    }

    #[test]
    fn file_uses_words_object() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("d.json");
        let dict = Dictionary::new();
        dict.add("rome", "Italy");
        dict.save(&path).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({"words": {"rome": "Italy"}}));
    }

    #[test]
    fn load_replaces_rather_than_merges() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("d.json");
        std::fs::write(&path, r#"{"words": {"rome": "Italy"}}"#).unwrap();

        let dict = Dictionary::new();
        dict.add("paris", "France");
        dict.load(&path).unwrap();
        assert_eq!(dict.entries(), vec![("rome".to_string(), "Italy".to_string())]);
    }

    #[test]
    fn missing_file_is_reported_distinctly() {
        let dir = TempDir::new().unwrap();
        let dict = Dictionary::new();
        dict.add("paris", "France");
        let err = dict.load(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, PersistError::Missing { .. }), "{err:?}");
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn malformed_json_is_reported_and_store_kept() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{\"words\": {\"paris\": ").unwrap();

        let dict = Dictionary::new();
        dict.add("paris", "France");
        let err = dict.load(&path).unwrap_err();
        assert!(matches!(err, PersistError::Serialization { .. }), "{err:?}");
        assert_eq!(dict.get("paris").as_deref(), Some("France"));
    }

    #[test]
    fn wrong_value_type_is_a_serialization_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"words": {"paris": 3}}"#).unwrap();
        let err = Dictionary::new().load(&path).unwrap_err();
        assert!(matches!(err, PersistError::Serialization { .. }));
    }

    #[test]
    fn non_object_snapshot_is_rejected_and_store_kept() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("array.json");
        let dict = Dictionary::new();
        dict.add("keep", "me");

        for body in ["[]", r#"[{"paris": "France"}]"#, r#""words""#, "null"] {
            std::fs::write(&path, body).unwrap();
            let err = dict.load(&path).unwrap_err();
            assert!(matches!(err, PersistError::Serialization { .. }), "{body}: {err:?}");
            assert_eq!(dict.entries(), vec![("keep".to_string(), "me".to_string())]);
        }
    }

    #[test]
    fn unknown_fields_ignored_and_missing_words_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("d.json");
        std::fs::write(&path, r#"{"version": 2}"#).unwrap();
        let dict = Dictionary::new();
        dict.add("paris", "France");
        dict.load(&path).unwrap();
        assert!(dict.is_empty());
    }

    #[test]
    fn save_into_missing_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no/such/dir/d.json");
        let err = Dictionary::new().save(&path).unwrap_err();
        assert!(matches!(err, PersistError::Io { .. }), "{err:?}");
        assert!(!path.exists());
    }

    #[test]
    fn save_overwrites_and_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("d.json");
        let dict = Dictionary::new();
        dict.add("paris", "France");
        dict.save(&path).unwrap();
        dict.add("rome", "Italy");
        dict.save(&path).unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("d.json")]);
        assert_eq!(Snapshot::read_from(&path).unwrap().words.len(), 2);
    }
}

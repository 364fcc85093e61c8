use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use tracing::debug;

use super::{RecordStore, Result};

const RECORD_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// Filesystem-backed record store: one JSON file per key inside `root`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: PathBuf) -> Result<Self> {
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn record_path(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", canonical_key(key), RECORD_EXTENSION))
    }
}

impl RecordStore for JsonFileStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.record_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)?;
        Ok(Some(data))
    }

    fn write(&self, key: &str, payload: &str) -> Result<()> {
        let path = self.record_path(key);
        let tmp = tmp_path(&path);
        write_atomic(&tmp, payload)?;
        fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), bytes = payload.len(), "record written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.record_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

fn canonical_key(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "record".into()
    } else {
        sanitized
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with_temp_dir() -> (JsonFileStore, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let store = JsonFileStore::new(temp.path().join("data")).expect("json store");
        (store, temp)
    }

    #[test]
    fn write_and_read_roundtrip() {
        let (store, _guard) = store_with_temp_dir();
        store.write("expenses", "[]").expect("write");
        assert_eq!(store.read("expenses").expect("read").as_deref(), Some("[]"));
        assert!(store.record_path("expenses").exists());
    }

    #[test]
    fn missing_key_reads_none() {
        let (store, _guard) = store_with_temp_dir();
        assert!(store.read("incomes").expect("read").is_none());
    }

    #[test]
    fn write_leaves_no_staging_file_behind() {
        let (store, _guard) = store_with_temp_dir();
        store.write("incomes", "[1]").expect("write");
        let path = store.record_path("incomes");
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn failed_write_preserves_previous_payload() {
        let (store, _guard) = store_with_temp_dir();
        store.write("expenses", "[\"old\"]").expect("initial write");
        let path = store.record_path("expenses");

        // A directory squatting on the staging name makes File::create fail.
        let staging = tmp_path(&path);
        fs::create_dir_all(&staging).expect("block staging path");

        assert!(store.write("expenses", "[\"new\"]").is_err());
        assert_eq!(
            store.read("expenses").expect("read").as_deref(),
            Some("[\"old\"]")
        );
    }

    #[test]
    fn keys_are_canonicalised_into_file_names() {
        let (store, _guard) = store_with_temp_dir();
        let path = store.record_path("pendingEdit");
        assert_eq!(
            path.file_name().and_then(|name| name.to_str()),
            Some("pendingedit.json")
        );
        assert_eq!(canonical_key("../etc"), "___etc");
    }

    #[test]
    fn remove_deletes_the_record_file() {
        let (store, _guard) = store_with_temp_dir();
        store.write("pendingEdit", "{}").expect("write");
        store.remove("pendingEdit").expect("remove");
        assert!(store.read("pendingEdit").expect("read").is_none());
        store.remove("pendingEdit").expect("remove twice");
    }
}

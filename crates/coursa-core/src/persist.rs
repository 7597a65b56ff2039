//! JSON snapshot files written atomically.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};

use crate::error::StoreError;

/// Reads a JSON snapshot. Returns `Ok(None)` if the file does not exist.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Writes a JSON snapshot to a temp file and renames it over `path`.
///
/// Readers see either the previous file or the new one, never a partial write.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let contents = serde_json::to_vec(value)?;
    let temp = temp_path(path);
    fs::write(&temp, contents).map_err(write_err)?;
    fs::rename(&temp, path).map_err(|source| {
        let _cleanup = fs::remove_file(&temp);
        write_err(source)
    })
}

/// Sibling temp file for `path`.
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

#[cfg(test)]
mod test {
    use std::collections::BTreeMap;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn missing_file_reads_as_none() {
        let temp = TempDir::new().unwrap();
        let value: Option<Vec<u32>> = read_json(&temp.path().join("absent.json")).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn writes_then_reads() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("data.json");
        let value = BTreeMap::from([("a".to_string(), 1), ("b".to_string(), 2)]);

        write_json_atomic(&path, &value).unwrap();
        let back: BTreeMap<String, i32> = read_json(&path).unwrap().unwrap();
        assert_eq!(back, value);
        assert!(!temp.path().join("nested").join(".data.json.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_a_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();

        let result: Result<Option<Vec<u32>>, _> = read_json(&path);
        assert!(matches!(result, Err(StoreError::Parse { .. })));
    }
}

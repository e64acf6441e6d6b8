//! File-backed credential storage.
//!
//! Each key is written to `<dir>/<key>.json` as a JSON string, so a stored
//! token reads back exactly as it was written.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{CredentialStore, StoreError};

pub struct FileCredentialStore {
    dir: PathBuf,
}

impl FileCredentialStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }
}

/// Keep keys usable as file names. Usernames may contain `@` and `.`,
/// which are fine; path separators are not.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c => c,
        })
        .collect()
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let contents = match std::fs::read_to_string(self.path(key)) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let value: String = serde_json::from_str(&contents)?;
        Ok(Some(value))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path(key);
        let contents = serde_json::to_string(value)?;
        std::fs::write(&path, contents)?;
        debug!(path = %path.display(), "Credential persisted");
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

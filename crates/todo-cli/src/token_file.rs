use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use todo_client_core::token_store::{TOKEN_STORAGE_KEY, TokenStore};

const CONFIG_DIR_NAME: &str = "todo-client";

/// Default token location: `<config dir>/todo-client/token`.
pub fn default_token_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(TOKEN_STORAGE_KEY))
}

/// Token store backed by a single file holding the raw token.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    type Error = io::Error;

    fn get(&self) -> Result<Option<String>, Self::Error> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim_end();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error),
        }
    }

    fn set(&self, token: &str) -> Result<(), Self::Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)
    }

    fn clear(&self) -> Result<(), Self::Error> {
        match fs::remove_file(&self.path) {
            Err(error) if error.kind() != io::ErrorKind::NotFound => Err(error),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_absent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileTokenStore::new(dir.path().join("token"));
        assert!(store.get().expect("get").is_none());
    }

    #[test]
    fn set_creates_parent_dirs_and_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileTokenStore::new(dir.path().join("nested").join("token"));

        store.set("tok123").expect("set");

        assert_eq!(store.get().expect("get").as_deref(), Some("tok123"));
    }

    #[test]
    fn empty_file_reads_as_absent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("token");
        fs::write(&path, "").expect("write");

        assert!(FileTokenStore::new(path).get().expect("get").is_none());
    }

    #[test]
    fn hand_edited_file_drops_trailing_newline() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("token");
        fs::write(&path, "tok123\n").expect("write");
        let store = FileTokenStore::new(&path);
        assert_eq!(store.get().expect("get").as_deref(), Some("tok123"));

        fs::write(&path, " \r\n").expect("write");
        assert!(store.get().expect("get").is_none());
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileTokenStore::new(dir.path().join("token"));
        store.set("tok").expect("set");

        store.clear().expect("first clear");
        store.clear().expect("second clear");

        assert!(store.get().expect("get").is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn default_path_ends_with_storage_key() {
        if let Some(path) = default_token_path() {
            assert!(path.ends_with("todo-client/token"));
        }
    }
}

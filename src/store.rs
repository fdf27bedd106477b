//! File-backed storage: one file per key under a directory.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use canvas::error::CoverError;
use canvas::persist::Storage;

pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, CoverError> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CoverError::Storage(format!("{}: {e}", path.display()))),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), CoverError> {
        let path = self.path(key);
        fs::create_dir_all(&self.dir)
            .and_then(|()| fs::write(&path, value))
            .map_err(|e| CoverError::Storage(format!("{}: {e}", path.display())))
    }
}

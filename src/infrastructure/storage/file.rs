#[cfg(test)]
#[path = "file_test.rs"]
mod tests;

use std::fs;
use std::path;

use anyhow::Result;

use crate::domain::models::Storage;

/// Stores each key as `<dir>/<key>.json`.
pub struct FileStorage {
    pub dir: path::PathBuf,
}

impl FileStorage {
    pub fn new(dir: path::PathBuf) -> FileStorage {
        return FileStorage { dir };
    }

    pub fn get_file_path(&self, key: &str) -> path::PathBuf {
        return self.dir.join(format!("{key}.json"));
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let file_path = self.get_file_path(key);
        if !file_path.exists() {
            return Ok(None);
        }

        let payload = fs::read_to_string(file_path)?;
        return Ok(Some(payload));
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }

        // Write then rename so a crash never leaves a truncated record behind.
        let file_path = self.get_file_path(key);
        let tmp_path = file_path.with_extension("json.tmp");
        fs::write(&tmp_path, value)?;
        fs::rename(&tmp_path, &file_path)?;

        return Ok(());
    }

    fn remove(&self, key: &str) -> Result<()> {
        let file_path = self.get_file_path(key);
        if !file_path.exists() {
            return Ok(());
        }

        fs::remove_file(file_path)?;
        return Ok(());
    }
}

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use thiserror::Error;

/// A destination for rendered output.
pub trait Store {
    type Error: std::error::Error;

    /// Stores the HTML for the route at `path` (e.g. `/blog/tag/rust`).
    fn store_rendered_page(&self, path: &str, rendered_html: String) -> Result<(), Self::Error>;

    /// Stores a file at `path`, relative to the output root (e.g. `sitemap.xml`).
    fn store_static_file(&self, path: &Path, contents: String) -> Result<(), Self::Error>;
}

pub struct DiskStorage {
    output_path: PathBuf,
}

impl DiskStorage {
    pub fn new(output_path: PathBuf) -> Self {
        Self { output_path }
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), io::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut output_file = File::create(path)?;
        output_file.write_all(contents.as_bytes())?;

        Ok(())
    }
}

impl Store for DiskStorage {
    type Error = io::Error;

    fn store_rendered_page(&self, path: &str, rendered_html: String) -> Result<(), Self::Error> {
        let output_dir = self.output_path.join(path.trim_matches('/'));

        self.write(&output_dir.join("index.html"), &rendered_html)
    }

    fn store_static_file(&self, path: &Path, contents: String) -> Result<(), Self::Error> {
        self.write(&self.output_path.join(path), &contents)
    }
}

/// Keeps rendered output in memory, keyed by route (or by `/`-prefixed file path).
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    storage: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryStorage {
    pub fn get(&self, path: &str) -> Option<String> {
        self.storage.read().ok()?.get(path).cloned()
    }

    pub fn paths(&self) -> Vec<String> {
        let mut paths = self
            .storage
            .read()
            .map(|storage| storage.keys().cloned().collect::<Vec<_>>())
            .unwrap_or_default();
        paths.sort();
        paths
    }
}

#[derive(Error, Debug)]
pub enum InMemoryStorageError {
    #[error("poisoned")]
    Poisoned,
}

impl Store for InMemoryStorage {
    type Error = InMemoryStorageError;

    fn store_rendered_page(&self, path: &str, rendered_html: String) -> Result<(), Self::Error> {
        self.storage
            .write()
            .map_err(|_| InMemoryStorageError::Poisoned)?
            .insert(path.to_string(), rendered_html);

        Ok(())
    }

    fn store_static_file(&self, path: &Path, contents: String) -> Result<(), Self::Error> {
        self.storage
            .write()
            .map_err(|_| InMemoryStorageError::Poisoned)?
            .insert(format!("/{}", path.to_string_lossy()), contents);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_disk_storage_layout() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DiskStorage::new(dir.path().to_owned());

        storage.store_rendered_page("/", "home".to_string()).unwrap();
        storage
            .store_rendered_page("/blog/tag/rust/", "rust".to_string())
            .unwrap();
        storage
            .store_static_file(Path::new("404.html"), "missing".to_string())
            .unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("index.html")).unwrap(), "home");
        assert_eq!(
            fs::read_to_string(dir.path().join("blog/tag/rust/index.html")).unwrap(),
            "rust"
        );
        assert_eq!(fs::read_to_string(dir.path().join("404.html")).unwrap(), "missing");
    }

    #[test]
    fn test_in_memory_storage() {
        let storage = InMemoryStorage::default();

        storage.store_rendered_page("/blog", "index".to_string()).unwrap();
        storage
            .store_static_file(Path::new("sitemap.xml"), "<urlset/>".to_string())
            .unwrap();

        assert_eq!(storage.get("/blog").as_deref(), Some("index"));
        assert_eq!(storage.paths(), vec!["/blog", "/sitemap.xml"]);
    }
}

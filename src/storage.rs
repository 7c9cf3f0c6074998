//! Bundle storage and discovery.
//!
//! The orchestrator only talks to these traits; `FsBundleStore` is the local
//! filesystem implementation used by the binary.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Result, TranslatorError};

pub trait BundleStorage: Send + Sync {
    fn read_text(&self, path: &Path) -> Result<String>;

    /// Replace the whole content. Must be durable and visible to `read_text` before returning.
    fn write_text(&self, path: &Path, text: &str) -> Result<()>;

    /// Re-read the backing content after an external or internal change.
    fn refresh(&self, path: &Path) -> Result<()>;
}

pub trait BundleDiscovery: Send + Sync {
    /// Candidate files living next to `path`, the file itself included.
    fn list_sibling_files(&self, path: &Path) -> Result<Vec<PathBuf>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FsBundleStore;

impl FsBundleStore {
    pub fn new() -> Self {
        Self
    }
}

impl BundleStorage for FsBundleStore {
    fn read_text(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| TranslatorError::storage(path, e))
    }

    /// Writes a temp file next to `path` and renames it into place, so a failed
    /// write leaves the previous content intact.
    fn write_text(&self, path: &Path, text: &str) -> Result<()> {
        let directory = parent_dir(path);
        let mut file =
            NamedTempFile::new_in(directory).map_err(|e| TranslatorError::storage(path, e))?;
        file.write_all(text.as_bytes())
            .and_then(|_| file.as_file().sync_all())
            .map_err(|e| TranslatorError::storage(path, e))?;
        file.persist(path)
            .map_err(|e| TranslatorError::storage(path, e.error))?;
        debug!("Wrote {} bytes to {}", text.len(), path.display());
        Ok(())
    }

    fn refresh(&self, path: &Path) -> Result<()> {
        let metadata = fs::metadata(path).map_err(|e| TranslatorError::storage(path, e))?;
        debug!(
            "Refreshed {} ({} bytes, modified {:?})",
            path.display(),
            metadata.len(),
            metadata.modified().ok()
        );
        Ok(())
    }
}

impl BundleDiscovery for FsBundleStore {
    fn list_sibling_files(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let directory = parent_dir(path);

        let mut files = Vec::new();
        let entries = fs::read_dir(directory).map_err(|e| TranslatorError::storage(directory, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| TranslatorError::storage(directory, e))?;
            if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

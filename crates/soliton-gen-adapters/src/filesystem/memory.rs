//! In-memory filesystem adapter for testing and dry runs.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use soliton_gen_core::application::ApplicationError;
use soliton_gen_core::application::ports::{DirEntry, Filesystem};
use soliton_gen_core::error::GenResult;

/// In-memory filesystem. Clones share the same tree.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn add_dirs(&mut self, path: &Path) {
        for dir in path.ancestors().filter(|p| !p.as_os_str().is_empty()) {
            self.directories.insert(dir.to_path_buf());
        }
    }
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a file and its parent directories (testing helper).
    pub fn with_file(self, path: impl AsRef<Path>, content: &str) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            let path = path.as_ref();
            if let Some(parent) = path.parent() {
                inner.add_dirs(parent);
            }
            inner.files.insert(path.to_path_buf(), content.to_string());
        }
        self
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// All files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn read(&self) -> GenResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        Ok(self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?)
    }

    fn write(&self) -> GenResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        Ok(self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?)
    }
}

fn not_found(path: &Path) -> ApplicationError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: "No such file or directory".into(),
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> GenResult<()> {
        self.write()?.add_dirs(path);
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> GenResult<()> {
        let mut inner = self.write()?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into());
            }
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> GenResult<String> {
        let inner = self.read()?;
        Ok(inner.files.get(path).cloned().ok_or_else(|| not_found(path))?)
    }

    fn exists(&self, path: &Path) -> bool {
        self.is_file(path) || self.is_dir(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path))
            .unwrap_or(false)
    }

    fn read_dir(&self, path: &Path) -> GenResult<Vec<DirEntry>> {
        let inner = self.read()?;
        if !inner.directories.contains(path) {
            return Err(not_found(path).into());
        }

        let dirs = inner
            .directories
            .iter()
            .filter(|p| p.parent() == Some(path))
            .map(|p| (p, true));
        let files = inner
            .files
            .keys()
            .filter(|p| p.parent() == Some(path))
            .map(|p| (p, false));

        let mut entries: Vec<DirEntry> = dirs
            .chain(files)
            .filter_map(|(p, is_dir)| {
                p.file_name().map(|name| DirEntry {
                    name: name.to_string_lossy().into_owned(),
                    is_dir,
                })
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn remove_file(&self, path: &Path) -> GenResult<()> {
        let mut inner = self.write()?;
        match inner.files.remove(path) {
            Some(_) => Ok(()),
            None => Err(not_found(path).into()),
        }
    }

    fn remove_dir_all(&self, path: &Path) -> GenResult<()> {
        let mut inner = self.write()?;
        if !inner.directories.contains(path) {
            return Err(not_found(path).into());
        }
        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        Ok(())
    }
}

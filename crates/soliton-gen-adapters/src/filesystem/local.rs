//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use soliton_gen_core::application::ApplicationError;
use soliton_gen_core::application::ports::{DirEntry, Filesystem};
use soliton_gen_core::error::{GenError, GenResult};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> GenResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> GenResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn read_to_string(&self, path: &Path) -> GenResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_dir(&self, path: &Path) -> GenResult<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path).map_err(|e| map_io_error(path, e, "list directory"))? {
            let entry = entry.map_err(|e| map_io_error(path, e, "list directory"))?;
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn remove_file(&self, path: &Path) -> GenResult<()> {
        std::fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove file"))
    }

    fn remove_dir_all(&self, path: &Path) -> GenResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> GenError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {operation}: {e}"),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_read_and_list() {
        let tmp = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        let dir = tmp.path().join("internal/domain/order");
        fs.create_dir_all(&dir).unwrap();
        fs.write_file(&dir.join("order.go"), "package order\n").unwrap();
        fs.create_dir_all(&dir.join("sub")).unwrap();

        assert!(fs.is_file(&dir.join("order.go")));
        assert!(fs.is_dir(&dir));
        assert_eq!(fs.read_to_string(&dir.join("order.go")).unwrap(), "package order\n");
        assert_eq!(
            fs.read_dir(&dir).unwrap(),
            [
                DirEntry {
                    name: "order.go".into(),
                    is_dir: false
                },
                DirEntry {
                    name: "sub".into(),
                    is_dir: true
                },
            ]
        );
    }

    #[test]
    fn remove_file_and_tree() {
        let tmp = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        let file = tmp.path().join("a/b.go");
        fs.create_dir_all(file.parent().unwrap()).unwrap();
        fs.write_file(&file, "x").unwrap();

        fs.remove_file(&file).unwrap();
        assert!(!fs.exists(&file));
        fs.remove_dir_all(&tmp.path().join("a")).unwrap();
        assert!(!fs.exists(&tmp.path().join("a")));
    }

    #[test]
    fn missing_file_is_a_filesystem_error() {
        let tmp = TempDir::new().unwrap();
        let err = LocalFilesystem::new()
            .read_to_string(&tmp.path().join("nope.go"))
            .unwrap_err();
        assert!(err.to_string().contains("nope.go"));
    }
}

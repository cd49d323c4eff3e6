//! In-memory fakes for service tests.
//!
//! Generators touch many files per call, so their tests run against a small
//! map-backed filesystem instead of per-call mock expectations. Failure paths
//! still use the mockall ports directly.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::application::ApplicationError;
use crate::application::ports::{
    DirEntry, Filesystem, GeneratorPorts, ManifestStore, SourcePatcher, TemplateRenderer,
    Toolchain,
};
use crate::domain::{Anchor, Edit, EditKind, EditOutcome, Manifest, PatchReport, TemplateId};
use crate::error::GenResult;

#[derive(Default)]
pub struct FakeFs {
    files: Mutex<BTreeMap<PathBuf, String>>,
    dirs: Mutex<BTreeSet<PathBuf>>,
}

impl FakeFs {
    pub fn project(root: &str, module: &str) -> Arc<Self> {
        let fs = Arc::new(Self::default());
        fs.add(&format!("{root}/go.mod"), &format!("module {module}\n\ngo 1.22\n"));
        fs.mkdir(&format!("{root}/internal/domain"));
        fs
    }

    pub fn add(&self, path: &str, content: &str) {
        let path = PathBuf::from(path);
        if let Some(parent) = path.parent() {
            self.mkdir_path(parent);
        }
        self.files.lock().unwrap().insert(path, content.to_string());
    }

    pub fn mkdir(&self, path: &str) {
        self.mkdir_path(Path::new(path));
    }

    fn mkdir_path(&self, path: &Path) {
        let mut dirs = self.dirs.lock().unwrap();
        for dir in path.ancestors() {
            dirs.insert(dir.to_path_buf());
        }
    }

    pub fn get(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(Path::new(path)).cloned()
    }

    pub fn has(&self, path: &str) -> bool {
        self.exists(Path::new(path))
    }
}

impl Filesystem for FakeFs {
    fn create_dir_all(&self, path: &Path) -> GenResult<()> {
        self.mkdir_path(path);
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> GenResult<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> GenResult<String> {
        self.files.lock().unwrap().get(path).cloned().ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "not found".into(),
            }
            .into()
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.is_file(path) || self.is_dir(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.lock().unwrap().contains(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn read_dir(&self, path: &Path) -> GenResult<Vec<DirEntry>> {
        let mut entries = BTreeMap::new();
        for dir in self.dirs.lock().unwrap().iter() {
            if dir.parent() == Some(path) && dir != path {
                entries.insert(file_name(dir), true);
            }
        }
        for file in self.files.lock().unwrap().keys() {
            if file.parent() == Some(path) {
                entries.insert(file_name(file), false);
            }
        }
        Ok(entries
            .into_iter()
            .map(|(name, is_dir)| DirEntry { name, is_dir })
            .collect())
    }

    fn remove_file(&self, path: &Path) -> GenResult<()> {
        self.files.lock().unwrap().remove(path);
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> GenResult<()> {
        self.files.lock().unwrap().retain(|p, _| !p.starts_with(path));
        self.dirs.lock().unwrap().retain(|p| !p.starts_with(path));
        Ok(())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Renders `// <template>` followed by the data as JSON. Module files also
/// carry their wiring markers.
pub struct EchoRenderer;

impl TemplateRenderer for EchoRenderer {
    fn render(&self, template: TemplateId, data: &serde_json::Value) -> GenResult<String> {
        let markers = match template {
            TemplateId::FxModule | TemplateId::ServiceModule => {
                "// soliton-gen:services\n// soliton-gen:event-handlers\n"
            }
            _ => "",
        };
        Ok(format!("// {template}\n{data}\n{markers}"))
    }
}

/// Minimal patcher: inserts before the first marker line, removes lines and
/// replaces text. Enough to observe plans flowing through the services.
pub struct LinePatcher;

impl SourcePatcher for LinePatcher {
    fn apply(&self, content: &str, edits: &[Edit]) -> GenResult<PatchReport> {
        let mut content = content.to_string();
        let mut outcomes = Vec::new();
        for edit in edits {
            let outcome = match &edit.kind {
                EditKind::Insert {
                    text,
                    guard,
                    anchors,
                } => {
                    let guard = guard.as_deref().unwrap_or(text);
                    if content.contains(guard) {
                        EditOutcome::AlreadyPresent
                    } else {
                        let marker = anchors.iter().find_map(|a| match a {
                            Anchor::Marker(m) if content.contains(m.as_str()) => Some(m.clone()),
                            _ => None,
                        });
                        match marker {
                            Some(m) => {
                                content = content.replacen(&m, &format!("{text}\n{m}"), 1);
                                EditOutcome::Applied
                            }
                            None => EditOutcome::AnchorMissing,
                        }
                    }
                }
                EditKind::RemoveLines { containing } => {
                    let kept: Vec<&str> =
                        content.lines().filter(|l| !l.contains(containing.as_str())).collect();
                    let changed = kept.len() != content.lines().count();
                    content = kept.join("\n");
                    if changed {
                        EditOutcome::Applied
                    } else {
                        EditOutcome::AlreadyPresent
                    }
                }
                EditKind::ReplaceAll { from, to } if content.contains(from.as_str()) => {
                    content = content.replace(from.as_str(), to);
                    EditOutcome::Applied
                }
                _ => EditOutcome::AlreadyPresent,
            };
            outcomes.push((edit.label.clone(), outcome));
        }
        Ok(PatchReport { content, outcomes })
    }
}

#[derive(Default)]
pub struct MemoryManifest(pub Mutex<Option<Manifest>>);

impl ManifestStore for MemoryManifest {
    fn load(&self, _module_dir: &Path) -> GenResult<Manifest> {
        Ok(self.0.lock().unwrap().clone().unwrap_or_default())
    }

    fn save(&self, _module_dir: &Path, manifest: &Manifest) -> GenResult<()> {
        *self.0.lock().unwrap() = Some(manifest.clone());
        Ok(())
    }
}

pub struct NoToolchain;

impl Toolchain for NoToolchain {
    fn tidy(&self, _module_dir: &Path) -> GenResult<String> {
        Ok(String::new())
    }
}

pub struct Harness {
    pub fs: Arc<FakeFs>,
    pub manifest: Arc<MemoryManifest>,
    pub ports: GeneratorPorts,
}

pub fn harness(fs: Arc<FakeFs>) -> Harness {
    let manifest = Arc::new(MemoryManifest::default());
    let ports = GeneratorPorts {
        filesystem: fs.clone(),
        renderer: Arc::new(EchoRenderer),
        patcher: Arc::new(LinePatcher),
        manifest: manifest.clone(),
        toolchain: Arc::new(NoToolchain),
    };
    Harness {
        fs,
        manifest,
        ports,
    }
}

pub fn shop() -> Harness {
    harness(FakeFs::project("/shop", "github.com/acme/shop"))
}

impl Harness {
    pub fn recorded(&self) -> Manifest {
        self.manifest.0.lock().unwrap().clone().unwrap_or_default()
    }
}

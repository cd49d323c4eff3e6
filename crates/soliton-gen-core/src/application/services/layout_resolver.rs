//! Project layout discovery.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::application::ports::Filesystem;
use crate::domain::DomainError;
use crate::domain::layout::{
    INTERNAL_DIR, MODULE_FILE, MONOREPO_DIR, ProjectLayout, parse_module_declaration,
};
use crate::error::GenResult;

/// Finds the project a command operates on.
///
/// At every directory, from `start` upward:
///
/// ```text
///   <dir>/internal + <dir>/go.mod                          → standalone
///   <dir>/application/internal + <dir>/application/go.mod  → monorepo
/// ```
///
/// The start directory is checked before any ancestor, so a command run
/// inside one project never attaches to an enclosing one. A relative start
/// is taken against the current working directory.
#[derive(Clone)]
pub struct LayoutResolver {
    filesystem: Arc<dyn Filesystem>,
}

impl LayoutResolver {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    #[instrument(skip_all, fields(start = %start.display()))]
    pub fn resolve(&self, start: &Path) -> GenResult<ProjectLayout> {
        let start = std::path::absolute(start).map_err(|e| ApplicationError::FilesystemError {
            path: start.to_path_buf(),
            reason: e.to_string(),
        })?;
        for dir in start.ancestors() {
            if self.is_project_root(dir) {
                return self.build(dir);
            }
            let monorepo = dir.join(MONOREPO_DIR);
            if self.is_project_root(&monorepo) {
                return self.build(&monorepo);
            }
        }

        Err(DomainError::LayoutNotFound { start }
        .into())
    }

    /// Standalone projects directly under `parent`, ordered by directory.
    /// A child whose `go.mod` cannot be read or parsed is skipped.
    #[instrument(skip_all, fields(parent = %parent.display()))]
    pub fn projects_in(&self, parent: &Path) -> GenResult<Vec<ProjectLayout>> {
        let mut projects: Vec<ProjectLayout> = self
            .filesystem
            .read_dir(parent)?
            .into_iter()
            .filter(|entry| entry.is_dir)
            .map(|entry| parent.join(entry.name))
            .filter(|dir| self.is_project_root(dir))
            .filter_map(|dir| match self.build(&dir) {
                Ok(layout) => Some(layout),
                Err(err) => {
                    debug!(dir = %dir.display(), error = %err, "Skipping unreadable project");
                    None
                }
            })
            .collect();
        projects.sort_by(|a, b| a.module_dir.cmp(&b.module_dir));
        Ok(projects)
    }

    fn is_project_root(&self, dir: &Path) -> bool {
        self.filesystem.is_dir(&dir.join(INTERNAL_DIR))
            && self.filesystem.is_file(&dir.join(MODULE_FILE))
    }

    fn build(&self, module_dir: &Path) -> GenResult<ProjectLayout> {
        let module_file = module_dir.join(MODULE_FILE);
        let content = self.filesystem.read_to_string(&module_file)?;
        let module_path = parse_module_declaration(&content, &module_file)?;
        debug!(module_dir = %module_dir.display(), %module_path, "Resolved project layout");
        Ok(ProjectLayout::new(module_dir, module_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockFilesystem;
    use crate::error::GenError;
    use std::path::PathBuf;

    fn fs_with(dirs: &'static [&'static str], files: &'static [&'static str]) -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir()
            .returning(move |p| dirs.iter().any(|d| Path::new(d) == p));
        fs.expect_is_file()
            .returning(move |p| files.iter().any(|f| Path::new(f) == p));
        fs.expect_read_to_string()
            .returning(|_| Ok("module github.com/acme/shop\n\ngo 1.22\n".into()));
        fs
    }

    #[test]
    fn prefers_start_directory_over_nested_monorepo() {
        let fs = fs_with(
            &["/a/internal", "/a/application/internal"],
            &["/a/go.mod", "/a/application/go.mod"],
        );
        let resolver = LayoutResolver::new(Arc::new(fs));

        let layout = resolver.resolve(Path::new("/a")).unwrap();
        assert_eq!(layout.module_dir, PathBuf::from("/a"));
        assert_eq!(layout.module_path, "github.com/acme/shop");

        let nested = resolver.resolve(Path::new("/a/application")).unwrap();
        assert_eq!(nested.module_dir, PathBuf::from("/a/application"));
    }

    #[test]
    fn finds_monorepo_then_walks_up() {
        let fs = fs_with(&["/repo/application/internal"], &["/repo/application/go.mod"]);
        let resolver = LayoutResolver::new(Arc::new(fs));

        let layout = resolver.resolve(Path::new("/repo/docs/guides")).unwrap();
        assert_eq!(layout.module_dir, PathBuf::from("/repo/application"));
    }

    #[test]
    fn relative_start_walks_up_from_working_directory() {
        let cwd = std::env::current_dir().unwrap();
        let (root, internal, module) = (cwd.clone(), cwd.join("internal"), cwd.join("go.mod"));
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().returning(move |p| p == internal);
        fs.expect_is_file().returning(move |p| p == module);
        fs.expect_read_to_string()
            .returning(|_| Ok("module github.com/acme/shop\n".into()));
        let resolver = LayoutResolver::new(Arc::new(fs));

        let layout = resolver.resolve(Path::new("internal/domain/order")).unwrap();
        assert_eq!(layout.module_dir, root);
        assert_eq!(resolver.resolve(Path::new(".")).unwrap().module_dir, root);
    }

    #[test]
    fn lists_sibling_projects() {
        let mut fs = fs_with(
            &["/work/shop/internal", "/work/billing/internal", "/work/docs"],
            &["/work/shop/go.mod", "/work/billing/go.mod"],
        );
        fs.expect_read_dir().returning(|_| {
            Ok(["shop", "docs", "billing"]
                .iter()
                .map(|name| crate::application::ports::DirEntry {
                    name: name.to_string(),
                    is_dir: true,
                })
                .chain(std::iter::once(crate::application::ports::DirEntry {
                    name: "README.md".into(),
                    is_dir: false,
                }))
                .collect())
        });

        let projects = LayoutResolver::new(Arc::new(fs))
            .projects_in(Path::new("/work"))
            .unwrap();
        let dirs: Vec<_> = projects.iter().map(|p| p.module_dir.clone()).collect();
        assert_eq!(dirs, [PathBuf::from("/work/billing"), PathBuf::from("/work/shop")]);
    }

    #[test]
    fn reports_layout_not_found() {
        let resolver = LayoutResolver::new(Arc::new(fs_with(&[], &[])));
        let err = resolver.resolve(Path::new("/nowhere")).unwrap_err();
        assert!(matches!(err, GenError::Domain(DomainError::LayoutNotFound { .. })));
    }

    #[test]
    fn empty_module_declaration_is_fatal() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().returning(|_| true);
        fs.expect_is_file().returning(|_| true);
        fs.expect_read_to_string().returning(|_| Ok("module \n".into()));

        let err = LayoutResolver::new(Arc::new(fs))
            .resolve(Path::new("/p"))
            .unwrap_err();
        assert!(matches!(
            err,
            GenError::Domain(DomainError::InvalidModuleDeclaration { .. })
        ));
    }
}

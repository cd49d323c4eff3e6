//! Project layout model.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::error::DomainError;

/// File holding the `module <path>` declaration.
pub const MODULE_FILE: &str = "go.mod";
/// Directory name that marks a standalone project root.
pub const INTERNAL_DIR: &str = "internal";
/// Sub-directory probed for the monorepo layout.
pub const MONOREPO_DIR: &str = "application";

/// Canonical paths of a resolved project.
///
/// Every path is a pure join from `module_dir`; building a layout never
/// touches the filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectLayout {
    pub module_path: String,
    pub module_dir: PathBuf,
    pub internal_dir: PathBuf,
    pub domain_dir: PathBuf,
    pub app_dir: PathBuf,
    pub infra_dir: PathBuf,
    pub interfaces_dir: PathBuf,
}

impl ProjectLayout {
    pub fn new(module_dir: impl Into<PathBuf>, module_path: impl Into<String>) -> Self {
        let module_dir = module_dir.into();
        let internal_dir = module_dir.join(INTERNAL_DIR);
        Self {
            module_path: module_path.into(),
            domain_dir: internal_dir.join("domain"),
            app_dir: internal_dir.join("application"),
            infra_dir: internal_dir.join("infrastructure").join("persistence"),
            interfaces_dir: internal_dir.join("interfaces").join("http"),
            internal_dir,
            module_dir,
        }
    }

    pub fn main_go(&self) -> PathBuf {
        self.module_dir.join("cmd").join("main.go")
    }

    pub fn migrate_main_go(&self) -> PathBuf {
        self.module_dir.join("cmd").join("migrate").join("main.go")
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.module_dir.join(".soliton-gen").join("manifest.json")
    }

    pub fn domain_package_dir(&self, package: &str) -> PathBuf {
        self.domain_dir.join(package)
    }

    pub fn app_package_dir(&self, package: &str) -> PathBuf {
        self.app_dir.join(package)
    }

    /// Path relative to the module root, for display and manifests.
    pub fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.module_dir).unwrap_or(path)
    }
}

/// Extracts the import path from a module declaration file.
///
/// The first line of the form `module <path>` wins; everything else is
/// ignored.
pub fn parse_module_declaration(content: &str, path: &Path) -> Result<String, DomainError> {
    for line in content.lines() {
        let line = line.trim();
        let Some(rest) = line.strip_prefix("module") else {
            continue;
        };
        if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
            continue;
        }
        let module_path = rest.trim().trim_matches('"');
        if module_path.is_empty() {
            return Err(DomainError::InvalidModuleDeclaration {
                path: path.to_path_buf(),
                reason: "module path is empty".into(),
            });
        }
        return Ok(module_path.to_string());
    }

    Err(DomainError::InvalidModuleDeclaration {
        path: path.to_path_buf(),
        reason: "no `module` directive found".into(),
    })
}

/// Reads the `go <version>` directive from a `go.work` or `go.mod` file.
pub fn parse_go_directive(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        line.trim()
            .strip_prefix("go ")
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_paths_are_joined_from_module_dir() {
        let layout = ProjectLayout::new("/work/shop", "github.com/acme/shop");
        assert_eq!(layout.internal_dir, PathBuf::from("/work/shop/internal"));
        assert_eq!(layout.domain_dir, PathBuf::from("/work/shop/internal/domain"));
        assert_eq!(layout.app_dir, PathBuf::from("/work/shop/internal/application"));
        assert_eq!(
            layout.infra_dir,
            PathBuf::from("/work/shop/internal/infrastructure/persistence")
        );
        assert_eq!(
            layout.interfaces_dir,
            PathBuf::from("/work/shop/internal/interfaces/http")
        );
        assert_eq!(layout.main_go(), PathBuf::from("/work/shop/cmd/main.go"));
        assert_eq!(
            layout.migrate_main_go(),
            PathBuf::from("/work/shop/cmd/migrate/main.go")
        );
        assert_eq!(
            layout.manifest_path(),
            PathBuf::from("/work/shop/.soliton-gen/manifest.json")
        );
    }

    #[test]
    fn module_declaration_is_found_anywhere() {
        let content = "// comment\n\nmodule   github.com/acme/shop  \n\ngo 1.22\n";
        let module = parse_module_declaration(content, Path::new("go.mod")).unwrap();
        assert_eq!(module, "github.com/acme/shop");
    }

    #[test]
    fn missing_or_empty_module_is_invalid() {
        let missing = parse_module_declaration("go 1.22\n", Path::new("go.mod"));
        assert!(matches!(missing, Err(DomainError::InvalidModuleDeclaration { .. })));

        let empty = parse_module_declaration("module\n", Path::new("go.mod"));
        assert!(matches!(empty, Err(DomainError::InvalidModuleDeclaration { .. })));
    }

    #[test]
    fn modulepath_lookalike_is_ignored() {
        let content = "modulefoo bar\nmodule real/path\n";
        assert_eq!(
            parse_module_declaration(content, Path::new("go.mod")).unwrap(),
            "real/path"
        );
    }

    #[test]
    fn go_directive_parses() {
        assert_eq!(parse_go_directive("go 1.23\nuse ./a\n"), Some("1.23".into()));
        assert_eq!(parse_go_directive("use ./a\n"), None);
    }

    #[test]
    fn relative_strips_module_dir() {
        let layout = ProjectLayout::new("/p", "m");
        assert_eq!(
            layout.relative(Path::new("/p/cmd/main.go")),
            Path::new("cmd/main.go")
        );
        assert_eq!(layout.relative(Path::new("/x")), Path::new("/x"));
    }
}

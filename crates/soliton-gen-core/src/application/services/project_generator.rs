//! New project skeletons and module maintenance.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::application::ports::GeneratorPorts;
use crate::domain::layout::parse_go_directive;
use crate::domain::template_data::DEFAULT_MODULE_PREFIX;
use crate::domain::{GenerationResult, ProjectConfig, ProjectData, TemplateId};
use crate::error::GenResult;

const DIRECTORIES: [&str; 7] = [
    "cmd",
    "cmd/migrate",
    "configs",
    "internal/domain",
    "internal/application",
    "internal/infrastructure/persistence",
    "internal/interfaces/http",
];

const FILES: [(&str, TemplateId); 9] = [
    ("go.mod", TemplateId::GoMod),
    ("cmd/main.go", TemplateId::MainGo),
    ("cmd/migrate/main.go", TemplateId::MigrateMain),
    ("configs/config.yaml", TemplateId::Config),
    ("configs/config.example.yaml", TemplateId::ConfigExample),
    ("internal/interfaces/http/response.go", TemplateId::Response),
    (".gitignore", TemplateId::Gitignore),
    ("README.md", TemplateId::Readme),
    ("Makefile", TemplateId::Makefile),
];

#[derive(Debug, Clone)]
pub struct ProjectGenerator {
    ports: GeneratorPorts,
    module_prefix: String,
}

impl ProjectGenerator {
    pub fn new(ports: GeneratorPorts) -> Self {
        Self {
            ports,
            module_prefix: DEFAULT_MODULE_PREFIX.to_string(),
        }
    }

    /// Prefix for the default module path `<prefix>/<name>`.
    pub fn with_module_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.module_prefix = prefix.into();
        self
    }

    /// Creates `<parent>/<name>` with the directory skeleton and starter
    /// files. Existing files are never replaced, not even in preview.
    ///
    /// A `framework` directory next to the new project is used through a
    /// `replace` directive unless one is given explicitly, and the Go
    /// version follows `<parent>/go.work` when present.
    #[instrument(skip_all, fields(project = %cfg.name, preview))]
    pub fn init(&self, cfg: &ProjectConfig, parent: &Path, preview: bool) -> GenResult<GenerationResult> {
        cfg.validate()?;
        let fs = &self.ports.filesystem;
        let root = parent.join(&cfg.name);

        let sibling = fs
            .is_dir(&parent.join("framework"))
            .then_some("../framework");
        let go_work = parent.join("go.work");
        let detected = if fs.is_file(&go_work) {
            fs.read_to_string(&go_work)
                .ok()
                .and_then(|content| parse_go_directive(&content))
        } else {
            None
        };
        let data = ProjectData::build(cfg, &self.module_prefix, sibling, detected.as_deref());
        debug!(module = %data.module_name, go = %data.go_version, "Project data");

        let mut result = GenerationResult::new();
        if !preview {
            for dir in DIRECTORIES {
                let path = root.join(dir);
                if let Err(err) = fs.create_dir_all(&path) {
                    result.errors.push(format!("{}: {err}", path.display()));
                }
            }
        }

        let files = self.ports.file_generator();
        for (relative, template) in FILES {
            let path: PathBuf = root.join(relative);
            result.push(files.render_if_absent(&path, template, &data, preview));
        }

        let message = if preview {
            format!("Preview of project {} at {}", cfg.name, root.display())
        } else {
            format!("Project {} initialized at {}", cfg.name, root.display())
        };
        info!(files = result.files.len(), "{message}");
        let mut result = result.finish(message);
        result.success &= result.errors.is_empty();
        Ok(result)
    }

    /// Runs `go mod tidy` in the resolved module directory.
    #[instrument(skip_all, fields(start = %start.display()))]
    pub fn tidy(&self, start: &Path) -> GenResult<String> {
        let layout = self.ports.layout_resolver().resolve(start)?;
        let output = self.ports.toolchain.tidy(&layout.module_dir)?;
        info!(module_dir = %layout.module_dir.display(), "Dependencies tidied");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ApplicationError;
    use crate::application::ports::MockToolchain;
    use crate::application::services::test_support::{FakeFs, harness, shop};
    use crate::domain::FileStatus;
    use std::sync::Arc;

    #[test]
    fn init_creates_skeleton() {
        let h = harness(Arc::new(FakeFs::default()));
        h.fs.mkdir("/work");
        let result = ProjectGenerator::new(h.ports.clone())
            .init(&ProjectConfig::new("shop"), Path::new("/work"), false)
            .unwrap();

        assert!(result.success);
        assert_eq!(result.count(FileStatus::New), 9);
        assert!(h.fs.has("/work/shop/internal/infrastructure/persistence"));
        assert!(h.fs.has("/work/shop/cmd/migrate/main.go"));
        let go_mod = h.fs.get("/work/shop/go.mod").unwrap();
        assert!(go_mod.contains("github.com/soliton-go/shop"));
        assert!(go_mod.contains("v0.1.0"));
    }

    #[test]
    fn init_never_overwrites() {
        let h = harness(Arc::new(FakeFs::default()));
        h.fs.add("/work/shop/README.md", "mine");
        let result = ProjectGenerator::new(h.ports.clone())
            .init(&ProjectConfig::new("shop"), Path::new("/work"), false)
            .unwrap();
        assert_eq!(result.count(FileStatus::Skip), 1);
        assert_eq!(h.fs.get("/work/shop/README.md").as_deref(), Some("mine"));
    }

    #[test]
    fn sibling_framework_is_replaced_locally() {
        let h = harness(Arc::new(FakeFs::default()));
        h.fs.mkdir("/work/framework");
        h.fs.add("/work/go.work", "go 1.23\n\nuse ./framework\n");
        ProjectGenerator::new(h.ports.clone())
            .with_module_prefix("example.com/acme")
            .init(&ProjectConfig::new("shop"), Path::new("/work"), false)
            .unwrap();
        let go_mod = h.fs.get("/work/shop/go.mod").unwrap();
        assert!(go_mod.contains("example.com/acme/shop"));
        assert!(go_mod.contains("../framework"));
        assert!(go_mod.contains("\"go_version\":\"1.23\""));
    }

    #[test]
    fn preview_creates_nothing() {
        let h = harness(Arc::new(FakeFs::default()));
        let result = ProjectGenerator::new(h.ports.clone())
            .init(&ProjectConfig::new("shop"), Path::new("/work"), true)
            .unwrap();
        assert!(result.files.iter().all(|f| f.content.is_some()));
        assert!(!h.fs.has("/work/shop"));
    }

    #[test]
    fn tidy_runs_in_module_dir() {
        let h = shop();
        let mut toolchain = MockToolchain::new();
        toolchain
            .expect_tidy()
            .withf(|dir| dir == Path::new("/shop"))
            .times(1)
            .returning(|_| Ok("ok".into()));
        let mut ports = h.ports.clone();
        ports.toolchain = Arc::new(toolchain);
        assert_eq!(
            ProjectGenerator::new(ports).tidy(Path::new("/shop/internal")).unwrap(),
            "ok"
        );
    }

    #[test]
    fn tidy_failure_propagates() {
        let h = shop();
        let mut toolchain = MockToolchain::new();
        toolchain.expect_tidy().returning(|_| {
            Err(ApplicationError::ExternalCommand {
                command: "go mod tidy".into(),
                reason: "exit status 1".into(),
            }
            .into())
        });
        let mut ports = h.ports.clone();
        ports.toolchain = Arc::new(toolchain);
        assert!(ProjectGenerator::new(ports).tidy(Path::new("/shop")).is_err());
    }
}

//! Side-car record of generated artifacts.
//!
//! The manifest lives at `.soliton-gen/manifest.json` under the module
//! directory and is the first source for listing and detail views. Files
//! generated before the manifest existed are recovered by scanning (see
//! [`readback`](crate::domain::readback)).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::artifact::ArtifactKind;
use crate::domain::field::FieldConfig;
use crate::domain::naming::package_name;

pub const MANIFEST_VERSION: u32 = 1;

/// One generated artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub id: Uuid,
    pub kind: ArtifactKind,
    /// Owning domain package; `None` for domains themselves and services.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Canonical Go type name (`Order`, `OrderService`, `OrderPaidEvent`).
    pub name: String,
    /// Paths relative to the module directory.
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl ManifestEntry {
    pub fn new(kind: ArtifactKind, domain: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            domain: domain.map(package_name),
            name: name.into(),
            files: Vec::new(),
            fields: Vec::new(),
            topic: None,
            target: None,
            remark: None,
            methods: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    pub fn with_files(mut self, files: Vec<String>) -> Self {
        self.files = files;
        self
    }

    pub fn with_fields(mut self, fields: Vec<FieldConfig>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn with_target(mut self, target: Option<String>) -> Self {
        self.target = target;
        self
    }

    pub fn with_remark(mut self, remark: Option<String>) -> Self {
        self.remark = remark;
        self
    }

    pub fn with_methods(mut self, methods: Vec<String>) -> Self {
        self.methods = methods;
        self
    }

    fn matches(&self, kind: ArtifactKind, domain: Option<&str>, name: &str) -> bool {
        self.kind == kind
            && self.domain.as_deref() == domain.map(package_name).as_deref()
            && self.name.eq_ignore_ascii_case(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub entries: Vec<ManifestEntry>,
}

fn default_version() -> u32 {
    MANIFEST_VERSION
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            version: MANIFEST_VERSION,
            entries: Vec::new(),
        }
    }
}

impl Manifest {
    pub fn find(&self, kind: ArtifactKind, domain: Option<&str>, name: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|e| e.matches(kind, domain, name))
    }

    /// Entries of one kind, optionally restricted to a domain package.
    pub fn of_kind<'a>(
        &'a self,
        kind: ArtifactKind,
        domain: Option<&'a str>,
    ) -> impl Iterator<Item = &'a ManifestEntry> + 'a {
        let domain = domain.map(package_name);
        self.entries
            .iter()
            .filter(move |e| e.kind == kind && (domain.is_none() || e.domain == domain))
    }

    /// Inserts or replaces the entry with the same kind, domain and name.
    /// A replaced entry keeps its id.
    pub fn upsert(&mut self, mut entry: ManifestEntry) {
        match self
            .entries
            .iter_mut()
            .find(|e| e.matches(entry.kind, entry.domain.as_deref(), &entry.name))
        {
            Some(existing) => {
                entry.id = existing.id;
                *existing = entry;
            }
            None => self.entries.push(entry),
        }
    }

    pub fn remove(&mut self, kind: ArtifactKind, domain: Option<&str>, name: &str) -> Option<ManifestEntry> {
        let index = self.entries.iter().position(|e| e.matches(kind, domain, name))?;
        Some(self.entries.remove(index))
    }

    /// Drops a domain and everything recorded inside it.
    pub fn remove_domain(&mut self, package: &str) -> usize {
        let package = package_name(package);
        let before = self.entries.len();
        self.entries.retain(|e| {
            let is_domain = e.kind == ArtifactKind::Domain && package_name(&e.name) == package;
            let inside = e.domain.as_deref() == Some(package.as_str());
            !(is_domain || inside)
        });
        before - self.entries.len()
    }

    /// Renames an entry in place and records its new file list.
    pub fn rename(
        &mut self,
        kind: ArtifactKind,
        domain: Option<&str>,
        old_name: &str,
        new_name: &str,
        files: Vec<String>,
    ) -> bool {
        match self.entries.iter_mut().find(|e| e.matches(kind, domain, old_name)) {
            Some(entry) => {
                entry.name = new_name.to_string();
                entry.files = files;
                entry.generated_at = Utc::now();
                true
            }
            None => false,
        }
    }
}

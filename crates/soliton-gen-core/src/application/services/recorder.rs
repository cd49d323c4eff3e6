//! Manifest bookkeeping shared by the generators.
//!
//! Manifest failures never fail an operation; they surface as warnings.

use tracing::{debug, warn};

use crate::application::ports::GeneratorPorts;
use crate::domain::{GenerationResult, Manifest, ManifestEntry, ProjectLayout};
use crate::error::GenResult;

/// Upserts an entry after a non-preview run that wrote at least one file.
pub(crate) fn record(
    ports: &GeneratorPorts,
    layout: &ProjectLayout,
    preview: bool,
    result: &mut GenerationResult,
    entry: ManifestEntry,
) {
    if preview || !result.wrote_any() {
        return;
    }
    let files = result
        .files
        .iter()
        .map(|f| layout.relative(&f.path).display().to_string())
        .collect();
    let entry = entry.with_files(files);

    if let Err(err) = update(ports, layout, |manifest| manifest.upsert(entry)) {
        warn!(error = %err, "Could not update manifest");
        result.warn(format!("manifest not updated: {err}"));
    }
}

/// Loads, mutates and saves the manifest.
pub(crate) fn update<T>(
    ports: &GeneratorPorts,
    layout: &ProjectLayout,
    change: impl FnOnce(&mut Manifest) -> T,
) -> GenResult<T> {
    let mut manifest = ports.manifest.load(&layout.module_dir)?;
    let out = change(&mut manifest);
    ports.manifest.save(&layout.module_dir, &manifest)?;
    debug!(entries = manifest.entries.len(), "Manifest saved");
    Ok(out)
}

/// Loads the manifest, falling back to an empty one.
pub(crate) fn load_or_default(ports: &GeneratorPorts, layout: &ProjectLayout) -> Manifest {
    ports.manifest.load(&layout.module_dir).unwrap_or_else(|err| {
        warn!(error = %err, "Could not read manifest, scanning sources instead");
        Manifest::default()
    })
}

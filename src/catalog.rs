//! # Extension Catalog
//!
//! Batch loading of every plugin under a directory, with per-library
//! failure isolation, and the resulting "currently loaded set of manifests".
//!
//! A [`Catalog`] is immutable once built: reloading produces a whole new
//! value rather than mutating the old one, so callers holding a previous
//! catalog keep a consistent view.

use crate::command::{Command, ExtensionManifest};
use crate::discovery::ExtensionSource;
use crate::error::ScanError;
use crate::scanner;
use std::path::Path;
use walkdir::WalkDir;

/// What a batch load does when one library fails.
///
/// One bad plugin should not normally take the whole catalog down, so
/// [`Isolation::SkipFailed`] is the default; [`Isolation::Abort`] is for
/// callers that treat any failure as fatal (e.g. a packaging step).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Isolation {
    /// Skip the failing library, record the error, continue with the rest.
    #[default]
    SkipFailed,
    /// Fail the whole load on the first bad library.
    Abort,
}

/// One successfully loaded plugin: discovery metadata plus its scanned
/// manifest.
#[derive(Debug, Clone)]
pub struct Extension {
    pub source: ExtensionSource,
    pub manifest: ExtensionManifest,
}

/// The loaded set of extension manifests.
#[derive(Debug, Default)]
pub struct Catalog {
    /// Loaded extensions, ordered by title.
    pub extensions: Vec<Extension>,
    /// Per-library failures collected under [`Isolation::SkipFailed`].
    pub failures: Vec<ScanError>,
}

impl Catalog {
    /// Scan every `*.ini` discovery file under `root` and load the library
    /// each one points at.
    ///
    /// The resulting extension order is a function of content only (sorted
    /// by title), never of directory-walk order.
    pub fn load(root: &Path, isolation: Isolation) -> Result<Catalog, ScanError> {
        tracing::info!("[CATALOG] Loading extensions under {}", root.display());

        let mut catalog = Catalog::default();
        for entry in WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
        {
            let path = entry.path();
            if path.extension().map(|e| e == "ini").unwrap_or(false) {
                match Self::load_one(path) {
                    Ok(extension) => catalog.extensions.push(extension),
                    Err(err) => match isolation {
                        Isolation::SkipFailed => {
                            tracing::warn!("[CATALOG] skipping {}: {err}", err.path().display());
                            catalog.failures.push(err);
                        }
                        Isolation::Abort => return Err(err),
                    },
                }
            }
        }

        catalog
            .extensions
            .sort_by(|a, b| a.source.title.cmp(&b.source.title));

        tracing::info!(
            "[CATALOG] Loaded {} extensions ({} failed)",
            catalog.extensions.len(),
            catalog.failures.len()
        );
        Ok(catalog)
    }

    fn load_one(discovery_path: &Path) -> Result<Extension, ScanError> {
        let source = ExtensionSource::resolve(discovery_path)?;
        let manifest = scanner::load_library(&source.library_path)?;
        Ok(Extension { source, manifest })
    }

    /// All commands across the loaded manifests, in catalog order.
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.extensions
            .iter()
            .flat_map(|e| e.manifest.commands.iter())
    }
}

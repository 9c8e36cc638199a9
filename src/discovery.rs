//! # Plugin Discovery Files
//!
//! Each plugin ships a key/value discovery file next to its library:
//!
//! ```ini
//! [General]
//! Title = Robot Arm
//! Author = Acme
//! Summary = Drive the robot arm from blocks.
//!
//! [Assembly]
//! File = <%LOCAL%>/arm.gsx
//! Dependencies = <%LOCAL%>/deps
//! ```
//!
//! The `<%LOCAL%>` placeholder resolves to the discovery file's directory.
//! This module is the collaborator layer above the scanner core: it turns a
//! discovery file into a concrete library path plus display metadata and
//! performs no classification itself.

use crate::error::ScanError;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const LOCAL_PLACEHOLDER: &str = "<%LOCAL%>";

/// Parsed key/value sections of one discovery file.
#[derive(Debug, Clone)]
pub struct DiscoveryFile {
    sections: HashMap<String, HashMap<String, String>>,
}

impl DiscoveryFile {
    /// Parse discovery-file text. Unknown sections and keys are kept; only
    /// consumers decide what is required.
    pub fn parse(text: &str) -> Self {
        let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
        let mut current = String::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                current = name.trim().to_string();
                sections.entry(current.clone()).or_default();
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                sections
                    .entry(current.clone())
                    .or_default()
                    .insert(key.trim().to_string(), value.trim().to_string());
            }
        }

        DiscoveryFile { sections }
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)?
            .get(key)
            .map(|v| v.as_str())
    }
}

/// Display metadata and resolved paths for one plugin, ready for the
/// scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSource {
    pub discovery_path: PathBuf,
    pub library_path: PathBuf,
    pub title: String,
    pub author: String,
    pub summary: String,
    /// Optional sibling dependency directory; dropped when it does not
    /// exist on disk.
    pub dependencies: Option<PathBuf>,
}

impl ExtensionSource {
    /// Read and resolve one discovery file. A missing required key is a
    /// [`ScanError::Manifest`]; the caller skips that plugin.
    pub fn resolve(discovery_path: &Path) -> Result<Self, ScanError> {
        let text = fs::read_to_string(discovery_path).map_err(|source| ScanError::Discovery {
            path: discovery_path.to_path_buf(),
            source,
        })?;
        let file = DiscoveryFile::parse(&text);

        let local = discovery_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        let substitute =
            |value: &str| PathBuf::from(value.replace(LOCAL_PLACEHOLDER, &local.to_string_lossy()));

        let require = |section: &str, key: &'static str| {
            file.get(section, key)
                .map(str::to_string)
                .ok_or(ScanError::Manifest {
                    path: discovery_path.to_path_buf(),
                    key,
                })
        };

        let library_path = substitute(&require("Assembly", "File")?);
        let title = require("General", "Title")?;
        let author = file.get("General", "Author").unwrap_or_default().to_string();
        let summary = file
            .get("General", "Summary")
            .unwrap_or_default()
            .to_string();

        let dependencies = file
            .get("Assembly", "Dependencies")
            .map(|dir| substitute(dir))
            .filter(|dir| dir.is_dir());

        Ok(ExtensionSource {
            discovery_path: discovery_path.to_path_buf(),
            library_path,
            title,
            author,
            summary,
            dependencies,
        })
    }
}

//! # Error Taxonomy
//!
//! Errors are split by pipeline stage: [`ScanError`] covers everything that
//! can go wrong while locating and loading an extension library, and
//! [`GraphError`] covers graph construction and source generation.
//!
//! Degraded event-signature recovery is deliberately *not* represented here:
//! it is a non-fatal classification outcome that is logged and folded into
//! the emitted command (see [`crate::scanner`]).

use crate::graph::NodeId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while discovering, loading, or decoding an extension library.
///
/// A `ScanError` is always local to one library: the batch loader decides
/// whether to skip the library or abort the whole pass (see
/// [`crate::catalog::Isolation`]).
#[derive(Debug, Error)]
pub enum ScanError {
    /// The library file could not be read at all.
    #[error("failed to load extension library {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The library file was readable but its declaration document was not
    /// decodable. No partial manifest is produced.
    #[error("failed to decode extension library {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A discovery file was missing a required key.
    #[error("malformed discovery file {path}: missing key {key:?}")]
    Manifest { path: PathBuf, key: &'static str },

    /// A discovery file could not be read.
    #[error("failed to read discovery file {path}: {source}")]
    Discovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// The path of the library or discovery file this error is about.
    pub fn path(&self) -> &PathBuf {
        match self {
            ScanError::Load { path, .. }
            | ScanError::Decode { path, .. }
            | ScanError::Manifest { path, .. }
            | ScanError::Discovery { path, .. } => path,
        }
    }
}

/// Errors raised while building or rendering a program graph.
///
/// Both variants carry the [`NodeId`] of the offending node so an editor can
/// highlight the exact block. They abort only the current construction or
/// generation call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A required slot was empty at construction or generation time.
    #[error("incomplete block {node}: {what} slot is empty")]
    IncompleteBlock { node: NodeId, what: &'static str },

    /// The statement chain loops back on itself.
    #[error("statement chain cycles back through {node}")]
    Cycle { node: NodeId },
}

impl GraphError {
    /// The node this error points at.
    pub fn node(&self) -> NodeId {
        match self {
            GraphError::IncompleteBlock { node, .. } | GraphError::Cycle { node } => *node,
        }
    }
}

//! # Block Prototype Factory
//!
//! Pure projection from scanned commands to palette block prototypes. The
//! editor consumes these entries to populate its palette; nothing here has
//! side effects, and because manifests are immutable the projection is
//! cacheable per manifest.

use crate::command::{Command, CommandKind, ExtensionManifest};
use serde::Serialize;

/// The block prototype a command surfaces as in the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BlockKind {
    /// Statement-shaped invocation block.
    Call,
    /// Expression-shaped block producing a value.
    Value,
    /// Chain-head block fired by an event.
    Event,
    /// Accessor block.
    Property,
    /// Enumeration picker block.
    Enum,
}

/// Map one command to its block prototype. Total: every command kind has
/// exactly one block kind.
pub fn prototype_for(command: &Command) -> BlockKind {
    match command.kind {
        // A void call is a statement; a call with a result reads as a value.
        CommandKind::Call if command.is_void() => BlockKind::Call,
        CommandKind::Call => BlockKind::Value,
        CommandKind::Logic => BlockKind::Value,
        CommandKind::Event => BlockKind::Event,
        CommandKind::Property => BlockKind::Property,
        CommandKind::Enum => BlockKind::Enum,
    }
}

/// One palette entry: a block prototype paired with the command it builds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaletteEntry {
    pub block: BlockKind,
    pub command: Command,
}

/// Derive the palette for one manifest, in catalog order.
pub fn palette(manifest: &ExtensionManifest) -> Vec<PaletteEntry> {
    manifest
        .commands
        .iter()
        .map(|command| PaletteEntry {
            block: prototype_for(command),
            command: command.clone(),
        })
        .collect()
}

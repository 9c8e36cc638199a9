//! # Command Model
//!
//! Immutable descriptor types shared between the scanner, the catalog
//! sorter, and the palette factory. These are plain values: once a scan has
//! produced a manifest, nothing in the engine mutates it — a re-scan builds
//! a fresh manifest instead.

use serde::Serialize;

/// The canonical "no value" result type for commands and exports.
pub const NO_VALUE: &str = "void";

/// How a command surfaces in the editor.
///
/// Variant order matches the sorter's ranking: the catalog is ordered by
/// rank descending, so `Enum` commands sort first and `Call` commands last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CommandKind {
    /// Void-returning invocation.
    Call,
    /// Value-producing invocation.
    Logic,
    /// Asynchronously fired member with a recovered handler signature.
    Event,
    /// Data accessor.
    Property,
    /// Tagged nested enumeration surfaced as one command.
    Enum,
}

impl CommandKind {
    /// Sort rank, higher sorts earlier in the catalog.
    pub fn rank(self) -> u8 {
        match self {
            CommandKind::Call => 0,
            CommandKind::Logic => 1,
            CommandKind::Event => 2,
            CommandKind::Property => 3,
            CommandKind::Enum => 4,
        }
    }
}

/// One parameter of a command or export signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub internal_name: String,
    pub display_name: String,
    /// Empty when the parameter carried no display tag.
    pub friendly_name: String,
    pub value_type: String,
}

/// A localized display string for a command or export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Translation {
    pub text: String,
    pub locale: String,
}

/// One tagged member of a surfaced enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumMember {
    pub field_name: String,
    /// `{owner}.{enum}.{field}`.
    pub qualified_path: String,
    pub friendly_name: String,
    pub underlying_type: String,
}

/// One invocable or value-producing operation surfaced from a scanned
/// library.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Command {
    /// Qualified name of the declaration that owns the member.
    pub owner_name: String,
    pub member_name: String,
    pub friendly_name: String,
    pub kind: CommandKind,
    pub result_type: String,
    pub parameters: Vec<Parameter>,
    /// Enum payload; empty for every other kind.
    pub members: Vec<EnumMember>,
    /// Present only when the originating tag opted into localization.
    pub translations: Vec<Translation>,
}

impl Command {
    /// True when the command produces no value.
    pub fn is_void(&self) -> bool {
        self.result_type == NO_VALUE
    }
}

/// The View-only analog of a [`Command`]: a live UI binding surface rather
/// than an invocable operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Export {
    pub owner_name: String,
    pub member_name: String,
    pub friendly_name: String,
    pub value_type: String,
    pub parameters: Vec<Parameter>,
    pub translations: Vec<Translation>,
}

/// One "View"-shaped declaration together with its accumulated exports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Control {
    pub friendly_name: String,
    pub qualified_name: String,
    pub exports: Vec<Export>,
}

/// The scanned, classified description of one extension library.
///
/// Immutable once constructed. `commands` is kept in catalog-sorted order
/// (kind rank descending, friendly name ascending); `controls` keep
/// encounter order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtensionManifest {
    /// The library's namespace / symbol scope.
    pub symbol_scope: String,
    pub commands: Vec<Command>,
    pub controls: Vec<Control>,
}

//! # Blocksmith
//!
//! Compiler core for a block-based visual programming environment: users
//! compose graphical blocks into a program graph, and this crate turns that
//! graph into literal source text. The same crate discovers extension
//! libraries, classifies their exported members against a fixed annotation
//! schema, and produces the typed command catalog the block palette is
//! built from.
//!
//! ## Quick Start
//!
//! ```rust
//! use blocksmith::{build_assignment, LogicNode, Slot, SourceGenerator, SourceTemplates};
//!
//! let mut value = Slot::empty();
//! value.occupy(LogicNode::variable("y"));
//! let assignment = build_assignment("x", &mut value)?;
//!
//! let templates = SourceTemplates::default();
//! let code = SourceGenerator::new(&templates).generate_chain(&assignment)?;
//! assert_eq!(code, "x = y;\n");
//! # Ok::<(), blocksmith::GraphError>(())
//! ```
//!
//! ## Architecture
//!
//! The catalog side runs as a pipeline:
//!
//! 1. **Discovery** - resolve each plugin's discovery file to a library path
//! 2. **Scan** - load the library's declaration document and classify it
//! 3. **Sort** - impose deterministic catalog order on the commands
//! 4. **Palette** - project each command to its block prototype
//!
//! The editor builds program graph nodes from palette blocks; the source
//! generator renders finished graphs into text.

pub mod catalog;
pub mod codegen;
pub mod command;
pub mod discovery;
pub mod error;
pub mod graph;
pub mod palette;
pub mod scanner;

// Re-export the main pipeline API
pub use catalog::{Catalog, Extension, Isolation};
pub use codegen::{SourceGenerator, SourceTemplates};
pub use command::{
    Command, CommandKind, Control, EnumMember, Export, ExtensionManifest, Parameter, Translation,
    NO_VALUE,
};
pub use discovery::{DiscoveryFile, ExtensionSource};
pub use error::{GraphError, ScanError};
pub use graph::{
    build_assignment, DeclarationNode, LogicNode, NodeId, NodeRef, Slot, StatementKind,
    StatementNode,
};
pub use palette::{palette, prototype_for, BlockKind, PaletteEntry};
pub use scanner::{load_library, scan, sort_commands, LibraryDecls};

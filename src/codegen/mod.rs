//! # Source Generation
//!
//! Renders program graph roots into literal target-language source text.
//!
//! The target syntax is not hard-coded: callers supply emission templates
//! via [`SourceTemplates`] and the generator fills in the node content.
//! Rendering is a pure function of the graph's current shape; it mutates
//! nothing, and any error aborts the whole generation call for that root —
//! partial text is never returned.

use crate::error::GraphError;
use crate::graph::{DeclarationNode, StatementKind, StatementNode};
use std::collections::HashSet;

/// Caller-supplied emission templates. Placeholders: `{name}` in the
/// declaration template, `{target}` and `{value}` in the assignment
/// template; the terminator is appended to every declaration and statement.
#[derive(Debug, Clone)]
pub struct SourceTemplates {
    pub declaration: String,
    pub assignment: String,
    pub terminator: String,
}

impl Default for SourceTemplates {
    fn default() -> Self {
        SourceTemplates {
            declaration: "public object {name}".to_string(),
            assignment: "{target} = {value}".to_string(),
            terminator: ";".to_string(),
        }
    }
}

/// Fill `{placeholder}` markers in one template.
fn fill(template: &str, substitutions: &[(&str, &str)]) -> String {
    let mut text = template.to_string();
    for (key, value) in substitutions {
        text = text.replace(&format!("{{{key}}}"), value);
    }
    text
}

/// Renders graph roots against one set of templates.
#[derive(Debug)]
pub struct SourceGenerator<'a> {
    templates: &'a SourceTemplates,
}

impl<'a> SourceGenerator<'a> {
    pub fn new(templates: &'a SourceTemplates) -> Self {
        SourceGenerator { templates }
    }

    /// Render one declaration node.
    pub fn generate_declaration(&self, node: &DeclarationNode) -> Result<String, GraphError> {
        Ok(format!(
            "{}{}",
            fill(&self.templates.declaration, &[("name", &node.name)]),
            self.templates.terminator
        ))
    }

    /// Render one statement chain, head first, one statement per line.
    ///
    /// An empty next slot is simply the end of the chain; a chain that loops
    /// back on itself fails with [`GraphError::Cycle`].
    pub fn generate_chain(&self, head: &StatementNode) -> Result<String, GraphError> {
        let mut code = String::new();
        let mut visited = HashSet::new();
        let mut current = head;
        loop {
            if !visited.insert(current.id()) {
                return Err(GraphError::Cycle { node: current.id() });
            }
            code.push_str(&self.generate_statement(current)?);
            code.push('\n');
            match current.next.occupant() {
                Some(next) => current = next,
                None => return Ok(code),
            }
        }
    }

    /// Render a whole program: declarations first, then each statement
    /// chain, all in caller order. Any error drops the output entirely.
    pub fn generate_program(
        &self,
        declarations: &[DeclarationNode],
        chains: &[StatementNode],
    ) -> Result<String, GraphError> {
        tracing::info!(
            "[CODEGEN] Generating program ({} declarations, {} chains)",
            declarations.len(),
            chains.len()
        );

        let mut code = String::new();
        for declaration in declarations {
            code.push_str(&self.generate_declaration(declaration)?);
            code.push('\n');
        }
        for chain in chains {
            code.push_str(&self.generate_chain(chain)?);
        }

        tracing::info!("[CODEGEN] Generation complete ({} bytes)", code.len());
        Ok(code)
    }

    fn generate_statement(&self, node: &StatementNode) -> Result<String, GraphError> {
        match &node.kind {
            StatementKind::Assignment { target, value } => Ok(format!(
                "{}{}",
                fill(
                    &self.templates.assignment,
                    &[("target", target), ("value", value.expression())],
                ),
                self.templates.terminator
            )),
        }
    }
}

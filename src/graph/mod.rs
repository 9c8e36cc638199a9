//! # Program Graph Model
//!
//! The node taxonomy behind the editor's blocks: expression-producing logic
//! nodes, chainable statement nodes, and top-level declaration nodes, linked
//! through single-occupancy [`Slot`]s.
//!
//! Nodes form an ownership tree: a slot's owner exclusively owns its
//! occupant, and occupying a slot releases the previous occupant back to the
//! caller (what to do with it is the editor's business). Mutating a chain
//! and traversing it are not synchronized here; callers serialize the two,
//! typically by confining all graph edits to the editor's event loop.

use crate::error::GraphError;
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of one graph node, carried by errors so the editor can
/// highlight the offending block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

impl NodeId {
    fn fresh() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// A single-occupancy, optionally empty link from an owner node to one
/// child. Freshly created slots are empty.
#[derive(Debug)]
pub struct Slot<T> {
    occupant: Option<Box<T>>,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Slot::empty()
    }
}

impl<T> Slot<T> {
    pub fn empty() -> Self {
        Slot { occupant: None }
    }

    /// Place `child` in the slot, releasing the previous occupant to the
    /// caller.
    pub fn occupy(&mut self, child: T) -> Option<Box<T>> {
        self.occupant.replace(Box::new(child))
    }

    /// Empty the slot, releasing the occupant to the caller.
    pub fn vacate(&mut self) -> Option<Box<T>> {
        self.occupant.take()
    }

    pub fn occupant(&self) -> Option<&T> {
        self.occupant.as_deref()
    }

    pub fn occupant_mut(&mut self) -> Option<&mut T> {
        self.occupant.as_deref_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }
}

/// Expression-producing leaf nodes. A logic node renders only as a
/// sub-expression of its owning statement or declaration, never as
/// top-level output.
#[derive(Debug)]
pub enum LogicNode {
    /// Renders as the variable name, verbatim.
    Variable { id: NodeId, name: String },
    /// Renders as its literal text, verbatim.
    Literal { id: NodeId, text: String },
}

impl LogicNode {
    pub fn variable(name: impl Into<String>) -> Self {
        LogicNode::Variable {
            id: NodeId::fresh(),
            name: name.into(),
        }
    }

    pub fn literal(text: impl Into<String>) -> Self {
        LogicNode::Literal {
            id: NodeId::fresh(),
            text: text.into(),
        }
    }

    pub fn id(&self) -> NodeId {
        match self {
            LogicNode::Variable { id, .. } | LogicNode::Literal { id, .. } => *id,
        }
    }

    /// The expression fragment this node contributes.
    pub fn expression(&self) -> &str {
        match self {
            LogicNode::Variable { name, .. } => name,
            LogicNode::Literal { text, .. } => text,
        }
    }
}

/// What one statement node does.
#[derive(Debug)]
pub enum StatementKind {
    /// Assign the rendered value expression to the named target variable.
    /// Target and value are resolved at construction time, not at render
    /// time.
    Assignment { target: String, value: LogicNode },
}

/// One statement in a chain. A fresh node is terminal: its `next` slot is
/// empty until the editor occupies it.
#[derive(Debug)]
pub struct StatementNode {
    id: NodeId,
    pub kind: StatementKind,
    pub next: Slot<StatementNode>,
}

/// One top-level declaration; not chained.
#[derive(Debug)]
pub struct DeclarationNode {
    id: NodeId,
    pub name: String,
}

impl DeclarationNode {
    pub fn new(name: impl Into<String>) -> Self {
        DeclarationNode {
            id: NodeId::fresh(),
            name: name.into(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }
}

/// Construct an assignment statement from a target name and whatever
/// currently occupies the value slot.
///
/// The occupant moves into the new node. An empty slot fails immediately
/// with [`GraphError::IncompleteBlock`] naming the assignment node; no
/// partially built node is ever returned.
pub fn build_assignment(
    target: impl Into<String>,
    value_slot: &mut Slot<LogicNode>,
) -> Result<StatementNode, GraphError> {
    let id = NodeId::fresh();
    let value = value_slot.vacate().ok_or(GraphError::IncompleteBlock {
        node: id,
        what: "value",
    })?;
    Ok(StatementNode {
        id,
        kind: StatementKind::Assignment {
            target: target.into(),
            value: *value,
        },
        next: Slot::empty(),
    })
}

/// A borrowed view of one node in a collected subgraph.
#[derive(Debug)]
pub enum NodeRef<'a> {
    Statement(&'a StatementNode),
    Logic(&'a LogicNode),
}

impl StatementNode {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Walk the next-slot chain to the terminal node. A fresh node is its
    /// own last node.
    ///
    /// The visited guard turns a looping chain into [`GraphError::Cycle`]
    /// instead of walking forever.
    pub fn last(&self) -> Result<&StatementNode, GraphError> {
        let mut visited = HashSet::new();
        let mut current = self;
        loop {
            if !visited.insert(current.id) {
                return Err(GraphError::Cycle { node: current.id });
            }
            match current.next.occupant() {
                Some(next) => current = next,
                None => return Ok(current),
            }
        }
    }

    /// Mutable counterpart of [`StatementNode::last`], for appending to the
    /// chain.
    pub fn last_mut(&mut self) -> Result<&mut StatementNode, GraphError> {
        // Cycle check on the shared walk, then descend again mutably.
        self.last()?;
        Ok(Self::descend_mut(self))
    }

    fn descend_mut(node: &mut StatementNode) -> &mut StatementNode {
        if node.next.is_empty() {
            node
        } else {
            // Occupancy checked just above.
            Self::descend_mut(node.next.occupant_mut().unwrap())
        }
    }

    /// Materialize the ordered node sequence of this chain: each statement,
    /// then its own composite children, then its successor.
    pub fn collect(&self) -> Result<Vec<NodeRef<'_>>, GraphError> {
        let mut nodes = Vec::new();
        let mut visited = HashSet::new();
        let mut current = self;
        loop {
            if !visited.insert(current.id) {
                return Err(GraphError::Cycle { node: current.id });
            }
            nodes.push(NodeRef::Statement(current));
            match &current.kind {
                StatementKind::Assignment { value, .. } => nodes.push(NodeRef::Logic(value)),
            }
            match current.next.occupant() {
                Some(next) => current = next,
                None => return Ok(nodes),
            }
        }
    }
}

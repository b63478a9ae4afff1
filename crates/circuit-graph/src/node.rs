//! Queue entries stored as graph nodes.

use serde::{Deserialize, Serialize};

use crate::wire::Wire;

/// Whether a queue entry is an operation or a terminal observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// A gate or other state-changing operation.
    Operation,
    /// A measured observable, after all operations in the queue.
    Observable,
}

/// A node in the circuit graph.
///
/// The payload can be swapped by [`CircuitGraph::update_node`], the queue
/// index never changes.
///
/// [`CircuitGraph::update_node`]: crate::CircuitGraph::update_node
#[derive(Debug, Clone)]
pub struct QueueNode<O> {
    pub(crate) op: O,
    pub(crate) queue_idx: usize,
    pub(crate) kind: NodeKind,
}

impl<O> QueueNode<O> {
    /// The operator payload.
    #[inline]
    pub fn op(&self) -> &O {
        &self.op
    }

    /// Position in the combined queue.
    #[inline]
    pub fn queue_idx(&self) -> usize {
        self.queue_idx
    }

    /// Operation or observable.
    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Check if this is an operation node.
    #[inline]
    pub fn is_operation(&self) -> bool {
        self.kind == NodeKind::Operation
    }

    /// Check if this is an observable node.
    #[inline]
    pub fn is_observable(&self) -> bool {
        self.kind == NodeKind::Observable
    }
}

/// A dependency edge and the wires that induce it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// Shared wires, in the order the later node lists them.
    pub wires: Vec<Wire>,
}

/// Location of one flattened parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParInfo {
    /// Queue index of the owning node.
    pub node: usize,
    /// Position of the parameter within the owning operator.
    pub param: usize,
}

//! Error types for the circuit graph crate.

use thiserror::Error;

use crate::wire::{Wire, Wires};

/// Errors that can occur while building or querying a circuit graph.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GraphError {
    /// An operator references a wire outside the declared wire set.
    #[error("Wire {wire} not found in circuit{}", format_op_context(.operation))]
    WireNotFound {
        /// The wire that was not found.
        wire: Wire,
        /// Optional operator name for context.
        operation: Option<String>,
    },

    /// A wire appears twice where wires must be unique.
    #[error("Duplicate wire {wire}{}", format_op_context(.operation))]
    DuplicateWire {
        /// The duplicate wire.
        wire: Wire,
        /// Optional operator name for context.
        operation: Option<String>,
    },

    /// No node exists at the given queue index.
    #[error("Node {0} not found in circuit graph")]
    NodeNotFound(usize),

    /// A replacement operator acts on different wires than the node it replaces.
    #[error("Node {node} acts on wires {expected}, replacement acts on {got}")]
    WireMismatch {
        /// Queue index of the node being replaced.
        node: usize,
        /// Wires of the current node.
        expected: Wires,
        /// Wires of the replacement.
        got: Wires,
    },

    /// A replacement operator carries a different number of parameters.
    #[error("Node {node} has {expected} parameters, replacement has {got}")]
    ParameterCountMismatch {
        /// Queue index of the node being replaced.
        node: usize,
        /// Parameter count of the current node.
        expected: usize,
        /// Parameter count of the replacement.
        got: usize,
    },

    /// A trainable parameter index lies outside the flattened parameter list.
    #[error("Parameter index {index} out of range (circuit has {num_params} parameters)")]
    ParameterIndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Total number of flattened parameters.
        num_params: usize,
    },

    /// Invalid graph structure.
    #[error("Invalid circuit graph: {0}")]
    InvalidGraph(String),

    /// Snapshot serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Helper function to format optional operator context.
#[allow(clippy::ref_option)]
fn format_op_context(operation: &Option<String>) -> String {
    match operation {
        Some(name) => format!(" (operation: {name})"),
        None => String::new(),
    }
}

/// Result type for circuit graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_not_found_message() {
        let err = GraphError::WireNotFound {
            wire: Wire::from("q7"),
            operation: Some("RX".into()),
        };
        assert_eq!(err.to_string(), "Wire q7 not found in circuit (operation: RX)");

        let err = GraphError::WireNotFound {
            wire: Wire::from(3),
            operation: None,
        };
        assert_eq!(err.to_string(), "Wire 3 not found in circuit");
    }

    #[test]
    fn test_wire_mismatch_message() {
        let err = GraphError::WireMismatch {
            node: 2,
            expected: Wires::from([0, 1]),
            got: Wires::from([1]),
        };
        assert_eq!(
            err.to_string(),
            "Node 2 acts on wires [0, 1], replacement acts on [1]"
        );
    }
}

//! Circuit graph construction from code or from a JSON description.

use serde::{Deserialize, Serialize};

use crate::dag::CircuitGraph;
use crate::error::GraphResult;
use crate::operator::{Operation, Operator};
use crate::wire::{WireIndex, Wires};

/// Builder for [`CircuitGraph`].
///
/// Without a declared wire set, wires are indexed in the order the queue first
/// uses them. Without an explicit trainable set, every parameter the operator
/// reports as trainable is trainable.
#[derive(Debug, Clone)]
pub struct CircuitGraphBuilder<O> {
    operations: Vec<O>,
    observables: Vec<O>,
    wires: Option<Wires>,
    trainable_params: Option<Vec<usize>>,
}

impl<O: Operator> CircuitGraphBuilder<O> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            operations: vec![],
            observables: vec![],
            wires: None,
            trainable_params: None,
        }
    }

    /// Append an operation to the queue.
    #[must_use]
    pub fn operation(mut self, op: O) -> Self {
        self.operations.push(op);
        self
    }

    /// Append operations to the queue.
    #[must_use]
    pub fn operations(mut self, ops: impl IntoIterator<Item = O>) -> Self {
        self.operations.extend(ops);
        self
    }

    /// Append an observable to the queue.
    #[must_use]
    pub fn observable(mut self, obs: O) -> Self {
        self.observables.push(obs);
        self
    }

    /// Append observables to the queue.
    #[must_use]
    pub fn observables(mut self, obs: impl IntoIterator<Item = O>) -> Self {
        self.observables.extend(obs);
        self
    }

    /// Declare the wire set.
    #[must_use]
    pub fn wires(mut self, wires: impl Into<Wires>) -> Self {
        self.wires = Some(wires.into());
        self
    }

    /// Set the trainable flattened parameter indices.
    #[must_use]
    pub fn trainable_params(mut self, params: impl IntoIterator<Item = usize>) -> Self {
        self.trainable_params = Some(params.into_iter().collect());
        self
    }

    /// Build the graph.
    pub fn build(self) -> GraphResult<CircuitGraph<O>> {
        let wire_index = self.wires.as_ref().map(WireIndex::new).transpose()?;
        let mut graph = CircuitGraph::build(self.operations, self.observables, wire_index)?;
        if let Some(params) = self.trainable_params {
            graph.set_trainable_params(params)?;
        }
        Ok(graph)
    }
}

impl<O: Operator> Default for CircuitGraphBuilder<O> {
    fn default() -> Self {
        Self::new()
    }
}

/// Declarative description of a circuit.
///
/// ```json
/// {
///   "wires": ["a", 1],
///   "operations": [{"name": "RX", "wires": ["a"], "params": [{"symbol": "theta"}]}],
///   "observables": [{"name": "PauliZ", "wires": [1], "return_type": "expectation"}]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CircuitDescription {
    /// Declared wire set. Inferred from the queue if absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wires: Option<Wires>,
    /// Operations in queue order.
    #[serde(default)]
    pub operations: Vec<Operation>,
    /// Observables in queue order.
    #[serde(default)]
    pub observables: Vec<Operation>,
    /// Trainable flattened parameter indices. Symbolic parameters if absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trainable_params: Option<Vec<usize>>,
}

impl CircuitDescription {
    /// Parse a description from JSON.
    pub fn from_json(json: &str) -> GraphResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Convert into a builder.
    pub fn into_builder(self) -> CircuitGraphBuilder<Operation> {
        let mut builder = CircuitGraphBuilder::new()
            .operations(self.operations)
            .observables(self.observables);
        if let Some(wires) = self.wires {
            builder = builder.wires(wires);
        }
        if let Some(params) = self.trainable_params {
            builder = builder.trainable_params(params);
        }
        builder
    }

    /// Build the circuit graph.
    pub fn into_graph(self) -> GraphResult<CircuitGraph<Operation>> {
        self.into_builder().build()
    }
}

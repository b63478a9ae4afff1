//! Circuit Graph
//!
//! This crate builds the dependency DAG of a quantum circuit and answers the
//! structural queries that compilation, simulation and differentiation need.
//!
//! # Overview
//!
//! A circuit is a queue of operations followed by observables, each acting on
//! a list of wires. [`CircuitGraph`] turns the queue into a DAG: node `i`
//! depends on node `j` when `j` was the last node to touch one of the wires
//! `i` acts on. Operations on disjoint wires stay unordered.
//!
//! # Core Components
//!
//! - **Wires**: [`Wire`], [`Wires`] and [`WireIndex`] for wire labels
//! - **Operators**: the [`Operator`] capability trait and the concrete
//!   [`Operation`] type
//! - **Parameters**: [`ParameterExpression`]; symbolic parameters are trainable
//! - **Graph**: [`CircuitGraph`] with ancestor, descendant, path and per-wire
//!   queries, plus in-place node replacement
//! - **Layers**: [`Layer`] and [`LayerData`] group mutually independent
//!   parametrized operations for batched gradient evaluation
//! - **Construction**: [`CircuitGraphBuilder`] and [`CircuitDescription`]
//!
//! # Example
//!
//! ```rust
//! use circuit_graph::{CircuitGraph, Operation, Wires};
//!
//! let ops = vec![
//!     Operation::rx("theta", 0),
//!     Operation::ry("phi", 1),
//!     Operation::cnot(0, 1),
//!     Operation::rz("lambda", 1),
//! ];
//! let obs = vec![Operation::expval("PauliZ", [1])];
//!
//! let graph = CircuitGraph::new(ops, obs, &Wires::from([0, 1])).unwrap();
//! assert_eq!(graph.num_edges(), 4);
//! assert_eq!(graph.ancestors(&[3]).unwrap().len(), 3);
//!
//! let layers = graph.parametrized_layers();
//! assert_eq!(layers.len(), 2);
//! assert_eq!(layers[0].param_inds, vec![0, 1]);
//! assert_eq!(layers[1].param_inds, vec![2]);
//! ```

pub mod builder;
pub mod dag;
pub mod error;
pub mod layers;
pub mod node;
pub mod operator;
pub mod parameter;
pub mod wire;

pub use builder::{CircuitDescription, CircuitGraphBuilder};
pub use dag::{CircuitGraph, NodeIndex};
pub use error::{GraphError, GraphResult};
pub use layers::{Layer, LayerData, LayerIter};
pub use node::{DependencyEdge, NodeKind, ParInfo, QueueNode};
pub use operator::{Generator, Operation, Operator, ReturnType};
pub use parameter::ParameterExpression;
pub use wire::{Wire, WireIndex, Wires};

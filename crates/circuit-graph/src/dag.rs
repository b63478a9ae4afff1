//! Wire-dependency DAG over an operation/observable queue.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::{FxHashSet, FxHasher};
use serde::Serialize;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use tracing::{debug, instrument};

use crate::error::{GraphError, GraphResult};
use crate::node::{DependencyEdge, NodeKind, ParInfo, QueueNode};
use crate::operator::{Operator, ReturnType};
use crate::wire::{Wire, WireIndex, Wires};

/// Node index type for the circuit graph.
///
/// Nodes are added in queue order and never removed, so a node's index is
/// always equal to its queue index.
pub type NodeIndex = PetNodeIndex<u32>;

/// Dependency graph of a circuit.
///
/// Nodes are the operations followed by the observables, in queue order.
/// An edge `j -> i` exists iff node `j` is the last node before `i` that
/// touched one of the wires `i` acts on. Edges always point forward in the
/// queue, so the graph is acyclic by construction.
///
/// The edge set is computed once. [`update_node`](Self::update_node) swaps a
/// node payload in place and leaves edges untouched.
#[derive(Debug, Clone)]
pub struct CircuitGraph<O> {
    /// The underlying graph.
    graph: DiGraph<QueueNode<O>, DependencyEdge, u32>,
    /// Number of operation nodes; observables follow them.
    num_operations: usize,
    /// Wire label to position mapping.
    wire_index: WireIndex,
    /// Per wire position, the queue indices touching it in queue order.
    wire_grid: Vec<Vec<usize>>,
    /// Flattened parameter table.
    par_info: Vec<ParInfo>,
    /// Flattened indices of the trainable parameters.
    trainable_params: BTreeSet<usize>,
    /// Whether the trainable set was set explicitly rather than derived from
    /// the operators.
    trainable_override: bool,
}

impl<O: Operator> CircuitGraph<O> {
    /// Build the graph of a circuit over a declared wire set.
    ///
    /// Every wire referenced by the queue must be declared.
    pub fn new(
        operations: impl IntoIterator<Item = O>,
        observables: impl IntoIterator<Item = O>,
        wires: &Wires,
    ) -> GraphResult<Self> {
        let wire_index = WireIndex::new(wires)?;
        Self::build(
            operations.into_iter().collect(),
            observables.into_iter().collect(),
            Some(wire_index),
        )
    }

    /// Build the graph, indexing wires in first-seen order if no wire set is
    /// declared.
    #[instrument(skip_all, fields(operations = operations.len(), observables = observables.len()))]
    pub(crate) fn build(
        operations: Vec<O>,
        observables: Vec<O>,
        wire_index: Option<WireIndex>,
    ) -> GraphResult<Self> {
        let wire_index = wire_index.unwrap_or_else(|| {
            WireIndex::from_queue(operations.iter().chain(&observables).map(Operator::wires))
        });

        let num_operations = operations.len();
        let total = num_operations + observables.len();
        let mut graph: DiGraph<QueueNode<O>, DependencyEdge, u32> =
            DiGraph::with_capacity(total, total);
        let mut wire_grid = vec![Vec::new(); wire_index.len()];
        // Last node that touched each wire position.
        let mut wire_front: Vec<Option<NodeIndex>> = vec![None; wire_index.len()];
        let mut par_info = Vec::new();

        let queue = operations
            .into_iter()
            .map(|op| (op, NodeKind::Operation))
            .chain(observables.into_iter().map(|op| (op, NodeKind::Observable)));

        for (queue_idx, (op, kind)) in queue.enumerate() {
            let wires = op.wires().clone();

            if let Some(wire) = wires.first_duplicate() {
                return Err(GraphError::DuplicateWire {
                    wire: wire.clone(),
                    operation: Some(op.name().to_string()),
                });
            }

            let positions = wires
                .iter()
                .map(|wire| {
                    wire_index
                        .position(wire)
                        .ok_or_else(|| GraphError::WireNotFound {
                            wire: wire.clone(),
                            operation: Some(op.name().to_string()),
                        })
                })
                .collect::<GraphResult<Vec<_>>>()?;

            par_info.extend((0..op.num_params()).map(|param| ParInfo {
                node: queue_idx,
                param,
            }));

            let node = graph.add_node(QueueNode { op, queue_idx, kind });

            for (pos, wire) in positions.into_iter().zip(wires) {
                if let Some(prev) = wire_front[pos] {
                    // One edge per node pair; further shared wires are recorded on it.
                    match graph.find_edge(prev, node) {
                        Some(edge) => graph[edge].wires.push(wire),
                        None => {
                            graph.add_edge(prev, node, DependencyEdge { wires: vec![wire] });
                        }
                    }
                }
                wire_front[pos] = Some(node);
                wire_grid[pos].push(queue_idx);
            }
        }

        let trainable_params = par_info
            .iter()
            .enumerate()
            .filter(|(_, info)| {
                graph[NodeIndex::new(info.node)]
                    .op
                    .is_trainable_param(info.param)
            })
            .map(|(idx, _)| idx)
            .collect::<BTreeSet<_>>();

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            wires = wire_index.len(),
            params = par_info.len(),
            trainable = trainable_params.len(),
            "Built circuit graph"
        );

        Ok(Self {
            graph,
            num_operations,
            wire_index,
            wire_grid,
            par_info,
            trainable_params,
            trainable_override: false,
        })
    }

    // =========================================================================
    // Nodes and edges
    // =========================================================================

    fn node_index(&self, idx: usize) -> GraphResult<NodeIndex> {
        if idx < self.graph.node_count() {
            Ok(NodeIndex::new(idx))
        } else {
            Err(GraphError::NodeNotFound(idx))
        }
    }

    /// The node at a queue index.
    #[inline]
    pub fn node(&self, idx: usize) -> Option<&QueueNode<O>> {
        self.graph.node_weight(self.node_index(idx).ok()?)
    }

    /// The operator payload at a queue index.
    #[inline]
    pub fn get(&self, idx: usize) -> Option<&O> {
        self.node(idx).map(QueueNode::op)
    }

    /// Operations in queue order.
    pub fn operations(&self) -> impl Iterator<Item = &O> + '_ {
        self.graph
            .node_weights()
            .take(self.num_operations)
            .map(QueueNode::op)
    }

    /// Observables in queue order.
    pub fn observables(&self) -> impl Iterator<Item = &O> + '_ {
        self.graph
            .node_weights()
            .skip(self.num_operations)
            .map(QueueNode::op)
    }

    /// Number of operation nodes.
    #[inline]
    pub fn num_operations(&self) -> usize {
        self.num_operations
    }

    /// Number of observable nodes.
    #[inline]
    pub fn num_observables(&self) -> usize {
        self.graph.node_count() - self.num_operations
    }

    /// Total number of nodes.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of dependency edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.graph.edge_count()
    }

    /// Dependency edges as `(from, to)` queue index pairs.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index()))
    }

    /// Wires inducing the edge `from -> to`, if the edge exists.
    pub fn edge_wires(&self, from: usize, to: usize) -> Option<&[Wire]> {
        let from = self.node_index(from).ok()?;
        let to = self.node_index(to).ok()?;
        self.graph
            .find_edge(from, to)
            .map(|e| self.graph[e].wires.as_slice())
    }

    /// Get a reference to the underlying graph.
    pub fn graph(&self) -> &DiGraph<QueueNode<O>, DependencyEdge, u32> {
        &self.graph
    }

    // =========================================================================
    // Wires
    // =========================================================================

    /// The wires of the circuit, in index order.
    pub fn wires(&self) -> Wires {
        self.wire_index.to_wires()
    }

    /// Number of wires.
    #[inline]
    pub fn num_wires(&self) -> usize {
        self.wire_index.len()
    }

    /// The wire index.
    #[inline]
    pub fn wire_index(&self) -> &WireIndex {
        &self.wire_index
    }

    /// Queue indices of the nodes acting on `wire`, strictly increasing.
    pub fn wire_indices(&self, wire: &Wire) -> GraphResult<&[usize]> {
        let pos = self
            .wire_index
            .position(wire)
            .ok_or_else(|| GraphError::WireNotFound {
                wire: wire.clone(),
                operation: None,
            })?;
        Ok(&self.wire_grid[pos])
    }

    // =========================================================================
    // Ancestry
    // =========================================================================

    pub(crate) fn reachable_from(
        &self,
        starts: &[NodeIndex],
        direction: Direction,
    ) -> BTreeSet<usize> {
        let mut seen = FxHashSet::default();
        let mut stack = starts.to_vec();
        while let Some(node) = stack.pop() {
            for next in self.graph.neighbors_directed(node, direction) {
                if seen.insert(next) {
                    stack.push(next);
                }
            }
        }
        seen.into_iter()
            .filter(|n| !starts.contains(n))
            .map(|n| n.index())
            .collect()
    }

    fn reachable(&self, nodes: &[usize], direction: Direction) -> GraphResult<BTreeSet<usize>> {
        let starts = nodes
            .iter()
            .map(|&idx| self.node_index(idx))
            .collect::<GraphResult<Vec<_>>>()?;
        Ok(self.reachable_from(&starts, direction))
    }

    /// Nodes with a directed path to any of `nodes`, excluding `nodes`.
    pub fn ancestors(&self, nodes: &[usize]) -> GraphResult<BTreeSet<usize>> {
        self.reachable(nodes, Direction::Incoming)
    }

    /// Nodes reachable from any of `nodes`, excluding `nodes`.
    pub fn descendants(&self, nodes: &[usize]) -> GraphResult<BTreeSet<usize>> {
        self.reachable(nodes, Direction::Outgoing)
    }

    /// [`ancestors`](Self::ancestors) in queue order.
    pub fn ancestors_in_order(&self, nodes: &[usize]) -> GraphResult<Vec<usize>> {
        Ok(self.ancestors(nodes)?.into_iter().collect())
    }

    /// [`descendants`](Self::descendants) in queue order.
    pub fn descendants_in_order(&self, nodes: &[usize]) -> GraphResult<Vec<usize>> {
        Ok(self.descendants(nodes)?.into_iter().collect())
    }

    /// Check if a directed path leads from `from` to `to`.
    ///
    /// A node always has a path to itself.
    pub fn has_path(&self, from: usize, to: usize) -> GraphResult<bool> {
        let from = self.node_index(from)?;
        let to = self.node_index(to)?;
        Ok(petgraph::algo::has_path_connecting(
            &self.graph,
            from,
            to,
            None,
        ))
    }

    /// Nodes on any directed path from `from` to `to`, both ends included.
    ///
    /// Empty if `to` is not reachable from `from`.
    pub fn nodes_between(&self, from: usize, to: usize) -> GraphResult<BTreeSet<usize>> {
        if !self.has_path(from, to)? {
            return Ok(BTreeSet::new());
        }
        let mut after = self.descendants(&[from])?;
        after.insert(from);
        let mut before = self.ancestors(&[to])?;
        before.insert(to);
        Ok(after.intersection(&before).copied().collect())
    }

    /// Operations that no observable depends on.
    pub fn invisible_operations(&self) -> BTreeSet<usize> {
        let observables = (self.num_operations..self.graph.node_count())
            .map(NodeIndex::new)
            .collect::<Vec<_>>();
        let visible = self.reachable_from(&observables, Direction::Incoming);
        (0..self.num_operations)
            .filter(|idx| !visible.contains(idx))
            .collect()
    }

    fn topological(&self, kind: NodeKind) -> GraphResult<Vec<usize>> {
        let order = petgraph::algo::toposort(&self.graph, None).map_err(|cycle| {
            GraphError::InvalidGraph(format!(
                "cycle through node {}",
                cycle.node_id().index()
            ))
        })?;
        Ok(order
            .into_iter()
            .filter(|&n| self.graph[n].kind == kind)
            .map(NodeIndex::index)
            .collect())
    }

    /// Operations in a topological order.
    pub fn operations_in_order(&self) -> GraphResult<Vec<usize>> {
        self.topological(NodeKind::Operation)
    }

    /// Observables in a topological order.
    pub fn observables_in_order(&self) -> GraphResult<Vec<usize>> {
        self.topological(NodeKind::Observable)
    }

    /// Number of operations on the longest dependency path.
    ///
    /// Observables do not count towards the depth.
    pub fn depth(&self) -> usize {
        // Queue order is a topological order, and operations only depend on
        // operations.
        let mut depths = vec![0usize; self.num_operations];
        for idx in 0..self.num_operations {
            let pred_depth = self
                .graph
                .neighbors_directed(NodeIndex::new(idx), Direction::Incoming)
                .map(|n| depths[n.index()])
                .max()
                .unwrap_or(0);
            depths[idx] = pred_depth + 1;
        }
        depths.into_iter().max().unwrap_or(0)
    }

    // =========================================================================
    // Observables
    // =========================================================================

    /// Check if any observable is sampled.
    pub fn is_sampled(&self) -> bool {
        self.observables()
            .any(|o| o.return_type() == Some(ReturnType::Sample))
    }

    /// Check if every observable is sampled. False for a circuit without
    /// observables.
    pub fn all_sampled(&self) -> bool {
        self.num_observables() > 0
            && self
                .observables()
                .all(|o| o.return_type() == Some(ReturnType::Sample))
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    /// The flattened parameter table.
    #[inline]
    pub fn par_info(&self) -> &[ParInfo] {
        &self.par_info
    }

    /// Total number of flattened parameters.
    #[inline]
    pub fn num_params(&self) -> usize {
        self.par_info.len()
    }

    /// Flattened indices of the trainable parameters.
    #[inline]
    pub fn trainable_params(&self) -> &BTreeSet<usize> {
        &self.trainable_params
    }

    /// Replace the trainable parameter set.
    pub fn set_trainable_params(
        &mut self,
        params: impl IntoIterator<Item = usize>,
    ) -> GraphResult<()> {
        let params = params.into_iter().collect::<BTreeSet<_>>();
        if let Some(&index) = params.iter().find(|&&i| i >= self.par_info.len()) {
            return Err(GraphError::ParameterIndexOutOfRange {
                index,
                num_params: self.par_info.len(),
            });
        }
        self.trainable_params = params;
        self.trainable_override = true;
        Ok(())
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Replace the payload of node `idx`, returning the previous payload.
    ///
    /// Edges and the queue index are kept as they are, so `new` must act on
    /// the same wires and carry the same number of parameters as the node it
    /// replaces.
    ///
    /// Unless the trainable set was set explicitly, the node's parameters are
    /// re-marked from `new`.
    pub fn update_node(&mut self, idx: usize, new: O) -> GraphResult<O> {
        let node = self.node_index(idx)?;
        let current = &self.graph[node].op;

        if current.wires() != new.wires() {
            return Err(GraphError::WireMismatch {
                node: idx,
                expected: current.wires().clone(),
                got: new.wires().clone(),
            });
        }
        if current.num_params() != new.num_params() {
            return Err(GraphError::ParameterCountMismatch {
                node: idx,
                expected: current.num_params(),
                got: new.num_params(),
            });
        }

        debug!(node = idx, old = current.name(), new = new.name(), "Replacing node");

        if !self.trainable_override {
            for (flat, info) in self.par_info.iter().enumerate() {
                if info.node != idx {
                    continue;
                }
                if new.is_trainable_param(info.param) {
                    self.trainable_params.insert(flat);
                } else {
                    self.trainable_params.remove(&flat);
                }
            }
        }

        Ok(std::mem::replace(&mut self.graph[node].op, new))
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    /// JSON snapshot of the circuit: every node's name, parameters, wires and
    /// return type, in queue order.
    pub fn serialize(&self) -> GraphResult<String> {
        let snapshot = GraphSnapshot {
            operations: self.operations().map(NodeSnapshot::of).collect(),
            observables: self.observables().map(NodeSnapshot::of).collect(),
        };
        Ok(serde_json::to_string(&snapshot)?)
    }

    /// Hash of [`serialize`](Self::serialize). Equal circuits hash equally.
    pub fn hash(&self) -> GraphResult<u64> {
        let mut hasher = FxHasher::default();
        self.serialize()?.hash(&mut hasher);
        Ok(hasher.finish())
    }
}

#[derive(Serialize)]
struct GraphSnapshot<'a> {
    operations: Vec<NodeSnapshot<'a>>,
    observables: Vec<NodeSnapshot<'a>>,
}

#[derive(Serialize)]
struct NodeSnapshot<'a> {
    name: &'a str,
    params: Vec<String>,
    wires: &'a Wires,
    #[serde(skip_serializing_if = "Option::is_none")]
    return_type: Option<ReturnType>,
}

impl<'a> NodeSnapshot<'a> {
    fn of<O: Operator>(op: &'a O) -> Self {
        Self {
            name: op.name(),
            params: op.parameters().iter().map(ToString::to_string).collect(),
            wires: op.wires(),
            return_type: op.return_type(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::Operation;
    use crate::parameter::ParameterExpression;

    fn chained_ops() -> Vec<Operation> {
        vec![
            Operation::rx(0.43, 0),
            Operation::ry(0.35, 1),
            Operation::rz(0.35, 2),
            Operation::cnot(0, 1),
            Operation::hadamard(2),
            Operation::cnot(2, 0),
            Operation::pauli_x(1),
        ]
    }

    fn chained_obs() -> Vec<Operation> {
        vec![
            Operation::expval("PauliX", [0]),
            Operation::expval("Hermitian", [1, 2]),
        ]
    }

    fn chained() -> CircuitGraph<Operation> {
        CircuitGraph::new(chained_ops(), chained_obs(), &Wires::from([0, 1, 2])).unwrap()
    }

    #[test]
    fn test_empty_graph() {
        let graph: CircuitGraph<Operation> = CircuitGraph::new([], [], &Wires::default()).unwrap();
        assert_eq!(graph.num_nodes(), 0);
        assert_eq!(graph.num_edges(), 0);
        assert_eq!(graph.depth(), 0);
        assert!(graph.invisible_operations().is_empty());
        assert!(!graph.all_sampled());
    }

    #[test]
    fn test_no_dependence() {
        let ops = [Operation::rx(0.43, 0), Operation::ry(0.35, 1)];
        let graph = CircuitGraph::new(ops, [], &Wires::from([0, 1])).unwrap();
        assert_eq!(graph.num_nodes(), 2);
        assert_eq!(graph.num_edges(), 0);
        assert_eq!(graph.depth(), 1);
    }

    #[test]
    fn test_dependence() {
        let graph = chained();
        assert_eq!(graph.num_nodes(), 9);
        assert_eq!(graph.num_edges(), 9);

        let edges: BTreeSet<_> = graph.edges().collect();
        let expected: BTreeSet<_> = [
            (0, 3),
            (1, 3),
            (2, 4),
            (3, 5),
            (3, 6),
            (4, 5),
            (5, 7),
            (5, 8),
            (6, 8),
        ]
        .into_iter()
        .collect();
        assert_eq!(edges, expected);

        for idx in 0..graph.num_nodes() {
            assert_eq!(graph.node(idx).unwrap().queue_idx(), idx);
        }
    }

    #[test]
    fn test_shared_wires_single_edge() {
        let ops = [Operation::cnot(0, 1), Operation::cnot(1, 0)];
        let graph = CircuitGraph::new(ops, [], &Wires::from([0, 1])).unwrap();
        assert_eq!(graph.num_edges(), 1);
        assert_eq!(
            graph.edge_wires(0, 1),
            Some([Wire::from(1), Wire::from(0)].as_slice())
        );
        assert_eq!(graph.edge_wires(1, 0), None);
    }

    #[test]
    fn test_ancestors_and_descendants() {
        let graph = chained();
        assert_eq!(graph.ancestors(&[6]).unwrap(), BTreeSet::from([0, 1, 3]));
        assert_eq!(graph.descendants(&[6]).unwrap(), BTreeSet::from([8]));
        assert_eq!(graph.ancestors_in_order(&[5, 6]).unwrap(), vec![0, 1, 2, 3, 4]);
        assert_eq!(graph.descendants_in_order(&[3]).unwrap(), vec![5, 6, 7, 8]);
        // Query nodes are excluded even when reachable from each other.
        assert_eq!(graph.ancestors(&[3, 5]).unwrap(), BTreeSet::from([0, 1, 2, 4]));
    }

    #[test]
    fn test_unknown_node() {
        let graph = chained();
        assert!(matches!(graph.ancestors(&[9]), Err(GraphError::NodeNotFound(9))));
        assert!(matches!(graph.has_path(0, 42), Err(GraphError::NodeNotFound(42))));
    }

    #[test]
    fn test_wire_indices() {
        let graph = chained();
        assert_eq!(graph.wire_indices(&Wire::from(0)).unwrap(), &[0, 3, 5, 7]);
        assert_eq!(graph.wire_indices(&Wire::from(1)).unwrap(), &[1, 3, 6, 8]);
        assert_eq!(graph.wire_indices(&Wire::from(2)).unwrap(), &[2, 4, 5, 8]);
        assert!(matches!(
            graph.wire_indices(&Wire::from("x")),
            Err(GraphError::WireNotFound { .. })
        ));
    }

    #[test]
    fn test_undeclared_wire() {
        let ops = [Operation::rx(0.1, 0), Operation::cnot(0, 5)];
        match CircuitGraph::new(ops, [], &Wires::from([0, 1])) {
            Err(GraphError::WireNotFound { wire, operation }) => {
                assert_eq!(wire, Wire::from(5));
                assert_eq!(operation.as_deref(), Some("CNOT"));
            }
            _ => panic!("Expected WireNotFound error"),
        }
    }

    #[test]
    fn test_duplicate_wire_in_operation() {
        let ops = [Operation::cnot(1, 1)];
        assert!(matches!(
            CircuitGraph::new(ops, [], &Wires::from([0, 1])),
            Err(GraphError::DuplicateWire { .. })
        ));
    }

    #[test]
    fn test_update_node() {
        let mut graph = chained();
        let edges_before: Vec<_> = graph.edges().collect();

        let new = Operation::rx(0.1, 0);
        let old = graph.update_node(0, new.clone()).unwrap();

        assert_eq!(old, Operation::rx(0.43, 0));
        assert_eq!(graph.operations().next(), Some(&new));
        assert_eq!(graph.node(0).unwrap().queue_idx(), 0);
        assert_eq!(graph.edges().collect::<Vec<_>>(), edges_before);
        assert_eq!(graph.wire_indices(&Wire::from(0)).unwrap(), &[0, 3, 5, 7]);
    }

    #[test]
    fn test_update_node_preconditions() {
        let mut graph = chained();
        assert!(matches!(
            graph.update_node(20, Operation::hadamard(0)),
            Err(GraphError::NodeNotFound(20))
        ));
        assert!(matches!(
            graph.update_node(0, Operation::rx(0.1, 1)),
            Err(GraphError::WireMismatch { node: 0, .. })
        ));
        assert!(matches!(
            graph.update_node(0, Operation::new("RX", [0])),
            Err(GraphError::ParameterCountMismatch {
                node: 0,
                expected: 1,
                got: 0
            })
        ));
        assert_eq!(graph.get(0), Some(&Operation::rx(0.43, 0)));
    }

    #[test]
    fn test_operations_and_observables() {
        let graph = chained();
        assert_eq!(graph.operations().cloned().collect::<Vec<_>>(), chained_ops());
        assert_eq!(graph.observables().cloned().collect::<Vec<_>>(), chained_obs());
        assert_eq!(graph.num_operations(), 7);
        assert_eq!(graph.num_observables(), 2);
    }

    #[test]
    fn test_topological_order() {
        let graph = chained();
        let order = graph.operations_in_order().unwrap();
        assert_eq!(order.len(), 7);
        let position = |n: usize| order.iter().position(|&x| x == n).unwrap();
        for (from, to) in graph.edges().filter(|&(_, to)| to < 7) {
            assert!(position(from) < position(to));
        }
        let mut obs = graph.observables_in_order().unwrap();
        obs.sort_unstable();
        assert_eq!(obs, vec![7, 8]);
    }

    #[test]
    fn test_paths() {
        let graph = chained();
        assert!(graph.has_path(0, 8).unwrap());
        assert!(!graph.has_path(6, 7).unwrap());
        assert_eq!(graph.nodes_between(1, 8).unwrap(), BTreeSet::from([1, 3, 5, 6, 8]));
        assert!(graph.nodes_between(6, 7).unwrap().is_empty());
    }

    #[test]
    fn test_depth() {
        assert_eq!(chained().depth(), 3);
    }

    #[test]
    fn test_invisible_operations() {
        let ops = [
            Operation::hadamard(0),
            Operation::pauli_x(1),
            Operation::cnot(0, 2),
        ];
        let obs = [Operation::expval("PauliZ", [0])];
        let graph = CircuitGraph::new(ops, obs, &Wires::from([0, 1, 2])).unwrap();
        assert_eq!(graph.invisible_operations(), BTreeSet::from([1]));
    }

    #[test]
    fn test_sampling() {
        let ops = [Operation::hadamard(0)];
        let graph = CircuitGraph::new(
            ops.clone(),
            [Operation::sample("PauliZ", [0]), Operation::expval("PauliZ", [1])],
            &Wires::from([0, 1]),
        )
        .unwrap();
        assert!(graph.is_sampled());
        assert!(!graph.all_sampled());

        let graph = CircuitGraph::new(
            ops,
            [Operation::sample("PauliZ", [0])],
            &Wires::from([0, 1]),
        )
        .unwrap();
        assert!(graph.all_sampled());
    }

    #[test]
    fn test_default_trainable_params() {
        let ops = [
            Operation::rx("a", 0),
            Operation::rx(0.5, 1),
            Operation::new("Beamsplitter", [0, 1])
                .with_params([ParameterExpression::symbol("b"), ParameterExpression::from(1)]),
        ];
        let mut graph = CircuitGraph::new(ops, [], &Wires::from([0, 1])).unwrap();
        assert_eq!(graph.num_params(), 4);
        assert_eq!(graph.par_info()[3], ParInfo { node: 2, param: 1 });
        assert_eq!(graph.trainable_params(), &BTreeSet::from([0, 2]));

        graph.set_trainable_params([1, 3]).unwrap();
        assert_eq!(graph.trainable_params(), &BTreeSet::from([1, 3]));
        assert!(matches!(
            graph.set_trainable_params([4]),
            Err(GraphError::ParameterIndexOutOfRange {
                index: 4,
                num_params: 4
            })
        ));
    }

    #[test]
    fn test_serialize_and_hash() {
        let graph = chained();
        let json = graph.serialize().unwrap();
        assert!(json.starts_with(r#"{"operations":[{"name":"RX","params":["0.43"],"wires":[0]}"#));
        assert!(json.contains(r#""return_type":"expectation""#));

        assert_eq!(graph.hash().unwrap(), chained().hash().unwrap());

        let mut changed = chained();
        changed.update_node(0, Operation::rx(0.1, 0)).unwrap();
        assert_ne!(graph.serialize().unwrap(), changed.serialize().unwrap());
    }

    #[test]
    fn test_queries_are_idempotent() {
        let graph = chained();
        assert_eq!(graph.ancestors(&[5]).unwrap(), graph.ancestors(&[5]).unwrap());
        assert_eq!(graph.descendants(&[0]).unwrap(), graph.descendants(&[0]).unwrap());
        assert_eq!(graph.serialize().unwrap(), graph.serialize().unwrap());
    }
}

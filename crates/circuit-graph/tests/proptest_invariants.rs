//! Property-based tests for circuit graph construction and layering.
//!
//! Random circuits over a handful of wires are checked against the structural
//! guarantees of the dependency graph.

use std::collections::BTreeSet;

use circuit_graph::{CircuitGraph, Operation, ParameterExpression, Wire, Wires};
use proptest::prelude::*;

/// Operators used to populate random circuits.
#[derive(Debug, Clone)]
enum OpSpec {
    Fixed(u32),
    Rotation(u32, bool),
    Entangler(u32, u32),
}

impl OpSpec {
    fn into_operation(self, idx: usize) -> Operation {
        match self {
            OpSpec::Fixed(w) => Operation::hadamard(w),
            OpSpec::Rotation(w, true) => Operation::ry(format!("t{idx}").as_str(), w),
            OpSpec::Rotation(w, false) => Operation::ry(0.25, w),
            OpSpec::Entangler(a, b) => Operation::cnot(a, b),
        }
    }
}

fn arb_op(num_wires: u32) -> impl Strategy<Value = OpSpec> {
    if num_wires < 2 {
        prop_oneof![
            (0..num_wires).prop_map(OpSpec::Fixed),
            (0..num_wires, any::<bool>()).prop_map(|(w, t)| OpSpec::Rotation(w, t)),
        ]
        .boxed()
    } else {
        prop_oneof![
            (0..num_wires).prop_map(OpSpec::Fixed),
            (0..num_wires, any::<bool>()).prop_map(|(w, t)| OpSpec::Rotation(w, t)),
            (0..num_wires, 1..num_wires)
                .prop_map(move |(a, offset)| OpSpec::Entangler(a, (a + offset) % num_wires)),
        ]
        .boxed()
    }
}

/// A random circuit: operations plus one observable on a subset of wires.
fn arb_circuit() -> impl Strategy<Value = (u32, Vec<Operation>, Vec<Operation>)> {
    (1_u32..=5).prop_flat_map(|num_wires| {
        (
            Just(num_wires),
            prop::collection::vec(arb_op(num_wires), 0..=20),
            prop::collection::vec(0..num_wires, 0..=3),
        )
            .prop_map(|(nw, specs, obs_wires)| {
                let ops = specs
                    .into_iter()
                    .enumerate()
                    .map(|(i, s)| s.into_operation(i))
                    .collect();
                let obs = obs_wires
                    .into_iter()
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .map(|w| Operation::expval("PauliZ", [w]))
                    .collect();
                (nw, ops, obs)
            })
    })
}

fn build(num_wires: u32, ops: &[Operation], obs: &[Operation]) -> CircuitGraph<Operation> {
    CircuitGraph::new(ops.to_vec(), obs.to_vec(), &Wires::new(0..num_wires))
        .expect("random circuit only uses declared wires")
}

proptest! {
    #[test]
    fn node_count_matches_queue((nw, ops, obs) in arb_circuit()) {
        let graph = build(nw, &ops, &obs);
        prop_assert_eq!(graph.num_nodes(), ops.len() + obs.len());
        prop_assert_eq!(graph.num_operations(), ops.len());
        prop_assert_eq!(graph.num_observables(), obs.len());
    }

    #[test]
    fn edges_point_forward_and_are_minimal((nw, ops, obs) in arb_circuit()) {
        let graph = build(nw, &ops, &obs);
        let queue: Vec<_> = ops.iter().chain(&obs).collect();

        // Recompute "last toucher" edges directly from the queue.
        let mut expected = BTreeSet::new();
        for (i, op) in queue.iter().enumerate() {
            for wire in &op.wires {
                if let Some(j) = (0..i).rev().find(|&j| queue[j].wires.contains(wire)) {
                    expected.insert((j, i));
                }
            }
        }

        let edges: Vec<_> = graph.edges().collect();
        for &(from, to) in &edges {
            prop_assert!(from < to);
        }
        prop_assert_eq!(edges.len(), expected.len());
        prop_assert_eq!(edges.into_iter().collect::<BTreeSet<_>>(), expected);
    }

    #[test]
    fn wire_indices_are_sorted_and_complete((nw, ops, obs) in arb_circuit()) {
        let graph = build(nw, &ops, &obs);
        let queue: Vec<_> = ops.iter().chain(&obs).collect();

        for w in 0..nw {
            let wire = Wire::from(w);
            let indices = graph.wire_indices(&wire).unwrap();
            prop_assert!(indices.windows(2).all(|p| p[0] < p[1]));
            let expected: Vec<usize> = (0..queue.len())
                .filter(|&i| queue[i].wires.contains(&wire))
                .collect();
            prop_assert_eq!(indices, expected.as_slice());
        }
    }

    #[test]
    fn ancestors_agree_with_paths((nw, ops, obs) in arb_circuit()) {
        let graph = build(nw, &ops, &obs);
        for target in 0..graph.num_nodes() {
            let ancestors = graph.ancestors(&[target]).unwrap();
            for source in 0..graph.num_nodes() {
                let expected = source != target && graph.has_path(source, target).unwrap();
                prop_assert_eq!(ancestors.contains(&source), expected);
            }
            for &a in &ancestors {
                prop_assert!(graph.descendants(&[a]).unwrap().contains(&target));
            }
        }
    }

    #[test]
    fn layers_are_independent_and_cover_trainable_params((nw, ops, obs) in arb_circuit()) {
        let graph = build(nw, &ops, &obs);
        let layers = graph.parametrized_layers();

        let mut covered = Vec::new();
        for layer in &layers {
            prop_assert!(!layer.ops.is_empty());
            prop_assert!(layer.ops.windows(2).all(|p| p[0] < p[1]));
            for &op in &layer.ops {
                let ancestors = graph.ancestors(&[op]).unwrap();
                prop_assert!(layer.ops.iter().all(|other| !ancestors.contains(other)));
            }
            covered.extend(layer.param_inds.iter().copied());
        }

        // Operations carry every trainable parameter here; layers take them in order.
        let trainable: Vec<usize> = graph.trainable_params().iter().copied().collect();
        prop_assert_eq!(covered, trainable);
    }

    #[test]
    fn queries_are_idempotent((nw, ops, obs) in arb_circuit()) {
        let graph = build(nw, &ops, &obs);
        prop_assert_eq!(graph.parametrized_layers(), graph.parametrized_layers());
        prop_assert_eq!(
            graph.iterate_parametrized_layers().collect::<Vec<_>>(),
            graph.iterate_parametrized_layers().collect::<Vec<_>>()
        );
        prop_assert_eq!(graph.serialize().unwrap(), graph.serialize().unwrap());
        prop_assert_eq!(graph.depth(), graph.depth());
    }

    #[test]
    fn trainable_params_follow_symbols((nw, ops, obs) in arb_circuit()) {
        let graph = build(nw, &ops, &obs);
        for (idx, info) in graph.par_info().iter().enumerate() {
            let param: &ParameterExpression = &graph.get(info.node).unwrap().params[info.param];
            prop_assert_eq!(graph.trainable_params().contains(&idx), param.is_symbolic());
        }
    }
}

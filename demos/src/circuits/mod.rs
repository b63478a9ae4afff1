//! Reference circuit descriptions for demos.

use circuit_graph::{CircuitDescription, Operation, ParameterExpression, Wire, Wires};

/// Names accepted by [`by_name`].
pub const NAMES: &[&str] = &["chained", "cv-variational", "two-local"];

/// Look up a built-in circuit by name.
pub fn by_name(name: &str, num_wires: u32, reps: u32) -> Option<CircuitDescription> {
    match name {
        "chained" => Some(chained_dependency()),
        "cv-variational" => Some(cv_variational()),
        "two-local" => Some(two_local_ansatz(num_wires, reps)),
        _ => None,
    }
}

/// Gates whose dependencies chain across three wires.
///
/// The graph has 9 nodes and 9 edges.
pub fn chained_dependency() -> CircuitDescription {
    CircuitDescription {
        wires: Some(Wires::from([0, 1, 2])),
        operations: vec![
            Operation::rx(0.43, 0),
            Operation::ry(0.35, 1),
            Operation::rz(0.35, 2),
            Operation::cnot(0, 1),
            Operation::hadamard(2),
            Operation::cnot(2, 0),
            Operation::pauli_x(1),
        ],
        observables: vec![
            Operation::expval("PauliX", [0]),
            Operation::expval("Hermitian", [1, 2]),
        ],
        trainable_params: None,
    }
}

fn rotation(phi: ParameterExpression, wire: Wire) -> Operation {
    Operation::new("Rotation", Wires::new([wire])).with_params([phi])
}

/// Continuous-variable circuit on wires `a`, `q1`, `3`.
///
/// Six symbolic parameters form three layers. The beamsplitter's second
/// parameter and the middle rotation are bound, so they are skipped.
pub fn cv_variational() -> CircuitDescription {
    let wires = Wires::new([Wire::from("a"), Wire::from("q1"), Wire::from(3)]);
    let sym = ParameterExpression::symbol;
    CircuitDescription {
        operations: vec![
            rotation(sym("a"), Wire::from("a")),
            rotation(sym("b"), Wire::from("q1")),
            rotation(sym("c"), Wire::from(3)),
            Operation::new("Beamsplitter", Wires::new([Wire::from("a"), Wire::from("q1")]))
                .with_params([sym("d"), ParameterExpression::from(1)]),
            rotation(ParameterExpression::from(1), Wire::from("a")),
            rotation(sym("e"), Wire::from("q1")),
            rotation(sym("f"), Wire::from(3)),
        ],
        observables: wires
            .iter()
            .map(|w| Operation::expval("NumberOperator", Wires::new([w.clone()])))
            .collect(),
        wires: Some(wires),
        trainable_params: None,
    }
}

/// RY rotation layers separated by CNOT ladders, one PauliZ per wire.
///
/// Total parameters = num_wires * (reps + 1)
pub fn two_local_ansatz(num_wires: u32, reps: u32) -> CircuitDescription {
    let mut operations = vec![];
    let mut param_idx = 0;

    for rep in 0..=reps {
        if rep > 0 {
            for w in 0..num_wires.saturating_sub(1) {
                operations.push(Operation::cnot(w, w + 1));
            }
        }
        for w in 0..num_wires {
            operations.push(Operation::ry(format!("theta_{param_idx}").as_str(), w));
            param_idx += 1;
        }
    }

    CircuitDescription {
        wires: Some(Wires::new(0..num_wires)),
        operations,
        observables: (0..num_wires)
            .map(|w| Operation::expval("PauliZ", [w]))
            .collect(),
        trainable_params: None,
    }
}

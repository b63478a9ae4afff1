//! Operator capabilities consumed by the circuit graph.
//!
//! The graph never inspects concrete operator types. Everything it needs is
//! expressed through the [`Operator`] trait: the wires an operator acts on,
//! its parameters, and optionally a generator and a measurement return type.
//! [`Operation`] is a plain data implementation used for circuit descriptions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::parameter::ParameterExpression;
use crate::wire::{Wire, Wires};

/// How an observable is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnType {
    /// Expectation value.
    Expectation,
    /// Variance.
    Variance,
    /// Raw samples.
    Sample,
    /// Computational basis probabilities.
    Probability,
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReturnType::Expectation => "expval",
            ReturnType::Variance => "var",
            ReturnType::Sample => "sample",
            ReturnType::Probability => "probs",
        };
        write!(f, "{s}")
    }
}

/// Generator of a one-parameter operator: `U(θ) = exp(i · coefficient · θ · G)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generator {
    /// Name of the generating observable.
    pub name: String,
    /// Wires the generator acts on.
    pub wires: Wires,
    /// Scalar prefactor.
    pub coefficient: f64,
}

impl Generator {
    /// Create a generator.
    pub fn new(name: impl Into<String>, wires: impl Into<Wires>, coefficient: f64) -> Self {
        Self {
            name: name.into(),
            wires: wires.into(),
            coefficient,
        }
    }
}

/// Capabilities the circuit graph requires from an operation or observable.
pub trait Operator {
    /// Name of the operator.
    fn name(&self) -> &str;

    /// Wires the operator acts on, in order.
    fn wires(&self) -> &Wires;

    /// Parameters of the operator, in their intrinsic order.
    fn parameters(&self) -> &[ParameterExpression] {
        &[]
    }

    /// Number of parameters.
    fn num_params(&self) -> usize {
        self.parameters().len()
    }

    /// Whether the parameter at `index` is trainable by default.
    ///
    /// Symbolic parameters are trainable, bound numbers are not.
    fn is_trainable_param(&self, index: usize) -> bool {
        self.parameters()
            .get(index)
            .is_some_and(ParameterExpression::is_symbolic)
    }

    /// Whether the operator carries at least one trainable parameter.
    fn is_parametrized(&self) -> bool {
        (0..self.num_params()).any(|i| self.is_trainable_param(i))
    }

    /// Generator and coefficient, for operators generated by an observable.
    fn generator(&self) -> Option<Generator> {
        None
    }

    /// Measurement return type. `Some` for observables only.
    fn return_type(&self) -> Option<ReturnType> {
        None
    }
}

/// A concrete operation or observable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Operator name.
    pub name: String,
    /// Wires acted on.
    pub wires: Wires,
    /// Parameters, in order.
    #[serde(default)]
    pub params: Vec<ParameterExpression>,
    /// Generator, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<Generator>,
    /// Return type, for observables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<ReturnType>,
}

impl Operation {
    /// Create an unparametrized operation.
    pub fn new(name: impl Into<String>, wires: impl Into<Wires>) -> Self {
        Self {
            name: name.into(),
            wires: wires.into(),
            params: vec![],
            generator: None,
            return_type: None,
        }
    }

    /// Set the parameters.
    #[must_use]
    pub fn with_params(mut self, params: impl IntoIterator<Item = ParameterExpression>) -> Self {
        self.params = params.into_iter().collect();
        self
    }

    /// Set the generator.
    #[must_use]
    pub fn with_generator(mut self, generator: Generator) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Create an observable measured with `return_type`.
    pub fn observable(
        name: impl Into<String>,
        wires: impl Into<Wires>,
        return_type: ReturnType,
    ) -> Self {
        Self {
            return_type: Some(return_type),
            ..Self::new(name, wires)
        }
    }

    /// Expectation value of an observable.
    pub fn expval(name: impl Into<String>, wires: impl Into<Wires>) -> Self {
        Self::observable(name, wires, ReturnType::Expectation)
    }

    /// Samples of an observable.
    pub fn sample(name: impl Into<String>, wires: impl Into<Wires>) -> Self {
        Self::observable(name, wires, ReturnType::Sample)
    }

    fn pauli_rotation(
        name: &str,
        pauli: &str,
        theta: impl Into<ParameterExpression>,
        wire: impl Into<Wire>,
    ) -> Self {
        let wires = Wires::new([wire.into()]);
        Self::new(name, wires.clone())
            .with_params([theta.into()])
            .with_generator(Generator::new(pauli, wires, -0.5))
    }

    /// Rotation about the X axis.
    pub fn rx(theta: impl Into<ParameterExpression>, wire: impl Into<Wire>) -> Self {
        Self::pauli_rotation("RX", "PauliX", theta, wire)
    }

    /// Rotation about the Y axis.
    pub fn ry(theta: impl Into<ParameterExpression>, wire: impl Into<Wire>) -> Self {
        Self::pauli_rotation("RY", "PauliY", theta, wire)
    }

    /// Rotation about the Z axis.
    pub fn rz(theta: impl Into<ParameterExpression>, wire: impl Into<Wire>) -> Self {
        Self::pauli_rotation("RZ", "PauliZ", theta, wire)
    }

    /// Hadamard gate.
    pub fn hadamard(wire: impl Into<Wire>) -> Self {
        Self::new("Hadamard", Wires::new([wire.into()]))
    }

    /// Pauli-X gate.
    pub fn pauli_x(wire: impl Into<Wire>) -> Self {
        Self::new("PauliX", Wires::new([wire.into()]))
    }

    /// Controlled-NOT gate.
    pub fn cnot(control: impl Into<Wire>, target: impl Into<Wire>) -> Self {
        Self::new("CNOT", Wires::new([control.into(), target.into()]))
    }

    /// Symbols appearing in the parameters.
    pub fn symbols(&self) -> BTreeSet<&str> {
        self.params.iter().flat_map(ParameterExpression::symbols).collect()
    }

    /// Copy of this operation with `name` bound to `value` in every parameter.
    #[must_use]
    pub fn bind(&self, name: &str, value: f64) -> Self {
        Self {
            params: self.params.iter().map(|p| p.bind(name, value)).collect(),
            ..self.clone()
        }
    }
}

impl Operator for Operation {
    fn name(&self) -> &str {
        &self.name
    }

    fn wires(&self) -> &Wires {
        &self.wires
    }

    fn parameters(&self) -> &[ParameterExpression] {
        &self.params
    }

    fn generator(&self) -> Option<Generator> {
        self.generator.clone()
    }

    fn return_type(&self) -> Option<ReturnType> {
        self.return_type
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(rt) = self.return_type {
            write!(f, "{rt}(")?;
        }
        write!(f, "{}", self.name)?;
        if !self.params.is_empty() {
            write!(f, "(")?;
            for (i, p) in self.params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{p}")?;
            }
            write!(f, ")")?;
        }
        write!(f, " {}", self.wires)?;
        if self.return_type.is_some() {
            write!(f, ")")?;
        }
        Ok(())
    }
}

//! Circuit Graph Demo Suite
//!
//! Reference circuits and terminal helpers used by the `demo-layers` binary:
//!
//! - **Chained dependency**: seven gates and two observables on three wires
//! - **CV variational**: rotations and a beamsplitter on mixed wire labels,
//!   with bound parameters interleaved between symbolic ones
//! - **Two-local ansatz**: RY rotation layers separated by CNOT ladders

pub mod circuits;

use circuit_graph::{CircuitGraph, GraphResult, Operation};
use console::style;
use tracing::debug;

/// Print a demo header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
    println!();
}

/// Print a demo section.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a result line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// Format a list of queue indices as `[0, 3, 5]`.
pub fn format_indices(indices: &[usize]) -> String {
    let items: Vec<String> = indices.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(", "))
}

/// Bind `name` to `value` in every node that uses it.
///
/// Returns the number of nodes rebound. Bound parameters leave the default
/// trainable set.
pub fn bind_symbol(
    graph: &mut CircuitGraph<Operation>,
    name: &str,
    value: f64,
) -> GraphResult<usize> {
    let targets: Vec<(usize, Operation)> = (0..graph.num_nodes())
        .filter_map(|idx| graph.get(idx).map(|op| (idx, op)))
        .filter(|(_, op)| op.symbols().contains(name))
        .map(|(idx, op)| (idx, op.bind(name, value)))
        .collect();
    for (idx, op) in &targets {
        graph.update_node(*idx, op.clone())?;
    }
    debug!(symbol = name, value, nodes = targets.len(), "Bound symbol");
    Ok(targets.len())
}

/// Parse a `NAME=VALUE` binding.
pub fn parse_binding(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid value for '{name}': {e}"))?;
    Ok((name.trim().to_string(), value))
}

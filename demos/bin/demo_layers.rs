//! Parametrized Layer Demo
//!
//! Builds the dependency graph of a circuit and prints its edges, per-wire
//! schedules and parametrized layers.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{debug, info};

use circuit_graph::{CircuitDescription, CircuitGraph, Operation};
use circuit_graph_demos::circuits;
use circuit_graph_demos::{
    bind_symbol, format_indices, parse_binding, print_header, print_result, print_section,
};

#[derive(Parser, Debug)]
#[command(name = "demo-layers")]
#[command(about = "Analyze the dependency graph and parametrized layers of a circuit")]
struct Args {
    /// Built-in circuit (chained, cv-variational, two-local)
    #[arg(short, long, default_value = "cv-variational")]
    circuit: String,

    /// JSON circuit description; overrides --circuit
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Number of wires for the two-local ansatz
    #[arg(short, long, default_value = "4")]
    wires: u32,

    /// Number of entangling repetitions for the two-local ansatz
    #[arg(short, long, default_value = "2")]
    reps: u32,

    /// Bind a symbol before analysis, as NAME=VALUE (repeatable)
    #[arg(short, long, value_parser = parse_binding)]
    bind: Vec<(String, f64)>,

    /// Print layer data as JSON instead of a report
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, env = "CIRCUIT_GRAPH_VERBOSE")]
    verbose: bool,
}

fn load(args: &Args) -> Result<CircuitDescription> {
    if let Some(path) = &args.file {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        return CircuitDescription::from_json(&text)
            .with_context(|| format!("Invalid circuit description in {}", path.display()));
    }
    match circuits::by_name(&args.circuit, args.wires, args.reps) {
        Some(desc) => Ok(desc),
        None => bail!(
            "Unknown circuit '{}', expected one of: {}",
            args.circuit,
            circuits::NAMES.join(", ")
        ),
    }
}

fn report(graph: &CircuitGraph<Operation>) -> Result<()> {
    print_section("Graph");
    print_result("Nodes", graph.num_nodes());
    print_result("Edges", graph.num_edges());
    print_result("Depth", graph.depth());
    print_result("Parameters", graph.num_params());
    print_result("Trainable", graph.trainable_params().len());

    print_section("Queue");
    for idx in 0..graph.num_nodes() {
        if let Some(op) = graph.get(idx) {
            print_result(&format!("{idx:>3}"), op);
        }
    }

    let symbols: BTreeSet<&str> = graph.operations().flat_map(Operation::symbols).collect();
    if !symbols.is_empty() {
        let names: Vec<&str> = symbols.into_iter().collect();
        print_result("Free symbols", names.join(", "));
    }

    print_section("Wires");
    for wire in graph.wire_index().iter() {
        print_result(&wire.to_string(), format_indices(graph.wire_indices(wire)?));
    }

    print_section("Parametrized layers");
    for (i, layer) in graph.iterate_parametrized_layers().enumerate() {
        print_result(
            &format!("Layer {i}"),
            format!(
                "ops {} params {} | before {} | after {}",
                format_indices(&layer.ops),
                format_indices(&layer.param_inds),
                format_indices(&layer.pre_ops),
                format_indices(&layer.post_ops),
            ),
        );
    }

    let invisible: Vec<usize> = graph.invisible_operations().into_iter().collect();
    if !invisible.is_empty() {
        print_result("Invisible operations", format_indices(&invisible));
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let description = load(&args)?;
    debug!(
        operations = description.operations.len(),
        observables = description.observables.len(),
        "Loaded circuit description"
    );

    let mut graph = description.into_graph()?;
    for (name, value) in &args.bind {
        if bind_symbol(&mut graph, name, *value)? == 0 {
            bail!("Symbol '{name}' does not appear in the circuit");
        }
    }
    info!(
        "Built circuit graph with {} nodes and {} edges",
        graph.num_nodes(),
        graph.num_edges()
    );

    if args.json {
        let layers: Vec<_> = graph.iterate_parametrized_layers().collect();
        println!("{}", serde_json::to_string_pretty(&layers)?);
        return Ok(());
    }

    print_header("Circuit Graph: Parametrized Layers");
    report(&graph)?;
    print_result("Hash", format!("{:016x}", graph.hash()?));
    Ok(())
}

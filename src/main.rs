//! topologic-nodes - evaluate a Topologic node graph from a JSON file
//!
//! Node outputs are printed to stdout as JSON keyed by node id. Set
//! `RUST_LOG=debug` for per-node timings.
//!
//! ```bash
//! topologic-nodes demos/cube.json
//! topologic-nodes --list-nodes
//! ```

use std::error::Error;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};
use topologic_nodes::nodes::PortDefinition;
use topologic_nodes::{builtin_registry, MockKernel, NodeGraph, NodeGraphEngine, NodeRegistry};

#[derive(Parser)]
#[command(name = "topologic-nodes")]
#[command(about = "Evaluate a Topologic node graph against the in-memory kernel", long_about = None)]
struct Cli {
    /// Graph description (JSON)
    #[arg(required_unless_present = "list_nodes")]
    graph: Option<PathBuf>,

    /// Print single-line JSON instead of pretty output
    #[arg(long)]
    compact: bool,

    /// List the available node types with their ports, then exit
    #[arg(long)]
    list_nodes: bool,
}

fn evaluate(path: &Path, compact: bool) -> Result<String, Box<dyn Error>> {
    let text = fs::read_to_string(path)?;
    let graph = NodeGraph::from_json(&text)?;
    info!(
        "Loaded {} nodes and {} connections from {}",
        graph.nodes.len(),
        graph.connections.len(),
        path.display()
    );

    let kernel = MockKernel::new();
    let mut engine = NodeGraphEngine::new(&kernel, builtin_registry());
    engine.execute(&graph)?;

    let outputs = engine.into_outputs();
    let rendered = if compact {
        serde_json::to_string(&outputs)?
    } else {
        serde_json::to_string_pretty(&outputs)?
    };
    Ok(rendered)
}

/// Human-readable listing of every registered node, grouped by category
fn node_catalogue(registry: &NodeRegistry) -> String {
    let mut out = String::new();
    for category in registry.categories() {
        let _ = writeln!(out, "{}", category.display_string());
        for node_type in registry.nodes_in_category(category) {
            let Some(metadata) = registry.metadata(node_type) else {
                continue;
            };
            let _ = writeln!(
                out,
                "  {} ({}): {}",
                metadata.node_type, metadata.display_name, metadata.description
            );
            let _ = writeln!(out, "    tags: {}", metadata.tags.join(", "));
            for port in &metadata.inputs {
                let _ = writeln!(out, "    in  {}", port_line(port));
            }
            for port in &metadata.outputs {
                let _ = writeln!(out, "    out {}", port_line(port));
            }
        }
    }
    out
}

fn port_line(port: &PortDefinition) -> String {
    let mut line = format!("{}: {}", port.name, port.data_type.name());
    if port.optional {
        line.push_str(" (optional)");
    }
    if let Some(description) = &port.description {
        let _ = write!(line, " - {description}");
    }
    line
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    if cli.list_nodes {
        print!("{}", node_catalogue(builtin_registry()));
        return ExitCode::SUCCESS;
    }
    let Some(path) = cli.graph else {
        return ExitCode::SUCCESS;
    };

    match evaluate(&path, cli.compact) {
        Ok(rendered) => {
            println!("{rendered}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("Evaluation of {} failed: {}", path.display(), err);
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_graph_path_is_required() {
        assert!(Cli::try_parse_from(["topologic-nodes"]).is_err());

        let cli = Cli::try_parse_from(["topologic-nodes", "demos/cube.json", "--compact"]).unwrap();
        assert_eq!(cli.graph, Some(PathBuf::from("demos/cube.json")));
        assert!(cli.compact);

        let cli = Cli::try_parse_from(["topologic-nodes", "--list-nodes"]).unwrap();
        assert!(cli.list_nodes && cli.graph.is_none());
    }

    #[test]
    fn test_demo_graph_evaluates() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/cube.json");
        let rendered = evaluate(&path, true).unwrap();
        let outputs: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(outputs.as_object().unwrap().len(), 4);
    }

    #[test]
    fn test_catalogue_lists_ports() {
        let catalogue = node_catalogue(builtin_registry());
        assert!(catalogue.contains("Topologic > Face"));
        assert!(catalogue.contains("Graph.ShortestPaths"));
        assert!(catalogue.contains("in  Time Limit: Integer (optional)"));
        assert!(catalogue.contains("out Distance: Float"));
    }
}

//! Graph.ShortestPaths node implementation
//!
//! - mod.rs: node metadata and factory implementation
//! - logic.rs: per-tuple path search
//! - parameters.rs: key names, time limit and replication policy

pub mod logic;
pub mod parameters;

pub use logic::*;
pub use parameters::*;

use crate::error::NodeResult;
use crate::kernel::Kernel;
use crate::nodes::{
    DataType, NodeCategory, NodeFactory, NodeInputs, NodeMetadata, NodeOutputs, PortDefinition,
};

/// All shortest paths between two vertices of a graph
#[derive(Default)]
pub struct GraphShortestPathsNodeFactory;

impl NodeFactory for GraphShortestPathsNodeFactory {
    fn metadata() -> NodeMetadata {
        NodeMetadata::new(
            NODE_TYPE,
            "Shortest Paths",
            NodeCategory::graph(),
            "Every shortest path between Vertex A and Vertex B, as wires",
        )
        .with_inputs(vec![
            PortDefinition::required("Graph", DataType::Graph),
            PortDefinition::required("Vertex A", DataType::Topology),
            PortDefinition::required("Vertex B", DataType::Topology),
            PortDefinition::optional("Vertex Key", DataType::String)
                .with_description("Dictionary key holding vertex weights"),
            PortDefinition::optional("Edge Key", DataType::String)
                .with_description("Dictionary key holding edge weights"),
            PortDefinition::optional("Time Limit", DataType::Integer)
                .with_description("Seconds allowed per search (at least 1)"),
        ])
        .with_outputs(vec![PortDefinition::required("Wires", DataType::Topology)])
        .with_tags(vec!["topologic", "graph", "path", "search", "route"])
    }

    fn process(kernel: &dyn Kernel, inputs: &NodeInputs) -> NodeResult<NodeOutputs> {
        process_shortest_paths(kernel, inputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortest_paths_metadata() {
        let metadata = GraphShortestPathsNodeFactory::metadata();
        assert_eq!(metadata.node_type, "Graph.ShortestPaths");
        assert_eq!(metadata.inputs.len(), 6);
        assert!(metadata.input("Time Limit").unwrap().optional);
        assert!(!metadata.input("Graph").unwrap().optional);
    }
}

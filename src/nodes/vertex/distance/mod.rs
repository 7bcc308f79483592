//! Vertex.Distance node implementation

pub mod logic;

pub use logic::*;

use crate::error::NodeResult;
use crate::kernel::Kernel;
use crate::nodes::{
    DataType, NodeCategory, NodeFactory, NodeInputs, NodeMetadata, NodeOutputs, PortDefinition,
};

#[derive(Default)]
pub struct VertexDistanceNodeFactory;

impl NodeFactory for VertexDistanceNodeFactory {
    fn metadata() -> NodeMetadata {
        NodeMetadata::new(
            NODE_TYPE,
            "Distance",
            NodeCategory::vertex(),
            "Shortest distance from a vertex to a topology",
        )
        .with_inputs(vec![
            PortDefinition::required("Vertex", DataType::Topology),
            PortDefinition::required("Topology", DataType::Topology),
        ])
        .with_outputs(vec![PortDefinition::required("Distance", DataType::Float)])
        .with_tags(vec!["topologic", "vertex", "distance", "measure"])
    }

    fn process(kernel: &dyn Kernel, inputs: &NodeInputs) -> NodeResult<NodeOutputs> {
        process_distance(kernel, inputs)
    }
}

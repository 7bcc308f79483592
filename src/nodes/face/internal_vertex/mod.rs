//! Face.InternalVertex node implementation

pub mod logic;

pub use logic::*;

use crate::error::NodeResult;
use crate::kernel::Kernel;
use crate::nodes::{
    DataType, NodeCategory, NodeFactory, NodeInputs, NodeMetadata, NodeOutputs, PortDefinition,
};

#[derive(Default)]
pub struct FaceInternalVertexNodeFactory;

impl NodeFactory for FaceInternalVertexNodeFactory {
    fn metadata() -> NodeMetadata {
        NodeMetadata::new(
            NODE_TYPE,
            "Internal Vertex",
            NodeCategory::face(),
            "A vertex guaranteed to lie inside each input face",
        )
        .with_inputs(vec![PortDefinition::required("Face", DataType::Topology)])
        .with_outputs(vec![PortDefinition::required("Vertex", DataType::Topology)])
        .with_tags(vec!["topologic", "face", "vertex", "inside"])
    }

    fn process(kernel: &dyn Kernel, inputs: &NodeInputs) -> NodeResult<NodeOutputs> {
        process_internal_vertex(kernel, inputs)
    }
}

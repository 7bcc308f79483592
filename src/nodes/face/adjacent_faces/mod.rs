//! Face.AdjacentFaces node implementation

pub mod logic;

pub use logic::*;

use crate::error::NodeResult;
use crate::kernel::Kernel;
use crate::nodes::{
    DataType, NodeCategory, NodeFactory, NodeInputs, NodeMetadata, NodeOutputs, PortDefinition,
};

#[derive(Default)]
pub struct FaceAdjacentFacesNodeFactory;

impl NodeFactory for FaceAdjacentFacesNodeFactory {
    fn metadata() -> NodeMetadata {
        NodeMetadata::new(
            NODE_TYPE,
            "Adjacent Faces",
            NodeCategory::face(),
            "Faces sharing an edge with each input face",
        )
        .with_inputs(vec![PortDefinition::required("Face", DataType::Topology)])
        .with_outputs(vec![
            PortDefinition::required("Faces", DataType::Topology)
                .with_description("One list of neighbours per input face"),
        ])
        .with_tags(vec!["topologic", "face", "adjacency", "neighbours"])
    }

    fn process(kernel: &dyn Kernel, inputs: &NodeInputs) -> NodeResult<NodeOutputs> {
        process_adjacent_faces(kernel, inputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacent_faces_metadata() {
        let metadata = FaceAdjacentFacesNodeFactory::metadata();
        assert_eq!(metadata.node_type, "Face.AdjacentFaces");
        assert_eq!(metadata.category, NodeCategory::face());
        assert!(metadata.output("Faces").is_some());
    }
}

//! Topology.ByGeometry node implementation
//!
//! Builds the richest topology the input mesh supports: faces are tried as
//! a cell, then a cell complex, a shell and finally a cluster; without faces
//! the edges become a wire or a cluster; bare vertices become a cluster.

pub mod logic;
pub mod parameters;

pub use logic::*;
pub use parameters::*;

use crate::error::NodeResult;
use crate::kernel::Kernel;
use crate::nodes::{
    DataType, NodeCategory, NodeFactory, NodeInputs, NodeMetadata, NodeOutputs, PortDefinition,
};

#[derive(Default)]
pub struct TopologyByGeometryNodeFactory;

impl NodeFactory for TopologyByGeometryNodeFactory {
    fn metadata() -> NodeMetadata {
        NodeMetadata::new(
            NODE_TYPE,
            "By Geometry",
            NodeCategory::topology(),
            "Create a topology from mesh vertices, edges and faces",
        )
        .with_inputs(vec![
            PortDefinition::required("Vertices", DataType::Vector3)
                .with_description("Vertex coordinates"),
            PortDefinition::optional("Edges", DataType::Indices)
                .with_description("Pairs of vertex indices"),
            PortDefinition::optional("Faces", DataType::Indices)
                .with_description("Vertex index loops, one per face"),
            PortDefinition::optional("Tol", DataType::Float)
                .with_description("Tolerance used when building a cell complex"),
        ])
        .with_outputs(vec![
            PortDefinition::required("Topology", DataType::Topology),
            PortDefinition::required("Vertices", DataType::Topology),
            PortDefinition::required("Edges", DataType::Topology),
            PortDefinition::required("Faces", DataType::Topology),
        ])
        .with_tags(vec!["topologic", "mesh", "geometry", "import"])
    }

    fn process(kernel: &dyn Kernel, inputs: &NodeInputs) -> NodeResult<NodeOutputs> {
        process_by_geometry(kernel, inputs)
    }
}

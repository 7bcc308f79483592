//! Topology.Union node implementation
//!
//! - mod.rs: node metadata and factory implementation
//! - logic.rs: per-tuple boolean union
//! - parameters.rs: fallback values and replication policy

pub mod logic;
pub mod parameters;

pub use logic::*;
pub use parameters::*;

use crate::error::NodeResult;
use crate::kernel::Kernel;
use crate::nodes::{
    DataType, NodeCategory, NodeFactory, NodeInputs, NodeMetadata, NodeOutputs, PortDefinition,
};

/// Boolean union of two topologies
#[derive(Default)]
pub struct TopologyUnionNodeFactory;

impl NodeFactory for TopologyUnionNodeFactory {
    fn metadata() -> NodeMetadata {
        NodeMetadata::new(
            NODE_TYPE,
            "Union",
            NodeCategory::topology(),
            "Boolean union of Topology A and Topology B",
        )
        .with_inputs(vec![
            PortDefinition::required("Topology A", DataType::Topology),
            PortDefinition::required("Topology B", DataType::Topology),
            PortDefinition::optional("Transfer Dictionary", DataType::Boolean)
                .with_description("Merge the inputs' dictionaries onto the result"),
        ])
        .with_outputs(vec![PortDefinition::required("Topology", DataType::Topology)])
        .with_tags(vec!["topologic", "boolean", "union", "merge"])
    }

    fn process(kernel: &dyn Kernel, inputs: &NodeInputs) -> NodeResult<NodeOutputs> {
        process_union(kernel, inputs)
    }
}

//! Cell.ByLoft node implementation

pub mod logic;

pub use logic::*;

use crate::error::NodeResult;
use crate::kernel::Kernel;
use crate::nodes::{
    DataType, NodeCategory, NodeFactory, NodeInputs, NodeMetadata, NodeOutputs, PortDefinition,
};

/// Lofts each group of cross-section wires into a single cell
#[derive(Default)]
pub struct CellByLoftNodeFactory;

impl NodeFactory for CellByLoftNodeFactory {
    fn metadata() -> NodeMetadata {
        NodeMetadata::new(
            NODE_TYPE,
            "By Loft",
            NodeCategory::cell(),
            "Loft a cell through ordered, closed cross-section wires",
        )
        .with_inputs(vec![
            PortDefinition::required("Wires", DataType::Topology)
                .with_description("One list of wires per cell, bottom to top"),
        ])
        .with_outputs(vec![PortDefinition::required("Cell", DataType::Topology)])
        .with_tags(vec!["topologic", "cell", "loft", "solid"])
    }

    fn process(kernel: &dyn Kernel, inputs: &NodeInputs) -> NodeResult<NodeOutputs> {
        process_by_loft(kernel, inputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_loft_metadata() {
        let metadata = CellByLoftNodeFactory::metadata();
        assert_eq!(metadata.node_type, "Cell.ByLoft");
        assert_eq!(metadata.category, NodeCategory::cell());
        assert!(!metadata.input("Wires").unwrap().optional);
    }
}

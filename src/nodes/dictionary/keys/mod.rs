//! Dictionary.Keys node implementation

pub mod logic;

pub use logic::*;

use crate::error::NodeResult;
use crate::kernel::Kernel;
use crate::nodes::{
    DataType, NodeCategory, NodeFactory, NodeInputs, NodeMetadata, NodeOutputs, PortDefinition,
};

#[derive(Default)]
pub struct DictionaryKeysNodeFactory;

impl NodeFactory for DictionaryKeysNodeFactory {
    fn metadata() -> NodeMetadata {
        NodeMetadata::new(
            NODE_TYPE,
            "Keys",
            NodeCategory::dictionary(),
            "Keys of each input dictionary, keeping the input nesting",
        )
        .with_inputs(vec![PortDefinition::required("Dictionary", DataType::Dictionary)])
        .with_outputs(vec![PortDefinition::required("Keys", DataType::String)])
        .with_tags(vec!["topologic", "dictionary", "keys", "attributes"])
    }

    fn process(kernel: &dyn Kernel, inputs: &NodeInputs) -> NodeResult<NodeOutputs> {
        process_keys(kernel, inputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_metadata() {
        let metadata = DictionaryKeysNodeFactory::metadata();
        assert_eq!(metadata.node_type, "Dictionary.Keys");
        assert_eq!(metadata.input("Dictionary").unwrap().data_type, DataType::Dictionary);
    }
}

//! Node factory system with self-registration and rich metadata

use std::collections::{BTreeMap, HashMap};

use log::debug;

use crate::error::{NodeError, NodeResult};
use crate::kernel::Kernel;
use crate::nodes::interface::{NodeInputs, NodeOutputs};

/// Data types that can flow through ports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Any topology handle (vertex through cluster)
    Topology,
    Graph,
    Dictionary,
    Float,
    Integer,
    Boolean,
    String,
    Vector3,
    /// Index lists (edges, face loops)
    Indices,
    /// Any type (for generic ports)
    Any,
}

impl DataType {
    /// Check if this data type can connect to another
    pub fn can_connect_to(&self, other: &DataType) -> bool {
        self == other || *self == DataType::Any || *other == DataType::Any
    }

    pub fn name(&self) -> &'static str {
        match self {
            DataType::Topology => "Topology",
            DataType::Graph => "Graph",
            DataType::Dictionary => "Dictionary",
            DataType::Float => "Float",
            DataType::Integer => "Integer",
            DataType::Boolean => "Boolean",
            DataType::String => "String",
            DataType::Vector3 => "Vector3",
            DataType::Indices => "Indices",
            DataType::Any => "Any",
        }
    }
}

/// Hierarchical category system for organizing nodes
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeCategory {
    path: Vec<String>,
}

impl NodeCategory {
    /// Create a new category from path components
    pub fn new(path: &[&str]) -> Self {
        Self {
            path: path.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Get the category name (last component)
    pub fn name(&self) -> &str {
        self.path.last().map(|s| s.as_str()).unwrap_or("")
    }

    pub fn display_string(&self) -> String {
        self.path.join(" > ")
    }
}

// Standard categories
impl NodeCategory {
    pub fn topologic() -> Self { Self::new(&["Topologic"]) }
    pub fn topology() -> Self { Self::new(&["Topologic", "Topology"]) }
    pub fn vertex() -> Self { Self::new(&["Topologic", "Vertex"]) }
    pub fn face() -> Self { Self::new(&["Topologic", "Face"]) }
    pub fn cell() -> Self { Self::new(&["Topologic", "Cell"]) }
    pub fn graph() -> Self { Self::new(&["Topologic", "Graph"]) }
    pub fn dictionary() -> Self { Self::new(&["Topologic", "Dictionary"]) }
}

/// Port definition for node creation
#[derive(Debug, Clone)]
pub struct PortDefinition {
    pub name: String,
    pub data_type: DataType,
    pub optional: bool,
    pub description: Option<String>,
}

impl PortDefinition {
    pub fn required(name: &str, data_type: DataType) -> Self {
        Self {
            name: name.to_string(),
            data_type,
            optional: false,
            description: None,
        }
    }

    /// An input that falls back to a parameter when unlinked
    pub fn optional(name: &str, data_type: DataType) -> Self {
        Self {
            name: name.to_string(),
            data_type,
            optional: true,
            description: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// Rich metadata for nodes - the single source of truth for node identity and ports
#[derive(Debug, Clone)]
pub struct NodeMetadata {
    pub node_type: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub category: NodeCategory,
    pub tags: Vec<&'static str>,
    pub inputs: Vec<PortDefinition>,
    pub outputs: Vec<PortDefinition>,
}

impl NodeMetadata {
    /// Create node metadata with sensible defaults
    pub fn new(
        node_type: &'static str,
        display_name: &'static str,
        category: NodeCategory,
        description: &'static str,
    ) -> Self {
        Self {
            node_type,
            display_name,
            description,
            category,
            tags: vec!["topologic"],
            inputs: vec![],
            outputs: vec![],
        }
    }

    pub fn with_inputs(mut self, inputs: Vec<PortDefinition>) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn with_outputs(mut self, outputs: Vec<PortDefinition>) -> Self {
        self.outputs = outputs;
        self
    }

    pub fn with_tags(mut self, tags: Vec<&'static str>) -> Self {
        self.tags = tags;
        self
    }

    pub fn input(&self, name: &str) -> Option<&PortDefinition> {
        self.inputs.iter().find(|port| port.name == name)
    }

    pub fn output(&self, name: &str) -> Option<&PortDefinition> {
        self.outputs.iter().find(|port| port.name == name)
    }
}

/// A node type: static metadata plus a stateless process function
pub trait NodeFactory {
    fn metadata() -> NodeMetadata;

    /// Evaluate the node once against `kernel`
    fn process(kernel: &dyn Kernel, inputs: &NodeInputs) -> NodeResult<NodeOutputs>;
}

/// Function pointer types stored by the registry
type NodeProcessor = fn(&dyn Kernel, &NodeInputs) -> NodeResult<NodeOutputs>;
type MetadataProvider = fn() -> NodeMetadata;

/// Registry for managing node factories
#[derive(Default)]
pub struct NodeRegistry {
    processors: BTreeMap<String, NodeProcessor>,
    metadata_providers: BTreeMap<String, MetadataProvider>,
    categories: HashMap<NodeCategory, Vec<String>>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in node
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        crate::nodes::register_builtin_nodes(&mut registry);
        registry
    }

    /// Register a node factory
    pub fn register<T: NodeFactory + 'static>(&mut self) {
        let metadata = T::metadata();
        let node_type = metadata.node_type.to_string();
        debug!("Registering node type: {}", node_type);

        self.processors.insert(node_type.clone(), T::process);
        self.metadata_providers.insert(node_type.clone(), T::metadata);
        self.categories
            .entry(metadata.category.clone())
            .or_default()
            .push(node_type);
    }

    pub fn contains(&self, node_type: &str) -> bool {
        self.processors.contains_key(node_type)
    }

    pub fn metadata(&self, node_type: &str) -> Option<NodeMetadata> {
        self.metadata_providers.get(node_type).map(|provider| provider())
    }

    /// Evaluate a node of type `node_type`
    pub fn process(
        &self,
        node_type: &str,
        kernel: &dyn Kernel,
        inputs: &NodeInputs,
    ) -> NodeResult<NodeOutputs> {
        let processor = self
            .processors
            .get(node_type)
            .ok_or_else(|| NodeError::UnknownNodeType(node_type.to_string()))?;
        processor(kernel, inputs)
    }

    /// All registered node types, sorted
    pub fn node_types(&self) -> Vec<&str> {
        self.processors.keys().map(String::as_str).collect()
    }

    pub fn nodes_in_category(&self, category: &NodeCategory) -> &[String] {
        self.categories.get(category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn categories(&self) -> Vec<&NodeCategory> {
        let mut categories: Vec<_> = self.categories.keys().collect();
        categories.sort();
        categories
    }
}

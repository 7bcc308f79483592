//! Node system - core data structures and the Topologic node adapters

// Core node system modules
pub mod batch;
pub mod execution_engine;
pub mod factory;
pub mod graph;
pub mod interface;

// Node implementations, grouped by the class they operate on
pub mod cell;
pub mod dictionary;
pub mod face;
pub mod graph_search;
pub mod topology;
pub mod vertex;

use once_cell::sync::Lazy;

// Re-export core types
pub use batch::{collect_socket, into_socket, run_batch};
pub use execution_engine::{ExecutionStats, NodeGraphEngine, NodeState};
pub use factory::{DataType, NodeCategory, NodeFactory, NodeMetadata, NodeRegistry, PortDefinition};
pub use graph::{Connection, GraphNode, NodeGraph, NodeId};
pub use interface::{NodeInputs, NodeOutputs, SocketData, Value};

static BUILTIN_REGISTRY: Lazy<NodeRegistry> = Lazy::new(NodeRegistry::builtin);

/// Shared registry holding every built-in node
pub fn builtin_registry() -> &'static NodeRegistry {
    &BUILTIN_REGISTRY
}

pub(crate) fn register_builtin_nodes(registry: &mut NodeRegistry) {
    registry.register::<topology::union::TopologyUnionNodeFactory>();
    registry.register::<topology::by_geometry::TopologyByGeometryNodeFactory>();
    registry.register::<cell::by_loft::CellByLoftNodeFactory>();
    registry.register::<vertex::distance::VertexDistanceNodeFactory>();
    registry.register::<face::internal_vertex::FaceInternalVertexNodeFactory>();
    registry.register::<face::adjacent_faces::FaceAdjacentFacesNodeFactory>();
    registry.register::<dictionary::keys::DictionaryKeysNodeFactory>();
    registry.register::<graph_search::shortest_paths::GraphShortestPathsNodeFactory>();
}

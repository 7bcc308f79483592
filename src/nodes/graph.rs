//! Node graph data structures and operations

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{NodeError, NodeResult};
use crate::nodes::factory::NodeRegistry;
use crate::nodes::interface::SocketData;

/// Unique identifier for a node
pub type NodeId = usize;

/// Represents a connection from an output socket to an input socket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub from_node: NodeId,
    pub from_port: String,
    pub to_node: NodeId,
    pub to_port: String,
}

impl Connection {
    pub fn new(from_node: NodeId, from_port: &str, to_node: NodeId, to_port: &str) -> Self {
        Self {
            from_node,
            from_port: from_port.to_string(),
            to_node,
            to_port: to_port.to_string(),
        }
    }
}

/// One node instance: its type, parameters and literal socket values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub params: serde_json::Value,
    /// Values for inputs that are not fed by a connection
    #[serde(default)]
    pub inputs: HashMap<String, SocketData>,
}

/// A graph containing nodes and their connections
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeGraph {
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl NodeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a graph description from JSON
    pub fn from_json(text: &str) -> NodeResult<Self> {
        let graph: NodeGraph = serde_json::from_str(text)?;
        graph.validate()?;
        Ok(graph)
    }

    /// Adds a node to the graph and returns its ID
    pub fn add_node(&mut self, node_type: &str, params: serde_json::Value) -> NodeId {
        let id = self.nodes.iter().map(|node| node.id + 1).max().unwrap_or(0);
        self.nodes.push(GraphNode {
            id,
            node_type: node_type.to_string(),
            params,
            inputs: HashMap::new(),
        });
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut GraphNode> {
        self.nodes.iter_mut().find(|node| node.id == id)
    }

    /// Set a literal value on an input socket
    pub fn set_input(&mut self, id: NodeId, port: &str, data: impl Into<SocketData>) -> NodeResult<()> {
        let node = self
            .node_mut(id)
            .ok_or_else(|| NodeError::InvalidInput(format!("node {id} not found")))?;
        node.inputs.insert(port.to_string(), data.into());
        Ok(())
    }

    /// Adds a connection between two existing nodes
    pub fn add_connection(&mut self, connection: Connection) -> NodeResult<()> {
        self.check_connection(&connection)?;
        // Replace any existing connection to the same input
        self.connections.retain(|existing| {
            !(existing.to_node == connection.to_node && existing.to_port == connection.to_port)
        });
        self.connections.push(connection);
        Ok(())
    }

    /// Connections feeding `id`
    pub fn incoming(&self, id: NodeId) -> impl Iterator<Item = &Connection> {
        self.connections.iter().filter(move |connection| connection.to_node == id)
    }

    fn check_connection(&self, connection: &Connection) -> NodeResult<()> {
        for endpoint in [connection.from_node, connection.to_node] {
            if self.node(endpoint).is_none() {
                return Err(NodeError::InvalidInput(format!(
                    "connection refers to missing node {endpoint}"
                )));
            }
        }
        if connection.from_node == connection.to_node {
            return Err(NodeError::Cycle);
        }
        Ok(())
    }

    /// Check ids are unique and connections refer to existing nodes
    pub fn validate(&self) -> NodeResult<()> {
        let mut seen = std::collections::HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.id) {
                return Err(NodeError::InvalidInput(format!("duplicate node id {}", node.id)));
            }
        }
        for connection in &self.connections {
            self.check_connection(connection)?;
        }
        Ok(())
    }

    /// Check every connection and literal input against the ports the
    /// registry declares for each node type.
    ///
    /// A connection must leave an existing output and enter an existing
    /// input of a compatible data type. Nodes of unregistered types are left
    /// for the engine, which stops on them with `UnknownNodeType`.
    pub fn validate_ports(&self, registry: &NodeRegistry) -> NodeResult<()> {
        for node in &self.nodes {
            let Some(metadata) = registry.metadata(&node.node_type) else {
                continue;
            };
            for port in node.inputs.keys() {
                if metadata.input(port).is_none() {
                    return Err(NodeError::InvalidInput(format!(
                        "{} node {} has no input '{}'",
                        node.node_type, node.id, port
                    )));
                }
            }
        }

        for connection in &self.connections {
            let (Some(source), Some(target)) =
                (self.node(connection.from_node), self.node(connection.to_node))
            else {
                return Err(NodeError::InvalidInput(format!(
                    "connection {} -> {} refers to a missing node",
                    connection.from_node, connection.to_node
                )));
            };
            let (Some(source_metadata), Some(target_metadata)) = (
                registry.metadata(&source.node_type),
                registry.metadata(&target.node_type),
            ) else {
                continue;
            };
            let output = source_metadata
                .output(&connection.from_port)
                .ok_or_else(|| {
                    NodeError::InvalidInput(format!(
                        "{} node {} has no output '{}'",
                        source.node_type, source.id, connection.from_port
                    ))
                })?;
            let input = target_metadata
                .input(&connection.to_port)
                .ok_or_else(|| {
                    NodeError::InvalidInput(format!(
                        "{} node {} has no input '{}'",
                        target.node_type, target.id, connection.to_port
                    ))
                })?;
            if !output.data_type.can_connect_to(&input.data_type) {
                return Err(NodeError::InvalidInput(format!(
                    "cannot connect {} output '{}' of node {} to {} input '{}' of node {}",
                    output.data_type.name(),
                    output.name,
                    source.id,
                    input.data_type.name(),
                    input.name,
                    target.id
                )));
            }
        }
        Ok(())
    }
}

//! Node graph execution engine
//!
//! Evaluates every node of a `NodeGraph` once, in dependency order:
//! - port checks against the registry's node metadata
//! - execution order via topological sort (Kahn's algorithm)
//! - input assembly from literal values and upstream outputs
//! - dispatch through the `NodeRegistry`

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::time::Instant;

use log::{debug, error, info};

use crate::error::{NodeError, NodeResult};
use crate::kernel::Kernel;
use crate::nodes::factory::NodeRegistry;
use crate::nodes::graph::{NodeGraph, NodeId};
use crate::nodes::interface::{NodeInputs, NodeOutputs};

/// Execution state of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Pending,
    Clean,
    Error,
}

/// Summary of one `execute` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionStats {
    pub executed: usize,
    pub elapsed_ms: u128,
}

/// Execution engine for node graphs
pub struct NodeGraphEngine<'a> {
    kernel: &'a dyn Kernel,
    registry: &'a NodeRegistry,
    node_states: HashMap<NodeId, NodeState>,
    outputs: BTreeMap<NodeId, NodeOutputs>,
}

impl<'a> NodeGraphEngine<'a> {
    pub fn new(kernel: &'a dyn Kernel, registry: &'a NodeRegistry) -> Self {
        Self {
            kernel,
            registry,
            node_states: HashMap::new(),
            outputs: BTreeMap::new(),
        }
    }

    /// Get the execution order using topological sort
    pub fn execution_order(graph: &NodeGraph) -> NodeResult<Vec<NodeId>> {
        let mut in_degree: BTreeMap<NodeId, usize> = BTreeMap::new();
        let mut adj_list: HashMap<NodeId, Vec<NodeId>> = HashMap::new();

        for node in &graph.nodes {
            in_degree.insert(node.id, 0);
            adj_list.insert(node.id, Vec::new());
        }

        for connection in &graph.connections {
            let (Some(neighbors), true) = (
                adj_list.get_mut(&connection.from_node),
                in_degree.contains_key(&connection.to_node),
            ) else {
                return Err(NodeError::InvalidInput(format!(
                    "connection {} -> {} refers to a missing node",
                    connection.from_node, connection.to_node
                )));
            };
            neighbors.push(connection.to_node);
            *in_degree.entry(connection.to_node).or_default() += 1;
        }

        // Start with nodes that have no dependencies, lowest id first
        let mut queue: VecDeque<NodeId> = in_degree
            .iter()
            .filter(|(_, &degree)| degree == 0)
            .map(|(&id, _)| id)
            .collect();
        let mut result = Vec::with_capacity(in_degree.len());

        while let Some(node_id) = queue.pop_front() {
            result.push(node_id);
            if let Some(neighbors) = adj_list.get(&node_id) {
                for neighbor in neighbors {
                    if let Some(degree) = in_degree.get_mut(neighbor) {
                        *degree -= 1;
                        if *degree == 0 {
                            queue.push_back(*neighbor);
                        }
                    }
                }
            }
        }

        if result.len() != graph.nodes.len() {
            return Err(NodeError::Cycle);
        }
        Ok(result)
    }

    /// Execute every node in dependency order.
    ///
    /// Per-tuple kernel failures stay inside a node's outputs; any other
    /// node error stops execution and is returned.
    pub fn execute(&mut self, graph: &NodeGraph) -> NodeResult<ExecutionStats> {
        let start = Instant::now();
        graph.validate_ports(self.registry)?;
        let order = Self::execution_order(graph)?;
        self.node_states = order.iter().map(|&id| (id, NodeState::Pending)).collect();
        self.outputs.clear();

        for &node_id in &order {
            if let Err(err) = self.execute_single_node(node_id, graph) {
                error!("Node {} failed: {}", node_id, err);
                self.node_states.insert(node_id, NodeState::Error);
                return Err(err);
            }
            self.node_states.insert(node_id, NodeState::Clean);
        }

        let stats = ExecutionStats {
            executed: order.len(),
            elapsed_ms: start.elapsed().as_millis(),
        };
        info!("Executed {} nodes in {} ms", stats.executed, stats.elapsed_ms);
        Ok(stats)
    }

    fn execute_single_node(&mut self, node_id: NodeId, graph: &NodeGraph) -> NodeResult<()> {
        let node = graph
            .node(node_id)
            .ok_or_else(|| NodeError::InvalidInput(format!("node {node_id} not found")))?;

        let mut inputs = NodeInputs::new().with_params(node.params.clone());
        for (port, data) in &node.inputs {
            inputs.set_socket(port, data.clone());
        }
        for connection in graph.incoming(node_id) {
            let data = self
                .outputs
                .get(&connection.from_node)
                .and_then(|outputs| outputs.get(&connection.from_port))
                .ok_or_else(|| {
                    NodeError::MissingInput(format!(
                        "{} (output '{}' of node {})",
                        connection.to_port, connection.from_port, connection.from_node
                    ))
                })?;
            inputs.set_socket(&connection.to_port, data.clone());
        }

        debug!("Executing node {} ({})", node_id, node.node_type);
        let outputs = self.registry.process(&node.node_type, self.kernel, &inputs)?;
        self.outputs.insert(node_id, outputs);
        Ok(())
    }

    pub fn node_state(&self, node_id: NodeId) -> Option<NodeState> {
        self.node_states.get(&node_id).copied()
    }

    pub fn outputs(&self, node_id: NodeId) -> Option<&NodeOutputs> {
        self.outputs.get(&node_id)
    }

    pub fn into_outputs(self) -> BTreeMap<NodeId, NodeOutputs> {
        self.outputs
    }
}

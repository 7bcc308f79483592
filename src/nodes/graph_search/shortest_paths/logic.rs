//! Graph.ShortestPaths operations

use std::time::Duration;

use log::debug;

use super::parameters::{ShortestPathsParameters, MIN_TIME_LIMIT};
use crate::error::{NodeError, NodeResult};
use crate::kernel::Kernel;
use crate::nodes::batch::{collect_socket, run_batch};
use crate::nodes::interface::{tuple_f64, tuple_handle, tuple_str, NodeInputs, NodeOutputs, Value};
use crate::ragged::Ragged;
use crate::replication::align;
use crate::topology::{Handle, TypedHandle, Vertex};

pub const NODE_TYPE: &str = "Graph.ShortestPaths";

pub fn process_shortest_paths(kernel: &dyn Kernel, inputs: &NodeInputs) -> NodeResult<NodeOutputs> {
    let empty = NodeOutputs::new().with("Wires", Ragged::empty());
    if !inputs.any_linked() {
        return Ok(empty);
    }

    let params: ShortestPathsParameters = inputs.params(NODE_TYPE)?;
    let default_limit = i64::try_from(params.time_limit).map_err(|_| {
        NodeError::InvalidInput(format!("TimeLimit {} is out of range", params.time_limit))
    })?;
    let lanes = vec![
        inputs.required_lane("Graph")?,
        inputs.required_lane("Vertex A")?,
        inputs.required_lane("Vertex B")?,
        inputs.lane("Vertex Key", Value::String(params.vertex_key))?,
        inputs.lane("Edge Key", Value::String(params.edge_key))?,
        inputs.lane("Time Limit", Value::Int(default_limit))?,
    ];
    if lanes.iter().any(Vec::is_empty) {
        debug!("{NODE_TYPE}: an input is empty, nothing to do");
        return Ok(empty);
    }

    let batch = align(&lanes, params.replication)?;
    let results = run_batch(NODE_TYPE, batch, |tuple| shortest_paths_tuple(kernel, &tuple));
    let wires = collect_socket(results, |paths| {
        Ragged::list(paths.into_iter().map(Value::Handle))
    });
    Ok(NodeOutputs::new().with("Wires", wires))
}

/// Search one `(graph, A, B, vertex key, edge key, time limit)` tuple
pub fn shortest_paths_tuple(kernel: &dyn Kernel, tuple: &[Option<Value>]) -> NodeResult<Vec<Handle>> {
    let graph = tuple_handle(tuple, 0, "Graph")?;
    let start = as_vertex(kernel, tuple_handle(tuple, 1, "Vertex A")?)?;
    let end = as_vertex(kernel, tuple_handle(tuple, 2, "Vertex B")?)?;
    let vertex_key = tuple_str(tuple, 3, "Vertex Key")?;
    let edge_key = tuple_str(tuple, 4, "Edge Key")?;
    let time_limit = time_limit(tuple_f64(tuple, 5, "Time Limit")?)?;

    kernel
        .shortest_paths(graph, &start, &end, vertex_key, edge_key, time_limit)
        .map_err(NodeError::kernel(NODE_TYPE))
}

/// Search budget of `seconds`, never below `MIN_TIME_LIMIT`
pub fn time_limit(seconds: f64) -> NodeResult<Duration> {
    Duration::try_from_secs_f64(seconds.max(MIN_TIME_LIMIT as f64))
        .map_err(|err| NodeError::InvalidInput(format!("Time Limit {seconds}: {err}")))
}

fn as_vertex(kernel: &dyn Kernel, handle: Handle) -> NodeResult<Vertex> {
    kernel
        .narrow(handle)
        .and_then(TypedHandle::into_vertex)
        .map_err(NodeError::kernel(NODE_TYPE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::MockKernel;
    use crate::topology::TopologyType;
    use serde_json::json;

    /// Unit square graph; returns the graph and its corners in order
    fn square_graph(kernel: &MockKernel) -> (Value, Vec<Value>) {
        let corners: Vec<Vertex> = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]]
            .into_iter()
            .map(|c| {
                let handle = kernel.vertex_by_coordinates(c).unwrap();
                kernel.narrow(handle).unwrap().into_vertex().unwrap()
            })
            .collect();
        let edges: Vec<_> = (0..4)
            .map(|i| {
                let handle = kernel.edge_by_vertices(&corners[i], &corners[(i + 1) % 4]).unwrap();
                kernel.narrow(handle).unwrap().into_edge().unwrap()
            })
            .collect();
        let graph = kernel.graph_by_edges(&edges).unwrap();
        (
            Value::Handle(graph),
            corners.iter().map(|v| Value::Handle(v.handle())).collect(),
        )
    }

    #[test]
    fn test_paths_per_target() {
        let kernel = MockKernel::new();
        let (graph, corners) = square_graph(&kernel);
        let inputs = NodeInputs::new()
            .with_socket("Graph", Ragged::item(graph))
            .with_socket("Vertex A", Ragged::item(corners[0].clone()))
            .with_socket("Vertex B", Ragged::list(vec![corners[2].clone(), corners[1].clone()]));

        let outputs = process_shortest_paths(&kernel, &inputs).unwrap();
        let Ragged::List(per_tuple) = outputs.get("Wires").unwrap().clone() else {
            panic!("Wires should be a list");
        };
        assert_eq!(per_tuple.len(), 2);

        let opposite = per_tuple[0].clone().flattened().unwrap();
        assert_eq!(opposite.len(), 2);
        for wire in opposite {
            let typed = kernel.narrow(wire.as_handle().unwrap()).unwrap();
            assert_eq!(typed.topology_type(), TopologyType::Wire);
        }
        assert_eq!(per_tuple[1].clone().flattened().unwrap().len(), 1);
    }

    #[test]
    fn test_non_graph_fails_in_place() {
        let kernel = MockKernel::new();
        let (graph, corners) = square_graph(&kernel);
        let inputs = NodeInputs::new()
            .with_params(json!({ "Replication": "Iterate" }))
            .with_socket("Graph", Ragged::list(vec![graph, corners[3].clone()]))
            .with_socket("Vertex A", Ragged::item(corners[0].clone()))
            .with_socket("Vertex B", Ragged::item(corners[1].clone()));

        let outputs = process_shortest_paths(&kernel, &inputs).unwrap();
        let Ragged::List(per_tuple) = outputs.get("Wires").unwrap().clone() else {
            panic!("Wires should be a list");
        };
        assert_eq!(per_tuple.len(), 2);
        assert_eq!(per_tuple[1], Ragged::Item(Value::None));
    }

    #[test]
    fn test_time_limit_is_clamped() {
        assert_eq!(time_limit(0.0).unwrap(), Duration::from_secs(1));
        assert_eq!(time_limit(2.5).unwrap(), Duration::from_millis(2500));
        assert_eq!(time_limit(10.0).unwrap(), Duration::from_secs(10));
        assert!(time_limit(f64::INFINITY).is_err());
    }

    #[test]
    fn test_wrong_key_or_limit_type_fails_its_tuple() {
        let kernel = MockKernel::new();
        let (graph, corners) = square_graph(&kernel);
        let inputs = NodeInputs::new()
            .with_socket("Graph", Ragged::item(graph))
            .with_socket("Vertex A", Ragged::item(corners[0].clone()))
            .with_socket("Vertex B", Ragged::list(corners[1..].to_vec()))
            .with_socket(
                "Vertex Key",
                Ragged::list(vec![Value::from("weight"), Value::Int(3)]),
            )
            .with_socket(
                "Time Limit",
                Ragged::list(vec![Value::Int(5), Value::Int(5), Value::from("soon")]),
            );

        let outputs = process_shortest_paths(&kernel, &inputs).unwrap();
        let Ragged::List(per_tuple) = outputs.get("Wires").unwrap().clone() else {
            panic!("Wires should be a list");
        };
        assert_eq!(per_tuple.len(), 3);
        assert!(matches!(per_tuple[0], Ragged::List(_)));
        assert_eq!(per_tuple[1], Ragged::Item(Value::None));
        assert_eq!(per_tuple[2], Ragged::Item(Value::None));
    }

    #[test]
    fn test_time_limit_beyond_i64_is_rejected() {
        let kernel = MockKernel::new();
        let (graph, corners) = square_graph(&kernel);
        let inputs = NodeInputs::new()
            .with_params(json!({ "TimeLimit": u64::MAX }))
            .with_socket("Graph", Ragged::item(graph))
            .with_socket("Vertex A", Ragged::item(corners[0].clone()))
            .with_socket("Vertex B", Ragged::item(corners[1].clone()));
        assert!(matches!(
            process_shortest_paths(&kernel, &inputs),
            Err(NodeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_default_parameters() {
        let params: ShortestPathsParameters = NodeInputs::new().params(NODE_TYPE).unwrap();
        assert_eq!(params.time_limit, 10);
        assert!(params.vertex_key.is_empty());
    }
}

//! Vertex.Distance operations

use log::debug;

use crate::error::{NodeError, NodeResult};
use crate::kernel::Kernel;
use crate::nodes::batch::{into_socket, run_batch};
use crate::nodes::interface::{tuple_handle, NodeInputs, NodeOutputs, Value};
use crate::ragged::Ragged;
use crate::replication::{align, Replication};
use crate::topology::TypedHandle;

pub const NODE_TYPE: &str = "Vertex.Distance";

/// Vertices and topologies are matched with `Replication::Repeat`
pub fn process_distance(kernel: &dyn Kernel, inputs: &NodeInputs) -> NodeResult<NodeOutputs> {
    let empty = NodeOutputs::new().with("Distance", Ragged::empty());
    if !inputs.any_linked() {
        return Ok(empty);
    }

    let lanes = vec![
        inputs.required_lane("Vertex")?,
        inputs.required_lane("Topology")?,
    ];
    if lanes.iter().any(Vec::is_empty) {
        debug!("{NODE_TYPE}: an input is empty, nothing to do");
        return Ok(empty);
    }

    let batch = align(&lanes, Replication::Repeat)?;
    let results = run_batch(NODE_TYPE, batch, |tuple| distance_tuple(kernel, &tuple));
    Ok(NodeOutputs::new().with("Distance", into_socket(results)))
}

pub fn distance_tuple(kernel: &dyn Kernel, tuple: &[Option<Value>]) -> NodeResult<f64> {
    let vertex = kernel
        .narrow(tuple_handle(tuple, 0, "Vertex")?)
        .and_then(TypedHandle::into_vertex)
        .map_err(NodeError::kernel(NODE_TYPE))?;
    let topology = tuple_handle(tuple, 1, "Topology")?;
    kernel
        .distance(&vertex, topology)
        .map_err(NodeError::kernel(NODE_TYPE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{KernelError, MockKernel};

    fn point(kernel: &MockKernel, coordinates: [f64; 3]) -> Value {
        Value::Handle(kernel.vertex_by_coordinates(coordinates).unwrap())
    }

    #[test]
    fn test_shorter_lane_is_repeated() {
        let kernel = MockKernel::new();
        let origin = point(&kernel, [0.0, 0.0, 0.0]);
        let targets = vec![
            point(&kernel, [3.0, 4.0, 0.0]),
            point(&kernel, [0.0, 0.0, 2.0]),
            point(&kernel, [1.0, 0.0, 0.0]),
        ];
        let inputs = NodeInputs::new()
            .with_socket("Vertex", Ragged::item(origin))
            .with_socket("Topology", Ragged::list(targets));

        let outputs = process_distance(&kernel, &inputs).unwrap();
        assert_eq!(
            outputs.get("Distance").unwrap().clone().flattened().unwrap(),
            vec![Value::Float(5.0), Value::Float(2.0), Value::Float(1.0)]
        );
    }

    #[test]
    fn test_non_vertex_is_a_wrong_type_failure() {
        let kernel = MockKernel::new();
        let a = kernel.vertex_by_coordinates([0.0, 0.0, 0.0]).unwrap();
        let b = kernel.vertex_by_coordinates([1.0, 0.0, 0.0]).unwrap();
        let (va, vb) = (
            kernel.narrow(a).unwrap().into_vertex().unwrap(),
            kernel.narrow(b).unwrap().into_vertex().unwrap(),
        );
        let edge = kernel.edge_by_vertices(&va, &vb).unwrap();

        let err = distance_tuple(&kernel, &[Some(Value::Handle(edge)), Some(Value::Handle(a))]).unwrap_err();
        assert!(matches!(
            err,
            NodeError::KernelOperationFailed {
                source: KernelError::WrongType { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_failure_becomes_none() {
        let kernel = MockKernel::new();
        let origin = point(&kernel, [0.0, 0.0, 0.0]);
        let inputs = NodeInputs::new()
            .with_socket("Vertex", Ragged::list(vec![origin.clone(), Value::Float(1.0), origin]))
            .with_socket("Topology", Ragged::item(point(&kernel, [0.0, 2.0, 0.0])));
        let outputs = process_distance(&kernel, &inputs).unwrap();
        assert_eq!(
            outputs.get("Distance").unwrap().clone().flattened().unwrap(),
            vec![Value::Float(2.0), Value::None, Value::Float(2.0)]
        );
    }
}

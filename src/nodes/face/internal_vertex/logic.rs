//! Face.InternalVertex operations

use crate::error::{NodeError, NodeResult};
use crate::kernel::Kernel;
use crate::nodes::batch::{into_socket, run_batch};
use crate::nodes::interface::{NodeInputs, NodeOutputs, Value};
use crate::ragged::Ragged;
use crate::topology::{Face, TypedHandle};

pub const NODE_TYPE: &str = "Face.InternalVertex";

pub fn process_internal_vertex(kernel: &dyn Kernel, inputs: &NodeInputs) -> NodeResult<NodeOutputs> {
    let Some(socket) = inputs.socket("Face") else {
        return Ok(NodeOutputs::new().with("Vertex", Ragged::empty()));
    };
    let faces = socket.clone().flattened()?;
    let results = run_batch(NODE_TYPE, faces, |value| internal_vertex(kernel, &value));
    Ok(NodeOutputs::new().with("Vertex", into_socket(results)))
}

pub fn internal_vertex(kernel: &dyn Kernel, value: &Value) -> NodeResult<TypedHandle> {
    let face = as_face(kernel, value)?;
    let vertex = kernel
        .internal_vertex(&face)
        .map_err(NodeError::kernel(NODE_TYPE))?;
    kernel.narrow(vertex).map_err(NodeError::kernel(NODE_TYPE))
}

fn as_face(kernel: &dyn Kernel, value: &Value) -> NodeResult<Face> {
    let handle = value.as_handle().ok_or_else(|| {
        NodeError::InvalidInput(format!("Face expects a face, got {}", value.type_name()))
    })?;
    kernel
        .narrow(handle)
        .and_then(TypedHandle::into_face)
        .map_err(NodeError::kernel(NODE_TYPE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::MockKernel;
    use crate::topology::Vertex;

    fn triangle(kernel: &MockKernel) -> Value {
        let corners: Vec<Vertex> = [[0.0, 0.0, 0.0], [3.0, 0.0, 0.0], [0.0, 3.0, 0.0]]
            .into_iter()
            .map(|c| {
                let handle = kernel.vertex_by_coordinates(c).unwrap();
                kernel.narrow(handle).unwrap().into_vertex().unwrap()
            })
            .collect();
        let edges: Vec<_> = (0..3)
            .map(|i| {
                let handle = kernel.edge_by_vertices(&corners[i], &corners[(i + 1) % 3]).unwrap();
                kernel.narrow(handle).unwrap().into_edge().unwrap()
            })
            .collect();
        let wire = kernel.wire_by_edges(&edges).unwrap();
        let wire = kernel.narrow(wire).unwrap().into_wire().unwrap();
        Value::Handle(kernel.face_by_external_boundary(&wire).unwrap())
    }

    #[test]
    fn test_vertex_inside_triangle() {
        let kernel = MockKernel::new();
        let inputs = NodeInputs::new().with_socket("Face", Ragged::item(triangle(&kernel)));
        let outputs = process_internal_vertex(&kernel, &inputs).unwrap();

        let values = outputs.get("Vertex").unwrap().clone().flattened().unwrap();
        let vertex = kernel
            .narrow(values[0].as_handle().unwrap())
            .unwrap()
            .into_vertex()
            .unwrap();
        assert_eq!(kernel.vertex_coordinates(&vertex).unwrap(), [1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_nested_faces_are_flattened() {
        let kernel = MockKernel::new();
        let faces = Ragged::List(vec![
            Ragged::list(vec![triangle(&kernel)]),
            Ragged::List(vec![Ragged::list(vec![triangle(&kernel), Value::None])]),
        ]);
        let outputs = process_internal_vertex(&kernel, &NodeInputs::new().with_socket("Face", faces)).unwrap();
        let values = outputs.get("Vertex").unwrap().clone().flattened().unwrap();
        assert_eq!(values.len(), 3);
        assert!(values[0].as_handle().is_some());
        assert!(values[1].as_handle().is_some());
        assert_eq!(values[2], Value::None);
    }
}

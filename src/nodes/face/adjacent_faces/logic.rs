//! Face.AdjacentFaces operations

use log::debug;

use crate::error::{NodeError, NodeResult};
use crate::kernel::Kernel;
use crate::nodes::batch::{collect_socket, run_batch};
use crate::nodes::interface::{NodeInputs, NodeOutputs, Value};
use crate::ragged::Ragged;
use crate::topology::Handle;

pub const NODE_TYPE: &str = "Face.AdjacentFaces";

pub fn process_adjacent_faces(kernel: &dyn Kernel, inputs: &NodeInputs) -> NodeResult<NodeOutputs> {
    let Some(socket) = inputs.socket("Face") else {
        return Ok(NodeOutputs::new().with("Faces", Ragged::empty()));
    };
    let faces = socket.clone().flattened()?;
    let results = run_batch(NODE_TYPE, faces, |value| adjacent_faces(kernel, &value));
    let socket = collect_socket(results, |neighbours| {
        Ragged::list(neighbours.into_iter().map(Value::Handle))
    });
    Ok(NodeOutputs::new().with("Faces", socket))
}

/// Faces sharing an edge with `value`. Topologies that are not faces have
/// no neighbours.
pub fn adjacent_faces(kernel: &dyn Kernel, value: &Value) -> NodeResult<Vec<Handle>> {
    let handle = value.as_handle().ok_or_else(|| {
        NodeError::InvalidInput(format!("Face expects a face, got {}", value.type_name()))
    })?;
    let typed = kernel.narrow(handle).map_err(NodeError::kernel(NODE_TYPE))?;
    let Some(face) = typed.as_face() else {
        debug!("{NODE_TYPE}: {} is a {}, not a face", handle, typed.topology_type());
        return Ok(Vec::new());
    };
    kernel
        .adjacent_faces(face)
        .map_err(NodeError::kernel(NODE_TYPE))
}

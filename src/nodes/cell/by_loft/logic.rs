//! Cell.ByLoft operations
//!
//! Each first-level group of the Wires socket is one loft. Consecutive wire
//! pairs are lofted into cells and the pieces are unioned, so a group of
//! three or more sections yields a cell complex.

use log::debug;

use crate::error::{NodeError, NodeResult};
use crate::kernel::Kernel;
use crate::nodes::batch::{into_socket, run_batch};
use crate::nodes::interface::{NodeInputs, NodeOutputs, Value};
use crate::ragged::{Ragged, DEFAULT_MAX_DEPTH};
use crate::topology::{TypedHandle, Wire};

pub const NODE_TYPE: &str = "Cell.ByLoft";

pub fn process_by_loft(kernel: &dyn Kernel, inputs: &NodeInputs) -> NodeResult<NodeOutputs> {
    let Some(socket) = inputs.socket("Wires") else {
        return Ok(NodeOutputs::new().with("Cell", Ragged::empty()));
    };
    let groups = socket.clone().outer_lists(DEFAULT_MAX_DEPTH)?;
    debug!("{NODE_TYPE}: {} wire groups", groups.len());

    let results = run_batch(NODE_TYPE, groups, |group| loft_group(kernel, &group));
    Ok(NodeOutputs::new().with("Cell", into_socket(results)))
}

/// Loft one ordered group of cross sections
pub fn loft_group(kernel: &dyn Kernel, group: &[Value]) -> NodeResult<TypedHandle> {
    let wires = group
        .iter()
        .map(|value| as_wire(kernel, value))
        .collect::<NodeResult<Vec<Wire>>>()?;
    if wires.len() < 2 {
        return Err(NodeError::InvalidInput(format!(
            "lofting needs at least two wires, got {}",
            wires.len()
        )));
    }

    let mut result = None;
    for pair in wires.windows(2) {
        let piece = kernel
            .cell_by_loft(pair)
            .map_err(NodeError::kernel(NODE_TYPE))?;
        result = Some(match result {
            None => piece,
            Some(previous) => kernel
                .union(previous, piece, false)
                .map_err(NodeError::kernel("Topology.Union"))?,
        });
    }

    let handle = result.ok_or_else(|| NodeError::InvalidInput("no wires to loft".to_string()))?;
    kernel.narrow(handle).map_err(NodeError::kernel(NODE_TYPE))
}

fn as_wire(kernel: &dyn Kernel, value: &Value) -> NodeResult<Wire> {
    let handle = value.as_handle().ok_or_else(|| {
        NodeError::InvalidInput(format!("Wires expects wires, got {}", value.type_name()))
    })?;
    kernel
        .narrow(handle)
        .and_then(TypedHandle::into_wire)
        .map_err(NodeError::kernel(NODE_TYPE))
}

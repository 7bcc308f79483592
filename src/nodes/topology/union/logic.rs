//! Topology.Union operations

use log::debug;

use super::parameters::UnionParameters;
use crate::error::{NodeError, NodeResult};
use crate::kernel::Kernel;
use crate::nodes::batch::{into_socket, run_batch};
use crate::nodes::interface::{tuple_bool, tuple_handle, NodeInputs, NodeOutputs, Value};
use crate::ragged::Ragged;
use crate::replication::align;
use crate::topology::TypedHandle;

pub const NODE_TYPE: &str = "Topology.Union";

pub fn process_union(kernel: &dyn Kernel, inputs: &NodeInputs) -> NodeResult<NodeOutputs> {
    let empty = NodeOutputs::new().with("Topology", Ragged::empty());
    if !inputs.any_linked() {
        return Ok(empty);
    }

    let params: UnionParameters = inputs.params(NODE_TYPE)?;
    let lanes = vec![
        inputs.required_lane("Topology A")?,
        inputs.required_lane("Topology B")?,
        inputs.lane(
            "Transfer Dictionary",
            Value::Bool(params.transfer_dictionary),
        )?,
    ];
    if lanes.iter().any(Vec::is_empty) {
        debug!("{NODE_TYPE}: an input is empty, nothing to do");
        return Ok(empty);
    }

    let batch = align(&lanes, params.replication)?;
    let results = run_batch(NODE_TYPE, batch, |tuple| union_tuple(kernel, &tuple));
    Ok(NodeOutputs::new().with("Topology", into_socket(results)))
}

/// Union one `(A, B, transfer)` tuple and narrow the result to its class
pub fn union_tuple(kernel: &dyn Kernel, tuple: &[Option<Value>]) -> NodeResult<TypedHandle> {
    let a = tuple_handle(tuple, 0, "Topology A")?;
    let b = tuple_handle(tuple, 1, "Topology B")?;
    let transfer = tuple_bool(tuple, 2, "Transfer Dictionary")?;

    let result = kernel
        .union(a, b, transfer)
        .map_err(NodeError::kernel(NODE_TYPE))?;
    kernel.narrow(result).map_err(NodeError::kernel(NODE_TYPE))
}

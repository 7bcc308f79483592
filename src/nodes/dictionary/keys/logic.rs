//! Dictionary.Keys operations
//!
//! Unlike the batch nodes this one keeps the shape of its input: every
//! dictionary is replaced by the list of its keys, wherever it sits.

use log::warn;

use crate::error::{NodeError, NodeResult};
use crate::kernel::Kernel;
use crate::nodes::interface::{NodeInputs, NodeOutputs, SocketData, Value};
use crate::ragged::{Ragged, DEFAULT_MAX_DEPTH};

pub const NODE_TYPE: &str = "Dictionary.Keys";

/// Keys with this suffix hold type annotations, not user data
pub const TYPE_KEY_SUFFIX: &str = "__type__";

pub fn process_keys(kernel: &dyn Kernel, inputs: &NodeInputs) -> NodeResult<NodeOutputs> {
    let Some(socket) = inputs.socket("Dictionary") else {
        return Ok(NodeOutputs::new().with("Keys", Ragged::empty()));
    };
    let depth = socket.depth();
    if depth > DEFAULT_MAX_DEPTH {
        return Err(NodeError::DepthExceeded {
            depth,
            limit: DEFAULT_MAX_DEPTH,
        });
    }

    let keys = match keys_tree(kernel, socket.clone()) {
        // A single top-level entry is unwrapped
        Ragged::List(mut children) if children.len() == 1 => children.remove(0),
        other => other,
    };
    Ok(NodeOutputs::new().with("Keys", keys))
}

/// Replace every dictionary in `data` with its keys; `None` becomes an empty list
fn keys_tree(kernel: &dyn Kernel, data: SocketData) -> SocketData {
    match data {
        Ragged::List(children) => children
            .into_iter()
            .map(|child| keys_tree(kernel, child))
            .collect(),
        Ragged::Item(Value::None) => Ragged::empty(),
        Ragged::Item(value) => match dictionary_keys(kernel, &value) {
            Ok(keys) => Ragged::list(keys.into_iter().map(Value::String)),
            Err(err) => {
                warn!("{NODE_TYPE}: {err}");
                Ragged::Item(Value::None)
            }
        },
    }
}

/// User-visible keys of one dictionary
pub fn dictionary_keys(kernel: &dyn Kernel, value: &Value) -> NodeResult<Vec<String>> {
    let handle = value.as_handle().ok_or_else(|| {
        NodeError::InvalidInput(format!("Dictionary expects a dictionary, got {}", value.type_name()))
    })?;
    let keys = kernel
        .dictionary_keys(handle)
        .map_err(NodeError::kernel(NODE_TYPE))?;
    Ok(keys
        .into_iter()
        .filter(|key| !key.ends_with(TYPE_KEY_SUFFIX))
        .collect())
}

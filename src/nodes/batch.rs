//! Per-tuple evaluation with positional error collection
//!
//! A node calls its kernel operation once per argument tuple. A failing call
//! only affects its own position: the error is logged, kept in the result
//! vector, and the loop moves on. Failed positions become `Value::None` only
//! when the results are written to a socket.

use std::time::Instant;

use log::{debug, warn};

use crate::error::NodeResult;
use crate::nodes::interface::{SocketData, Value};
use crate::ragged::Ragged;

/// Apply `op` to every tuple, in order, collecting one result per tuple.
pub fn run_batch<T, R>(
    label: &str,
    tuples: impl IntoIterator<Item = T>,
    mut op: impl FnMut(T) -> NodeResult<R>,
) -> Vec<NodeResult<R>> {
    let start = Instant::now();
    let results: Vec<NodeResult<R>> = tuples
        .into_iter()
        .enumerate()
        .map(|(index, tuple)| {
            let result = op(tuple);
            if let Err(err) = &result {
                warn!("{label}: item {index} failed: {err}");
            }
            result
        })
        .collect();
    debug!(
        "{} operation consumed {:.2} seconds ({} items, {} failed, {} in the kernel)",
        label,
        start.elapsed().as_secs_f64(),
        results.len(),
        failure_count(&results),
        kernel_failure_count(&results)
    );
    results
}

pub fn failure_count<R>(results: &[NodeResult<R>]) -> usize {
    results.iter().filter(|result| result.is_err()).count()
}

/// Failures raised by the kernel itself rather than by malformed tuples
pub fn kernel_failure_count<R>(results: &[NodeResult<R>]) -> usize {
    results
        .iter()
        .filter(|result| matches!(result, Err(err) if err.is_kernel_failure()))
        .count()
}

/// Write batch results to a socket, one item per position.
pub fn into_socket<R: Into<Value>>(results: Vec<NodeResult<R>>) -> SocketData {
    collect_socket(results, |value| Ragged::Item(value.into()))
}

/// Like `into_socket`, for operations that produce nested data per position.
pub fn collect_socket<R>(
    results: Vec<NodeResult<R>>,
    mut shape: impl FnMut(R) -> SocketData,
) -> SocketData {
    results
        .into_iter()
        .map(|result| match result {
            Ok(value) => shape(value),
            Err(_) => Ragged::Item(Value::None),
        })
        .collect()
}

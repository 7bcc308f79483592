//! Error types for replication, topology dispatch and node evaluation

use thiserror::Error;

use crate::kernel::KernelError;

/// Convenience alias for results produced by the node layer.
pub type NodeResult<T> = std::result::Result<T, NodeError>;

#[derive(Error, Debug)]
pub enum NodeError {
    /// Empty lanes, malformed socket values, incomplete argument tuples
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A single kernel call failed. Scoped to one tuple of a batch.
    #[error("{operation} failed: {source}")]
    KernelOperationFailed {
        operation: &'static str,
        #[source]
        source: KernelError,
    },

    #[error("input nesting depth {depth} exceeds the limit of {limit}")]
    DepthExceeded { depth: usize, limit: usize },

    #[error("missing input socket '{0}'")]
    MissingInput(String),

    #[error("unknown node type '{0}'")]
    UnknownNodeType(String),

    #[error("cycle detected in node graph")]
    Cycle,

    #[error("invalid parameters for {node}: {source}")]
    Params {
        node: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed graph description: {0}")]
    Json(#[from] serde_json::Error),
}

impl NodeError {
    /// Build a mapper that tags a kernel error with the operation that raised it.
    ///
    /// ```ignore
    /// kernel.union(a, b, false).map_err(NodeError::kernel("Topology.Union"))?;
    /// ```
    pub fn kernel(operation: &'static str) -> impl FnOnce(KernelError) -> NodeError {
        move |source| NodeError::KernelOperationFailed { operation, source }
    }

    /// True when the geometry kernel rejected the operation, as opposed to
    /// the node receiving malformed input
    pub fn is_kernel_failure(&self) -> bool {
        matches!(self, NodeError::KernelOperationFailed { .. })
    }
}

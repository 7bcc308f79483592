//! Topologic nodes library
//!
//! Node adapters over a non-manifold topology kernel: argument replication,
//! class recovery for kernel handles, and a small graph engine that runs
//! node graphs described in JSON.

pub mod error;
pub mod kernel;
pub mod nodes;
pub mod ragged;
pub mod replication;
pub mod topology;

// Re-export commonly used types
pub use error::{NodeError, NodeResult};
pub use kernel::{Kernel, KernelError, KernelResult, MockKernel};
pub use nodes::{builtin_registry, NodeGraph, NodeGraphEngine, NodeInputs, NodeOutputs, NodeRegistry, Value};
pub use ragged::Ragged;
pub use replication::{align, Batch, Replication, Tuple};
pub use topology::{narrow, Handle, TopologyType, TypedHandle};

//! Seam between the node layer and the topological modeling kernel
//!
//! Nodes never reach into kernel internals. Everything they need is on the
//! `Kernel` trait: constructors, Booleans, queries and graph search. Inputs
//! that must be of a particular class are typed (`&Face`, `&Vertex`, ...);
//! results come back as plain `Handle`s and are narrowed by the caller.

pub mod mock;

use std::time::Duration;

use thiserror::Error;

use crate::topology::{narrow, Edge, Face, Handle, TopologyType, TypedHandle, Vertex, Wire};

pub use mock::MockKernel;

pub type KernelResult<T> = std::result::Result<T, KernelError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    #[error("unknown handle {0}")]
    UnknownHandle(Handle),

    #[error("expected a {expected}, found a {found}")]
    WrongType {
        expected: TopologyType,
        found: TopologyType,
    },

    /// For kernel objects outside the topology hierarchy (graphs, dictionaries)
    #[error("handle {handle} is not a {expected}")]
    NotA {
        handle: Handle,
        expected: &'static str,
    },

    #[error("{0}")]
    Construction(String),

    #[error("time limit of {0:?} exceeded")]
    TimedOut(Duration),
}

/// Operations the node layer needs from a modeling kernel
pub trait Kernel {
    /// Integer class tag of `handle` (1 = vertex ... 128 = cluster)
    fn type_tag(&self, handle: Handle) -> KernelResult<u32>;

    /// Look up the class of `handle` and narrow it
    fn narrow(&self, handle: Handle) -> KernelResult<TypedHandle> {
        Ok(narrow(handle, self.type_tag(handle)?))
    }

    fn vertex_by_coordinates(&self, coordinates: [f64; 3]) -> KernelResult<Handle>;

    fn vertex_coordinates(&self, vertex: &Vertex) -> KernelResult<[f64; 3]>;

    fn edge_by_vertices(&self, start: &Vertex, end: &Vertex) -> KernelResult<Handle>;

    /// Chain edges, in order, into a wire
    fn wire_by_edges(&self, edges: &[Edge]) -> KernelResult<Handle>;

    /// Face bounded by a closed wire
    fn face_by_external_boundary(&self, boundary: &Wire) -> KernelResult<Handle>;

    fn shell_by_faces(&self, faces: &[Face]) -> KernelResult<Handle>;

    /// Cell enclosed by `faces`; the faces must form a closed shell
    fn cell_by_faces(&self, faces: &[Face]) -> KernelResult<Handle>;

    fn cell_complex_by_faces(&self, faces: &[Face], tolerance: f64) -> KernelResult<Handle>;

    fn cluster_by_topologies(&self, members: &[Handle]) -> KernelResult<Handle>;

    /// Cell lofted through closed, ordered cross-section wires
    fn cell_by_loft(&self, wires: &[Wire]) -> KernelResult<Handle>;

    /// Boolean union. With `transfer_dictionary` the inputs' dictionaries are
    /// merged onto the result.
    fn union(&self, a: Handle, b: Handle, transfer_dictionary: bool) -> KernelResult<Handle>;

    fn distance(&self, vertex: &Vertex, topology: Handle) -> KernelResult<f64>;

    /// A vertex guaranteed to lie inside `face`
    fn internal_vertex(&self, face: &Face) -> KernelResult<Handle>;

    fn adjacent_faces(&self, face: &Face) -> KernelResult<Vec<Handle>>;

    /// Keys of a dictionary, in insertion order
    fn dictionary_keys(&self, dictionary: Handle) -> KernelResult<Vec<String>>;

    /// Shortest paths between two graph vertices, as wires.
    ///
    /// The kernel is responsible for honoring `time_limit`.
    fn shortest_paths(
        &self,
        graph: Handle,
        start: &Vertex,
        end: &Vertex,
        vertex_key: &str,
        edge_key: &str,
        time_limit: Duration,
    ) -> KernelResult<Vec<Handle>>;
}

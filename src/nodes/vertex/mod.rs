//! Vertex nodes

pub mod distance;

pub use distance::VertexDistanceNodeFactory;

//! Nodes working on any topology class

pub mod by_geometry;
pub mod union;

pub use by_geometry::TopologyByGeometryNodeFactory;
pub use union::TopologyUnionNodeFactory;

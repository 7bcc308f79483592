//! Face nodes

pub mod adjacent_faces;
pub mod internal_vertex;

pub use adjacent_faces::FaceAdjacentFacesNodeFactory;
pub use internal_vertex::FaceInternalVertexNodeFactory;

//! Nodes querying Topologic graphs

pub mod shortest_paths;

pub use shortest_paths::GraphShortestPathsNodeFactory;

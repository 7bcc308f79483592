//! Cell nodes

pub mod by_loft;

pub use by_loft::CellByLoftNodeFactory;

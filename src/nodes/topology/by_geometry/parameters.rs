//! Topology.ByGeometry parameters

use serde::Deserialize;

pub const DEFAULT_TOLERANCE: f64 = 0.0001;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ByGeometryParameters {
    pub tol: f64,
}

impl Default for ByGeometryParameters {
    fn default() -> Self {
        Self {
            tol: DEFAULT_TOLERANCE,
        }
    }
}

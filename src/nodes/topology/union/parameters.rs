//! Topology.Union parameters

use serde::Deserialize;

use crate::replication::Replication;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct UnionParameters {
    /// Used when the Transfer Dictionary socket is not linked
    pub transfer_dictionary: bool,
    pub replication: Replication,
}

//! Graph.ShortestPaths parameters

use serde::Deserialize;

use crate::replication::Replication;

pub const DEFAULT_TIME_LIMIT: u64 = 10;
pub const MIN_TIME_LIMIT: u64 = 1;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ShortestPathsParameters {
    pub vertex_key: String,
    pub edge_key: String,
    /// Seconds
    pub time_limit: u64,
    pub replication: Replication,
}

impl Default for ShortestPathsParameters {
    fn default() -> Self {
        Self {
            vertex_key: String::new(),
            edge_key: String::new(),
            time_limit: DEFAULT_TIME_LIMIT,
            replication: Replication::Default,
        }
    }
}

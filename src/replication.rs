//! Replication policies for aligning ragged input lanes
//!
//! A node with several list inputs calls its kernel operation once per
//! argument tuple. When the input lists have different lengths, the
//! replication policy decides how elements are paired up:
//!
//! - `Repeat` (and `Default`): short lanes repeat their last element
//! - `Trim`: every lane is cut to the shortest one
//! - `Iterate`: short lanes cycle from the start
//! - `Interlace`: no padding or truncation, positions are merged as they are
//!
//! Under `Repeat`, `Trim` and `Iterate` a lane holding a single value is a
//! constant and is broadcast to every row.
//!
//! `align` is the entry point. The column-major helpers (`repeat`, `trim`,
//! `iterate`) and `transpose` are public for nodes that want to reshape
//! lanes without building a `Batch`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{NodeError, NodeResult};

/// Alignment strategy applied to ragged lanes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Replication {
    /// Alias for `Repeat`
    #[default]
    Default,
    Trim,
    Iterate,
    Repeat,
    Interlace,
}

impl Replication {
    /// Every policy, in the order a node editor lists them
    pub const ALL: [Replication; 5] = [
        Replication::Default,
        Replication::Trim,
        Replication::Iterate,
        Replication::Repeat,
        Replication::Interlace,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Replication::Default => "Default",
            Replication::Trim => "Trim",
            Replication::Iterate => "Iterate",
            Replication::Repeat => "Repeat",
            Replication::Interlace => "Interlace",
        }
    }
}

impl fmt::Display for Replication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Replication {
    type Err = NodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Replication::ALL
            .into_iter()
            .find(|policy| policy.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| NodeError::InvalidInput(format!("unknown replication policy '{s}'")))
    }
}

/// One argument tuple. Slot `k` always comes from lane `k`; a slot is
/// `None` when an interlaced lane has run out.
pub type Tuple<T> = Vec<Option<T>>;

/// Aligned argument tuples, one row per kernel call
///
/// Every row has one slot per lane. Rows produced by `Repeat`, `Trim` and
/// `Iterate` fill every slot. `Interlace` rows leave the slots of exhausted
/// lanes empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch<T> {
    rows: Vec<Tuple<T>>,
    arity: usize,
}

impl<T> Batch<T> {
    /// Number of argument tuples
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of lanes the batch was built from
    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn rows(&self) -> &[Tuple<T>] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tuple<T>> {
        self.rows.iter()
    }

    /// True when every slot of every row holds a value
    pub fn is_rectangular(&self) -> bool {
        self.rows.iter().flatten().all(Option::is_some)
    }

    /// Interleaved flat sequence: row 0 in lane order, then row 1, and so on.
    /// Empty slots are skipped.
    pub fn flatten(self) -> Vec<T> {
        self.rows.into_iter().flatten().flatten().collect()
    }

    pub fn into_rows(self) -> Vec<Tuple<T>> {
        self.rows
    }
}

impl<T> IntoIterator for Batch<T> {
    type Item = Tuple<T>;
    type IntoIter = std::vec::IntoIter<Tuple<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Batch<T> {
    type Item = &'a Tuple<T>;
    type IntoIter = std::slice::Iter<'a, Tuple<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Align `lanes` into a batch of argument tuples under `policy`.
///
/// Fails with `InvalidInput` when there are no lanes or any lane is empty.
pub fn align<T: Clone>(lanes: &[Vec<T>], policy: Replication) -> NodeResult<Batch<T>> {
    if lanes.is_empty() {
        return Err(NodeError::InvalidInput(
            "replication needs at least one lane".to_string(),
        ));
    }
    if let Some(index) = lanes.iter().position(Vec::is_empty) {
        return Err(NodeError::InvalidInput(format!("lane {index} is empty")));
    }

    let columns = match policy {
        Replication::Default | Replication::Repeat => repeat(lanes),
        Replication::Trim => trim(lanes),
        Replication::Iterate => iterate(lanes),
        Replication::Interlace => {
            return Ok(Batch {
                rows: interlace(lanes),
                arity: lanes.len(),
            })
        }
    };
    let rows = transpose(&columns)
        .into_iter()
        .map(|row| row.into_iter().map(Some).collect())
        .collect();

    Ok(Batch {
        rows,
        arity: lanes.len(),
    })
}

fn max_len<T>(lanes: &[Vec<T>]) -> usize {
    lanes.iter().map(Vec::len).max().unwrap_or(0)
}

/// Pad every lane with its own last element up to the longest lane.
///
/// Empty lanes have nothing to repeat and are returned empty.
pub fn repeat<T: Clone>(lanes: &[Vec<T>]) -> Vec<Vec<T>> {
    let target = max_len(lanes);
    lanes
        .iter()
        .map(|lane| {
            let mut padded = lane.clone();
            if let Some(last) = lane.last() {
                padded.resize(target, last.clone());
            }
            padded
        })
        .collect()
}

/// Truncate every lane to the shortest lane.
///
/// Single-value lanes are constants: they do not count towards the shortest
/// length and are repeated up to it.
pub fn trim<T: Clone>(lanes: &[Vec<T>]) -> Vec<Vec<T>> {
    let target = lanes
        .iter()
        .map(Vec::len)
        .filter(|&len| len != 1)
        .min()
        .unwrap_or(1);
    lanes
        .iter()
        .map(|lane| match lane.as_slice() {
            [constant] => vec![constant.clone(); target],
            _ => lane[..target].to_vec(),
        })
        .collect()
}

/// Cycle every lane independently up to the longest lane.
pub fn iterate<T: Clone>(lanes: &[Vec<T>]) -> Vec<Vec<T>> {
    let target = max_len(lanes);
    lanes
        .iter()
        .map(|lane| lane.iter().cycle().take(target).cloned().collect())
        .collect()
}

/// Merge lanes position by position into rows. Lanes that have already run
/// out leave their slot empty, so slot `k` of every row belongs to lane `k`.
pub fn interlace<T: Clone>(lanes: &[Vec<T>]) -> Vec<Tuple<T>> {
    (0..max_len(lanes))
        .map(|index| lanes.iter().map(|lane| lane.get(index).cloned()).collect())
        .collect()
}

/// Convert column-major lanes into row-major tuples.
///
/// The result has as many rows as the shortest column.
pub fn transpose<T: Clone>(columns: &[Vec<T>]) -> Vec<Vec<T>> {
    let rows = columns.iter().map(Vec::len).min().unwrap_or(0);
    (0..rows)
        .map(|index| columns.iter().map(|column| column[index].clone()).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rows of a fully populated batch
    fn rows<T: Clone>(lanes: &[Vec<T>], policy: Replication) -> Vec<Vec<T>> {
        let batch = align(lanes, policy).expect("lanes are valid");
        assert!(batch.is_rectangular(), "policy {policy} left empty slots");
        batch
            .into_rows()
            .into_iter()
            .map(|row| row.into_iter().flatten().collect())
            .collect()
    }

    #[test]
    fn test_equal_lanes_zip_under_every_policy() {
        let lanes = vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]];
        for policy in Replication::ALL {
            assert_eq!(
                rows(&lanes, policy),
                vec![vec![1, 4, 7], vec![2, 5, 8], vec![3, 6, 9]],
                "policy {policy}"
            );
        }
    }

    #[test]
    fn test_repeat_pads_with_last_element() {
        let lanes = vec![vec![1, 2, 3], vec![9]];
        let expected = vec![vec![1, 9], vec![2, 9], vec![3, 9]];
        assert_eq!(rows(&lanes, Replication::Repeat), expected);
        assert_eq!(rows(&lanes, Replication::Default), expected);
    }

    #[test]
    fn test_trim_cuts_to_shortest() {
        let lanes = vec![vec![1, 2, 3], vec![9, 8]];
        assert_eq!(rows(&lanes, Replication::Trim), vec![vec![1, 9], vec![2, 8]]);
    }

    #[test]
    fn test_trim_ignores_constants_when_cutting() {
        let lanes = vec![vec![1, 2, 3, 4], vec![7], vec![9, 8, 6]];
        assert_eq!(
            rows(&lanes, Replication::Trim),
            vec![vec![1, 7, 9], vec![2, 7, 8], vec![3, 7, 6]]
        );
        assert_eq!(rows(&[vec![1], vec![2]], Replication::Trim), vec![vec![1, 2]]);
    }

    #[test]
    fn test_iterate_cycles_short_lanes() {
        let lanes = vec![vec![1, 2, 3, 4], vec![9, 8]];
        assert_eq!(
            rows(&lanes, Replication::Iterate),
            vec![vec![1, 9], vec![2, 8], vec![3, 9], vec![4, 8]]
        );
    }

    #[test]
    fn test_single_element_lane_is_constant() {
        let lanes = vec![vec![1, 2, 3], vec![7]];
        let expected = vec![vec![1, 7], vec![2, 7], vec![3, 7]];
        assert_eq!(rows(&lanes, Replication::Repeat), expected);
        assert_eq!(rows(&lanes, Replication::Iterate), expected);
        assert_eq!(rows(&lanes, Replication::Trim), expected);
    }

    #[test]
    fn test_interlace_keeps_every_value() {
        let lanes = vec![vec![1, 2, 3], vec![9]];
        let batch = align(&lanes, Replication::Interlace).unwrap();
        assert_eq!(batch.arity(), 2);
        assert!(!batch.is_rectangular());
        assert_eq!(
            batch.rows(),
            &[vec![Some(1), Some(9)], vec![Some(2), None], vec![Some(3), None]]
        );
        assert_eq!(batch.flatten(), vec![1, 9, 2, 3]);
    }

    #[test]
    fn test_interlace_slots_follow_their_lane() {
        let lanes = vec![vec![1], vec![5, 6, 7], vec![8, 9]];
        let batch = align(&lanes, Replication::Interlace).unwrap();
        assert_eq!(
            batch.into_rows(),
            vec![
                vec![Some(1), Some(5), Some(8)],
                vec![None, Some(6), Some(9)],
                vec![None, Some(7), None],
            ]
        );
    }

    #[test]
    fn test_align_is_idempotent_on_aligned_lanes() {
        let lanes = vec![vec![1, 2], vec![3, 4]];
        for policy in [Replication::Trim, Replication::Repeat] {
            let once = rows(&lanes, policy);
            let columns = transpose(&once);
            assert_eq!(rows(&columns, policy), once);
        }
    }

    #[test]
    fn test_empty_lane_is_rejected() {
        let lanes: Vec<Vec<i32>> = vec![vec![], vec![1, 2]];
        assert!(matches!(
            align(&lanes, Replication::Repeat),
            Err(NodeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_no_lanes_is_rejected() {
        let lanes: Vec<Vec<i32>> = Vec::new();
        for policy in Replication::ALL {
            assert!(matches!(align(&lanes, policy), Err(NodeError::InvalidInput(_))));
        }
    }

    #[test]
    fn test_lanes_are_not_mutated() {
        let lanes = vec![vec![1], vec![1, 2, 3]];
        let _ = align(&lanes, Replication::Repeat).unwrap();
        assert_eq!(lanes, vec![vec![1], vec![1, 2, 3]]);
    }

    #[test]
    fn test_transpose_stops_at_shortest_column() {
        let columns = vec![vec![1, 2, 3], vec![4, 5]];
        assert_eq!(transpose(&columns), vec![vec![1, 4], vec![2, 5]]);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("trim".parse::<Replication>().unwrap(), Replication::Trim);
        assert_eq!(" Interlace ".parse::<Replication>().unwrap(), Replication::Interlace);
        assert!("cross".parse::<Replication>().is_err());

        let policy: Replication = serde_json::from_str("\"Iterate\"").unwrap();
        assert_eq!(policy, Replication::Iterate);
        assert_eq!(Replication::default(), Replication::Default);
    }
}

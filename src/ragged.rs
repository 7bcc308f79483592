//! Ragged nested lists as they arrive on node sockets
//!
//! Sockets carry arbitrarily nested lists. Nodes that work element-wise
//! flatten them first, but only down to `DEFAULT_MAX_DEPTH` levels so that a
//! malformed input fails loudly instead of recursing without bound.
//!
//! Depth contract: an item has depth 0, a list has depth one more than its
//! deepest child, and an empty list has depth 1.

use serde::{Deserialize, Serialize};

use crate::error::{NodeError, NodeResult};

/// Maximum nesting accepted by `Ragged::flattened`
pub const DEFAULT_MAX_DEPTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ragged<T> {
    List(Vec<Ragged<T>>),
    Item(T),
}

impl<T> Ragged<T> {
    pub fn item(value: T) -> Self {
        Ragged::Item(value)
    }

    /// A flat list of items
    pub fn list(values: impl IntoIterator<Item = T>) -> Self {
        Ragged::List(values.into_iter().map(Ragged::Item).collect())
    }

    pub fn empty() -> Self {
        Ragged::List(Vec::new())
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Ragged::List(_))
    }

    pub fn depth(&self) -> usize {
        match self {
            Ragged::Item(_) => 0,
            Ragged::List(children) => 1 + children.iter().map(Ragged::depth).max().unwrap_or(0),
        }
    }

    /// Collect every item depth-first, left to right.
    ///
    /// Fails with `DepthExceeded` when the tree is nested deeper than
    /// `max_depth`.
    pub fn flatten(self, max_depth: usize) -> NodeResult<Vec<T>> {
        let depth = self.depth();
        if depth > max_depth {
            return Err(NodeError::DepthExceeded {
                depth,
                limit: max_depth,
            });
        }
        let mut items = Vec::new();
        self.collect_into(&mut items);
        Ok(items)
    }

    /// `flatten` with `DEFAULT_MAX_DEPTH`
    pub fn flattened(self) -> NodeResult<Vec<T>> {
        self.flatten(DEFAULT_MAX_DEPTH)
    }

    fn collect_into(self, items: &mut Vec<T>) {
        match self {
            Ragged::Item(value) => items.push(value),
            Ragged::List(children) => {
                for child in children {
                    child.collect_into(items);
                }
            }
        }
    }

    /// Split into first-level groups, each flattened.
    ///
    /// A lone item, or a list whose first element is an item, is treated as
    /// a single group. Otherwise every child of the outer list is a group.
    pub fn outer_lists(self, max_depth: usize) -> NodeResult<Vec<Vec<T>>> {
        match self {
            Ragged::Item(value) => Ok(vec![vec![value]]),
            Ragged::List(children) => {
                let nested = children.first().is_some_and(Ragged::is_list);
                if nested {
                    children
                        .into_iter()
                        .map(|child| child.flatten(max_depth.saturating_sub(1)))
                        .collect()
                } else {
                    Ok(vec![Ragged::List(children).flatten(max_depth)?])
                }
            }
        }
    }

    /// Apply `f` to every item, keeping the shape.
    pub fn map_items<U>(self, f: &mut impl FnMut(T) -> U) -> Ragged<U> {
        match self {
            Ragged::Item(value) => Ragged::Item(f(value)),
            Ragged::List(children) => {
                Ragged::List(children.into_iter().map(|child| child.map_items(f)).collect())
            }
        }
    }
}

impl<T> From<Vec<T>> for Ragged<T> {
    fn from(values: Vec<T>) -> Self {
        Ragged::list(values)
    }
}

impl<T> FromIterator<Ragged<T>> for Ragged<T> {
    fn from_iter<I: IntoIterator<Item = Ragged<T>>>(iter: I) -> Self {
        Ragged::List(iter.into_iter().collect())
    }
}

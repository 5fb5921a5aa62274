//! Node addressing by child-index path
//!
//! A `NodePath` is the sequence of child indices leading from a root element
//! (normally `w:body`) to a node. Paths compare in document order, which the
//! walker and the comment anchoring code rely on.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Location of a node relative to a root element.
///
/// Indices count every child node (elements, text, comments), so a path stays
/// valid only as long as no sibling before it on the way down is inserted or
/// removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// The path of the root element itself
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Build a path from raw child indices
    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// Path of the `index`-th child of this node
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Path of the parent node, `None` for the root
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Index of this node within its parent
    pub fn last_index(&self) -> Option<usize> {
        self.0.last().copied()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "/");
        }
        for index in &self.0 {
            write!(f, "/{}", index)?;
        }
        Ok(())
    }
}

use std::fmt;

use serde::Serialize;

macro_rules! arena_index {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(usize);

        impl $name {
            pub(crate) fn new(index: usize) -> Self {
                Self(index)
            }

            /// Zero-based position.
            #[must_use]
            pub fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

arena_index!(
    /// Column of the feature matrix a split tests.
    FeatureIndex
);

arena_index!(
    /// Slot in a tree's node arena.
    NodeIndex
);

impl NodeIndex {
    /// The root is always pushed first.
    pub const ROOT: Self = Self(0);
}

/// Gini impurity, in `[0, 1 - 1/n_classes]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Impurity(f64);

impl Impurity {
    /// Impurity of a pure or empty node.
    pub const ZERO: Self = Self(0.0);

    pub(crate) fn new(value: f64) -> Self {
        Self(value)
    }

    /// The raw Gini value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Impurity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

/// One slot of a fitted tree.
///
/// A `Split` sends rows with `row[feature] <= threshold` to `left` and the
/// rest to `right`. Children always sit at higher arena slots than their
/// parent. `impurity` and `n_samples` describe the training rows that
/// reached the node; `depth` counts edges from the root.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// Interior node with exactly two children.
    Split {
        /// Column tested by this node.
        feature: FeatureIndex,
        /// Midpoint between two adjacent distinct training values.
        threshold: f64,
        /// Subtree for `row[feature] <= threshold`.
        left: NodeIndex,
        /// Subtree for `row[feature] > threshold`.
        right: NodeIndex,
        /// Gini of the rows before splitting.
        impurity: Impurity,
        /// Training rows that reached this node.
        n_samples: usize,
        /// Edges from the root.
        depth: usize,
    },
    /// Terminal node.
    Leaf {
        /// Class label predicted for every row that lands here.
        prediction: usize,
        /// Gini of the rows in this leaf; zero when pure.
        impurity: Impurity,
        /// Training rows that reached this leaf.
        n_samples: usize,
        /// Edges from the root.
        depth: usize,
    },
}

impl Node {
    fn stats(&self) -> (Impurity, usize, usize) {
        match *self {
            Node::Split {
                impurity,
                n_samples,
                depth,
                ..
            }
            | Node::Leaf {
                impurity,
                n_samples,
                depth,
                ..
            } => (impurity, n_samples, depth),
        }
    }

    /// Gini of the training rows at this node, before any split.
    #[must_use]
    pub fn impurity(&self) -> Impurity {
        self.stats().0
    }

    /// Training rows that reached this node.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.stats().1
    }

    /// Edges from the root; the root has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stats().2
    }

    /// `true` for [`Node::Leaf`].
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// `(left, right)` for a split, `None` for a leaf.
    #[must_use]
    pub fn children(&self) -> Option<(NodeIndex, NodeIndex)> {
        match *self {
            Node::Split { left, right, .. } => Some((left, right)),
            Node::Leaf { .. } => None,
        }
    }
}

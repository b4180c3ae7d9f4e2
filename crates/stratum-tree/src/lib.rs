//! Binary CART decision tree with Gini impurity splitting.
//!
//! Provides the Gini impurity metric, an exhaustive midpoint split search,
//! a depth-limited recursive tree builder stored in a node arena, and a
//! [`DecisionTreeClassifier`] that plugs into `stratum-cv` evaluation.

mod classifier;
mod data;
mod error;
mod impurity;
mod node;
mod split;
mod tree;

pub use classifier::DecisionTreeClassifier;
pub use error::TreeError;
pub use impurity::{gini, gini_from_counts, weighted_from_counts, weighted_gini};
pub use node::{FeatureIndex, Impurity, Node, NodeIndex};
pub use split::{Split, best_split};
pub use tree::{DecisionTree, DecisionTreeConfig};

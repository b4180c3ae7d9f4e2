use tracing::{debug, instrument};

use crate::data::{ClassEncoding, column_major, validate_features};
use crate::error::TreeError;
use crate::node::{Impurity, Node, NodeIndex};
use crate::split::{find_best_split, node_counts};

/// Configuration for a binary CART decision tree.
///
/// Construct via [`DecisionTreeConfig::new`], then chain `with_*` methods.
/// Values are validated when [`fit`](DecisionTreeConfig::fit) is called.
///
/// # Defaults
///
/// | Parameter           | Default |
/// |---------------------|---------|
/// | `max_depth`         | 4       |
/// | `min_samples_split` | 2       |
#[derive(Debug, Clone, serde::Serialize)]
pub struct DecisionTreeConfig {
    max_depth: usize,
    min_samples_split: usize,
}

impl DecisionTreeConfig {
    /// Create a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_depth: 4,
            min_samples_split: 2,
        }
    }

    /// Set the maximum tree depth (root is depth 0, so a depth of 1 allows a
    /// single split).
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the minimum number of samples required to attempt a split.
    #[must_use]
    pub fn with_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.min_samples_split = min_samples_split;
        self
    }

    /// Return the maximum depth.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Return the minimum samples required to split a node.
    #[must_use]
    pub fn min_samples_split(&self) -> usize {
        self.min_samples_split
    }

    /// Train a binary decision tree on the provided row-major dataset.
    ///
    /// `features[sample_idx][feature_idx]`, row-major layout.
    /// `labels[sample_idx]` is the class label; exactly two distinct values must
    /// be present, any two `usize` values are accepted.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---|---|
    /// | [`TreeError::InvalidMaxDepth`] | `max_depth` is 0 |
    /// | [`TreeError::InvalidMinSamplesSplit`] | `min_samples_split` < 2 |
    /// | [`TreeError::EmptyDataset`] | `features` is empty |
    /// | [`TreeError::LabelCountMismatch`] | `labels.len() != features.len()` |
    /// | [`TreeError::ZeroFeatures`] | rows have zero feature columns |
    /// | [`TreeError::FeatureCountMismatch`] | rows have inconsistent lengths |
    /// | [`TreeError::NonFiniteValue`] | any value is NaN or infinite |
    /// | [`TreeError::TooFewSamples`] | fewer than 2 samples |
    /// | [`TreeError::NotBinary`] | labels hold other than 2 distinct values |
    #[instrument(skip_all, fields(n_samples = features.len(), max_depth = self.max_depth))]
    pub fn fit(&self, features: &[Vec<f64>], labels: &[usize]) -> Result<DecisionTree, TreeError> {
        if self.max_depth == 0 {
            return Err(TreeError::InvalidMaxDepth { max_depth: 0 });
        }
        if self.min_samples_split < 2 {
            return Err(TreeError::InvalidMinSamplesSplit {
                min_samples_split: self.min_samples_split,
            });
        }

        let n_features = validate_features(features, labels)?;
        let n_samples = features.len();
        if n_samples < 2 {
            return Err(TreeError::TooFewSamples { n_samples });
        }

        let encoding = ClassEncoding::new(labels);
        if encoding.n_classes() != 2 {
            return Err(TreeError::NotBinary {
                classes: encoding.into_classes(),
            });
        }

        debug!(n_samples, n_features, classes = ?encoding.classes(), "fitting decision tree");

        let col_features = column_major(features, n_features);
        let sample_indices: Vec<usize> = (0..n_samples).collect();

        let mut builder = Builder {
            col_features: &col_features,
            classes: encoding.encoded(),
            labels: encoding.classes(),
            n_classes: encoding.n_classes(),
            config: self,
            arena: Vec::new(),
        };
        let root = builder.build(&sample_indices, 0);
        let nodes = builder.arena;

        debug!(root = %root, n_nodes = nodes.len(), "decision tree built");

        Ok(DecisionTree {
            nodes,
            n_features,
            classes: encoding.into_classes(),
        })
    }
}

impl Default for DecisionTreeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Recursive arena builder. Counting works on class positions; leaves are
/// written with the label value at the majority position.
struct Builder<'a> {
    col_features: &'a [Vec<f64>],
    classes: &'a [usize],
    labels: &'a [usize],
    n_classes: usize,
    config: &'a DecisionTreeConfig,
    arena: Vec<Node>,
}

impl Builder<'_> {
    /// Build the subtree over `sample_indices` and return its arena index.
    fn build(&mut self, sample_indices: &[usize], depth: usize) -> NodeIndex {
        let n_samples = sample_indices.len();
        if n_samples == 0 {
            return self.leaf(0, Impurity::ZERO, 0, depth);
        }

        let (counts, impurity) = node_counts(self.classes, sample_indices, self.n_classes);
        let majority = majority_class(&counts);

        if counts.iter().filter(|&&c| c > 0).count() == 1 {
            return self.leaf(majority, Impurity::ZERO, n_samples, depth);
        }
        if depth >= self.config.max_depth || n_samples < self.config.min_samples_split {
            return self.leaf(majority, impurity, n_samples, depth);
        }

        let Some(split) = find_best_split(self.col_features, self.classes, sample_indices, self.n_classes)
        else {
            return self.leaf(majority, impurity, n_samples, depth);
        };
        if split.impurity().value() >= impurity.value() {
            debug!(depth, n_samples, "split does not reduce impurity");
            return self.leaf(majority, impurity, n_samples, depth);
        }

        let feature = split.feature();
        let threshold = split.threshold();
        let (left_indices, right_indices) = split.into_partitions();

        // Reserve the slot so the root stays at index 0, then overwrite.
        let node_idx = self.leaf(majority, impurity, n_samples, depth);
        let left = self.build(&left_indices, depth + 1);
        let right = self.build(&right_indices, depth + 1);

        self.arena[node_idx.index()] = Node::Split {
            feature,
            threshold,
            left,
            right,
            impurity,
            n_samples,
            depth,
        };
        node_idx
    }

    fn leaf(&mut self, position: usize, impurity: Impurity, n_samples: usize, depth: usize) -> NodeIndex {
        let idx = NodeIndex::new(self.arena.len());
        self.arena.push(Node::Leaf {
            prediction: self.labels[position],
            impurity,
            n_samples,
            depth,
        });
        idx
    }
}

/// Position of the largest count; exact ties go to the lower position.
fn majority_class(counts: &[usize]) -> usize {
    let mut best = 0;
    for (idx, &count) in counts.iter().enumerate() {
        if count > counts[best] {
            best = idx;
        }
    }
    best
}

/// A fitted binary decision tree.
///
/// Nodes live in an arena with the root at [`NodeIndex::ROOT`]. Every leaf
/// predicts one of the two fitted [`classes`](DecisionTree::classes).
#[derive(Debug, Clone, serde::Serialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    n_features: usize,
    classes: Vec<usize>,
}

impl DecisionTree {
    /// Predict the class label for a single sample.
    ///
    /// Starting at the root, goes left when `sample[feature] <= threshold`
    /// and right otherwise, until a leaf is reached.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::PredictionFeatureMismatch`] when `sample.len() != n_features`.
    pub fn predict(&self, sample: &[f64]) -> Result<usize, TreeError> {
        if sample.len() != self.n_features {
            return Err(TreeError::PredictionFeatureMismatch {
                expected: self.n_features,
                got: sample.len(),
            });
        }
        Ok(self.traverse(sample))
    }

    /// Predict class labels for a batch of samples.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::PredictionFeatureMismatch`] on the first sample
    /// whose length differs from `n_features`.
    pub fn predict_batch(&self, samples: &[Vec<f64>]) -> Result<Vec<usize>, TreeError> {
        samples.iter().map(|s| self.predict(s)).collect()
    }

    /// The two class labels the tree was fitted on, ascending.
    #[must_use]
    pub fn classes(&self) -> &[usize] {
        &self.classes
    }

    /// All nodes in arena order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.nodes[NodeIndex::ROOT.index()]
    }

    /// Return the total number of nodes in the tree (both splits and leaves).
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Return the number of leaf nodes.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Return the depth of the deepest leaf. A single-leaf tree has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.is_leaf())
            .map(Node::depth)
            .max()
            .unwrap_or(0)
    }

    /// Number of features seen during fit.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Walk from the root and return the label stored in the reached leaf.
    fn traverse(&self, sample: &[f64]) -> usize {
        let mut idx = NodeIndex::ROOT;
        loop {
            match &self.nodes[idx.index()] {
                Node::Leaf { prediction, .. } => return *prediction,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    idx = if sample[feature.index()] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

//! CART decision tree with Gini impurity, used by the evaluator as a
//! comparison point for the logistic model.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::logistic::check_design;
use crate::Classifier;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionTreeParams {
    /// `None` grows until leaves are pure.
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
}

impl Default for DecisionTreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Leaf {
        /// Share of class 1 among the training rows that reached this leaf.
        probability: f64,
        samples: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    root: Node,
    n_features: usize,
}

impl DecisionTree {
    pub fn fit<R: AsRef<[f64]>>(
        x: &[R],
        y: &[u8],
        params: &DecisionTreeParams,
    ) -> Result<Self, ModelError> {
        if params.min_samples_split < 2 {
            return Err(ModelError::InvalidConfig(
                "min_samples_split must be at least 2".into(),
            ));
        }
        let n_features = check_design(x, y)?;
        let rows: Vec<&[f64]> = x.iter().map(|r| r.as_ref()).collect();
        let indices: Vec<usize> = (0..rows.len()).collect();
        let builder = Builder {
            rows: &rows,
            y,
            params,
            n_features,
        };
        Ok(Self {
            root: builder.grow(indices, 0),
            n_features,
        })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn depth(&self) -> usize {
        fn walk(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(left).max(walk(right)),
            }
        }
        walk(&self.root)
    }

    pub fn leaf_count(&self) -> usize {
        fn walk(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 1,
                Node::Split { left, right, .. } => walk(left) + walk(right),
            }
        }
        walk(&self.root)
    }

    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { probability, .. } => return *probability,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

impl Classifier for DecisionTree {
    fn name(&self) -> &str {
        "Decision Tree"
    }

    fn predict_proba(&self, row: &[f64]) -> f64 {
        DecisionTree::predict_proba(self, row)
    }
}

fn gini(positives: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let p = positives as f64 / total as f64;
    2.0 * p * (1.0 - p)
}

struct Builder<'a> {
    rows: &'a [&'a [f64]],
    y: &'a [u8],
    params: &'a DecisionTreeParams,
    n_features: usize,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

impl Builder<'_> {
    fn grow(&self, indices: Vec<usize>, depth: usize) -> Node {
        let total = indices.len();
        let positives = indices.iter().filter(|&&i| self.y[i] == 1).count();
        let leaf = Node::Leaf {
            probability: positives as f64 / total as f64,
            samples: total,
        };

        let pure = positives == 0 || positives == total;
        let depth_reached = self.params.max_depth.is_some_and(|max| depth >= max);
        if pure || depth_reached || total < self.params.min_samples_split {
            return leaf;
        }

        let parent = gini(positives, total);
        let best = match self.best_split(&indices, positives) {
            Some(best) if best.impurity < parent - 1e-12 => best,
            _ => return leaf,
        };

        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| self.rows[i][best.feature] <= best.threshold);
        Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left: Box::new(self.grow(left, depth + 1)),
            right: Box::new(self.grow(right, depth + 1)),
        }
    }

    /// Lowest weighted child impurity over all features and midpoints; ties keep the first found.
    fn best_split(&self, indices: &[usize], positives: usize) -> Option<BestSplit> {
        let total = indices.len();
        let mut best: Option<BestSplit> = None;
        let mut sorted = indices.to_vec();

        for feature in 0..self.n_features {
            sorted.sort_by(|&a, &b| self.rows[a][feature].total_cmp(&self.rows[b][feature]));
            let mut left_pos = 0usize;
            for k in 0..total - 1 {
                if self.y[sorted[k]] == 1 {
                    left_pos += 1;
                }
                let here = self.rows[sorted[k]][feature];
                let next = self.rows[sorted[k + 1]][feature];
                if here == next {
                    continue;
                }
                let left_n = k + 1;
                let right_n = total - left_n;
                let impurity = (left_n as f64 * gini(left_pos, left_n)
                    + right_n as f64 * gini(positives - left_pos, right_n))
                    / total as f64;
                if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                    best = Some(BestSplit {
                        feature,
                        threshold: here + (next - here) / 2.0,
                        impurity,
                    });
                }
            }
        }
        best
    }
}

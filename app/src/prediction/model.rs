use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, bail};
use serde::Deserialize;

use super::FeatureVector;
use crate::port::EnergyModel;

//xgboost default when the dump does not carry one
const DEFAULT_BASE_SCORE: f64 = 0.5;

#[derive(Debug, Deserialize)]
struct ModelFileDTO {
    #[serde(default = "default_base_score")]
    base_score: f64,
    #[serde(default)]
    feature_names: Option<Vec<String>>,
    trees: Vec<NodeDTO>,
}

fn default_base_score() -> f64 {
    DEFAULT_BASE_SCORE
}

#[derive(Debug, Deserialize)]
struct NodeDTO {
    nodeid: u32,
    #[serde(default)]
    split: Option<String>,
    #[serde(default)]
    split_condition: Option<f64>,
    #[serde(default)]
    yes: Option<u32>,
    #[serde(default)]
    no: Option<u32>,
    #[serde(default)]
    missing: Option<u32>,
    #[serde(default)]
    leaf: Option<f64>,
    #[serde(default)]
    children: Vec<NodeDTO>,
}

// xgboost keeps thresholds, leaves and feature values in single precision
#[derive(Debug, Clone, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f32,
        yes: usize,
        no: usize,
        missing: usize,
    },
    Leaf(f32),
}

// Nodes in depth-first order: children always sit behind their parent, so traversal terminates
#[derive(Debug, Clone, PartialEq)]
struct Tree {
    nodes: Vec<Node>,
}

/// Gradient-boosted regression trees read from an xgboost JSON dump.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeEnsemble {
    base_score: f32,
    trees: Vec<Tree>,
}

impl TreeEnsemble {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path).with_context(|| format!("Error reading model file {}", path.display()))?;

        let model = Self::from_json(&raw).with_context(|| format!("Error parsing model file {}", path.display()))?;
        tracing::info!("Loaded {} trees from {}", model.tree_count(), path.display());

        Ok(model)
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let dto: ModelFileDTO = serde_json::from_str(raw)?;

        if let Some(names) = &dto.feature_names {
            if *names != FeatureVector::COLUMNS {
                bail!(
                    "feature schema mismatch: model expects {:?}, encoder produces {:?}",
                    names,
                    FeatureVector::COLUMNS
                );
            }
        }

        if dto.trees.is_empty() {
            bail!("model contains no trees");
        }

        let trees = dto
            .trees
            .iter()
            .enumerate()
            .map(|(i, root)| Tree::compile(root).with_context(|| format!("Invalid tree {}", i)))
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Self {
            base_score: dto.base_score as f32,
            trees,
        })
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

impl EnergyModel for TreeEnsemble {
    fn predict(&self, features: &FeatureVector) -> anyhow::Result<f64> {
        let row = features.to_row();
        let score = self
            .trees
            .iter()
            .fold(self.base_score, |margin, tree| margin + tree.eval(&row)) as f64;

        if !score.is_finite() {
            bail!("model produced a non-finite value {}", score);
        }

        Ok(score)
    }
}

impl Tree {
    fn compile(root: &NodeDTO) -> anyhow::Result<Self> {
        let mut nodes = vec![];
        compile_node(root, &mut nodes)?;
        Ok(Self { nodes })
    }

    fn eval(&self, row: &[f64; FeatureVector::LEN]) -> f32 {
        let mut index = 0;

        loop {
            match &self.nodes[index] {
                Node::Leaf(value) => return *value,
                Node::Split {
                    feature,
                    threshold,
                    yes,
                    no,
                    missing,
                } => {
                    let value = row[*feature] as f32;
                    index = if value.is_nan() {
                        *missing
                    } else if value < *threshold {
                        *yes
                    } else {
                        *no
                    };
                }
            }
        }
    }
}

fn compile_node(dto: &NodeDTO, nodes: &mut Vec<Node>) -> anyhow::Result<usize> {
    let index = nodes.len();

    if let Some(leaf) = dto.leaf {
        if !dto.children.is_empty() {
            bail!("leaf node {} must not have children", dto.nodeid);
        }
        nodes.push(Node::Leaf(leaf as f32));
        return Ok(index);
    }

    let split = dto
        .split
        .as_deref()
        .with_context(|| format!("node {} has neither a leaf value nor a split", dto.nodeid))?;
    let feature = resolve_feature(split)?;
    let threshold = dto
        .split_condition
        .with_context(|| format!("split node {} has no split_condition", dto.nodeid))? as f32;
    let yes = dto.yes.with_context(|| format!("split node {} has no yes branch", dto.nodeid))?;
    let no = dto.no.with_context(|| format!("split node {} has no no branch", dto.nodeid))?;
    let missing = dto.missing.unwrap_or(yes);

    //placeholder until the children have their positions
    nodes.push(Node::Leaf(0.0));

    let mut child_positions = HashMap::new();
    for child in dto.children.iter() {
        child_positions.insert(child.nodeid, compile_node(child, nodes)?);
    }

    let position = |id: u32| {
        child_positions
            .get(&id)
            .copied()
            .with_context(|| format!("node {} references {} which is not one of its children", dto.nodeid, id))
    };

    nodes[index] = Node::Split {
        feature,
        threshold,
        yes: position(yes)?,
        no: position(no)?,
        missing: position(missing)?,
    };

    Ok(index)
}

//either a column name or the positional "f<index>" form
fn resolve_feature(split: &str) -> anyhow::Result<usize> {
    FeatureVector::column_index(split)
        .or_else(|| {
            split
                .strip_prefix('f')
                .and_then(|i| i.parse::<usize>().ok())
                .filter(|i| *i < FeatureVector::LEN)
        })
        .with_context(|| format!("unknown feature '{}'", split))
}

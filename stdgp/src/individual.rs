use std::sync::Arc;

use program_trees::{PrimitiveSet, Tree};

/// What selection needs to know about a population member.
///
/// Populations are slices of candidates ordered best to worst, so fitness is
/// implied by position and never queried.
pub trait Candidate {
    fn size(&self) -> usize;
    fn depth(&self) -> usize;
}

/// Configuration shared by an individual and every offspring derived from it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndividualConfig {
    pub primitives: PrimitiveSet,
    /// Depth bound for grown trees and mutation subtrees; below 1 grows single terminals.
    pub max_depth: usize,
    pub model_name: String,
    pub fitness_type: String,
}

#[derive(Clone, Debug)]
pub struct Individual {
    pub config: Arc<IndividualConfig>,
    pub tree: Tree,
}

impl Individual {
    pub fn new(config: Arc<IndividualConfig>, tree: Tree) -> Self {
        Self { config, tree }
    }

    /// A fresh individual grown from the configuration's primitives and depth bound.
    pub fn grow<R: rand::Rng>(rng: &mut R, config: Arc<IndividualConfig>) -> Self {
        let tree = Tree::grow(rng, &config.primitives, config.max_depth);
        Self { config, tree }
    }

    pub fn full<R: rand::Rng>(rng: &mut R, config: Arc<IndividualConfig>) -> Self {
        let tree = Tree::full(rng, &config.primitives, config.max_depth);
        Self { config, tree }
    }

    pub fn to_string_tree(&self) -> String {
        program_trees::string_tree(&self.tree, &self.config.primitives)
    }
}

impl Candidate for Individual {
    fn size(&self) -> usize {
        self.tree.size()
    }

    fn depth(&self) -> usize {
        self.tree.depth()
    }
}

impl<C: Candidate + ?Sized> Candidate for &C {
    fn size(&self) -> usize {
        (**self).size()
    }

    fn depth(&self) -> usize {
        (**self).depth()
    }
}

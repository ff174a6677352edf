use std::sync::Arc;

use program_trees::{PNode, PrimitiveSet, Tree};

use crate::individual::{Candidate, Individual, IndividualConfig};

/// A population member reduced to the two numbers selection looks at.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Member {
    pub size: usize,
    pub depth: usize,
}

impl Candidate for Member {
    fn size(&self) -> usize {
        self.size
    }

    fn depth(&self) -> usize {
        self.depth
    }
}

pub fn members(sizes: &[usize]) -> Vec<Member> {
    sizes.iter().map(|&size| Member { size, depth: size }).collect()
}

pub fn primitives() -> PrimitiveSet {
    PrimitiveSet::from_names(&[("+", 2), ("*", 2), ("neg", 1)], &["x0", "x1", "x2"]).unwrap()
}

pub fn config(model_name: &str, max_depth: usize) -> Arc<IndividualConfig> {
    Arc::new(IndividualConfig {
        primitives: primitives(),
        max_depth,
        model_name: model_name.to_string(),
        fitness_type: "RMSE".to_string(),
    })
}

/// `neg(neg(...(x{leaf})))` with `size` nodes in total.
pub fn chain(size: usize, leaf: u16) -> Tree {
    let mut nodes = vec![PNode::Term { idx: leaf }];
    for _ in 1..size {
        nodes.push(PNode::Op { arity: 1, op: 2 });
    }
    Tree::from_nodes(nodes).unwrap()
}

pub fn chain_population(config: &Arc<IndividualConfig>, sizes: &[usize]) -> Vec<Individual> {
    sizes
        .iter()
        .enumerate()
        .map(|(i, &s)| Individual::new(Arc::clone(config), chain(s, (i % 3) as u16)))
        .collect()
}

use std::sync::Arc;

use program_trees::Tree;
use rand::Rng;

use crate::individual::Individual;
use crate::selection::{DoubleTournament, SelectionError};

/// Subtree crossover.
///
/// Both parents are copied before their subtrees are exchanged, so the
/// population is left untouched and the two offspring never share structure,
/// even when the same parent is drawn twice. Both offspring carry the first
/// parent's configuration.
///
/// Draw order: parent one, parent two, node in copy one, node in copy two.
pub fn subtree_crossover<R: Rng>(
    rng: &mut R,
    population: &[Individual],
    selector: &DoubleTournament,
) -> Result<Vec<Individual>, SelectionError> {
    let first = selector.select(rng, population)?;
    let second = selector.select(rng, population)?;

    let mut a = first.tree.clone();
    let mut b = second.tree.clone();
    let a_at = a.random_node(rng);
    let b_at = b.random_node(rng);
    Tree::swap_subtrees(&mut a, a_at, &mut b, b_at);

    Ok(vec![
        Individual::new(Arc::clone(&first.config), a),
        Individual::new(Arc::clone(&first.config), b),
    ])
}

/// Subtree mutation: a random node of a copy of the selected parent is
/// replaced by a subtree grown within the parent's depth bound.
///
/// Draw order: parent, node, grown subtree.
pub fn subtree_mutation<R: Rng>(
    rng: &mut R,
    population: &[Individual],
    selector: &DoubleTournament,
) -> Result<Vec<Individual>, SelectionError> {
    let parent = selector.select(rng, population)?;

    let mut tree = parent.tree.clone();
    let at = tree.random_node(rng);
    let grown = Tree::grow(rng, &parent.config.primitives, parent.config.max_depth);
    tree.replace_subtree(at, grown);

    Ok(vec![Individual::new(Arc::clone(&parent.config), tree)])
}

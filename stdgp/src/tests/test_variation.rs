use std::sync::Arc;

use program_trees::proptest_utils::arb_tree;
use program_trees::{is_valid_postfix, subtree_range, subtree_sizes, PNode, Tree};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::common::{chain, chain_population, config, primitives};
use crate::individual::{Candidate, Individual};
use crate::selection::{DoubleTournament, Mode, SelectionError};
use crate::variation::{subtree_crossover, subtree_mutation};

fn selector() -> DoubleTournament {
    DoubleTournament::new(3, 2, 2, Mode::FitnessFirst).unwrap()
}

fn snapshot(pop: &[Individual]) -> Vec<Tree> {
    pop.iter().map(|i| i.tree.clone()).collect()
}

#[test]
fn crossover_returns_two_offspring_and_leaves_population_untouched() {
    let cfg = config("a", 4);
    let mut rng = StdRng::seed_from_u64(1);
    let pop: Vec<Individual> = (0..8).map(|_| Individual::grow(&mut rng, Arc::clone(&cfg))).collect();
    let before = snapshot(&pop);

    for _ in 0..100 {
        let kids = subtree_crossover(&mut rng, &pop, &selector()).unwrap();
        assert_eq!(kids.len(), 2);
        let total: usize = kids.iter().map(|k| k.size()).sum();
        assert!(total >= 2);
    }
    assert_eq!(snapshot(&pop), before);
}

#[test]
fn crossover_offspring_sizes_add_up_to_parent_sizes() {
    let cfg = config("a", 6);
    let pop = chain_population(&cfg, &[5, 9, 3, 7]);
    let sel = selector();
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut replay = rng.clone();
        let kids = subtree_crossover(&mut rng, &pop, &sel).unwrap();
        let p1 = sel.select_index(&mut replay, &pop).unwrap();
        let p2 = sel.select_index(&mut replay, &pop).unwrap();
        assert_eq!(kids[0].size() + kids[1].size(), pop[p1].size() + pop[p2].size());
    }
}

#[test]
fn crossover_offspring_are_independent() {
    let cfg = config("a", 5);
    let mut rng = StdRng::seed_from_u64(2);
    let pop: Vec<Individual> = (0..6).map(|_| Individual::full(&mut rng, Arc::clone(&cfg))).collect();
    let before = snapshot(&pop);

    let mut kids = subtree_crossover(&mut rng, &pop, &selector()).unwrap();
    let second = kids[1].tree.clone();
    let root = kids[0].tree.root_index();
    kids[0].tree.replace_subtree(root, Tree::leaf(0));

    assert_eq!(kids[0].tree, Tree::leaf(0));
    assert_eq!(kids[1].tree, second);
    assert_eq!(snapshot(&pop), before);
}

#[test]
fn crossover_of_a_parent_with_itself_is_well_formed() {
    // With a single member, both parents are the same individual.
    let cfg = config("a", 6);
    let pop = vec![Individual::new(Arc::clone(&cfg), chain(6, 1))];
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let kids = subtree_crossover(&mut rng, &pop, &selector()).unwrap();
        assert_eq!(kids[0].size() + kids[1].size(), 12);
        for k in &kids {
            assert!(k.tree.check_primitives(&k.config.primitives).is_ok());
            assert_eq!(k.tree.nodes()[0], PNode::Term { idx: 1 });
        }
        assert_eq!(pop[0].tree, chain(6, 1));
    }
}

#[test]
fn both_crossover_offspring_take_the_first_parents_configuration() {
    let a = config("first", 4);
    let b = config("second", 4);
    let pop = vec![
        Individual::new(Arc::clone(&a), chain(3, 0)),
        Individual::new(Arc::clone(&b), chain(2, 1)),
        Individual::new(Arc::clone(&a), chain(4, 2)),
        Individual::new(Arc::clone(&b), chain(1, 0)),
    ];
    let sel = selector();
    for seed in 0..40 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut replay = rng.clone();
        let kids = subtree_crossover(&mut rng, &pop, &sel).unwrap();
        let first = sel.select_index(&mut replay, &pop).unwrap();
        for k in &kids {
            assert!(Arc::ptr_eq(&k.config, &pop[first].config));
        }
    }
}

#[test]
fn mutation_changes_only_the_replaced_subtree() {
    let cfg = config("a", 4);
    let mut rng = StdRng::seed_from_u64(3);
    let pop: Vec<Individual> = (0..5).map(|_| Individual::full(&mut rng, Arc::clone(&cfg))).collect();
    let before = snapshot(&pop);
    let sel = selector();

    for seed in 0..100 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut replay = rng.clone();
        let kids = subtree_mutation(&mut rng, &pop, &sel).unwrap();
        assert_eq!(kids.len(), 1);

        let parent = &pop[sel.select_index(&mut replay, &pop).unwrap()];
        let at = replay.random_range(0..parent.tree.size());
        let (start, end) = subtree_range(&subtree_sizes(parent.tree.nodes()), at);
        let grown = Tree::grow(&mut replay, &cfg.primitives, cfg.max_depth);

        let child = kids[0].tree.nodes();
        let old = parent.tree.nodes();
        assert_eq!(&child[..start], &old[..start]);
        assert_eq!(&child[start..start + grown.size()], grown.nodes());
        assert_eq!(&child[start + grown.size()..], &old[end + 1..]);
        assert!(Arc::ptr_eq(&kids[0].config, &parent.config));
    }
    assert_eq!(snapshot(&pop), before);
}

#[test]
fn mutation_with_a_zero_depth_bound_inserts_a_single_terminal() {
    let cfg = config("z", 0);
    let pop = chain_population(&cfg, &[4, 6, 2]);
    let sel = selector();

    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut replay = rng.clone();
        let kids = subtree_mutation(&mut rng, &pop, &sel).unwrap();

        let parent = &pop[sel.select_index(&mut replay, &pop).unwrap()];
        let at = replay.random_range(0..parent.tree.size());
        let (start, end) = subtree_range(&subtree_sizes(parent.tree.nodes()), at);

        let child = &kids[0].tree;
        assert_eq!(child.size(), parent.tree.size() - (end - start));
        assert!(child.nodes()[start].is_leaf());
        assert!(child.depth() <= parent.tree.depth());
    }
}

#[test]
fn variation_on_an_empty_population_is_an_error() {
    let mut rng = StdRng::seed_from_u64(0);
    let empty: Vec<Individual> = Vec::new();
    assert!(matches!(
        subtree_crossover(&mut rng, &empty, &selector()),
        Err(SelectionError::EmptyPopulation)
    ));
    assert!(matches!(
        subtree_mutation(&mut rng, &empty, &selector()),
        Err(SelectionError::EmptyPopulation)
    ));
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn offspring_of_arbitrary_trees_are_well_formed(
        trees in prop::collection::vec(arb_tree(&primitives(), 4, 24, 2), 1..6),
        seed in any::<u64>(),
    ) {
        let cfg = config("p", 3);
        let pop: Vec<Individual> = trees.into_iter().map(|t| Individual::new(Arc::clone(&cfg), t)).collect();
        let sel = selector();
        let mut rng = StdRng::seed_from_u64(seed);

        let kids = subtree_crossover(&mut rng, &pop, &sel).unwrap();
        let kids_m = subtree_mutation(&mut rng, &pop, &sel).unwrap();
        for k in kids.iter().chain(&kids_m) {
            prop_assert!(is_valid_postfix(k.tree.nodes()));
            prop_assert!(k.tree.check_primitives(&cfg.primitives).is_ok());
        }
    }
}

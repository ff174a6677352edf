use proptest::prelude::*;
use proptest::strategy::{BoxedStrategy, Union};

use crate::node::PNode;
use crate::primitives::PrimitiveSet;
use crate::tree::Tree;

#[derive(Clone, Debug)]
pub enum GenTree {
    Term(u16),
    Op { arity: u8, op: u16, children: Vec<GenTree> },
}

impl GenTree {
    pub fn to_postfix(&self, out: &mut Vec<PNode>) {
        match self {
            GenTree::Term(idx) => out.push(PNode::Term { idx: *idx }),
            GenTree::Op { arity, op, children } => {
                for child in children {
                    child.to_postfix(out);
                }
                out.push(PNode::Op { arity: *arity, op: *op });
            }
        }
    }
}

pub fn arb_leaf(n_terminals: usize) -> impl Strategy<Value = GenTree> {
    debug_assert!(n_terminals > 0, "arb_leaf requires at least one terminal");
    (0u16..(n_terminals as u16)).prop_map(GenTree::Term)
}

/// Random trees drawn from `primitives`, `max_depth` counting levels of recursion above the leaves.
pub fn arb_gen_tree(
    primitives: &PrimitiveSet,
    max_depth: u32,
    max_size: u32,
    max_branch: u32,
) -> BoxedStrategy<GenTree> {
    let leaf = arb_leaf(primitives.n_terminals());
    let ops: Vec<(u16, u8)> = primitives
        .ops()
        .iter()
        .enumerate()
        .map(|(i, s)| (i as u16, s.arity))
        .collect();
    if ops.is_empty() {
        return leaf.boxed();
    }

    leaf.prop_recursive(max_depth, max_size, max_branch, move |inner| {
        let choices: Vec<BoxedStrategy<GenTree>> = ops
            .iter()
            .map(|&(op, arity)| {
                prop::collection::vec(inner.clone(), arity as usize)
                    .prop_map(move |children| GenTree::Op { arity, op, children })
                    .boxed()
            })
            .collect();
        Union::new(choices)
    })
    .boxed()
}

pub fn arb_tree(primitives: &PrimitiveSet, max_depth: u32, max_size: u32, max_branch: u32) -> BoxedStrategy<Tree> {
    arb_gen_tree(primitives, max_depth, max_size, max_branch)
        .prop_map(|g| {
            let mut nodes = Vec::new();
            g.to_postfix(&mut nodes);
            Tree::from_nodes(nodes).expect("generated trees are valid postfix")
        })
        .boxed()
}

use program_trees::{PNode, PrimitiveSet, Tree};

#[allow(dead_code)]
pub fn primitives() -> PrimitiveSet {
    PrimitiveSet::from_names(&[("+", 2), ("*", 2), ("neg", 1), ("if", 3)], &["x0", "x1", "c"]).unwrap()
}

#[allow(dead_code)]
pub fn term(idx: u16) -> PNode {
    PNode::Term { idx }
}

#[allow(dead_code)]
pub fn op(op: u16, arity: u8) -> PNode {
    PNode::Op { arity, op }
}

/// `x0 * neg(x1 + c)`
#[allow(dead_code)]
pub fn tree_readme_like() -> Tree {
    Tree::from_nodes(vec![term(0), term(1), term(2), op(0, 2), op(2, 1), op(1, 2)]).unwrap()
}

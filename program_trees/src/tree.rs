use std::fmt;

use rand::Rng;

use crate::node::PNode;
use crate::primitives::PrimitiveSet;

/// Depth of a postfix node sequence; a single terminal has depth 1.
pub fn count_depth(nodes: &[PNode]) -> usize {
    let mut stack: Vec<usize> = Vec::with_capacity(nodes.len());
    for n in nodes {
        if n.is_leaf() {
            stack.push(1);
            continue;
        }
        let start = stack
            .len()
            .checked_sub(n.arity())
            .expect("invalid postfix (stack underflow)");
        let deepest = stack.drain(start..).max().unwrap_or(0);
        stack.push(deepest + 1);
    }
    assert_eq!(stack.len(), 1, "invalid postfix (did not reduce to one root)");
    stack[0]
}

/// True when `nodes` reduce to exactly one root and no operator has arity 0.
pub fn is_valid_postfix(nodes: &[PNode]) -> bool {
    let mut pending = 0usize;
    for n in nodes {
        if n.is_leaf() {
            pending += 1;
            continue;
        }
        let a = n.arity();
        if a == 0 || pending < a {
            return false;
        }
        pending = pending - a + 1;
    }
    pending == 1
}

/// Number of nodes in the subtree rooted at each position.
pub fn subtree_sizes(nodes: &[PNode]) -> Vec<usize> {
    let mut sizes = Vec::with_capacity(nodes.len());
    let mut roots: Vec<usize> = Vec::with_capacity(nodes.len());
    for n in nodes {
        let start = roots
            .len()
            .checked_sub(n.arity())
            .expect("invalid postfix (stack underflow)");
        let size = 1 + roots.drain(start..).sum::<usize>();
        sizes.push(size);
        roots.push(size);
    }
    sizes
}

/// Inclusive postfix range `(start, end)` of the subtree rooted at `root_idx`.
pub fn subtree_range(sizes: &[usize], root_idx: usize) -> (usize, usize) {
    (root_idx + 1 - sizes[root_idx], root_idx)
}

/// An owned program tree stored in postfix order; the root is the last node.
///
/// A node position is its postfix index and the subtree rooted there is a
/// contiguous range ending at that index, so exchanging subtrees is a pair of
/// splices and never aliases another tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tree {
    nodes: Vec<PNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    InvalidPostfix,
    UnknownOperator { op: u16, arity: u8 },
    UnknownTerminal(u16),
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::InvalidPostfix => write!(f, "nodes do not form a single postfix tree"),
            TreeError::UnknownOperator { op, arity } => {
                write!(f, "operator id {op} with arity {arity} is not in the primitive set")
            }
            TreeError::UnknownTerminal(idx) => write!(f, "terminal index {idx} is not in the primitive set"),
        }
    }
}

impl std::error::Error for TreeError {}

impl Tree {
    pub fn leaf(idx: u16) -> Self {
        Self {
            nodes: vec![PNode::Term { idx }],
        }
    }

    pub fn from_nodes(nodes: Vec<PNode>) -> Result<Self, TreeError> {
        if !is_valid_postfix(&nodes) {
            return Err(TreeError::InvalidPostfix);
        }
        Ok(Self { nodes })
    }

    /// Grow construction: while the depth budget allows, flip a fair coin to
    /// decide between an operator and a terminal.
    ///
    /// A tree has at least one node, so a `max_depth` below 1 grows a single
    /// terminal of depth 1.
    pub fn grow<R: Rng>(rng: &mut R, primitives: &PrimitiveSet, max_depth: usize) -> Self {
        let mut nodes = Vec::new();
        build_random(rng, primitives, max_depth, false, &mut nodes);
        Self { nodes }
    }

    /// Full construction: operators until the depth budget is exhausted.
    /// Like [`Tree::grow`], a `max_depth` below 1 yields a single terminal.
    pub fn full<R: Rng>(rng: &mut R, primitives: &PrimitiveSet, max_depth: usize) -> Self {
        let mut nodes = Vec::new();
        build_random(rng, primitives, max_depth, true, &mut nodes);
        Self { nodes }
    }

    pub fn nodes(&self) -> &[PNode] {
        &self.nodes
    }

    pub fn root(&self) -> PNode {
        *self.nodes.last().expect("tree is never empty")
    }

    pub fn root_index(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self) -> usize {
        count_depth(&self.nodes)
    }

    /// Uniform draw over every node position of the tree.
    pub fn random_node<R: Rng>(&self, rng: &mut R) -> usize {
        rng.random_range(0..self.nodes.len())
    }

    pub fn subtree(&self, at: usize) -> Tree {
        let (start, end) = self.range_of(at);
        Tree {
            nodes: self.nodes[start..=end].to_vec(),
        }
    }

    /// Replace the subtree rooted at `at` with `with`, returning the removed subtree.
    pub fn replace_subtree(&mut self, at: usize, with: Tree) -> Tree {
        let (start, end) = self.range_of(at);
        let removed: Vec<PNode> = self.nodes.splice(start..=end, with.nodes).collect();
        Tree { nodes: removed }
    }

    /// Exchange the subtree rooted at `a_at` in `a` with the one rooted at `b_at` in `b`.
    pub fn swap_subtrees(a: &mut Tree, a_at: usize, b: &mut Tree, b_at: usize) {
        let from_b = b.subtree(b_at);
        let from_a = a.replace_subtree(a_at, from_b);
        b.replace_subtree(b_at, from_a);
    }

    pub fn check_primitives(&self, primitives: &PrimitiveSet) -> Result<(), TreeError> {
        for n in &self.nodes {
            match *n {
                PNode::Term { idx } => {
                    if primitives.terminal(idx).is_none() {
                        return Err(TreeError::UnknownTerminal(idx));
                    }
                }
                PNode::Op { arity, op } => match primitives.op(op) {
                    Some(spec) if spec.arity == arity => {}
                    _ => return Err(TreeError::UnknownOperator { op, arity }),
                },
            }
        }
        Ok(())
    }

    fn range_of(&self, at: usize) -> (usize, usize) {
        assert!(
            at < self.nodes.len(),
            "node index {at} out of bounds for tree of size {}",
            self.nodes.len()
        );
        let sizes = subtree_sizes(&self.nodes);
        subtree_range(&sizes, at)
    }
}

fn build_random<R: Rng>(rng: &mut R, primitives: &PrimitiveSet, depth: usize, full: bool, out: &mut Vec<PNode>) {
    let branch = depth > 1 && primitives.n_ops() > 0 && (full || rng.random::<f64>() < 0.5);
    if branch {
        let op = rng.random_range(0..primitives.n_ops());
        let arity = primitives.ops()[op].arity;
        for _ in 0..arity {
            build_random(rng, primitives, depth - 1, full, out);
        }
        out.push(PNode::Op { arity, op: op as u16 });
    } else {
        let idx = rng.random_range(0..primitives.n_terminals());
        out.push(PNode::Term { idx: idx as u16 });
    }
}

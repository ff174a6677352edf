/// One element of a postfix-encoded program tree.
///
/// `Term` indexes into a [`PrimitiveSet`](crate::PrimitiveSet)'s terminals and
/// `Op` into its operators. Children of an `Op` are the `arity` subtrees that
/// immediately precede it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PNode {
    Term { idx: u16 },
    Op { arity: u8, op: u16 },
}

impl PNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self, PNode::Term { .. })
    }

    pub fn arity(&self) -> usize {
        match *self {
            PNode::Term { .. } => 0,
            PNode::Op { arity, .. } => arity as usize,
        }
    }
}

pub mod node;
pub mod primitives;
pub mod strings;
pub mod tree;

#[cfg(feature = "proptest")]
pub mod proptest_utils;

pub use crate::node::PNode;
pub use crate::primitives::{OpSpec, PrimitiveError, PrimitiveSet};
pub use crate::strings::string_tree;
pub use crate::tree::{count_depth, is_valid_postfix, subtree_range, subtree_sizes, Tree, TreeError};

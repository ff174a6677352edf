use std::collections::HashSet;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpSpec {
    pub name: String,
    pub arity: u8,
}

impl OpSpec {
    pub fn new(name: impl Into<String>, arity: u8) -> Self {
        Self {
            name: name.into(),
            arity,
        }
    }
}

/// The operators (internal nodes) and terminals (leaves) a tree may be built from.
///
/// Symbols are opaque: this crate never evaluates them, it only needs their
/// arity to grow and recombine trees.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrimitiveSet {
    ops: Vec<OpSpec>,
    terminals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimitiveError {
    NoTerminals,
    ZeroArity(String),
    Duplicate(String),
    TooMany { kind: &'static str, count: usize },
}

impl fmt::Display for PrimitiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveError::NoTerminals => write!(f, "at least one terminal is required"),
            PrimitiveError::ZeroArity(name) => write!(f, "operator {name:?} must take at least one argument"),
            PrimitiveError::Duplicate(name) => write!(f, "duplicate primitive {name:?}"),
            PrimitiveError::TooMany { kind, count } => {
                write!(f, "{count} {kind} cannot be indexed in u16")
            }
        }
    }
}

impl std::error::Error for PrimitiveError {}

impl PrimitiveSet {
    pub fn new(ops: Vec<OpSpec>, terminals: Vec<String>) -> Result<Self, PrimitiveError> {
        if terminals.is_empty() {
            return Err(PrimitiveError::NoTerminals);
        }
        if ops.len() > usize::from(u16::MAX) {
            return Err(PrimitiveError::TooMany {
                kind: "operators",
                count: ops.len(),
            });
        }
        if terminals.len() > usize::from(u16::MAX) {
            return Err(PrimitiveError::TooMany {
                kind: "terminals",
                count: terminals.len(),
            });
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for op in &ops {
            if op.arity == 0 {
                return Err(PrimitiveError::ZeroArity(op.name.clone()));
            }
            if !seen.insert(op.name.as_str()) {
                return Err(PrimitiveError::Duplicate(op.name.clone()));
            }
        }
        for t in &terminals {
            if !seen.insert(t.as_str()) {
                return Err(PrimitiveError::Duplicate(t.clone()));
            }
        }

        Ok(Self { ops, terminals })
    }

    pub fn from_names(ops: &[(&str, u8)], terminals: &[&str]) -> Result<Self, PrimitiveError> {
        Self::new(
            ops.iter().map(|&(name, arity)| OpSpec::new(name, arity)).collect(),
            terminals.iter().map(|t| t.to_string()).collect(),
        )
    }

    /// `+ - * /` over the given terminals.
    pub fn arithmetic(terminals: &[&str]) -> Result<Self, PrimitiveError> {
        Self::from_names(&[("+", 2), ("-", 2), ("*", 2), ("/", 2)], terminals)
    }

    pub fn ops(&self) -> &[OpSpec] {
        &self.ops
    }

    pub fn terminals(&self) -> &[String] {
        &self.terminals
    }

    pub fn n_ops(&self) -> usize {
        self.ops.len()
    }

    pub fn n_terminals(&self) -> usize {
        self.terminals.len()
    }

    pub fn op(&self, id: u16) -> Option<&OpSpec> {
        self.ops.get(usize::from(id))
    }

    pub fn terminal(&self, idx: u16) -> Option<&str> {
        self.terminals.get(usize::from(idx)).map(String::as_str)
    }
}

use crate::node::PNode;
use crate::primitives::PrimitiveSet;
use crate::tree::Tree;

fn strip_outer_parens(mut s: &str) -> &str {
    loop {
        let bytes = s.as_bytes();
        if bytes.len() < 2 || bytes[0] != b'(' || bytes[bytes.len() - 1] != b')' {
            return s;
        }

        let mut depth = 0i32;
        let mut encloses_all = false;
        for (i, &b) in bytes.iter().enumerate() {
            match b {
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        encloses_all = i == bytes.len() - 1;
                        break;
                    }
                }
                _ => {}
            }
        }

        if encloses_all {
            s = &s[1..s.len() - 1];
            continue;
        }

        return s;
    }
}

enum OpStyle<'a> {
    Prefix(&'a str),
    Infix(&'a str),
    Call(&'a str),
}

fn is_symbolic(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_punctuation())
}

fn combine(style: OpStyle<'_>, args: &[String]) -> String {
    match style {
        OpStyle::Prefix(tok) => {
            let a = strip_outer_parens(&args[0]);
            if a.contains(' ') {
                format!("{tok}({a})")
            } else {
                format!("{tok}{a}")
            }
        }
        OpStyle::Infix(tok) => format!("({} {} {})", args[0], tok, args[1]),
        OpStyle::Call(opname) => {
            let mut out = String::new();
            out.push_str(opname);
            out.push('(');
            for (i, a) in args.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(strip_outer_parens(a));
            }
            out.push(')');
            out
        }
    }
}

/// Render a tree with symbolic binary operators infix and everything else in call syntax.
///
/// Unknown ids render as `?t<idx>` / `?op<id>` rather than failing, so this is
/// safe to use in diagnostics for trees that were never checked against `primitives`.
pub fn string_tree(tree: &Tree, primitives: &PrimitiveSet) -> String {
    let nodes = tree.nodes();
    let mut stack: Vec<String> = Vec::with_capacity(nodes.len());

    for n in nodes {
        match *n {
            PNode::Term { idx } => stack.push(
                primitives
                    .terminal(idx)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("?t{idx}")),
            ),
            PNode::Op { arity, op } => {
                let start = stack.len() - n.arity();
                let fallback = format!("?op{op}");
                let name = primitives.op(op).map(|s| s.name.as_str()).unwrap_or(&fallback);
                let style = match arity {
                    1 if is_symbolic(name) => OpStyle::Prefix(name),
                    2 if is_symbolic(name) => OpStyle::Infix(name),
                    _ => OpStyle::Call(name),
                };
                let out = combine(style, &stack[start..]);
                stack.truncate(start);
                stack.push(out);
            }
        }
    }

    assert_eq!(stack.len(), 1);
    strip_outer_parens(&stack[0]).to_string()
}

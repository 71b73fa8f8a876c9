// Copyright (c) 2021 Fabian Schuiki

//! The concrete parse tree.

use crate::grammar::Symbol;
use ll1_common::source::Span;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;

/// A node in the concrete parse tree.
///
/// Terminals and the epsilon marker form the leaves. Every nonterminal node
/// owns the child nodes its production derived, in order; a nonterminal that
/// derived the empty string owns a single epsilon leaf. Each node covers the
/// span of input it was derived from, where epsilon leaves carry an empty
/// span at the position of the derivation.
#[derive(Clone, PartialEq, Eq)]
pub struct ParseTree {
    pub symbol: Symbol,
    pub span: Span,
    pub children: Vec<ParseTree>,
}

impl ParseTree {
    /// Create a leaf node.
    pub fn leaf(symbol: Symbol, span: Span) -> ParseTree {
        ParseTree {
            symbol: symbol,
            span: span,
            children: Vec::new(),
        }
    }

    /// Create a node with children. The node covers the union of the
    /// children's spans.
    pub fn with_children(symbol: Symbol, children: Vec<ParseTree>) -> ParseTree {
        assert!(
            !children.is_empty(),
            "node `{}` created without children",
            symbol
        );
        let mut span = children[0].span;
        for child in &children[1..] {
            span = Span::union(span, child.span);
        }
        ParseTree {
            symbol: symbol,
            span: span,
            children: children,
        }
    }

    /// Check whether this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    fn write_indented(&self, f: &mut fmt::Formatter, depth: usize) -> fmt::Result {
        for _ in 0..depth {
            write!(f, "\t")?;
        }
        write!(f, "{}\n", self.symbol)?;
        for child in &self.children {
            child.write_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

/// Renders the tree with one line per node, each line indented by one tab per
/// level of depth.
impl fmt::Display for ParseTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

impl fmt::Debug for ParseTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Serialize for ParseTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ParseTree", 3)?;
        s.serialize_field("symbol", &self.symbol)?;
        s.serialize_field("span", &[self.span.begin, self.span.end])?;
        s.serialize_field("children", &self.children)?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;
    use ll1_common::source::Source;

    #[test]
    fn render_indented() {
        let mut g = Grammar::new("root");
        let root = g.intern_nonterm("root");
        let a = g.intern_term("a");
        let b = g.intern_term("b");
        let sp = |begin, end| Span::new(Source(1), begin, end);
        let tree = ParseTree::with_children(
            root.into(),
            vec![
                ParseTree::leaf(a.into(), sp(0, 1)),
                ParseTree::with_children(
                    root.into(),
                    vec![ParseTree::leaf(Symbol::Epsilon, sp(2, 2))],
                ),
                ParseTree::leaf(b.into(), sp(2, 3)),
            ],
        );
        assert_eq!(format!("{}", tree), "root\n\ta\n\troot\n\t\tE\n\tb\n");
        assert_eq!(tree.span, sp(0, 3));
        assert!(!tree.is_leaf());
        assert!(tree.children[0].is_leaf());
    }

    #[test]
    fn serialize_json() {
        let mut g = Grammar::new("root");
        let a = g.intern_term("a");
        let tree = ParseTree::leaf(a.into(), Span::new(Source(1), 4, 5));
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"symbol": "a", "span": [4, 5], "children": []})
        );
    }

    #[test]
    #[should_panic(expected = "without children")]
    fn node_requires_children() {
        let mut g = Grammar::new("root");
        let root = g.intern_nonterm("root");
        ParseTree::with_children(root.into(), vec![]);
    }
}

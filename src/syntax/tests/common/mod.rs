// Copyright (c) 2021 Fabian Schuiki
#![allow(dead_code)]

//! Utilities for parser tests.

use ll1_common::source::get_source_manager;

pub use ll1_common::errors::DiagSegment;
pub use ll1_common::source::{Source, Span};
pub use ll1_syntax::grammar::{Grammar, Symbol};
pub use ll1_syntax::lang;
pub use ll1_syntax::lexer::{Lexer, TokenStream};
pub use ll1_syntax::parser::{self, ParseResult, SyntaxError};
pub use ll1_syntax::tree::ParseTree;

/// Add `input` to the source manager under a unique virtual file name.
pub fn unique_source(input: &str) -> Source {
    use std::cell::Cell;
    thread_local!(static INDEX: Cell<usize> = Cell::new(0));
    let sm = get_source_manager();
    let idx = INDEX.with(|i| {
        let v = i.get();
        i.set(v + 1);
        v
    });
    sm.add(&format!("test_{}.imp", idx), input)
}

/// Parse `input` with the built-in grammar.
pub fn parse(input: &str) -> ParseResult<ParseTree> {
    let grammar = lang::grammar();
    let source = unique_source(input);
    let content = source.get_content();
    let lexer = Lexer::new(content.iter(), source);
    parser::parse(&grammar, lexer)
}

/// Run `f` over a lexer for `input`, keeping the source content alive for the
/// duration of the call.
pub fn with_lexer<R>(input: &str, f: impl FnOnce(&mut Lexer) -> R) -> R {
    let source = unique_source(input);
    let content = source.get_content();
    let mut lexer = Lexer::new(content.iter(), source);
    f(&mut lexer)
}

/// Render the immediate expansion of a node, i.e. the symbols of its children
/// separated by spaces.
pub fn expand(tree: &ParseTree) -> String {
    tree.children
        .iter()
        .map(|c| format!("{}", c.symbol))
        .collect::<Vec<_>>()
        .join(" ")
}

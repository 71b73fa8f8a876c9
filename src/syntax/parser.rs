// Copyright (c) 2021 Fabian Schuiki

//! The predictive derivation engine.
//!
//! Expands a symbol into a concrete parse tree by matching one token of
//! lookahead at a time against the LL(1) parse table. Derivation is recursive
//! and depth-first, and the input advances exactly when a terminal matches.
//! There is no backtracking and no recovery; the first syntax error aborts
//! the derivation and propagates to the caller.

use crate::grammar::{Grammar, Nonterm, Symbol, Term};
use crate::lexer::{Token, TokenStream};
use crate::tree::ParseTree;
use ll1_common::errors::DiagBuilder2;
use ll1_common::source::{Span, Spanned};
use std::fmt;

/// The ways in which a derivation can fail.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SyntaxError {
    /// The input ended while a symbol still required derivation.
    UnexpectedEof { expected: Symbol, span: Span },
    /// A terminal did not match the current token.
    UnexpectedToken { expected: Term, found: Spanned<Token> },
    /// A nonterminal has no production for the current token.
    NoProduction { nt: Nonterm, found: Spanned<Token> },
}

impl SyntaxError {
    /// The location of the offending input.
    pub fn span(&self) -> Span {
        match *self {
            SyntaxError::UnexpectedEof { span, .. } => span,
            SyntaxError::UnexpectedToken { found, .. } => found.span,
            SyntaxError::NoProduction { found, .. } => found.span,
        }
    }

    /// Render this error as a diagnostic.
    pub fn to_diag(&self, grammar: &Grammar) -> DiagBuilder2 {
        let diag = DiagBuilder2::error(format!("{}", self)).span(self.span());
        match *self {
            SyntaxError::NoProduction { nt, .. } => {
                let mut valid: Vec<_> = grammar
                    .actions(nt)
                    .map(|(t, _)| format!("`{}`", t))
                    .collect();
                valid.sort();
                diag.add_note(format!("expected one of: {}", valid.join(", ")))
            }
            _ => diag,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SyntaxError::UnexpectedEof { expected, .. } => {
                write!(f, "expected `{}`, but found the end of the input", expected)
            }
            SyntaxError::UnexpectedToken { expected, found } => {
                write!(
                    f,
                    "expected `{}`, but found `{}` instead",
                    expected, found.value
                )
            }
            SyntaxError::NoProduction { nt, found } => {
                write!(f, "no production of `{}` matches `{}`", nt, found.value)
            }
        }
    }
}

/// The result of a derivation.
pub type ParseResult<T> = Result<T, SyntaxError>;

/// Parse the start symbol of a grammar from a token stream.
///
/// Tokens beyond the completed derivation are left in the stream; pass the
/// stream by `&mut` to inspect the remainder afterwards.
pub fn parse<S: TokenStream>(grammar: &Grammar, input: S) -> ParseResult<ParseTree> {
    debug!("Deriving `{}`", grammar.start());
    Parser::new(grammar, input).derive(grammar.start().into())
}

/// A predictive parser over a token stream.
pub struct Parser<'a, S> {
    grammar: &'a Grammar,
    input: S,
}

impl<'a, S: TokenStream> Parser<'a, S> {
    /// Create a new parser.
    pub fn new(grammar: &'a Grammar, input: S) -> Parser<'a, S> {
        Parser {
            grammar: grammar,
            input: input,
        }
    }

    /// Derive a symbol into a parse tree.
    ///
    /// A current token is required no matter which symbol is requested; the
    /// end of the input is reported as [`SyntaxError::UnexpectedEof`] even
    /// where an empty derivation would otherwise apply.
    pub fn derive(&mut self, symbol: Symbol) -> ParseResult<ParseTree> {
        let token = match self.input.peek() {
            Some(token) => token,
            None => {
                return Err(SyntaxError::UnexpectedEof {
                    expected: symbol,
                    span: self.input.last_span().end().into(),
                })
            }
        };
        match symbol {
            Symbol::Epsilon => {
                trace!("Derived `{}` to nothing", symbol);
                Ok(ParseTree::leaf(symbol, self.input.last_span().end().into()))
            }
            Symbol::Term(term) => {
                if term.name() == token.value.0 {
                    trace!("Matched `{}`", term);
                    self.input.bump();
                    Ok(ParseTree::leaf(symbol, token.span))
                } else {
                    Err(SyntaxError::UnexpectedToken {
                        expected: term,
                        found: token,
                    })
                }
            }
            Symbol::Nonterm(nt) => {
                let production = match self.grammar.lookup(nt, token.value.0) {
                    Some(production) => production,
                    None => return Err(SyntaxError::NoProduction { nt, found: token }),
                };
                trace!("Expanding `{}`", production);
                if production.is_epsilon() {
                    // An empty derivation consumes nothing. It is kept in the
                    // tree as a single epsilon leaf, preserving the arity of
                    // the production that was applied.
                    let leaf =
                        ParseTree::leaf(Symbol::Epsilon, self.input.last_span().end().into());
                    return Ok(ParseTree::with_children(symbol, vec![leaf]));
                }
                let syms = production.syms.clone();
                let mut children = Vec::with_capacity(syms.len());
                for sym in syms {
                    children.push(self.derive(sym)?);
                }
                Ok(ParseTree::with_children(symbol, children))
            }
        }
    }
}

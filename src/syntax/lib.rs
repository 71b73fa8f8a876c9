// Copyright (c) 2021 Fabian Schuiki

//! This crate implements a table-driven LL(1) predictive parser for a small
//! imperative language. Tokens are matched against a fixed grammar one
//! lookahead at a time, producing a concrete parse tree or the first syntax
//! error encountered.

#[macro_use]
extern crate log;

pub mod grammar;
pub mod lang;
pub mod lexer;
pub mod parser;
pub mod tree;

// Copyright (c) 2021 Fabian Schuiki

//! A table-driven LL(1) predictive parser for a small imperative language.

// Re-export everything from the common crate.
pub extern crate ll1_common as common;
pub use crate::common::*;

// Pull in subcrates.
pub extern crate ll1_syntax as syntax;

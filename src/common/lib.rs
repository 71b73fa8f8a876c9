// Copyright (c) 2016-2021 Fabian Schuiki

//! This crate contains the fundamental utilities used by the rest of the ll1
//! parser framework.

pub mod errors;
pub mod name;
pub mod source;

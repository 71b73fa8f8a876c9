// Copyright (c) 2021 Fabian Schuiki

//! Grammar symbols, productions, and the LL(1) parse table.
//!
//! A [`Grammar`] is an explicitly constructed, immutable value: terminals and
//! nonterminals are interned up front, productions are registered together
//! with the lookahead terminals that select them, and the resulting table is
//! then only ever read. Interning fixes the classification of a name once and
//! for all; a terminal can never later become a nonterminal or vice versa.

use itertools::Itertools;
use ll1_common::name::{get_name_table, Name};
use serde::ser::{Serialize, Serializer};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// A terminal.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Term(Name);

impl Term {
    /// The name of this terminal.
    pub fn name(self) -> Name {
        self.0
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// A nonterminal.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Nonterm(Name);

impl fmt::Display for Nonterm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Nonterm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// A symbol in a production.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    /// The empty string. Never appears inside a production; formed only as the
    /// sole child of a nonterminal that derived an empty production.
    Epsilon,
    Term(Term),
    Nonterm(Nonterm),
}

impl From<Term> for Symbol {
    fn from(x: Term) -> Self {
        Symbol::Term(x)
    }
}

impl From<Nonterm> for Symbol {
    fn from(x: Nonterm) -> Self {
        Symbol::Nonterm(x)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Symbol::Epsilon => write!(f, "E"),
            Symbol::Term(x) => write!(f, "{}", x),
            Symbol::Nonterm(x) => write!(f, "{}", x),
        }
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Serialize for Symbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A production in the grammar.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Production {
    pub nt: Nonterm,
    pub syms: Vec<Symbol>,
}

impl Production {
    /// Check whether this production derives the empty string.
    pub fn is_epsilon(&self) -> bool {
        self.syms.is_empty()
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_epsilon() {
            write!(f, "{} -> {}", self.nt, Symbol::Epsilon)
        } else {
            write!(f, "{} -> {}", self.nt, self.syms.iter().format(" "))
        }
    }
}

impl fmt::Debug for Production {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// A grammar together with its LL(1) parse table.
pub struct Grammar {
    start: Nonterm,
    terms: Vec<Term>,
    nonterms: Vec<Nonterm>,
    term_lookup: HashMap<Name, Term>,
    nonterm_lookup: HashMap<Name, Nonterm>,
    prods: Vec<Production>,
    table: HashMap<Nonterm, HashMap<Term, usize>>,
    nullable: BTreeSet<Nonterm>,
}

impl Grammar {
    /// Create a new grammar with the given start symbol.
    pub fn new(start: &str) -> Grammar {
        let mut grammar = Grammar {
            start: Nonterm(get_name_table().intern(start)),
            terms: Default::default(),
            nonterms: Default::default(),
            term_lookup: Default::default(),
            nonterm_lookup: Default::default(),
            prods: Default::default(),
            table: Default::default(),
            nullable: Default::default(),
        };
        grammar.nonterms.push(grammar.start);
        grammar.nonterm_lookup.insert(grammar.start.0, grammar.start);
        grammar
    }

    /// Intern a terminal.
    ///
    /// Panics if the name is already interned as a nonterminal.
    pub fn intern_term(&mut self, name: &str) -> Term {
        let name = get_name_table().intern(name);
        if let Some(&t) = self.term_lookup.get(&name) {
            return t;
        }
        assert!(
            !self.nonterm_lookup.contains_key(&name),
            "`{}` is already a nonterminal",
            name
        );
        let v = Term(name);
        self.terms.push(v);
        self.term_lookup.insert(name, v);
        v
    }

    /// Intern a nonterminal.
    ///
    /// Panics if the name is already interned as a terminal.
    pub fn intern_nonterm(&mut self, name: &str) -> Nonterm {
        let name = get_name_table().intern(name);
        if let Some(&nt) = self.nonterm_lookup.get(&name) {
            return nt;
        }
        assert!(
            !self.term_lookup.contains_key(&name),
            "`{}` is already a terminal",
            name
        );
        let v = Nonterm(name);
        self.nonterms.push(v);
        self.nonterm_lookup.insert(name, v);
        v
    }

    /// Try to find an already-interned terminal.
    pub fn term(&self, name: &str) -> Option<Term> {
        self.term_lookup.get(&get_name_table().find(name)?).copied()
    }

    /// Try to find an already-interned nonterminal.
    pub fn nonterm(&self, name: &str) -> Option<Nonterm> {
        self.nonterm_lookup
            .get(&get_name_table().find(name)?)
            .copied()
    }

    /// Add a production and register it in the parse table for each of the
    /// given lookahead terminals.
    ///
    /// Panics if one of the table slots is already occupied by a different
    /// production, since the grammar would be ambiguous under a single token
    /// of lookahead.
    pub fn add_production(&mut self, nt: Nonterm, lookaheads: &[Term], syms: Vec<Symbol>) {
        let index = self.prods.len();
        self.prods.push(Production { nt, syms });
        trace!("Added production {}", self.prods[index]);
        for &t in lookaheads {
            self.add_action(nt, t, index);
        }
    }

    fn add_action(&mut self, nt: Nonterm, term: Term, index: usize) {
        let slot = self
            .table
            .entry(nt)
            .or_default()
            .entry(term)
            .or_insert(index);
        assert!(
            *slot == index,
            "conflicting productions for [{}, {}]: `{}` and `{}`",
            nt,
            term,
            self.prods[*slot],
            self.prods[index]
        );
        trace!("[{}, {}] = {}", nt, term, self.prods[index]);
    }

    /// Mark a nonterminal as deriving the empty string.
    ///
    /// This is descriptive grammar metadata. The parser never consults it; the
    /// epsilon entries in the table are authoritative.
    pub fn mark_nullable(&mut self, nt: Nonterm) {
        self.nullable.insert(nt);
    }

    /// Check whether a nonterminal is marked as deriving the empty string.
    pub fn is_nullable(&self, nt: Nonterm) -> bool {
        self.nullable.contains(&nt)
    }

    /// The start symbol of the grammar.
    pub fn start(&self) -> Nonterm {
        self.start
    }

    /// Look up the production to apply when expanding `nt` with `lookahead`
    /// as the current token.
    pub fn lookup(&self, nt: Nonterm, lookahead: Name) -> Option<&Production> {
        let &index = self.table.get(&nt)?.get(&Term(lookahead))?;
        Some(&self.prods[index])
    }

    /// Obtain an iterator over all terminals.
    pub fn terms(&self) -> impl Iterator<Item = Term> + '_ {
        self.terms.iter().cloned()
    }

    /// Obtain an iterator over all nonterminals.
    pub fn nonterms(&self) -> impl Iterator<Item = Nonterm> + '_ {
        self.nonterms.iter().cloned()
    }

    /// Obtain an iterator over all productions.
    pub fn productions(&self) -> impl Iterator<Item = &Production> + '_ {
        self.prods.iter()
    }

    /// Obtain an iterator over the table entries for a nonterminal.
    pub fn actions(&self, nt: Nonterm) -> impl Iterator<Item = (Term, &Production)> + '_ {
        self.table
            .get(&nt)
            .into_iter()
            .flatten()
            .map(move |(&t, &index)| (t, &self.prods[index]))
    }

    /// The total number of entries in the parse table.
    pub fn num_actions(&self) -> usize {
        self.table.values().map(|m| m.len()).sum()
    }
}

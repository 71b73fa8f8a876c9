// Copyright (c) 2021 Fabian Schuiki

//! The built-in imperative language grammar.
//!
//! This is a fixed LL(1) grammar over whitespace-delimited tokens, covering
//! compound statements, conditionals, loops, assignments, and arithmetic and
//! boolean expressions:
//!
//! ```text
//! program        -> compoundstmt
//! stmt           -> ifstmt | whilestmt | assgstmt | compoundstmt
//! compoundstmt   -> { stmts }
//! stmts          -> stmt stmts | E
//! ifstmt         -> if ( boolexpr ) then stmt else stmt
//! whilestmt      -> while ( boolexpr ) stmt
//! assgstmt       -> ID = arithexpr ;
//! boolexpr       -> arithexpr boolop arithexpr
//! boolop         -> < | > | <= | >= | ==
//! arithexpr      -> multexpr arithexprprime
//! arithexprprime -> + multexpr arithexprprime | - multexpr arithexprprime | E
//! multexpr       -> simpleexpr multexprprime
//! multexprprime  -> * simpleexpr multexprprime | / simpleexpr multexprprime | E
//! simpleexpr     -> ( arithexpr ) | ID | NUM
//! ```
//!
//! `ID` and `NUM` are literal tokens; the input is expected to spell them
//! verbatim.

use crate::grammar::Grammar;

/// The grammar rules, one row per production, as
/// `(nonterminal, selecting lookaheads, symbols)`. An empty symbol list
/// denotes an epsilon production.
static RULES: &[(&str, &[&str], &[&str])] = &[
    ("program", &["{"], &["compoundstmt"]),
    ("stmt", &["{"], &["compoundstmt"]),
    ("stmt", &["if"], &["ifstmt"]),
    ("stmt", &["while"], &["whilestmt"]),
    ("stmt", &["ID"], &["assgstmt"]),
    ("compoundstmt", &["{"], &["{", "stmts", "}"]),
    ("stmts", &["{", "if", "while", "ID"], &["stmt", "stmts"]),
    ("stmts", &["}"], &[]),
    ("ifstmt", &["if"], &["if", "(", "boolexpr", ")", "then", "stmt", "else", "stmt"]),
    ("whilestmt", &["while"], &["while", "(", "boolexpr", ")", "stmt"]),
    ("assgstmt", &["ID"], &["ID", "=", "arithexpr", ";"]),
    ("boolexpr", &["(", "ID", "NUM"], &["arithexpr", "boolop", "arithexpr"]),
    ("boolop", &["<"], &["<"]),
    ("boolop", &[">"], &[">"]),
    ("boolop", &["<="], &["<="]),
    ("boolop", &[">="], &[">="]),
    ("boolop", &["=="], &["=="]),
    ("arithexpr", &["(", "ID", "NUM"], &["multexpr", "arithexprprime"]),
    ("arithexprprime", &["+"], &["+", "multexpr", "arithexprprime"]),
    ("arithexprprime", &["-"], &["-", "multexpr", "arithexprprime"]),
    // The expression tails also derive epsilon on `}`, such that a missing
    // `;` after an assignment is reported at the `;` terminal itself.
    ("arithexprprime", &[")", ";", "}", "<", ">", "<=", ">=", "=="], &[]),
    ("multexpr", &["(", "ID", "NUM"], &["simpleexpr", "multexprprime"]),
    ("multexprprime", &["*"], &["*", "simpleexpr", "multexprprime"]),
    ("multexprprime", &["/"], &["/", "simpleexpr", "multexprprime"]),
    ("multexprprime", &[")", ";", "}", "<", ">", "<=", ">=", "==", "+", "-"], &[]),
    ("simpleexpr", &["("], &["(", "arithexpr", ")"]),
    ("simpleexpr", &["ID"], &["ID"]),
    ("simpleexpr", &["NUM"], &["NUM"]),
];

/// The nonterminals that can derive the empty string.
static NULLABLE: &[&str] = &["stmts", "arithexprprime", "multexprprime"];

/// Assemble the grammar and its parse table.
pub fn grammar() -> Grammar {
    let mut grammar = Grammar::new("program");

    // Intern all left-hand names as nonterminals first, such that every other
    // name encountered in a rule is known to be a terminal.
    for &(nt, _, _) in RULES {
        grammar.intern_nonterm(nt);
    }

    for &(nt, lookaheads, syms) in RULES {
        let nt = grammar.intern_nonterm(nt);
        let lookaheads: Vec<_> = lookaheads.iter().map(|&t| grammar.intern_term(t)).collect();
        let mut symbols = Vec::with_capacity(syms.len());
        for &s in syms {
            let sym = match grammar.nonterm(s) {
                Some(nt) => nt.into(),
                None => grammar.intern_term(s).into(),
            };
            symbols.push(sym);
        }
        grammar.add_production(nt, &lookaheads, symbols);
    }

    for &name in NULLABLE {
        let nt = grammar.intern_nonterm(name);
        grammar.mark_nullable(nt);
    }

    grammar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats() {
        let g = grammar();
        assert_eq!(g.nonterms().count(), 14);
        assert_eq!(g.terms().count(), 21);
        assert_eq!(g.productions().count(), 28);
        assert_eq!(g.num_actions(), 53);
    }

    #[test]
    fn start_symbol() {
        let g = grammar();
        assert_eq!(g.start(), g.nonterm("program").unwrap());
    }

    #[test]
    fn spot_checks() {
        let g = grammar();
        let stmt = g.nonterm("stmt").unwrap();
        let stmts = g.nonterm("stmts").unwrap();
        let token = |name: &str| g.term(name).unwrap().name();
        assert_eq!(
            format!("{}", g.lookup(stmt, token("if")).unwrap()),
            "stmt -> ifstmt"
        );
        assert_eq!(
            format!("{}", g.lookup(stmts, token("}")).unwrap()),
            "stmts -> E"
        );
        assert!(g.lookup(stmt, token("then")).is_none());
    }

    #[test]
    fn nullable_matches_epsilon_entries() {
        let g = grammar();
        for nt in g.nonterms() {
            let has_epsilon = g.actions(nt).any(|(_, p)| p.is_epsilon());
            assert_eq!(
                g.is_nullable(nt),
                has_epsilon,
                "nullable flag disagrees with the table for `{}`",
                nt
            );
        }
    }
}

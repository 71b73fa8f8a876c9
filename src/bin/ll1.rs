// Copyright (c) 2021 Fabian Schuiki

//! A predictive parser for a small imperative language.

#[macro_use]
extern crate log;

use anyhow::{anyhow, Result};
use clap::{App, Arg};
use ll1::errors::DiagBuilder2;
use ll1::source::get_source_manager;
use ll1::syntax::lang;
use ll1::syntax::lexer::{Lexer, TokenStream};
use ll1::syntax::parser;
use std::io::Read;

fn main() -> Result<()> {
    let matches = App::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about("A predictive parser for a small imperative language.")
        .arg(
            Arg::with_name("verbosity")
                .short("v")
                .multiple(true)
                .help("Increase message verbosity"),
        )
        .arg(
            Arg::with_name("dump_table")
                .long("dump-table")
                .help("Print the parse table and exit"),
        )
        .arg(
            Arg::with_name("emit_json")
                .long("emit-json")
                .help("Print parse trees as JSON"),
        )
        .arg(
            Arg::with_name("INPUT")
                .help("The input files to parse; stdin if omitted")
                .multiple(true),
        )
        .get_matches();

    // Configure the logger.
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(match matches.occurrences_of("verbosity") {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    });
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();

    let grammar = lang::grammar();
    info!(
        "Grammar has {} productions, {} nonterminals, {} terminals",
        grammar.productions().count(),
        grammar.nonterms().count(),
        grammar.terms().count(),
    );

    if matches.is_present("dump_table") {
        let mut lines = Vec::new();
        for nt in grammar.nonterms() {
            for (t, p) in grammar.actions(nt) {
                lines.push(format!("[{}, {}] = {}", nt, t, p));
            }
        }
        lines.sort();
        for line in lines {
            println!("{}", line);
        }
        return Ok(());
    }

    // Gather the sources to parse. A file that cannot be opened is reported,
    // but does not keep the remaining inputs from being parsed.
    let sm = get_source_manager();
    let mut failed = false;
    let mut sources = Vec::new();
    match matches.values_of("INPUT") {
        Some(files) => {
            for filename in files {
                match sm.open(filename) {
                    Some(source) => sources.push(source),
                    None => {
                        eprintln!(
                            "{}",
                            DiagBuilder2::fatal(format!(
                                "unable to open input file `{}`",
                                filename
                            ))
                        );
                        failed = true;
                    }
                }
            }
        }
        None => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            sources.push(sm.add_anonymous(input));
        }
    }

    // Parse each source and print its tree.
    for source in sources {
        debug!("Parsing `{}`", source);
        let content = source.get_content();
        let mut lexer = Lexer::new(content.iter(), source);
        match parser::parse(&grammar, &mut lexer) {
            Ok(tree) => {
                if matches.is_present("emit_json") {
                    println!("{}", serde_json::to_string_pretty(&tree)?);
                } else {
                    print!("{}", tree);
                }
                if let Some(token) = lexer.peek() {
                    eprintln!(
                        "{}",
                        DiagBuilder2::warning("extra tokens after the program").span(token.span)
                    );
                }
            }
            Err(err) => {
                eprintln!("{}", err.to_diag(&grammar));
                failed = true;
            }
        }
    }
    if failed {
        Err(anyhow!("errors occurred"))
    } else {
        Ok(())
    }
}

// Copyright (c) 2021 Fabian Schuiki

//! The whitespace lexer. Splits an input stream of characters into
//! whitespace-delimited words, interning each word and keeping track of the
//! byte span it covers.

use ll1_common::name::{get_name_table, Name};
use ll1_common::source::{CharIter, Source, Span, Spanned};
use std::fmt;

/// A single token, i.e. one whitespace-delimited word of the input.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token(pub Name);

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// A stream of tokens to be parsed. The parser inspects one token of
/// lookahead at a time and advances the stream exactly when it matches a
/// terminal.
pub trait TokenStream {
    /// Peek at the current token, or `None` if the input is exhausted.
    fn peek(&mut self) -> Option<Spanned<Token>>;

    /// Consume the current token.
    ///
    /// Panics if the input is exhausted.
    fn bump(&mut self);

    /// The span of the last consumed token.
    fn last_span(&self) -> Span;
}

impl<T> TokenStream for &mut T
where
    T: TokenStream + ?Sized,
{
    fn peek(&mut self) -> Option<Spanned<Token>> {
        (**self).peek()
    }

    fn bump(&mut self) {
        (**self).bump()
    }

    fn last_span(&self) -> Span {
        (**self).last_span()
    }
}

/// A lexer that yields the whitespace-delimited words of a source file. The
/// caller keeps the source content alive; the lexer only holds the character
/// iterator into it.
pub struct Lexer<'a> {
    source: Source,
    iter: Box<CharIter<'a>>,
    last: usize,
    cur: Option<(usize, char)>,
    peek: Option<Spanned<Token>>,
    last_span: Span,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer from a `CharIter` iterator.
    pub fn new(mut iter: Box<CharIter<'a>>, source: Source) -> Lexer<'a> {
        let last = iter
            .size_hint()
            .1
            .expect("iterator must provide an upper bound");
        let cur = iter.next();
        let mut lexer = Lexer {
            source,
            iter,
            last,
            cur,
            peek: None,
            last_span: Span::new(source, 0, 0),
        };
        lexer.peek = lexer.next_token();
        lexer
    }

    /// Advance to the next character in the input stream.
    fn bump_char(&mut self) {
        self.cur = self.iter.next();
    }

    /// The byte offset of the current character, or the end of the input.
    fn offset(&self) -> usize {
        self.cur.map(|x| x.0).unwrap_or(self.last)
    }

    /// Scan forward to the next word in the input.
    fn next_token(&mut self) -> Option<Spanned<Token>> {
        while let Some((_, c)) = self.cur {
            if !c.is_whitespace() {
                break;
            }
            self.bump_char();
        }
        let (begin, _) = self.cur?;
        let mut text = String::new();
        while let Some((_, c)) = self.cur {
            if c.is_whitespace() {
                break;
            }
            text.push(c);
            self.bump_char();
        }
        let span = Span::new(self.source, begin, self.offset());
        Some(Spanned::new(Token(get_name_table().intern(&text)), span))
    }
}

impl TokenStream for Lexer<'_> {
    fn peek(&mut self) -> Option<Spanned<Token>> {
        self.peek
    }

    fn bump(&mut self) {
        match self.peek.take() {
            Some(token) => {
                trace!("Consumed token `{}`", token.value);
                self.last_span = token.span;
                self.peek = self.next_token();
            }
            None => panic!("bumped past the end of the input"),
        }
    }

    fn last_span(&self) -> Span {
        self.last_span
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ll1_common::source::get_source_manager;

    fn tokenize(name: &str, input: &str) -> Vec<(String, usize, usize)> {
        let sm = get_source_manager();
        let source = sm.add(name, input);
        let content = source.get_content();
        let mut lexer = Lexer::new(content.iter(), source);
        let mut tokens = Vec::new();
        while let Some(token) = lexer.peek() {
            tokens.push((format!("{}", token.value), token.span.begin, token.span.end));
            lexer.bump();
        }
        tokens
    }

    #[test]
    fn words_and_spans() {
        let tokens = tokenize("words.imp", "{ ID =\n NUM ; }");
        assert_eq!(
            tokens,
            vec![
                ("{".to_string(), 0, 1),
                ("ID".to_string(), 2, 4),
                ("=".to_string(), 5, 6),
                ("NUM".to_string(), 8, 11),
                (";".to_string(), 12, 13),
                ("}".to_string(), 14, 15),
            ]
        );
    }

    #[test]
    fn empty_input() {
        assert!(tokenize("empty.imp", "").is_empty());
        assert!(tokenize("blank.imp", " \t \n ").is_empty());
    }

    #[test]
    fn last_span_tracks_consumption() {
        let sm = get_source_manager();
        let source = sm.add("last_span.imp", "if x");
        let content = source.get_content();
        let mut lexer = Lexer::new(content.iter(), source);
        assert_eq!(lexer.last_span(), Span::new(source, 0, 0));
        lexer.bump();
        assert_eq!(lexer.last_span(), Span::new(source, 0, 2));
        lexer.bump();
        assert_eq!(lexer.last_span(), Span::new(source, 3, 4));
    }

    #[test]
    fn repeated_words_intern_once() {
        let sm = get_source_manager();
        let source = sm.add("intern.imp", "ID ID");
        let content = source.get_content();
        let mut lexer = Lexer::new(content.iter(), source);
        let a = lexer.peek().unwrap();
        lexer.bump();
        let b = lexer.peek().unwrap();
        assert_eq!(a.value, b.value);
        assert_ne!(a.span, b.span);
    }

    #[test]
    #[should_panic(expected = "bumped past the end")]
    fn bump_past_end() {
        let sm = get_source_manager();
        let source = sm.add("past_end.imp", "x");
        let content = source.get_content();
        let mut lexer = Lexer::new(content.iter(), source);
        lexer.bump();
        lexer.bump();
    }
}

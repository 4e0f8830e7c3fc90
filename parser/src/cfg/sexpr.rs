//! S-expression reader for configuration files.
//!
//! Atoms are runs of bytes up to whitespace, a parenthesis or a double quote. `"quoted text"`
//! is one atom including its quotes. `;;` starts a line comment and `#| ... |#` a block comment.

use std::ops::Index;
use std::rc::Rc;
use std::str::Bytes;

use super::error::{span_start_len, CfgError};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub file_name: Rc<str>,
    pub file_content: Rc<str>,
}

impl Default for Span {
    fn default() -> Self {
        Self {
            start: 0,
            end: 0,
            file_name: Rc::from(""),
            file_content: Rc::from(""),
        }
    }
}

impl Span {
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The smallest span containing both `self` and `other`, which must be in the same file.
    pub fn cover(&self, other: &Span) -> Span {
        debug_assert_eq!(self.file_name, other.file_name);
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            file_name: self.file_name.clone(),
            file_content: self.file_content.clone(),
        }
    }

    pub fn file_name(&self) -> String {
        self.file_name.to_string()
    }

    pub fn file_content(&self) -> String {
        self.file_content.to_string()
    }
}

impl Index<&Span> for str {
    type Output = str;
    fn index(&self, span: &Span) -> &Self::Output {
        &self[span.start..span.end]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Spanned<T> {
    pub t: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(t: T, span: Span) -> Spanned<T> {
        Spanned { t, span }
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub enum SExpr {
    Atom(Spanned<String>),
    List(Spanned<Vec<SExpr>>),
}

impl SExpr {
    pub fn atom(&self) -> Option<&str> {
        match self {
            SExpr::Atom(a) => Some(a.t.as_str()),
            SExpr::List(_) => None,
        }
    }

    pub fn list(&self) -> Option<&[SExpr]> {
        match self {
            SExpr::List(l) => Some(&l.t),
            SExpr::Atom(_) => None,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            SExpr::Atom(a) => a.span.clone(),
            SExpr::List(l) => l.span.clone(),
        }
    }
}

impl std::fmt::Debug for SExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SExpr::Atom(a) => write!(f, "{}", &a.t),
            SExpr::List(l) => {
                write!(f, "(")?;
                for (i, e) in l.t.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{e:?}")?;
                }
                write!(f, ")")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    Atom,
}

type TokenRes = Result<Token, String>;

struct Lexer<'a> {
    s: &'a str,
    bytes: Bytes<'a>,
    file_name: Rc<str>,
    file_content: Rc<str>,
}

fn ends_atom(b: u8) -> bool {
    matches!(b, b'(' | b')' | b'"') || b.is_ascii_whitespace()
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str, file_name: &str) -> Self {
        Lexer {
            s: source,
            bytes: source.bytes(),
            file_name: Rc::from(file_name),
            file_content: Rc::from(source),
        }
    }

    fn pos(&self) -> usize {
        self.s.len() - self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.clone().next()
    }

    fn skip_while(&mut self, f: impl Fn(u8) -> bool) {
        while self.peek().is_some_and(&f) {
            self.bytes.next();
        }
    }

    /// Consumes everything up to and including the next `|#`.
    fn skip_block_comment(&mut self) -> Result<(), String> {
        let mut prev = 0u8;
        for b in self.bytes.by_ref() {
            if prev == b'|' && b == b'#' {
                return Ok(());
            }
            prev = b;
        }
        Err("Unterminated multiline comment. Add |# after the end of your comment.".to_string())
    }

    fn next_token(&mut self) -> Option<(usize, TokenRes)> {
        loop {
            let start = self.pos();
            let b = self.bytes.next()?;
            let tok = match b {
                b'(' => Ok(Token::Open),
                b')' => Ok(Token::Close),
                b'"' => {
                    self.skip_while(|b| b != b'"' && b != b'\n');
                    match self.bytes.next() {
                        Some(b'"') => Ok(Token::Atom),
                        _ => Err("Unterminated string".to_string()),
                    }
                }
                b';' if self.peek() == Some(b';') => {
                    self.skip_while(|b| b != b'\n');
                    continue;
                }
                b'#' if self.peek() == Some(b'|') => {
                    self.bytes.next();
                    match self.skip_block_comment() {
                        Ok(()) => continue,
                        Err(e) => Err(e),
                    }
                }
                b if b.is_ascii_whitespace() => continue,
                _ => {
                    self.skip_while(|b| !ends_atom(b));
                    Ok(Token::Atom)
                }
            };
            return Some((start, tok));
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Spanned<TokenRes>;

    fn next(&mut self) -> Option<Self::Item> {
        let (start, tok) = self.next_token()?;
        let span = Span {
            start,
            end: self.pos(),
            file_name: self.file_name.clone(),
            file_content: self.file_content.clone(),
        };
        Some(Spanned::new(tok, span))
    }
}

/// A top-level list such as `(defsrc ...)`.
pub type TopLevel = Spanned<Vec<SExpr>>;

pub fn parse(cfg: &str, file_name: &str) -> Result<Vec<TopLevel>, CfgError> {
    parse_(cfg, file_name).map_err(transform_error)
}

fn parse_(cfg: &str, file_name: &str) -> Result<Vec<TopLevel>, Spanned<String>> {
    let mut stack: Vec<Spanned<Vec<SExpr>>> = vec![];
    let mut top = vec![];
    for Spanned { t, span } in Lexer::new(cfg, file_name) {
        match t.map_err(|e| Spanned::new(e, span.clone()))? {
            Token::Open => stack.push(Spanned::new(vec![], span)),
            Token::Close => {
                let Some(open) = stack.pop() else {
                    return Err(Spanned::new(
                        "Unexpected closing parenthesis".to_string(),
                        span,
                    ));
                };
                let list = Spanned::new(open.t, open.span.cover(&span));
                match stack.last_mut() {
                    Some(parent) => parent.t.push(SExpr::List(list)),
                    None => top.push(list),
                }
            }
            Token::Atom => {
                let atom = SExpr::Atom(Spanned::new(cfg[&span].to_string(), span.clone()));
                match stack.last_mut() {
                    Some(parent) => parent.t.push(atom),
                    None => {
                        return Err(Spanned::new(
                            "Everything must be in a list".to_string(),
                            span,
                        ))
                    }
                }
            }
        }
    }
    if let Some(unclosed) = stack.pop() {
        return Err(Spanned::new(
            "Unclosed opening parenthesis".to_string(),
            unclosed.span,
        ));
    }
    Ok(top)
}

fn transform_error(e: Spanned<String>) -> CfgError {
    let len = if e.t.starts_with("Unterminated multiline comment") {
        2
    } else {
        e.span.len()
    };
    CfgError {
        err_span: Some(span_start_len(e.span.start(), len)),
        help_msg: e.t,
        file_name: Some(e.span.file_name()),
        file_content: Some(e.span.file_content()),
    }
}

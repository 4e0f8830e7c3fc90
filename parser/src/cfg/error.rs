use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use super::sexpr::{SExpr, Span, Spanned};

pub type MResult<T> = miette::Result<T>;
pub type Result<T> = std::result::Result<T, ParseError>;

/// An error found while interpreting the parsed s-expressions, before it is attached to its
/// source text.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub msg: String,
    pub span: Option<Span>,
}

impl ParseError {
    pub fn new(span: Span, err_msg: impl AsRef<str>) -> Self {
        Self {
            msg: err_msg.as_ref().to_string(),
            span: Some(span),
        }
    }

    pub fn from_expr(expr: &SExpr, err_msg: impl AsRef<str>) -> Self {
        Self::new(expr.span(), err_msg)
    }

    pub fn from_spanned<T>(expr: &Spanned<T>, err_msg: impl AsRef<str>) -> Self {
        Self::new(expr.span.clone(), err_msg)
    }
}

impl From<anyhow::Error> for ParseError {
    fn from(value: anyhow::Error) -> Self {
        Self {
            msg: value.to_string(),
            span: None,
        }
    }
}

#[derive(Error, Debug, Diagnostic, Clone)]
#[error("Error in configuration file")]
#[diagnostic()]
pub struct CfgError {
    #[label("Error here")]
    pub err_span: Option<SourceSpan>,
    #[help]
    pub help_msg: String,
    pub file_name: Option<String>,
    pub file_content: Option<String>,
}

impl From<ParseError> for CfgError {
    fn from(e: ParseError) -> Self {
        match e.span {
            Some(span) => CfgError {
                err_span: Some(span_start_len(span.start(), span.len())),
                help_msg: help(e.msg),
                file_name: Some(span.file_name()),
                file_content: Some(span.file_content()),
            },
            None => CfgError {
                err_span: None,
                help_msg: help(e.msg),
                file_name: None,
                file_content: None,
            },
        }
    }
}

pub(super) fn help(err_msg: impl AsRef<str>) -> String {
    format!(
        r"{}

For more info, see cfg_samples/macropad.kbd for an annotated configuration.",
        err_msg.as_ref(),
    )
}

pub(super) fn span_start_len(start: usize, len: usize) -> SourceSpan {
    SourceSpan::new(start.into(), len.into())
}

/// Attaches the configuration text so that the report can show the offending snippet.
pub(super) fn error_with_source(e: CfgError) -> miette::Error {
    let filename = e.file_name.clone();
    let source = e.file_content.clone();
    let e2: miette::Error = e.into();
    if let (Some(f), Some(s)) = (filename, source) {
        e2.with_source_code(NamedSource::new(f, s))
    } else {
        e2
    }
}

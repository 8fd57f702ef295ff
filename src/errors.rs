//! Error types with rich diagnostics using miette
//!
//! These errors carry source spans for beautiful error messages. They cover
//! the parsing front-end only; the rendering engine never fails, it collects
//! [`crate::render::Warning`] values instead.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Source context for error reporting
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// Name of the source (filename or "<input>")
    pub name: String,
    /// The full source text
    pub source: String,
}

impl SourceContext {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Create a NamedSource for miette
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.name, self.source.clone())
    }
}

/// Errors that occur while parsing a BDF file into a [`crate::types::Schematic`].
#[derive(Error, Diagnostic, Debug)]
pub enum ParseError {
    #[error("malformed BDF syntax: {message}")]
    #[diagnostic(code(schemtikz::parse::syntax))]
    Syntax {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("invalid integer")]
    #[diagnostic(code(schemtikz::parse::invalid_integer))]
    InvalidInteger {
        #[source_code]
        src: NamedSource<String>,
        #[label("does not fit a 32-bit integer")]
        span: SourceSpan,
    },

    #[error("no header present")]
    #[diagnostic(
        code(schemtikz::parse::missing_header),
        help("a BDF file starts with (header \"graphic\" (version \"1.3\"))")
    )]
    MissingHeader,

    #[error("not a BDF file, or unparseable header")]
    #[diagnostic(code(schemtikz::parse::bad_header))]
    BadHeader {
        #[source_code]
        src: NamedSource<String>,
        #[label("expected (header <kind> (version <v>))")]
        span: SourceSpan,
    },

    #[error("unsupported schematic: {kind} version {version}")]
    #[diagnostic(
        code(schemtikz::parse::unsupported_version),
        help("supported: graphic 1.3/1.4, symbol 1.1")
    )]
    UnsupportedVersion {
        kind: String,
        version: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("this header")]
        span: SourceSpan,
    },

    #[error("unknown object type: {name}")]
    #[diagnostic(code(schemtikz::parse::unknown_object))]
    UnknownObject {
        name: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("not a known block")]
        span: SourceSpan,
    },

    #[error("unknown flag `{flag}` in {kind}")]
    #[diagnostic(code(schemtikz::parse::unknown_flag))]
    UnknownFlag {
        flag: String,
        kind: &'static str,
        #[source_code]
        src: NamedSource<String>,
        #[label("unrecognized")]
        span: SourceSpan,
    },

    #[error("malformed {kind} block: {reason}")]
    #[diagnostic(code(schemtikz::parse::malformed_object))]
    MalformedObject {
        kind: &'static str,
        reason: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("in this block")]
        span: SourceSpan,
    },

    #[error("{name} is not a schematic-level object")]
    #[diagnostic(
        code(schemtikz::parse::not_toplevel),
        help("only pin, symbol, text, junction and connector may appear at the top level")
    )]
    NotTopLevel {
        name: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("found here")]
        span: SourceSpan,
    },
}

/// Failure to parse a compound signal name such as `addr[3..0]`.
///
/// Deliberately span-free: these names are short strings extracted from
/// label blocks, and the renderer downgrades the failure to a warning.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid signal name: {0}")]
pub struct NameError(pub String);

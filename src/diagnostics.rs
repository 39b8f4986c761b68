//! Diagnostics for the AIFL notation
//!
//! Every failure the crate can report is an [`AiflError`]. The three core
//! kinds (lexical, syntactic, semantic) carry the source text and the
//! offending span so `miette` can render them against the expression; the
//! remaining kinds belong to the command-line surface.
//!
//! Callers branch on [`AiflError::kind`] rather than on message text.

use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use serde::Serialize;
use thiserror::Error;

use crate::Span;

pub type SourceArc = Arc<NamedSource<String>>;

// ============================================================================
// SOURCE CONTEXT
// ============================================================================

/// Borrowed view of the text being processed and the name it is reported
/// under. Only turned into an owned `NamedSource` when an error is built.
#[derive(Debug, Clone, Copy)]
pub struct SourceContext<'a> {
    pub name: &'a str,
    pub text: &'a str,
}

impl<'a> SourceContext<'a> {
    pub fn new(name: &'a str, text: &'a str) -> Self {
        Self { name, text }
    }

    /// Source context for an expression passed inline.
    pub fn inline(text: &'a str) -> Self {
        Self::new("expression", text)
    }

    pub fn to_named_source(&self) -> SourceArc {
        Arc::new(NamedSource::new(self.name, self.text.to_string()))
    }
}

// ============================================================================
// ERROR KINDS
// ============================================================================

/// Type-safe classification of an [`AiflError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A character or substring matches no token pattern.
    Lex,
    /// The token sequence cannot be reduced by the grammar.
    Syntax,
    /// An operator sits where it has no operand to apply to.
    SemanticViolation,
    /// Reading input failed.
    Io,
    /// Rendering output failed.
    Format,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Lex => "lex",
            ErrorKind::Syntax => "syntax",
            ErrorKind::SemanticViolation => "semantic_violation",
            ErrorKind::Io => "io",
            ErrorKind::Format => "format",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ERROR TYPE
// ============================================================================

/// Where a core error happened and how to help.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub source: SourceArc,
    pub span: Span,
    pub help: Option<String>,
}

#[derive(Debug, Error)]
pub enum AiflError {
    #[error("Lex error: {message}")]
    Lex { message: String, ctx: ErrorContext },

    #[error("Syntax error: {message}")]
    Syntax { message: String, ctx: ErrorContext },

    #[error("Semantic violation: {message}")]
    SemanticViolation { message: String, ctx: ErrorContext },

    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Format error: {message}")]
    Format {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl AiflError {
    pub fn lex(message: impl Into<String>, source: &SourceContext<'_>, span: Span) -> Self {
        AiflError::Lex {
            message: message.into(),
            ctx: ErrorContext {
                source: source.to_named_source(),
                span,
                help: None,
            },
        }
    }

    pub fn syntax(message: impl Into<String>, source: &SourceContext<'_>, span: Span) -> Self {
        AiflError::Syntax {
            message: message.into(),
            ctx: ErrorContext {
                source: source.to_named_source(),
                span,
                help: None,
            },
        }
    }

    pub fn semantic(message: impl Into<String>, source: &SourceContext<'_>, span: Span) -> Self {
        AiflError::SemanticViolation {
            message: message.into(),
            ctx: ErrorContext {
                source: source.to_named_source(),
                span,
                help: None,
            },
        }
    }

    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        AiflError::Io {
            message: message.into(),
            source,
        }
    }

    pub fn format<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        AiflError::Format {
            message: message.into(),
            source: Box::new(source),
        }
    }

    /// Attaches a help message. No effect on I/O and format errors.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        if let Some(ctx) = self.ctx_mut() {
            ctx.help = Some(help.into());
        }
        self
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AiflError::Lex { .. } => ErrorKind::Lex,
            AiflError::Syntax { .. } => ErrorKind::Syntax,
            AiflError::SemanticViolation { .. } => ErrorKind::SemanticViolation,
            AiflError::Io { .. } => ErrorKind::Io,
            AiflError::Format { .. } => ErrorKind::Format,
        }
    }

    /// The error message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            AiflError::Lex { message, .. }
            | AiflError::Syntax { message, .. }
            | AiflError::SemanticViolation { message, .. }
            | AiflError::Io { message, .. }
            | AiflError::Format { message, .. } => message,
        }
    }

    /// The offending span, for errors raised against source text.
    pub fn span(&self) -> Option<Span> {
        self.ctx().map(|ctx| ctx.span)
    }

    fn ctx(&self) -> Option<&ErrorContext> {
        match self {
            AiflError::Lex { ctx, .. }
            | AiflError::Syntax { ctx, .. }
            | AiflError::SemanticViolation { ctx, .. } => Some(ctx),
            AiflError::Io { .. } | AiflError::Format { .. } => None,
        }
    }

    fn ctx_mut(&mut self) -> Option<&mut ErrorContext> {
        match self {
            AiflError::Lex { ctx, .. }
            | AiflError::Syntax { ctx, .. }
            | AiflError::SemanticViolation { ctx, .. } => Some(ctx),
            AiflError::Io { .. } | AiflError::Format { .. } => None,
        }
    }
}

impl Diagnostic for AiflError {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        Some(Box::new(format!("aifl::{}", self.kind())))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.ctx()?
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn std::fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.ctx().map(|ctx| ctx.source.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let ctx = self.ctx()?;
        let label = LabeledSpan::new(
            Some(self.message().to_string()),
            ctx.span.start,
            ctx.span.len(),
        );
        Some(Box::new(std::iter::once(label)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_display() {
        let src = SourceContext::inline("ΔΕ1 ∧");
        let err = AiflError::semantic("operator '∧' is missing its right-hand operand", &src, Span::new(6, 9));
        assert_eq!(err.kind(), ErrorKind::SemanticViolation);
        assert_eq!(
            err.to_string(),
            "Semantic violation: operator '∧' is missing its right-hand operand"
        );
        assert_eq!(err.span(), Some(Span::new(6, 9)));
    }

    #[test]
    fn test_diagnostic_code_and_help() {
        let src = SourceContext::inline("'abc");
        let err = AiflError::lex("unterminated string literal", &src, Span::new(0, 4))
            .with_help("close the literal with the quote it was opened with");
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("aifl::lex"));
        assert!(err.help().is_some());
        assert!(err.source_code().is_some());
        assert_eq!(err.labels().map(|l| l.count()), Some(1));
    }

    #[test]
    fn test_io_errors_have_no_source_code() {
        let err = AiflError::io(
            "cannot read 'missing.aifl'",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.source_code().is_none());
        assert!(err.labels().is_none());
        assert!(err.with_help("ignored").help().is_none());
    }
}

//! Lexer: text to classified tokens.
//!
//! Runs the grammar's `next_token` rule at successive positions, skipping
//! Unicode whitespace between tokens. The parser lexes first so a bad
//! character is always reported as a lexical error, never as a syntax error.

use log::trace;
use pest::Parser;
use serde::Serialize;

use crate::ast::Operator;
use crate::diagnostics::{AiflError, SourceContext};

use super::{operator_for, AiflGrammar, Rule, Span};

// ============================================================================
// TOKENS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Symbol,
    Identifier,
    StringLiteral,
    Operator(Operator),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Colon,
}

impl TokenKind {
    fn from_rule(rule: Rule) -> Option<TokenKind> {
        let kind = match rule {
            Rule::symbol => TokenKind::Symbol,
            Rule::identifier => TokenKind::Identifier,
            Rule::string_literal => TokenKind::StringLiteral,
            Rule::lparen => TokenKind::LParen,
            Rule::rparen => TokenKind::RParen,
            Rule::lbracket => TokenKind::LBracket,
            Rule::rbracket => TokenKind::RBracket,
            Rule::comma => TokenKind::Comma,
            Rule::colon => TokenKind::Colon,
            other => TokenKind::Operator(operator_for(other)?),
        };
        Some(kind)
    }

    /// Upper-case class name, e.g. `SYMBOL` or `AND`.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Symbol => "SYMBOL",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::StringLiteral => "STRING_LITERAL",
            TokenKind::Operator(op) => op.name(),
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBracket => "LBRACKET",
            TokenKind::RBracket => "RBRACKET",
            TokenKind::Comma => "COMMA",
            TokenKind::Colon => "COLON",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for TokenKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn operator(&self) -> Option<Operator> {
        match self.kind {
            TokenKind::Operator(op) => Some(op),
            _ => None,
        }
    }

    /// How the token reads in a diagnostic, e.g. `symbol 'ΔΕ1'`.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Symbol => format!("symbol '{}'", self.text),
            TokenKind::Identifier => format!("identifier '{}'", self.text),
            TokenKind::StringLiteral => format!("string literal {}", self.text),
            TokenKind::Operator(_) => format!("operator '{}'", self.text),
            _ => format!("'{}'", self.text),
        }
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Tokenize an inline expression.
pub fn tokenize(text: &str) -> Result<Vec<Token>, AiflError> {
    tokenize_source(&SourceContext::inline(text))
}

/// Tokenize the text of `source`, reporting errors against its name.
pub fn tokenize_source(source: &SourceContext<'_>) -> Result<Vec<Token>, AiflError> {
    let text = source.text;
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(ch) = text[pos..].chars().next() {
        if ch.is_whitespace() {
            pos += ch.len_utf8();
            continue;
        }

        let pair = AiflGrammar::parse(Rule::next_token, &text[pos..])
            .ok()
            .and_then(|mut pairs| pairs.next())
            .and_then(|token| token.into_inner().next())
            .ok_or_else(|| unrecognized(source, pos, ch))?;

        let kind = TokenKind::from_rule(pair.as_rule()).ok_or_else(|| unrecognized(source, pos, ch))?;
        let len = pair.as_str().len();
        tokens.push(Token {
            kind,
            text: pair.as_str().to_string(),
            span: Span::new(pos, pos + len),
        });
        pos += len;
    }

    trace!("lexed {} tokens from {}", tokens.len(), source.name);
    Ok(tokens)
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

fn unrecognized(source: &SourceContext<'_>, pos: usize, ch: char) -> AiflError {
    if ch == '\'' || ch == '"' {
        return AiflError::lex(
            "unterminated string literal",
            source,
            Span::new(pos, source.text.len()),
        )
        .with_help(format!(
            "close the literal with {}; string literals have no escapes",
            ch
        ));
    }

    AiflError::lex(
        format!("unrecognized character '{}'", ch),
        source,
        Span::new(pos, pos + ch.len_utf8()),
    )
    .with_help("expected a symbol, identifier, quoted string, one of ∴ ⇒ ≡ ∨ ∧ ⊗ ¬, or one of ( ) [ ] , :")
}

//! Syntax module for the AIFL notation
//!
//! Owns the compiled pest grammar, the source span type, and the two stages
//! that read text: the [`lexer`] (text to tokens) and the [`parser`] (tokens
//! to [`Node`](crate::ast::Node)).

use pest_derive::Parser;
use serde::Serialize;

use crate::ast::Operator;

pub mod lexer;
pub mod parser;

pub use lexer::{tokenize, Token, TokenKind};
pub use parser::AiflParser;

/// The grammar compiled from `grammar.pest`. Both the lexer and the parser
/// drive this one definition so they agree on every terminal.
#[derive(Parser)]
#[grammar = "syntax/grammar.pest"]
pub struct AiflGrammar;

/// A byte range in the source text.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A zero-width span at `pos`.
    pub fn point(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<pest::Span<'_>> for Span {
    fn from(span: pest::Span<'_>) -> Self {
        Self {
            start: span.start(),
            end: span.end(),
        }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Grammar rule for an operator glyph.
pub(crate) fn rule_for(operator: Operator) -> Rule {
    match operator {
        Operator::Therefore => Rule::op_therefore,
        Operator::Implies => Rule::op_implies,
        Operator::Equiv => Rule::op_equiv,
        Operator::Or => Rule::op_or,
        Operator::And => Rule::op_and,
        Operator::Compose => Rule::op_compose,
        Operator::Not => Rule::op_not,
    }
}

/// Operator recognised by a grammar rule, if the rule is an operator glyph.
pub(crate) fn operator_for(rule: Rule) -> Option<Operator> {
    Operator::ALL.into_iter().find(|op| rule_for(*op) == rule)
}

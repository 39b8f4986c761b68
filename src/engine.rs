//! The engine: one parser and one executor behind the public entry points.
//!
//! The CLI and library callers go through [`Engine`]; batch processing keeps
//! going past failing lines and reports each one as a [`BatchRecord`].

use std::path::Path;

use log::{debug, warn};
use serde::Serialize;

use crate::ast::Node;
use crate::diagnostics::{AiflError, ErrorKind, SourceContext};
use crate::runtime::Executor;
use crate::syntax::lexer::{tokenize_source, Token};
use crate::syntax::AiflParser;

// ============================================================================
// ENGINE - parse and trace pipeline
// ============================================================================

/// The parse → trace pipeline behind every entry point.
///
/// Owns one compiled [`AiflParser`] and one [`Executor`]. Neither holds
/// mutable state, so an `Engine` can be shared across threads and reused
/// for any number of expressions.
#[derive(Debug, Default)]
pub struct Engine {
    parser: AiflParser,
    executor: Executor,
}

/// The result of running one expression through the whole pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Processed {
    pub ast: Node,
    pub trace: String,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            parser: AiflParser::new(),
            executor: Executor::new(),
        }
    }

    pub fn parser(&self) -> &AiflParser {
        &self.parser
    }

    // ============================================================================
    // CORE CONTRACT
    // ============================================================================

    /// Parses an expression into its AST.
    pub fn parse(&self, expression: &str) -> Result<Node, AiflError> {
        self.parse_source(&SourceContext::inline(expression))
    }

    /// Parses an expression, then traces it. Parse errors are returned as-is.
    pub fn execute(&self, expression: &str) -> Result<String, AiflError> {
        self.execute_source(&SourceContext::inline(expression))
    }

    /// Traces an already-parsed tree.
    pub fn trace(&self, node: &Node) -> String {
        self.executor.trace(node)
    }

    // ============================================================================
    // SOURCE-AWARE VARIANTS
    // ============================================================================

    pub fn parse_source(&self, source: &SourceContext<'_>) -> Result<Node, AiflError> {
        self.parser.parse_source(source).map_err(|e| {
            debug!("{} failed to parse: {}", source.name, e);
            e
        })
    }

    pub fn execute_source(&self, source: &SourceContext<'_>) -> Result<String, AiflError> {
        let node = self.parse_source(source)?;
        let trace = self.trace(&node);
        debug!("trace: {}", trace);
        Ok(trace)
    }

    pub fn tokenize_source(&self, source: &SourceContext<'_>) -> Result<Vec<Token>, AiflError> {
        tokenize_source(source)
    }

    /// Parses and traces in one pass, keeping both results.
    pub fn process(&self, expression: &str) -> Result<Processed, AiflError> {
        let ast = self.parse(expression)?;
        let trace = self.trace(&ast);
        Ok(Processed { ast, trace })
    }

    // ============================================================================
    // BATCH PROCESSING
    // ============================================================================

    /// Processes one expression per line. Blank lines and lines starting
    /// with `#` are skipped; every other line is processed independently, so
    /// a failure on one line does not affect the rest.
    pub fn process_batch(&self, text: &str) -> Vec<BatchRecord> {
        let records: Vec<BatchRecord> = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
            .map(|(line, expression)| BatchRecord {
                line,
                expression: expression.to_string(),
                outcome: match self.process(expression) {
                    Ok(Processed { ast, trace }) => BatchOutcome::Success {
                        parsed_result: ast,
                        executed_result: trace,
                    },
                    Err(e) => BatchOutcome::Error {
                        error_kind: e.kind(),
                        message: e.to_string(),
                    },
                },
            })
            .collect();

        let failed = records.iter().filter(|r| !r.is_success()).count();
        if failed > 0 {
            warn!("{} of {} expressions failed", failed, records.len());
        }
        records
    }

    /// Reads a file with standardized error handling.
    pub fn read_file(path: &Path) -> Result<String, AiflError> {
        std::fs::read_to_string(path)
            .map_err(|e| AiflError::io(format!("cannot read '{}'", path.display()), e))
    }
}

/// Outcome of one line of a batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchRecord {
    pub line: usize,
    pub expression: String,
    #[serde(flatten)]
    pub outcome: BatchOutcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchOutcome {
    Success {
        parsed_result: Node,
        executed_result: String,
    },
    Error {
        error_kind: ErrorKind,
        message: String,
    },
}

impl BatchRecord {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, BatchOutcome::Success { .. })
    }
}

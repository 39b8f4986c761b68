//! Trace executor.
//!
//! Walks a [`Node`] and describes what it would do. Nothing is evaluated:
//! the trace is a pure function of the tree, so running it twice on the same
//! node always gives the same sentence.

use std::fmt::Write;

use crate::ast::{Node, Parameters, Symbol};

/// Produces trace sentences for parsed expressions.
///
/// | Node | Trace |
/// |---|---|
/// | symbol call, no parameters | `Executed symbol: ΔΔ1` |
/// | symbol call with parameters | `Executed function: ΔΕ1(Data: x, Mode: y)` |
/// | binary operation | `Executed operation: ∧ on <left> and <right>` |
/// | unary operation | `Executed operation: ¬ on <operand>` |
#[derive(Debug, Default, Clone, Copy)]
pub struct Executor;

impl Executor {
    pub fn new() -> Self {
        Executor
    }

    pub fn trace(&self, node: &Node) -> String {
        let mut out = String::new();
        write_trace(&mut out, node);
        out
    }
}

fn write_trace(out: &mut String, node: &Node) {
    match node {
        Node::SymbolCall { symbol, parameters } if parameters.is_empty() => {
            out.push_str("Executed symbol: ");
            out.push_str(symbol.as_str());
        }
        Node::SymbolCall { symbol, parameters } => write_function(out, symbol, parameters),
        Node::Operation {
            operator,
            left,
            right,
        } => {
            out.push_str("Executed operation: ");
            out.push_str(operator.as_str());
            out.push_str(" on ");
            write_trace(out, left);
            out.push_str(" and ");
            write_trace(out, right);
        }
        Node::UnaryOperation { operator, operand } => {
            out.push_str("Executed operation: ");
            out.push_str(operator.as_str());
            out.push_str(" on ");
            write_trace(out, operand);
        }
    }
}

fn write_function(out: &mut String, symbol: &Symbol, parameters: &Parameters) {
    // Writing into a String cannot fail.
    let _ = write!(out, "Executed function: {}(", symbol);
    for (i, (key, value)) in parameters.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{}: {}", key, value);
    }
    out.push(')');
}

//! AIFL: a symbolic notation of Greek operation symbols joined by logical
//! connectives.
//!
//! Expressions such as `ΔΕ1(Data: 'x') ∧ ΔΙ5 ⇒ ΔΖ3` are lexed and parsed into
//! a small tagged [`Node`] tree, which the [`Executor`] turns into a
//! human-readable trace. Nothing is evaluated against real data.
//!
//! ```rust
//! use aifl::Engine;
//! let engine = Engine::new();
//! assert_eq!(
//!     engine.execute("ΔΔ1 ∧ ΔΙ5").unwrap(),
//!     "Executed operation: ∧ on Executed symbol: ΔΔ1 and Executed symbol: ΔΙ5"
//! );
//! ```

pub use crate::ast::{Node, Operator, Parameters, Symbol, Value};
pub use crate::diagnostics::{AiflError, ErrorKind, SourceContext};
pub use crate::engine::Engine;
pub use crate::runtime::Executor;
pub use crate::syntax::{AiflParser, Span};

pub mod ast;
pub mod cli;
pub mod diagnostics;
pub mod engine;
pub mod runtime;
pub mod syntax;

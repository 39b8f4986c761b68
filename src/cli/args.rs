//! Defines the command-line arguments and subcommands for the AIFL CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "aifl",
    version,
    about = "Parse AIFL symbolic expressions and trace what they describe."
)]
pub struct AiflArgs {
    /// Increase log output (-v info, -vv debug, -vvv trace). RUST_LOG also works.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// When to use colors.
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    pub color: ColorMode,

    #[command(subcommand)]
    pub command: Command,
}

/// Where to read a single expression from. With neither an expression nor
/// `--file`, the expression is read from stdin.
#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// The expression, e.g. "ΔΔ1 ∧ ΔΙ5 ⇒ ΔΖ3".
    pub expression: Option<String>,

    /// Read the expression from a file instead.
    #[arg(short, long, conflicts_with = "expression")]
    pub file: Option<PathBuf>,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the Abstract Syntax Tree (AST) for an expression.
    Ast {
        #[command(flatten)]
        input: InputArgs,

        /// Output format.
        #[arg(long, value_enum, default_value_t = AstFormat::Json)]
        format: AstFormat,

        /// Print JSON on a single line.
        #[arg(long)]
        compact: bool,
    },
    /// Parse an expression and print its execution trace.
    Execute {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Print the token stream of an expression.
    Tokens {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Check that an expression parses, without printing the AST.
    Check {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Process a file with one expression per line, printing a JSON record per line.
    Batch {
        /// The file to process. Blank lines and lines starting with '#' are skipped.
        #[arg(required = true)]
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AstFormat {
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

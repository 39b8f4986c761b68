//! Handles all user-facing output for the CLI.
//!
//! This module is responsible for colorizing output, formatting errors, and
//! rendering JSON/YAML. Data goes to stdout; diagnostics go to stderr.

use std::io::Write;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::ast::Node;
use crate::cli::args::{AstFormat, ColorMode};
use crate::diagnostics::AiflError;
use crate::engine::BatchRecord;
use crate::syntax::Token;

/// Resolved color settings for one CLI run.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    stdout: ColorChoice,
    stderr: ColorChoice,
}

impl Output {
    pub fn new(mode: ColorMode) -> Self {
        Self {
            stdout: resolve(mode, atty::Stream::Stdout),
            stderr: resolve(mode, atty::Stream::Stderr),
        }
    }

    /// Renders an AST as JSON or YAML.
    pub fn render_ast(node: &Node, format: AstFormat, compact: bool) -> Result<String, AiflError> {
        match format {
            AstFormat::Json if compact => serde_json::to_string(node)
                .map_err(|e| AiflError::format("cannot render AST as JSON", e)),
            AstFormat::Json => serde_json::to_string_pretty(node)
                .map_err(|e| AiflError::format("cannot render AST as JSON", e)),
            AstFormat::Yaml => serde_yaml::to_string(node)
                .map(|s| s.trim_end().to_string())
                .map_err(|e| AiflError::format("cannot render AST as YAML", e)),
        }
    }

    pub fn print_text(&self, text: &str) {
        println!("{}", text);
    }

    /// One token per line: kind, text, byte span.
    pub fn print_tokens(&self, tokens: &[Token]) {
        let mut stdout = StandardStream::stdout(self.stdout);
        for token in tokens {
            let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true));
            let _ = write!(stdout, "{:<14}", token.kind.name());
            let _ = stdout.reset();
            let _ = write!(stdout, " {}", token.text);
            let _ = stdout.set_color(ColorSpec::new().set_dimmed(true));
            let _ = writeln!(stdout, "  {}", token.span);
            let _ = stdout.reset();
        }
    }

    /// Confirms a successful check.
    pub fn print_check(&self, node: &Node) {
        let mut stdout = StandardStream::stdout(self.stdout);
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
        let _ = write!(stdout, "ok");
        let _ = stdout.reset();
        let _ = writeln!(
            stdout,
            ": {} ({} symbols, depth {})",
            node.kind_name(),
            node.symbols().len(),
            node.depth()
        );
    }

    /// One JSON object per line.
    pub fn print_batch(&self, records: &[BatchRecord]) -> Result<(), AiflError> {
        for record in records {
            let line = serde_json::to_string(record)
                .map_err(|e| AiflError::format("cannot render batch record as JSON", e))?;
            println!("{}", line);
        }
        Ok(())
    }

    /// Renders a failure with miette on stderr.
    pub fn print_error(&self, error: AiflError) {
        let color = !matches!(self.stderr, ColorChoice::Never);
        let _ = miette::set_hook(Box::new(move |_| {
            Box::new(miette::MietteHandlerOpts::new().color(color).build())
        }));
        let report = miette::Report::new(error);
        eprintln!("{:?}", report);
    }
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

/// `auto` only colors a terminal; termcolor alone would color pipes too.
fn resolve(mode: ColorMode, stream: atty::Stream) -> ColorChoice {
    match mode {
        ColorMode::Always => ColorChoice::Always,
        ColorMode::Never => ColorChoice::Never,
        ColorMode::Auto if atty::is(stream) => ColorChoice::Auto,
        ColorMode::Auto => ColorChoice::Never,
    }
}

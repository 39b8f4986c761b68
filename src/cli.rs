//! Command-line interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::io::Read;
use std::process;

use clap::Parser;
use log::{debug, LevelFilter};

use crate::{diagnostics::AiflError, engine::Engine, SourceContext};

pub mod args;
pub mod output;

pub use args::{AiflArgs, AstFormat, ColorMode, Command, InputArgs};
pub use output::Output;

// ============================================================================
// MAIN ENTRY POINT - Direct engine calls
// ============================================================================

/// The main entry point for the CLI.
pub fn run() {
    let args = AiflArgs::parse();
    init_logging(args.verbose);

    let output = Output::new(args.color);
    let engine = Engine::new();

    let result = match args.command {
        Command::Ast {
            input,
            format,
            compact,
        } => with_input(&input, |source| {
            let node = engine.parse_source(source)?;
            output.print_text(&Output::render_ast(&node, format, compact)?);
            Ok(())
        }),

        Command::Execute { input } => with_input(&input, |source| {
            output.print_text(&engine.execute_source(source)?);
            Ok(())
        }),

        Command::Tokens { input } => with_input(&input, |source| {
            output.print_tokens(&engine.tokenize_source(source)?);
            Ok(())
        }),

        Command::Check { input } => with_input(&input, |source| {
            output.print_check(&engine.parse_source(source)?);
            Ok(())
        }),

        Command::Batch { file } => Engine::read_file(&file).and_then(|text| {
            let records = engine.process_batch(&text);
            output.print_batch(&records)?;
            if records.iter().any(|r| !r.is_success()) {
                process::exit(1);
            }
            Ok(())
        }),
    };

    if let Err(e) = result {
        output.print_error(e);
        process::exit(1);
    }
}

// ============================================================================
// HELPER FUNCTIONS - Common patterns extracted
// ============================================================================

/// `RUST_LOG` sets the baseline; each `-v` raises it one level.
fn init_logging(verbose: u8) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Info);
        }
        2 => {
            builder.filter_level(LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }
    let _ = builder.format_timestamp(None).try_init();
}

/// Resolves the input source and hands it to `f`.
fn with_input<F>(input: &InputArgs, f: F) -> Result<(), AiflError>
where
    F: FnOnce(&SourceContext<'_>) -> Result<(), AiflError>,
{
    let (name, text) = read_input(input)?;
    debug!("read {} bytes from {}", text.len(), name);
    f(&SourceContext::new(&name, text.trim_end()))
}

fn read_input(input: &InputArgs) -> Result<(String, String), AiflError> {
    if let Some(expression) = &input.expression {
        return Ok(("expression".to_string(), expression.clone()));
    }
    if let Some(path) = &input.file {
        return Ok((path.display().to_string(), Engine::read_file(path)?));
    }
    if atty::is(atty::Stream::Stdin) {
        return Err(AiflError::io(
            "no expression given; pass one as an argument or with --file",
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "stdin is a terminal"),
        ));
    }
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .map_err(|e| AiflError::io("cannot read stdin", e))?;
    Ok(("<stdin>".to_string(), text))
}

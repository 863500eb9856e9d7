// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! McScript CLI - REPL and file runner.

mod commands;
mod help;
mod output;

use std::env;
use std::process;
use std::sync::Once;

use mcscript_ast::LineMap;
use mcscript_interp::EvalConfig;

pub const VERSION: &str = "3.0";

static TRACING_INIT: Once = Once::new();

/// Install a tracing subscriber when `RUST_LOG` is set.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    });
}

fn main() {
    output::init();
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let (config, args) = match parse_options(args) {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("{}: {}", output::error_label(), message);
            process::exit(1);
        }
    };

    let Some(command) = args.first() else {
        commands::repl::cmd_repl(config);
        return;
    };

    match command.as_str() {
        "run" => commands::run::cmd_run(require_file(&args, "run"), config),
        "lex" => commands::phase::cmd_lex(require_file(&args, "lex")),
        "parse" => commands::phase::cmd_parse(require_file(&args, "parse")),
        "help" | "--help" | "-h" => help::print_usage(),
        "version" | "--version" | "-V" => println!("mcscript {}", VERSION),
        other => {
            // Treat as filename
            if other.ends_with(".mcs") {
                commands::run::cmd_run(other, config);
            } else {
                eprintln!("Unknown command: {}", other);
                help::print_usage();
                process::exit(1);
            }
        }
    }
}

fn require_file<'a>(args: &'a [String], command: &str) -> &'a str {
    match args.get(1) {
        Some(path) => path,
        None => {
            eprintln!("Usage: mcscript {} <file.mcs>", command);
            process::exit(1);
        }
    }
}

/// Split `--gc-threshold` and `--max-depth` out of the argument list.
fn parse_options(args: Vec<String>) -> Result<(EvalConfig, Vec<String>), String> {
    let mut config = EvalConfig::default();
    let mut rest = Vec::new();
    let mut iter = args.into_iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--gc-threshold" => {
                let value = iter.next().ok_or("--gc-threshold needs a value")?;
                config.gc_threshold = match value.as_str() {
                    "off" => None,
                    n => Some(
                        n.parse()
                            .map_err(|_| format!("invalid --gc-threshold '{}': expected a number or 'off'", n))?,
                    ),
                };
            }
            "--max-depth" => {
                let value = iter.next().ok_or("--max-depth needs a value")?;
                config.max_call_depth = value
                    .parse()
                    .map_err(|_| format!("invalid --max-depth '{}': expected a number", value))?;
            }
            _ => rest.push(arg),
        }
    }

    Ok((config, rest))
}

/// Print an error with the offending source line and a caret.
pub fn show_error(source: &str, pos: usize, message: &str, hint: Option<&str>) {
    let lines = LineMap::new(source);
    let (line_num, col) = lines.offset_to_line_col(pos);
    let line = lines.line_text(source, line_num).unwrap_or("");

    eprintln!();
    eprintln!("{}: {}", output::error_label(), message);
    eprintln!("  {} line {}:{}", output::error_arrow(), line_num, col);
    eprintln!("    {}", output::pipe());
    eprintln!("{} {} {}", output::line_number(line_num), output::pipe(), line);
    eprintln!(
        "    {} {}{}",
        output::pipe(),
        " ".repeat(col.saturating_sub(1)),
        output::caret()
    );

    if let Some(hint) = hint {
        eprintln!("    {}", output::pipe());
        eprintln!("    {} {}: {}", output::hint_equals(), output::hint_label(), hint);
    }
}

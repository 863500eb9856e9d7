// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Help text for CLI commands.

use crate::output;

pub fn print_usage() {
    println!(
        "{} {} - a small scripting language",
        output::title("McScript"),
        output::version(crate::VERSION)
    );
    println!();
    println!(
        "{}: {} {} {} {}",
        output::section_header("Usage"),
        output::command("mcscript"),
        output::arg("[options]"),
        output::arg("[command]"),
        output::arg("[args]")
    );
    println!();
    println!("{}", output::section_header("Commands:"));
    println!("  {}                Start the interactive REPL (no command)", output::command("(none)"));
    println!("  {} {}       Run a script", output::command("run"), output::arg("<file>"));
    println!("  {} {}       Tokenize a file and print tokens", output::command("lex"), output::arg("<file>"));
    println!("  {} {}     Parse a file and print the program", output::command("parse"), output::arg("<file>"));
    println!("  {}             Show this help", output::command("help"));
    println!("  {}          Show version", output::command("version"));
    println!();
    println!("{}", output::section_header("Options:"));
    println!(
        "  {} {}  Collect when more objects are tracked (default 10)",
        output::arg("--gc-threshold"),
        output::arg("<n|off>")
    );
    println!(
        "  {} {}         Maximum nested function calls (default 1000)",
        output::arg("--max-depth"),
        output::arg("<n>")
    );
    println!();
    println!("{}", output::section_header("Environment:"));
    println!("  {}  Enable logging, e.g. RUST_LOG=mcscript_interp=debug", output::arg("RUST_LOG"));
    println!("  {}  Disable colored output", output::arg("NO_COLOR"));
}

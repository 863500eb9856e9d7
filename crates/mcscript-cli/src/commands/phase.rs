// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Front-end inspection commands: lex, parse.

use std::process;

use mcscript_lexer::Lexer;

use crate::output;

pub fn cmd_lex(path: &str) {
    let source = super::load(path);
    let result = Lexer::new(&source).tokenize();

    for error in &result.errors {
        crate::show_error(&source, error.span.start, &error.message, error.hint.as_deref());
    }

    if !result.is_ok() {
        eprintln!("\n{}", output::banner_fail("Lex", result.errors.len()));
        process::exit(1);
    }

    for tok in &result.tokens {
        println!("{:4}:{:<3} {:?}", tok.span.start, tok.span.end, tok.kind);
    }
    println!("\n{}", output::banner_ok(&format!("Lex: {} tokens", result.tokens.len())));
}

pub fn cmd_parse(path: &str) {
    let source = super::load(path);
    let program = match super::frontend(&source) {
        Ok(program) => program,
        Err(count) => {
            eprintln!("\n{}", output::banner_fail("Parse", count));
            process::exit(1);
        }
    };

    println!("{}", program);
    println!("\n{}", output::banner_ok(&format!("Parse: {} statements", program.statements.len())));
}

// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Interactive read-eval-print loop.

use std::io::{self, BufRead, Write};

use mcscript_interp::{EvalConfig, Environment, Evaluator, Heap};
use tracing::debug;

use crate::output;

pub fn cmd_repl(config: EvalConfig) {
    println!("McScript v{}", crate::VERSION);

    let mut evaluator = Evaluator::with_config(config);
    let env = Environment::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{}", output::prompt());
        if io::stdout().flush().is_err() {
            break;
        }

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(err)) => {
                eprintln!("{}: {}", output::error_label(), err);
                break;
            }
            None => {
                println!();
                break;
            }
        };
        if line.trim() == "exit" {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        evaluator.maybe_collect();

        let Ok(program) = super::frontend(&line) else {
            continue;
        };
        let result = evaluator.eval(&program, &env);
        if evaluator.is_error(result) {
            eprintln!("{}", output::runtime_error(&evaluator.inspect(result)));
        } else if result != Heap::NULL {
            println!("{}", evaluator.inspect(result));
        }
    }

    let freed = evaluator.collect_all();
    debug!(freed, "released all objects at exit");
}

// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Script execution.

use std::process;

use mcscript_interp::{EvalConfig, Environment, Evaluator};
use tracing::debug;

use crate::output;

pub fn cmd_run(path: &str, config: EvalConfig) {
    let source = super::load(path);
    let program = match super::frontend(&source) {
        Ok(program) => program,
        Err(count) => {
            eprintln!("\n{}", output::banner_fail("Parse", count));
            process::exit(1);
        }
    };

    let mut evaluator = Evaluator::with_config(config);
    let env = Environment::new();
    let result = evaluator.eval(&program, &env);
    let failure = evaluator.is_error(result).then(|| evaluator.inspect(result));

    let freed = evaluator.collect_all();
    debug!(freed, "released all objects at exit");

    if let Some(message) = failure {
        eprintln!("{}", output::runtime_error(&message));
        process::exit(1);
    }
}

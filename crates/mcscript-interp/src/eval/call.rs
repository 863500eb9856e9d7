// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Function application.

use tracing::debug;

use crate::builtins::BuiltinFn;
use crate::env::Environment;
use crate::object::{Function, Object, ObjectId};

use super::{EvalResult, Evaluator, Unwind};

enum Callee {
    Builtin(BuiltinFn),
    Function(Function),
    Other,
}

impl Evaluator {
    pub(crate) fn apply_function(&mut self, callee: ObjectId, args: &[ObjectId]) -> EvalResult {
        let resolved = match self.heap.get(callee) {
            Some(Object::BuiltIn(builtin)) => Callee::Builtin(builtin.func),
            Some(Object::Function(function)) => Callee::Function(function.clone()),
            _ => Callee::Other,
        };
        match resolved {
            Callee::Builtin(func) => {
                let result = func(self, args);
                if self.is_error(result) {
                    Err(Unwind(result))
                } else {
                    Ok(result)
                }
            }
            Callee::Function(function) => self.call_function(&function, args),
            Callee::Other => Err(self.error(format!("{} is not a function", self.inspect(callee)))),
        }
    }

    /// Bind arguments in a fresh scope over the closure's environment, run
    /// the body, then release the scope.
    fn call_function(&mut self, function: &Function, args: &[ObjectId]) -> EvalResult {
        if args.len() != function.params.len() {
            return Err(self.error(format!(
                "wrong number of arguments. got={}, want={}",
                args.len(),
                function.params.len()
            )));
        }
        if self.call_depth >= self.config.max_call_depth {
            debug!(depth = self.call_depth, "call depth limit reached");
            return Err(self.error(format!(
                "maximum call depth exceeded ({})",
                self.config.max_call_depth
            )));
        }

        let call_env = Environment::new_child(&function.env);
        for (param, &arg) in function.params.iter().zip(args) {
            self.heap.add_ref(arg);
            if let Some(previous) = call_env.set(param, arg) {
                self.heap.subtract_ref(previous);
            }
        }

        self.call_depth += 1;
        let outcome = self.exec_block(&function.body, &call_env);
        self.call_depth -= 1;
        self.heap.release_scope(call_env);

        match outcome {
            Err(Unwind(id)) => match self.heap.get(id) {
                Some(Object::ReturnValue(value)) => Ok(*value),
                _ => Err(Unwind(id)),
            },
            ok => ok,
        }
    }
}

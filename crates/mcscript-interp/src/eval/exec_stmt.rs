// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Statement execution.

use mcscript_ast::{Block, Expr, Program, Stmt, StmtKind};
use mcscript_stack::ensure_sufficient_stack;

use crate::env::Environment;
use crate::heap::Heap;
use crate::object::{Object, ObjectId};

use super::{EvalResult, Evaluator, Unwind};

impl Evaluator {
    /// Run a program's statements in order.
    ///
    /// A `return` ends the program with its value; an error ends it with the
    /// error object. Automatic collection runs between statements.
    pub(crate) fn eval_program(&mut self, program: &Program, env: &Environment) -> ObjectId {
        let mut result = Heap::NULL;
        for (i, stmt) in program.statements.iter().enumerate() {
            if i > 0 {
                self.maybe_collect();
            }
            match self.exec_stmt(stmt, env) {
                Ok(id) => result = id,
                Err(Unwind(id)) => return self.unwrap_return(id),
            }
        }
        result
    }

    /// Run a block in `env`. The value is that of the last statement, or
    /// null for an empty block.
    pub(crate) fn exec_block(&mut self, block: &Block, env: &Environment) -> EvalResult {
        let mut result = Heap::NULL;
        for stmt in &block.statements {
            result = self.exec_stmt(stmt, env)?;
        }
        Ok(result)
    }

    pub(crate) fn exec_stmt(&mut self, stmt: &Stmt, env: &Environment) -> EvalResult {
        ensure_sufficient_stack(|| self.exec_stmt_inner(stmt, env))
    }

    fn exec_stmt_inner(&mut self, stmt: &Stmt, env: &Environment) -> EvalResult {
        match &stmt.kind {
            StmtKind::Var { name, value } => {
                let id = self.eval_expr(value, env)?;
                self.heap.add_ref(id);
                if let Some(previous) = env.set(name, id) {
                    self.heap.subtract_ref(previous);
                }
                Ok(Heap::NULL)
            }
            StmtKind::Return(value) => {
                let id = self.eval_expr(value, env)?;
                Err(Unwind(self.alloc(Object::ReturnValue(id))))
            }
            StmtKind::Expr(expr) => self.eval_expr(expr, env),
            StmtKind::For { init, condition, post, body } => {
                self.exec_for(init, condition, post, body, env)
            }
            StmtKind::Block(block) => self.exec_block(block, env),
        }
    }

    /// `for (init; condition; post) body`, all in one child scope that is
    /// released when the loop ends.
    fn exec_for(
        &mut self,
        init: &Stmt,
        condition: &Expr,
        post: &Expr,
        body: &Block,
        env: &Environment,
    ) -> EvalResult {
        let loop_env = Environment::new_child(env);
        let outcome = self.run_loop(init, condition, post, body, &loop_env);
        self.heap.release_scope(loop_env);
        outcome.map(|()| Heap::NULL)
    }

    fn run_loop(
        &mut self,
        init: &Stmt,
        condition: &Expr,
        post: &Expr,
        body: &Block,
        env: &Environment,
    ) -> Result<(), Unwind> {
        self.exec_stmt(init, env)?;
        // Only the `true` singleton continues the loop.
        while self.eval_expr(condition, env)? == Heap::TRUE {
            self.exec_block(body, env)?;
            self.eval_expr(post, env)?;
        }
        Ok(())
    }
}

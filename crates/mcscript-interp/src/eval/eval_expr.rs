// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Expression evaluation.

use std::rc::Rc;

use mcscript_ast::{Block, Expr, ExprKind};
use mcscript_stack::ensure_sufficient_stack;

use crate::env::Environment;
use crate::heap::Heap;
use crate::object::{Function, Object, ObjectId};

use super::{EvalResult, Evaluator};

impl Evaluator {
    pub(crate) fn eval_expr(&mut self, expr: &Expr, env: &Environment) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_expr_inner(expr, env))
    }

    fn eval_expr_inner(&mut self, expr: &Expr, env: &Environment) -> EvalResult {
        match &expr.kind {
            ExprKind::Ident(name) => self.eval_ident(name, env),
            ExprKind::Int(value) => Ok(self.alloc(Object::Integer(*value))),
            ExprKind::String(value) => Ok(self.alloc(Object::String(value.clone()))),
            ExprKind::Bool(value) => Ok(Heap::boolean(*value)),
            ExprKind::Prefix { op, operand } => {
                let operand = self.eval_expr(operand, env)?;
                self.eval_prefix(*op, operand)
            }
            ExprKind::Infix { op, left, right } => {
                let left = self.eval_expr(left, env)?;
                let right = self.eval_expr(right, env)?;
                self.eval_infix(*op, left, right)
            }
            ExprKind::If { condition, consequence, alternative } => {
                self.eval_if(condition, consequence, alternative.as_ref(), env)
            }
            ExprKind::Function { params, body } => Ok(self.alloc(Object::Function(Function {
                params: params.iter().cloned().collect(),
                body: Rc::new(body.clone()),
                env: env.clone(),
            }))),
            ExprKind::Call { callee, args } => {
                let callee = self.eval_expr(callee, env)?;
                let args = args
                    .iter()
                    .map(|arg| self.eval_expr(arg, env))
                    .collect::<Result<Vec<_>, _>>()?;
                self.apply_function(callee, &args)
            }
            ExprKind::Array(elements) => {
                let elements = elements
                    .iter()
                    .map(|element| self.eval_expr(element, env))
                    .collect::<Result<Vec<_>, _>>()?;
                for &element in &elements {
                    self.heap.add_ref(element);
                }
                Ok(self.alloc(Object::Array(elements)))
            }
            ExprKind::Index { target, index } => self.eval_index(target, index, env),
            ExprKind::Assign { target, value } => self.eval_assign(target, value, env),
        }
    }

    /// Environment chain first, then built-ins.
    fn eval_ident(&mut self, name: &str, env: &Environment) -> EvalResult {
        if let Some(id) = env.get(name) {
            return Ok(id);
        }
        if let Some(id) = self.builtin(name) {
            return Ok(id);
        }
        Err(self.error(format!("unexpected identifier: {}", name)))
    }

    fn eval_if(
        &mut self,
        condition: &Expr,
        consequence: &Block,
        alternative: Option<&Block>,
        env: &Environment,
    ) -> EvalResult {
        let condition = self.eval_expr(condition, env)?;
        if self.is_truthy(condition) {
            self.exec_block(consequence, env)
        } else if let Some(alternative) = alternative {
            self.exec_block(alternative, env)
        } else {
            Ok(Heap::NULL)
        }
    }

    /// The index is evaluated and checked before the target.
    fn eval_index(&mut self, target: &Expr, index: &Expr, env: &Environment) -> EvalResult {
        let index = self.eval_expr(index, env)?;
        let Some(&Object::Integer(position)) = self.heap.get(index) else {
            return Err(self.error(format!("object {} is not an integer", self.inspect(index))));
        };
        let target = self.eval_expr(target, env)?;
        let element = match self.heap.get(target) {
            Some(Object::Array(elements)) => usize::try_from(position)
                .ok()
                .and_then(|position| elements.get(position).copied()),
            _ => {
                return Err(self.error(format!("object {} is not an array", self.inspect(target))));
            }
        };
        Ok(element.unwrap_or(Heap::NULL))
    }

    /// `name = value`: rebinds `name` in the current scope.
    ///
    /// The name must already be bound somewhere in the chain. A binding
    /// from an enclosing scope is shadowed, not overwritten, so only a
    /// replaced local binding gives up its reference.
    fn eval_assign(&mut self, target: &Expr, value: &Expr, env: &Environment) -> EvalResult {
        let value = self.eval_expr(value, env)?;
        let ExprKind::Ident(name) = &target.kind else {
            return Err(self.error(format!("{} not an identifier", target)));
        };
        if env.get(name).is_none() {
            return Err(self.error(format!("unexpected identifier: {}", name)));
        }
        self.heap.add_ref(value);
        if let Some(previous) = env.set(name, value) {
            self.heap.subtract_ref(previous);
        }
        Ok(value)
    }

    /// Everything except `false` and `null` is truthy.
    pub(crate) fn is_truthy(&self, id: ObjectId) -> bool {
        id != Heap::FALSE && id != Heap::NULL
    }
}

// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Prefix and infix operators.

use mcscript_ast::{InfixOp, PrefixOp};

use crate::heap::Heap;
use crate::object::{Object, ObjectId};

use super::{EvalResult, Evaluator, Unwind};

impl Evaluator {
    pub(crate) fn eval_prefix(&mut self, op: PrefixOp, operand: ObjectId) -> EvalResult {
        match op {
            // `!` is true only for `false` and `null`.
            PrefixOp::Not => Ok(Heap::boolean(operand == Heap::FALSE || operand == Heap::NULL)),
            PrefixOp::Neg => match self.heap.get(operand) {
                Some(&Object::Integer(value)) => Ok(self.alloc(Object::Integer(value.wrapping_neg()))),
                _ => Err(self.error(format!("unknown operator: -{}", self.type_name(operand)))),
            },
        }
    }

    pub(crate) fn eval_infix(&mut self, op: InfixOp, left: ObjectId, right: ObjectId) -> EvalResult {
        match (self.heap.get(left), self.heap.get(right)) {
            (Some(&Object::Integer(a)), Some(&Object::Integer(b))) => self.eval_integer_infix(op, a, b),
            (Some(Object::String(a)), Some(Object::String(b))) => match op {
                InfixOp::Add => {
                    let joined = format!("{}{}", a, b);
                    Ok(self.alloc(Object::String(joined)))
                }
                _ => Err(self.unknown_infix(op, left, right)),
            },
            // Anything else only supports identity comparison.
            _ => match op {
                InfixOp::Eq => Ok(Heap::boolean(left == right)),
                InfixOp::Ne => Ok(Heap::boolean(left != right)),
                _ => Err(self.unknown_infix(op, left, right)),
            },
        }
    }

    fn eval_integer_infix(&mut self, op: InfixOp, a: i64, b: i64) -> EvalResult {
        let value = match op {
            InfixOp::Add => a.wrapping_add(b),
            InfixOp::Sub => a.wrapping_sub(b),
            InfixOp::Mul => a.wrapping_mul(b),
            InfixOp::Div => {
                if b == 0 {
                    return Err(self.error("division by zero"));
                }
                a.wrapping_div(b)
            }
            InfixOp::Lt => return Ok(Heap::boolean(a < b)),
            InfixOp::Gt => return Ok(Heap::boolean(a > b)),
            InfixOp::Eq => return Ok(Heap::boolean(a == b)),
            InfixOp::Ne => return Ok(Heap::boolean(a != b)),
        };
        Ok(self.alloc(Object::Integer(value)))
    }

    fn unknown_infix(&mut self, op: InfixOp, left: ObjectId, right: ObjectId) -> Unwind {
        let message = format!(
            "unknown operator: {} {} {}",
            self.type_name(left),
            op,
            self.type_name(right)
        );
        self.error(message)
    }
}

use std::io::Write;

use crate::interpreter::{
    evaluator::core::{EvalResult, Interpreter, Mode},
    operator::{BinaryOperator, Precedence, apply_binary},
    value::Value,
};

impl<W: Write> Interpreter<'_, W> {
    /// Evaluates a left-associative chain of operators at `level`.
    ///
    /// Each operand is parsed one level tighter, so a single loop covers every
    /// binary precedence level. `&&` and `||` skip their right operand once
    /// the left one decides the result.
    ///
    /// # Example
    /// ```
    /// use retread::get_output;
    ///
    /// assert_eq!(get_output("eval 1 + 2 * 3 << 1;").unwrap(), "14\n");
    /// assert_eq!(get_output("var x = 0; eval false && (x = 1) == 1; eval x;").unwrap(),
    ///            "false\n0\n");
    /// ```
    pub(crate) fn binary(&mut self, mode: Mode, level: Precedence) -> EvalResult<Value> {
        let mut left = self.operand(mode, level)?;
        loop {
            let lexeme = self.cursor.peek()?;
            let Some(op) = BinaryOperator::from_token(&lexeme.token).filter(|op| op.precedence() == level)
            else {
                break;
            };
            let at = lexeme.location();
            self.cursor.next()?;

            if mode.executes() && short_circuits(op, &left) {
                self.operand(Mode::Skip, level)?;
                continue;
            }

            let right = self.operand(mode, level)?;
            if mode.executes() {
                left = apply_binary(op, &left, &right, at)?;
            }
        }
        Ok(left)
    }

    fn operand(&mut self, mode: Mode, level: Precedence) -> EvalResult<Value> {
        match level.tighter() {
            Some(next) => self.binary(mode, next),
            None => self.unary(mode),
        }
    }
}

/// Returns `true` if `left` alone decides the result of `op`.
const fn short_circuits(op: BinaryOperator, left: &Value) -> bool {
    matches!((op, left),
             (BinaryOperator::And, Value::Bool(false)) | (BinaryOperator::Or, Value::Bool(true)))
}

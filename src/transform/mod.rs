//! Desugaring of convenience syntax into core forms
//!
//! Every rewrite is purely structural: no sub-expression is evaluated, and
//! the produced expression is handed back to the evaluator, which resolves
//! any sugar nested inside the expansion through its own recursion.

use crate::ast::form::{expect_operands, malformed, name_operand, operand_count};
use crate::ast::{Expr, Sugar};
use crate::diagnostics::EvalResult;

/// Rewrites sugared forms into core forms
#[derive(Debug, Clone, Copy, Default)]
pub struct Transformer;

impl Transformer {
    pub fn new() -> Self {
        Transformer
    }

    /// Expand `expr`, whose head tag was classified as `sugar`
    pub fn desugar(&self, sugar: Sugar, expr: &Expr) -> EvalResult<Expr> {
        let operands = expr.as_list().map(|items| &items[1..]).unwrap_or(&[]);
        let expansion = match sugar {
            Sugar::Def => self.def_to_var_lambda(operands)?,
            Sugar::Switch => self.switch_to_if(operands)?,
            Sugar::For => self.for_to_while(operands)?,
            Sugar::Inc => self.step_to_set(sugar, "+", operands)?,
            Sugar::Dec => self.step_to_set(sugar, "-", operands)?,
            Sugar::IncBy => self.step_by_to_set(sugar, "+", operands)?,
            Sugar::DecBy => self.step_by_to_set(sugar, "-", operands)?,
        };
        tracing::trace!("Desugared {} into {}", expr, expansion);
        Ok(expansion)
    }

    /// `(def name (params) body)` → `(var name (lambda (params) body))`
    pub fn def_to_var_lambda(&self, operands: &[Expr]) -> EvalResult<Expr> {
        let [name, params, body] = operands else {
            return Err(operand_count("def", 3, operands.len()));
        };
        name_operand("def", name)?;
        Ok(Expr::tagged(
            "var",
            [
                name.clone(),
                Expr::tagged("lambda", [params.clone(), body.clone()]),
            ],
        ))
    }

    /// `(switch (c1 b1) ... (else bN))` → `(if c1 b1 (if ... bN))`
    ///
    /// Without a trailing `else`, the innermost `if` has no alternate and the
    /// switch evaluates to null when no clause matches.
    pub fn switch_to_if(&self, clauses: &[Expr]) -> EvalResult<Expr> {
        let Some((last, rest)) = clauses.split_last() else {
            return Err(malformed("switch", "expected at least one clause"));
        };

        let (last_cond, last_block) = switch_clause(last)?;
        let mut expansion = if last_cond.as_symbol() == Some("else") {
            last_block.clone()
        } else {
            Expr::tagged("if", [last_cond.clone(), last_block.clone()])
        };

        for clause in rest.iter().rev() {
            let (cond, block) = switch_clause(clause)?;
            expansion = Expr::tagged("if", [cond.clone(), block.clone(), expansion]);
        }
        Ok(expansion)
    }

    /// `(for init cond step body)` → `(begin init (while cond (begin body step)))`
    pub fn for_to_while(&self, operands: &[Expr]) -> EvalResult<Expr> {
        let [init, condition, step, body] = operands else {
            return Err(operand_count("for", 4, operands.len()));
        };
        Ok(Expr::tagged(
            "begin",
            [
                init.clone(),
                Expr::tagged(
                    "while",
                    [
                        condition.clone(),
                        Expr::tagged("begin", [body.clone(), step.clone()]),
                    ],
                ),
            ],
        ))
    }

    /// `(++ x)` → `(set x (+ x 1))`, `(-- x)` → `(set x (- x 1))`
    fn step_to_set(&self, sugar: Sugar, op: &str, operands: &[Expr]) -> EvalResult<Expr> {
        expect_operands(sugar.as_str(), operands, 1)?;
        Ok(update(op, &operands[0], Expr::Number(1.0)))
    }

    /// `(+= x v)` → `(set x (+ x v))`, `(-= x v)` → `(set x (- x v))`
    fn step_by_to_set(&self, sugar: Sugar, op: &str, operands: &[Expr]) -> EvalResult<Expr> {
        expect_operands(sugar.as_str(), operands, 2)?;
        Ok(update(op, &operands[0], operands[1].clone()))
    }
}

/// `(set target (op target delta))`
fn update(op: &str, target: &Expr, delta: Expr) -> Expr {
    Expr::tagged(
        "set",
        [
            target.clone(),
            Expr::tagged(op, [target.clone(), delta]),
        ],
    )
}

fn switch_clause(clause: &Expr) -> EvalResult<(&Expr, &Expr)> {
    match clause.as_list() {
        Some([cond, block]) => Ok((cond, block)),
        _ => Err(malformed(
            "switch",
            format!("expected a `(condition block)` clause, found `{}`", clause),
        )),
    }
}

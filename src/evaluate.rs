use std::collections::HashMap;

use crate::types::Symbol;
use crate::{BinaryOp, EvaluationError, Formula, UnaryOp};

/// Name resolution for one evaluation: caller variables, then computed
/// symbols, then constants.
pub(crate) struct Scope<'a> {
    pub(crate) variables: Option<&'a HashMap<String, f64>>,
    pub(crate) symbols: &'a HashMap<String, Symbol>,
    pub(crate) constants: &'a HashMap<String, f64>,
}

impl Scope<'_> {
    fn lookup(&self, name: &str) -> Option<f64> {
        if let Some(v) = self.variables.and_then(|vars| vars.get(name)) {
            return Some(*v);
        }
        if let Some(symbol) = self.symbols.get(name) {
            return Some(symbol.value());
        }
        self.constants.get(name).copied()
    }
}

pub(crate) fn evaluate(formula: &Formula, scope: &Scope<'_>) -> Result<f64, EvaluationError> {
    match formula {
        Formula::Number(v) => Ok(*v),
        Formula::Variable(name) => {
            scope
                .lookup(name)
                .ok_or_else(|| EvaluationError::UnboundName {
                    name: name.clone(),
                })
        }
        Formula::Unary(op, inner) => {
            let v = evaluate(inner, scope)?;
            Ok(match op {
                UnaryOp::Neg => -v,
                UnaryOp::Plus => v,
                UnaryOp::Not => flag(!truth(v)),
            })
        }
        Formula::Binary(BinaryOp::And, a, b) => {
            Ok(flag(truth(evaluate(a, scope)?) && truth(evaluate(b, scope)?)))
        }
        Formula::Binary(BinaryOp::Or, a, b) => {
            Ok(flag(truth(evaluate(a, scope)?) || truth(evaluate(b, scope)?)))
        }
        Formula::Binary(op, a, b) => {
            let lhs = evaluate(a, scope)?;
            let rhs = evaluate(b, scope)?;
            Ok(apply(*op, lhs, rhs))
        }
        Formula::Conditional {
            condition,
            then,
            otherwise,
        } => {
            if truth(evaluate(condition, scope)?) {
                evaluate(then, scope)
            } else {
                evaluate(otherwise, scope)
            }
        }
        Formula::Call { function, args } => {
            let values = args
                .iter()
                .map(|arg| evaluate(arg, scope))
                .collect::<Result<Vec<f64>, _>>()?;
            call(function, &values)
        }
    }
}

#[allow(clippy::float_cmp)]
fn apply(op: BinaryOp, lhs: f64, rhs: f64) -> f64 {
    match op {
        BinaryOp::Add => lhs + rhs,
        BinaryOp::Sub => lhs - rhs,
        BinaryOp::Mul => lhs * rhs,
        BinaryOp::Div => lhs / rhs,
        BinaryOp::Rem => lhs % rhs,
        BinaryOp::Eq => flag(lhs == rhs),
        BinaryOp::Neq => flag(lhs != rhs),
        BinaryOp::Gt => flag(lhs > rhs),
        BinaryOp::Gte => flag(lhs >= rhs),
        BinaryOp::Lt => flag(lhs < rhs),
        BinaryOp::Lte => flag(lhs <= rhs),
        // Short-circuiting operators are handled before operand evaluation.
        BinaryOp::And => flag(truth(lhs) && truth(rhs)),
        BinaryOp::Or => flag(truth(lhs) || truth(rhs)),
    }
}

fn call(function: &str, args: &[f64]) -> Result<f64, EvaluationError> {
    let arity = |expected: &'static str| EvaluationError::Arity {
        function: function.to_owned(),
        expected,
        found: args.len(),
    };
    match (function, args) {
        ("min", [first, rest @ ..]) => Ok(rest.iter().fold(*first, |acc, v| acc.min(*v))),
        ("max", [first, rest @ ..]) => Ok(rest.iter().fold(*first, |acc, v| acc.max(*v))),
        ("min" | "max", []) => Err(arity("at least 1")),
        ("abs", [x]) => Ok(x.abs()),
        ("floor", [x]) => Ok(x.floor()),
        ("ceil", [x]) => Ok(x.ceil()),
        ("round", [x]) => Ok(x.round()),
        ("sqrt", [x]) => Ok(x.sqrt()),
        ("abs" | "floor" | "ceil" | "round" | "sqrt", _) => Err(arity("1")),
        ("pow", [x, y]) => Ok(x.powf(*y)),
        ("pow", _) => Err(arity("2")),
        ("clamp", [x, lo, hi]) => Ok(x.max(*lo).min(*hi)),
        ("clamp", _) => Err(arity("3")),
        _ => Err(EvaluationError::UnknownFunction {
            function: function.to_owned(),
        }),
    }
}

fn truth(v: f64) -> bool {
    v != 0.0
}

fn flag(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use crate::{EvaluationError, SymbolTable};

    fn eval(formula: &str) -> Result<f64, EvaluationError> {
        let mut table = SymbolTable::new();
        table.export([("ten", 10.0), ("zero", 0.0)]);
        table.build(formula).unwrap().evaluate()
    }

    #[test]
    fn eval_arithmetic() {
        assert_eq!(eval("41 + 1"), Ok(42.0));
        assert_eq!(eval("2 + 3 * 4"), Ok(14.0));
        assert_eq!(eval("(2 + 3) * 4"), Ok(20.0));
        assert_eq!(eval("10 - 4 - 3"), Ok(3.0));
        assert_eq!(eval("7 % 4"), Ok(3.0));
        assert_eq!(eval("-ten / 4"), Ok(-2.5));
    }

    #[test]
    fn eval_comparisons_yield_flags() {
        assert_eq!(eval("1 == 1"), Ok(1.0));
        assert_eq!(eval("1 != 1"), Ok(0.0));
        assert_eq!(eval("ten > 5"), Ok(1.0));
        assert_eq!(eval("ten >= 10"), Ok(1.0));
        assert_eq!(eval("ten < 10"), Ok(0.0));
        assert_eq!(eval("ten <= 9"), Ok(0.0));
    }

    #[test]
    fn eval_boolean_logic() {
        assert_eq!(eval("1 == 1 && true"), Ok(1.0));
        assert_eq!(eval("false || zero"), Ok(0.0));
        assert_eq!(eval("!zero"), Ok(1.0));
        assert_eq!(eval("!ten"), Ok(0.0));
    }

    #[test]
    fn eval_short_circuit_skips_unbound_names() {
        assert_eq!(eval("false && missing"), Ok(0.0));
        assert_eq!(eval("true || missing"), Ok(1.0));
        assert!(eval("true && missing").is_err());
    }

    #[test]
    fn eval_conditional_is_lazy() {
        assert_eq!(eval("ten > 5 ? 1 : missing"), Ok(1.0));
        assert_eq!(eval("zero ? missing : 2"), Ok(2.0));
    }

    #[test]
    fn eval_builtin_functions() {
        assert_eq!(eval("min(3, 1, 2)"), Ok(1.0));
        assert_eq!(eval("max(3, ten)"), Ok(10.0));
        assert_eq!(eval("abs(-2)"), Ok(2.0));
        assert_eq!(eval("floor(1.7) + ceil(1.2)"), Ok(3.0));
        assert_eq!(eval("round(2.5)"), Ok(3.0));
        assert_eq!(eval("sqrt(16)"), Ok(4.0));
        assert_eq!(eval("pow(2, 10)"), Ok(1024.0));
        assert_eq!(eval("clamp(ten, 0, 5)"), Ok(5.0));
    }

    #[test]
    fn eval_function_errors() {
        assert_eq!(
            eval("nope(1)"),
            Err(EvaluationError::UnknownFunction {
                function: "nope".into()
            })
        );
        assert_eq!(
            eval("pow(1)"),
            Err(EvaluationError::Arity {
                function: "pow".into(),
                expected: "2",
                found: 1
            })
        );
        assert!(matches!(eval("max()"), Err(EvaluationError::Arity { .. })));
    }

    #[test]
    fn eval_division_by_zero_is_infinite() {
        assert_eq!(eval("1 / zero"), Ok(f64::INFINITY));
    }
}

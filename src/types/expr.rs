use std::fmt;
use std::ops::Not;

/// Binary operators supported in formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    And,
    Or,
}

/// Prefix operators supported in formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
}

/// Formula AST produced by the parser. Every node evaluates to an `f64`;
/// booleans are represented as `1.0` / `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub enum Formula {
    Number(f64),
    Variable(String),
    Unary(UnaryOp, Box<Formula>),
    Binary(BinaryOp, Box<Formula>, Box<Formula>),
    Conditional {
        condition: Box<Formula>,
        then: Box<Formula>,
        otherwise: Box<Formula>,
    },
    Call {
        function: String,
        args: Vec<Formula>,
    },
}

impl BinaryOp {
    fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Neq => "!=",
            BinaryOp::Gt => ">",
            BinaryOp::Gte => ">=",
            BinaryOp::Lt => "<",
            BinaryOp::Lte => "<=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Neg => write!(f, "-"),
            UnaryOp::Plus => write!(f, "+"),
            UnaryOp::Not => write!(f, "!"),
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Number(v) => write!(f, "{v}"),
            Formula::Variable(name) => write!(f, "{name}"),
            Formula::Unary(op, inner) => write!(f, "({op}{inner})"),
            Formula::Binary(op, a, b) => write!(f, "({a} {op} {b})"),
            Formula::Conditional {
                condition,
                then,
                otherwise,
            } => write!(f, "({condition} ? {then} : {otherwise})"),
            Formula::Call { function, args } => {
                write!(f, "{function}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl Formula {
    #[must_use]
    pub fn binary(op: BinaryOp, lhs: Formula, rhs: Formula) -> Formula {
        Formula::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    #[must_use]
    pub fn and(self, other: Formula) -> Formula {
        Formula::binary(BinaryOp::And, self, other)
    }

    #[must_use]
    pub fn or(self, other: Formula) -> Formula {
        Formula::binary(BinaryOp::Or, self, other)
    }

    /// Number of levels in the tree; a lone number or variable is 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut deepest: usize = 0;
        let mut pending = vec![(self, 1)];
        while let Some((node, level)) = pending.pop() {
            deepest = deepest.max(level);
            match node {
                Formula::Number(_) | Formula::Variable(_) => {}
                Formula::Unary(_, inner) => pending.push((&**inner, level + 1)),
                Formula::Binary(_, a, b) => {
                    pending.push((&**a, level + 1));
                    pending.push((&**b, level + 1));
                }
                Formula::Conditional {
                    condition,
                    then,
                    otherwise,
                } => {
                    for branch in [condition, then, otherwise] {
                        pending.push((&**branch, level + 1));
                    }
                }
                Formula::Call { args, .. } => {
                    pending.extend(args.iter().map(|arg| (arg, level + 1)));
                }
            }
        }
        deepest
    }

    /// Collect every variable name referenced by this formula, in first-use order.
    #[must_use]
    pub fn variables(&self) -> Vec<&str> {
        let mut out = Vec::new();
        collect_variables(self, &mut out);
        out
    }
}

fn collect_variables<'a>(formula: &'a Formula, out: &mut Vec<&'a str>) {
    match formula {
        Formula::Number(_) => {}
        Formula::Variable(name) => {
            if !out.contains(&name.as_str()) {
                out.push(name);
            }
        }
        Formula::Unary(_, inner) => collect_variables(inner, out),
        Formula::Binary(_, a, b) => {
            collect_variables(a, out);
            collect_variables(b, out);
        }
        Formula::Conditional {
            condition,
            then,
            otherwise,
        } => {
            collect_variables(condition, out);
            collect_variables(then, out);
            collect_variables(otherwise, out);
        }
        Formula::Call { args, .. } => {
            for arg in args {
                collect_variables(arg, out);
            }
        }
    }
}

impl Not for Formula {
    type Output = Formula;

    fn not(self) -> Formula {
        Formula::Unary(UnaryOp::Not, Box::new(self))
    }
}

/// Shorthand for a [`Formula::Variable`].
#[must_use]
pub fn var(name: &str) -> Formula {
    Formula::Variable(name.to_owned())
}

/// Shorthand for a [`Formula::Number`].
#[must_use]
pub fn num(value: f64) -> Formula {
    Formula::Number(value)
}

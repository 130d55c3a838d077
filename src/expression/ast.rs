//! expression tree and its evaluation

use super::ExpressionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

/// a parsed formula
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    /// constant, or a name resolved through the lookup callback
    Name(String),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Conditional(Box<Expr>, Box<Expr>, Box<Expr>),
    Call(String, Vec<Expr>),
}

fn truth(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

impl Expr {
    /// evaluate against a name lookup
    pub fn eval(&self, lookup: &dyn Fn(&str) -> Option<f64>) -> Result<f64, ExpressionError> {
        match self {
            Expr::Number(n) => Ok(*n),
            Expr::Name(name) => resolve_name(name, lookup),
            Expr::Unary(op, inner) => {
                let v = inner.eval(lookup)?;
                Ok(match op {
                    UnaryOp::Neg => -v,
                    UnaryOp::Not => truth(v == 0.0),
                })
            }
            Expr::Binary(BinaryOp::And, a, b) => {
                // short-circuit, so an unresolved name on the dead side is harmless
                if a.eval(lookup)? == 0.0 {
                    return Ok(0.0);
                }
                Ok(truth(b.eval(lookup)? != 0.0))
            }
            Expr::Binary(BinaryOp::Or, a, b) => {
                if a.eval(lookup)? != 0.0 {
                    return Ok(1.0);
                }
                Ok(truth(b.eval(lookup)? != 0.0))
            }
            Expr::Binary(op, a, b) => {
                let a = a.eval(lookup)?;
                let b = b.eval(lookup)?;
                binary(*op, a, b)
            }
            Expr::Conditional(cond, then, otherwise) => {
                if cond.eval(lookup)? != 0.0 {
                    then.eval(lookup)
                } else {
                    otherwise.eval(lookup)
                }
            }
            Expr::Call(name, args) => {
                let values = args
                    .iter()
                    .map(|a| a.eval(lookup))
                    .collect::<Result<Vec<f64>, _>>()?;
                call(name, &values)
            }
        }
    }
}

fn binary(op: BinaryOp, a: f64, b: f64) -> Result<f64, ExpressionError> {
    Ok(match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => {
            if b == 0.0 {
                return Err(ExpressionError::DivisionByZero);
            }
            a / b
        }
        BinaryOp::Mod => {
            if b == 0.0 {
                return Err(ExpressionError::DivisionByZero);
            }
            a % b
        }
        BinaryOp::Pow => a.powf(b),
        BinaryOp::Eq => truth(a == b),
        BinaryOp::Ne => truth(a != b),
        BinaryOp::Lt => truth(a < b),
        BinaryOp::Le => truth(a <= b),
        BinaryOp::Gt => truth(a > b),
        BinaryOp::Ge => truth(a >= b),
        BinaryOp::And => truth(a != 0.0 && b != 0.0),
        BinaryOp::Or => truth(a != 0.0 || b != 0.0),
    })
}

fn resolve_name(name: &str, lookup: &dyn Fn(&str) -> Option<f64>) -> Result<f64, ExpressionError> {
    match name.to_ascii_lowercase().as_str() {
        "pi" => Ok(std::f64::consts::PI),
        "e" => Ok(std::f64::consts::E),
        _ => lookup(name).ok_or_else(|| ExpressionError::UnknownName(name.to_string())),
    }
}

/// names accepted in call position
pub fn is_function(name: &str) -> bool {
    FUNCTIONS.contains(&name.to_ascii_lowercase().as_str())
}

const FUNCTIONS: &[&str] = &[
    "abs", "ceil", "floor", "trunc", "frac", "sgn", "sqrt", "exp", "ln", "log", "sin", "cos", "tan",
    "asin", "acos", "atan", "atan2", "min", "max", "clamp", "round",
];

fn arity(name: &str, args: &[f64], expected: &'static str, ok: bool) -> Result<(), ExpressionError> {
    if ok {
        Ok(())
    } else {
        Err(ExpressionError::ArgumentCount {
            name: name.to_string(),
            expected,
            got: args.len(),
        })
    }
}

fn call(name: &str, args: &[f64]) -> Result<f64, ExpressionError> {
    let lower = name.to_ascii_lowercase();
    let unary = |f: fn(f64) -> f64| -> Result<f64, ExpressionError> {
        arity(name, args, "1", args.len() == 1)?;
        Ok(f(args[0]))
    };

    match lower.as_str() {
        "abs" => unary(f64::abs),
        "ceil" => unary(f64::ceil),
        "floor" => unary(f64::floor),
        "trunc" => unary(f64::trunc),
        "frac" => unary(f64::fract),
        "sgn" => unary(|v| {
            if v > 0.0 {
                1.0
            } else if v < 0.0 {
                -1.0
            } else {
                0.0
            }
        }),
        "sqrt" => unary(f64::sqrt),
        "exp" => unary(f64::exp),
        "ln" => unary(f64::ln),
        "log" => unary(f64::log10),
        "sin" => unary(f64::sin),
        "cos" => unary(f64::cos),
        "tan" => unary(f64::tan),
        "asin" => unary(f64::asin),
        "acos" => unary(f64::acos),
        "atan" => unary(f64::atan),
        "atan2" => {
            arity(name, args, "2", args.len() == 2)?;
            Ok(args[0].atan2(args[1]))
        }
        "min" => {
            arity(name, args, "2", args.len() == 2)?;
            Ok(args[0].min(args[1]))
        }
        "max" => {
            arity(name, args, "2", args.len() == 2)?;
            Ok(args[0].max(args[1]))
        }
        "clamp" => {
            arity(name, args, "3", args.len() == 3)?;
            Ok(args[0].max(args[1]).min(args[2]))
        }
        "round" => {
            arity(name, args, "1 or 2", args.len() == 1 || args.len() == 2)?;
            let digits = args.get(1).copied().unwrap_or(0.0).trunc() as i32;
            let scale = 10f64.powi(digits);
            Ok((args[0] * scale).round() / scale)
        }
        _ => Err(ExpressionError::UnknownName(name.to_string())),
    }
}

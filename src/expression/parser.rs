//! recursive-descent parser producing an [`Expr`]
//!
//! precedence, lowest first:
//! `?:`, `||`, `&&`, `= != <>`, `< <= > >=`, `+ -`, `* / %`, unary `- + !`, `^`
//!
//! both the parser's own recursion and the depth of the resulting tree are
//! capped at [`MAX_DEPTH`], so evaluating or dropping an accepted tree stays
//! within a small, fixed stack budget

use super::ast::{is_function, BinaryOp, Expr, UnaryOp};
use super::lexer::{tokenize, Token};
use super::ExpressionError;

/// deepest tree, and deepest parser nesting, a formula may produce
pub const MAX_DEPTH: usize = 128;

/// a subtree and its depth (a leaf is 1)
type Parsed = (Expr, usize);

/// parse formula text into an expression tree
pub fn parse_expr(text: &str) -> Result<Expr, ExpressionError> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(ExpressionError::Empty);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        nesting: 0,
    };
    let (expr, _) = parser.conditional()?;

    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(ExpressionError::UnexpectedToken(token.to_string())),
    }
}

fn node(expr: Expr, depth: usize) -> Result<Parsed, ExpressionError> {
    if depth > MAX_DEPTH {
        return Err(ExpressionError::TooDeep(MAX_DEPTH));
    }
    Ok((expr, depth))
}

fn binary_node(op: BinaryOp, lhs: Parsed, rhs: Parsed) -> Result<Parsed, ExpressionError> {
    let depth = lhs.1.max(rhs.1) + 1;
    node(Expr::Binary(op, Box::new(lhs.0), Box::new(rhs.0)), depth)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    nesting: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), ExpressionError> {
        match self.next() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(ExpressionError::UnexpectedToken(token.to_string())),
            None => Err(ExpressionError::UnexpectedEnd),
        }
    }

    /// run `f` one nesting level down; fails before recursing past the cap
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ExpressionError>,
    ) -> Result<T, ExpressionError> {
        if self.nesting >= MAX_DEPTH {
            return Err(ExpressionError::TooDeep(MAX_DEPTH));
        }
        self.nesting += 1;
        let result = f(self);
        self.nesting -= 1;
        result
    }

    fn conditional(&mut self) -> Result<Parsed, ExpressionError> {
        self.nested(|p| {
            let cond = p.or()?;
            if !p.eat(&Token::Question) {
                return Ok(cond);
            }

            let then = p.conditional()?;
            p.expect(Token::Colon)?;
            let otherwise = p.conditional()?;

            let depth = cond.1.max(then.1).max(otherwise.1) + 1;
            node(
                Expr::Conditional(Box::new(cond.0), Box::new(then.0), Box::new(otherwise.0)),
                depth,
            )
        })
    }

    fn or(&mut self) -> Result<Parsed, ExpressionError> {
        let mut lhs = self.and()?;
        while self.eat(&Token::Or) {
            let rhs = self.and()?;
            lhs = binary_node(BinaryOp::Or, lhs, rhs)?;
        }
        Ok(lhs)
    }

    fn and(&mut self) -> Result<Parsed, ExpressionError> {
        let mut lhs = self.equality()?;
        while self.eat(&Token::And) {
            let rhs = self.equality()?;
            lhs = binary_node(BinaryOp::And, lhs, rhs)?;
        }
        Ok(lhs)
    }

    fn equality(&mut self) -> Result<Parsed, ExpressionError> {
        let mut lhs = self.relational()?;
        loop {
            let op = match self.peek() {
                Some(Token::Eq) => BinaryOp::Eq,
                Some(Token::Ne) => BinaryOp::Ne,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.relational()?;
            lhs = binary_node(op, lhs, rhs)?;
        }
    }

    fn relational(&mut self) -> Result<Parsed, ExpressionError> {
        let mut lhs = self.additive()?;
        loop {
            let op = match self.peek() {
                Some(Token::Lt) => BinaryOp::Lt,
                Some(Token::Le) => BinaryOp::Le,
                Some(Token::Gt) => BinaryOp::Gt,
                Some(Token::Ge) => BinaryOp::Ge,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.additive()?;
            lhs = binary_node(op, lhs, rhs)?;
        }
    }

    fn additive(&mut self) -> Result<Parsed, ExpressionError> {
        let mut lhs = self.multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.multiplicative()?;
            lhs = binary_node(op, lhs, rhs)?;
        }
    }

    fn multiplicative(&mut self) -> Result<Parsed, ExpressionError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::Percent) => BinaryOp::Mod,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = binary_node(op, lhs, rhs)?;
        }
    }

    fn unary(&mut self) -> Result<Parsed, ExpressionError> {
        self.nested(|p| {
            let op = match p.peek() {
                Some(Token::Minus) => UnaryOp::Neg,
                Some(Token::Bang) => UnaryOp::Not,
                Some(Token::Plus) => {
                    p.pos += 1;
                    return p.unary();
                }
                _ => return p.power(),
            };
            p.pos += 1;
            let (inner, depth) = p.unary()?;
            node(Expr::Unary(op, Box::new(inner)), depth + 1)
        })
    }

    fn power(&mut self) -> Result<Parsed, ExpressionError> {
        let base = self.primary()?;
        if self.eat(&Token::Caret) {
            // right-associative; the exponent may carry its own sign
            let exponent = self.unary()?;
            return binary_node(BinaryOp::Pow, base, exponent);
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Parsed, ExpressionError> {
        match self.next() {
            Some(Token::Number(n)) => Ok((Expr::Number(n), 1)),
            Some(Token::LParen) => {
                let inner = self.conditional()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Some(Token::Ident(name)) => {
                if self.peek() == Some(&Token::LParen) {
                    if !is_function(&name) {
                        return Err(ExpressionError::UnknownName(name));
                    }
                    self.pos += 1;
                    let (args, depth) = self.arguments()?;
                    return node(Expr::Call(name, args), depth + 1);
                }
                Ok((Expr::Name(name), 1))
            }
            Some(token) => Err(ExpressionError::UnexpectedToken(token.to_string())),
            None => Err(ExpressionError::UnexpectedEnd),
        }
    }

    /// call arguments and the depth of the deepest one
    fn arguments(&mut self) -> Result<(Vec<Expr>, usize), ExpressionError> {
        let mut args = Vec::new();
        let mut depth = 0;
        if self.eat(&Token::RParen) {
            return Ok((args, depth));
        }

        loop {
            let (arg, arg_depth) = self.conditional()?;
            args.push(arg);
            depth = depth.max(arg_depth);
            if self.eat(&Token::Comma) {
                continue;
            }
            self.expect(Token::RParen)?;
            return Ok((args, depth));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(text: &str) -> Result<f64, ExpressionError> {
        parse_expr(text)?.eval(&|name: &str| match name {
            "CPU" => Some(42.0),
            "Zero" => Some(0.0),
            _ => None,
        })
    }

    #[test]
    fn test_arithmetic_precedence() {
        assert_eq!(eval("1 + 2 * 3"), Ok(7.0));
        assert_eq!(eval("(1 + 2) * 3"), Ok(9.0));
        assert_eq!(eval("2 ^ 3 ^ 2"), Ok(512.0));
        assert_eq!(eval("-2 ^ 2"), Ok(-4.0));
        assert_eq!(eval("2 ^ -1"), Ok(0.5));
        assert_eq!(eval("7 % 4"), Ok(3.0));
    }

    #[test]
    fn test_comparisons_yield_truth_values() {
        assert_eq!(eval("CPU > 40"), Ok(1.0));
        assert_eq!(eval("CPU = 42"), Ok(1.0));
        assert_eq!(eval("CPU == 41"), Ok(0.0));
        assert_eq!(eval("CPU <> 41"), Ok(1.0));
        assert_eq!(eval("CPU >= 40 && CPU <= 50"), Ok(1.0));
        assert_eq!(eval("Zero || CPU < 10"), Ok(0.0));
        assert_eq!(eval("!Zero"), Ok(1.0));
    }

    #[test]
    fn test_ternary() {
        assert_eq!(eval("CPU > 50 ? 1 : 2"), Ok(2.0));
        assert_eq!(eval("Zero ? 1 : CPU > 0 ? 3 : 4"), Ok(3.0));
    }

    #[test]
    fn test_functions_and_constants() {
        assert_eq!(eval("max(CPU, 50)"), Ok(50.0));
        assert_eq!(eval("clamp(CPU, 0, 10)"), Ok(10.0));
        assert_eq!(eval("abs(-3)"), Ok(3.0));
        assert_eq!(eval("floor(PI)"), Ok(3.0));
    }

    #[test]
    fn test_errors() {
        assert_eq!(eval(""), Err(ExpressionError::Empty));
        assert_eq!(eval("(1 + 2"), Err(ExpressionError::UnexpectedEnd));
        assert_eq!(
            eval("1 + 2)"),
            Err(ExpressionError::UnexpectedToken(")".into()))
        );
        assert_eq!(
            eval("Missing > 1"),
            Err(ExpressionError::UnknownName("Missing".into()))
        );
        assert_eq!(
            eval("nope(1)"),
            Err(ExpressionError::UnknownName("nope".into()))
        );
        assert_eq!(eval("CPU / Zero"), Err(ExpressionError::DivisionByZero));
        assert_eq!(eval("1 ? 2"), Err(ExpressionError::UnexpectedEnd));
    }

    #[test]
    fn test_long_chain_within_limit() {
        let text = vec!["CPU"; 100].join(" + ");
        assert_eq!(eval(&text), Ok(4200.0));
    }

    #[test]
    fn test_long_chain_rejected() {
        let text = vec!["CPU"; 10_000].join(" + ");
        assert_eq!(eval(&text), Err(ExpressionError::TooDeep(MAX_DEPTH)));
    }

    #[test]
    fn test_deep_nesting_rejected() {
        let ok = format!("{}CPU{}", "(".repeat(50), ")".repeat(50));
        assert_eq!(eval(&ok), Ok(42.0));

        let deep = format!("{}CPU{}", "(".repeat(10_000), ")".repeat(10_000));
        assert_eq!(eval(&deep), Err(ExpressionError::TooDeep(MAX_DEPTH)));

        let signs = format!("{}CPU", "-".repeat(10_000));
        assert_eq!(eval(&signs), Err(ExpressionError::TooDeep(MAX_DEPTH)));

        let powers = vec!["1"; 10_000].join(" ^ ");
        assert_eq!(eval(&powers), Err(ExpressionError::TooDeep(MAX_DEPTH)));

        let ternaries = format!("{}1", "1 ? 1 : ".repeat(10_000));
        assert_eq!(eval(&ternaries), Err(ExpressionError::TooDeep(MAX_DEPTH)));
    }
}

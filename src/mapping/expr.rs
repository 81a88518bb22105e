//! A minimal recursive-descent compiler for two-variable real expressions.
//!
//! This replaces the reference implementation's `sympy`-based parser
//! (`settings/managing.py::_parse_two_argument_function`), which accepted arbitrary symbolic
//! expressions and rejected any free variable other than `x`/`y`. Symbolic (CAS-style) analysis
//! of the mapping is explicitly out of scope, so the grammar here is fixed and
//! small: numeric literals, `x`, `y`, `+ - * / ^`, unary minus, parentheses, and the function
//! calls `sin cos tan exp ln sqrt abs`.

use super::Mapping1D;
use crate::error::{CrError, CrResult};

/// A compiled two-variable expression, usable anywhere a [`Mapping1D`] is expected.
#[derive(Debug, Clone)]
pub struct ExprMapping {
    source: String,
    root: Node,
}

impl ExprMapping {
    /// Parse `text` as a function of `x` and `y`. Fails on an empty expression, unbalanced
    /// parentheses, trailing tokens, an unknown function name, or a free identifier other than
    /// `x`/`y`.
    pub fn compile(text: &str) -> CrResult<Self> {
        let tokens = tokenize(text)?;
        if tokens.is_empty() {
            return Err(CrError::ExpressionError("empty expression".to_string()));
        }
        let mut parser = Parser { tokens, pos: 0 };
        let root = parser.parse_expr()?;
        if parser.pos != parser.tokens.len() {
            return Err(CrError::ExpressionError(format!(
                "trailing tokens after position {}",
                parser.pos
            )));
        }
        Ok(Self {
            source: text.to_string(),
            root,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl Mapping1D for ExprMapping {
    fn eval(&self, x: f64, y: f64) -> f64 {
        self.root.eval(x, y)
    }
}

#[derive(Debug, Clone)]
enum Node {
    Var(Var),
    Num(f64),
    Neg(Box<Node>),
    Bin(BinOp, Box<Node>, Box<Node>),
    Call(Func, Box<Node>),
}

#[derive(Debug, Clone, Copy)]
enum Var {
    X,
    Y,
}

#[derive(Debug, Clone, Copy)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Debug, Clone, Copy)]
enum Func {
    Sin,
    Cos,
    Tan,
    Exp,
    Ln,
    Sqrt,
    Abs,
}

impl Func {
    fn from_name(name: &str) -> Option<Func> {
        Some(match name {
            "sin" => Func::Sin,
            "cos" => Func::Cos,
            "tan" => Func::Tan,
            "exp" => Func::Exp,
            "ln" => Func::Ln,
            "sqrt" => Func::Sqrt,
            "abs" => Func::Abs,
            _ => return None,
        })
    }

    fn apply(self, v: f64) -> f64 {
        match self {
            Func::Sin => v.sin(),
            Func::Cos => v.cos(),
            Func::Tan => v.tan(),
            Func::Exp => v.exp(),
            Func::Ln => v.ln(),
            Func::Sqrt => v.sqrt(),
            Func::Abs => v.abs(),
        }
    }
}

impl Node {
    fn eval(&self, x: f64, y: f64) -> f64 {
        match self {
            Node::Var(Var::X) => x,
            Node::Var(Var::Y) => y,
            Node::Num(v) => *v,
            Node::Neg(inner) => -inner.eval(x, y),
            Node::Bin(op, lhs, rhs) => {
                let l = lhs.eval(x, y);
                let r = rhs.eval(x, y);
                match op {
                    BinOp::Add => l + r,
                    BinOp::Sub => l - r,
                    BinOp::Mul => l * r,
                    BinOp::Div => l / r,
                    BinOp::Pow => l.powf(r),
                }
            }
            Node::Call(func, inner) => func.apply(inner.eval(x, y)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

fn tokenize(text: &str) -> CrResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        match c {
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '^' => {
                tokens.push(Token::Caret);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            _ if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                let value: f64 = literal.parse().map_err(|_| {
                    CrError::ExpressionError(format!("invalid numeric literal '{literal}'"))
                })?;
                tokens.push(Token::Num(value));
            }
            _ if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let ident: String = chars[start..i].iter().collect();
                tokens.push(Token::Ident(ident));
            }
            other => {
                return Err(CrError::ExpressionError(format!(
                    "unexpected character '{other}'"
                )))
            }
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, expected: &Token) -> CrResult<()> {
        match self.bump() {
            Some(ref tok) if tok == expected => Ok(()),
            other => Err(CrError::ExpressionError(format!(
                "expected {expected:?}, found {other:?}"
            ))),
        }
    }

    // expr := term (('+' | '-') term)*
    fn parse_expr(&mut self) -> CrResult<Node> {
        let mut node = self.parse_term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.bump();
                    let rhs = self.parse_term()?;
                    node = Node::Bin(BinOp::Add, Box::new(node), Box::new(rhs));
                }
                Some(Token::Minus) => {
                    self.bump();
                    let rhs = self.parse_term()?;
                    node = Node::Bin(BinOp::Sub, Box::new(node), Box::new(rhs));
                }
                _ => break,
            }
        }
        Ok(node)
    }

    // term := unary (('*' | '/') unary)*
    fn parse_term(&mut self) -> CrResult<Node> {
        let mut node = self.parse_unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.bump();
                    let rhs = self.parse_unary()?;
                    node = Node::Bin(BinOp::Mul, Box::new(node), Box::new(rhs));
                }
                Some(Token::Slash) => {
                    self.bump();
                    let rhs = self.parse_unary()?;
                    node = Node::Bin(BinOp::Div, Box::new(node), Box::new(rhs));
                }
                _ => break,
            }
        }
        Ok(node)
    }

    // unary := '-' unary | power
    fn parse_unary(&mut self) -> CrResult<Node> {
        if matches!(self.peek(), Some(Token::Minus)) {
            self.bump();
            return Ok(Node::Neg(Box::new(self.parse_unary()?)));
        }
        if matches!(self.peek(), Some(Token::Plus)) {
            self.bump();
            return self.parse_unary();
        }
        self.parse_power()
    }

    // power := atom ('^' unary)?  -- right-associative
    fn parse_power(&mut self) -> CrResult<Node> {
        let base = self.parse_atom()?;
        if matches!(self.peek(), Some(Token::Caret)) {
            self.bump();
            let exponent = self.parse_unary()?;
            return Ok(Node::Bin(BinOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    // atom := number | 'x' | 'y' | func '(' expr ')' | '(' expr ')'
    fn parse_atom(&mut self) -> CrResult<Node> {
        match self.bump() {
            Some(Token::Num(value)) => Ok(Node::Num(value)),
            Some(Token::Ident(name)) => {
                if name == "x" {
                    Ok(Node::Var(Var::X))
                } else if name == "y" {
                    Ok(Node::Var(Var::Y))
                } else if let Some(func) = Func::from_name(&name) {
                    self.expect(&Token::LParen)?;
                    let inner = self.parse_expr()?;
                    self.expect(&Token::RParen)?;
                    Ok(Node::Call(func, Box::new(inner)))
                } else {
                    Err(CrError::ExpressionError(format!(
                        "unknown identifier '{name}': only 'x', 'y', and {{sin,cos,tan,exp,ln,sqrt,abs}} are allowed"
                    )))
                }
            }
            Some(Token::LParen) => {
                let inner = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            other => Err(CrError::ExpressionError(format!(
                "expected a number, 'x'/'y', a function call, or '(', found {other:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_identity() {
        let f = ExprMapping::compile("x").unwrap();
        assert_eq!(f.eval(3.0, -2.0), 3.0);
        let g = ExprMapping::compile("y").unwrap();
        assert_eq!(g.eval(3.0, -2.0), -2.0);
    }

    #[test]
    fn respects_precedence_and_associativity() {
        let f = ExprMapping::compile("x + y * 2").unwrap();
        assert!((f.eval(1.0, 2.0) - 5.0).abs() < 1e-12);

        // right-associative power: 2^3^2 = 2^(3^2) = 512
        let g = ExprMapping::compile("2 ^ 3 ^ 2").unwrap();
        assert!((g.eval(0.0, 0.0) - 512.0).abs() < 1e-9);
    }

    #[test]
    fn handles_unary_minus_and_parens() {
        let f = ExprMapping::compile("-(x + 1)").unwrap();
        assert!((f.eval(2.0, 0.0) - -3.0).abs() < 1e-12);
    }

    #[test]
    fn supports_builtin_functions() {
        let f = ExprMapping::compile("sin(x) + cos(y)").unwrap();
        let (x, y) = (0.3_f64, 0.7_f64);
        assert!((f.eval(x, y) - (x.sin() + y.cos())).abs() < 1e-12);
    }

    #[test]
    fn henon_style_expression_matches_builtin() {
        let f = ExprMapping::compile("1 - 1.4 * x ^ 2 + 0.3 * y").unwrap();
        let (x, y) = (1.1_f64, 0.5_f64);
        assert!((f.eval(x, y) - (1.0 - 1.4 * x * x + 0.3 * y)).abs() < 1e-12);
    }

    #[test]
    fn rejects_unknown_identifier() {
        assert!(ExprMapping::compile("x + z").is_err());
    }

    #[test]
    fn rejects_empty_and_trailing_tokens() {
        assert!(ExprMapping::compile("").is_err());
        assert!(ExprMapping::compile("x )").is_err());
        assert!(ExprMapping::compile("(x + y").is_err());
    }
}

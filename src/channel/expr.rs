//! Arithmetic expressions over named raw columns.
//!
//! Grammar (loosest first):
//!
//! ```text
//! expr  := term (('+' | '-') term)*
//! term  := unary (('*' | '/' | '%') unary)*
//! unary := ('-' | '+') unary | power
//! power := atom ('**' unary)?
//! atom  := number | identifier | `quoted name` | '(' expr ')'
//! ```
//!
//! There are no calls, attributes or assignments; a parsed expression can only
//! combine numbers and column values.
use thiserror::Error;
/// Deepest nesting of parentheses, signs and powers a parse accepts.
const MAX_DEPTH: usize = 256;
/// Longest token stream accepted; bounds the height of left-leaning operator chains.
const MAX_TOKENS: usize = 4096;
#[derive(Debug, Error, PartialEq)]
pub enum ExpressionError {
    #[error("unexpected character '{ch}' at offset {pos}")]
    UnexpectedChar { pos: usize, ch: char },
    #[error("unterminated quoted column name starting at offset {0}")]
    UnterminatedQuote(usize),
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("unexpected token {0}")]
    UnexpectedToken(String),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("unknown column '{0}'")]
    UnknownColumn(String),
    #[error("expression nests deeper than {0} levels")]
    TooDeep(usize),
    #[error("expression has more than {0} tokens")]
    TooLong(usize),
    #[error("column '{name}' has {len} rows, expected {rows}")]
    ShortColumn { name: String, len: usize, rows: usize },
}
#[derive(Clone, Debug, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Power,
    LParen,
    RParen,
}
fn tokenize(text: &str) -> Result<Vec<Token>, ExpressionError> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let (pos, ch) = chars[i];
        match ch {
            c if c.is_whitespace() => i += 1,
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                if matches!(chars.get(i + 1), Some((_, '*'))) {
                    tokens.push(Token::Power);
                    i += 2;
                } else {
                    tokens.push(Token::Star);
                    i += 1;
                }
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '%' => {
                tokens.push(Token::Percent);
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
            '`' => {
                let start = i + 1;
                let end = (start..chars.len())
                    .find(|&j| chars[j].1 == '`')
                    .ok_or(ExpressionError::UnterminatedQuote(pos))?;
                tokens.push(Token::Ident(chars[start..end].iter().map(|(_, c)| c).collect()));
                i = end + 1;
            }
            c if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() {
                    let c = chars[i].1;
                    let exponent_sign = (c == '+' || c == '-')
                        && i > start
                        && matches!(chars[i - 1].1, 'e' | 'E');
                    if c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' || exponent_sign {
                        i += 1;
                    } else {
                        break;
                    }
                }
                let literal: String = chars[start..i].iter().map(|(_, c)| c).collect();
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| ExpressionError::InvalidNumber(literal.clone()))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].1.is_alphanumeric() || chars[i].1 == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().map(|(_, c)| c).collect()));
            }
            ch => return Err(ExpressionError::UnexpectedChar { pos, ch }),
        }
    }
    Ok(tokens)
}
#[derive(Clone, Copy, Debug, PartialEq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}
impl BinOp {
    fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinOp::Add => lhs + rhs,
            BinOp::Sub => lhs - rhs,
            BinOp::Mul => lhs * rhs,
            BinOp::Div => lhs / rhs,
            BinOp::Rem => lhs % rhs,
            BinOp::Pow => lhs.powf(rhs),
        }
    }
}
#[derive(Clone, Debug, PartialEq)]
enum Node {
    Number(f64),
    Column(String),
    Neg(Box<Node>),
    Binary(BinOp, Box<Node>, Box<Node>),
}
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}
impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }
    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }
    fn expr(&mut self) -> Result<Node, ExpressionError> {
        let mut node = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => return Ok(node),
            };
            self.pos += 1;
            node = Node::Binary(op, Box::new(node), Box::new(self.term()?));
        }
    }
    fn term(&mut self) -> Result<Node, ExpressionError> {
        let mut node = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                Some(Token::Percent) => BinOp::Rem,
                _ => return Ok(node),
            };
            self.pos += 1;
            node = Node::Binary(op, Box::new(node), Box::new(self.unary()?));
        }
    }
    // Every recursive path of the grammar passes through here.
    fn unary(&mut self) -> Result<Node, ExpressionError> {
        if self.depth >= MAX_DEPTH {
            return Err(ExpressionError::TooDeep(MAX_DEPTH));
        }
        self.depth += 1;
        let node = self.signed();
        self.depth -= 1;
        node
    }
    fn signed(&mut self) -> Result<Node, ExpressionError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(Node::Neg(Box::new(self.unary()?)))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }
    fn power(&mut self) -> Result<Node, ExpressionError> {
        let base = self.atom()?;
        if self.peek() == Some(&Token::Power) {
            self.pos += 1;
            let exponent = self.unary()?;
            return Ok(Node::Binary(BinOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }
    fn atom(&mut self) -> Result<Node, ExpressionError> {
        match self.advance() {
            Some(Token::Number(v)) => Ok(Node::Number(v)),
            Some(Token::Ident(name)) => Ok(Node::Column(name)),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    Some(other) => Err(ExpressionError::UnexpectedToken(format!("{other:?}"))),
                    None => Err(ExpressionError::UnexpectedEnd),
                }
            }
            Some(other) => Err(ExpressionError::UnexpectedToken(format!("{other:?}"))),
            None => Err(ExpressionError::UnexpectedEnd),
        }
    }
}
/// A parsed, column-bindable expression.
#[derive(Clone, Debug, PartialEq)]
pub struct Expression {
    root: Node,
}
impl Expression {
    pub fn parse(text: &str) -> Result<Self, ExpressionError> {
        let tokens = tokenize(text)?;
        if tokens.len() > MAX_TOKENS {
            return Err(ExpressionError::TooLong(MAX_TOKENS));
        }
        let mut parser = Parser {
            tokens,
            pos: 0,
            depth: 0,
        };
        let root = parser.expr()?;
        if let Some(extra) = parser.peek() {
            return Err(ExpressionError::UnexpectedToken(format!("{extra:?}")));
        }
        Ok(Self { root })
    }
    /// Column names referenced, in first-use order.
    pub fn columns(&self) -> Vec<&str> {
        fn walk<'a>(node: &'a Node, out: &mut Vec<&'a str>) {
            match node {
                Node::Number(_) => {}
                Node::Column(name) => {
                    if !out.contains(&name.as_str()) {
                        out.push(name);
                    }
                }
                Node::Neg(inner) => walk(inner, out),
                Node::Binary(_, lhs, rhs) => {
                    walk(lhs, out);
                    walk(rhs, out);
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.root, &mut out);
        out
    }
    /// Evaluate row by row; `lookup` resolves a column name to its values.
    pub fn evaluate<'a, F>(&self, rows: usize, lookup: F) -> Result<Vec<f64>, ExpressionError>
    where
        F: Fn(&str) -> Option<&'a [f64]>,
    {
        let bound = bind(&self.root, rows, &lookup)?;
        Ok((0..rows).map(|row| bound.eval(row)).collect())
    }
}
enum Bound<'a> {
    Number(f64),
    Column(&'a [f64]),
    Neg(Box<Bound<'a>>),
    Binary(BinOp, Box<Bound<'a>>, Box<Bound<'a>>),
}
impl Bound<'_> {
    fn eval(&self, row: usize) -> f64 {
        match self {
            Bound::Number(v) => *v,
            Bound::Column(values) => values[row],
            Bound::Neg(inner) => -inner.eval(row),
            Bound::Binary(op, lhs, rhs) => op.apply(lhs.eval(row), rhs.eval(row)),
        }
    }
}
fn bind<'a, F>(node: &Node, rows: usize, lookup: &F) -> Result<Bound<'a>, ExpressionError>
where
    F: Fn(&str) -> Option<&'a [f64]>,
{
    Ok(match node {
        Node::Number(v) => Bound::Number(*v),
        Node::Column(name) => {
            let values =
                lookup(name).ok_or_else(|| ExpressionError::UnknownColumn(name.clone()))?;
            if values.len() < rows {
                return Err(ExpressionError::ShortColumn {
                    name: name.clone(),
                    len: values.len(),
                    rows,
                });
            }
            Bound::Column(values)
        }
        Node::Neg(inner) => Bound::Neg(Box::new(bind(inner, rows, lookup)?)),
        Node::Binary(op, lhs, rhs) => Bound::Binary(
            *op,
            Box::new(bind(lhs, rows, lookup)?),
            Box::new(bind(rhs, rows, lookup)?),
        ),
    })
}
#[cfg(test)]
mod tests {
    use super::*;
    fn eval(text: &str) -> f64 {
        Expression::parse(text)
            .unwrap()
            .evaluate(1, |_| None)
            .unwrap()[0]
    }
    #[test]
    fn precedence_and_associativity() {
        assert_eq!(eval("1 + 2 * 3"), 7.0);
        assert_eq!(eval("(1 + 2) * 3"), 9.0);
        assert_eq!(eval("10 - 4 - 3"), 3.0);
        assert_eq!(eval("2 ** 3 ** 2"), 512.0);
        assert_eq!(eval("-2 ** 2"), -4.0);
        assert_eq!(eval("7 % 4"), 3.0);
        assert_eq!(eval("1.5e2 / 3"), 50.0);
        assert_eq!(eval("+4"), 4.0);
    }
    #[test]
    fn evaluates_over_columns() {
        let a = [1.0, 2.0, 3.0];
        let b = [10.0, 20.0, 30.0];
        let expr = Expression::parse("(a + b) / 2 - `b`").unwrap();
        assert_eq!(expr.columns(), vec!["a", "b"]);
        let out = expr
            .evaluate(3, |name| match name {
                "a" => Some(&a[..]),
                "b" => Some(&b[..]),
                _ => None,
            })
            .unwrap();
        assert_eq!(out, vec![-4.5, -9.0, -13.5]);
    }
    #[test]
    fn quoted_names_may_contain_spaces() {
        let v = [4.0];
        let out = Expression::parse("`gyro x` * 2")
            .unwrap()
            .evaluate(1, |name| (name == "gyro x").then_some(&v[..]))
            .unwrap();
        assert_eq!(out, vec![8.0]);
    }
    #[test]
    fn unknown_column_fails() {
        let err = Expression::parse("a + missing")
            .unwrap()
            .evaluate(1, |name| (name == "a").then_some(&[1.0][..]))
            .unwrap_err();
        assert_eq!(err, ExpressionError::UnknownColumn("missing".into()));
    }
    #[test]
    fn rejects_non_arithmetic_syntax() {
        for text in ["__import__('os')", "a.b", "a +", "(a", "a b", "f(a)", "a = 1", ""] {
            assert!(Expression::parse(text).is_err(), "{text} should not parse");
        }
    }
    #[test]
    fn nesting_and_length_are_bounded() {
        let nested = format!("{}1{}", "(".repeat(1_000), ")".repeat(1_000));
        assert_eq!(Expression::parse(&nested), Err(ExpressionError::TooDeep(MAX_DEPTH)));
        let huge = format!("{}1{}", "(".repeat(200_000), ")".repeat(200_000));
        assert!(Expression::parse(&huge).is_err());
        let signs = format!("{}1", "-".repeat(1_000));
        assert_eq!(Expression::parse(&signs), Err(ExpressionError::TooDeep(MAX_DEPTH)));
        let chain = format!("{}1", "1 + ".repeat(10_000));
        assert_eq!(Expression::parse(&chain), Err(ExpressionError::TooLong(MAX_TOKENS)));
        let ok = format!("{}1{}", "(".repeat(50), ")".repeat(50));
        assert_eq!(eval(&ok), 1.0);
    }
}

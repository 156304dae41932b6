//! Textual filter expressions.
//!
//! Supports expressions like:
//! - `Age > 23`
//! - `Nom == 'Justine'`
//! - `Age >= 18 AND NOT Ville = "Lyon"`
//! - `(Age < 20) OR (Age > 60)`
//! - `Ville IS NULL`, `Ville IS NOT NULL`
//!
//! Keywords are case-insensitive; `=` and `==` are the same operator.

use crate::column::ColumnValue;
use crate::error::{FrameError, Result};
use crate::row::Row;
use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

/// A parsed expression that can be evaluated against a row.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Compare {
        column: String,
        op: CompareOp,
        value: Literal,
    },
    IsNull { column: String, negated: bool },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    fn holds(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Le => ordering != Ordering::Greater,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Ge => ordering != Ordering::Less,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Null,
}

impl Expr {
    /// Column names referenced by the expression, in order of first use.
    pub fn columns(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_columns(&mut names);
        names
    }

    fn collect_columns<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Expr::Compare { column, .. } | Expr::IsNull { column, .. } => {
                if !names.contains(&column.as_str()) {
                    names.push(column.as_str());
                }
            }
            Expr::And(left, right) | Expr::Or(left, right) => {
                left.collect_columns(names);
                right.collect_columns(names);
            }
            Expr::Not(inner) => inner.collect_columns(names),
        }
    }

    /// Evaluate against a row. A column missing from the row compares false
    /// and counts as null.
    pub fn evaluate(&self, row: &Row<'_>) -> bool {
        match self {
            Expr::Compare { column, op, value } => row
                .get(column)
                .and_then(|cell| compare(cell, value))
                .map_or(false, |ordering| op.holds(ordering)),
            Expr::IsNull { column, negated } => {
                let null = row.get(column).map_or(true, ColumnValue::is_null);
                null != *negated
            }
            Expr::And(left, right) => left.evaluate(row) && right.evaluate(row),
            Expr::Or(left, right) => left.evaluate(row) || right.evaluate(row),
            Expr::Not(inner) => !inner.evaluate(row),
        }
    }
}

/// Order a cell against a literal, or `None` when they are not comparable.
///
/// Nulls never compare. Numeric literals compare numerically, parsing string
/// cells. String literals compare against the cell's string form. Booleans
/// only compare with booleans.
fn compare(cell: &ColumnValue, literal: &Literal) -> Option<Ordering> {
    if cell.is_null() {
        return None;
    }
    match literal {
        Literal::Null => None,
        Literal::Int(expected) => match cell {
            ColumnValue::Int32(v) => Some(i64::from(*v).cmp(expected)),
            ColumnValue::Int64(v) => Some(v.cmp(expected)),
            _ => cell_number(cell)?.partial_cmp(&(*expected as f64)),
        },
        Literal::Float(expected) => cell_number(cell)?.partial_cmp(expected),
        Literal::Str(expected) => match cell {
            ColumnValue::String(s) => Some(s.as_str().cmp(expected.as_str())),
            other => Some(other.to_string().as_str().cmp(expected.as_str())),
        },
        Literal::Bool(expected) => cell.as_bool().map(|v| v.cmp(expected)),
    }
}

fn cell_number(cell: &ColumnValue) -> Option<f64> {
    match cell {
        ColumnValue::String(s) => s.trim().parse().ok(),
        other => other.to_f64(),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Literal(Literal),
    Op(CompareOp),
    And,
    Or,
    Not,
    Is,
    LParen,
    RParen,
}

fn invalid(message: impl Into<String>) -> FrameError {
    FrameError::InvalidExpression(message.into())
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        let token = match c {
            '(' => {
                chars.next();
                Token::LParen
            }
            ')' => {
                chars.next();
                Token::RParen
            }
            '=' | '!' | '<' | '>' => lex_operator(&mut chars)?,
            '\'' | '"' => Token::Literal(Literal::Str(lex_quoted(&mut chars)?)),
            '-' | '.' | '0'..='9' => Token::Literal(lex_number(&mut chars)?),
            _ if c.is_alphabetic() || c == '_' => {
                let word = take_while(&mut chars, |c| c.is_alphanumeric() || c == '_');
                keyword(word)
            }
            _ => return Err(invalid(format!("unexpected character '{}'", c))),
        };
        tokens.push(token);
    }

    Ok(tokens)
}

fn take_while(chars: &mut Peekable<Chars<'_>>, accept: impl Fn(char) -> bool) -> String {
    let mut out = String::new();
    while let Some(&c) = chars.peek() {
        if !accept(c) {
            break;
        }
        out.push(c);
        chars.next();
    }
    out
}

fn keyword(word: String) -> Token {
    match word.to_ascii_uppercase().as_str() {
        "AND" => Token::And,
        "OR" => Token::Or,
        "NOT" => Token::Not,
        "IS" => Token::Is,
        "NULL" => Token::Literal(Literal::Null),
        "TRUE" => Token::Literal(Literal::Bool(true)),
        "FALSE" => Token::Literal(Literal::Bool(false)),
        _ => Token::Ident(word),
    }
}

fn lex_operator(chars: &mut Peekable<Chars<'_>>) -> Result<Token> {
    let first = chars.next().unwrap_or_default();
    let followed_by_eq = chars.next_if_eq(&'=').is_some();
    let token = match (first, followed_by_eq) {
        ('=', _) => Token::Op(CompareOp::Eq),
        ('!', true) => Token::Op(CompareOp::Ne),
        ('!', false) => Token::Not,
        ('<', true) => Token::Op(CompareOp::Le),
        ('<', false) => Token::Op(CompareOp::Lt),
        ('>', true) => Token::Op(CompareOp::Ge),
        ('>', false) => Token::Op(CompareOp::Gt),
        (other, _) => return Err(invalid(format!("unexpected operator '{}'", other))),
    };
    Ok(token)
}

fn lex_quoted(chars: &mut Peekable<Chars<'_>>) -> Result<String> {
    let quote = chars.next().unwrap_or('\'');
    let mut out = String::new();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(escaped) => out.push(escaped),
                None => break,
            },
            c if c == quote => return Ok(out),
            c => out.push(c),
        }
    }
    Err(invalid("unterminated string literal"))
}

fn lex_number(chars: &mut Peekable<Chars<'_>>) -> Result<Literal> {
    let mut text = String::new();
    if let Some(sign) = chars.next_if_eq(&'-') {
        text.push(sign);
    }
    text.push_str(&take_while(chars, |c| c.is_ascii_digit() || c == '.'));

    if let Ok(v) = text.parse::<i64>() {
        return Ok(Literal::Int(v));
    }
    text.parse::<f64>()
        .map(Literal::Float)
        .map_err(|_| invalid(format!("invalid number '{}'", text)))
}

/// Recursive-descent parser over the token list.
///
/// Precedence, lowest first: OR, AND, NOT, comparison.
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
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

    fn or(&mut self) -> Result<Expr> {
        let mut left = self.and()?;
        while self.eat(&Token::Or) {
            left = Expr::Or(Box::new(left), Box::new(self.and()?));
        }
        Ok(left)
    }

    fn and(&mut self) -> Result<Expr> {
        let mut left = self.not()?;
        while self.eat(&Token::And) {
            left = Expr::And(Box::new(left), Box::new(self.not()?));
        }
        Ok(left)
    }

    fn not(&mut self) -> Result<Expr> {
        if self.eat(&Token::Not) {
            return Ok(Expr::Not(Box::new(self.not()?)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr> {
        if self.eat(&Token::LParen) {
            let inner = self.or()?;
            if !self.eat(&Token::RParen) {
                return Err(invalid("missing closing parenthesis"));
            }
            return Ok(inner);
        }

        let column = match self.next() {
            Some(Token::Ident(name)) => name,
            other => return Err(invalid(format!("expected column name, found {:?}", other))),
        };

        if self.eat(&Token::Is) {
            let negated = self.eat(&Token::Not);
            if !self.eat(&Token::Literal(Literal::Null)) {
                return Err(invalid("expected NULL after IS"));
            }
            return Ok(Expr::IsNull { column, negated });
        }

        let op = match self.next() {
            Some(Token::Op(op)) => op,
            other => {
                return Err(invalid(format!(
                    "expected comparison operator after '{}', found {:?}",
                    column, other
                )))
            }
        };
        let value = match self.next() {
            Some(Token::Literal(value)) => value,
            other => return Err(invalid(format!("expected literal value, found {:?}", other))),
        };
        Ok(Expr::Compare { column, op, value })
    }
}

/// Parse an expression string.
pub fn parse_expr(input: &str) -> Result<Expr> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(invalid("empty expression"));
    }
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.or()?;
    if let Some(extra) = parser.peek() {
        return Err(invalid(format!("unexpected {:?} after expression", extra)));
    }
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use crate::table::Table;

    fn table() -> Table {
        Table::new(vec![
            ("Nom", Column::from_strings(["Alice", "Bob"])),
            ("Age", vec![25, 17].into_iter().collect::<Column>()),
            ("Score", vec![95.5, 40.0].into_iter().collect::<Column>()),
            ("Actif", vec![true, false].into_iter().collect::<Column>()),
            ("Taille", Column::from_strings(["1.70", "1.85"])),
            ("Ville", Column::new(vec![ColumnValue::Null, "Lyon".into()])),
        ])
        .unwrap()
    }

    fn hits(expression: &str) -> Vec<usize> {
        let t = table();
        let expr = parse_expr(expression).unwrap();
        t.rows()
            .filter(|row| expr.evaluate(row))
            .map(|row| row.position())
            .collect()
    }

    #[test]
    fn test_simple_comparison() {
        assert_eq!(hits("Age > 18"), vec![0]);
        assert_eq!(hits("Age <= 25"), vec![0, 1]);
        assert_eq!(hits("Score >= 95.5"), vec![0]);
        assert_eq!(hits("Nom == 'Bob'"), vec![1]);
        assert_eq!(hits("Nom = \"Alice\""), vec![0]);
        assert_eq!(hits("Nom != 'Alice'"), vec![1]);
    }

    #[test]
    fn test_numeric_literal_against_text_cells() {
        assert_eq!(hits("Taille > 1.8"), vec![1]);
        assert_eq!(hits("Nom > 3"), Vec::<usize>::new());
    }

    #[test]
    fn test_string_literal_against_index() {
        assert_eq!(hits("Index == '1'"), vec![1]);
        assert_eq!(hits("Age == '17'"), vec![1]);
    }

    #[test]
    fn test_and_or_not() {
        assert_eq!(hits("Age > 18 AND Actif == true"), vec![0]);
        assert_eq!(hits("Age > 30 or Nom == 'Bob'"), vec![1]);
        assert_eq!(hits("NOT Age > 18"), vec![1]);
        assert_eq!(hits("!(Age > 18)"), vec![1]);
        assert_eq!(hits("(Age < 20 OR Age > 24) AND Score < 50"), vec![1]);
    }

    #[test]
    fn test_nulls() {
        assert_eq!(hits("Ville IS NULL"), vec![0]);
        assert_eq!(hits("Ville is not null"), vec![1]);
        assert_eq!(hits("Ville == 'Lyon'"), vec![1]);
        assert_eq!(hits("Ville != 'Lyon'"), Vec::<usize>::new());
        assert_eq!(hits("Age == null"), Vec::<usize>::new());
    }

    #[test]
    fn test_negative_numbers() {
        assert_eq!(hits("Age > -1"), vec![0, 1]);
        assert_eq!(
            parse_expr("x < -2.5").unwrap(),
            Expr::Compare {
                column: "x".to_string(),
                op: CompareOp::Lt,
                value: Literal::Float(-2.5),
            }
        );
    }

    #[test]
    fn test_columns() {
        let expr = parse_expr("a > 1 AND (b IS NULL OR a < 3)").unwrap();
        assert_eq!(expr.columns(), vec!["a", "b"]);
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["", "Age >", "Age 3", "(Age > 1", "Age > 1 Nom", "Nom == 'open", "> 3", "Age IS 3", "Age # 3"] {
            assert!(
                matches!(parse_expr(bad), Err(FrameError::InvalidExpression(_))),
                "{} should not parse",
                bad
            );
        }
    }
}

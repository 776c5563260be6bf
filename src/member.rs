//! Member selectors such as `x => x.Name`.
//!
//! Selectors are parsed into a small expression tree. A selector written for
//! "any member, as an object" usually carries a widening cast around the member
//! access (`x => (object)x.Age`); [`resolve_property`] sees through it.

use itertools::Itertools;
use std::fmt;

use crate::errors::{EquivalencyError, Result};
use crate::parser::{ParseError, Parser};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Parameter(String),
    Constant(String),
    Member {
        target: Box<Expr>,
        member: String,
    },
    Convert {
        operand: Box<Expr>,
        target_type: String,
    },
    Call {
        target: Box<Expr>,
        method: String,
        args: Vec<Expr>,
    },
    Binary {
        op: char,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Parameter(name) | Expr::Constant(name) => f.write_str(name),
            Expr::Member { target, member } => write!(f, "{target}.{member}"),
            Expr::Convert {
                operand,
                target_type,
            } => write!(f, "Convert({operand}, {target_type})"),
            Expr::Call {
                target,
                method,
                args,
            } => write!(f, "{target}.{method}({})", args.iter().join(", ")),
            Expr::Binary { op, left, right } => write!(f, "({left} {op} {right})"),
        }
    }
}

/// A parsed `parameter => body` lambda.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub parameter: String,
    pub body: Expr,
}

impl Selector {
    pub fn new(parameter: impl Into<String>, body: Expr) -> Self {
        Self {
            parameter: parameter.into(),
            body,
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        let mut p = SelectorParser::new(input);
        p.parse_selector()
            .map_err(|e| EquivalencyError::Parse(format!("{e:?}")))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.parameter, self.body)
    }
}

/// A member picked by a selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    /// Text of the expression the member is read from, e.g. `x.Address`.
    pub declaring_expression: String,
}

/// Resolves the member a selector reads, unwrapping a widening cast.
pub fn resolve_property(selector: Option<&Selector>) -> Result<Member> {
    let selector = selector.ok_or(EquivalencyError::AbsentExpression)?;

    member_from_cast(&selector.body)
        .or_else(|| member_from_access(&selector.body))
        .ok_or_else(|| EquivalencyError::NotAPropertyExpression(selector.body.to_string()))
}

fn member_from_access(body: &Expr) -> Option<Member> {
    match body {
        Expr::Member { target, member } => Some(Member {
            name: member.clone(),
            declaring_expression: target.to_string(),
        }),
        _ => None,
    }
}

fn member_from_cast(body: &Expr) -> Option<Member> {
    match body {
        Expr::Convert { operand, .. } => member_from_access(operand),
        _ => None,
    }
}

struct SelectorParser<'a> {
    parser: Parser<'a>,
}

impl<'a> SelectorParser<'a> {
    fn new(s: &'a str) -> Self {
        Self {
            parser: Parser::new(s),
        }
    }

    fn parse_selector(&mut self) -> std::result::Result<Selector, ParseError> {
        self.parser.skip_ws();
        let parameter = self.parser.parse_identifier()?;
        self.parser.skip_ws();
        self.parser.expect_str("=>")?;
        let body = self.parse_expr()?;
        self.parser.skip_ws();
        if !self.parser.eof() {
            return Err(ParseError::InvalidSyntax("trailing input".into()));
        }
        Ok(Selector { parameter, body })
    }

    fn parse_expr(&mut self) -> std::result::Result<Expr, ParseError> {
        let mut left = self.parse_term()?;
        loop {
            self.parser.skip_ws();
            let op = match self.parser.peek_char() {
                Some(op @ ('+' | '-' | '*' | '/')) => op,
                _ => break,
            };
            self.parser.consume_char(op);
            let right = self.parse_term()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> std::result::Result<Expr, ParseError> {
        self.parser.skip_ws();
        if self.parser.peek_char() == Some('(') {
            if let Some(cast) = self.try_parse_cast()? {
                return Ok(cast);
            }
        }
        self.parse_postfix()
    }

    /// `(Type)operand`; backtracks when the parentheses are a grouping.
    fn try_parse_cast(&mut self) -> std::result::Result<Option<Expr>, ParseError> {
        let start = self.parser.position();
        self.parser.expect('(')?;
        self.parser.skip_ws();
        let Ok(target_type) = self.parser.parse_identifier() else {
            self.parser.reset(start);
            return Ok(None);
        };
        self.parser.skip_ws();
        if !self.parser.consume_char(')') {
            self.parser.reset(start);
            return Ok(None);
        }
        self.parser.skip_ws();
        let starts_operand = self
            .parser
            .peek_char()
            .map(|c| c == '_' || c == '(' || c == '\'' || c == '"' || c.is_alphanumeric())
            .unwrap_or(false);
        if !starts_operand {
            self.parser.reset(start);
            return Ok(None);
        }
        let operand = self.parse_term()?;
        Ok(Some(Expr::Convert {
            operand: Box::new(operand),
            target_type,
        }))
    }

    fn parse_postfix(&mut self) -> std::result::Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            self.parser.skip_ws();
            if !self.parser.consume_char('.') {
                break;
            }
            self.parser.skip_ws();
            let name = self.parser.parse_identifier()?;
            self.parser.skip_ws();
            expr = if self.parser.consume_char('(') {
                let args = self.parse_args()?;
                self.parser.expect(')')?;
                Expr::Call {
                    target: Box::new(expr),
                    method: name,
                    args,
                }
            } else {
                Expr::Member {
                    target: Box::new(expr),
                    member: name,
                }
            };
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> std::result::Result<Expr, ParseError> {
        self.parser.skip_ws();
        match self.parser.peek_char() {
            Some('"') | Some('\'') => {
                let text = self.parser.parse_quoted_string()?;
                Ok(Expr::Constant(format!("{text:?}")))
            }
            Some('(') => {
                self.parser.consume_char('(');
                let inner = self.parse_expr()?;
                self.parser.skip_ws();
                self.parser.expect(')')?;
                Ok(inner)
            }
            Some(c) if c == '-' || c.is_ascii_digit() => {
                Ok(Expr::Constant(self.parser.parse_number_literal()?))
            }
            _ => Ok(Expr::Parameter(self.parser.parse_identifier()?)),
        }
    }

    fn parse_args(&mut self) -> std::result::Result<Vec<Expr>, ParseError> {
        let mut out = Vec::new();
        self.parser.skip_ws();
        if self.parser.peek_char() == Some(')') {
            return Ok(out);
        }
        loop {
            out.push(self.parse_expr()?);
            self.parser.skip_ws();
            if !self.parser.consume_char(',') {
                break;
            }
        }
        Ok(out)
    }
}

// src/parser.rs
#[derive(Debug)]
pub enum ParseError {
    InvalidSyntax(String),
}

/// Character cursor shared by the selector grammar.
pub struct Parser<'a> {
    s: &'a str,
    i: usize,
}

impl<'a> Parser<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    pub fn parse_identifier(&mut self) -> Result<String, ParseError> {
        let start = self.i;
        while let Some(c) = self.peek_char() {
            if c == '_' || c.is_alphanumeric() {
                self.i += c.len_utf8();
            } else {
                break;
            }
        }
        if self.i == start {
            return Err(ParseError::InvalidSyntax("identifier expected".into()));
        }
        if self.s[start..self.i].starts_with(|c: char| c.is_ascii_digit()) {
            self.i = start;
            return Err(ParseError::InvalidSyntax("identifier expected".into()));
        }
        Ok(self.s[start..self.i].to_string())
    }

    /// Integer or decimal literal, kept as written.
    pub fn parse_number_literal(&mut self) -> Result<String, ParseError> {
        let start = self.i;
        if self.peek_char() == Some('-') {
            self.i += 1;
        }
        self.skip_digits();
        if self.peek_char() == Some('.') {
            self.i += 1;
            self.skip_digits();
        }
        let s = &self.s[start..self.i];
        if s.is_empty() || s == "-" || s == "." {
            self.i = start;
            return Err(ParseError::InvalidSyntax("number expected".into()));
        }
        Ok(s.to_string())
    }

    pub fn parse_quoted_string(&mut self) -> Result<String, ParseError> {
        let quote = self
            .peek_char()
            .ok_or_else(|| ParseError::InvalidSyntax("string".into()))?;
        if quote != '\'' && quote != '"' {
            return Err(ParseError::InvalidSyntax("expected quoted string".into()));
        }
        self.i += 1;
        let mut out = String::new();
        while let Some(c) = self.peek_char() {
            self.i += c.len_utf8();
            if c == quote {
                return Ok(out);
            }
            if c == '\\' {
                if let Some(nc) = self.peek_char() {
                    self.i += nc.len_utf8();
                    match nc {
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        'r' => out.push('\r'),
                        '\\' => out.push('\\'),
                        '"' => out.push('"'),
                        '\'' => out.push('\''),
                        _ => {
                            out.push('\\');
                            out.push(nc);
                        }
                    }
                } else {
                    break;
                }
            } else {
                out.push(c);
            }
        }
        Err(ParseError::InvalidSyntax("unterminated string".into()))
    }

    pub fn expect(&mut self, c: char) -> Result<(), ParseError> {
        if self.consume_char(c) {
            Ok(())
        } else {
            Err(ParseError::InvalidSyntax(format!("expected '{}'", c)))
        }
    }

    pub fn expect_str(&mut self, lit: &str) -> Result<(), ParseError> {
        if self.peek_str(lit) {
            self.i += lit.len();
            Ok(())
        } else {
            Err(ParseError::InvalidSyntax(format!("expected '{lit}'")))
        }
    }

    pub fn consume_char(&mut self, c: char) -> bool {
        if self.peek_char() == Some(c) {
            self.i += c.len_utf8();
            true
        } else {
            false
        }
    }

    pub fn peek_char(&self) -> Option<char> {
        self.s[self.i..].chars().next()
    }

    pub fn peek_str(&self, lit: &str) -> bool {
        self.s[self.i..].starts_with(lit)
    }

    pub fn skip_ws(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.i += c.len_utf8();
            } else {
                break;
            }
        }
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    /// Current offset, for backtracking with [`reset`](Self::reset).
    pub fn position(&self) -> usize {
        self.i
    }

    pub fn reset(&mut self, position: usize) {
        self.i = position;
    }

    fn skip_digits(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                self.i += 1;
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_and_numbers() {
        let mut p = Parser::new("name_1 42.5 '");
        assert_eq!(p.parse_identifier().unwrap(), "name_1");
        p.skip_ws();
        assert!(p.parse_identifier().is_err());
        assert_eq!(p.parse_number_literal().unwrap(), "42.5");
        p.skip_ws();
        assert!(p.parse_quoted_string().is_err());
    }

    #[test]
    fn backtracks() {
        let mut p = Parser::new("(object)x");
        let start = p.position();
        p.expect('(').unwrap();
        assert_eq!(p.parse_identifier().unwrap(), "object");
        p.reset(start);
        assert_eq!(p.peek_char(), Some('('));
        assert!(p.expect_str("(obj").is_ok());
        assert!(!p.eof());
    }
}

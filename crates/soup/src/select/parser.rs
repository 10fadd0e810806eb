//! Selector text compiler
//!
//! Hand-written recursive descent over the raw selector text, one grammar
//! production per method:
//!
//! ```text
//! list      := complex ( ',' complex )*
//! complex   := combinator? compound ( combinator? compound )*
//! compound  := ( ident | '*' )? ( '.' ident | '#' name | attrib | pseudo )*
//! attrib    := '[' ident ( op ( ident | string ) )? ']'
//! pseudo    := ':' ident ( '(' args ')' )?
//! ```
//!
//! Every failure carries the byte offset where it was detected and the
//! offending fragment of the input. Nothing past a successful compile can
//! fail.

use super::ast::{
    AttrOp, AttrSelector, Combinator, ComplexSelector, CompoundSelector, Nth, PseudoClass,
    SimpleSelector,
};
use crate::error::{Result, SoupError};

/// Compile selector text into its alternatives
pub fn parse(input: &str) -> Result<Vec<ComplexSelector>> {
    let mut parser = Parser::new(input);
    parser.skip_whitespace();

    if parser.at_end() {
        return Ok(vec![ComplexSelector::default()]);
    }

    let list = parser.parse_list()?;
    if !parser.at_end() {
        return Err(parser.error("unexpected character after selector"));
    }
    Ok(list)
}

struct Parser<'a> {
    input: &'a str,
    /// Byte offset of the next unread character
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    // -----------------------------------------------------------------------
    // Character access helpers
    // -----------------------------------------------------------------------

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{expected}'")))
        }
    }

    /// Skip whitespace, reporting whether any was skipped
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.pos > start
    }

    fn error(&self, message: &str) -> SoupError {
        self.error_at(self.pos, message)
    }

    /// Error whose fragment runs from `start` up to the next whitespace
    fn error_at(&self, start: usize, message: &str) -> SoupError {
        let tail = &self.input[start..];
        let end = tail
            .char_indices()
            .skip(1)
            .find(|(_, c)| c.is_whitespace())
            .map_or(tail.len(), |(i, _)| i);
        let fragment = if tail.is_empty() {
            "end of selector".to_string()
        } else {
            tail[..end].to_string()
        };
        SoupError::SelectorSyntax {
            message: message.to_string(),
            fragment,
            position: start,
        }
    }

    // -----------------------------------------------------------------------
    // Grammar productions
    // -----------------------------------------------------------------------

    fn parse_list(&mut self) -> Result<Vec<ComplexSelector>> {
        let mut list = vec![self.parse_complex()?];
        while self.eat(',') {
            self.skip_whitespace();
            list.push(self.parse_complex()?);
        }
        Ok(list)
    }

    fn combinator(&self) -> Option<Combinator> {
        match self.peek()? {
            '>' => Some(Combinator::Child),
            '+' => Some(Combinator::Adjacent),
            '~' => Some(Combinator::General),
            _ => None,
        }
    }

    fn at_list_boundary(&self) -> bool {
        matches!(self.peek(), None | Some(',') | Some(')'))
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector> {
        self.skip_whitespace();
        let mut parts = Vec::new();

        let mut pending = Combinator::Descendant;
        if let Some(combinator) = self.combinator() {
            self.bump();
            self.skip_whitespace();
            pending = combinator;
        }

        loop {
            if self.at_list_boundary() {
                return Err(self.error("expected a selector"));
            }
            let compound = self.parse_compound()?;
            parts.push((pending, compound));

            let had_whitespace = self.skip_whitespace();
            if self.at_list_boundary() {
                break;
            }
            pending = match self.combinator() {
                Some(combinator) => {
                    self.bump();
                    self.skip_whitespace();
                    combinator
                }
                None if had_whitespace => Combinator::Descendant,
                None => return Err(self.error("unexpected character in selector")),
            };
        }

        Ok(ComplexSelector { parts })
    }

    fn parse_compound(&mut self) -> Result<CompoundSelector> {
        let start = self.pos;
        let mut compound = CompoundSelector::default();

        if self.eat('*') {
            // universal: tag stays None
        } else if self.peek().is_some_and(is_ident_start) {
            compound.tag = Some(self.parse_ident()?.to_lowercase());
        }

        loop {
            match self.peek() {
                Some('.') => {
                    self.bump();
                    let class = self.parse_ident()?;
                    compound.simples.push(SimpleSelector::Class(class));
                }
                Some('#') => {
                    self.bump();
                    let id = self.parse_name()?;
                    compound.simples.push(SimpleSelector::Id(id));
                }
                Some('[') => {
                    let attr = self.parse_attribute()?;
                    compound.simples.push(SimpleSelector::Attribute(attr));
                }
                Some(':') => {
                    let pseudo = self.parse_pseudo()?;
                    compound.simples.push(SimpleSelector::Pseudo(pseudo));
                }
                _ => break,
            }
        }

        if self.pos == start {
            return Err(self.error("unexpected character in selector"));
        }
        Ok(compound)
    }

    fn parse_attribute(&mut self) -> Result<AttrSelector> {
        self.expect('[')?;
        self.skip_whitespace();
        let name = self.parse_ident()?;
        self.skip_whitespace();

        if self.eat(']') {
            return Ok(AttrSelector {
                name,
                op: AttrOp::Exists,
                value: String::new(),
            });
        }

        let op_start = self.pos;
        let op = match (self.bump(), self.peek()) {
            (Some('='), _) => AttrOp::Equals,
            (Some(c), Some('=')) => {
                let op = match c {
                    '~' => AttrOp::Includes,
                    '|' => AttrOp::DashMatch,
                    '^' => AttrOp::Prefix,
                    '$' => AttrOp::Suffix,
                    '*' => AttrOp::Substring,
                    _ => return Err(self.error_at(op_start, "unknown attribute operator")),
                };
                self.bump();
                op
            }
            _ => return Err(self.error_at(op_start, "unknown attribute operator")),
        };

        self.skip_whitespace();
        let value = match self.peek() {
            Some('"') | Some('\'') => self.parse_string()?,
            _ => self.parse_name()?,
        };
        self.skip_whitespace();
        self.expect(']')?;

        Ok(AttrSelector { name, op, value })
    }

    fn parse_pseudo(&mut self) -> Result<PseudoClass> {
        let start = self.pos;
        self.expect(':')?;
        if self.peek() == Some(':') {
            return Err(self.error_at(start, "pseudo-elements are not supported"));
        }
        let name = self.parse_ident()?.to_lowercase();

        if !self.eat('(') {
            return match name.as_str() {
                "first-child" => Ok(PseudoClass::FirstChild),
                "last-child" => Ok(PseudoClass::LastChild),
                "only-child" => Ok(PseudoClass::OnlyChild),
                "first-of-type" => Ok(PseudoClass::FirstOfType),
                "last-of-type" => Ok(PseudoClass::LastOfType),
                "only-of-type" => Ok(PseudoClass::OnlyOfType),
                "empty" => Ok(PseudoClass::Empty),
                "root" => Ok(PseudoClass::Root),
                "nth-child" | "nth-last-child" | "nth-of-type" | "nth-last-of-type" | "not"
                | "contains" => Err(self.error_at(start, "pseudo-class requires an argument")),
                _ => Err(self.error_at(start, "unsupported pseudo-class")),
            };
        }

        self.skip_whitespace();
        let pseudo = match name.as_str() {
            "nth-child" => PseudoClass::NthChild(self.parse_nth()?),
            "nth-last-child" => PseudoClass::NthLastChild(self.parse_nth()?),
            "nth-of-type" => PseudoClass::NthOfType(self.parse_nth()?),
            "nth-last-of-type" => PseudoClass::NthLastOfType(self.parse_nth()?),
            "not" => PseudoClass::Not(self.parse_list()?),
            "contains" => {
                let text = match self.peek() {
                    Some('"') | Some('\'') => self.parse_string()?,
                    _ => self.parse_ident()?,
                };
                PseudoClass::Contains(text)
            }
            _ => return Err(self.error_at(start, "unsupported pseudo-class")),
        };
        self.skip_whitespace();
        self.expect(')')?;
        Ok(pseudo)
    }

    /// `an+b`, `odd`, `even`; inner whitespace around the sign is allowed
    fn parse_nth(&mut self) -> Result<Nth> {
        let start = self.pos;
        let len = self.rest().find(')').unwrap_or(self.rest().len());
        let raw = &self.rest()[..len];
        let compact: String = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();

        let nth = parse_an_plus_b(&compact)
            .ok_or_else(|| self.error_at(start, "invalid nth expression"))?;
        self.pos += len;
        Ok(nth)
    }

    fn parse_string(&mut self) -> Result<String> {
        let start = self.pos;
        let quote = match self.bump() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(self.error_at(start, "expected a quoted string")),
        };

        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error_at(start, "unterminated string")),
                Some(c) if c == quote => return Ok(value),
                Some('\\') => match self.bump() {
                    Some(escaped) => value.push(escaped),
                    None => return Err(self.error_at(start, "unterminated string")),
                },
                Some(c) => value.push(c),
            }
        }
    }

    fn parse_ident(&mut self) -> Result<String> {
        if !self.peek().is_some_and(is_ident_start) {
            return Err(self.error("expected an identifier"));
        }
        self.parse_name()
    }

    /// Run of name characters (may start with a digit, as `#id` allows)
    fn parse_name(&mut self) -> Result<String> {
        let start = self.pos;
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.bump();
                name.push(self.parse_escape()?);
            } else if is_name_char(c) {
                self.bump();
                name.push(c);
            } else {
                break;
            }
        }
        if name.is_empty() {
            return Err(self.error_at(start, "expected a name"));
        }
        Ok(name)
    }

    /// Character after a backslash: up to six hex digits or one literal char
    fn parse_escape(&mut self) -> Result<char> {
        let start = self.pos;
        let hex_len = self
            .rest()
            .chars()
            .take(6)
            .take_while(char::is_ascii_hexdigit)
            .count();

        if hex_len == 0 {
            return self
                .bump()
                .ok_or_else(|| self.error_at(start, "incomplete escape"));
        }

        let digits = &self.rest()[..hex_len];
        let escaped = u32::from_str_radix(digits, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.error_at(start, "invalid escape"))?;
        self.pos += hex_len;
        if self.peek() == Some(' ') {
            self.bump();
        }
        Ok(escaped)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '-' || c == '\\' || !c.is_ascii()
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || !c.is_ascii()
}

fn parse_an_plus_b(text: &str) -> Option<Nth> {
    match text {
        "odd" => return Some(Nth::new(2, 1)),
        "even" => return Some(Nth::new(2, 0)),
        "" => return None,
        _ => {}
    }

    let Some(n_pos) = text.find('n') else {
        return parse_signed(text).map(|b| Nth::new(0, b));
    };

    let a = match &text[..n_pos] {
        "" | "+" => 1,
        "-" => -1,
        coefficient => parse_signed(coefficient)?,
    };
    let rest = &text[n_pos + 1..];
    let b = if rest.is_empty() {
        0
    } else if rest.starts_with(['+', '-']) {
        parse_signed(rest)?
    } else {
        return None;
    };
    Some(Nth::new(a, b))
}

/// Optional sign followed by at least one digit, nothing else
fn parse_signed(text: &str) -> Option<i32> {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

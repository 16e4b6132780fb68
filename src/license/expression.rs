use std::collections::BTreeSet;

/// How declared license strings are interpreted.
///
/// `Literal` treats every string as a single opaque license name and exists
/// so that the degraded path stays deterministic and testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserMode {
    Spdx,
    Literal,
}

/// Normalizes a license string into a set of atomic license names.
///
/// Parsing never fails: anything that is not a well-formed SPDX expression is
/// returned unchanged as a singleton set. Expressions joined with `AND` or
/// `WITH` are not decomposed either, because a conjunctive clause cannot be
/// reduced to an independent allow/deny check; those produce a warning and
/// the raw input.
#[derive(Debug)]
pub struct LicenseExpressionParser {
    mode: ParserMode,
    warnings: Vec<String>,
}

impl LicenseExpressionParser {
    pub fn new(mode: ParserMode) -> Self {
        Self {
            mode,
            warnings: Vec::new(),
        }
    }

    /// Parse one license expression into its atomic license names.
    pub fn parse(&mut self, expression: &str) -> BTreeSet<String> {
        let literal = || BTreeSet::from([expression.to_string()]);

        if self.mode == ParserMode::Literal {
            return literal();
        }

        let tokens = tokenize(expression);
        if tokens.is_empty() {
            return literal();
        }

        let mut parser = ExprParser { tokens, pos: 0 };
        match parser.parse_or() {
            Ok(parsed) if parser.at_end() => {
                if parsed.conjunctive {
                    self.warnings.push(format!(
                        "license expression '{expression}' contains AND or WITH and is not \
                         decomposed; treating it as a single license name"
                    ));
                    literal()
                } else {
                    parsed.names
                }
            }
            // Lexically or grammatically invalid: degrade to the raw string.
            _ => literal(),
        }
    }

    /// Drain the warnings accumulated since the last call.
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }
}

#[derive(Debug, PartialEq, Clone)]
enum Token {
    Id(String),
    And,
    Or,
    With,
    LParen,
    RParen,
}

/// Tokenize an SPDX license expression into a flat [`Vec<Token>`].
fn tokenize(expr: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = expr.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == '(' {
            tokens.push(Token::LParen);
            chars.next();
        } else if c == ')' {
            tokens.push(Token::RParen);
            chars.next();
        } else {
            let mut s = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() || c == '(' || c == ')' {
                    break;
                }
                s.push(c);
                chars.next();
            }
            let token = match s.as_str() {
                "AND" => Token::And,
                "OR" => Token::Or,
                "WITH" => Token::With,
                _ => Token::Id(s),
            };
            tokens.push(token);
        }
    }
    tokens
}

/// A successfully parsed expression: the atomic names it mentions and whether
/// any conjunctive operator (`AND`/`WITH`) appears.
struct Parsed {
    names: BTreeSet<String>,
    conjunctive: bool,
}

/// Recursive descent over the SPDX expression grammar.
///
/// Grammar (AND binds tighter than OR):
/// ```text
/// expr     := or_expr
/// or_expr  := and_expr ( "OR" and_expr )*
/// and_expr := atom ( "AND" atom )*
/// atom     := "(" expr ")" | id ( "WITH" id )?
/// ```
struct ExprParser {
    tokens: Vec<Token>,
    pos: usize,
}

impl ExprParser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn consume(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn at_end(&self) -> bool {
        self.pos == self.tokens.len()
    }

    fn parse_or(&mut self) -> Result<Parsed, ()> {
        let mut result = self.parse_and()?;
        while matches!(self.peek(), Some(Token::Or)) {
            self.consume();
            let rhs = self.parse_and()?;
            result.names.extend(rhs.names);
            result.conjunctive |= rhs.conjunctive;
        }
        Ok(result)
    }

    fn parse_and(&mut self) -> Result<Parsed, ()> {
        let mut result = self.parse_atom()?;
        while matches!(self.peek(), Some(Token::And)) {
            self.consume();
            let rhs = self.parse_atom()?;
            result.names.extend(rhs.names);
            result.conjunctive = true;
        }
        Ok(result)
    }

    fn parse_atom(&mut self) -> Result<Parsed, ()> {
        match self.consume() {
            Some(Token::LParen) => {
                let result = self.parse_or()?;
                match self.consume() {
                    Some(Token::RParen) => Ok(result),
                    _ => Err(()),
                }
            }
            Some(Token::Id(id)) => {
                let mut conjunctive = false;
                if matches!(self.peek(), Some(Token::With)) {
                    self.consume();
                    match self.consume() {
                        Some(Token::Id(_)) => conjunctive = true,
                        _ => return Err(()),
                    }
                }
                Ok(Parsed {
                    names: BTreeSet::from([id]),
                    conjunctive,
                })
            }
            _ => Err(()),
        }
    }
}

//! Go source tokenizer.
//!
//! Produces the token stream consumed by the declaration parser. Only the
//! lexical structure needed to recognize top-level declarations is modeled:
//! comments are dropped, literals keep their raw text, and statement
//! boundaries are materialized as semicolons following Go's insertion rule
//! (a newline terminates a statement when the line ends in an identifier,
//! a literal, or a closing delimiter).

use super::SyntaxError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Tok {
    /// Identifier or keyword.
    Ident(String),
    /// String, rune, or numeric literal, as written.
    Lit(String),
    /// Single-character operator or delimiter.
    Punct(char),
}

#[derive(Debug, Clone)]
pub(crate) struct Token {
    pub kind: Tok,
    pub line: u32,
    pub column: u32,
}

pub(crate) fn scan(src: &str) -> Result<Vec<Token>, SyntaxError> {
    Scanner::new(src).run()
}

struct Scanner<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: u32,
    column: u32,
    toks: Vec<Token>,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        // A leading byte-order mark is legal in Go source.
        let src = src.strip_prefix('\u{feff}').unwrap_or(src);
        Self {
            chars: src.chars().peekable(),
            line: 1,
            column: 1,
            toks: Vec::new(),
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn err(&self, message: impl Into<String>, line: u32, column: u32) -> SyntaxError {
        SyntaxError {
            message: message.into(),
            line,
            column,
        }
    }

    fn push(&mut self, kind: Tok, line: u32, column: u32) {
        self.toks.push(Token { kind, line, column });
    }

    /// Semicolon insertion: terminate the statement at a line break when the
    /// last token can end one.
    fn maybe_semi(&mut self) {
        let insert = match self.toks.last().map(|t| &t.kind) {
            Some(Tok::Ident(_)) | Some(Tok::Lit(_)) => true,
            Some(Tok::Punct(c)) => matches!(c, ')' | ']' | '}'),
            None => false,
        };
        if insert {
            let (line, column) = (self.line, self.column);
            self.push(Tok::Punct(';'), line, column);
        }
    }

    fn run(mut self) -> Result<Vec<Token>, SyntaxError> {
        while let Some(&c) = self.chars.peek() {
            let (line, column) = (self.line, self.column);
            match c {
                '\n' => {
                    self.bump();
                    self.maybe_semi();
                }
                c if c.is_whitespace() => {
                    self.bump();
                }
                '/' => {
                    self.bump();
                    match self.chars.peek() {
                        Some('/') => {
                            while let Some(&c) = self.chars.peek() {
                                if c == '\n' {
                                    break;
                                }
                                self.bump();
                            }
                        }
                        Some('*') => self.block_comment(line, column)?,
                        _ => self.push(Tok::Punct('/'), line, column),
                    }
                }
                '"' => self.interpreted_string(line, column)?,
                '`' => self.raw_string(line, column)?,
                '\'' => self.rune(line, column)?,
                c if c.is_alphabetic() || c == '_' => {
                    let mut ident = String::new();
                    while let Some(&c) = self.chars.peek() {
                        if c.is_alphanumeric() || c == '_' {
                            ident.push(c);
                            self.bump();
                        } else {
                            break;
                        }
                    }
                    self.push(Tok::Ident(ident), line, column);
                }
                c if c.is_ascii_digit() => {
                    let lit = self.number();
                    self.push(Tok::Lit(lit), line, column);
                }
                c => {
                    self.bump();
                    self.push(Tok::Punct(c), line, column);
                }
            }
        }
        // A missing final newline still terminates the last statement.
        self.maybe_semi();
        Ok(self.toks)
    }

    fn block_comment(&mut self, line: u32, column: u32) -> Result<(), SyntaxError> {
        self.bump(); // the '*'
        let mut newline = false;
        let mut star = false;
        while let Some(c) = self.bump() {
            match c {
                '/' if star => {
                    // A multi-line comment counts as a line break.
                    if newline {
                        self.maybe_semi();
                    }
                    return Ok(());
                }
                '\n' => {
                    newline = true;
                    star = false;
                }
                '*' => star = true,
                _ => star = false,
            }
        }
        Err(self.err("unterminated block comment", line, column))
    }

    fn interpreted_string(&mut self, line: u32, column: u32) -> Result<(), SyntaxError> {
        let mut lit = String::from('"');
        self.bump();
        while let Some(&c) = self.chars.peek() {
            match c {
                '"' => {
                    lit.push('"');
                    self.bump();
                    self.push(Tok::Lit(lit), line, column);
                    return Ok(());
                }
                '\n' => break,
                '\\' => {
                    lit.push(c);
                    self.bump();
                    if let Some(esc) = self.bump() {
                        lit.push(esc);
                    }
                }
                _ => {
                    lit.push(c);
                    self.bump();
                }
            }
        }
        Err(self.err("unterminated string literal", line, column))
    }

    fn raw_string(&mut self, line: u32, column: u32) -> Result<(), SyntaxError> {
        let mut lit = String::from('`');
        self.bump();
        while let Some(c) = self.bump() {
            lit.push(c);
            if c == '`' {
                self.push(Tok::Lit(lit), line, column);
                return Ok(());
            }
        }
        Err(self.err("unterminated raw string literal", line, column))
    }

    fn rune(&mut self, line: u32, column: u32) -> Result<(), SyntaxError> {
        let mut lit = String::from('\'');
        self.bump();
        while let Some(&c) = self.chars.peek() {
            match c {
                '\'' => {
                    lit.push('\'');
                    self.bump();
                    self.push(Tok::Lit(lit), line, column);
                    return Ok(());
                }
                '\n' => break,
                '\\' => {
                    lit.push(c);
                    self.bump();
                    if let Some(esc) = self.bump() {
                        lit.push(esc);
                    }
                }
                _ => {
                    lit.push(c);
                    self.bump();
                }
            }
        }
        Err(self.err("unterminated rune literal", line, column))
    }

    fn number(&mut self) -> String {
        let mut lit = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                lit.push(c);
                self.bump();
            } else if c == '.' {
                // Fractional part; a dot followed by anything else belongs to
                // the surrounding expression.
                let mut ahead = self.chars.clone();
                ahead.next();
                if ahead.peek().is_some_and(|c| c.is_ascii_digit()) {
                    lit.push('.');
                    self.bump();
                } else {
                    break;
                }
            } else {
                break;
            }
        }
        lit
    }
}

use super::{Keyword, Token};
use anyhow::{Result, bail};
use atoi::FromRadix10Signed;

/// Tokenizer for the SQL subset the file dialect writer emits.
pub struct Lexer<'s> {
    input: &'s str,
    chars: Vec<char>,
    position: usize,
}

impl<'s> Lexer<'s> {
    pub fn new(input: &'s str) -> Self {
        Self {
            input,
            chars: input.chars().collect(),
            position: 0,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token == Token::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position + 1).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn next_token(&mut self) -> Result<Token> {
        while matches!(self.current(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
        let Some(c) = self.current() else {
            return Ok(Token::Eof);
        };
        let token = match c {
            '(' => {
                self.advance();
                Token::LParen
            }
            ')' => {
                self.advance();
                Token::RParen
            }
            ',' => {
                self.advance();
                Token::Comma
            }
            '*' => {
                self.advance();
                Token::Star
            }
            '?' => {
                self.advance();
                Token::Param
            }
            '=' => {
                self.advance();
                Token::Eq
            }
            '<' => {
                self.advance();
                match self.current() {
                    Some('=') => {
                        self.advance();
                        Token::LessEq
                    }
                    Some('>') => {
                        self.advance();
                        Token::NotEq
                    }
                    _ => Token::Less,
                }
            }
            '>' => {
                self.advance();
                if self.current() == Some('=') {
                    self.advance();
                    Token::GreaterEq
                } else {
                    Token::Greater
                }
            }
            '"' => self.read_quoted('"', |s| Token::Ident(s))?,
            '\'' => self.read_quoted('\'', |s| Token::Str(s))?,
            '-' if matches!(self.peek(), Some(d) if d.is_ascii_digit()) => self.read_number()?,
            c if c.is_ascii_digit() => self.read_number()?,
            'X' | 'x' if self.peek() == Some('\'') => {
                self.advance();
                let Token::Str(hex) = self.read_quoted('\'', |s| Token::Str(s))? else {
                    unreachable!()
                };
                Token::Blob(decode_hex(&hex)?)
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = self.position;
                while matches!(self.current(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
                    self.advance();
                }
                let word: String = self.chars[start..self.position].iter().collect();
                match Keyword::lookup(&word) {
                    Some(keyword) => Token::Keyword(keyword),
                    // Bare words outside the keyword set are identifiers.
                    None => Token::Ident(word),
                }
            }
            other => bail!("unexpected character `{}` in statement", other),
        };
        Ok(token)
    }

    /// Read a delimited region, un-doubling the delimiter.
    fn read_quoted(&mut self, delimiter: char, wrap: fn(String) -> Token) -> Result<Token> {
        self.advance();
        let mut content = String::new();
        loop {
            match self.current() {
                Some(c) if c == delimiter => {
                    if self.peek() == Some(delimiter) {
                        content.push(delimiter);
                        self.advance();
                        self.advance();
                    } else {
                        self.advance();
                        return Ok(wrap(content));
                    }
                }
                Some(c) => {
                    content.push(c);
                    self.advance();
                }
                None => bail!("unterminated quoted region in `{}`", self.input),
            }
        }
    }

    fn read_number(&mut self) -> Result<Token> {
        let start = self.position;
        if self.current() == Some('-') {
            self.advance();
        }
        let mut float = false;
        while let Some(c) = self.current() {
            match c {
                c if c.is_ascii_digit() => self.advance(),
                '.' => {
                    float = true;
                    self.advance();
                }
                'e' | 'E' => {
                    float = true;
                    self.advance();
                    if matches!(self.current(), Some('+') | Some('-')) {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
        let text: String = self.chars[start..self.position].iter().collect();
        if float {
            match text.parse::<f64>() {
                Ok(v) => Ok(Token::Float(v)),
                Err(_) => bail!("malformed numeric literal `{}`", text),
            }
        } else {
            let (value, consumed) = i64::from_radix_10_signed(text.as_bytes());
            if consumed != text.len() {
                bail!("malformed integer literal `{}`", text);
            }
            Ok(Token::Int(value))
        }
    }
}

fn decode_hex(hex: &str) -> Result<Vec<u8>> {
    if hex.len() % 2 != 0 {
        bail!("blob literal has an odd number of hex digits");
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| anyhow::anyhow!("malformed blob literal `{}`", hex))
        })
        .collect()
}

//! # Lexical Analysis
//!
//! Tokenizes Oxylang source text with a `logos`-derived scanner. `logos`
//! compiles the variants below into a single DFA, so two-character operators
//! (`->`, `==`, `+=`, …) are guaranteed to win over their one-character
//! prefixes without any manual greedy-match ordering: `#[token]` patterns
//! outrank a same-length `#[regex]` match, and longer matches always outrank
//! shorter ones.

use logos::{Lexer, Logos};

use crate::compiler::error::CompileError;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*([^*]|\*[^/])*\*/")]
pub enum Token {
    // Keywords
    #[token("char")]
    Char,
    #[token("int")]
    Int,
    #[token("int16")]
    Int16,
    #[token("int32")]
    Int32,
    #[token("int64")]
    Int64,
    #[token("float")]
    Float,
    #[token("void")]
    Void,
    #[token("ret")]
    Ret,
    #[token("fn")]
    Fn,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("for")]
    For,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("unsafe")]
    Unsafe,
    #[token("include")]
    Include,
    #[token("extern")]
    Extern,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    /// A digit run containing exactly one `.` — floating payload.
    #[regex(r"[0-9]+\.[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    FloatNumber(f64),
    /// A bare digit run — integer payload. Must come after `FloatNumber` so
    /// logos's longest-match rule prefers the float pattern on input like
    /// `1.5`, where both patterns could otherwise start matching at `1`.
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    IntNumber(i64),

    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| unescape_string(lex.slice()))]
    StringLit(String),

    #[regex(r"'([^'\\\n]|\\.)'", |lex| unescape_char(lex.slice()))]
    CharLit(char),

    // Punctuation
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,

    // Two-character operators (listed ahead of their one-character prefixes
    // purely for readability; logos's longest-match rule is what actually
    // enforces the greedy behaviour the lexer design calls for).
    #[token("->")]
    Arrow,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,

    // Single-character operators
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("!")]
    Bang,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,
    #[token("&")]
    Amp,

    /// Synthesized once lexing reaches the end of input; never produced by a
    /// pattern match.
    Eof,
}

fn unescape_string(raw: &str) -> Option<String> {
    let inner = &raw[1..raw.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next()? {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                '"' => out.push('"'),
                '\\' => out.push('\\'),
                other => out.push(other),
            }
        } else {
            out.push(c);
        }
    }
    Some(out)
}

fn unescape_char(raw: &str) -> Option<char> {
    let inner = &raw[1..raw.len() - 1];
    let mut chars = inner.chars();
    let c = chars.next()?;
    if c == '\\' {
        let escaped = match chars.next()? {
            'n' => '\n',
            't' => '\t',
            '\'' => '\'',
            '\\' => '\\',
            other => other,
        };
        if chars.next().is_some() {
            return None;
        }
        Some(escaped)
    } else if chars.next().is_some() {
        None
    } else {
        Some(c)
    }
}

/// A token paired with the byte range it was scanned from.
pub type Spanned = (Token, std::ops::Range<usize>);

/// Scans `source` into a token stream terminated by [`Token::Eof`].
///
/// Any byte range `logos` cannot classify is reported as either
/// `UnterminatedStringOrChar` (when it opens with a quote character) or
/// `UnknownCharacter`, matching the two lexer failure modes.
pub fn tokenize(source: &str) -> Result<Vec<Spanned>, CompileError> {
    let mut lex: Lexer<Token> = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lex.next() {
        let span = lex.span();
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(_) => {
                let offending = &source[span.start..span.start + 1.min(source.len() - span.start)];
                if offending == "\"" || offending == "'" {
                    return Err(CompileError::lex(
                        span.start,
                        "unterminated string or character literal",
                    ));
                }
                return Err(CompileError::lex(
                    span.start,
                    format!("unknown character '{offending}'"),
                ));
            }
        }
    }

    let eof_at = source.len();
    tokens.push((Token::Eof, eof_at..eof_at));
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<Token> {
        tokenize(src).unwrap().into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn greedy_two_char_operators() {
        assert_eq!(
            kinds("a += 1;"),
            vec![
                Token::Identifier("a".into()),
                Token::PlusEq,
                Token::IntNumber(1),
                Token::Semicolon,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn float_vs_int_literal() {
        assert_eq!(kinds("1.5"), vec![Token::FloatNumber(1.5), Token::Eof]);
        assert_eq!(kinds("15"), vec![Token::IntNumber(15), Token::Eof]);
    }

    #[test]
    fn keyword_beats_identifier() {
        assert_eq!(kinds("int"), vec![Token::Int, Token::Eof]);
        assert_eq!(
            kinds("intx"),
            vec![Token::Identifier("intx".into()), Token::Eof]
        );
    }

    #[test]
    fn string_escapes() {
        assert_eq!(
            kinds("\"hi\\n\""),
            vec![Token::StringLit("hi\n".into()), Token::Eof]
        );
    }

    #[test]
    fn unterminated_string_is_reported() {
        assert!(matches!(
            tokenize("\"abc"),
            Err(CompileError::LexError { .. })
        ));
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            kinds("// a comment\nint /* block */ x;"),
            vec![Token::Int, Token::Identifier("x".into()), Token::Semicolon, Token::Eof]
        );
    }
}

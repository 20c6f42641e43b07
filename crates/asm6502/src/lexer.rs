//! Lexer for 6502 assembly source text.
//!
//! The lexer tokenizes assembly source into a stream of [`Token`]s, each
//! carrying its [`Span`](crate::error::Span) (source position) so that error
//! messages can point back to the exact location in the original input.

use alloc::borrow::Cow;
use alloc::string::String;
#[allow(unused_imports)]
use alloc::vec;
use alloc::vec::Vec;
use core::str;

use crate::error::{AsmError, Span};

/// A token produced by the lexer.
///
/// Token text is borrowed from the source string (`Cow::Borrowed`) in the
/// common case, avoiding per-token heap allocation.  Character literals are
/// the only tokens that own their text on the heap.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'src> {
    /// Token classification.
    pub kind: TokenKind,
    /// Source text of the token — borrowed from input in the common case.
    pub text: Cow<'src, str>,
    /// Source location.
    pub span: Span,
}

impl<'src> Token<'src> {
    /// Returns the token text as a `&str`.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// The type of a token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// An identifier: mnemonic, symbol reference, or index register name.
    Ident,
    /// A numeric literal: decimal, `$` hex, or `0b` binary.
    Number(i32),
    /// A string literal (content without quotes, no escape processing).
    StringLit,
    /// A character literal: `'c` or `'c'`.
    CharLit(u8),
    /// A directive (starts with `.`).
    Directive,
    /// Label definition at the start of a statement (`name:`).
    LabelDef,
    /// A run of raw hex digits following `.DH`.
    HexString,
    /// Immediate-operand marker `#`.
    Hash,
    /// Comma separator.
    Comma,
    /// Open parenthesis `(` (indirect operands, expression grouping).
    OpenParen,
    /// Close parenthesis `)`.
    CloseParen,
    /// Colon `:` (width override: `A:` / `ABS:`).
    Colon,
    /// Equals `=` (equate: `name = value`).
    Equals,
    /// Plus `+`.
    Plus,
    /// Minus `-`.
    Minus,
    /// Asterisk `*` (multiplication).
    Star,
    /// Forward slash `/` (division).
    Slash,
    /// Percent `%` (modulo).
    Percent,
    /// Ampersand `&` (bitwise AND).
    Ampersand,
    /// Pipe `|` (bitwise OR).
    Pipe,
    /// Caret `^` (bitwise XOR).
    Caret,
    /// Tilde `~` (bitwise NOT).
    Tilde,
    /// Less-than `<` (unary low-byte operator).
    Lt,
    /// Greater-than `>` (unary high-byte operator).
    Gt,
    /// Left shift `<<`.
    LShift,
    /// Right shift `>>`.
    RShift,
    /// A newline (statement separator).
    Newline,
    /// End of input.
    Eof,
}

/// Tokenize 6502 assembly source text into a vector of tokens.
///
/// The lexer recognizes:
/// - Identifiers (mnemonics, symbol references): `[A-Za-z_][A-Za-z0-9_]*`
/// - Numeric literals: decimal, hex `$1F`, binary `0b1010`
/// - Character literals: `'c` and `'c'` (closing quote optional)
/// - String literals: `"..."` with no escape sequences
/// - Directives: `.DB`, `.ORG`, etc.
/// - Label definitions at statement start: `name:`
/// - Punctuation: `#`, `,`, `(`, `)`, `:`, `=`
/// - Expression operators: `+ - * / % << >> & | ^ ~ < >`
/// - Comments: `;` to end of line
/// - Newlines as statement separators
///
/// A `name:` sequence is a label definition only at the start of a
/// statement; elsewhere it lexes as an identifier followed by a colon, which
/// is how the `A:`/`ABS:` width-override prefixes reach the parser.
///
/// After a `.DH` directive the remainder of the line is lexed as runs of
/// raw hex digits ([`TokenKind::HexString`]) rather than numbers.
///
/// # Errors
///
/// Returns `Err(AsmError::Lex)` if the input contains an unrecognised
/// character or a malformed token (e.g. an unterminated string literal).
pub fn tokenize<'s>(source: &'s str) -> Result<Vec<Token<'s>>, AsmError> {
    // Heuristic: ~4 chars per token on average (mnemonics, operands, punctuation).
    let mut tokens = Vec::with_capacity(source.len() / 3 + 1);
    let bytes = source.as_bytes();
    let len = bytes.len();
    let mut pos = 0;
    let mut line: u32 = 1;
    let mut col: u32 = 1;
    let mut line_start = 0usize;
    // True at the start of a statement — controls label-definition lexing.
    let mut stmt_start = true;
    // True between a `.DH` directive and the next newline.
    let mut hex_mode = false;

    macro_rules! push {
        ($kind:expr, $text:expr, $span:expr) => {{
            tokens.push(Token {
                kind: $kind,
                text: $text,
                span: $span,
            });
            stmt_start = false;
        }};
    }

    while pos < len {
        let ch = bytes[pos];

        // Skip whitespace (but not newlines)
        if ch == b' ' || ch == b'\t' || ch == b'\r' {
            pos += 1;
            col += 1;
            continue;
        }

        // Newline
        if ch == b'\n' {
            tokens.push(Token {
                kind: TokenKind::Newline,
                text: Cow::Borrowed("\n"),
                span: Span::new(line, col, pos, 1),
            });
            pos += 1;
            line += 1;
            col = 1;
            line_start = pos;
            stmt_start = true;
            hex_mode = false;
            continue;
        }

        // Comment: ; to EOL
        if ch == b';' {
            pos += 1;
            while pos < len && bytes[pos] != b'\n' {
                pos += 1;
            }
            col = (pos - line_start) as u32 + 1;
            continue;
        }

        // Raw hex digits after `.DH`
        if hex_mode {
            let start = pos;
            let start_col = col;
            while pos < len && bytes[pos].is_ascii_hexdigit() {
                pos += 1;
            }
            if pos == start {
                return Err(AsmError::Lex {
                    msg: alloc::format!("invalid hex digit '{}'", ch as char),
                    span: Span::new(line, col, pos, 1),
                });
            }
            let text = Cow::Borrowed(str::from_utf8(&bytes[start..pos]).unwrap_or(""));
            push!(
                TokenKind::HexString,
                text,
                Span::new(line, start_col, start, pos - start)
            );
            col = (pos - line_start) as u32 + 1;
            continue;
        }

        // Hex literal: $1F
        if ch == b'$' {
            let start = pos;
            let start_col = col;
            pos += 1;
            let num_start = pos;
            while pos < len && bytes[pos].is_ascii_hexdigit() {
                pos += 1;
            }
            if pos == num_start {
                return Err(AsmError::Lex {
                    msg: String::from("expected hex digits after '$'"),
                    span: Span::new(line, start_col, start, 1),
                });
            }
            let s = str::from_utf8(&bytes[num_start..pos]).unwrap_or("0");
            let value = i64::from_str_radix(s, 16).map_err(|_| AsmError::Lex {
                msg: alloc::format!("invalid hex number '${}'", s),
                span: Span::new(line, start_col, start, pos - start),
            })?;
            if value > u32::MAX as i64 {
                return Err(AsmError::Lex {
                    msg: alloc::format!("hex number '${}' exceeds 32 bits", s),
                    span: Span::new(line, start_col, start, pos - start),
                });
            }
            let text = Cow::Borrowed(str::from_utf8(&bytes[start..pos]).unwrap_or(""));
            push!(
                TokenKind::Number(value as u32 as i32),
                text,
                Span::new(line, start_col, start, pos - start)
            );
            col = (pos - line_start) as u32 + 1;
            continue;
        }

        // Number: decimal or 0b binary
        if ch.is_ascii_digit() {
            let start = pos;
            let start_col = col;
            let value = parse_number_at(bytes, &mut pos, line, start_col)?;
            let text = Cow::Borrowed(str::from_utf8(&bytes[start..pos]).unwrap_or(""));
            push!(
                TokenKind::Number(value),
                text,
                Span::new(line, start_col, start, pos - start)
            );
            col = (pos - line_start) as u32 + 1;
            continue;
        }

        // String literal (raw bytes, no escapes)
        if ch == b'"' {
            let start = pos;
            let start_col = col;
            pos += 1;
            let content_start = pos;
            while pos < len && bytes[pos] != b'"' && bytes[pos] != b'\n' {
                pos += 1;
            }
            if pos >= len || bytes[pos] != b'"' {
                return Err(AsmError::Lex {
                    msg: String::from("unterminated string literal"),
                    span: Span::new(line, start_col, start, pos - start),
                });
            }
            let text = Cow::Borrowed(str::from_utf8(&bytes[content_start..pos]).unwrap_or(""));
            pos += 1; // closing quote
            push!(
                TokenKind::StringLit,
                text,
                Span::new(line, start_col, start, pos - start)
            );
            col = (pos - line_start) as u32 + 1;
            continue;
        }

        // Character literal: 'c with optional closing quote
        if ch == b'\'' {
            let start = pos;
            let start_col = col;
            pos += 1;
            if pos >= len || bytes[pos] == b'\n' {
                return Err(AsmError::Lex {
                    msg: String::from("unterminated character literal"),
                    span: Span::new(line, start_col, start, 1),
                });
            }
            let ch_val = bytes[pos];
            pos += 1;
            if pos < len && bytes[pos] == b'\'' {
                pos += 1; // optional closing quote
            }
            push!(
                TokenKind::CharLit(ch_val),
                Cow::Owned(alloc::format!("'{}'", ch_val as char)),
                Span::new(line, start_col, start, pos - start)
            );
            col = (pos - line_start) as u32 + 1;
            continue;
        }

        // Directive (starts with '.')
        if ch == b'.' {
            let start = pos;
            let start_col = col;
            pos += 1;
            while pos < len && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_') {
                pos += 1;
            }
            if pos == start + 1 {
                return Err(AsmError::Lex {
                    msg: String::from("expected directive name after '.'"),
                    span: Span::new(line, start_col, start, 1),
                });
            }
            let text = Cow::Borrowed(str::from_utf8(&bytes[start..pos]).unwrap_or(""));
            if text.eq_ignore_ascii_case(".dh") {
                hex_mode = true;
            }
            push!(
                TokenKind::Directive,
                text,
                Span::new(line, start_col, start, pos - start)
            );
            col = (pos - line_start) as u32 + 1;
            continue;
        }

        // Identifier, mnemonic, or label definition
        if ch.is_ascii_alphabetic() || ch == b'_' {
            let start = pos;
            let start_col = col;
            while pos < len && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_') {
                pos += 1;
            }
            let text = Cow::Borrowed(str::from_utf8(&bytes[start..pos]).unwrap_or(""));
            let token_len = pos - start;

            // `name:` at statement start defines a label.  Elsewhere the
            // colon is a separate token (the `A:`/`ABS:` width override).
            if stmt_start && pos < len && bytes[pos] == b':' {
                pos += 1; // consume ':'
                push!(
                    TokenKind::LabelDef,
                    text,
                    Span::new(line, start_col, start, pos - start)
                );
                // The rest of the line is still statement-like, but further
                // `name:` sequences on it are not label definitions.
                col = (pos - line_start) as u32 + 1;
                continue;
            }

            push!(
                TokenKind::Ident,
                text,
                Span::new(line, start_col, start, token_len)
            );
            col = (pos - line_start) as u32 + 1;
            continue;
        }

        // Shift operators << >>
        if ch == b'<' && pos + 1 < len && bytes[pos + 1] == b'<' {
            push!(
                TokenKind::LShift,
                Cow::Borrowed("<<"),
                Span::new(line, col, pos, 2)
            );
            pos += 2;
            col += 2;
            continue;
        }
        if ch == b'>' && pos + 1 < len && bytes[pos + 1] == b'>' {
            push!(
                TokenKind::RShift,
                Cow::Borrowed(">>"),
                Span::new(line, col, pos, 2)
            );
            pos += 2;
            col += 2;
            continue;
        }

        // Single-character tokens
        let kind = match ch {
            b'#' => Some(TokenKind::Hash),
            b',' => Some(TokenKind::Comma),
            b'(' => Some(TokenKind::OpenParen),
            b')' => Some(TokenKind::CloseParen),
            b':' => Some(TokenKind::Colon),
            b'=' => Some(TokenKind::Equals),
            b'+' => Some(TokenKind::Plus),
            b'-' => Some(TokenKind::Minus),
            b'*' => Some(TokenKind::Star),
            b'/' => Some(TokenKind::Slash),
            b'%' => Some(TokenKind::Percent),
            b'&' => Some(TokenKind::Ampersand),
            b'|' => Some(TokenKind::Pipe),
            b'^' => Some(TokenKind::Caret),
            b'~' => Some(TokenKind::Tilde),
            b'<' => Some(TokenKind::Lt),
            b'>' => Some(TokenKind::Gt),
            _ => None,
        };
        if let Some(kind) = kind {
            let text = Cow::Borrowed(str::from_utf8(&bytes[pos..pos + 1]).unwrap_or(""));
            push!(kind, text, Span::new(line, col, pos, 1));
            pos += 1;
            col += 1;
            continue;
        }

        // Unknown character
        return Err(AsmError::Lex {
            msg: alloc::format!("unexpected character '{}'", ch as char),
            span: Span::new(line, col, pos, 1),
        });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        text: Cow::Borrowed(""),
        span: Span::new(line, col, pos, 0),
    });

    Ok(tokens)
}

/// Parse a decimal or `0b` binary number starting at `pos` in `bytes`.
/// Advances `pos` past the number.
#[inline]
fn parse_number_at(
    bytes: &[u8],
    pos: &mut usize,
    span_line: u32,
    span_col: u32,
) -> Result<i32, AsmError> {
    let start = *pos;
    let len = bytes.len();

    // Binary prefix: 0b followed by at least one 0/1
    if bytes[*pos] == b'0'
        && *pos + 2 < len
        && (bytes[*pos + 1] == b'b' || bytes[*pos + 1] == b'B')
        && (bytes[*pos + 2] == b'0' || bytes[*pos + 2] == b'1')
    {
        *pos += 2;
        let num_start = *pos;
        while *pos < len && (bytes[*pos] == b'0' || bytes[*pos] == b'1') {
            *pos += 1;
        }
        let s = str::from_utf8(&bytes[num_start..*pos]).unwrap_or("0");
        let value = i64::from_str_radix(s, 2).map_err(|_| AsmError::Lex {
            msg: alloc::format!("invalid binary number '0b{}'", s),
            span: Span::new(span_line, span_col, start, *pos - start),
        })?;
        if value > u32::MAX as i64 {
            return Err(AsmError::Lex {
                msg: alloc::format!("binary number '0b{}' exceeds 32 bits", s),
                span: Span::new(span_line, span_col, start, *pos - start),
            });
        }
        return Ok(value as u32 as i32);
    }

    // Decimal
    while *pos < len && bytes[*pos].is_ascii_digit() {
        *pos += 1;
    }
    let s = str::from_utf8(&bytes[start..*pos]).unwrap_or("0");
    let value = s.parse::<i64>().map_err(|_| AsmError::Lex {
        msg: alloc::format!("invalid number '{}'", s),
        span: Span::new(span_line, span_col, start, *pos - start),
    })?;
    if value > u32::MAX as i64 {
        return Err(AsmError::Lex {
            msg: alloc::format!("number '{}' exceeds 32 bits", s),
            span: Span::new(span_line, span_col, start, *pos - start),
        });
    }
    Ok(value as u32 as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok_kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_input() {
        let tokens = tokenize("").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
    }

    #[test]
    fn only_whitespace() {
        let tokens = tokenize("   \t  ").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
    }

    #[test]
    fn only_comment() {
        let tokens = tokenize("; this is a comment").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
    }

    #[test]
    fn simple_instruction() {
        let kinds = tok_kinds("LDA #$20");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Ident, // LDA
                TokenKind::Hash,
                TokenKind::Number(0x20),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn hex_literal() {
        let tokens = tokenize("LDA $2000").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Number(0x2000));
        assert_eq!(tokens[1].text, "$2000");
    }

    #[test]
    fn hex_case_insensitive() {
        let tokens = tokenize("LDA $aBcD").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Number(0xABCD));
    }

    #[test]
    fn binary_literal() {
        let tokens = tokenize(".DB 0b01010101").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Number(0b0101_0101));
    }

    #[test]
    fn decimal_literal() {
        let tokens = tokenize(".DB 129").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Number(129));
    }

    #[test]
    fn minus_is_an_operator_token() {
        // The expression parser owns unary minus; the lexer never folds it.
        let kinds = tok_kinds(".DB -1");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Directive,
                TokenKind::Minus,
                TokenKind::Number(1),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn char_literal_unclosed() {
        let tokens = tokenize(".DB 'f").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::CharLit(b'f'));
    }

    #[test]
    fn char_literal_closed() {
        let tokens = tokenize(".DB 'f'").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::CharLit(b'f'));
        assert_eq!(tokens[2].kind, TokenKind::Eof);
    }

    #[test]
    fn char_literal_both_forms_in_list() {
        let kinds = tok_kinds(".DB 'f, 'f'");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Directive,
                TokenKind::CharLit(b'f'),
                TokenKind::Comma,
                TokenKind::CharLit(b'f'),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn string_literal() {
        let tokens = tokenize(".DB \"AB\"").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::StringLit);
        assert_eq!(tokens[1].text, "AB");
    }

    #[test]
    fn string_no_escape_processing() {
        let tokens = tokenize(".DB \"a\\n\"").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::StringLit);
        assert_eq!(tokens[1].text, "a\\n");
    }

    #[test]
    fn label_definition_at_line_start() {
        let tokens = tokenize("entry:").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::LabelDef);
        assert_eq!(tokens[0].text, "entry");
    }

    #[test]
    fn label_definition_with_instruction() {
        let kinds = tok_kinds("loop: DEX");
        assert_eq!(kinds[0], TokenKind::LabelDef);
        assert_eq!(kinds[1], TokenKind::Ident);
    }

    #[test]
    fn width_override_is_not_a_label() {
        // `A:` in operand position lexes as Ident + Colon.
        let kinds = tok_kinds("LDA A:$20");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Ident, // LDA
                TokenKind::Ident, // A
                TokenKind::Colon,
                TokenKind::Number(0x20),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn directive() {
        let tokens = tokenize(".ORG $0800").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Directive);
        assert_eq!(tokens[0].text, ".ORG");
        assert_eq!(tokens[1].kind, TokenKind::Number(0x0800));
    }

    #[test]
    fn dh_hex_string() {
        let tokens = tokenize(".DH 0102aabb").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::HexString);
        assert_eq!(tokens[1].text, "0102aabb");
    }

    #[test]
    fn dh_all_letter_payload_is_not_ident() {
        let tokens = tokenize(".DH aabbcc").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::HexString);
    }

    #[test]
    fn dh_mode_ends_at_newline() {
        let tokens = tokenize(".DH dd\nNOP").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::HexString);
        assert_eq!(tokens[2].kind, TokenKind::Newline);
        assert_eq!(tokens[3].kind, TokenKind::Ident);
    }

    #[test]
    fn indexed_operand_tokens() {
        let kinds = tok_kinds("LDA $2000,X");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Ident,
                TokenKind::Number(0x2000),
                TokenKind::Comma,
                TokenKind::Ident, // X
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn indirect_operand_tokens() {
        let kinds = tok_kinds("JMP ($20)");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Ident,
                TokenKind::OpenParen,
                TokenKind::Number(0x20),
                TokenKind::CloseParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn shift_operators() {
        let kinds = tok_kinds(".DB $ABCD >> 8");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Directive,
                TokenKind::Number(0xABCD),
                TokenKind::RShift,
                TokenKind::Number(8),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn single_angle_brackets_are_byte_operators() {
        let kinds = tok_kinds(".DB <$1234, >$1234");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Directive,
                TokenKind::Lt,
                TokenKind::Number(0x1234),
                TokenKind::Comma,
                TokenKind::Gt,
                TokenKind::Number(0x1234),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn equate_tokens() {
        let kinds = tok_kinds("data = $20");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Ident,
                TokenKind::Equals,
                TokenKind::Number(0x20),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn span_tracking() {
        let tokens = tokenize("LDA #1").unwrap();
        assert_eq!(tokens[0].span, Span::new(1, 1, 0, 3)); // "LDA"
        assert_eq!(tokens[1].span, Span::new(1, 5, 4, 1)); // "#"
        assert_eq!(tokens[2].span, Span::new(1, 6, 5, 1)); // "1"
    }

    #[test]
    fn multiline_span_tracking() {
        let tokens = tokenize("NOP\nLDA #1").unwrap();
        assert_eq!(tokens[0].span.line, 1); // NOP
        assert_eq!(tokens[2].span.line, 2); // LDA (after newline)
    }

    #[test]
    fn unknown_character_error() {
        let err = tokenize("LDA @").unwrap_err();
        match err {
            AsmError::Lex { msg, .. } => {
                assert!(msg.contains("unexpected character '@'"));
            }
            _ => panic!("expected Lex error"),
        }
    }

    #[test]
    fn unterminated_string() {
        let err = tokenize(".DB \"hello").unwrap_err();
        match err {
            AsmError::Lex { msg, .. } => {
                assert!(msg.contains("unterminated string"));
            }
            _ => panic!("expected Lex error"),
        }
    }

    #[test]
    fn bare_dollar_error() {
        let err = tokenize("LDA $").unwrap_err();
        match err {
            AsmError::Lex { msg, .. } => {
                assert!(msg.contains("expected hex digits"));
            }
            _ => panic!("expected Lex error"),
        }
    }

    #[test]
    fn comment_after_instruction() {
        let kinds = tok_kinds("NOP ; does nothing");
        assert_eq!(kinds, vec![TokenKind::Ident, TokenKind::Eof]);
    }

    #[test]
    fn trailing_whitespace() {
        let tokens = tokenize("NOP   ").unwrap();
        assert_eq!(tokens.len(), 2); // NOP + Eof
    }

    #[test]
    fn hex_number_overflow() {
        let err = tokenize(".DD $1FFFFFFFF").unwrap_err();
        assert!(matches!(err, AsmError::Lex { .. }));
    }
}

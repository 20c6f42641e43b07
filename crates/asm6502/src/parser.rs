//! Parser for 6502 assembly statements.
//!
//! Converts a stream of `Token`s from the lexer into a `Statement` list.
//! Handles labels, instructions with every operand shape (immediate,
//! direct, indexed, indirect, width-overridden), pseudo-op directives, and
//! the full operand expression grammar.
//!
//! Parse errors are recovered per line: the offending statement is dropped,
//! an error is recorded, and parsing resumes at the next newline — so a
//! single bad line does not hide diagnostics further down the file.

use alloc::boxed::Box;
use alloc::string::{String, ToString};
#[allow(unused_imports)]
use alloc::vec;
use alloc::vec::Vec;

use crate::error::{AsmError, Span};
use crate::ir::*;
use crate::lexer::{Token, TokenKind};
use crate::mos6502::{CpuVariant, Mnemonic};

/// Zero-allocation ASCII-lowercase into a caller-provided stack buffer.
/// Returns `&str` of the lowered text. Inputs longer than `buf` are truncated.
#[inline]
fn to_lower_buf<'b>(s: &str, buf: &'b mut [u8]) -> &'b str {
    let len = s.len().min(buf.len());
    buf[..len].copy_from_slice(&s.as_bytes()[..len]);
    buf[..len].make_ascii_lowercase();
    // Input was valid UTF-8 and ASCII lowercase preserves validity,
    // so from_utf8 is infallible here.
    core::str::from_utf8(&buf[..len]).unwrap_or("")
}

/// Parse a token stream into a statement list, stopping at the first error.
///
/// # Errors
///
/// Returns the first `AsmError` encountered.  The driver uses
/// [`parse_program`] instead, which recovers per line and accumulates
/// every diagnostic.
pub fn parse(tokens: &[Token<'_>]) -> Result<Vec<Statement>, AsmError> {
    let (stmts, mut errors) = parse_program(tokens);
    if errors.is_empty() {
        Ok(stmts)
    } else {
        Err(errors.remove(0))
    }
}

/// Parse a token stream with per-line error recovery.
///
/// Returns every successfully parsed statement together with every
/// diagnostic, both in source order.
pub fn parse_program(tokens: &[Token<'_>]) -> (Vec<Statement>, Vec<AsmError>) {
    let mut parser = Parser::new(tokens);
    parser.parse_all()
}

struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>]) -> Self {
        Self { tokens, pos: 0 }
    }

    #[inline]
    fn peek(&self) -> &Token<'a> {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    #[inline]
    fn peek2(&self) -> &Token<'a> {
        &self.tokens[(self.pos + 1).min(self.tokens.len() - 1)]
    }

    #[inline]
    fn advance(&mut self) -> &Token<'a> {
        let tok = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    #[inline]
    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len() || self.peek().kind == TokenKind::Eof
    }

    #[inline]
    fn is_stmt_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Newline | TokenKind::Eof)
    }

    /// Skip tokens through the next newline — error recovery.
    fn sync_to_newline(&mut self) {
        while !self.at_end() && self.peek().kind != TokenKind::Newline {
            self.advance();
        }
        if self.peek().kind == TokenKind::Newline {
            self.advance();
        }
    }

    fn parse_all(&mut self) -> (Vec<Statement>, Vec<AsmError>) {
        // Heuristic: ~4 tokens per statement on average.
        let mut stmts = Vec::with_capacity(self.tokens.len() / 4 + 1);
        let mut errors = Vec::new();

        while !self.at_end() {
            if self.peek().kind == TokenKind::Newline {
                self.advance();
                continue;
            }
            let before = stmts.len();
            match self.parse_line(&mut stmts) {
                Ok(()) => {
                    if !self.is_stmt_end() {
                        let tok = self.peek();
                        errors.push(AsmError::Parse {
                            msg: alloc::format!(
                                "expected end of statement, found '{}'",
                                tok.text
                            ),
                            span: tok.span,
                        });
                        // Emission never happens for a statement that fails
                        // to parse: discard this line's statements.
                        stmts.truncate(before);
                        self.sync_to_newline();
                    }
                }
                Err(e) => {
                    errors.push(e);
                    stmts.truncate(before);
                    self.sync_to_newline();
                }
            }
        }

        (stmts, errors)
    }

    /// Parse one source line: optional label, then an optional instruction,
    /// directive, or equate.
    fn parse_line(&mut self, stmts: &mut Vec<Statement>) -> Result<(), AsmError> {
        if self.peek().kind == TokenKind::LabelDef {
            let tok = self.advance();
            stmts.push(Statement::Label(tok.text.to_string(), tok.span));
            if self.is_stmt_end() {
                return Ok(());
            }
        }

        let tok = self.peek().clone();
        match &tok.kind {
            TokenKind::Directive => {
                let stmt = self.parse_directive()?;
                stmts.push(stmt);
                Ok(())
            }
            TokenKind::Ident => {
                // `name = expr` / `name .EQ expr` equate forms
                if self.peek2().kind == TokenKind::Equals {
                    self.advance(); // name
                    self.advance(); // '='
                    let value = self.parse_expr()?;
                    stmts.push(Statement::Equate(ConstDef {
                        name: tok.text.to_string(),
                        value,
                        span: tok.span,
                    }));
                    return Ok(());
                }
                if self.peek2().kind == TokenKind::Directive {
                    let mut buf = [0u8; 8];
                    let dir = to_lower_buf(&self.peek2().text, &mut buf);
                    if dir == ".eq" || dir == ".equ" {
                        self.advance(); // name
                        self.advance(); // .EQ
                        let value = self.parse_expr()?;
                        stmts.push(Statement::Equate(ConstDef {
                            name: tok.text.to_string(),
                            value,
                            span: tok.span,
                        }));
                        return Ok(());
                    }
                }
                let stmt = self.parse_instruction()?;
                stmts.push(stmt);
                Ok(())
            }
            _ => Err(AsmError::Parse {
                msg: alloc::format!("unexpected token '{}'", tok.text),
                span: tok.span,
            }),
        }
    }

    // ── directives ─────────────────────────────────────────

    fn parse_directive(&mut self) -> Result<Statement, AsmError> {
        let tok = self.advance().clone();
        let mut dir_buf = [0u8; 16];
        let dir = to_lower_buf(&tok.text, &mut dir_buf);
        let span = tok.span;

        match dir {
            ".org" => {
                let expr = self.parse_expr()?;
                Ok(Statement::Org(expr, span))
            }
            ".db" => self.parse_data_directive(DataWidth::Byte, span),
            ".dw" => self.parse_data_directive(DataWidth::Word, span),
            ".dd" => self.parse_data_directive(DataWidth::Dword, span),
            ".dh" => self.parse_hex_directive(span),
            ".ds" => {
                let values = self.parse_data_values()?;
                Ok(Statement::TermString(values, span))
            }
            ".align" => {
                let expr = self.parse_expr()?;
                Ok(Statement::Align(expr, span))
            }
            ".eq" | ".equ" => Err(AsmError::Parse {
                msg: String::from("equate requires a name: `name .EQ expr`"),
                span,
            }),
            ".ex" | ".export" => self.parse_export_directive(),
            ".arch" => self.parse_arch_directive(span),
            _ => Err(AsmError::Parse {
                msg: alloc::format!("unknown directive '{}'", tok.text),
                span,
            }),
        }
    }

    fn parse_data_directive(
        &mut self,
        width: DataWidth,
        span: Span,
    ) -> Result<Statement, AsmError> {
        let values = self.parse_data_values()?;
        Ok(Statement::Data {
            width,
            values,
            span,
        })
    }

    fn parse_data_values(&mut self) -> Result<Vec<DataValue>, AsmError> {
        let mut values = Vec::new();
        loop {
            if self.peek().kind == TokenKind::StringLit {
                let tok = self.advance();
                values.push(DataValue::Str(tok.text.as_bytes().to_vec()));
            } else {
                values.push(DataValue::Expr(self.parse_expr()?));
            }
            if self.peek().kind == TokenKind::Comma {
                self.advance();
            } else {
                break;
            }
        }
        Ok(values)
    }

    fn parse_hex_directive(&mut self, span: Span) -> Result<Statement, AsmError> {
        let mut bytes = Vec::new();
        let mut any = false;
        while self.peek().kind == TokenKind::HexString {
            let tok = self.advance();
            any = true;
            let digits = tok.text.as_bytes();
            if digits.len() % 2 != 0 {
                return Err(AsmError::Parse {
                    msg: alloc::format!(
                        "'.DH' requires an even number of hex digits, got {}",
                        digits.len()
                    ),
                    span: tok.span,
                });
            }
            for pair in digits.chunks_exact(2) {
                let hi = hex_digit(pair[0]);
                let lo = hex_digit(pair[1]);
                bytes.push(hi << 4 | lo);
            }
        }
        if !any {
            return Err(AsmError::Parse {
                msg: String::from("'.DH' requires hex digits"),
                span,
            });
        }
        Ok(Statement::HexData(bytes, span))
    }

    fn parse_export_directive(&mut self) -> Result<Statement, AsmError> {
        let mut names = Vec::new();
        loop {
            let tok = self.peek().clone();
            if tok.kind != TokenKind::Ident {
                return Err(AsmError::Parse {
                    msg: alloc::format!("expected symbol name, found '{}'", tok.text),
                    span: tok.span,
                });
            }
            self.advance();
            names.push((tok.text.to_string(), tok.span));
            if self.peek().kind == TokenKind::Comma {
                self.advance();
            } else {
                break;
            }
        }
        Ok(Statement::Export(names))
    }

    /// `.ARCH 6502` / `.ARCH 65C02` — the argument straddles number and
    /// identifier tokens, so it is matched on the concatenated text.
    fn parse_arch_directive(&mut self, span: Span) -> Result<Statement, AsmError> {
        let mut name = String::new();
        while !self.is_stmt_end() {
            name.push_str(&self.advance().text);
        }
        let mut buf = [0u8; 16];
        match to_lower_buf(&name, &mut buf) {
            "6502" | "nmos" => Ok(Statement::Arch(CpuVariant::Nmos, span)),
            "65c02" | "cmos" => Ok(Statement::Arch(CpuVariant::Cmos, span)),
            _ => Err(AsmError::Parse {
                msg: alloc::format!("unknown architecture '{}'", name),
                span,
            }),
        }
    }

    // ── instructions ───────────────────────────────────────

    fn parse_instruction(&mut self) -> Result<Statement, AsmError> {
        let tok = self.advance().clone();
        let mnemonic = Mnemonic::from_name(&tok.text).ok_or_else(|| AsmError::UnknownMnemonic {
            name: tok.text.to_string(),
            span: tok.span,
        })?;
        let operand = self.parse_operand()?;
        Ok(Statement::Instruction(Instruction {
            mnemonic,
            operand,
            span: tok.span,
        }))
    }

    fn parse_operand(&mut self) -> Result<Operand, AsmError> {
        if self.is_stmt_end() {
            return Ok(Operand::None);
        }

        match self.peek().kind {
            TokenKind::Hash => {
                self.advance();
                let expr = self.parse_expr()?;
                Ok(Operand::Immediate(expr))
            }
            TokenKind::OpenParen => self.parse_indirect_operand(),
            TokenKind::Ident => {
                let text = self.peek().text.clone();
                // Width override: `A:` / `ABS:` before the address expression.
                if self.peek2().kind == TokenKind::Colon
                    && (text.eq_ignore_ascii_case("a") || text.eq_ignore_ascii_case("abs"))
                {
                    self.advance(); // A / ABS
                    self.advance(); // ':'
                    let expr = self.parse_expr()?;
                    let index = self.parse_index_suffix()?;
                    return Ok(Operand::Address {
                        expr,
                        index,
                        force_abs: true,
                    });
                }
                // Bare `A` is the accumulator.
                if text.eq_ignore_ascii_case("a") && self.peek2_is_stmt_end() {
                    self.advance();
                    return Ok(Operand::Accumulator);
                }
                let expr = self.parse_expr()?;
                let index = self.parse_index_suffix()?;
                Ok(Operand::Address {
                    expr,
                    index,
                    force_abs: false,
                })
            }
            _ => {
                let expr = self.parse_expr()?;
                let index = self.parse_index_suffix()?;
                Ok(Operand::Address {
                    expr,
                    index,
                    force_abs: false,
                })
            }
        }
    }

    #[inline]
    fn peek2_is_stmt_end(&self) -> bool {
        matches!(self.peek2().kind, TokenKind::Newline | TokenKind::Eof)
    }

    /// Parse `(expr)`, `(expr,X)`, or `(expr),Y`.
    fn parse_indirect_operand(&mut self) -> Result<Operand, AsmError> {
        self.advance(); // '('
        let expr = self.parse_expr()?;
        match self.peek().kind {
            TokenKind::Comma => {
                self.advance();
                let reg = self.expect_index_register()?;
                if reg != IndexReg::X {
                    let tok = self.peek().clone();
                    return Err(AsmError::Parse {
                        msg: String::from("expected X register in indexed-indirect operand"),
                        span: tok.span,
                    });
                }
                self.expect(TokenKind::CloseParen, "')'")?;
                Ok(Operand::Indirect {
                    expr,
                    form: IndirectForm::XIndexed,
                })
            }
            TokenKind::CloseParen => {
                self.advance();
                if self.peek().kind == TokenKind::Comma {
                    self.advance();
                    let reg = self.expect_index_register()?;
                    if reg != IndexReg::Y {
                        let tok = self.peek().clone();
                        return Err(AsmError::Parse {
                            msg: String::from(
                                "expected Y register in indirect-indexed operand",
                            ),
                            span: tok.span,
                        });
                    }
                    Ok(Operand::Indirect {
                        expr,
                        form: IndirectForm::YIndexed,
                    })
                } else {
                    Ok(Operand::Indirect {
                        expr,
                        form: IndirectForm::Plain,
                    })
                }
            }
            _ => {
                let tok = self.peek().clone();
                Err(AsmError::Parse {
                    msg: alloc::format!("expected ')' or ',X', found '{}'", tok.text),
                    span: tok.span,
                })
            }
        }
    }

    /// Parse an optional `,X` / `,Y` suffix after an address expression.
    fn parse_index_suffix(&mut self) -> Result<Option<IndexReg>, AsmError> {
        if self.peek().kind != TokenKind::Comma {
            return Ok(None);
        }
        self.advance();
        Ok(Some(self.expect_index_register()?))
    }

    fn expect_index_register(&mut self) -> Result<IndexReg, AsmError> {
        let tok = self.peek().clone();
        if tok.kind == TokenKind::Ident {
            if tok.text.eq_ignore_ascii_case("x") {
                self.advance();
                return Ok(IndexReg::X);
            }
            if tok.text.eq_ignore_ascii_case("y") {
                self.advance();
                return Ok(IndexReg::Y);
            }
        }
        Err(AsmError::Parse {
            msg: alloc::format!("expected index register X or Y, found '{}'", tok.text),
            span: tok.span,
        })
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<(), AsmError> {
        let tok = self.peek().clone();
        if tok.kind == kind {
            self.advance();
            Ok(())
        } else {
            Err(AsmError::Parse {
                msg: alloc::format!("expected {}, found '{}'", what, tok.text),
                span: tok.span,
            })
        }
    }

    // ── expressions ────────────────────────────────────────
    //
    // Precedence, lowest to highest:
    //   `|`  →  `^`  →  `&`  →  `<<` `>>`  →  `+` `-`  →  `*` `/` `%`
    //   →  unary `-` `~` `<` `>`  →  atoms

    fn parse_expr(&mut self) -> Result<Expr, AsmError> {
        self.expr_bit_or()
    }

    fn expr_bit_or(&mut self) -> Result<Expr, AsmError> {
        let mut lhs = self.expr_bit_xor()?;
        while self.peek().kind == TokenKind::Pipe {
            self.advance();
            let rhs = self.expr_bit_xor()?;
            lhs = Expr::Binary(BinOp::Or, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn expr_bit_xor(&mut self) -> Result<Expr, AsmError> {
        let mut lhs = self.expr_bit_and()?;
        while self.peek().kind == TokenKind::Caret {
            self.advance();
            let rhs = self.expr_bit_and()?;
            lhs = Expr::Binary(BinOp::Xor, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn expr_bit_and(&mut self) -> Result<Expr, AsmError> {
        let mut lhs = self.expr_shift()?;
        while self.peek().kind == TokenKind::Ampersand {
            self.advance();
            let rhs = self.expr_shift()?;
            lhs = Expr::Binary(BinOp::And, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn expr_shift(&mut self) -> Result<Expr, AsmError> {
        let mut lhs = self.expr_add()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::LShift => BinOp::Shl,
                TokenKind::RShift => BinOp::Shr,
                _ => break,
            };
            self.advance();
            let rhs = self.expr_add()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn expr_add(&mut self) -> Result<Expr, AsmError> {
        let mut lhs = self.expr_mul()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.expr_mul()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn expr_mul(&mut self) -> Result<Expr, AsmError> {
        let mut lhs = self.expr_unary()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Rem,
                _ => break,
            };
            self.advance();
            let rhs = self.expr_unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn expr_unary(&mut self) -> Result<Expr, AsmError> {
        let op = match self.peek().kind {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Tilde => UnaryOp::BitNot,
            TokenKind::Lt => UnaryOp::LowByte,
            TokenKind::Gt => UnaryOp::HighByte,
            _ => return self.expr_atom(),
        };
        self.advance();
        let child = self.expr_unary()?;
        Ok(Expr::Unary(op, Box::new(child)))
    }

    fn expr_atom(&mut self) -> Result<Expr, AsmError> {
        let tok = self.peek().clone();
        match &tok.kind {
            TokenKind::Number(n) => {
                self.advance();
                Ok(Expr::Num(*n))
            }
            TokenKind::CharLit(c) => {
                self.advance();
                Ok(Expr::Num(i32::from(*c)))
            }
            TokenKind::Ident => {
                self.advance();
                Ok(Expr::Symbol(tok.text.to_string()))
            }
            TokenKind::OpenParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::CloseParen, "')'")?;
                Ok(expr)
            }
            _ => Err(AsmError::Parse {
                msg: alloc::format!("expected expression, found '{}'", tok.text),
                span: tok.span,
            }),
        }
    }
}

#[inline]
fn hex_digit(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => b - b'A' + 10,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse_one(src: &str) -> Statement {
        let tokens = tokenize(src).unwrap();
        let mut stmts = parse(&tokens).unwrap();
        assert_eq!(stmts.len(), 1, "expected one statement from {:?}", src);
        stmts.remove(0)
    }

    fn parse_err(src: &str) -> AsmError {
        let tokens = tokenize(src).unwrap();
        parse(&tokens).unwrap_err()
    }

    #[test]
    fn implied_instruction() {
        match parse_one("NOP") {
            Statement::Instruction(ins) => {
                assert_eq!(ins.mnemonic, Mnemonic::Nop);
                assert_eq!(ins.operand, Operand::None);
            }
            other => panic!("expected instruction, got {:?}", other),
        }
    }

    #[test]
    fn accumulator_operand() {
        match parse_one("ASL A") {
            Statement::Instruction(ins) => {
                assert_eq!(ins.mnemonic, Mnemonic::Asl);
                assert_eq!(ins.operand, Operand::Accumulator);
            }
            other => panic!("expected instruction, got {:?}", other),
        }
    }

    #[test]
    fn immediate_operand() {
        match parse_one("LDA #$20") {
            Statement::Instruction(ins) => {
                assert_eq!(ins.operand, Operand::Immediate(Expr::Num(0x20)));
            }
            other => panic!("expected instruction, got {:?}", other),
        }
    }

    #[test]
    fn direct_address_operand() {
        match parse_one("LDA $2000") {
            Statement::Instruction(ins) => match ins.operand {
                Operand::Address {
                    expr,
                    index,
                    force_abs,
                } => {
                    assert_eq!(expr, Expr::Num(0x2000));
                    assert_eq!(index, None);
                    assert!(!force_abs);
                }
                other => panic!("expected address operand, got {:?}", other),
            },
            other => panic!("expected instruction, got {:?}", other),
        }
    }

    #[test]
    fn indexed_address_operand() {
        match parse_one("LDA $2000,X") {
            Statement::Instruction(ins) => match ins.operand {
                Operand::Address { index, .. } => assert_eq!(index, Some(IndexReg::X)),
                other => panic!("expected address operand, got {:?}", other),
            },
            other => panic!("expected instruction, got {:?}", other),
        }
    }

    #[test]
    fn index_register_case_insensitive() {
        match parse_one("LDA $2000,y") {
            Statement::Instruction(ins) => match ins.operand {
                Operand::Address { index, .. } => assert_eq!(index, Some(IndexReg::Y)),
                other => panic!("expected address operand, got {:?}", other),
            },
            other => panic!("expected instruction, got {:?}", other),
        }
    }

    #[test]
    fn width_override_a() {
        match parse_one("LDA A:$20") {
            Statement::Instruction(ins) => match ins.operand {
                Operand::Address { force_abs, .. } => assert!(force_abs),
                other => panic!("expected address operand, got {:?}", other),
            },
            other => panic!("expected instruction, got {:?}", other),
        }
    }

    #[test]
    fn width_override_abs() {
        match parse_one("lda abs:$20") {
            Statement::Instruction(ins) => match ins.operand {
                Operand::Address { force_abs, .. } => assert!(force_abs),
                other => panic!("expected address operand, got {:?}", other),
            },
            other => panic!("expected instruction, got {:?}", other),
        }
    }

    #[test]
    fn plain_indirect() {
        match parse_one("JMP ($2000)") {
            Statement::Instruction(ins) => {
                assert_eq!(
                    ins.operand,
                    Operand::Indirect {
                        expr: Expr::Num(0x2000),
                        form: IndirectForm::Plain,
                    }
                );
            }
            other => panic!("expected instruction, got {:?}", other),
        }
    }

    #[test]
    fn indexed_indirect() {
        match parse_one("LDA ($20,X)") {
            Statement::Instruction(ins) => match ins.operand {
                Operand::Indirect { form, .. } => assert_eq!(form, IndirectForm::XIndexed),
                other => panic!("expected indirect operand, got {:?}", other),
            },
            other => panic!("expected instruction, got {:?}", other),
        }
    }

    #[test]
    fn indirect_indexed() {
        match parse_one("LDA ($20),Y") {
            Statement::Instruction(ins) => match ins.operand {
                Operand::Indirect { form, .. } => assert_eq!(form, IndirectForm::YIndexed),
                other => panic!("expected indirect operand, got {:?}", other),
            },
            other => panic!("expected instruction, got {:?}", other),
        }
    }

    #[test]
    fn mnemonic_case_insensitive() {
        match parse_one("lda #1") {
            Statement::Instruction(ins) => assert_eq!(ins.mnemonic, Mnemonic::Lda),
            other => panic!("expected instruction, got {:?}", other),
        }
    }

    #[test]
    fn unknown_mnemonic() {
        assert!(matches!(
            parse_err("MOV $20"),
            AsmError::UnknownMnemonic { .. }
        ));
    }

    #[test]
    fn label_then_instruction() {
        let tokens = tokenize("loop: DEX").unwrap();
        let stmts = parse(&tokens).unwrap();
        assert_eq!(stmts.len(), 2);
        assert!(matches!(&stmts[0], Statement::Label(name, _) if name == "loop"));
        assert!(matches!(&stmts[1], Statement::Instruction(_)));
    }

    #[test]
    fn equate_with_equals() {
        match parse_one("data = $20") {
            Statement::Equate(def) => {
                assert_eq!(def.name, "data");
                assert_eq!(def.value, Expr::Num(0x20));
            }
            other => panic!("expected equate, got {:?}", other),
        }
    }

    #[test]
    fn equate_with_directive() {
        match parse_one("data .EQ $1000+4") {
            Statement::Equate(def) => {
                assert_eq!(def.name, "data");
                assert_eq!(
                    def.value,
                    Expr::Binary(
                        BinOp::Add,
                        Box::new(Expr::Num(0x1000)),
                        Box::new(Expr::Num(4))
                    )
                );
            }
            other => panic!("expected equate, got {:?}", other),
        }
    }

    #[test]
    fn org_directive() {
        match parse_one(".ORG $0800") {
            Statement::Org(expr, _) => assert_eq!(expr, Expr::Num(0x0800)),
            other => panic!("expected org, got {:?}", other),
        }
    }

    #[test]
    fn data_directive_mixed_values() {
        match parse_one(".DB \"AB\", $00") {
            Statement::Data { width, values, .. } => {
                assert_eq!(width, DataWidth::Byte);
                assert_eq!(values.len(), 2);
                assert_eq!(values[0], DataValue::Str(b"AB".to_vec()));
                assert_eq!(values[1], DataValue::Expr(Expr::Num(0)));
            }
            other => panic!("expected data, got {:?}", other),
        }
    }

    #[test]
    fn hex_data_directive() {
        match parse_one(".DH 0102aabb") {
            Statement::HexData(bytes, _) => assert_eq!(bytes, vec![0x01, 0x02, 0xAA, 0xBB]),
            other => panic!("expected hex data, got {:?}", other),
        }
    }

    #[test]
    fn hex_data_odd_digits() {
        assert!(matches!(parse_err(".DH 012"), AsmError::Parse { .. }));
    }

    #[test]
    fn export_directive() {
        match parse_one(".EX main, loop") {
            Statement::Export(names) => {
                assert_eq!(names.len(), 2);
                assert_eq!(names[0].0, "main");
                assert_eq!(names[1].0, "loop");
            }
            other => panic!("expected export, got {:?}", other),
        }
    }

    #[test]
    fn arch_directive() {
        match parse_one(".ARCH 65C02") {
            Statement::Arch(v, _) => assert_eq!(v, CpuVariant::Cmos),
            other => panic!("expected arch, got {:?}", other),
        }
        match parse_one(".ARCH 6502") {
            Statement::Arch(v, _) => assert_eq!(v, CpuVariant::Nmos),
            other => panic!("expected arch, got {:?}", other),
        }
    }

    #[test]
    fn expression_precedence_mul_over_add() {
        match parse_one(".DB 1+2*3") {
            Statement::Data { values, .. } => {
                let expected = Expr::Binary(
                    BinOp::Add,
                    Box::new(Expr::Num(1)),
                    Box::new(Expr::Binary(
                        BinOp::Mul,
                        Box::new(Expr::Num(2)),
                        Box::new(Expr::Num(3)),
                    )),
                );
                assert_eq!(values[0], DataValue::Expr(expected));
            }
            other => panic!("expected data, got {:?}", other),
        }
    }

    #[test]
    fn expression_shift_below_additive() {
        // `1+2 >> 1` parses as `(1+2) >> 1`
        match parse_one(".DB 1+2 >> 1") {
            Statement::Data { values, .. } => {
                let expected = Expr::Binary(
                    BinOp::Shr,
                    Box::new(Expr::Binary(
                        BinOp::Add,
                        Box::new(Expr::Num(1)),
                        Box::new(Expr::Num(2)),
                    )),
                    Box::new(Expr::Num(1)),
                );
                assert_eq!(values[0], DataValue::Expr(expected));
            }
            other => panic!("expected data, got {:?}", other),
        }
    }

    #[test]
    fn expression_grouping_parens() {
        match parse_one(".DB (1+2)*3") {
            Statement::Data { values, .. } => {
                let expected = Expr::Binary(
                    BinOp::Mul,
                    Box::new(Expr::Binary(
                        BinOp::Add,
                        Box::new(Expr::Num(1)),
                        Box::new(Expr::Num(2)),
                    )),
                    Box::new(Expr::Num(3)),
                );
                assert_eq!(values[0], DataValue::Expr(expected));
            }
            other => panic!("expected data, got {:?}", other),
        }
    }

    #[test]
    fn unary_low_high_byte() {
        match parse_one("LDA #<label") {
            Statement::Instruction(ins) => {
                assert_eq!(
                    ins.operand,
                    Operand::Immediate(Expr::Unary(
                        UnaryOp::LowByte,
                        Box::new(Expr::Symbol("label".into()))
                    ))
                );
            }
            other => panic!("expected instruction, got {:?}", other),
        }
    }

    #[test]
    fn char_literal_atom() {
        match parse_one(".DB 'f") {
            Statement::Data { values, .. } => {
                assert_eq!(values[0], DataValue::Expr(Expr::Num(0x66)));
            }
            other => panic!("expected data, got {:?}", other),
        }
    }

    #[test]
    fn symbol_reference_operand() {
        match parse_one("JMP start") {
            Statement::Instruction(ins) => match ins.operand {
                Operand::Address { expr, .. } => {
                    assert_eq!(expr, Expr::Symbol("start".into()));
                }
                other => panic!("expected address operand, got {:?}", other),
            },
            other => panic!("expected instruction, got {:?}", other),
        }
    }

    #[test]
    fn unknown_directive() {
        assert!(matches!(parse_err(".FOO 1"), AsmError::Parse { .. }));
    }

    #[test]
    fn trailing_garbage_is_an_error() {
        let tokens = tokenize("LDA $20 $30").unwrap();
        let (stmts, errors) = parse_program(&tokens);
        assert!(stmts.is_empty());
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn recovery_continues_after_bad_line() {
        let tokens = tokenize("MOV $20\nNOP\nBAD\nRTS").unwrap();
        let (stmts, errors) = parse_program(&tokens);
        assert_eq!(errors.len(), 2);
        assert_eq!(stmts.len(), 2); // NOP and RTS survive
    }

    #[test]
    fn bad_index_register() {
        assert!(matches!(parse_err("LDA $20,Z"), AsmError::Parse { .. }));
    }
}

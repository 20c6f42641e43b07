//! Public assembler API and the two-pass driver.
//!
//! Pass 1 walks the parsed statements in source order: labels are defined
//! at the current program counter, addressing modes are selected (with
//! zero-page size minimization), and bytes are emitted.  Operands that
//! depend on symbols not yet defined emit zero placeholders and record a
//! fixup.  Pass 2 resolves deferred equates, patches every fixup, and
//! resolves the export list.
//!
//! Instruction sizes are fixed in pass 1 and never change: an ambiguous
//! operand whose value is unknown at encoding time is always given the
//! absolute form, so a forward reference that turns out to fit in zero
//! page still assembles as a 3-byte instruction.  Sources that want the
//! short encoding declare the address first with `.EQ`.

#[allow(unused_imports)]
use alloc::format;
use alloc::string::{String, ToString};
#[allow(unused_imports)]
use alloc::vec;
use alloc::vec::Vec;

use log::{debug, trace};

use crate::error::{AsmError, Span};
use crate::ir::*;
use crate::lexer;
use crate::linker::{CodeBuffer, Fixup, FixupKind};
use crate::mos6502::{opcode, CpuVariant, Mnemonic};
use crate::parser;
use crate::sourcemap::{Export, LineRecord, SourceMap};
use crate::symtab::{SymbolKind, SymbolTable};

/// Stop accumulating diagnostics after this many errors.
const MAX_ERRORS: usize = 64;

/// The result of a successful assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use]
pub struct Assembly {
    /// The load origin of the first emitted byte.
    pub origin: u16,
    /// The assembled machine code.
    pub code: Vec<u8>,
    /// Exported symbols and line/address records.
    pub source_map: SourceMap,
}

/// Builder-pattern assembler.
///
/// # Examples
///
/// ```rust
/// use asm6502::{Assembler, CpuVariant};
///
/// let mut asm = Assembler::new();
/// asm.variant(CpuVariant::Cmos).origin(0x0800);
/// let out = asm.assemble("start: LDA #$01\n RTS")?;
/// assert_eq!(out.origin, 0x0800);
/// assert_eq!(out.code, vec![0xA9, 0x01, 0x60]);
/// # Ok::<(), asm6502::AsmError>(())
/// ```
#[derive(Debug)]
pub struct Assembler {
    variant: CpuVariant,
    origin: u16,
    externals: Vec<(String, i32)>,
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

impl Assembler {
    /// Create an assembler with the default configuration: 65C02 variant,
    /// origin 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            variant: CpuVariant::default(),
            origin: 0,
            externals: Vec::new(),
        }
    }

    /// Select the CPU variant.  `.ARCH` directives in the source override
    /// this from that point on.
    pub fn variant(&mut self, variant: CpuVariant) -> &mut Self {
        self.variant = variant;
        self
    }

    /// Set the initial load origin.  A `.ORG` directive overrides this.
    pub fn origin(&mut self, origin: u16) -> &mut Self {
        self.origin = origin;
        self
    }

    /// Pre-define an external symbol at a known value.
    ///
    /// # Examples
    ///
    /// ```
    /// use asm6502::Assembler;
    ///
    /// let mut asm = Assembler::new();
    /// asm.define("chrout", 0xFFD2);
    /// let out = asm.assemble("JSR chrout")?;
    /// assert_eq!(out.code, vec![0x20, 0xD2, 0xFF]);
    /// # Ok::<(), asm6502::AsmError>(())
    /// ```
    pub fn define(&mut self, name: &str, value: i32) -> &mut Self {
        self.externals.push((String::from(name), value));
        self
    }

    /// Assemble a complete source text.
    ///
    /// # Errors
    ///
    /// Returns the single diagnostic when exactly one statement failed, or
    /// [`AsmError::Multiple`] carrying every diagnostic in source order.
    /// No artifact is produced if any error occurred.
    pub fn assemble(&self, source: &str) -> Result<Assembly, AsmError> {
        let tokens = lexer::tokenize(source)?;
        let (statements, parse_errors) = parser::parse_program(&tokens);
        debug!(
            "pass 1: {} statements, {} parse diagnostics",
            statements.len(),
            parse_errors.len()
        );

        let mut driver = Driver::new(self.variant, self.origin);
        for (name, value) in &self.externals {
            driver
                .symbols
                .define(name, SymbolKind::External, *value, Span::dummy())?;
        }
        driver.errors = parse_errors;
        driver.run(&statements)
    }

    /// Assemble from a byte stream, reading it to the end first.
    ///
    /// # Errors
    ///
    /// Returns [`AsmError::Io`] on a read failure or non-UTF-8 input, and
    /// assembly diagnostics as for [`Assembler::assemble`].
    #[cfg(feature = "std")]
    pub fn assemble_reader<R: std::io::Read>(&self, mut reader: R) -> Result<Assembly, AsmError> {
        let mut source = String::new();
        reader
            .read_to_string(&mut source)
            .map_err(|e| AsmError::Io { msg: e.to_string() })?;
        self.assemble(&source)
    }
}

/// Assemble a source string with the default configuration.
///
/// # Errors
///
/// Returns [`AsmError`] on any lexical, syntactic, or semantic failure.
///
/// # Examples
///
/// ```rust
/// use asm6502::assemble;
///
/// let out = assemble("LDA #$20").unwrap();
/// assert_eq!(out.code, vec![0xA9, 0x20]);
/// ```
pub fn assemble(source: &str) -> Result<Assembly, AsmError> {
    Assembler::new().assemble(source)
}

/// Assemble with an explicit load origin.
///
/// # Errors
///
/// Returns [`AsmError`] on any lexical, syntactic, or semantic failure.
///
/// # Examples
///
/// ```rust
/// use asm6502::assemble_at;
///
/// let out = assemble_at("here: JMP here", 0xC000).unwrap();
/// assert_eq!(out.code, vec![0x4C, 0x00, 0xC0]);
/// ```
pub fn assemble_at(source: &str, origin: u16) -> Result<Assembly, AsmError> {
    let mut asm = Assembler::new();
    asm.origin(origin);
    asm.assemble(source)
}

// ─── Two-pass driver ───────────────────────────────────────

/// How an instruction's operand bytes are produced, decided before any
/// byte is emitted so that a failing statement emits nothing.
enum OperandEnc {
    None,
    Bytes([u8; 2], u8),
    Placeholder { width: u8, kind: FixupKind, expr: Expr },
}

struct Driver {
    variant: CpuVariant,
    buffer: CodeBuffer,
    symbols: SymbolTable,
    fixups: Vec<Fixup>,
    exports: Vec<(String, Span)>,
    lines: Vec<LineRecord>,
    errors: Vec<AsmError>,
}

impl Driver {
    fn new(variant: CpuVariant, origin: u16) -> Self {
        let mut buffer = CodeBuffer::new();
        buffer.set_origin(origin);
        Self {
            variant,
            buffer,
            symbols: SymbolTable::new(),
            fixups: Vec::new(),
            exports: Vec::new(),
            lines: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn run(mut self, statements: &[Statement]) -> Result<Assembly, AsmError> {
        // ── pass 1 ─────────────────────────────────────────
        for stmt in statements {
            let offset_before = self.buffer.offset();
            let pc_before = self.buffer.pc();
            let emits = matches!(
                stmt,
                Statement::Instruction(_)
                    | Statement::Data { .. }
                    | Statement::HexData(..)
                    | Statement::TermString(..)
            );
            if let Err(e) = self.statement(stmt) {
                self.errors.push(e);
                if self.errors.len() >= MAX_ERRORS {
                    break;
                }
                continue;
            }
            if emits && self.buffer.offset() > offset_before {
                self.lines.push(LineRecord {
                    addr: pc_before as u16,
                    line: statement_span(stmt).line,
                });
            }
        }

        // ── pass 2 ─────────────────────────────────────────
        debug!(
            "pass 2: {} fixups, {} exports",
            self.fixups.len(),
            self.exports.len()
        );
        self.errors.extend(self.symbols.resolve_deferred());

        for fixup in &self.fixups {
            trace!(
                "fixup at offset {} (width {}) from {}",
                fixup.offset,
                fixup.width,
                fixup.span
            );
            if let Err(e) = fixup.apply(&mut self.buffer, &self.symbols) {
                self.errors.push(e);
                if self.errors.len() >= MAX_ERRORS {
                    break;
                }
            }
        }

        let mut exports = Vec::with_capacity(self.exports.len());
        for (name, span) in &self.exports {
            match self.symbols.resolved(name) {
                Some(v) => exports.push(Export {
                    label: name.clone(),
                    addr: v as u16,
                }),
                None => self.errors.push(AsmError::UnresolvedSymbol {
                    name: name.clone(),
                    span: *span,
                }),
            }
        }

        // Diagnostics surface in source order, regardless of which pass
        // produced them.
        self.errors
            .sort_by_key(|e| e.span().map_or((u32::MAX, u32::MAX), |s| (s.line, s.col)));

        if !self.errors.is_empty() {
            return Err(if self.errors.len() == 1 {
                self.errors.remove(0)
            } else {
                AsmError::Multiple {
                    errors: self.errors,
                }
            });
        }

        Ok(Assembly {
            origin: self.buffer.origin(),
            code: self.buffer.into_bytes(),
            source_map: SourceMap {
                exports,
                lines: self.lines,
            },
        })
    }

    fn statement(&mut self, stmt: &Statement) -> Result<(), AsmError> {
        match stmt {
            Statement::Label(name, span) => {
                let pc = self.buffer.pc() as i32;
                trace!("label {} = ${:04X}", name, pc);
                self.symbols.define(name, SymbolKind::Label, pc, *span)
            }
            Statement::Equate(def) => match self.eval(&def.value, def.span)? {
                Some(v) => self.symbols.define(&def.name, SymbolKind::Equate, v, def.span),
                None => self.symbols.define_deferred(&def.name, def.value.clone(), def.span),
            },
            Statement::Export(names) => {
                self.exports.extend(names.iter().cloned());
                Ok(())
            }
            Statement::Arch(variant, _) => {
                self.variant = *variant;
                Ok(())
            }
            Statement::Org(expr, span) => self.org(expr, *span),
            Statement::Align(expr, span) => self.align(expr, *span),
            Statement::Data {
                width,
                values,
                span,
            } => {
                for value in values {
                    self.data_value(*width, value, *span)?;
                }
                Ok(())
            }
            Statement::HexData(bytes, span) => self.buffer.extend(bytes, *span),
            Statement::TermString(values, span) => {
                for value in values {
                    self.term_string_value(value, *span)?;
                }
                Ok(())
            }
            Statement::Instruction(ins) => self.instruction(ins),
        }
    }

    // ── directives ─────────────────────────────────────────

    fn org(&mut self, expr: &Expr, span: Span) -> Result<(), AsmError> {
        let value = self.eval_required(expr, span)?;
        if !(0..=0xFFFF).contains(&value) {
            return Err(AsmError::OperandOutOfRange {
                width: 2,
                value,
                span,
            });
        }
        if !self.buffer.is_empty() {
            return Err(AsmError::Parse {
                msg: String::from("'.ORG' must precede all emission"),
                span,
            });
        }
        self.buffer.set_origin(value as u16);
        Ok(())
    }

    fn align(&mut self, expr: &Expr, span: Span) -> Result<(), AsmError> {
        let value = self.eval_required(expr, span)?;
        if value <= 0 || !(value as u32).is_power_of_two() {
            return Err(AsmError::Alignment { value, span });
        }
        self.buffer.align(value as u32, span)?;
        Ok(())
    }

    fn data_value(
        &mut self,
        width: DataWidth,
        value: &DataValue,
        span: Span,
    ) -> Result<(), AsmError> {
        let w = usize::from(width.bytes());
        match value {
            DataValue::Str(bytes) => {
                // Strings widen per character: each byte is padded to the
                // element width with zero high bytes.
                let mut elem = [0u8; 4];
                for &b in bytes {
                    elem[0] = b;
                    self.buffer.extend(&elem[..w], span)?;
                }
                Ok(())
            }
            DataValue::Expr(expr) => match self.eval(expr, span)? {
                Some(v) => {
                    let le = (v as u32).to_le_bytes();
                    self.buffer.extend(&le[..w], span)
                }
                None => {
                    let offset = self.buffer.offset();
                    self.buffer.extend(&[0u8; 4][..w], span)?;
                    self.fixups.push(Fixup {
                        offset,
                        width: width.bytes(),
                        kind: FixupKind::Data,
                        expr: expr.clone(),
                        span,
                    });
                    Ok(())
                }
            },
        }
    }

    fn term_string_value(&mut self, value: &DataValue, span: Span) -> Result<(), AsmError> {
        match value {
            DataValue::Str(bytes) => {
                // The final character of each string carries the terminator
                // bit: `.DS "AAA"` emits 41 41 C1.
                if let Some((&last, head)) = bytes.split_last() {
                    self.buffer.extend(head, span)?;
                    self.buffer.push(last | 0x80, span)?;
                }
                Ok(())
            }
            DataValue::Expr(expr) => match self.eval(expr, span)? {
                Some(v) => self.buffer.push((v & 0xFF) as u8, span),
                None => {
                    let offset = self.buffer.offset();
                    self.buffer.push(0, span)?;
                    self.fixups.push(Fixup {
                        offset,
                        width: 1,
                        kind: FixupKind::Data,
                        expr: expr.clone(),
                        span,
                    });
                    Ok(())
                }
            },
        }
    }

    // ── instructions ───────────────────────────────────────

    fn instruction(&mut self, ins: &Instruction) -> Result<(), AsmError> {
        let m = ins.mnemonic;
        let span = ins.span;
        if !m.available_on(self.variant) {
            return Err(AsmError::UnknownMnemonic {
                name: m.as_str().to_string(),
                span,
            });
        }

        let (op, enc) = match &ins.operand {
            Operand::None => {
                // Bare `ASL` is accumulator mode; everything else is implied.
                let op = self
                    .lookup(m, AddrMode::Implied)
                    .or_else(|| self.lookup(m, AddrMode::Accumulator))
                    .ok_or(AsmError::InvalidAddressingMode {
                        mnemonic: m,
                        mode: AddrMode::Implied,
                        span,
                    })?;
                (op, OperandEnc::None)
            }
            Operand::Accumulator => {
                let op = self.require(m, AddrMode::Accumulator, span)?;
                (op, OperandEnc::None)
            }
            Operand::Immediate(expr) => {
                let op = self.require(m, AddrMode::Immediate, span)?;
                (op, self.byte_operand(expr, span)?)
            }
            Operand::Indirect { expr, form } => {
                let mode = match form {
                    IndirectForm::XIndexed => AddrMode::IndexedIndirect,
                    IndirectForm::YIndexed => AddrMode::IndirectIndexed,
                    // A plain `(addr)` is the absolute indirect jump for
                    // JMP and the 65C02 zero-page indirect mode otherwise.
                    IndirectForm::Plain => {
                        if m == Mnemonic::Jmp {
                            AddrMode::Indirect
                        } else {
                            AddrMode::ZeroPageIndirect
                        }
                    }
                };
                let op = self.require(m, mode, span)?;
                let enc = if mode == AddrMode::Indirect {
                    self.word_operand(expr, span)?
                } else {
                    self.byte_operand(expr, span)?
                };
                (op, enc)
            }
            Operand::Address {
                expr,
                index,
                force_abs,
            } => self.address_operand(m, expr, *index, *force_abs, span)?,
        };

        self.emit(op, enc, span)
    }

    /// Addressing-mode selection for direct (non-indirect) address operands:
    /// relative for branches, zero page when the value is known to fit and
    /// no `A:`/`ABS:` override is present, absolute otherwise.
    fn address_operand(
        &mut self,
        m: Mnemonic,
        expr: &Expr,
        index: Option<IndexReg>,
        force_abs: bool,
        span: Span,
    ) -> Result<(u8, OperandEnc), AsmError> {
        if m.is_branch() {
            if index.is_some() {
                return Err(AsmError::InvalidAddressingMode {
                    mnemonic: m,
                    mode: AddrMode::Relative,
                    span,
                });
            }
            let op = self.require(m, AddrMode::Relative, span)?;
            // The displacement is measured from the end of the 2-byte branch.
            let pc_next = self.buffer.pc() + 2;
            let enc = match self.eval(expr, span)? {
                Some(target) => {
                    let delta = target.wrapping_sub(pc_next as i32);
                    if !(-128..=127).contains(&delta) {
                        return Err(AsmError::BranchOutOfRange { delta, span });
                    }
                    OperandEnc::Bytes([delta as u8, 0], 1)
                }
                None => OperandEnc::Placeholder {
                    width: 1,
                    kind: FixupKind::Relative {
                        pc_next: pc_next as u16,
                    },
                    expr: expr.clone(),
                },
            };
            return Ok((op, enc));
        }

        let (zp_mode, abs_mode) = match index {
            None => (AddrMode::ZeroPage, AddrMode::Absolute),
            Some(IndexReg::X) => (AddrMode::ZeroPageX, AddrMode::AbsoluteX),
            Some(IndexReg::Y) => (AddrMode::ZeroPageY, AddrMode::AbsoluteY),
        };
        let zp = self.lookup(m, zp_mode);
        let abs = self.lookup(m, abs_mode);
        if abs.is_none() && (force_abs || zp.is_none()) {
            return Err(AsmError::InvalidAddressingMode {
                mnemonic: m,
                mode: abs_mode,
                span,
            });
        }

        match self.eval(expr, span)? {
            Some(v) => {
                if !force_abs && (0..=255).contains(&v) {
                    if let Some(op) = zp {
                        return Ok((op, OperandEnc::Bytes([v as u8, 0], 1)));
                    }
                }
                match abs {
                    Some(op) => {
                        if !(0..=0xFFFF).contains(&v) {
                            return Err(AsmError::OperandOutOfRange {
                                width: 2,
                                value: v,
                                span,
                            });
                        }
                        let le = (v as u16).to_le_bytes();
                        Ok((op, OperandEnc::Bytes(le, 2)))
                    }
                    None => {
                        // Only a zero-page row exists (e.g. STX addr,Y) and
                        // the value does not fit in it.
                        Err(AsmError::OperandOutOfRange {
                            width: 1,
                            value: v,
                            span,
                        })
                    }
                }
            }
            None => {
                // Forward reference: size stability demands the wide form
                // whenever the mnemonic has one.
                match abs {
                    Some(op) => Ok((
                        op,
                        OperandEnc::Placeholder {
                            width: 2,
                            kind: FixupKind::Operand,
                            expr: expr.clone(),
                        },
                    )),
                    None => {
                        let op = zp.expect("zp or abs row checked above");
                        Ok((
                            op,
                            OperandEnc::Placeholder {
                                width: 1,
                                kind: FixupKind::Operand,
                                expr: expr.clone(),
                            },
                        ))
                    }
                }
            }
        }
    }

    /// One-byte operand: immediate or zero-page-class indirect.
    fn byte_operand(&mut self, expr: &Expr, span: Span) -> Result<OperandEnc, AsmError> {
        match self.eval(expr, span)? {
            Some(v) => {
                if !(-128..=255).contains(&v) {
                    return Err(AsmError::OperandOutOfRange {
                        width: 1,
                        value: v,
                        span,
                    });
                }
                Ok(OperandEnc::Bytes([(v & 0xFF) as u8, 0], 1))
            }
            None => Ok(OperandEnc::Placeholder {
                width: 1,
                kind: FixupKind::Operand,
                expr: expr.clone(),
            }),
        }
    }

    /// Two-byte operand: absolute indirect.
    fn word_operand(&mut self, expr: &Expr, span: Span) -> Result<OperandEnc, AsmError> {
        match self.eval(expr, span)? {
            Some(v) => {
                if !(0..=0xFFFF).contains(&v) {
                    return Err(AsmError::OperandOutOfRange {
                        width: 2,
                        value: v,
                        span,
                    });
                }
                Ok(OperandEnc::Bytes((v as u16).to_le_bytes(), 2))
            }
            None => Ok(OperandEnc::Placeholder {
                width: 2,
                kind: FixupKind::Operand,
                expr: expr.clone(),
            }),
        }
    }

    /// Emit an opcode and its operand encoding.  Nothing has been written
    /// before this point, so a statement that failed selection emits zero
    /// bytes.
    fn emit(&mut self, op: u8, enc: OperandEnc, span: Span) -> Result<(), AsmError> {
        self.buffer.push(op, span)?;
        match enc {
            OperandEnc::None => Ok(()),
            OperandEnc::Bytes(bytes, len) => self.buffer.extend(&bytes[..usize::from(len)], span),
            OperandEnc::Placeholder { width, kind, expr } => {
                let offset = self.buffer.offset();
                self.buffer.extend(&[0u8; 2][..usize::from(width)], span)?;
                self.fixups.push(Fixup {
                    offset,
                    width,
                    kind,
                    expr,
                    span,
                });
                Ok(())
            }
        }
    }

    // ── helpers ────────────────────────────────────────────

    #[inline]
    fn lookup(&self, m: Mnemonic, mode: AddrMode) -> Option<u8> {
        opcode(m, mode, self.variant)
    }

    fn require(&self, m: Mnemonic, mode: AddrMode, span: Span) -> Result<u8, AsmError> {
        self.lookup(m, mode)
            .ok_or(AsmError::InvalidAddressingMode {
                mnemonic: m,
                mode,
                span,
            })
    }

    /// Evaluate an expression against the pass-1 symbol table.
    /// `Ok(Some(v))` is a resolved value, `Ok(None)` a pending one.
    fn eval(&self, expr: &Expr, span: Span) -> Result<Option<i32>, AsmError> {
        match expr.eval(&|name| self.symbols.resolved(name)) {
            EvalOutcome::Value(v) => Ok(Some(v)),
            EvalOutcome::Pending(_) => Ok(None),
            EvalOutcome::DivideByZero => Err(AsmError::Parse {
                msg: String::from("division by zero in expression"),
                span,
            }),
        }
    }

    /// Evaluate an expression that may not contain forward references
    /// (`.ORG`, `.ALIGN`).
    fn eval_required(&self, expr: &Expr, span: Span) -> Result<i32, AsmError> {
        match expr.eval(&|name| self.symbols.resolved(name)) {
            EvalOutcome::Value(v) => Ok(v),
            EvalOutcome::Pending(missing) => Err(AsmError::UnresolvedSymbol {
                name: missing.into_iter().next().unwrap_or_default(),
                span,
            }),
            EvalOutcome::DivideByZero => Err(AsmError::Parse {
                msg: String::from("division by zero in expression"),
                span,
            }),
        }
    }
}

fn statement_span(stmt: &Statement) -> Span {
    match stmt {
        Statement::Label(_, span)
        | Statement::Org(_, span)
        | Statement::HexData(_, span)
        | Statement::TermString(_, span)
        | Statement::Align(_, span)
        | Statement::Arch(_, span)
        | Statement::Data { span, .. } => *span,
        Statement::Instruction(ins) => ins.span,
        Statement::Equate(def) => def.span,
        Statement::Export(names) => names.first().map_or_else(Span::dummy, |(_, s)| *s),
    }
}

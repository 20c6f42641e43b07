//! Intermediate representation: expressions, operands, and statements.
//!
//! The parser lowers token streams into `Statement` values; the two-pass
//! driver consumes them.  Expressions are owned trees so that a fixup can
//! carry its operand expression into pass 2 and re-evaluate it against the
//! completed symbol table.

use alloc::boxed::Box;
use alloc::string::String;
#[allow(unused_imports)]
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::error::Span;
use crate::mos6502::{CpuVariant, Mnemonic};

// ─── Expressions ───────────────────────────────────────────

/// A unary expression operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnaryOp {
    /// Arithmetic negation `-`.
    Neg,
    /// Bitwise complement `~`.
    BitNot,
    /// Low byte `<`: `value & 0xFF`.
    LowByte,
    /// High byte `>`: `(value >> 8) & 0xFF`.
    HighByte,
}

/// A binary expression operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinOp {
    /// Addition `+`.
    Add,
    /// Subtraction `-`.
    Sub,
    /// Multiplication `*`.
    Mul,
    /// Division `/`.
    Div,
    /// Modulo `%`.
    Rem,
    /// Left shift `<<`.
    Shl,
    /// Right shift `>>`.
    Shr,
    /// Bitwise AND `&`.
    And,
    /// Bitwise OR `|`.
    Or,
    /// Bitwise XOR `^`.
    Xor,
}

/// An operand expression tree.
///
/// All arithmetic is signed 32-bit with wrapping on overflow.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Expr {
    /// A numeric literal (integer or character byte).
    Num(i32),
    /// A symbol reference by name.
    Symbol(String),
    /// A unary operation.
    Unary(UnaryOp, Box<Expr>),
    /// A binary operation.
    Binary(BinOp, Box<Expr>, Box<Expr>),
}

/// Result of evaluating an [`Expr`] against a symbol lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalOutcome {
    /// Every referenced symbol resolved; the final wrapped i32 value.
    Value(i32),
    /// One or more referenced symbols are still undefined.
    Pending(Vec<String>),
    /// The expression divides or takes a modulo by zero.
    DivideByZero,
}

impl Expr {
    /// Evaluate the expression.
    ///
    /// `lookup` maps a symbol name to its resolved value, or `None` when the
    /// symbol is undefined (or not yet resolved).  Missing symbols are
    /// collected rather than aborting, so a caller can report every name a
    /// pending operand depends on.
    pub fn eval<F>(&self, lookup: &F) -> EvalOutcome
    where
        F: Fn(&str) -> Option<i32>,
    {
        let mut missing = Vec::new();
        let mut div_zero = false;
        let value = self.eval_inner(lookup, &mut missing, &mut div_zero);
        if div_zero {
            EvalOutcome::DivideByZero
        } else if missing.is_empty() {
            EvalOutcome::Value(value)
        } else {
            EvalOutcome::Pending(missing)
        }
    }

    fn eval_inner<F>(&self, lookup: &F, missing: &mut Vec<String>, div_zero: &mut bool) -> i32
    where
        F: Fn(&str) -> Option<i32>,
    {
        match self {
            Expr::Num(n) => *n,
            Expr::Symbol(name) => match lookup(name) {
                Some(v) => v,
                None => {
                    if !missing.iter().any(|m| m == name) {
                        missing.push(name.clone());
                    }
                    0
                }
            },
            Expr::Unary(op, child) => {
                let v = child.eval_inner(lookup, missing, div_zero);
                match op {
                    UnaryOp::Neg => v.wrapping_neg(),
                    UnaryOp::BitNot => !v,
                    UnaryOp::LowByte => v & 0xFF,
                    UnaryOp::HighByte => (v >> 8) & 0xFF,
                }
            }
            Expr::Binary(op, lhs, rhs) => {
                let l = lhs.eval_inner(lookup, missing, div_zero);
                let r = rhs.eval_inner(lookup, missing, div_zero);
                match op {
                    BinOp::Add => l.wrapping_add(r),
                    BinOp::Sub => l.wrapping_sub(r),
                    BinOp::Mul => l.wrapping_mul(r),
                    BinOp::Div => {
                        if r == 0 {
                            *div_zero = true;
                            0
                        } else {
                            l.wrapping_div(r)
                        }
                    }
                    BinOp::Rem => {
                        if r == 0 {
                            *div_zero = true;
                            0
                        } else {
                            l.wrapping_rem(r)
                        }
                    }
                    BinOp::Shl => l.wrapping_shl(r as u32),
                    BinOp::Shr => l.wrapping_shr(r as u32),
                    BinOp::And => l & r,
                    BinOp::Or => l | r,
                    BinOp::Xor => l ^ r,
                }
            }
        }
    }
}

// ─── Addressing modes ──────────────────────────────────────

/// A 6502 addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AddrMode {
    /// No operand: `NOP`.
    Implied,
    /// Operates on the accumulator: `ASL A` or bare `ASL`.
    Accumulator,
    /// One-byte immediate: `LDA #$20`.
    Immediate,
    /// One-byte address: `LDA $20`.
    ZeroPage,
    /// One-byte address indexed by X: `LDA $20,X`.
    ZeroPageX,
    /// One-byte address indexed by Y: `LDX $20,Y`.
    ZeroPageY,
    /// Two-byte address: `LDA $2000`.
    Absolute,
    /// Two-byte address indexed by X: `LDA $2000,X`.
    AbsoluteX,
    /// Two-byte address indexed by Y: `LDA $2000,Y`.
    AbsoluteY,
    /// Two-byte indirect address: `JMP ($2000)`.
    Indirect,
    /// Indexed indirect: `LDA ($20,X)`.
    IndexedIndirect,
    /// Indirect indexed: `LDA ($20),Y`.
    IndirectIndexed,
    /// One-byte signed PC-relative displacement (branches).
    Relative,
    /// Zero-page indirect: `LDA ($20)` — 65C02 only.
    ZeroPageIndirect,
}

impl AddrMode {
    /// Width of the operand in bytes (the instruction is one byte longer).
    #[must_use]
    pub fn operand_width(self) -> u8 {
        match self {
            AddrMode::Implied | AddrMode::Accumulator => 0,
            AddrMode::Immediate
            | AddrMode::ZeroPage
            | AddrMode::ZeroPageX
            | AddrMode::ZeroPageY
            | AddrMode::IndexedIndirect
            | AddrMode::IndirectIndexed
            | AddrMode::Relative
            | AddrMode::ZeroPageIndirect => 1,
            AddrMode::Absolute | AddrMode::AbsoluteX | AddrMode::AbsoluteY | AddrMode::Indirect => {
                2
            }
        }
    }
}

impl fmt::Display for AddrMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AddrMode::Implied => "implied",
            AddrMode::Accumulator => "accumulator",
            AddrMode::Immediate => "immediate",
            AddrMode::ZeroPage => "zero-page",
            AddrMode::ZeroPageX => "zero-page,X",
            AddrMode::ZeroPageY => "zero-page,Y",
            AddrMode::Absolute => "absolute",
            AddrMode::AbsoluteX => "absolute,X",
            AddrMode::AbsoluteY => "absolute,Y",
            AddrMode::Indirect => "indirect",
            AddrMode::IndexedIndirect => "indexed-indirect",
            AddrMode::IndirectIndexed => "indirect-indexed",
            AddrMode::Relative => "relative",
            AddrMode::ZeroPageIndirect => "zero-page-indirect",
        };
        f.write_str(name)
    }
}

// ─── Operands and statements ───────────────────────────────

/// An index register suffix (`,X` or `,Y`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IndexReg {
    /// The X register.
    X,
    /// The Y register.
    Y,
}

/// Shape of a parenthesized (indirect) operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IndirectForm {
    /// `(expr)` — absolute indirect for JMP, zero-page indirect otherwise.
    Plain,
    /// `(expr,X)`.
    XIndexed,
    /// `(expr),Y`.
    YIndexed,
}

/// A parsed instruction operand — the provisional syntax category before
/// addressing-mode selection and zero-page size minimization.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// No operand text.
    None,
    /// Explicit accumulator: `ASL A`.
    Accumulator,
    /// Immediate: `#expr`.
    Immediate(Expr),
    /// Direct address, optionally indexed, optionally forced wide
    /// by an `A:`/`ABS:` prefix.
    Address {
        /// The address expression.
        expr: Expr,
        /// Optional `,X` / `,Y` suffix.
        index: Option<IndexReg>,
        /// `true` when an `A:`/`ABS:` width override was written.
        force_abs: bool,
    },
    /// Parenthesized (indirect) operand.
    Indirect {
        /// The address expression.
        expr: Expr,
        /// Which indirect form was written.
        form: IndirectForm,
    },
}

/// A single parsed instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// The instruction mnemonic.
    pub mnemonic: Mnemonic,
    /// The parsed operand.
    pub operand: Operand,
    /// Source location of the mnemonic.
    pub span: Span,
}

/// Element width of a data directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataWidth {
    /// `.DB` — one byte per value.
    Byte,
    /// `.DW` — two bytes, little-endian.
    Word,
    /// `.DD` — four bytes, little-endian.
    Dword,
}

impl DataWidth {
    /// Number of bytes each value occupies.
    #[must_use]
    pub fn bytes(self) -> u8 {
        match self {
            DataWidth::Byte => 1,
            DataWidth::Word => 2,
            DataWidth::Dword => 4,
        }
    }
}

/// One argument of a data directive.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    /// A string literal's raw bytes.
    Str(Vec<u8>),
    /// An expression.
    Expr(Expr),
}

/// A `name .EQ expr` / `name = expr` equate.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstDef {
    /// The equate name.
    pub name: String,
    /// The value expression (may reference forward symbols).
    pub value: Expr,
    /// Source location of the name.
    pub span: Span,
}

/// One parsed statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `name:` label definition.
    Label(String, Span),
    /// A machine instruction.
    Instruction(Instruction),
    /// `.ORG expr`.
    Org(Expr, Span),
    /// `.DB` / `.DW` / `.DD`.
    Data {
        /// Element width.
        width: DataWidth,
        /// The values, in source order.
        values: Vec<DataValue>,
        /// Source location of the directive.
        span: Span,
    },
    /// `.DH hexstring` — pre-decoded payload bytes.
    HexData(Vec<u8>, Span),
    /// `.DS` — high-bit-terminated string data.
    TermString(Vec<DataValue>, Span),
    /// `.ALIGN expr`.
    Align(Expr, Span),
    /// `name .EQ expr` / `name = expr`.
    Equate(ConstDef),
    /// `.EX name, ...` — names with their individual spans.
    Export(Vec<(String, Span)>),
    /// `.ARCH 6502|65C02`.
    Arch(CpuVariant, Span),
}

//! Emission buffer and pass-2 fixup patching.
//!
//! Pass 1 appends bytes to a [`CodeBuffer`], emitting zero placeholders for
//! operands that depend on undefined symbols and recording a [`Fixup`] for
//! each.  Pass 2 re-evaluates every fixup expression against the completed
//! symbol table and patches the placeholder bytes in place.
//!
//! Fixups never change an instruction's size — forward references always
//! received the absolute encoding in pass 1 — so patching is a pure byte
//! overwrite.

#[allow(unused_imports)]
use alloc::format;
use alloc::string::String;
#[allow(unused_imports)]
use alloc::vec;
use alloc::vec::Vec;

use crate::error::{AsmError, Span};
use crate::ir::{EvalOutcome, Expr};
use crate::symtab::SymbolTable;

/// Top of the 6502 address space, exclusive.
const ADDR_SPACE_END: u32 = 0x1_0000;

// ─── CodeBuffer ────────────────────────────────────────────

/// The growing machine-code buffer.
///
/// Invariant: the program counter always equals `origin + bytes.len()`;
/// the byte at buffer offset `i` was emitted for address `origin + i`.
#[derive(Debug, Default)]
pub struct CodeBuffer {
    origin: u16,
    bytes: Vec<u8>,
}

impl CodeBuffer {
    /// Create an empty buffer with origin 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The load origin.
    #[must_use]
    pub fn origin(&self) -> u16 {
        self.origin
    }

    /// Set the load origin.  The driver only permits this before any byte
    /// has been emitted.
    pub fn set_origin(&mut self, origin: u16) {
        debug_assert!(self.bytes.is_empty());
        self.origin = origin;
    }

    /// The current program counter.
    #[must_use]
    pub fn pc(&self) -> u32 {
        u32::from(self.origin) + self.bytes.len() as u32
    }

    /// Current byte offset into the buffer (where the next byte lands).
    #[must_use]
    pub fn offset(&self) -> usize {
        self.bytes.len()
    }

    /// Whether anything has been emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Borrow the emitted bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the buffer, returning the emitted bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Append one byte.
    ///
    /// # Errors
    ///
    /// Returns [`AsmError::SegmentOverflow`] when the byte would land past
    /// the top of the 64 KiB address space.
    pub fn push(&mut self, byte: u8, span: Span) -> Result<(), AsmError> {
        if self.pc() >= ADDR_SPACE_END {
            return Err(AsmError::SegmentOverflow { pc: self.pc(), span });
        }
        self.bytes.push(byte);
        Ok(())
    }

    /// Append a slice of bytes.
    ///
    /// # Errors
    ///
    /// Returns [`AsmError::SegmentOverflow`] when any byte would land past
    /// the top of the 64 KiB address space.
    pub fn extend(&mut self, bytes: &[u8], span: Span) -> Result<(), AsmError> {
        if self.pc() + bytes.len() as u32 > ADDR_SPACE_END {
            return Err(AsmError::SegmentOverflow {
                pc: self.pc() + bytes.len() as u32,
                span,
            });
        }
        self.bytes.extend_from_slice(bytes);
        Ok(())
    }

    /// Emit zero bytes until the program counter is a multiple of `n`.
    /// Returns the number of fill bytes emitted.
    ///
    /// # Errors
    ///
    /// Returns [`AsmError::SegmentOverflow`] when padding would run past the
    /// top of the address space.
    pub fn align(&mut self, n: u32, span: Span) -> Result<usize, AsmError> {
        debug_assert!(n.is_power_of_two());
        let padding = (n - self.pc() % n) % n;
        for _ in 0..padding {
            self.push(0, span)?;
        }
        Ok(padding as usize)
    }

    /// Overwrite bytes at `offset` — used by pass-2 fixup patching.
    pub fn patch(&mut self, offset: usize, bytes: &[u8]) {
        self.bytes[offset..offset + bytes.len()].copy_from_slice(bytes);
    }
}

// ─── Fixups ────────────────────────────────────────────────

/// How a fixup's resolved value is written back.
#[derive(Debug, Clone, PartialEq)]
pub enum FixupKind {
    /// Instruction operand — range-checked against the operand width.
    Operand,
    /// Data directive value — silently truncated to the operand width.
    Data,
    /// Relative branch displacement from the address after the branch.
    Relative {
        /// PC of the instruction following the branch.
        pc_next: u16,
    },
}

/// A placeholder recorded during pass 1, patched during pass 2.
///
/// Each fixup owns its operand expression outright; symbols are referenced
/// by name and looked up at patch time.
#[derive(Debug, Clone)]
pub struct Fixup {
    /// Byte offset of the placeholder within the emission buffer.
    pub offset: usize,
    /// Placeholder width in bytes: 1, 2, or 4.
    pub width: u8,
    /// Patch semantics.
    pub kind: FixupKind,
    /// The operand expression to re-evaluate.
    pub expr: Expr,
    /// Source location of the operand, for diagnostics.
    pub span: Span,
}

impl Fixup {
    /// Re-evaluate the expression against the completed symbol table and
    /// patch the placeholder bytes.
    ///
    /// # Errors
    ///
    /// Returns [`AsmError::UnresolvedSymbol`] if the expression still
    /// references an undefined symbol, [`AsmError::OperandOutOfRange`] /
    /// [`AsmError::BranchOutOfRange`] when the resolved value does not fit.
    pub fn apply(&self, buffer: &mut CodeBuffer, symbols: &SymbolTable) -> Result<(), AsmError> {
        let value = match self.expr.eval(&|name| symbols.resolved(name)) {
            EvalOutcome::Value(v) => v,
            EvalOutcome::Pending(missing) => {
                return Err(AsmError::UnresolvedSymbol {
                    name: missing.into_iter().next().unwrap_or_default(),
                    span: self.span,
                });
            }
            EvalOutcome::DivideByZero => {
                return Err(AsmError::Parse {
                    msg: String::from("division by zero in operand expression"),
                    span: self.span,
                });
            }
        };

        match &self.kind {
            FixupKind::Relative { pc_next } => {
                let delta = value.wrapping_sub(i32::from(*pc_next));
                if !(-128..=127).contains(&delta) {
                    return Err(AsmError::BranchOutOfRange {
                        delta,
                        span: self.span,
                    });
                }
                buffer.patch(self.offset, &[delta as u8]);
            }
            FixupKind::Operand => {
                let ok = match self.width {
                    1 => (-128..=255).contains(&value),
                    _ => (-32768..=65535).contains(&value),
                };
                if !ok {
                    return Err(AsmError::OperandOutOfRange {
                        width: self.width,
                        value,
                        span: self.span,
                    });
                }
                self.write_le(buffer, value);
            }
            FixupKind::Data => self.write_le(buffer, value),
        }
        Ok(())
    }

    fn write_le(&self, buffer: &mut CodeBuffer, value: i32) {
        let le = (value as u32).to_le_bytes();
        buffer.patch(self.offset, &le[..self.width as usize]);
    }
}

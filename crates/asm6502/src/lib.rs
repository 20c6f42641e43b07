//! # asm6502 — Pure Rust MOS 6502 / WDC 65C02 Assembler
//!
//! `asm6502` is a pure Rust, two-pass assembler that turns 6502 assembly
//! text into machine-code bytes plus a source map of exported symbols.
//!
//! ## Quick Start
//!
//! ```rust
//! use asm6502::assemble;
//!
//! let out = assemble("LDA #$20").unwrap();
//! assert_eq!(out.code, vec![0xA9, 0x20]);
//! ```
//!
//! ## Features
//!
//! - **Pure Rust** — no C dependencies, `no_std` + `alloc` compatible.
//! - **Two-pass** — forward references resolve via pass-2 fixups; the
//!   instruction stream never changes size between passes.
//! - **Zero-page minimization** — operands with known small values pick
//!   the short encoding automatically; `A:`/`ABS:` prefixes force the
//!   wide form.
//! - **Full expression language** — `+ - * / % << >> & | ^ ~` with
//!   low/high-byte operators `<` and `>`, character literals, and symbols.
//! - **NMOS and CMOS** — the 65C02 extension set is selectable per source
//!   (`.ARCH`) or per assembler instance.
//! - **Span diagnostics** — every error carries a line:column location,
//!   and a bad statement does not hide diagnostics further down the file.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
// ── Pedantic lint policy ─────────────────────────────────────────────────
// An assembler intentionally performs many narrowing / sign-changing casts
// between integer widths (i32→u8, u16→i32, etc.) and uses dense hex
// literals without separators (0xFFD2, 0xABCD).  The lints below are
// expected and acceptable in this context.
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_lossless,
    clippy::cast_possible_wrap,
    clippy::unreadable_literal,
    clippy::match_same_arms,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::uninlined_format_args,
    clippy::missing_errors_doc,
    clippy::too_many_lines,
    clippy::single_match_else,
    clippy::return_self_not_must_use,
    clippy::doc_markdown
)]

extern crate alloc;

/// Public assembler API — builder pattern, one-shot assembly, and the
/// two-pass driver.
pub mod assembler;
/// Error types and source-span diagnostics.
pub mod error;
/// Binary program image format (`"56og"` signature + origin header).
pub mod image;
/// Intermediate representation: expressions, operands, statements.
pub mod ir;
/// Lexer (tokenizer) with span tracking.
pub mod lexer;
/// Emission buffer and pass-2 fixup patching.
pub mod linker;
/// Instruction set tables for the 6502 family.
pub mod mos6502;
/// Statement and expression parser.
pub mod parser;
/// Source map: exports and line/address records.
pub mod sourcemap;
/// Symbol table with deferred equate resolution.
pub mod symtab;

// Re-exports
pub use assembler::{assemble, assemble_at, Assembler, Assembly};
pub use error::{AsmError, Span};
pub use image::{decode as decode_image, encode as encode_image, Image, SIGNATURE};
pub use ir::{
    AddrMode, BinOp, DataValue, DataWidth, EvalOutcome, Expr, IndexReg, IndirectForm, Operand,
    Statement, UnaryOp,
};
pub use mos6502::{opcode, CpuVariant, Mnemonic, OPCODES};
pub use sourcemap::{Export, LineRecord, SourceMap};
pub use symtab::{SymbolKind, SymbolTable};

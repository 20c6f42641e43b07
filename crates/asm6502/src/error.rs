//! Error types and source span tracking for diagnostics.

#[allow(unused_imports)]
use alloc::format;
use alloc::string::String;
#[allow(unused_imports)]
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::ir::AddrMode;
use crate::mos6502::Mnemonic;

/// Source location for diagnostics.
///
/// Tracks the line, column, byte offset, and length of a token or construct
/// in the original assembly source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number (byte offset within line).
    pub col: u32,
    /// 0-based byte offset from start of source.
    pub offset: usize,
    /// Byte length of the spanned region.
    pub len: usize,
}

impl Span {
    /// Create a new span.
    #[must_use]
    pub fn new(line: u32, col: u32, offset: usize, len: usize) -> Self {
        Self {
            line,
            col,
            offset,
            len,
        }
    }

    /// A dummy span for generated/internal constructs.
    #[must_use]
    pub fn dummy() -> Self {
        Self {
            line: 0,
            col: 0,
            offset: 0,
            len: 0,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Assembly error with source location and descriptive message.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AsmError {
    /// Malformed token: bad digit, unterminated literal, stray character.
    Lex {
        /// Description of the lexical problem.
        msg: String,
        /// Source location of the offending text.
        span: Span,
    },

    /// Unexpected token during statement or expression parsing.
    Parse {
        /// Description of what was expected and what was found.
        msg: String,
        /// Source location of the unexpected token.
        span: Span,
    },

    /// The identifier in instruction position is not a 6502 mnemonic,
    /// or the mnemonic does not exist on the selected CPU variant.
    UnknownMnemonic {
        /// The unrecognized name.
        name: String,
        /// Source location of the name.
        span: Span,
    },

    /// The mnemonic exists but does not support the requested addressing mode.
    InvalidAddressingMode {
        /// The instruction mnemonic.
        mnemonic: Mnemonic,
        /// The addressing mode that was requested.
        mode: AddrMode,
        /// Source location of the instruction.
        span: Span,
    },

    /// Operand value does not fit the operand width.
    OperandOutOfRange {
        /// Operand width in bytes (1 or 2).
        width: u8,
        /// The offending value.
        value: i32,
        /// Source location of the operand.
        span: Span,
    },

    /// Branch displacement does not fit in a signed byte.
    BranchOutOfRange {
        /// The actual displacement to the target.
        delta: i32,
        /// Source location of the branch instruction.
        span: Span,
    },

    /// Symbol was defined more than once.
    DuplicateSymbol {
        /// The duplicated symbol name.
        name: String,
        /// Source location of the duplicate definition.
        span: Span,
        /// Source location of the first definition.
        first_span: Span,
    },

    /// Referenced symbol was never defined.
    UnresolvedSymbol {
        /// The undefined symbol name.
        name: String,
        /// Source location of the reference.
        span: Span,
    },

    /// `.ALIGN` argument is not a positive power of two.
    Alignment {
        /// The rejected alignment value.
        value: i32,
        /// Source location of the directive.
        span: Span,
    },

    /// Emission ran past the top of the 64 KiB address space.
    SegmentOverflow {
        /// The program counter that overflowed.
        pc: u32,
        /// Source location of the statement that overflowed.
        span: Span,
    },

    /// Failure reading the input stream.
    Io {
        /// The underlying I/O error message.
        msg: String,
    },

    /// Multiple errors collected during assembly, in source order.
    Multiple {
        /// The collected assembly errors.
        errors: Vec<AsmError>,
    },
}

impl AsmError {
    /// The source location the error points at, when it has one.
    #[must_use]
    pub fn span(&self) -> Option<Span> {
        match self {
            AsmError::Lex { span, .. }
            | AsmError::Parse { span, .. }
            | AsmError::UnknownMnemonic { span, .. }
            | AsmError::InvalidAddressingMode { span, .. }
            | AsmError::OperandOutOfRange { span, .. }
            | AsmError::BranchOutOfRange { span, .. }
            | AsmError::DuplicateSymbol { span, .. }
            | AsmError::UnresolvedSymbol { span, .. }
            | AsmError::Alignment { span, .. }
            | AsmError::SegmentOverflow { span, .. } => Some(*span),
            AsmError::Io { .. } | AsmError::Multiple { .. } => None,
        }
    }

    /// Render the error prefixed with a file name, in the conventional
    /// `filename:line:col: message` shape used by command-line drivers.
    #[must_use]
    pub fn render(&self, filename: &str) -> String {
        match self {
            AsmError::Multiple { errors } => {
                let mut out = String::new();
                for (i, e) in errors.iter().enumerate() {
                    if i > 0 {
                        out.push('\n');
                    }
                    out.push_str(&e.render(filename));
                }
                out
            }
            AsmError::Io { .. } => format!("{}: {}", filename, self),
            _ => format!("{}:{}", filename, self),
        }
    }
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsmError::Lex { msg, span } => write!(f, "{}: {}", span, msg),
            AsmError::Parse { msg, span } => write!(f, "{}: {}", span, msg),
            AsmError::UnknownMnemonic { name, span } => {
                write!(f, "{}: unknown mnemonic '{}'", span, name)
            }
            AsmError::InvalidAddressingMode {
                mnemonic,
                mode,
                span,
            } => {
                write!(
                    f,
                    "{}: {} does not support {} addressing",
                    span, mnemonic, mode
                )
            }
            AsmError::OperandOutOfRange { width, value, span } => {
                write!(
                    f,
                    "{}: operand value {} does not fit in {} byte(s)",
                    span, value, width
                )
            }
            AsmError::BranchOutOfRange { delta, span } => {
                write!(
                    f,
                    "{}: branch displacement {} out of range (max ±127)",
                    span, delta
                )
            }
            AsmError::DuplicateSymbol {
                name,
                span,
                first_span,
            } => {
                write!(
                    f,
                    "{}: duplicate symbol '{}' (first defined at {})",
                    span, name, first_span
                )
            }
            AsmError::UnresolvedSymbol { name, span } => {
                write!(f, "{}: unresolved symbol '{}'", span, name)
            }
            AsmError::Alignment { value, span } => {
                write!(
                    f,
                    "{}: alignment must be a positive power of two, got {}",
                    span, value
                )
            }
            AsmError::SegmentOverflow { pc, span } => {
                write!(
                    f,
                    "{}: emission at ${:05X} exceeds the 64 KiB address space",
                    span, pc
                )
            }
            AsmError::Io { msg } => write!(f, "i/o error: {}", msg),
            AsmError::Multiple { errors } => {
                for (i, e) in errors.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}", e)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AsmError {}

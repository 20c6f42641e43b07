//! Source map: exported symbols and line/address records.
//!
//! The source map travels alongside the assembled code so that a debugger
//! or loader can resolve exported names to addresses and map addresses back
//! to source lines.  The textual serialization is stable across identical
//! inputs and round-trips exactly.

use alloc::string::String;
#[allow(unused_imports)]
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Write as _;

use crate::error::{AsmError, Span};

/// An exported symbol and its final address.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Export {
    /// The exported symbol name.
    pub label: String,
    /// The symbol's resolved address.
    pub addr: u16,
}

/// One address → source line association.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineRecord {
    /// Address of the first byte the line emitted.
    pub addr: u16,
    /// 1-based source line number.
    pub line: u32,
}

/// The post-assembly source map.
///
/// Exports appear in declaration order; line records in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceMap {
    /// Exported symbols, in `.EX` declaration order.
    pub exports: Vec<Export>,
    /// Address/line associations, in emission order.
    pub lines: Vec<LineRecord>,
}

impl SourceMap {
    /// Serialize to the textual `.map` format:
    ///
    /// ```text
    /// [exports]
    /// MAIN 0800
    /// [lines]
    /// 0800 2
    /// ```
    ///
    /// Addresses are four uppercase hex digits; line numbers are decimal.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str("[exports]\n");
        for e in &self.exports {
            let _ = writeln!(out, "{} {:04X}", e.label, e.addr);
        }
        out.push_str("[lines]\n");
        for l in &self.lines {
            let _ = writeln!(out, "{:04X} {}", l.addr, l.line);
        }
        out
    }

    /// Parse the textual `.map` format produced by [`SourceMap::to_text`].
    ///
    /// # Errors
    ///
    /// Returns `AsmError::Parse` on an unknown section header or a
    /// malformed record line.
    pub fn from_text(text: &str) -> Result<SourceMap, AsmError> {
        #[derive(PartialEq)]
        enum Section {
            None,
            Exports,
            Lines,
        }

        let mut map = SourceMap::default();
        let mut section = Section::None;

        for (i, raw) in text.lines().enumerate() {
            let line_no = i as u32 + 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            match line {
                "[exports]" => {
                    section = Section::Exports;
                    continue;
                }
                "[lines]" => {
                    section = Section::Lines;
                    continue;
                }
                _ => {}
            }
            if line.starts_with('[') {
                return Err(AsmError::Parse {
                    msg: alloc::format!("unknown source map section '{}'", line),
                    span: Span::new(line_no, 1, 0, line.len()),
                });
            }

            let mut fields = line.split_whitespace();
            let (a, b) = match (fields.next(), fields.next(), fields.next()) {
                (Some(a), Some(b), None) => (a, b),
                _ => {
                    return Err(AsmError::Parse {
                        msg: alloc::format!("malformed source map record '{}'", line),
                        span: Span::new(line_no, 1, 0, line.len()),
                    });
                }
            };

            match section {
                Section::Exports => {
                    let addr = u16::from_str_radix(b, 16).map_err(|_| AsmError::Parse {
                        msg: alloc::format!("bad address '{}' in source map", b),
                        span: Span::new(line_no, 1, 0, line.len()),
                    })?;
                    map.exports.push(Export {
                        label: String::from(a),
                        addr,
                    });
                }
                Section::Lines => {
                    let addr = u16::from_str_radix(a, 16).map_err(|_| AsmError::Parse {
                        msg: alloc::format!("bad address '{}' in source map", a),
                        span: Span::new(line_no, 1, 0, line.len()),
                    })?;
                    let line_num = b.parse::<u32>().map_err(|_| AsmError::Parse {
                        msg: alloc::format!("bad line number '{}' in source map", b),
                        span: Span::new(line_no, 1, 0, line.len()),
                    })?;
                    map.lines.push(LineRecord {
                        addr,
                        line: line_num,
                    });
                }
                Section::None => {
                    return Err(AsmError::Parse {
                        msg: String::from("source map record outside any section"),
                        span: Span::new(line_no, 1, 0, line.len()),
                    });
                }
            }
        }

        Ok(map)
    }
}

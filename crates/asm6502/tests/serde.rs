//! Serde round-trip tests for `asm6502` public types.
//!
//! Validates that the feature-gated serde derives serialize to JSON and
//! deserialize back to identical values.

#![cfg(feature = "serde")]

use asm6502::{
    assemble_at, AddrMode, AsmError, CpuVariant, Export, Expr, Image, LineRecord, Mnemonic,
    SourceMap, Span,
};

/// Helper: serialize to JSON, deserialize back, assert equality.
fn round_trip<T>(val: &T)
where
    T: serde::Serialize + serde::de::DeserializeOwned + PartialEq + core::fmt::Debug,
{
    let json = serde_json::to_string(val).expect("serialize");
    let back: T = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(val, &back, "round-trip mismatch for JSON: {json}");
}

// ─── Span ───────────────────────────────────────────────────────────────────

#[test]
fn serde_span() {
    round_trip(&Span::new(1, 5, 10, 3));
    round_trip(&Span::default());
}

// ─── CpuVariant / AddrMode / Mnemonic ───────────────────────────────────────

#[test]
fn serde_cpu_variant() {
    round_trip(&CpuVariant::Nmos);
    round_trip(&CpuVariant::Cmos);
}

#[test]
fn serde_addr_mode_samples() {
    for mode in [
        AddrMode::Implied,
        AddrMode::Accumulator,
        AddrMode::Immediate,
        AddrMode::ZeroPage,
        AddrMode::Absolute,
        AddrMode::Indirect,
        AddrMode::IndexedIndirect,
        AddrMode::IndirectIndexed,
        AddrMode::Relative,
        AddrMode::ZeroPageIndirect,
    ] {
        round_trip(&mode);
    }
}

#[test]
fn serde_mnemonic_samples() {
    for m in [
        Mnemonic::Lda,
        Mnemonic::Jmp,
        Mnemonic::Bne,
        Mnemonic::Stz,
        Mnemonic::Bra,
    ] {
        round_trip(&m);
    }
}

// ─── Expr ───────────────────────────────────────────────────────────────────

#[test]
fn serde_expr() {
    use asm6502::{BinOp, UnaryOp};
    round_trip(&Expr::Num(42));
    round_trip(&Expr::Symbol("label".into()));
    round_trip(&Expr::Unary(
        UnaryOp::HighByte,
        Box::new(Expr::Symbol("addr".into())),
    ));
    round_trip(&Expr::Binary(
        BinOp::Add,
        Box::new(Expr::Num(1)),
        Box::new(Expr::Num(2)),
    ));
}

// ─── Errors ─────────────────────────────────────────────────────────────────

#[test]
fn serde_errors() {
    round_trip(&AsmError::UnknownMnemonic {
        name: "FOO".into(),
        span: Span::new(1, 2, 1, 3),
    });
    round_trip(&AsmError::InvalidAddressingMode {
        mnemonic: Mnemonic::Jsr,
        mode: AddrMode::Immediate,
        span: Span::new(2, 2, 5, 3),
    });
    round_trip(&AsmError::BranchOutOfRange {
        delta: 300,
        span: Span::new(3, 1, 10, 3),
    });
    round_trip(&AsmError::Multiple {
        errors: vec![AsmError::UnresolvedSymbol {
            name: "ghost".into(),
            span: Span::new(4, 6, 20, 5),
        }],
    });
}

// ─── Source map / Assembly / Image ──────────────────────────────────────────

#[test]
fn serde_source_map() {
    round_trip(&SourceMap {
        exports: vec![Export {
            label: "MAIN".into(),
            addr: 0x0800,
        }],
        lines: vec![LineRecord {
            addr: 0x0800,
            line: 2,
        }],
    });
}

#[test]
fn serde_assembly() {
    let out = assemble_at(".EX main\nmain: LDA #$01\nRTS", 0x0800).unwrap();
    round_trip(&out);
}

#[test]
fn serde_image() {
    round_trip(&Image::Program {
        origin: 0x0800,
        code: vec![0xA9, 0x01, 0x60],
    });
    round_trip(&Image::Raw(vec![0xEA]));
}

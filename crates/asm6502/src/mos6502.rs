//! 6502 instruction set: mnemonics, CPU variants, and the opcode table.
//!
//! The table is a single static slice of `(mnemonic, mode, opcode, variant)`
//! rows covering every documented NMOS 6502 instruction plus the 65C02
//! extensions.  Lookup is by `(mnemonic, mode)` with the active CPU variant
//! filtering out extension rows.

use core::fmt;

use crate::ir::AddrMode;

/// CPU variant selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CpuVariant {
    /// The original NMOS 6502.
    Nmos,
    /// The CMOS 65C02 — adds mnemonics and addressing modes.
    #[default]
    Cmos,
}

impl fmt::Display for CpuVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CpuVariant::Nmos => f.write_str("6502"),
            CpuVariant::Cmos => f.write_str("65C02"),
        }
    }
}

/// An instruction mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)] // the variants are the 6502 mnemonics themselves
pub enum Mnemonic {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Clc,
    Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Jmp,
    Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp, Rol, Ror, Rti,
    Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya,
    // 65C02 extensions
    Bra, Phx, Phy, Plx, Ply, Stz, Trb, Tsb,
}

impl Mnemonic {
    /// Parse a mnemonic name, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Mnemonic> {
        if name.len() != 3 {
            return None;
        }
        let mut buf = [0u8; 3];
        buf.copy_from_slice(name.as_bytes());
        buf.make_ascii_uppercase();
        use Mnemonic::*;
        Some(match &buf {
            b"ADC" => Adc, b"AND" => And, b"ASL" => Asl, b"BCC" => Bcc,
            b"BCS" => Bcs, b"BEQ" => Beq, b"BIT" => Bit, b"BMI" => Bmi,
            b"BNE" => Bne, b"BPL" => Bpl, b"BRK" => Brk, b"BVC" => Bvc,
            b"BVS" => Bvs, b"CLC" => Clc, b"CLD" => Cld, b"CLI" => Cli,
            b"CLV" => Clv, b"CMP" => Cmp, b"CPX" => Cpx, b"CPY" => Cpy,
            b"DEC" => Dec, b"DEX" => Dex, b"DEY" => Dey, b"EOR" => Eor,
            b"INC" => Inc, b"INX" => Inx, b"INY" => Iny, b"JMP" => Jmp,
            b"JSR" => Jsr, b"LDA" => Lda, b"LDX" => Ldx, b"LDY" => Ldy,
            b"LSR" => Lsr, b"NOP" => Nop, b"ORA" => Ora, b"PHA" => Pha,
            b"PHP" => Php, b"PLA" => Pla, b"PLP" => Plp, b"ROL" => Rol,
            b"ROR" => Ror, b"RTI" => Rti, b"RTS" => Rts, b"SBC" => Sbc,
            b"SEC" => Sec, b"SED" => Sed, b"SEI" => Sei, b"STA" => Sta,
            b"STX" => Stx, b"STY" => Sty, b"TAX" => Tax, b"TAY" => Tay,
            b"TSX" => Tsx, b"TXA" => Txa, b"TXS" => Txs, b"TYA" => Tya,
            b"BRA" => Bra, b"PHX" => Phx, b"PHY" => Phy, b"PLX" => Plx,
            b"PLY" => Ply, b"STZ" => Stz, b"TRB" => Trb, b"TSB" => Tsb,
            _ => return None,
        })
    }

    /// The canonical upper-case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        use Mnemonic::*;
        match self {
            Adc => "ADC", And => "AND", Asl => "ASL", Bcc => "BCC",
            Bcs => "BCS", Beq => "BEQ", Bit => "BIT", Bmi => "BMI",
            Bne => "BNE", Bpl => "BPL", Brk => "BRK", Bvc => "BVC",
            Bvs => "BVS", Clc => "CLC", Cld => "CLD", Cli => "CLI",
            Clv => "CLV", Cmp => "CMP", Cpx => "CPX", Cpy => "CPY",
            Dec => "DEC", Dex => "DEX", Dey => "DEY", Eor => "EOR",
            Inc => "INC", Inx => "INX", Iny => "INY", Jmp => "JMP",
            Jsr => "JSR", Lda => "LDA", Ldx => "LDX", Ldy => "LDY",
            Lsr => "LSR", Nop => "NOP", Ora => "ORA", Pha => "PHA",
            Php => "PHP", Pla => "PLA", Plp => "PLP", Rol => "ROL",
            Ror => "ROR", Rti => "RTI", Rts => "RTS", Sbc => "SBC",
            Sec => "SEC", Sed => "SED", Sei => "SEI", Sta => "STA",
            Stx => "STX", Sty => "STY", Tax => "TAX", Tay => "TAY",
            Tsx => "TSX", Txa => "TXA", Txs => "TXS", Tya => "TYA",
            Bra => "BRA", Phx => "PHX", Phy => "PHY", Plx => "PLX",
            Ply => "PLY", Stz => "STZ", Trb => "TRB", Tsb => "TSB",
        }
    }

    /// Whether the mnemonic is a relative branch.
    #[must_use]
    pub fn is_branch(self) -> bool {
        use Mnemonic::*;
        matches!(self, Bcc | Bcs | Beq | Bmi | Bne | Bpl | Bvc | Bvs | Bra)
    }

    /// Whether any row of the opcode table exists for this mnemonic on the
    /// given CPU variant.
    #[must_use]
    pub fn available_on(self, variant: CpuVariant) -> bool {
        OPCODES
            .iter()
            .any(|&(m, _, _, v)| m == self && (variant == CpuVariant::Cmos || v == CpuVariant::Nmos))
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

use AddrMode as A;
use CpuVariant::{Cmos as C, Nmos as N};
use Mnemonic as M;

/// The opcode table: every documented `(mnemonic, mode)` pair and its
/// opcode byte.  Rows tagged [`CpuVariant::Cmos`] exist only on the 65C02.
#[rustfmt::skip]
pub static OPCODES: &[(Mnemonic, AddrMode, u8, CpuVariant)] = &[
    (M::Adc, A::Immediate, 0x69, N),
    (M::Adc, A::ZeroPage, 0x65, N),
    (M::Adc, A::ZeroPageX, 0x75, N),
    (M::Adc, A::Absolute, 0x6D, N),
    (M::Adc, A::AbsoluteX, 0x7D, N),
    (M::Adc, A::AbsoluteY, 0x79, N),
    (M::Adc, A::IndexedIndirect, 0x61, N),
    (M::Adc, A::IndirectIndexed, 0x71, N),
    (M::Adc, A::ZeroPageIndirect, 0x72, C),
    (M::And, A::Immediate, 0x29, N),
    (M::And, A::ZeroPage, 0x25, N),
    (M::And, A::ZeroPageX, 0x35, N),
    (M::And, A::Absolute, 0x2D, N),
    (M::And, A::AbsoluteX, 0x3D, N),
    (M::And, A::AbsoluteY, 0x39, N),
    (M::And, A::IndexedIndirect, 0x21, N),
    (M::And, A::IndirectIndexed, 0x31, N),
    (M::And, A::ZeroPageIndirect, 0x32, C),
    (M::Asl, A::Accumulator, 0x0A, N),
    (M::Asl, A::ZeroPage, 0x06, N),
    (M::Asl, A::ZeroPageX, 0x16, N),
    (M::Asl, A::Absolute, 0x0E, N),
    (M::Asl, A::AbsoluteX, 0x1E, N),
    (M::Bcc, A::Relative, 0x90, N),
    (M::Bcs, A::Relative, 0xB0, N),
    (M::Beq, A::Relative, 0xF0, N),
    (M::Bit, A::ZeroPage, 0x24, N),
    (M::Bit, A::Absolute, 0x2C, N),
    (M::Bit, A::Immediate, 0x89, C),
    (M::Bit, A::ZeroPageX, 0x34, C),
    (M::Bit, A::AbsoluteX, 0x3C, C),
    (M::Bmi, A::Relative, 0x30, N),
    (M::Bne, A::Relative, 0xD0, N),
    (M::Bpl, A::Relative, 0x10, N),
    (M::Bra, A::Relative, 0x80, C),
    (M::Brk, A::Implied, 0x00, N),
    (M::Bvc, A::Relative, 0x50, N),
    (M::Bvs, A::Relative, 0x70, N),
    (M::Clc, A::Implied, 0x18, N),
    (M::Cld, A::Implied, 0xD8, N),
    (M::Cli, A::Implied, 0x58, N),
    (M::Clv, A::Implied, 0xB8, N),
    (M::Cmp, A::Immediate, 0xC9, N),
    (M::Cmp, A::ZeroPage, 0xC5, N),
    (M::Cmp, A::ZeroPageX, 0xD5, N),
    (M::Cmp, A::Absolute, 0xCD, N),
    (M::Cmp, A::AbsoluteX, 0xDD, N),
    (M::Cmp, A::AbsoluteY, 0xD9, N),
    (M::Cmp, A::IndexedIndirect, 0xC1, N),
    (M::Cmp, A::IndirectIndexed, 0xD1, N),
    (M::Cmp, A::ZeroPageIndirect, 0xD2, C),
    (M::Cpx, A::Immediate, 0xE0, N),
    (M::Cpx, A::ZeroPage, 0xE4, N),
    (M::Cpx, A::Absolute, 0xEC, N),
    (M::Cpy, A::Immediate, 0xC0, N),
    (M::Cpy, A::ZeroPage, 0xC4, N),
    (M::Cpy, A::Absolute, 0xCC, N),
    (M::Dec, A::Accumulator, 0x3A, C),
    (M::Dec, A::ZeroPage, 0xC6, N),
    (M::Dec, A::ZeroPageX, 0xD6, N),
    (M::Dec, A::Absolute, 0xCE, N),
    (M::Dec, A::AbsoluteX, 0xDE, N),
    (M::Dex, A::Implied, 0xCA, N),
    (M::Dey, A::Implied, 0x88, N),
    (M::Eor, A::Immediate, 0x49, N),
    (M::Eor, A::ZeroPage, 0x45, N),
    (M::Eor, A::ZeroPageX, 0x55, N),
    (M::Eor, A::Absolute, 0x4D, N),
    (M::Eor, A::AbsoluteX, 0x5D, N),
    (M::Eor, A::AbsoluteY, 0x59, N),
    (M::Eor, A::IndexedIndirect, 0x41, N),
    (M::Eor, A::IndirectIndexed, 0x51, N),
    (M::Eor, A::ZeroPageIndirect, 0x52, C),
    (M::Inc, A::Accumulator, 0x1A, C),
    (M::Inc, A::ZeroPage, 0xE6, N),
    (M::Inc, A::ZeroPageX, 0xF6, N),
    (M::Inc, A::Absolute, 0xEE, N),
    (M::Inc, A::AbsoluteX, 0xFE, N),
    (M::Inx, A::Implied, 0xE8, N),
    (M::Iny, A::Implied, 0xC8, N),
    (M::Jmp, A::Absolute, 0x4C, N),
    (M::Jmp, A::Indirect, 0x6C, N),
    (M::Jsr, A::Absolute, 0x20, N),
    (M::Lda, A::Immediate, 0xA9, N),
    (M::Lda, A::ZeroPage, 0xA5, N),
    (M::Lda, A::ZeroPageX, 0xB5, N),
    (M::Lda, A::Absolute, 0xAD, N),
    (M::Lda, A::AbsoluteX, 0xBD, N),
    (M::Lda, A::AbsoluteY, 0xB9, N),
    (M::Lda, A::IndexedIndirect, 0xA1, N),
    (M::Lda, A::IndirectIndexed, 0xB1, N),
    (M::Lda, A::ZeroPageIndirect, 0xB2, C),
    (M::Ldx, A::Immediate, 0xA2, N),
    (M::Ldx, A::ZeroPage, 0xA6, N),
    (M::Ldx, A::ZeroPageY, 0xB6, N),
    (M::Ldx, A::Absolute, 0xAE, N),
    (M::Ldx, A::AbsoluteY, 0xBE, N),
    (M::Ldy, A::Immediate, 0xA0, N),
    (M::Ldy, A::ZeroPage, 0xA4, N),
    (M::Ldy, A::ZeroPageX, 0xB4, N),
    (M::Ldy, A::Absolute, 0xAC, N),
    (M::Ldy, A::AbsoluteX, 0xBC, N),
    (M::Lsr, A::Accumulator, 0x4A, N),
    (M::Lsr, A::ZeroPage, 0x46, N),
    (M::Lsr, A::ZeroPageX, 0x56, N),
    (M::Lsr, A::Absolute, 0x4E, N),
    (M::Lsr, A::AbsoluteX, 0x5E, N),
    (M::Nop, A::Implied, 0xEA, N),
    (M::Ora, A::Immediate, 0x09, N),
    (M::Ora, A::ZeroPage, 0x05, N),
    (M::Ora, A::ZeroPageX, 0x15, N),
    (M::Ora, A::Absolute, 0x0D, N),
    (M::Ora, A::AbsoluteX, 0x1D, N),
    (M::Ora, A::AbsoluteY, 0x19, N),
    (M::Ora, A::IndexedIndirect, 0x01, N),
    (M::Ora, A::IndirectIndexed, 0x11, N),
    (M::Ora, A::ZeroPageIndirect, 0x12, C),
    (M::Pha, A::Implied, 0x48, N),
    (M::Php, A::Implied, 0x08, N),
    (M::Phx, A::Implied, 0xDA, C),
    (M::Phy, A::Implied, 0x5A, C),
    (M::Pla, A::Implied, 0x68, N),
    (M::Plp, A::Implied, 0x28, N),
    (M::Plx, A::Implied, 0xFA, C),
    (M::Ply, A::Implied, 0x7A, C),
    (M::Rol, A::Accumulator, 0x2A, N),
    (M::Rol, A::ZeroPage, 0x26, N),
    (M::Rol, A::ZeroPageX, 0x36, N),
    (M::Rol, A::Absolute, 0x2E, N),
    (M::Rol, A::AbsoluteX, 0x3E, N),
    (M::Ror, A::Accumulator, 0x6A, N),
    (M::Ror, A::ZeroPage, 0x66, N),
    (M::Ror, A::ZeroPageX, 0x76, N),
    (M::Ror, A::Absolute, 0x6E, N),
    (M::Ror, A::AbsoluteX, 0x7E, N),
    (M::Rti, A::Implied, 0x40, N),
    (M::Rts, A::Implied, 0x60, N),
    (M::Sbc, A::Immediate, 0xE9, N),
    (M::Sbc, A::ZeroPage, 0xE5, N),
    (M::Sbc, A::ZeroPageX, 0xF5, N),
    (M::Sbc, A::Absolute, 0xED, N),
    (M::Sbc, A::AbsoluteX, 0xFD, N),
    (M::Sbc, A::AbsoluteY, 0xF9, N),
    (M::Sbc, A::IndexedIndirect, 0xE1, N),
    (M::Sbc, A::IndirectIndexed, 0xF1, N),
    (M::Sbc, A::ZeroPageIndirect, 0xF2, C),
    (M::Sec, A::Implied, 0x38, N),
    (M::Sed, A::Implied, 0xF8, N),
    (M::Sei, A::Implied, 0x78, N),
    (M::Sta, A::ZeroPage, 0x85, N),
    (M::Sta, A::ZeroPageX, 0x95, N),
    (M::Sta, A::Absolute, 0x8D, N),
    (M::Sta, A::AbsoluteX, 0x9D, N),
    (M::Sta, A::AbsoluteY, 0x99, N),
    (M::Sta, A::IndexedIndirect, 0x81, N),
    (M::Sta, A::IndirectIndexed, 0x91, N),
    (M::Sta, A::ZeroPageIndirect, 0x92, C),
    (M::Stx, A::ZeroPage, 0x86, N),
    (M::Stx, A::ZeroPageY, 0x96, N),
    (M::Stx, A::Absolute, 0x8E, N),
    (M::Sty, A::ZeroPage, 0x84, N),
    (M::Sty, A::ZeroPageX, 0x94, N),
    (M::Sty, A::Absolute, 0x8C, N),
    (M::Stz, A::ZeroPage, 0x64, C),
    (M::Stz, A::ZeroPageX, 0x74, C),
    (M::Stz, A::Absolute, 0x9C, C),
    (M::Stz, A::AbsoluteX, 0x9E, C),
    (M::Tax, A::Implied, 0xAA, N),
    (M::Tay, A::Implied, 0xA8, N),
    (M::Trb, A::ZeroPage, 0x14, C),
    (M::Trb, A::Absolute, 0x1C, C),
    (M::Tsb, A::ZeroPage, 0x04, C),
    (M::Tsb, A::Absolute, 0x0C, C),
    (M::Tsx, A::Implied, 0xBA, N),
    (M::Txa, A::Implied, 0x8A, N),
    (M::Txs, A::Implied, 0x9A, N),
    (M::Tya, A::Implied, 0x98, N),
];

/// Look up the opcode for `(mnemonic, mode)` on the given CPU variant.
///
/// The table is small enough that a linear scan is sufficient.
#[must_use]
pub fn opcode(mnemonic: Mnemonic, mode: AddrMode, variant: CpuVariant) -> Option<u8> {
    OPCODES.iter().find_map(|&(m, a, op, v)| {
        (m == mnemonic && a == mode && (variant == CpuVariant::Cmos || v == CpuVariant::Nmos))
            .then_some(op)
    })
}

/// Whether `(mnemonic, mode)` is encodable on the given CPU variant.
#[must_use]
pub fn has_mode(mnemonic: Mnemonic, mode: AddrMode, variant: CpuVariant) -> bool {
    opcode(mnemonic, mode, variant).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_case_insensitive() {
        assert_eq!(Mnemonic::from_name("lda"), Some(Mnemonic::Lda));
        assert_eq!(Mnemonic::from_name("LdA"), Some(Mnemonic::Lda));
        assert_eq!(Mnemonic::from_name("LDA"), Some(Mnemonic::Lda));
    }

    #[test]
    fn parse_rejects_unknown() {
        assert_eq!(Mnemonic::from_name("MOV"), None);
        assert_eq!(Mnemonic::from_name("LD"), None);
        assert_eq!(Mnemonic::from_name("LDAA"), None);
    }

    #[test]
    fn immediate_opcodes_match_canonical_table() {
        let cases = [
            (Mnemonic::Lda, 0xA9),
            (Mnemonic::Ldx, 0xA2),
            (Mnemonic::Ldy, 0xA0),
            (Mnemonic::Adc, 0x69),
            (Mnemonic::Sbc, 0xE9),
            (Mnemonic::Cmp, 0xC9),
            (Mnemonic::Cpx, 0xE0),
            (Mnemonic::Cpy, 0xC0),
            (Mnemonic::And, 0x29),
            (Mnemonic::Ora, 0x09),
            (Mnemonic::Eor, 0x49),
        ];
        for (m, op) in cases {
            assert_eq!(opcode(m, AddrMode::Immediate, CpuVariant::Nmos), Some(op));
        }
    }

    #[test]
    fn zero_page_and_absolute_pairs() {
        assert_eq!(opcode(Mnemonic::Lda, AddrMode::ZeroPage, CpuVariant::Nmos), Some(0xA5));
        assert_eq!(opcode(Mnemonic::Lda, AddrMode::Absolute, CpuVariant::Nmos), Some(0xAD));
        assert_eq!(opcode(Mnemonic::Sta, AddrMode::ZeroPage, CpuVariant::Nmos), Some(0x85));
        assert_eq!(opcode(Mnemonic::Sta, AddrMode::Absolute, CpuVariant::Nmos), Some(0x8D));
    }

    #[test]
    fn jmp_has_no_zero_page_form() {
        assert_eq!(opcode(Mnemonic::Jmp, AddrMode::ZeroPage, CpuVariant::Cmos), None);
        assert_eq!(opcode(Mnemonic::Jmp, AddrMode::Indirect, CpuVariant::Nmos), Some(0x6C));
    }

    #[test]
    fn stx_indexes_by_y_only() {
        assert_eq!(opcode(Mnemonic::Stx, AddrMode::ZeroPageY, CpuVariant::Nmos), Some(0x96));
        assert_eq!(opcode(Mnemonic::Stx, AddrMode::ZeroPageX, CpuVariant::Nmos), None);
        assert_eq!(opcode(Mnemonic::Stx, AddrMode::AbsoluteY, CpuVariant::Nmos), None);
    }

    #[test]
    fn cmos_rows_hidden_on_nmos() {
        assert_eq!(opcode(Mnemonic::Bra, AddrMode::Relative, CpuVariant::Nmos), None);
        assert_eq!(opcode(Mnemonic::Bra, AddrMode::Relative, CpuVariant::Cmos), Some(0x80));
        assert_eq!(
            opcode(Mnemonic::Lda, AddrMode::ZeroPageIndirect, CpuVariant::Nmos),
            None
        );
        assert_eq!(
            opcode(Mnemonic::Lda, AddrMode::ZeroPageIndirect, CpuVariant::Cmos),
            Some(0xB2)
        );
    }

    #[test]
    fn cmos_extension_opcodes() {
        assert_eq!(opcode(Mnemonic::Phx, AddrMode::Implied, CpuVariant::Cmos), Some(0xDA));
        assert_eq!(opcode(Mnemonic::Ply, AddrMode::Implied, CpuVariant::Cmos), Some(0x7A));
        assert_eq!(opcode(Mnemonic::Stz, AddrMode::ZeroPage, CpuVariant::Cmos), Some(0x64));
        assert_eq!(opcode(Mnemonic::Trb, AddrMode::Absolute, CpuVariant::Cmos), Some(0x1C));
        assert_eq!(opcode(Mnemonic::Tsb, AddrMode::ZeroPage, CpuVariant::Cmos), Some(0x04));
        assert_eq!(opcode(Mnemonic::Inc, AddrMode::Accumulator, CpuVariant::Cmos), Some(0x1A));
        assert_eq!(opcode(Mnemonic::Dec, AddrMode::Accumulator, CpuVariant::Cmos), Some(0x3A));
    }

    #[test]
    fn branch_classification() {
        assert!(Mnemonic::Bne.is_branch());
        assert!(Mnemonic::Bra.is_branch());
        assert!(!Mnemonic::Jmp.is_branch());
        assert!(!Mnemonic::Jsr.is_branch());
    }

    #[test]
    fn availability_by_variant() {
        assert!(Mnemonic::Lda.available_on(CpuVariant::Nmos));
        assert!(Mnemonic::Stz.available_on(CpuVariant::Cmos));
        assert!(!Mnemonic::Stz.available_on(CpuVariant::Nmos));
    }

    #[test]
    fn every_mnemonic_has_at_least_one_row() {
        use Mnemonic::*;
        let all = [
            Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs,
            Clc, Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx,
            Iny, Jmp, Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp,
            Rol, Ror, Rti, Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay,
            Tsx, Txa, Txs, Tya, Bra, Phx, Phy, Plx, Ply, Stz, Trb, Tsb,
        ];
        for m in all {
            assert!(m.available_on(CpuVariant::Cmos), "{} missing from table", m);
        }
    }

    #[test]
    fn no_duplicate_rows() {
        for (i, &(m1, a1, _, _)) in OPCODES.iter().enumerate() {
            for &(m2, a2, _, _) in &OPCODES[i + 1..] {
                assert!(
                    !(m1 == m2 && a1 == a2),
                    "duplicate table row: {} {}",
                    m1,
                    a1
                );
            }
        }
    }
}

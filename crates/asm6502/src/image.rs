//! The loader-facing binary artifact format.
//!
//! An assembled program is stored as a 6-byte header followed by the
//! machine code:
//!
//! ```text
//! bytes 0..4   ASCII signature "56og"
//! bytes 4..6   little-endian 16-bit load origin
//! bytes 6..    machine code
//! ```
//!
//! A file without the signature is treated as raw machine code; the caller
//! must supply the load origin out of band.

#[allow(unused_imports)]
use alloc::vec;
use alloc::vec::Vec;

use crate::assembler::Assembly;

/// The 4-byte program image signature.
pub const SIGNATURE: [u8; 4] = *b"56og";

/// A decoded program image.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Image {
    /// A signed image carrying its own load origin.
    Program {
        /// The load origin from the header.
        origin: u16,
        /// The machine code.
        code: Vec<u8>,
    },
    /// Raw machine code with no header; the origin must come from the caller.
    Raw(Vec<u8>),
}

/// Encode an assembly into the signed binary image format.
#[must_use]
pub fn encode(assembly: &Assembly) -> Vec<u8> {
    let mut out = Vec::with_capacity(6 + assembly.code.len());
    out.extend_from_slice(&SIGNATURE);
    out.extend_from_slice(&assembly.origin.to_le_bytes());
    out.extend_from_slice(&assembly.code);
    out
}

/// Decode a binary image.
///
/// Input starting with the [`SIGNATURE`] and long enough to carry the
/// origin decodes as [`Image::Program`]; anything else is [`Image::Raw`].
#[must_use]
pub fn decode(bytes: &[u8]) -> Image {
    if bytes.len() >= 6 && bytes[..4] == SIGNATURE {
        let origin = u16::from_le_bytes([bytes[4], bytes[5]]);
        Image::Program {
            origin,
            code: bytes[6..].to_vec(),
        }
    } else {
        Image::Raw(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sourcemap::SourceMap;

    fn assembly(origin: u16, code: &[u8]) -> Assembly {
        Assembly {
            origin,
            code: code.to_vec(),
            source_map: SourceMap::default(),
        }
    }

    #[test]
    fn encode_layout() {
        let image = encode(&assembly(0x0800, &[0xEA, 0x60]));
        assert_eq!(&image[..4], b"56og");
        assert_eq!(&image[4..6], &[0x00, 0x08]);
        assert_eq!(&image[6..], &[0xEA, 0x60]);
    }

    #[test]
    fn round_trip() {
        let image = encode(&assembly(0xC000, &[0xA9, 0x01, 0x60]));
        match decode(&image) {
            Image::Program { origin, code } => {
                assert_eq!(origin, 0xC000);
                assert_eq!(code, vec![0xA9, 0x01, 0x60]);
            }
            Image::Raw(_) => panic!("expected signed image"),
        }
    }

    #[test]
    fn unsigned_input_is_raw() {
        let bytes = [0xA9, 0x01, 0x60];
        assert_eq!(decode(&bytes), Image::Raw(bytes.to_vec()));
    }

    #[test]
    fn truncated_header_is_raw() {
        // Signature present but no room for the origin.
        let bytes = b"56og\x00";
        assert_eq!(decode(bytes), Image::Raw(bytes.to_vec()));
    }

    #[test]
    fn empty_program_round_trips() {
        let image = encode(&assembly(0x0000, &[]));
        assert_eq!(
            decode(&image),
            Image::Program {
                origin: 0,
                code: vec![]
            }
        );
    }
}

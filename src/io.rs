//! Byte-order aware word I/O for the binary index format.
//!
//! The on-disk format is a plain run of fixed-width u64 words with no
//! framing of its own, so the byte order is chosen by the caller and must
//! match between writer and reader.

use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

/// Byte order for persisted index words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    /// Map the conventional `big_endian` flag onto the enum.
    pub fn from_big_endian_flag(big_endian: bool) -> Self {
        if big_endian {
            Endianness::Big
        } else {
            Endianness::Little
        }
    }
}

/// Write one u64 word in the given byte order.
pub(crate) fn write_word<W: Write>(out: &mut W, value: u64, order: Endianness) -> io::Result<()> {
    match order {
        Endianness::Little => out.write_u64::<LittleEndian>(value),
        Endianness::Big => out.write_u64::<BigEndian>(value),
    }
}

/// Read one u64 word in the given byte order.
pub(crate) fn read_word<R: Read>(input: &mut R, order: Endianness) -> io::Result<u64> {
    match order {
        Endianness::Little => input.read_u64::<LittleEndian>(),
        Endianness::Big => input.read_u64::<BigEndian>(),
    }
}

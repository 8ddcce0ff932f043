//! Host byte order detection.
//!
//! imsg has no on-wire byte order: every field is written in whatever order
//! the sending machine uses natively, and peers are expected to share it.

use std::fmt;

use bytes::{Buf, BufMut};

/// Byte order used to encode and decode header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endianness {
    Little,
    Big,
}

/// The byte order of the running machine.
pub const NATIVE: Endianness = Endianness::probe();

impl Endianness {
    /// Determine the host byte order from the in-memory layout of a `u16`.
    pub const fn probe() -> Self {
        if 1u16.to_ne_bytes()[0] == 1 {
            Endianness::Little
        } else {
            Endianness::Big
        }
    }

    /// The host byte order, resolved once.
    pub const fn native() -> Self {
        NATIVE
    }

    /// The byte order opposite to this one.
    pub const fn swapped(self) -> Self {
        match self {
            Endianness::Little => Endianness::Big,
            Endianness::Big => Endianness::Little,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Endianness::Little => "little-endian",
            Endianness::Big => "big-endian",
        }
    }

    pub(crate) fn put_u16<B: BufMut>(self, dst: &mut B, value: u16) {
        match self {
            Endianness::Little => dst.put_u16_le(value),
            Endianness::Big => dst.put_u16(value),
        }
    }

    pub(crate) fn put_u32<B: BufMut>(self, dst: &mut B, value: u32) {
        match self {
            Endianness::Little => dst.put_u32_le(value),
            Endianness::Big => dst.put_u32(value),
        }
    }

    pub(crate) fn get_u16<B: Buf>(self, src: &mut B) -> u16 {
        match self {
            Endianness::Little => src.get_u16_le(),
            Endianness::Big => src.get_u16(),
        }
    }

    pub(crate) fn get_u32<B: Buf>(self, src: &mut B) -> u32 {
        match self {
            Endianness::Little => src.get_u32_le(),
            Endianness::Big => src.get_u32(),
        }
    }
}

impl Default for Endianness {
    fn default() -> Self {
        NATIVE
    }
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the host byte order used by the default codec.
pub fn native_endianness() -> Endianness {
    NATIVE
}

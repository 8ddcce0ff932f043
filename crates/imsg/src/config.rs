use crate::endian::Endianness;

/// Configuration for the imsg codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Byte order for header fields. Default: host native order.
    ///
    /// Only change this when the peer is known to run the opposite order;
    /// imsg itself never negotiates it.
    pub byte_order: Endianness,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            byte_order: Endianness::native(),
        }
    }
}

impl CodecConfig {
    /// Configuration using an explicit byte order.
    pub fn with_byte_order(byte_order: Endianness) -> Self {
        Self { byte_order }
    }
}

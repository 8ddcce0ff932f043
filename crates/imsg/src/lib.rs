//! OpenBSD imsg-compatible message encoding for IPC.
//!
//! Every message is a fixed 16-byte header followed by up to 16368 bytes of
//! payload:
//! - A 4-byte message type
//! - A 2-byte total length (header included, 16 to 16384)
//! - A 2-byte flags field, reserved for the C library
//! - A 4-byte peer id and a 4-byte process id
//!
//! All fields are written in host byte order, matching the C implementation.
//! Peers are assumed to share it. Moving bytes between processes is left to
//! the caller: the codec reads or writes exactly one message per call.

pub mod codec;
pub mod config;
pub mod endian;
pub mod error;
pub mod message;

pub use codec::{Codec, Header, HEADER_SIZE, MAX_PAYLOAD_SIZE, MAX_SIZE};
pub use config::CodecConfig;
pub use endian::{native_endianness, Endianness};
pub use error::{ImsgError, Result};
pub use message::Message;

use std::io::{ErrorKind, Read, Write};

use bytes::{BufMut, Bytes, BytesMut};
use tracing::{debug, trace};

use crate::config::CodecConfig;
use crate::endian::Endianness;
use crate::error::{ImsgError, Result};
use crate::message::Message;

/// Header: type (4) + length (2) + flags (2) + peer id (4) + pid (4) = 16 bytes.
pub const HEADER_SIZE: usize = 16;

/// Maximum size of a single message, header included.
pub const MAX_SIZE: usize = 16384;

/// Largest payload that fits in a single message.
pub const MAX_PAYLOAD_SIZE: usize = MAX_SIZE - HEADER_SIZE;

const MIN_LEN: u16 = HEADER_SIZE as u16;
const MAX_LEN: u16 = MAX_SIZE as u16;

/// The fixed 16-byte prefix of every imsg, as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    pub kind: u32,
    /// Total message length, header included.
    pub len: u16,
    pub flags: u16,
    pub peer_id: u32,
    pub pid: u32,
}

impl Header {
    /// Parse a header from its wire bytes. Performs no validation.
    pub fn parse(order: Endianness, raw: &[u8; HEADER_SIZE]) -> Self {
        let mut src = &raw[..];
        Self {
            kind: order.get_u32(&mut src),
            len: order.get_u16(&mut src),
            flags: order.get_u16(&mut src),
            peer_id: order.get_u32(&mut src),
            pid: order.get_u32(&mut src),
        }
    }

    /// Append the header's wire bytes to `dst`.
    pub fn put<B: BufMut>(&self, order: Endianness, dst: &mut B) {
        order.put_u32(dst, self.kind);
        order.put_u16(dst, self.len);
        order.put_u16(dst, self.flags);
        order.put_u32(dst, self.peer_id);
        order.put_u32(dst, self.pid);
    }

    /// Check that the declared length lies within `[HEADER_SIZE, MAX_SIZE]`.
    pub fn validate(&self) -> Result<()> {
        if self.len < MIN_LEN || self.len > MAX_LEN {
            return Err(ImsgError::LengthOutOfBounds {
                length: self.len,
                min: MIN_LEN,
                max: MAX_LEN,
            });
        }
        Ok(())
    }

    /// Number of payload bytes that follow the header.
    pub fn payload_len(&self) -> usize {
        usize::from(self.len).saturating_sub(HEADER_SIZE)
    }
}

/// Encodes and decodes single imsgs in a configured byte order.
///
/// Wire format:
/// ```text
/// ┌──────────┬──────────┬──────────┬──────────┬──────────┬─────────────────┐
/// │ Type     │ Length   │ Flags    │ Peer ID  │ PID      │ Payload         │
/// │ (4B)     │ (2B)     │ (2B)     │ (4B)     │ (4B)     │ (Length - 16 B) │
/// └──────────┴──────────┴──────────┴──────────┴──────────┴─────────────────┘
/// ```
/// All fields use the configured byte order, host native by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    /// Create a codec using the host byte order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a codec with explicit configuration.
    pub fn with_config(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Current codec configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Byte order used for header fields.
    pub fn byte_order(&self) -> Endianness {
        self.config.byte_order
    }

    /// Encode a message into a new buffer.
    pub fn encode(&self, msg: &Message) -> Result<Bytes> {
        let mut dst = BytesMut::with_capacity(msg.encoded_size().min(MAX_SIZE));
        self.encode_into(msg, &mut dst)?;
        Ok(dst.freeze())
    }

    /// Append an encoded message to `dst`.
    ///
    /// Nothing is written when the message is too large.
    pub fn encode_into(&self, msg: &Message, dst: &mut BytesMut) -> Result<()> {
        let total = msg.encoded_size();
        if total > MAX_SIZE {
            debug!(
                size = msg.payload.len(),
                max = MAX_PAYLOAD_SIZE,
                "refusing to encode oversized imsg"
            );
            return Err(ImsgError::DataTooLarge {
                size: msg.payload.len(),
                max: MAX_PAYLOAD_SIZE,
            });
        }

        let header = Header {
            kind: msg.kind,
            len: total as u16,
            flags: msg.flags,
            peer_id: msg.peer_id,
            pid: msg.pid,
        };

        dst.reserve(total);
        header.put(self.config.byte_order, dst);
        dst.put_slice(&msg.payload);

        trace!(kind = msg.kind, len = total, "encoded imsg");
        Ok(())
    }

    /// Encode a message and write it to `dst` in full, then flush.
    ///
    /// Returns the number of bytes written.
    pub fn write_message<W: Write + ?Sized>(&self, msg: &Message, dst: &mut W) -> Result<usize> {
        let wire = self.encode(msg)?;
        dst.write_all(&wire)?;

        loop {
            match dst.flush() {
                Ok(()) => break,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(ImsgError::Io(err)),
            }
        }

        Ok(wire.len())
    }

    /// Read a single message from `src` (blocking).
    ///
    /// A source that ends inside the header yields `ImsgError::Io` with
    /// `UnexpectedEof`. A source that ends inside the payload yields
    /// `ImsgError::InsufficientData`.
    pub fn decode<R: Read + ?Sized>(&self, src: &mut R) -> Result<Message> {
        let mut raw = [0u8; HEADER_SIZE];
        src.read_exact(&mut raw)?;

        let header = Header::parse(self.config.byte_order, &raw);
        if let Err(err) = header.validate() {
            debug!(length = header.len, "rejecting imsg with out-of-bounds length");
            return Err(err);
        }

        let payload = match header.payload_len() {
            0 => Bytes::new(),
            expected => read_payload(src, expected)?,
        };

        trace!(kind = header.kind, len = header.len, "decoded imsg");
        Ok(Message {
            kind: header.kind,
            peer_id: header.peer_id,
            pid: header.pid,
            payload,
            flags: header.flags,
        })
    }

    /// Decode a single message from an in-memory buffer.
    ///
    /// Bytes beyond the length declared in the header are ignored.
    pub fn decode_slice(&self, buf: &[u8]) -> Result<Message> {
        let mut src = buf;
        self.decode(&mut src)
    }
}

fn read_payload<R: Read + ?Sized>(src: &mut R, expected: usize) -> Result<Bytes> {
    let mut payload = BytesMut::zeroed(expected);
    let mut filled = 0usize;

    while filled < expected {
        match src.read(&mut payload[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(ImsgError::Io(err)),
        }
    }

    if filled < expected {
        debug!(expected, read = filled, "imsg payload truncated");
        return Err(ImsgError::InsufficientData {
            expected,
            read: filled,
        });
    }

    Ok(payload.freeze())
}

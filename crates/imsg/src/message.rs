use std::io::{Read, Write};

use bytes::Bytes;

use crate::codec::{Codec, HEADER_SIZE, MAX_PAYLOAD_SIZE};
use crate::error::{ImsgError, Result};

/// A single imsg: a fixed header plus opaque ancillary data.
///
/// Fields may be set directly; nothing is validated until the message is
/// encoded. [`Message::compose`] is the validating constructor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    /// Caller-defined message type.
    pub kind: u32,
    /// Free for use by the caller, conventionally identifies the sender.
    pub peer_id: u32,
    /// Free for use by the caller, conventionally the sender's process id.
    pub pid: u32,
    /// Ancillary data following the header.
    pub payload: Bytes,
    /// Reserved for the C library's internal use. Round-tripped through
    /// encode and decode but never set or interpreted here.
    pub flags: u16,
}

impl Message {
    /// Compose a message stamped with the current process id.
    pub fn compose(kind: u32, peer_id: u32, payload: impl Into<Bytes>) -> Result<Self> {
        let payload = payload.into();
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(ImsgError::DataTooLarge {
                size: payload.len(),
                max: MAX_PAYLOAD_SIZE,
            });
        }

        Ok(Self {
            kind,
            peer_id,
            pid: std::process::id(),
            payload,
            flags: 0,
        })
    }

    /// Total wire size (header + payload). Not checked against the maximum.
    pub fn encoded_size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }

    /// Encode in host byte order.
    pub fn encode(&self) -> Result<Bytes> {
        Codec::new().encode(self)
    }

    /// Alias for [`Message::encode`].
    pub fn to_bytes(&self) -> Result<Bytes> {
        self.encode()
    }

    /// Encode in host byte order and write to `dst`.
    pub fn write_to<W: Write + ?Sized>(&self, dst: &mut W) -> Result<usize> {
        Codec::new().write_message(self, dst)
    }

    /// Read one message in host byte order (blocking).
    pub fn decode<R: Read + ?Sized>(src: &mut R) -> Result<Self> {
        Codec::new().decode(src)
    }

    /// Decode one message in host byte order from a buffer.
    pub fn decode_slice(buf: &[u8]) -> Result<Self> {
        Codec::new().decode_slice(buf)
    }
}

impl TryFrom<&[u8]> for Message {
    type Error = ImsgError;

    fn try_from(buf: &[u8]) -> Result<Self> {
        Self::decode_slice(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::MAX_SIZE;

    #[test]
    fn compose_stamps_pid_and_clears_flags() {
        let msg = Message::compose(1, 2, &b"hi"[..]).unwrap();
        assert_eq!(msg.kind, 1);
        assert_eq!(msg.peer_id, 2);
        assert_eq!(msg.pid, std::process::id());
        assert_eq!(msg.flags, 0);
        assert_eq!(msg.payload.as_ref(), b"hi");
    }

    #[test]
    fn compose_accepts_max_payload() {
        let msg = Message::compose(0, 0, vec![0u8; MAX_PAYLOAD_SIZE]).unwrap();
        assert_eq!(msg.encoded_size(), MAX_SIZE);
    }

    #[test]
    fn compose_rejects_oversized_payload() {
        let err = Message::compose(0, 0, vec![0u8; MAX_SIZE + 1]).unwrap_err();
        assert!(matches!(
            err,
            ImsgError::DataTooLarge { size, max } if size == MAX_SIZE + 1 && max == MAX_PAYLOAD_SIZE
        ));
        assert_eq!(
            err.to_string(),
            "payload too large (16385 bytes, max 16368)"
        );
    }

    #[test]
    fn encoded_size_ignores_limit() {
        let msg = Message {
            payload: Bytes::from(vec![0u8; MAX_SIZE]),
            ..Message::default()
        };
        assert_eq!(msg.encoded_size(), MAX_SIZE + HEADER_SIZE);
        assert_eq!(Message::default().encoded_size(), HEADER_SIZE);
    }

    #[test]
    fn native_roundtrip() {
        let msg = Message {
            kind: 42,
            peer_id: 7,
            pid: 1234,
            payload: Bytes::from_static(b"payload"),
            flags: 3,
        };
        let wire = msg.to_bytes().unwrap();
        assert_eq!(wire.len(), msg.encoded_size());
        assert_eq!(Message::try_from(wire.as_ref()).unwrap(), msg);

        let mut sink = Vec::new();
        msg.write_to(&mut sink).unwrap();
        assert_eq!(Message::decode(&mut sink.as_slice()).unwrap(), msg);
    }
}

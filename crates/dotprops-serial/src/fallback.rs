//! Binary fallback codec for members with no scalar coercion.
//!
//! A value is serialized with bincode, wrapped in a small container that
//! carries the Rust type name of the value, and rendered as standard Base64
//! so it fits on a single property line:
//!
//! ```text
//! [3 bytes: magic "DPF"]
//! [1 byte:  container version]
//! [2 bytes: type tag length (big-endian u16)]
//! [N bytes: type tag (UTF-8 type name)]
//! [4 bytes: payload length (big-endian u32)]
//! [M bytes: payload (bincode)]
//! ```
//!
//! The type tag comes from [`std::any::type_name`], which is only stable for a
//! given build. Stored fallback text is meant to be read back by the same
//! program; it is not an interchange format.

use base64::{engine::general_purpose, Engine as _};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{SerialError, SerialResult};

/// Container magic bytes.
pub const MAGIC: &[u8; 3] = b"DPF";

/// Current container version.
pub const CONTAINER_VERSION: u8 = 1;

/// Largest payload accepted on decode (16 MiB).
pub const MAX_PAYLOAD_SIZE: usize = 16 * 1024 * 1024;

/// Codec for the opaque member encoding.
pub struct FallbackCodec;

impl FallbackCodec {
    /// Encode a value as Base64 text.
    pub fn encode<T: Serialize + ?Sized>(value: &T) -> SerialResult<String> {
        let bytes = Self::encode_container(value)?;
        Ok(general_purpose::STANDARD.encode(bytes))
    }

    /// Decode Base64 text produced by [`encode`](Self::encode) for the same type.
    pub fn decode<T: DeserializeOwned>(text: &str) -> SerialResult<T> {
        let bytes = general_purpose::STANDARD
            .decode(text)
            .map_err(|e| SerialError::Decode(format!("invalid base64: {e}")))?;
        Self::decode_container(&bytes)
    }

    /// Report the type tag stored in encoded text without decoding the payload.
    pub fn type_tag(text: &str) -> SerialResult<String> {
        let bytes = general_purpose::STANDARD
            .decode(text)
            .map_err(|e| SerialError::Decode(format!("invalid base64: {e}")))?;
        let container = Container::parse(&bytes)?;
        Ok(container.tag.to_string())
    }

    /// Build the binary container for a value.
    pub fn encode_container<T: Serialize + ?Sized>(value: &T) -> SerialResult<Vec<u8>> {
        let tag = std::any::type_name::<T>();
        let payload =
            bincode::serialize(value).map_err(|e| SerialError::Serialization(e.to_string()))?;

        let tag_len = u16::try_from(tag.len())
            .map_err(|_| SerialError::Serialization(format!("type tag too long: {tag}")))?;
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(SerialError::Serialization(format!(
                "payload too large: {} bytes (max {MAX_PAYLOAD_SIZE})",
                payload.len()
            )));
        }
        let payload_len = payload.len() as u32;

        let mut buf = Vec::with_capacity(MAGIC.len() + 1 + 2 + tag.len() + 4 + payload.len());
        buf.extend_from_slice(MAGIC);
        buf.push(CONTAINER_VERSION);
        buf.extend_from_slice(&tag_len.to_be_bytes());
        buf.extend_from_slice(tag.as_bytes());
        buf.extend_from_slice(&payload_len.to_be_bytes());
        buf.extend_from_slice(&payload);
        Ok(buf)
    }

    /// Parse a binary container and decode its payload as `T`.
    pub fn decode_container<T: DeserializeOwned>(bytes: &[u8]) -> SerialResult<T> {
        let container = Container::parse(bytes)?;
        let expected = std::any::type_name::<T>();
        if container.tag != expected {
            return Err(SerialError::Decode(format!(
                "type tag mismatch: stored {}, expected {expected}",
                container.tag
            )));
        }
        bincode::deserialize(container.payload)
            .map_err(|e| SerialError::Decode(format!("invalid payload for {expected}: {e}")))
    }
}

/// A parsed, borrowed view of a container.
struct Container<'a> {
    tag: &'a str,
    payload: &'a [u8],
}

impl<'a> Container<'a> {
    fn parse(bytes: &'a [u8]) -> SerialResult<Self> {
        let mut reader = Reader { data: bytes, pos: 0 };

        if reader.take(MAGIC.len())? != MAGIC {
            return Err(SerialError::Decode("bad container magic".into()));
        }

        let version = reader.take(1)?[0];
        if version != CONTAINER_VERSION {
            return Err(SerialError::Decode(format!(
                "unsupported container version {version}"
            )));
        }

        let tag_len = reader.take(2)?;
        let tag_len = u16::from_be_bytes([tag_len[0], tag_len[1]]) as usize;
        let tag = std::str::from_utf8(reader.take(tag_len)?)
            .map_err(|e| SerialError::Decode(format!("type tag is not UTF-8: {e}")))?;

        let payload_len = reader.take(4)?;
        let payload_len =
            u32::from_be_bytes([payload_len[0], payload_len[1], payload_len[2], payload_len[3]])
                as usize;
        if payload_len > MAX_PAYLOAD_SIZE {
            return Err(SerialError::Decode(format!(
                "payload too large: {payload_len} bytes (max {MAX_PAYLOAD_SIZE})"
            )));
        }
        let payload = reader.take(payload_len)?;

        if reader.remaining() != 0 {
            return Err(SerialError::Decode(format!(
                "{} trailing bytes after payload",
                reader.remaining()
            )));
        }

        Ok(Self { tag, payload })
    }
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> SerialResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| {
                SerialError::Decode(format!(
                    "truncated container: have {}, need {}",
                    self.data.len(),
                    self.pos.saturating_add(n)
                ))
            })?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

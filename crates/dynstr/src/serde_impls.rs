//! `serde` support: a buffer serializes as a byte string.
//!
//! Deserialization accepts byte strings, text, and sequences of `u8`, so
//! formats without a native bytes type (JSON among them) round-trip too.

use core::fmt;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, SeqAccess, Visitor},
};

use crate::Buffer;

/// Upper bound on the storage preallocated from an untrusted size hint.
const MAX_PREALLOCATION: usize = 4096;

impl Serialize for Buffer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(self.as_bytes())
    }
}

struct BufferVisitor;

impl<'de> Visitor<'de> for BufferVisitor {
    type Value = Buffer;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a byte string")
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Buffer, E> {
        Buffer::try_from_bytes(v).map_err(E::custom)
    }

    fn visit_byte_buf<E: de::Error>(self, v: alloc::vec::Vec<u8>) -> Result<Buffer, E> {
        Ok(Buffer::from(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Buffer, E> {
        self.visit_bytes(v.as_bytes())
    }

    fn visit_string<E: de::Error>(self, v: alloc::string::String) -> Result<Buffer, E> {
        self.visit_byte_buf(v.into_bytes())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Buffer, A::Error> {
        let hint = seq.size_hint().unwrap_or(0).min(MAX_PREALLOCATION);
        let mut buffer = Buffer::with_capacity(hint + 1);
        while let Some(byte) = seq.next_element::<u8>()? {
            buffer.push(byte).map_err(de::Error::custom)?;
        }
        Ok(buffer)
    }
}

impl<'de> Deserialize<'de> for Buffer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_byte_buf(BufferVisitor)
    }
}

//! BSON wire encoding.
//!
//! Layout of an encoded document:
//!
//! ```text
//! int32 total_length (LE) | (u8 tag, cstring name, payload)* | 0x00
//! ```
//!
//! Embedded documents and arrays are encoded with exactly the same byte
//! shape; only the tag on the parent element tells them apart.

use crate::document::{Document, Value};
use thiserror::Error;

/// Default growth step of the output buffer (1 MiB).
pub const DEFAULT_GROWTH_INCREMENT: usize = 1024 * 1024;

/// Initial capacity of the output buffer.
const INITIAL_CAPACITY: usize = 1024;

/// Errors raised while encoding a document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    /// A length prefix would not fit in a signed 32-bit integer
    #[error("{what} of {len} bytes exceeds the maximum BSON length")]
    TooLarge { what: &'static str, len: usize },
}

/// The serialized bytes of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBytes {
    bytes: Vec<u8>,
}

impl EncodedBytes {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }
}

impl AsRef<[u8]> for EncodedBytes {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Serializes [`Document`]s into the BSON wire format.
///
/// The output buffer starts at 1 KiB and grows in coarse fixed steps of
/// `growth_increment` bytes, so documents with many or large fields cost
/// few reallocations at the price of some slack memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireEncoder {
    growth_increment: usize,
}

impl Default for WireEncoder {
    fn default() -> Self {
        Self {
            growth_increment: DEFAULT_GROWTH_INCREMENT,
        }
    }
}

impl WireEncoder {
    /// Create an encoder growing its buffer by `growth_increment` bytes at a time.
    pub fn with_growth_increment(growth_increment: usize) -> Self {
        Self {
            growth_increment: growth_increment.max(1),
        }
    }

    pub fn growth_increment(&self) -> usize {
        self.growth_increment
    }

    /// Encode a document and all of its nested documents.
    pub fn encode(&self, doc: &Document) -> Result<EncodedBytes, EncodeError> {
        let mut out = OutputBuffer::new(self.growth_increment);
        write_document(&mut out, doc)?;
        Ok(EncodedBytes {
            bytes: out.into_inner(),
        })
    }
}

/// Byte buffer with fixed-step growth.
struct OutputBuffer {
    bytes: Vec<u8>,
    increment: usize,
}

impl OutputBuffer {
    fn new(increment: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(INITIAL_CAPACITY),
            increment,
        }
    }

    fn reserve(&mut self, additional: usize) {
        let needed = self.bytes.len() + additional;
        let capacity = self.bytes.capacity();
        if needed <= capacity {
            return;
        }
        let steps = (needed - capacity).div_ceil(self.increment);
        let target = capacity + steps * self.increment;
        self.bytes.reserve_exact(target - self.bytes.len());
    }

    fn put(&mut self, data: &[u8]) {
        self.reserve(data.len());
        self.bytes.extend_from_slice(data);
    }

    fn put_u8(&mut self, byte: u8) {
        self.put(&[byte]);
    }

    fn len(&self) -> usize {
        self.bytes.len()
    }

    fn patch_i32(&mut self, at: usize, value: i32) {
        self.bytes[at..at + 4].copy_from_slice(&value.to_le_bytes());
    }

    fn into_inner(self) -> Vec<u8> {
        self.bytes
    }
}

fn length_prefix(what: &'static str, len: usize) -> Result<i32, EncodeError> {
    i32::try_from(len).map_err(|_| EncodeError::TooLarge { what, len })
}

fn write_document(out: &mut OutputBuffer, doc: &Document) -> Result<(), EncodeError> {
    let start = out.len();
    // Placeholder, patched once the body length is known
    out.put(&[0; 4]);

    for element in doc {
        out.put_u8(element.element_type().tag());
        out.put(element.name().as_bytes());
        out.put_u8(0);
        write_value(out, element.value())?;
    }
    out.put_u8(0);

    let total = length_prefix("document", out.len() - start)?;
    out.patch_i32(start, total);
    Ok(())
}

fn write_value(out: &mut OutputBuffer, value: &Value) -> Result<(), EncodeError> {
    match value {
        Value::Double(f) => out.put(&f.to_le_bytes()),
        Value::String(s) => {
            let len = length_prefix("string", s.len() + 1)?;
            out.put(&len.to_le_bytes());
            out.put(s.as_bytes());
            out.put_u8(0);
        }
        Value::Document(doc) | Value::Array(doc) => write_document(out, doc)?,
        Value::ObjectId(oid) => out.put(&oid.bytes()),
        Value::Boolean(b) => out.put_u8(u8::from(*b)),
        Value::DateTime(ms) => out.put(&ms.to_le_bytes()),
        Value::Null => {}
        Value::Int32(i) => out.put(&i.to_le_bytes()),
        Value::Int64(i) => out.put(&i.to_le_bytes()),
    }
    Ok(())
}

//! Ordered, append-only documents.
//!
//! A [`Document`] is a list of named, typed [`Value`]s. Names are unique
//! within a document (exact, case-sensitive comparison) and elements are
//! never removed or replaced once added. Embedded documents and arrays are
//! moved into their parent, so a document tree can never contain a cycle.

use std::fmt;

/// BSON element type tags supported by the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ElementType {
    Double = 0x01,
    String = 0x02,
    EmbeddedDocument = 0x03,
    Array = 0x04,
    ObjectId = 0x07,
    Boolean = 0x08,
    DateTime = 0x09,
    Null = 0x0A,
    Int32 = 0x10,
    Int64 = 0x12,
}

impl ElementType {
    /// The tag byte written in front of the element name.
    pub fn tag(self) -> u8 {
        self as u8
    }
}

/// A 12-byte BSON ObjectId.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    /// Wrap raw ObjectId bytes.
    pub fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub fn bytes(&self) -> [u8; 12] {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

/// A typed element payload.
///
/// The element type is derived from the variant, so tag and payload can
/// never disagree.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Double(f64),
    String(String),
    Document(Document),
    /// A document whose names are the decimal indices `"0"`, `"1"`, ...
    Array(Document),
    ObjectId(ObjectId),
    Boolean(bool),
    /// Milliseconds since the Unix epoch
    DateTime(i64),
    Null,
    Int32(i32),
    Int64(i64),
}

impl Value {
    /// The BSON element type of this value.
    pub fn element_type(&self) -> ElementType {
        match self {
            Value::Double(_) => ElementType::Double,
            Value::String(_) => ElementType::String,
            Value::Document(_) => ElementType::EmbeddedDocument,
            Value::Array(_) => ElementType::Array,
            Value::ObjectId(_) => ElementType::ObjectId,
            Value::Boolean(_) => ElementType::Boolean,
            Value::DateTime(_) => ElementType::DateTime,
            Value::Null => ElementType::Null,
            Value::Int32(_) => ElementType::Int32,
            Value::Int64(_) => ElementType::Int64,
        }
    }
}

/// A single named element of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    value: Value,
}

impl Element {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn element_type(&self) -> ElementType {
        self.value.element_type()
    }
}

/// An ordered document with unique element names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    elements: Vec<Element>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty document with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
        }
    }

    /// Build an array document from values, naming them `"0"`, `"1"`, ...
    pub fn array_from<I: IntoIterator<Item = Value>>(values: I) -> Self {
        let elements = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| Element {
                name: i.to_string(),
                value,
            })
            .collect();
        Self { elements }
    }

    /// Append an element.
    ///
    /// Returns `false` and leaves the document untouched when `name` is
    /// empty, contains a NUL byte, or is already present.
    pub fn add(&mut self, name: &str, value: Value) -> bool {
        if name.is_empty() || name.contains('\0') || self.contains(name) {
            return false;
        }
        self.elements.push(Element {
            name: name.to_string(),
            value,
        });
        true
    }

    pub fn add_double(&mut self, name: &str, value: f64) -> bool {
        self.add(name, Value::Double(value))
    }

    pub fn add_string(&mut self, name: &str, value: impl Into<String>) -> bool {
        self.add(name, Value::String(value.into()))
    }

    /// Adopt `value` as an embedded document.
    pub fn add_document(&mut self, name: &str, value: Document) -> bool {
        self.add(name, Value::Document(value))
    }

    /// Adopt `value` as an array. Its element names should be `"0"`, `"1"`, ...
    pub fn add_array(&mut self, name: &str, value: Document) -> bool {
        self.add(name, Value::Array(value))
    }

    pub fn add_object_id(&mut self, name: &str, value: ObjectId) -> bool {
        self.add(name, Value::ObjectId(value))
    }

    pub fn add_bool(&mut self, name: &str, value: bool) -> bool {
        self.add(name, Value::Boolean(value))
    }

    /// Add a UTC datetime given in milliseconds since the epoch.
    pub fn add_datetime(&mut self, name: &str, millis: i64) -> bool {
        self.add(name, Value::DateTime(millis))
    }

    pub fn add_null(&mut self, name: &str) -> bool {
        self.add(name, Value::Null)
    }

    pub fn add_int32(&mut self, name: &str, value: i32) -> bool {
        self.add(name, Value::Int32(value))
    }

    pub fn add_int64(&mut self, name: &str, value: i64) -> bool {
        self.add(name, Value::Int64(value))
    }

    /// Check whether an element with this exact name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.elements.iter().any(|e| e.name == name)
    }

    /// Get the value of the element with this name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.elements
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.value)
    }

    /// Iterate over the elements in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//! Field schema of an EPF file.
//!
//! The schema is recovered from the header records and is fixed once the
//! header has been parsed.

use std::fmt;

/// Declared type of an EPF column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    BigInt,
    Integer,
    Boolean,
    Varchar,
    Datetime,
    LongText,
    Decimal,
}

impl FieldType {
    /// All field types, in `dbTypes:` matching order.
    pub const ALL: [FieldType; 7] = [
        FieldType::BigInt,
        FieldType::Integer,
        FieldType::Boolean,
        FieldType::Varchar,
        FieldType::Datetime,
        FieldType::LongText,
        FieldType::Decimal,
    ];

    /// The type name as written in a `dbTypes:` record.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::BigInt => "BIGINT",
            FieldType::Integer => "INTEGER",
            FieldType::Boolean => "BOOLEAN",
            FieldType::Varchar => "VARCHAR",
            FieldType::Datetime => "DATETIME",
            FieldType::LongText => "LONGTEXT",
            FieldType::Decimal => "DECIMAL",
        }
    }

    /// Match a type name by case-sensitive prefix.
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field_type| name.starts_with(field_type.as_str()))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a `dbTypes:` token of the form `TYPE`, `TYPE(n)` or `TYPE(n,m)`.
///
/// Returns the type and its capacity: `n` for the one-argument form, `1`
/// otherwise. Malformed arguments are ignored and also give a capacity of
/// `1`. Returns `None` when the type name is unknown.
pub fn parse_type_token(token: &str) -> Option<(FieldType, usize)> {
    let (name, capacity) = match token.split_once('(') {
        Some((name, arguments)) if !name.is_empty() => match parse_capacity(arguments) {
            Some(capacity) => (name, capacity),
            None => (token, 1),
        },
        _ => (token, 1),
    };
    FieldType::from_type_name(name).map(|field_type| (field_type, capacity))
}

fn parse_capacity(arguments: &str) -> Option<usize> {
    let arguments = arguments.strip_suffix(')').unwrap_or(arguments);
    match arguments.split_once(',') {
        Some((precision, scale)) => {
            precision.trim().parse::<i64>().ok()?;
            scale.trim().parse::<i64>().ok()?;
            Some(1)
        }
        None => arguments.trim().parse::<usize>().ok(),
    }
}

/// A single column of an EPF file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    /// Column name
    pub name: String,
    /// Declared type
    pub field_type: FieldType,
    /// Declared capacity, e.g. the `255` of `VARCHAR(255)`
    pub capacity: usize,
    /// Whether the column is part of the primary key
    pub indexed: bool,
}

impl FieldSchema {
    /// A column with only its name known yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Varchar,
            capacity: 1,
            indexed: false,
        }
    }
}

/// The ordered columns of an EPF file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldSchema>,
}

impl Schema {
    pub(crate) fn new(fields: Vec<FieldSchema>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldSchema> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Get a column by position.
    pub fn get_at(&self, index: usize) -> Option<&FieldSchema> {
        self.fields.get(index)
    }

    /// Columns flagged as primary key, in schema order.
    pub fn indexed(&self) -> impl Iterator<Item = &FieldSchema> {
        self.fields.iter().filter(|f| f.indexed)
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a FieldSchema;
    type IntoIter = std::slice::Iter<'a, FieldSchema>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//! EPF string → BSON value conversion.

use bson_wire::Value;
use epf_source::FieldType;
use thiserror::Error;

/// A field whose text does not parse as its declared type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to parse '{value}' as {expected_type}: {message}")]
pub struct EpfParseError {
    pub message: String,
    pub value: String,
    pub expected_type: FieldType,
}

impl EpfParseError {
    fn new(message: &str, value: &str, expected_type: FieldType) -> Self {
        Self {
            message: message.to_string(),
            value: value.to_string(),
            expected_type,
        }
    }
}

/// Parse an EPF field according to its declared type.
///
/// An empty field is `Null` whatever the declared type. Integers become
/// `Int32` when they fit in 32 bits and `Int64` otherwise. Datetimes are
/// seconds since the epoch and are stored as milliseconds.
pub fn epf_string_to_value(value: &str, field_type: FieldType) -> Result<Value, EpfParseError> {
    if value.is_empty() {
        return Ok(Value::Null);
    }

    match field_type {
        FieldType::BigInt | FieldType::Integer => {
            let i = value
                .parse::<i64>()
                .map_err(|_| EpfParseError::new("Invalid integer", value, field_type))?;
            Ok(match i32::try_from(i) {
                Ok(small) => Value::Int32(small),
                Err(_) => Value::Int64(i),
            })
        }

        // Anything but "0" is true
        FieldType::Boolean => Ok(Value::Boolean(value != "0")),

        FieldType::Varchar | FieldType::LongText => Ok(Value::String(value.to_string())),

        FieldType::Datetime => {
            let seconds = value
                .parse::<i64>()
                .map_err(|_| EpfParseError::new("Invalid timestamp", value, field_type))?;
            let millis = seconds
                .checked_mul(1000)
                .ok_or_else(|| EpfParseError::new("Timestamp out of range", value, field_type))?;
            Ok(Value::DateTime(millis))
        }

        FieldType::Decimal => value
            .parse::<f64>()
            .map(Value::Double)
            .map_err(|_| EpfParseError::new("Invalid decimal", value, field_type)),
    }
}

// Structured output records handed to the transport layer
// Field order is part of the output contract, so records keep an ordered
// field list rather than a hash map.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;

/// A single typed field value.
///
/// Floats carry a display-precision hint (decimal places) used when
/// rendering for humans; serialization emits the bare value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Float(f64, u8),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(value) => write!(f, "{}", value),
            FieldValue::Int(value) => write!(f, "{}", value),
            FieldValue::Float(value, precision) => {
                write!(f, "{:.*}", *precision as usize, value)
            }
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Str(value) => serializer.serialize_str(value),
            FieldValue::Int(value) => serializer.serialize_i64(*value),
            FieldValue::Float(value, _) => serializer.serialize_f64(*value),
        }
    }
}

/// One successfully decoded packet as named, typed fields.
///
/// The field set is fixed per protocol and always starts with the model
/// identifier. Exactly one record is emitted per successful decode.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    fields: Vec<(&'static str, FieldValue)>,
}

impl DecodedRecord {
    /// Start a record with the protocol's model identifier.
    pub fn new(model: &str) -> Self {
        Self {
            fields: vec![("model", FieldValue::Str(model.to_string()))],
        }
    }

    pub fn with_str(mut self, name: &'static str, value: &str) -> Self {
        self.fields.push((name, FieldValue::Str(value.to_string())));
        self
    }

    pub fn with_int(mut self, name: &'static str, value: i64) -> Self {
        self.fields.push((name, FieldValue::Int(value)));
        self
    }

    pub fn with_float(mut self, name: &'static str, value: f64, precision: u8) -> Self {
        self.fields.push((name, FieldValue::Float(value, precision)));
        self
    }

    /// The protocol's model identifier.
    pub fn model(&self) -> &str {
        match &self.fields[0].1 {
            FieldValue::Str(model) => model,
            _ => "",
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    /// Fields in emission order.
    pub fn fields(&self) -> &[(&'static str, FieldValue)] {
        &self.fields
    }

    /// Serialize to a JSON object preserving field order.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Serialize for DecodedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl fmt::Display for DecodedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}: {}", name, value)?;
        }
        Ok(())
    }
}

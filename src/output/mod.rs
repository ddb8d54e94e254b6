// Decoded record output contract

pub mod record;

pub use record::{DecodedRecord, FieldValue};

// Demodulated capture data model shared by all decoders

pub mod buffer;

pub use buffer::{BitBuffer, BitBufferError, Row};

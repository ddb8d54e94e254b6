// Packet integrity checks
// Each strategy validates one extracted byte run; decoders pick their
// protocol's strategy through the common Validator capability.

pub mod crc;
pub mod lookup;

pub use crc::{crc8, Crc8};
pub use lookup::TableChecksum;

/// An integrity check over an extracted packet candidate.
///
/// Implementations are pure: repeated calls with identical input yield
/// identical results, and no state is carried between calls.
pub trait Validator {
    fn validate(&self, bytes: &[u8]) -> bool;
}

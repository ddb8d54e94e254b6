// RFSENSOR-RS: stateless packet decoders for weather-station RF telemetry
// Copyright 2024 - Licensed under GPLv3

pub mod bitbuffer;
pub mod decoders;
pub mod integrity;
pub mod output;

// Re-export commonly used types
pub use bitbuffer::{BitBuffer, BitBufferError, Row};
pub use decoders::{
    get_decoder, init_decoders, list_decoders, run_decoders, DecodeError, DecodeResult,
    Modulation, ProtocolDescriptor,
};
pub use integrity::{crc8, Crc8, TableChecksum, Validator};
pub use output::{DecodedRecord, FieldValue};

/// RFSENSOR version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}

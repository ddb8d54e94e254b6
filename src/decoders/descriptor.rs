// Shared decoder contract: failure taxonomy and static protocol descriptors

use crate::bitbuffer::BitBuffer;
use crate::output::DecodedRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Terminal decode failures.
///
/// Every failure ends the invocation; the dispatch layer decides whether
/// to try the next candidate decoder or re-invoke with more data. No
/// failure is ever partially recovered into a record.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Capture shorter than the minimum frame size")]
    LengthTooShort,

    #[error("Preamble not found")]
    PreambleAbsent,

    #[error("Checksum or CRC mismatch")]
    ChecksumMismatch,

    #[error("Capture shape is not a candidate for this protocol")]
    StructuralAbort,
}

pub type DecodeResult = std::result::Result<DecodedRecord, DecodeError>;

/// Decode entry point shared by all sensor decoders.
///
/// Pure and synchronous: one attempt over one read-only capture.
pub type DecodeFn = fn(&BitBuffer) -> DecodeResult;

/// Pulse modulation scheme of a sensor's RF transmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modulation {
    /// On-off keying, pulse-width coded
    OokPulseWidth,
    /// On-off keying, Manchester coded with zero-bit framing
    OokManchesterZeroBit,
}

/// Static description of one supported sensor protocol.
///
/// Timing parameters are in microseconds; the dispatch layer matches them
/// against the pulse timings of a raw capture to decide which decoders to
/// attempt. `fields` lists the record keys in emission order.
#[derive(Debug, Clone, Copy)]
pub struct ProtocolDescriptor {
    pub name: &'static str,
    pub modulation: Modulation,
    pub short_width_us: f32,
    pub long_width_us: f32,
    pub gap_limit_us: f32,
    pub reset_limit_us: f32,
    pub sync_width_us: f32,
    pub decode: DecodeFn,
    pub fields: &'static [&'static str],
}

// Aldi Sempre Wetterstation 93716 temperature/humidity sensor
//
// 40-bit single-row packet, transmitted with inverted logic levels.
// Bit layout after inversion (inclusive ranges, 0-indexed):
//
//   |  0-7  | preamble remainder
//   |  8-15 | humidity, percent
//   | 16-17 | battery
//   | 18-19 | channel
//   | 20-31 | temperature, tenths of a degree C; bit 20 doubles as the
//   |       | sign flag, negative values are complemented against 0xfff
//   | 32-39 | checksum, table lookup keyed by b[1]^b[2]^b[3]

use super::descriptor::{DecodeError, DecodeResult, Modulation, ProtocolDescriptor};
use crate::bitbuffer::BitBuffer;
use crate::integrity::{TableChecksum, Validator};
use crate::output::DecodedRecord;

const MODEL: &str = "Aldi Sempre Wetterstation 93716";

const PREAMBLE: [u8; 1] = [0xf2];
const PREAMBLE_BITS: usize = 8;
const FRAME_BITS: usize = 40;

// Opaque protocol data, reproduced verbatim; not derivable from a formula
#[rustfmt::skip]
static CHECKSUM_TABLE: [u8; 256] = [
     97,  80,   3,  50, 165, 148, 199, 246, 216, 233, 186, 139,  28,  45, 126,  79,
     34,  19,  64, 113, 230, 215, 132, 181, 155, 170, 249, 200,  95, 110,  61,  12,
    231, 214, 133, 180,  35,  18,  65, 112,  94, 111,  60,  13, 154, 171, 248, 201,
    164, 149, 198, 247,  96,  81,   2,  51,  29,  44, 127,  78, 217, 232, 187, 138,
     92, 109,  62,  15, 152, 169, 250, 203, 229, 212, 135, 182,  33,  16,  67, 114,
     31,  46, 125,  76, 219, 234, 185, 136, 166, 151, 196, 245,  98,  83,   0,  49,
    218, 235, 184, 137,  30,  47, 124,  77,  99,  82,   1,  48, 167, 150, 197, 244,
    153, 168, 251, 202,  93, 108,  63,  14,  32,  17,  66, 115, 228, 213, 134, 183,
     27,  42, 121,  72, 223, 238, 189, 140, 162, 147, 192, 241, 102,  87,   4,  53,
     88, 105,  58,  11, 156, 173, 254, 207, 225, 208, 131, 178,  37,  20,  71, 118,
    157, 172, 255, 206,  89, 104,  59,  10,  36,  21,  70, 119, 224, 209, 130, 179,
    222, 239, 188, 141,  26,  43, 120,  73, 103,  86,   5,  52, 163, 146, 193, 240,
     38,  23,  68, 117, 226, 211, 128, 177, 159, 174, 253, 204,  91, 106,  57,   8,
    101,  84,   7,  54, 161, 144, 195, 242, 220, 237, 190, 143,  24,  41, 122,  75,
    160, 145, 194, 243, 100,  85,   6,  55,  25,  40, 123,  74, 221, 236, 191, 142,
    227, 210, 129, 176,  39,  22,  69, 116,  90, 107,  56,   9, 158, 175, 252, 205,
];

static VALIDATOR: TableChecksum = TableChecksum::new(&CHECKSUM_TABLE, 1, 4);

/// Sign-magnitude temperature field: when the sign flag is set, the raw
/// 12-bit value is complemented against the full 12-bit mask and negated.
fn decode_temperature(raw: u16, negative: bool) -> f64 {
    if negative {
        -((raw ^ 0x0fff) as f64 / 10.0)
    } else {
        raw as f64 / 10.0
    }
}

pub fn decode(buffer: &BitBuffer) -> DecodeResult {
    if buffer.num_rows() == 0 {
        return Err(DecodeError::LengthTooShort);
    }
    if buffer.num_rows() > 1 {
        return Err(DecodeError::StructuralAbort);
    }
    let row = &buffer.rows()[0];

    let pos = row.search(0, &PREAMBLE, PREAMBLE_BITS);
    if pos >= row.num_bits() {
        tracing::debug!("{}: preamble not found", MODEL);
        return Err(DecodeError::PreambleAbsent);
    }
    if row.num_bits() - pos < FRAME_BITS {
        tracing::debug!("{}: too short", MODEL);
        return Err(DecodeError::LengthTooShort);
    }

    let mut b = row
        .extract_bytes(pos, FRAME_BITS)
        .map_err(|_| DecodeError::LengthTooShort)?;
    for byte in b.iter_mut() {
        *byte ^= 0xff; // inverted logic levels
    }
    tracing::debug!("{}: MSG {:02x?}", MODEL, b);

    if !VALIDATOR.validate(&b) {
        tracing::debug!("{}: checksum mismatch", MODEL);
        return Err(DecodeError::ChecksumMismatch);
    }

    let humidity = b[1] as i64;
    let battery = (b[2] >> 6) as i64;
    let channel = ((b[2] >> 4) & 0x3) as i64;
    let raw = u16::from(b[2] & 0x0f) << 8 | u16::from(b[3]);
    let temperature = decode_temperature(raw, b[2] & 0x08 != 0);

    Ok(DecodedRecord::new(MODEL)
        .with_int("battery", battery)
        .with_int("channel", channel)
        .with_int("humidity", humidity)
        .with_float("temperature_C", temperature, 1))
}

pub static ALDI_SEMPRE: ProtocolDescriptor = ProtocolDescriptor {
    name: MODEL,
    modulation: Modulation::OokPulseWidth,
    short_width_us: 244.0,
    long_width_us: 608.0,
    gap_limit_us: 0.0,
    reset_limit_us: 868.0,
    sync_width_us: 852.0,
    decode,
    fields: &["model", "battery", "channel", "humidity", "temperature_C"],
};

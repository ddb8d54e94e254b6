// Wind/rotation sensor, Manchester-coded
//
// 16-bit preamble 0x5f 0xb4 followed by a 32-bit payload:
//
//   | byte 0 | rotation count, x0.1
//   | byte 1 | wind speed, x0.1 km/h
//   | byte 2 | gust, x0.1 km/h
//   | byte 3 | CRC-8, poly 0x31, init 0xc0, zero residual over all four

use super::descriptor::{DecodeError, DecodeResult, Modulation, ProtocolDescriptor};
use crate::bitbuffer::BitBuffer;
use crate::integrity::{Crc8, Validator};
use crate::output::DecodedRecord;

const MODEL: &str = "Wind test";

const PREAMBLE: [u8; 2] = [0x5f, 0xb4];
const PREAMBLE_BITS: usize = 16;
const PAYLOAD_BITS: usize = 32;
const MIN_ROW_BITS: usize = 47;
const MAX_ROWS: usize = 2;

static VALIDATOR: Crc8 = Crc8::new(0x31, 0xc0);

pub fn decode(buffer: &BitBuffer) -> DecodeResult {
    if buffer.num_rows() > MAX_ROWS {
        return Err(DecodeError::StructuralAbort);
    }
    if buffer.num_rows() == 0
        || buffer.rows().iter().all(|row| row.num_bits() < MIN_ROW_BITS)
    {
        return Err(DecodeError::LengthTooShort);
    }

    // Rows are repeated transmissions; the first one carrying the
    // preamble with a full payload behind it wins.
    let mut payload = None;
    for row in buffer.rows() {
        let pos = row.search(0, &PREAMBLE, PREAMBLE_BITS) + PREAMBLE_BITS;
        if pos + PAYLOAD_BITS > row.num_bits() {
            continue; // preamble absent or too few trailing bits
        }
        let bytes = row
            .extract_bytes(pos, PAYLOAD_BITS)
            .map_err(|_| DecodeError::LengthTooShort)?;
        tracing::debug!("{}: MSG {:02x?}", MODEL, bytes);
        payload = Some(bytes);
        break;
    }

    let b = match payload {
        Some(bytes) => bytes,
        None => {
            tracing::debug!("{}: preamble not found", MODEL);
            return Err(DecodeError::PreambleAbsent);
        }
    };

    if !VALIDATOR.validate(&b) {
        tracing::debug!("{}: CRC-8 mismatch", MODEL);
        return Err(DecodeError::ChecksumMismatch);
    }

    let rotations = f64::from(b[0]) * 0.1;
    let wind = f64::from(b[1]) * 0.1;
    let gust = f64::from(b[2]) * 0.1;

    Ok(DecodedRecord::new(MODEL)
        .with_float("rotations", rotations, 1)
        .with_float("wind", wind, 1)
        .with_float("gust", gust, 1)
        .with_str("mic", "CRC"))
}

pub static WIND_TESTER: ProtocolDescriptor = ProtocolDescriptor {
    name: MODEL,
    modulation: Modulation::OokManchesterZeroBit,
    short_width_us: 500.0,
    long_width_us: 0.0,
    gap_limit_us: 1200.0,
    reset_limit_us: 1200.0,
    sync_width_us: 0.0,
    decode,
    fields: &["model", "rotations", "wind", "gust", "mic"],
};

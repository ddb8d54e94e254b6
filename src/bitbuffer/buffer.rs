// Bit-level capture buffer as handed over by the pulse demodulation stage
// Rows are packed MSB-first with an explicit bit-length; multiple rows
// usually hold repeated transmissions of the same packet.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BitBufferError {
    #[error("Bit range {offset}+{count} exceeds row length {len}")]
    RangeOutOfBounds {
        offset: usize,
        count: usize,
        len: usize,
    },

    #[error("Malformed row code: {0}")]
    MalformedCode(String),
}

pub type Result<T> = std::result::Result<T, BitBufferError>;

/// One demodulated bit sequence.
///
/// The bit-length is authoritative: trailing bits of the last byte beyond
/// it are never read. Rows are read-only to decoders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    bytes: Vec<u8>,
    num_bits: usize,
}

impl Row {
    /// Create a row from MSB-first packed bytes and a bit-length.
    /// A bit-length larger than the byte capacity is clamped.
    pub fn new(bytes: Vec<u8>, num_bits: usize) -> Self {
        let num_bits = num_bits.min(bytes.len() * 8);
        Self { bytes, num_bits }
    }

    /// Build a row from individual bits, most significant first.
    pub fn from_bits(bits: &[bool]) -> Self {
        let mut bytes = vec![0u8; (bits.len() + 7) / 8];
        for (i, &bit) in bits.iter().enumerate() {
            if bit {
                bytes[i >> 3] |= 0x80 >> (i & 7);
            }
        }
        Self {
            bytes,
            num_bits: bits.len(),
        }
    }

    /// Number of valid bits in this row.
    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    /// Single bit access; `None` past the end of the row.
    pub fn bit(&self, index: usize) -> Option<bool> {
        if index >= self.num_bits {
            return None;
        }
        Some(self.bit_unchecked(index))
    }

    fn bit_unchecked(&self, index: usize) -> bool {
        (self.bytes[index >> 3] >> (7 - (index & 7))) & 1 != 0
    }

    /// Find the first occurrence of a bit pattern at or after `start`.
    ///
    /// The pattern occupies the leading `pattern_bits` bits of `pattern`,
    /// MSB-first; it does not have to be byte-aligned in the row. Returns
    /// the bit offset of the match, or a value >= `num_bits()` when the
    /// pattern does not occur. The match is exact, with no wraparound.
    pub fn search(&self, start: usize, pattern: &[u8], pattern_bits: usize) -> usize {
        debug_assert!(pattern_bits <= pattern.len() * 8);
        if pattern_bits == 0 {
            return start;
        }
        if self.num_bits < pattern_bits {
            return self.num_bits;
        }
        for pos in start..=(self.num_bits - pattern_bits) {
            let mut matched = true;
            for i in 0..pattern_bits {
                let want = (pattern[i >> 3] >> (7 - (i & 7))) & 1 != 0;
                if self.bit_unchecked(pos + i) != want {
                    matched = false;
                    break;
                }
            }
            if matched {
                return pos;
            }
        }
        self.num_bits
    }

    /// Copy exactly `count` bits starting at `offset` into an MSB-first
    /// byte buffer. The range is checked against the row's bit-length
    /// before anything is copied.
    pub fn extract_bytes(&self, offset: usize, count: usize) -> Result<Vec<u8>> {
        if offset + count > self.num_bits {
            return Err(BitBufferError::RangeOutOfBounds {
                offset,
                count,
                len: self.num_bits,
            });
        }
        let mut out = vec![0u8; (count + 7) / 8];
        for i in 0..count {
            if self.bit_unchecked(offset + i) {
                out[i >> 3] |= 0x80 >> (i & 7);
            }
        }
        Ok(out)
    }
}

impl FromStr for Row {
    type Err = BitBufferError;

    /// Parse the textual row code `{nbits}hexdigits`, e.g. `{40}f2cd7ff2b6`.
    /// An odd trailing hex digit supplies the high nibble of the last byte.
    fn from_str(s: &str) -> Result<Self> {
        let re = regex::Regex::new(r"^\{(\d+)\}([0-9A-Fa-f]*)$").unwrap();
        let caps = re
            .captures(s.trim())
            .ok_or_else(|| BitBufferError::MalformedCode(s.to_string()))?;
        let num_bits: usize = caps[1]
            .parse()
            .map_err(|_| BitBufferError::MalformedCode(s.to_string()))?;

        let digits = &caps[2];
        let mut bytes = Vec::with_capacity((digits.len() + 1) / 2);
        for i in (0..digits.len()).step_by(2) {
            let pair = &digits[i..(i + 2).min(digits.len())];
            let value = u8::from_str_radix(pair, 16)
                .map_err(|_| BitBufferError::MalformedCode(s.to_string()))?;
            bytes.push(if pair.len() == 1 { value << 4 } else { value });
        }

        if num_bits > bytes.len() * 8 {
            return Err(BitBufferError::MalformedCode(s.to_string()));
        }
        Ok(Row::new(bytes, num_bits))
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.num_bits)?;
        for byte in &self.bytes[..(self.num_bits + 7) / 8] {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Ordered collection of rows making up one capture.
///
/// Created by the demodulation stage, consumed read-only by one decode
/// attempt per decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitBuffer {
    rows: Vec<Row>,
}

impl BitBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }
}

impl FromIterator<Row> for BitBuffer {
    fn from_iter<T: IntoIterator<Item = Row>>(iter: T) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_access() {
        let row = Row::new(vec![0b1010_0001], 8);
        assert_eq!(row.bit(0), Some(true));
        assert_eq!(row.bit(1), Some(false));
        assert_eq!(row.bit(7), Some(true));
        assert_eq!(row.bit(8), None);
    }

    #[test]
    fn test_bit_length_is_authoritative() {
        let row = Row::new(vec![0xff, 0xff], 12);
        assert_eq!(row.num_bits(), 12);
        assert_eq!(row.bit(11), Some(true));
        assert_eq!(row.bit(12), None);

        // Length beyond the byte capacity is clamped
        let row = Row::new(vec![0xff], 20);
        assert_eq!(row.num_bits(), 8);
    }

    #[test]
    fn test_from_bits() {
        let row = Row::from_bits(&[true, false, true, true, false]);
        assert_eq!(row.num_bits(), 5);
        assert_eq!(row.bit(0), Some(true));
        assert_eq!(row.bit(1), Some(false));
        assert_eq!(row.bit(3), Some(true));
        assert_eq!(row.bit(4), Some(false));
    }

    #[test]
    fn test_search_aligned() {
        let row = Row::new(vec![0x00, 0xf2, 0xab], 24);
        assert_eq!(row.search(0, &[0xf2], 8), 8);
    }

    #[test]
    fn test_search_unaligned() {
        // Pattern 0xf2 placed 3 arbitrary bits into the row
        let mut bits = vec![false, true, false];
        for i in 0..8 {
            bits.push((0xf2u8 >> (7 - i)) & 1 != 0);
        }
        bits.extend([true, false, true, true, false]);
        let row = Row::from_bits(&bits);
        assert_eq!(row.search(0, &[0xf2], 8), 3);
    }

    #[test]
    fn test_search_respects_start() {
        let row = Row::new(vec![0xf2, 0x00, 0xf2], 24);
        assert_eq!(row.search(0, &[0xf2], 8), 0);
        assert_eq!(row.search(1, &[0xf2], 8), 16);
    }

    #[test]
    fn test_search_not_found() {
        let row = Row::new(vec![0x00, 0x00, 0x00], 24);
        assert!(row.search(0, &[0xf2], 8) >= row.num_bits());

        // Row shorter than the pattern
        let row = Row::new(vec![0xf0], 4);
        assert!(row.search(0, &[0xf2], 8) >= row.num_bits());
    }

    #[test]
    fn test_search_sub_byte_pattern() {
        // 12-bit pattern 0x5fb in the middle of a row
        let row = Row::new(vec![0x05, 0xfb, 0x40], 24);
        assert_eq!(row.search(0, &[0x5f, 0xb0], 12), 4);
    }

    #[test]
    fn test_extract_aligned() {
        let row = Row::new(vec![0x12, 0x34, 0x56], 24);
        assert_eq!(row.extract_bytes(0, 16).unwrap(), vec![0x12, 0x34]);
        assert_eq!(row.extract_bytes(8, 16).unwrap(), vec![0x34, 0x56]);
    }

    #[test]
    fn test_extract_unaligned() {
        // 0x12 0x34 shifted left by 4: extraction at offset 4 realigns it
        let row = Row::new(vec![0x01, 0x23, 0x40], 20);
        assert_eq!(row.extract_bytes(4, 16).unwrap(), vec![0x12, 0x34]);
    }

    #[test]
    fn test_extract_bounds_checked() {
        let row = Row::new(vec![0x12, 0x34], 16);
        assert!(row.extract_bytes(0, 17).is_err());
        assert!(row.extract_bytes(9, 8).is_err());
        assert!(row.extract_bytes(8, 8).is_ok());
    }

    #[test]
    fn test_row_code_parsing() {
        let row: Row = "{40}f2cd7ff2b6".parse().unwrap();
        assert_eq!(row.num_bits(), 40);
        assert_eq!(row.extract_bytes(0, 40).unwrap(), vec![0xf2, 0xcd, 0x7f, 0xf2, 0xb6]);

        // Bit-length may be shorter than the hex digits cover
        let row: Row = "{12}5fb4".parse().unwrap();
        assert_eq!(row.num_bits(), 12);

        // Odd trailing digit is the high nibble
        let row: Row = "{12}5fb".parse().unwrap();
        assert_eq!(row.num_bits(), 12);
        assert_eq!(row.extract_bytes(0, 12).unwrap(), vec![0x5f, 0xb0]);
    }

    #[test]
    fn test_row_code_rejects_garbage() {
        assert!("".parse::<Row>().is_err());
        assert!("f2cd".parse::<Row>().is_err());
        assert!("{40}".parse::<Row>().is_err());
        assert!("{8}zz".parse::<Row>().is_err());
    }

    #[test]
    fn test_row_code_round_trip() {
        let code = "{40}f2cd7ff2b6";
        let row: Row = code.parse().unwrap();
        assert_eq!(row.to_string(), code);
    }

    #[test]
    fn test_bitbuffer_rows() {
        let mut buffer = BitBuffer::new();
        assert_eq!(buffer.num_rows(), 0);
        buffer.push_row(Row::new(vec![0xf2], 8));
        buffer.push_row(Row::new(vec![0x5f, 0xb4], 16));
        assert_eq!(buffer.num_rows(), 2);
        assert_eq!(buffer.row(0).unwrap().num_bits(), 8);
        assert_eq!(buffer.row(1).unwrap().num_bits(), 16);
        assert!(buffer.row(2).is_none());
    }

    #[test]
    fn test_bitbuffer_from_iterator() {
        let buffer: BitBuffer = vec![Row::new(vec![0xf2], 8), Row::new(vec![0x00], 8)]
            .into_iter()
            .collect();
        assert_eq!(buffer.num_rows(), 2);
    }
}

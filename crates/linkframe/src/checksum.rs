use crc::{Crc, CRC_16_IBM_3740};

/// CRC-16/IBM-3740 (poly 0x1021, init 0xFFFF, unreflected).
const CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_IBM_3740);

/// Checksum algorithm carried in the high nibble of the format byte.
///
/// The id space is closed: a header announcing any other nibble is rejected
/// during decoding. Each variant also fixes the width of the trailing check
/// field, so both ends derive frame boundaries from the format byte alone.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Checksum {
    /// No integrity check and no check field.
    None = 0,
    /// Wrapping 8-bit byte sum, one check byte.
    Sum8 = 1,
    /// Wrapping 16-bit byte sum, two check bytes.
    Sum16 = 2,
    /// CRC-16/IBM-3740 (poly 0x1021, init 0xFFFF), two check bytes.
    Crc16 = 3,
    /// CRC-32/ISO-HDLC (the IEEE polynomial), four check bytes.
    Crc32 = 4,
}

impl Checksum {
    /// Every algorithm, in wire-id order.
    pub const ALL: [Checksum; 5] = [
        Checksum::None,
        Checksum::Sum8,
        Checksum::Sum16,
        Checksum::Crc16,
        Checksum::Crc32,
    ];

    /// Look up an algorithm by its wire id.
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Checksum::None),
            1 => Some(Checksum::Sum8),
            2 => Some(Checksum::Sum16),
            3 => Some(Checksum::Crc16),
            4 => Some(Checksum::Crc32),
            _ => None,
        }
    }

    /// Parse the algorithm out of a format byte.
    ///
    /// The id lives in the high nibble; the low nibble is reserved and
    /// ignored on receive.
    pub const fn from_format_byte(format: u8) -> Option<Self> {
        Self::from_id(format >> 4)
    }

    /// Wire id of this algorithm.
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Format byte announcing this algorithm (id in the high nibble, low
    /// nibble zero).
    pub const fn format_byte(self) -> u8 {
        (self as u8) << 4
    }

    /// Width of the trailing check field in bytes.
    pub const fn check_len(self) -> usize {
        match self {
            Checksum::None => 0,
            Checksum::Sum8 => 1,
            Checksum::Sum16 | Checksum::Crc16 => 2,
            Checksum::Crc32 => 4,
        }
    }

    /// Compute the check value over `span`, zero-extended to 32 bits.
    pub fn compute(self, span: &[u8]) -> u32 {
        match self {
            Checksum::None => 0,
            Checksum::Sum8 => u32::from(span.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))),
            Checksum::Sum16 => u32::from(
                span.iter()
                    .fold(0u16, |acc, &b| acc.wrapping_add(u16::from(b))),
            ),
            Checksum::Crc16 => u32::from(CRC16.checksum(span)),
            Checksum::Crc32 => crc32fast::hash(span),
        }
    }

    /// Read a transmitted check value: `check_len` big-endian bytes.
    pub fn read_check(self, bytes: &[u8]) -> u32 {
        bytes[..self.check_len()]
            .iter()
            .fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
    }

    /// Write `value` into `out` as `check_len` big-endian bytes.
    pub fn write_check(self, value: u32, out: &mut [u8]) {
        let n = self.check_len();
        out[..n].copy_from_slice(&value.to_be_bytes()[4 - n..]);
    }
}

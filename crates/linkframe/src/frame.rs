use std::time::Duration;

use crate::checksum::Checksum;

/// Default frame start byte: `'$'`.
pub const SYNC_BYTE: u8 = b'$';

/// Largest total packet length the 16-bit length field can declare.
pub const MAX_PACKET_LEN: usize = u16::MAX as usize;

/// Header bytes after the sync word: format (1) + packet length (2).
const POST_SYNC_LEN: usize = 3;

/// Frame start marker, fixed per link when the codec is built.
///
/// A second sync byte costs one byte of overhead per frame and buys a much
/// lower false-start rate on noisy links. Both ends must agree on the
/// variant; it is never negotiated on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncWord {
    /// One marker byte.
    Single(u8),
    /// Two marker bytes; the second must directly follow the first.
    Dual(u8, u8),
}

impl SyncWord {
    /// Number of sync bytes on the wire.
    pub const fn width(self) -> usize {
        match self {
            SyncWord::Single(_) => 1,
            SyncWord::Dual(_, _) => 2,
        }
    }

    /// First (or only) sync byte.
    pub const fn first(self) -> u8 {
        match self {
            SyncWord::Single(b) | SyncWord::Dual(b, _) => b,
        }
    }

    /// Second sync byte, if the word has one.
    pub const fn second(self) -> Option<u8> {
        match self {
            SyncWord::Single(_) => None,
            SyncWord::Dual(_, b) => Some(b),
        }
    }

    /// Full header length: sync word + format byte + 16-bit packet length.
    pub const fn header_len(self) -> usize {
        self.width() + POST_SYNC_LEN
    }
}

impl Default for SyncWord {
    fn default() -> Self {
        SyncWord::Single(SYNC_BYTE)
    }
}

/// Largest payload a frame can carry with the given sync word and checksum.
///
/// The 16-bit length field counts the whole packet, so header and check
/// field overhead comes out of the payload budget.
pub const fn max_payload(sync: SyncWord, checksum: Checksum) -> usize {
    MAX_PACKET_LEN - sync.header_len() - checksum.check_len()
}

/// Configuration shared by both directions of one link.
///
/// Encoder and decoder each use the fields that apply to them; keeping a
/// single struct makes it hard for the two ends of a link to drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameConfig {
    /// Frame start marker. Default: single `'$'`.
    pub sync: SyncWord,
    /// Abandon a partial frame when the gap between two received bytes
    /// exceeds this bound. `None` (the default) keeps partial frames
    /// pending indefinitely.
    pub interbyte_timeout: Option<Duration>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            sync: SyncWord::default(),
            interbyte_timeout: None,
        }
    }
}

/// Errors that can occur while building a frame.
///
/// Only the transmit path reports errors. The receive path treats every
/// malformed input as line noise and resynchronizes silently; see
/// [`DecodeStats`](crate::DecodeStats) for its counters.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// The payload does not fit the 16-bit packet length field.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The destination buffer is smaller than the encoded frame.
    #[error("output buffer too small ({needed} bytes needed, {capacity} available)")]
    BufferTooSmall { needed: usize, capacity: usize },
}

pub type Result<T> = std::result::Result<T, EncodeError>;

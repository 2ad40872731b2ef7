//! Incremental byte-stream framing for unreliable serial links.
//!
//! Turns a raw byte stream (no message boundaries, no integrity guarantee)
//! into discrete, checksum-validated messages, and builds the matching
//! outgoing frames. Each frame is:
//!
//! - a one- or two-byte sync word for boundary recovery in noise
//! - a format byte selecting the checksum algorithm (high nibble)
//! - a 16-bit big-endian total packet length
//! - the payload
//! - a trailing big-endian check value (0 to 4 bytes, per algorithm)
//!
//! Decoding is push-driven and allocation-free after construction: feed
//! [`FrameDecoder::push_byte`] from any transport (UART ISR drain, socket
//! read loop, replay file) and every validated payload reaches the bound
//! [`MessageSink`] exactly once. Corruption, noise, truncation, and
//! oversized frames all resolve to a silent resync and a counter in
//! [`DecodeStats`].
//!
//! # Example
//!
//! ```
//! use linkframe::{Checksum, FrameDecoder, FrameEncoder, MessageSink};
//!
//! #[derive(Default)]
//! struct Collect {
//!     messages: Vec<Vec<u8>>,
//! }
//!
//! impl MessageSink for Collect {
//!     fn on_message(&mut self, payload: &[u8]) {
//!         self.messages.push(payload.to_vec());
//!     }
//! }
//!
//! let mut encoder = FrameEncoder::new(256);
//! let wire = encoder.encode(Checksum::Sum16, b"ok").unwrap().to_vec();
//!
//! let mut decoder = FrameDecoder::new(256, Collect::default());
//! decoder.push_bytes(&wire);
//!
//! assert_eq!(decoder.stats().frames_delivered, 1);
//! assert_eq!(decoder.into_sink().messages, vec![b"ok".to_vec()]);
//! ```

pub mod checksum;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod frame;
pub mod sink;

pub use checksum::Checksum;
pub use decoder::{DecodeStats, FrameDecoder};
pub use encoder::{encode_frame, encode_into, FrameEncoder};
pub use error::{EncodeError, Result};
pub use frame::{max_payload, FrameConfig, SyncWord, MAX_PACKET_LEN, SYNC_BYTE};
pub use sink::MessageSink;

use std::time::Instant;

use tracing::{debug, trace};

use crate::checksum::Checksum;
use crate::frame::{FrameConfig, MAX_PACKET_LEN};
use crate::sink::MessageSink;

/// Monotonic counters for everything a decoder has seen.
///
/// The receive path never surfaces errors: a corrupted frame and plain line
/// noise are both just silence at the sink. These counters are how callers
/// tell a quiet link from a broken one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
    /// Frames that passed validation and reached the sink.
    pub frames_delivered: u64,
    /// Bytes dropped while hunting for a sync byte.
    pub bytes_discarded: u64,
    /// False starts: the byte after the first sync byte was not the second.
    pub sync_mismatches: u64,
    /// Headers announcing an unknown checksum algorithm id.
    pub invalid_algorithms: u64,
    /// Headers announcing a packet length outside the accepted bounds.
    pub length_rejects: u64,
    /// Completed frames whose check value did not match.
    pub checksum_mismatches: u64,
    /// Frames abandoned because a byte would not fit the receive buffer.
    pub overflow_aborts: u64,
    /// Frames abandoned by the inter-byte deadline.
    pub timeout_aborts: u64,
}

#[derive(Debug, Clone, Copy)]
enum State {
    /// Hunting for the first sync byte.
    Idle,
    /// First byte of a dual sync word seen, waiting for the second.
    PartialSync,
    /// Sync word accepted, collecting format and length.
    Header,
    /// Header accepted, collecting payload and check field.
    Body { packet_len: usize, checksum: Checksum },
}

/// Incremental frame parser for one receive direction of a link.
///
/// Feed it the raw stream one byte at a time, in arrival order; every frame
/// that parses cleanly and passes its checksum is handed to the sink
/// exactly once. Anything else, from line noise to a corrupted check value,
/// drops the partial frame and resumes the sync hunt without surfacing an
/// error. The receive buffer is allocated once at construction; decoding
/// never allocates.
pub struct FrameDecoder<S> {
    config: FrameConfig,
    sink: S,
    buf: Box<[u8]>,
    filled: usize,
    state: State,
    stats: DecodeStats,
    last_byte_at: Option<Instant>,
}

impl<S: MessageSink> FrameDecoder<S> {
    /// Create a decoder with the default configuration.
    ///
    /// `capacity` fixes the receive buffer size for the life of the
    /// decoder. It must cover the header, the largest expected payload, and
    /// the check field; frames declaring more than `capacity` bytes are
    /// dropped by the length bounds check.
    pub fn new(capacity: usize, sink: S) -> Self {
        Self::with_config(capacity, FrameConfig::default(), sink)
    }

    /// Create a decoder with explicit configuration.
    pub fn with_config(capacity: usize, config: FrameConfig, sink: S) -> Self {
        Self {
            config,
            sink,
            buf: vec![0u8; capacity].into_boxed_slice(),
            filled: 0,
            state: State::Idle,
            stats: DecodeStats::default(),
            last_byte_at: None,
        }
    }

    /// Consume one byte from the stream.
    ///
    /// Invokes the sink zero or one times and never fails; progress is
    /// observable only through sink calls and [`stats`](Self::stats).
    pub fn push_byte(&mut self, byte: u8) {
        self.expire_stalled_frame();

        match self.state {
            State::Idle => {
                if byte == self.config.sync.first() {
                    if self.buffer(byte) {
                        self.state = match self.config.sync.second() {
                            Some(_) => State::PartialSync,
                            None => State::Header,
                        };
                    }
                } else {
                    self.stats.bytes_discarded += 1;
                }
            }
            State::PartialSync => {
                // Strict comparison; the mismatched byte is discarded with
                // the false start rather than re-examined as a frame start.
                if Some(byte) == self.config.sync.second() {
                    if self.buffer(byte) {
                        self.state = State::Header;
                    }
                } else {
                    self.stats.sync_mismatches += 1;
                    debug!(byte, "second sync byte mismatch, dropping frame start");
                    self.restart();
                }
            }
            State::Header => {
                if self.buffer(byte) && self.filled == self.config.sync.header_len() {
                    self.parse_header();
                }
            }
            State::Body {
                packet_len,
                checksum,
            } => {
                if self.buffer(byte) && self.filled == packet_len {
                    self.finish_frame(packet_len, checksum);
                }
            }
        }
    }

    /// Consume a run of bytes in stream order.
    ///
    /// Equivalent to one [`push_byte`](Self::push_byte) call per byte; the
    /// sink can fire several times within a single call.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.push_byte(byte);
        }
    }

    /// Drop any partial frame and resume the sync hunt.
    ///
    /// Counters are kept; only the stream position is forgotten. Useful
    /// after the transport reports a discontinuity (reconnect, flush).
    pub fn reset(&mut self) {
        self.restart();
    }

    /// Counters accumulated since construction.
    pub fn stats(&self) -> DecodeStats {
        self.stats
    }

    /// True when no partial frame is pending.
    pub fn is_idle(&self) -> bool {
        matches!(self.state, State::Idle)
    }

    /// Receive buffer capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Current decoder configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// Borrow the sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutably borrow the sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the decoder and return the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Append one byte to the frame under construction.
    ///
    /// Returns `false` when the buffer is full, in which case the frame has
    /// been dropped and the decoder is idle again.
    fn buffer(&mut self, byte: u8) -> bool {
        if self.filled >= self.buf.len() {
            self.stats.overflow_aborts += 1;
            debug!(
                capacity = self.buf.len(),
                "receive buffer exhausted, dropping frame"
            );
            self.restart();
            return false;
        }
        self.buf[self.filled] = byte;
        self.filled += 1;
        if self.config.interbyte_timeout.is_some() {
            self.last_byte_at = Some(Instant::now());
        }
        true
    }

    fn parse_header(&mut self) {
        let sync_width = self.config.sync.width();
        let header_len = self.config.sync.header_len();
        let format = self.buf[sync_width];
        let declared = usize::from(u16::from_be_bytes([
            self.buf[sync_width + 1],
            self.buf[sync_width + 2],
        ]));

        let Some(checksum) = Checksum::from_format_byte(format) else {
            self.stats.invalid_algorithms += 1;
            debug!(format, "unknown checksum algorithm id, dropping frame");
            self.restart();
            return;
        };

        // A packet must hold at least its own header and check field, and
        // must fit both the length field and the receive buffer.
        let min_len = header_len + checksum.check_len();
        let max_len = self.buf.len().min(MAX_PACKET_LEN);
        if declared < min_len || declared > max_len {
            self.stats.length_rejects += 1;
            debug!(
                declared,
                min_len, max_len, "declared packet length out of bounds, dropping frame"
            );
            self.restart();
            return;
        }

        if declared == self.filled {
            // A zero-payload unchecked frame is complete with its header;
            // it must not wait for (and swallow) the next frame's byte.
            self.finish_frame(declared, checksum);
        } else {
            self.state = State::Body {
                packet_len: declared,
                checksum,
            };
        }
    }

    fn finish_frame(&mut self, packet_len: usize, checksum: Checksum) {
        let sync_width = self.config.sync.width();
        let header_len = self.config.sync.header_len();
        let body_end = packet_len - checksum.check_len();

        let valid = match checksum {
            Checksum::None => true,
            _ => {
                let received = checksum.read_check(&self.buf[body_end..packet_len]);
                let computed = checksum.compute(&self.buf[sync_width..body_end]);
                if received != computed {
                    self.stats.checksum_mismatches += 1;
                    debug!(
                        received,
                        computed,
                        ?checksum,
                        "check value mismatch, dropping frame"
                    );
                }
                received == computed
            }
        };

        if valid {
            self.stats.frames_delivered += 1;
            trace!(packet_len, ?checksum, "frame delivered");
            self.sink.on_message(&self.buf[header_len..body_end]);
        }
        self.restart();
    }

    fn expire_stalled_frame(&mut self) {
        if matches!(self.state, State::Idle) {
            return;
        }
        let (Some(deadline), Some(last)) = (self.config.interbyte_timeout, self.last_byte_at)
        else {
            return;
        };
        if last.elapsed() > deadline {
            self.stats.timeout_aborts += 1;
            debug!(?deadline, "inter-byte deadline exceeded, dropping partial frame");
            self.restart();
        }
    }

    fn restart(&mut self) {
        self.state = State::Idle;
        self.filled = 0;
        self.last_byte_at = None;
    }
}

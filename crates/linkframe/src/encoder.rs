use bytes::BytesMut;

use crate::checksum::Checksum;
use crate::error::{EncodeError, Result};
use crate::frame::{max_payload, FrameConfig, SyncWord, MAX_PACKET_LEN};

/// Encode one frame into `out`, returning the number of bytes written.
///
/// Wire format:
/// ```text
/// ┌─────────────┬──────────────┬───────────┬──────────┬──────────────┐
/// │ Sync        │ Format       │ Length    │ Payload  │ Check        │
/// │ (1-2B)      │ algo id << 4 │ (2B BE)   │          │ (0-4B BE)    │
/// └─────────────┴──────────────┴───────────┴──────────┴──────────────┘
/// ```
///
/// `Length` counts every byte of the packet, sync and check field included.
/// The check value covers the format byte, the length field, and the
/// payload; the sync word and the check field itself are excluded.
///
/// Fails without writing anything when the frame would overflow the length
/// field or `out`.
pub fn encode_into(
    sync: SyncWord,
    checksum: Checksum,
    payload: &[u8],
    out: &mut [u8],
) -> Result<usize> {
    let header_len = sync.header_len();
    let packet_len = header_len + payload.len() + checksum.check_len();

    if packet_len > MAX_PACKET_LEN {
        return Err(EncodeError::PayloadTooLarge {
            size: payload.len(),
            max: max_payload(sync, checksum),
        });
    }
    if packet_len > out.len() {
        return Err(EncodeError::BufferTooSmall {
            needed: packet_len,
            capacity: out.len(),
        });
    }

    match sync {
        SyncWord::Single(first) => out[0] = first,
        SyncWord::Dual(first, second) => {
            out[0] = first;
            out[1] = second;
        }
    }
    let sync_width = sync.width();
    out[sync_width] = checksum.format_byte();
    out[sync_width + 1..header_len].copy_from_slice(&(packet_len as u16).to_be_bytes());

    let body_end = header_len + payload.len();
    out[header_len..body_end].copy_from_slice(payload);

    let value = checksum.compute(&out[sync_width..body_end]);
    checksum.write_check(value, &mut out[body_end..packet_len]);

    Ok(packet_len)
}

/// Append one frame to a growable buffer.
///
/// Batching form of [`encode_into`] for callers that queue several frames
/// before handing them to a transport; only the protocol maximum applies.
pub fn encode_frame(
    sync: SyncWord,
    checksum: Checksum,
    payload: &[u8],
    dst: &mut BytesMut,
) -> Result<()> {
    let packet_len = sync.header_len() + payload.len() + checksum.check_len();
    if packet_len > MAX_PACKET_LEN {
        return Err(EncodeError::PayloadTooLarge {
            size: payload.len(),
            max: max_payload(sync, checksum),
        });
    }

    let start = dst.len();
    dst.resize(start + packet_len, 0);
    encode_into(sync, checksum, payload, &mut dst[start..])?;
    Ok(())
}

/// Per-link frame builder that owns a fixed-capacity transmit buffer.
///
/// Construct one per outgoing direction and reuse it for every frame; the
/// buffer is allocated once and never grows.
#[derive(Debug)]
pub struct FrameEncoder {
    config: FrameConfig,
    buf: Box<[u8]>,
}

impl FrameEncoder {
    /// Create an encoder with the default configuration.
    pub fn new(capacity: usize) -> Self {
        Self::with_config(capacity, FrameConfig::default())
    }

    /// Create an encoder with explicit configuration.
    pub fn with_config(capacity: usize, config: FrameConfig) -> Self {
        Self {
            config,
            buf: vec![0u8; capacity].into_boxed_slice(),
        }
    }

    /// Encode one payload and return the framed bytes.
    ///
    /// The slice borrows the internal buffer and is valid until the next
    /// call.
    pub fn encode(&mut self, checksum: Checksum, payload: &[u8]) -> Result<&[u8]> {
        let written = encode_into(self.config.sync, checksum, payload, &mut self.buf)?;
        Ok(&self.buf[..written])
    }

    /// Transmit buffer capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Current encoder configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::FrameDecoder;
    use crate::sink::MessageSink;

    #[test]
    fn sum16_frame_wire_bytes() {
        let mut out = [0u8; 16];
        let written =
            encode_into(SyncWord::default(), Checksum::Sum16, b"ok", &mut out).unwrap();
        assert_eq!(
            &out[..written],
            &[0x24, 0x20, 0x00, 0x08, 0x6F, 0x6B, 0x01, 0x02]
        );
    }

    #[test]
    fn sum8_frame_wire_bytes() {
        let mut out = [0u8; 16];
        let written =
            encode_into(SyncWord::default(), Checksum::Sum8, b"ko", &mut out).unwrap();
        assert_eq!(&out[..written], &[0x24, 0x10, 0x00, 0x07, 0x6B, 0x6F, 0xF1]);
    }

    #[test]
    fn unchecked_frame_wire_bytes() {
        let mut out = [0u8; 16];
        let written =
            encode_into(SyncWord::default(), Checksum::None, b"hi", &mut out).unwrap();
        assert_eq!(&out[..written], &[0x24, 0x00, 0x00, 0x06, 0x68, 0x69]);
    }

    #[test]
    fn dual_sync_frame_wire_bytes() {
        let mut out = [0u8; 16];
        let written = encode_into(
            SyncWord::Dual(0xAA, 0x55),
            Checksum::Sum16,
            b"ok",
            &mut out,
        )
        .unwrap();
        assert_eq!(
            &out[..written],
            &[0xAA, 0x55, 0x20, 0x00, 0x09, 0x6F, 0x6B, 0x01, 0x03]
        );
    }

    #[test]
    fn empty_payload_frames() {
        let mut out = [0u8; 16];

        let written = encode_into(SyncWord::default(), Checksum::None, b"", &mut out).unwrap();
        assert_eq!(&out[..written], &[0x24, 0x00, 0x00, 0x04]);

        let written = encode_into(SyncWord::default(), Checksum::Sum16, b"", &mut out).unwrap();
        assert_eq!(&out[..written], &[0x24, 0x20, 0x00, 0x06, 0x00, 0x26]);
    }

    #[test]
    fn length_field_counts_the_whole_packet() {
        let mut out = [0u8; 64];
        let written = encode_into(
            SyncWord::default(),
            Checksum::Crc32,
            &[0xEE; 10],
            &mut out,
        )
        .unwrap();
        // 4 header + 10 payload + 4 check
        assert_eq!(written, 18);
        assert_eq!(&out[2..4], &[0x00, 0x12]);
    }

    #[test]
    fn undersized_buffer_is_rejected_untouched() {
        let mut out = [0u8; 7];
        let err = encode_into(SyncWord::default(), Checksum::Sum16, b"ok", &mut out).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::BufferTooSmall {
                needed: 8,
                capacity: 7
            }
        ));
        assert_eq!(out, [0u8; 7]);
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let payload = vec![0u8; 65532];
        let mut out = vec![0u8; 16];
        let err =
            encode_into(SyncWord::default(), Checksum::None, &payload, &mut out).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::PayloadTooLarge {
                size: 65532,
                max: 65531
            }
        ));
    }

    #[test]
    fn payload_at_the_length_limit_encodes() {
        let payload = vec![0xA5u8; 65531];
        let mut out = vec![0u8; MAX_PACKET_LEN];
        let written =
            encode_into(SyncWord::default(), Checksum::None, &payload, &mut out).unwrap();
        assert_eq!(written, MAX_PACKET_LEN);
        assert_eq!(&out[2..4], &[0xFF, 0xFF]);
    }

    #[test]
    fn encoder_reuses_its_buffer() {
        let mut encoder = FrameEncoder::new(64);
        assert_eq!(encoder.capacity(), 64);

        let first = encoder.encode(Checksum::Sum16, b"ok").unwrap().to_vec();
        let second = encoder.encode(Checksum::Sum8, b"ko").unwrap().to_vec();

        assert_eq!(first, [0x24, 0x20, 0x00, 0x08, 0x6F, 0x6B, 0x01, 0x02]);
        assert_eq!(second, [0x24, 0x10, 0x00, 0x07, 0x6B, 0x6F, 0xF1]);
    }

    #[test]
    fn encoder_reports_exhausted_capacity() {
        let mut encoder = FrameEncoder::new(4);
        let err = encoder.encode(Checksum::Sum16, b"ok").unwrap_err();
        assert!(matches!(err, EncodeError::BufferTooSmall { .. }));
    }

    #[test]
    fn encode_frame_appends_back_to_back() {
        let mut dst = BytesMut::new();
        encode_frame(SyncWord::default(), Checksum::Sum16, b"ok", &mut dst).unwrap();
        encode_frame(SyncWord::default(), Checksum::Sum8, b"ko", &mut dst).unwrap();

        assert_eq!(
            dst.as_ref(),
            &[
                0x24, 0x20, 0x00, 0x08, 0x6F, 0x6B, 0x01, 0x02, // first frame
                0x24, 0x10, 0x00, 0x07, 0x6B, 0x6F, 0xF1, // second frame
            ]
        );
    }

    #[test]
    fn encoded_frames_decode() {
        #[derive(Default)]
        struct Recorder {
            messages: Vec<Vec<u8>>,
        }

        impl MessageSink for Recorder {
            fn on_message(&mut self, payload: &[u8]) {
                self.messages.push(payload.to_vec());
            }
        }

        let mut encoder = FrameEncoder::new(256);
        let mut decoder = FrameDecoder::new(256, Recorder::default());

        for algo in Checksum::ALL {
            let wire = encoder.encode(algo, b"telemetry").unwrap().to_vec();
            decoder.push_bytes(&wire);
        }

        assert_eq!(decoder.stats().frames_delivered, 5);
        assert_eq!(
            decoder.into_sink().messages,
            vec![b"telemetry".to_vec(); 5]
        );
    }
}

//! Feeds arbitrary byte streams to the decoder: it must never panic, must
//! keep its counters consistent with the sink, and must stay usable for a
//! clean frame afterwards.

#![no_main]

use libfuzzer_sys::fuzz_target;
use linkframe::{FrameDecoder, MessageSink};

/// `'$'` + Sum16 + "ok".
const VALID_FRAME: [u8; 8] = [0x24, 0x20, 0x00, 0x08, 0x6F, 0x6B, 0x01, 0x02];

#[derive(Default)]
struct Count {
    delivered: u64,
    largest: usize,
}

impl MessageSink for Count {
    fn on_message(&mut self, payload: &[u8]) {
        self.delivered += 1;
        self.largest = self.largest.max(payload.len());
    }
}

fuzz_target!(|data: &[u8]| {
    let mut decoder = FrameDecoder::new(256, Count::default());
    decoder.push_bytes(data);

    let after_stream = decoder.stats();
    assert_eq!(after_stream.frames_delivered, decoder.sink().delivered);
    assert!(decoder.sink().largest <= 256);

    // Whatever the garbage left behind, a reset decoder must still accept a
    // well-formed frame.
    decoder.reset();
    decoder.push_bytes(&VALID_FRAME);
    assert_eq!(
        decoder.stats().frames_delivered,
        after_stream.frames_delivered + 1
    );
});

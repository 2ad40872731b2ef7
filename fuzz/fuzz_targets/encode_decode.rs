//! Round-trips fuzzer-chosen payloads through encode and decode for every
//! sync word and checksum combination.

#![no_main]

use libfuzzer_sys::fuzz_target;
use linkframe::{encode_into, Checksum, FrameConfig, FrameDecoder, MessageSink, SyncWord};

#[derive(Default)]
struct Last {
    delivered: u64,
    payload: Vec<u8>,
}

impl MessageSink for Last {
    fn on_message(&mut self, payload: &[u8]) {
        self.delivered += 1;
        self.payload = payload.to_vec();
    }
}

fuzz_target!(|data: &[u8]| {
    let [selector, rest @ ..] = data else { return };
    let payload = if rest.len() > 1024 { &rest[..1024] } else { rest };

    let checksum = Checksum::ALL[usize::from(*selector) % Checksum::ALL.len()];
    let sync = if *selector & 0x10 == 0 {
        SyncWord::default()
    } else {
        SyncWord::Dual(0xAA, 0x55)
    };

    let mut wire = vec![0u8; 2048];
    let written = encode_into(sync, checksum, payload, &mut wire).unwrap();

    let config = FrameConfig {
        sync,
        ..FrameConfig::default()
    };
    let mut decoder = FrameDecoder::with_config(2048, config, Last::default());

    // Leading non-sync noise must not disturb the frame that follows.
    let noise = sync.first().wrapping_add(1);
    decoder.push_bytes(&[noise, noise, noise]);
    decoder.push_bytes(&wire[..written]);

    let stats = decoder.stats();
    assert_eq!(stats.frames_delivered, 1);
    assert_eq!(stats.bytes_discarded, 3);

    let sink = decoder.into_sink();
    assert_eq!(sink.delivered, 1);
    assert_eq!(sink.payload, payload);
});

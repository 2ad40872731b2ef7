/// Receives validated payloads from a [`FrameDecoder`](crate::FrameDecoder).
///
/// The dispatch layer above the link implements this; the decoder calls
/// [`on_message`](MessageSink::on_message) exactly once per frame that
/// passes sync, bounds, and checksum validation, and never for anything
/// else.
///
/// The payload slice aliases the decoder's receive buffer and is
/// overwritten by later bytes; copy it out if it must outlive the call.
///
/// # Example
///
/// ```
/// use linkframe::MessageSink;
///
/// #[derive(Default)]
/// struct Collect {
///     messages: Vec<Vec<u8>>,
/// }
///
/// impl MessageSink for Collect {
///     fn on_message(&mut self, payload: &[u8]) {
///         self.messages.push(payload.to_vec());
///     }
/// }
/// ```
pub trait MessageSink {
    /// Handle one validated payload.
    fn on_message(&mut self, payload: &[u8]);
}

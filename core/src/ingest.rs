use std::sync::Arc;

use crate::io::codec::{MsgPackCodec, PayloadCodec};
use crate::peripherals::PeripheralStateStore;

/// Receives raw payloads from the transport and writes whatever decodes into the state store.
///
/// Called once per datagram from the receiving thread. A payload that fails to decode is logged
/// and dropped, it never stops the stream.
pub struct UpdateIngestor<C: PayloadCodec = MsgPackCodec> {
    codec: C,
    store: Arc<PeripheralStateStore>,
    accepted: u64,
    discarded: u64,
}

impl UpdateIngestor<MsgPackCodec> {
    pub fn new(store: Arc<PeripheralStateStore>) -> Self {
        UpdateIngestor::with_codec(MsgPackCodec, store)
    }
}

impl<C: PayloadCodec> UpdateIngestor<C> {
    pub fn with_codec(codec: C, store: Arc<PeripheralStateStore>) -> Self {
        UpdateIngestor {
            codec,
            store,
            accepted: 0,
            discarded: 0,
        }
    }

    /// # Returns
    /// Whether the payload was applied to the store.
    pub fn on_payload_received(&mut self, raw: &[u8]) -> bool {
        let result = self.codec.decode(raw).and_then(|update| {
            log::trace!(
                "Received update: screen {}x{} ({}), keys {:#06X}, sound {}",
                update.screen_width,
                update.screen_height,
                if update.screen.is_some() { "new frame" } else { "unchanged" },
                update.keys.bits(),
                update.sound
            );
            self.store.write(update)
        });

        match result {
            Ok(()) => {
                self.accepted += 1;
                true
            }
            Err(e) => {
                self.discarded += 1;
                log::warn!("Discarding payload of {} bytes: {}", raw.len(), e);
                false
            }
        }
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    pub fn discarded(&self) -> u64 {
        self.discarded
    }
}

use screenpad::network::{ListenerHandle, MulticastListener};
use screenpad_core::ingest::UpdateIngestor;
use screenpad_core::peripherals::PeripheralStateStore;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::thread::JoinHandle;

/// Owns the thread which receives the emulator's broadcasts and feeds them into the store.
pub struct IngestRunner {
    current_thread: Option<JoinHandle<()>>,
    listener_handle: ListenerHandle,
}

impl IngestRunner {
    pub fn start(group: Ipv4Addr, port: u16, store: Arc<PeripheralStateStore>) -> anyhow::Result<IngestRunner> {
        let listener = MulticastListener::join(group, port)?;
        let listener_handle = listener.stop_handle();

        let ingest_thread = std::thread::Builder::new().name("ingest".to_string()).spawn(move || {
            let mut ingestor = UpdateIngestor::new(store);
            listener.run(|payload| {
                ingestor.on_payload_received(payload);
            });
            log::info!(
                "Stopped receiving, accepted {} updates and discarded {}",
                ingestor.accepted(),
                ingestor.discarded()
            );
        })?;

        Ok(IngestRunner {
            current_thread: Some(ingest_thread),
            listener_handle,
        })
    }

    /// Stops the listener and blocks until its thread has completed.
    pub fn stop(&mut self) {
        if let Some(thread) = self.current_thread.take() {
            self.listener_handle.stop();
            if thread.join().is_err() {
                log::error!("Ingest thread panicked");
            }
        }
    }
}

impl Drop for IngestRunner {
    fn drop(&mut self) {
        self.stop();
    }
}

use crossbeam::channel::{Sender, TrySendError};
use screenpad_core::display::overlay::FinalFrame;
use screenpad_core::render::{Presenter, ToneGenerator};

/// Represents a change to the beep for the main thread to apply, since the SDL audio device
/// can't leave it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ToneRequest {
    Start,
    Stop,
    Frequency(u32),
}

/// Hands finished frames to the main thread for display.
///
/// If the previous frame hasn't been picked up yet the new one is dropped, the render thread
/// must never block on the window.
pub struct ChannelPresenter {
    frame_sender: Sender<FinalFrame>,
    dropped: u64,
}

impl ChannelPresenter {
    pub fn new(frame_sender: Sender<FinalFrame>) -> Self {
        ChannelPresenter { frame_sender, dropped: 0 }
    }
}

impl Presenter for ChannelPresenter {
    fn present(&mut self, frame: FinalFrame) {
        match self.frame_sender.try_send(frame) {
            Ok(()) => {}
            Err(TrySendError::Full(frame)) => {
                self.dropped += 1;
                log::trace!("Dropped frame {}, {} so far", frame.tick, self.dropped);
            }
            Err(TrySendError::Disconnected(_)) => log::debug!("Window is gone, discarding frame"),
        }
    }
}

pub struct ChannelToneGenerator {
    request_sender: Sender<ToneRequest>,
}

impl ChannelToneGenerator {
    pub fn new(request_sender: Sender<ToneRequest>) -> Self {
        ChannelToneGenerator { request_sender }
    }

    fn send(&self, request: ToneRequest) {
        if let Err(e) = self.request_sender.send(request) {
            log::debug!("Failed to forward {:?} due to: {:?}", request, e);
        }
    }
}

impl ToneGenerator for ChannelToneGenerator {
    fn start_tone(&mut self) {
        self.send(ToneRequest::Start);
    }

    fn stop_tone(&mut self) {
        self.send(ToneRequest::Stop);
    }

    fn set_frequency(&mut self, hz: u32) {
        self.send(ToneRequest::Frequency(hz));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam::channel::{bounded, unbounded};
    use image::RgbaImage;
    use pretty_assertions::assert_eq;
    use screenpad_core::KeyFlags;

    fn frame(tick: u64) -> FinalFrame {
        FinalFrame {
            image: RgbaImage::new(1, 1),
            keys: KeyFlags::empty(),
            tick,
        }
    }

    #[test]
    fn presenter_keeps_oldest_pending_frame() {
        let (sender, receiver) = bounded(1);
        let mut presenter = ChannelPresenter::new(sender);

        presenter.present(frame(1));
        presenter.present(frame(2));

        assert_eq!(receiver.try_recv().unwrap().tick, 1);
        assert!(receiver.try_recv().is_err());
        assert_eq!(presenter.dropped, 1);
    }

    #[test]
    fn presenter_survives_closed_window() {
        let (sender, receiver) = bounded(1);
        drop(receiver);

        ChannelPresenter::new(sender).present(frame(1));
    }

    #[test]
    fn tone_requests_arrive_in_order() {
        let (sender, receiver) = unbounded();
        let mut tone = ChannelToneGenerator::new(sender);

        tone.set_frequency(440);
        tone.start_tone();
        tone.stop_tone();

        let requests: Vec<ToneRequest> = receiver.try_iter().collect();
        assert_eq!(requests, vec![ToneRequest::Frequency(440), ToneRequest::Start, ToneRequest::Stop]);
    }
}

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use crossbeam::channel::{unbounded, Receiver, RecvTimeoutError, Sender};

use crate::display::overlay::{FinalFrame, OverlayCompositor, StaticOverlayAssets};
use crate::display::phosphor::PhosphorCompositor;
use crate::error::ScreenError;
use crate::peripherals::PeripheralStateStore;
use crate::scheduler::{FrameScheduler, FRAME_DELAY};
use crate::CrtOptions;

/// Takes ownership of every composed frame, usually to put it on screen.
pub trait Presenter {
    fn present(&mut self, frame: FinalFrame);
}

/// Plays the beep. Owns its own device, requests are expected to return immediately.
pub trait ToneGenerator {
    fn start_tone(&mut self);
    fn stop_tone(&mut self);
    fn set_frequency(&mut self, hz: u32);
}

/// Represents a notification for the render thread to handle before its next tick.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RenderNotification {
    ExitRequest,
}

/// Turns the shared display state into composed frames, one per tick.
pub struct RenderLoop<P: Presenter, T: ToneGenerator> {
    store: Arc<PeripheralStateStore>,
    phosphor: PhosphorCompositor,
    overlay: OverlayCompositor,
    presenter: P,
    tone: T,
    /// Last sound state forwarded to `tone`, sound requests are only sent on a change.
    sound_playing: bool,
    last_generation: u64,
    ticks: u64,
}

impl<P: Presenter, T: ToneGenerator> RenderLoop<P, T> {
    pub fn new(
        store: Arc<PeripheralStateStore>,
        options: CrtOptions,
        assets: StaticOverlayAssets,
        presenter: P,
        tone: T,
    ) -> Result<Self, ScreenError> {
        let overlay = OverlayCompositor::new(assets, options.geometry)?;

        Ok(RenderLoop {
            store,
            phosphor: PhosphorCompositor::new(options),
            overlay,
            presenter,
            tone,
            sound_playing: false,
            last_generation: 0,
            ticks: 0,
        })
    }

    pub fn set_tone_frequency(&mut self, hz: u32) {
        self.tone.set_frequency(hz);
    }

    /// Runs a single frame: snapshot, phosphor, overlay, hand-off and sound.
    pub fn tick(&mut self) {
        let snapshot = self.store.read_snapshot();

        if snapshot.generation != self.last_generation {
            log::trace!(
                "Tick {} picked up screen #{} ({}x{})",
                self.ticks,
                snapshot.generation,
                snapshot.grid.width(),
                snapshot.grid.height()
            );
            self.last_generation = snapshot.generation;
        }

        let surface = self.phosphor.update(&snapshot.grid);
        let image = self.overlay.compose(surface);

        self.presenter.present(FinalFrame {
            image,
            keys: snapshot.keys,
            tick: self.ticks,
        });

        if snapshot.sound != self.sound_playing {
            if snapshot.sound {
                self.tone.start_tone();
            } else {
                self.tone.stop_tone();
            }
            self.sound_playing = snapshot.sound;
        }

        self.ticks += 1;
    }

    /// Ticks at `FRAME_DELAY` until an exit request arrives or the sender disappears.
    pub fn run(&mut self, notifications: Receiver<RenderNotification>) {
        let mut scheduler = FrameScheduler::new(FRAME_DELAY, Instant::now());

        'render_loop: loop {
            match notifications.recv_timeout(scheduler.time_until_next(Instant::now())) {
                Ok(RenderNotification::ExitRequest) | Err(RecvTimeoutError::Disconnected) => break 'render_loop,
                Err(RecvTimeoutError::Timeout) => {}
            }

            let tick_start = Instant::now();
            self.tick();
            log::trace!("Tick took {:?}", tick_start.elapsed());

            scheduler.advance(Instant::now());
        }

        if self.sound_playing {
            self.tone.stop_tone();
            self.sound_playing = false;
        }

        log::info!(
            "Render loop stopped after {} ticks, {} deadlines skipped",
            scheduler.ticks(),
            scheduler.missed()
        );
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn sound_playing(&self) -> bool {
        self.sound_playing
    }
}

/// Owns the dedicated render thread.
pub struct RenderRunner {
    current_thread: Option<JoinHandle<()>>,
    notification_sender: Sender<RenderNotification>,
}

impl RenderRunner {
    pub fn spawn<P, T>(mut render_loop: RenderLoop<P, T>) -> std::io::Result<RenderRunner>
    where
        P: Presenter + Send + 'static,
        T: ToneGenerator + Send + 'static,
    {
        let (notification_sender, notification_receiver) = unbounded();
        let render_thread = std::thread::Builder::new()
            .name("render".to_string())
            .spawn(move || render_loop.run(notification_receiver))?;

        log::info!("Started render thread at {} FPS", crate::scheduler::FPS);

        Ok(RenderRunner {
            current_thread: Some(render_thread),
            notification_sender,
        })
    }

    pub fn is_running(&self) -> bool {
        self.current_thread.is_some()
    }

    /// Stops the render thread and blocks until it has completed.
    pub fn stop(&mut self) {
        if let Some(thread) = self.current_thread.take() {
            if let Err(e) = self.notification_sender.send(RenderNotification::ExitRequest) {
                log::error!("Render thread already gone: {:?}", e);
            }
            if thread.join().is_err() {
                log::error!("Render thread panicked");
            }
        }
    }
}

impl Drop for RenderRunner {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::frame::PixelGrid;
    use crate::display::CrtGeometry;
    use crate::io::keypad::KeyFlags;
    use crate::peripherals::PeripheralUpdate;
    use crate::CrtOptionsBuilder;
    use crossbeam::channel::bounded;
    use image::{Rgba, RgbaImage};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Debug, Copy, Clone, PartialEq)]
    enum ToneCall {
        Start,
        Stop,
        Frequency(u32),
    }

    #[derive(Default, Clone)]
    struct RecordingTone(Arc<Mutex<Vec<ToneCall>>>);

    impl ToneGenerator for RecordingTone {
        fn start_tone(&mut self) {
            self.0.lock().unwrap().push(ToneCall::Start);
        }

        fn stop_tone(&mut self) {
            self.0.lock().unwrap().push(ToneCall::Stop);
        }

        fn set_frequency(&mut self, hz: u32) {
            self.0.lock().unwrap().push(ToneCall::Frequency(hz));
        }
    }

    struct ChannelPresenter(Sender<FinalFrame>);

    impl Presenter for ChannelPresenter {
        fn present(&mut self, frame: FinalFrame) {
            let _ = self.0.try_send(frame);
        }
    }

    fn options() -> CrtOptions {
        CrtOptionsBuilder::new()
            .with_geometry(CrtGeometry {
                surface_width: 12,
                surface_height: 8,
                inset_x: 2,
                inset_y: 2,
                scaled_width: 8,
                scaled_height: 4,
                surface_x: 2,
                surface_y: 2,
            })
            .build()
    }

    fn assets() -> StaticOverlayAssets {
        StaticOverlayAssets::new(
            RgbaImage::from_pixel(16, 12, Rgba([0, 0, 0, 0])),
            RgbaImage::from_pixel(16, 12, Rgba([0, 0, 0, 0])),
        )
        .unwrap()
    }

    fn write(store: &PeripheralStateStore, screen: Option<Vec<u8>>, sound: bool) {
        store
            .write(PeripheralUpdate {
                screen,
                screen_width: 8,
                screen_height: 1,
                keys: KeyFlags::KEY_2,
                sound,
            })
            .unwrap();
    }

    #[test]
    fn test_sound_is_edge_triggered() {
        let store = Arc::new(PeripheralStateStore::new(PixelGrid::blank(8, 1)));
        let tone = RecordingTone::default();
        let (sender, _receiver) = bounded(1);
        let mut render_loop =
            RenderLoop::new(store.clone(), options(), assets(), ChannelPresenter(sender), tone.clone()).unwrap();

        write(&store, None, false);
        render_loop.tick();
        write(&store, None, true);
        render_loop.tick();
        render_loop.tick();
        write(&store, None, true);
        render_loop.tick();

        assert_eq!(*tone.0.lock().unwrap(), vec![ToneCall::Start]);

        write(&store, None, false);
        render_loop.tick();
        render_loop.tick();

        assert_eq!(*tone.0.lock().unwrap(), vec![ToneCall::Start, ToneCall::Stop]);
        assert!(!render_loop.sound_playing());
    }

    #[test]
    fn test_tick_presents_composed_frame() {
        let store = Arc::new(PeripheralStateStore::new(PixelGrid::blank(8, 1)));
        let (sender, receiver) = bounded(4);
        let mut render_loop =
            RenderLoop::new(store.clone(), options(), assets(), ChannelPresenter(sender), RecordingTone::default())
                .unwrap();

        write(&store, Some(vec![0xFF]), false);
        render_loop.tick();
        render_loop.tick();

        let first = receiver.try_recv().unwrap();
        let second = receiver.try_recv().unwrap();

        assert_eq!(first.image.dimensions(), (16, 12));
        assert_eq!((first.tick, second.tick), (0, 1));
        assert_eq!(first.keys, KeyFlags::KEY_2);
        // Surface at (2, 2), lit area inset by another (2, 2).
        assert!(first.image.get_pixel(6, 6)[1] > 0);
        assert_eq!(first.image.get_pixel(1, 1).0, [0, 0, 0, 0xFF]);
        assert_eq!(render_loop.ticks(), 2);
    }

    #[test]
    fn test_mismatched_bezel_fails() {
        let store = Arc::new(PeripheralStateStore::new(PixelGrid::blank(8, 1)));
        let (sender, _receiver) = bounded(1);
        let small_assets =
            StaticOverlayAssets::new(RgbaImage::new(4, 4), RgbaImage::new(4, 4)).unwrap();

        let result = RenderLoop::new(store, options(), small_assets, ChannelPresenter(sender), RecordingTone::default());

        assert!(result.is_err());
    }

    #[test]
    fn test_runner_ticks_and_stops() {
        let store = Arc::new(PeripheralStateStore::new(PixelGrid::blank(8, 1)));
        let tone = RecordingTone::default();
        let (sender, receiver) = bounded(1);
        let mut render_loop =
            RenderLoop::new(store.clone(), options(), assets(), ChannelPresenter(sender), tone.clone()).unwrap();
        render_loop.set_tone_frequency(440);
        write(&store, None, true);

        let mut runner = RenderRunner::spawn(render_loop).unwrap();

        assert!(receiver.recv_timeout(Duration::from_secs(5)).is_ok());
        assert!(receiver.recv_timeout(Duration::from_secs(5)).is_ok());
        runner.stop();

        assert!(!runner.is_running());
        // Sound still on at shutdown, the tone gets stopped on the way out.
        assert_eq!(
            *tone.0.lock().unwrap(),
            vec![ToneCall::Frequency(440), ToneCall::Start, ToneCall::Stop]
        );
    }
}

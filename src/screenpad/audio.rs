use crate::communication::ToneRequest;
use screenpad_core::sound::{ToneWave, CHANNELS, SAMPLE_RATE};
use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};
use sdl2::AudioSubsystem;

struct BeepCallback {
    wave: ToneWave,
}

impl AudioCallback for BeepCallback {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        self.wave.fill(out);
    }
}

/// Plays the beep while the emulator's sound flag is raised.
pub struct BeepPlayer {
    device: AudioDevice<BeepCallback>,
    playing: bool,
    muted: bool,
}

impl BeepPlayer {
    pub fn new(audio_subsystem: &AudioSubsystem, frequency: u32, volume: f32, muted: bool) -> Result<Self, String> {
        let device = audio_subsystem.open_playback(
            None,
            &AudioSpecDesired {
                freq: Some(SAMPLE_RATE as i32),
                channels: Some(CHANNELS),
                samples: None,
            },
            |spec| {
                log::debug!("Opened audio device: {:?}", spec);
                BeepCallback {
                    wave: ToneWave::new(frequency, volume),
                }
            },
        )?;

        Ok(BeepPlayer {
            device,
            playing: false,
            muted,
        })
    }

    pub fn handle_request(&mut self, request: ToneRequest) {
        match request {
            ToneRequest::Start => self.playing = true,
            ToneRequest::Stop => self.playing = false,
            ToneRequest::Frequency(hz) => self.device.lock().wave.set_frequency(hz),
        }
        self.apply();
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.apply();
        self.muted
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    fn apply(&self) {
        if self.playing && !self.muted {
            self.device.resume();
        } else {
            self.device.pause();
        }
    }
}

use std::f32::consts::PI;

pub const SAMPLE_RATE: u32 = 44_100;
pub const CHANNELS: u8 = 2;
pub const DEFAULT_TONE_FREQUENCY: u32 = 220;
pub const DEFAULT_TONE_VOLUME: f32 = 0.5;
/// Relative volume of the octave harmonic on the second channel.
pub const HARMONIC_VOLUME: f32 = 0.6;

/// Endless beep: a sine on the first channel and its octave, a bit quieter, on the second.
#[derive(Debug, Clone)]
pub struct ToneWave {
    frequency: u32,
    volume: f32,
    sample_index: u32,
}

impl ToneWave {
    pub fn new(frequency: u32, volume: f32) -> Self {
        ToneWave {
            frequency,
            volume: volume.max(0.0).min(1.0),
            sample_index: 0,
        }
    }

    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    pub fn set_frequency(&mut self, frequency: u32) {
        self.frequency = frequency;
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.max(0.0).min(1.0);
    }

    /// Fills `out` with interleaved stereo samples.
    pub fn fill(&mut self, out: &mut [f32]) {
        for frame in out.chunks_mut(CHANNELS as usize) {
            // Integer frequencies complete a whole number of cycles per second, so wrapping
            // the index every second keeps the wave continuous.
            let angle = 2.0 * PI * self.frequency as f32 * self.sample_index as f32 / SAMPLE_RATE as f32;

            frame[0] = angle.sin() * self.volume;
            if let Some(harmonic) = frame.get_mut(1) {
                *harmonic = (2.0 * angle).sin() * self.volume * HARMONIC_VOLUME;
            }

            self.sample_index = (self.sample_index + 1) % SAMPLE_RATE;
        }
    }
}

impl Default for ToneWave {
    fn default() -> Self {
        ToneWave::new(DEFAULT_TONE_FREQUENCY, DEFAULT_TONE_VOLUME)
    }
}

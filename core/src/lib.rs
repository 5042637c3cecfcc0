use crate::display::palette::{PhosphorTint, Rgba};
use crate::display::CrtGeometry;

pub use crate::error::{MalformedUpdate, ScreenError};
pub use crate::io::keypad::{KeyFlags, KeyPad};

pub mod display;
pub mod error;
pub mod ingest;
pub mod io;
pub mod peripherals;
pub mod render;
pub mod scheduler;
pub mod sound;

/// The CHIP-8 display the emulator core starts with, used until the first frame arrives.
pub const DEFAULT_SCREEN_WIDTH: u32 = 64;
pub const DEFAULT_SCREEN_HEIGHT: u32 = 32;

/// Struct for wrapping all the various options for the CRT simulation.
///
/// Everything in here is fixed once the compositors are constructed.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CrtOptions {
    pub pixel_on_colour: Rgba,
    pub pixel_off_colour: Rgba,
    /// Alpha of the black fill laid over the phosphor surface every tick.
    pub decay_alpha: u8,
    /// Alpha of the black scanlines drawn on top of the decay fill.
    pub scanline_alpha: u8,
    /// Distance in pixels between two scanlines.
    pub scanline_period: u32,
    pub geometry: CrtGeometry,
}

impl Default for CrtOptions {
    fn default() -> Self {
        CrtOptionsBuilder::new().build()
    }
}

#[derive(Debug)]
pub struct CrtOptionsBuilder {
    pixel_on_colour: Rgba,
    pixel_off_colour: Rgba,
    decay_alpha: u8,
    scanline_alpha: u8,
    scanline_period: u32,
    geometry: CrtGeometry,
}

impl CrtOptionsBuilder {
    pub fn new() -> Self {
        let (pixel_on_colour, pixel_off_colour) = PhosphorTint::Green.colours();
        CrtOptionsBuilder {
            pixel_on_colour,
            pixel_off_colour,
            decay_alpha: 0x40,
            scanline_alpha: 0x80,
            scanline_period: 3,
            geometry: CrtGeometry::default(),
        }
    }

    pub fn with_tint(self, tint: PhosphorTint) -> Self {
        let (on, off) = tint.colours();
        self.with_pixel_on_colour(on).with_pixel_off_colour(off)
    }

    pub fn with_pixel_on_colour(mut self, colour: Rgba) -> Self {
        self.pixel_on_colour = colour;
        self
    }

    pub fn with_pixel_off_colour(mut self, colour: Rgba) -> Self {
        self.pixel_off_colour = colour;
        self
    }

    pub fn with_decay_alpha(mut self, alpha: u8) -> Self {
        self.decay_alpha = alpha;
        self
    }

    pub fn with_scanline_alpha(mut self, alpha: u8) -> Self {
        self.scanline_alpha = alpha;
        self
    }

    /// A period of `0` disables the scanlines entirely.
    pub fn with_scanline_period(mut self, period: u32) -> Self {
        self.scanline_period = period;
        self
    }

    pub fn with_geometry(mut self, geometry: CrtGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn build(self) -> CrtOptions {
        CrtOptions {
            pixel_on_colour: self.pixel_on_colour,
            pixel_off_colour: self.pixel_off_colour,
            decay_alpha: self.decay_alpha,
            scanline_alpha: self.scanline_alpha,
            scanline_period: self.scanline_period,
            geometry: self.geometry,
        }
    }
}

impl From<CrtOptions> for CrtOptionsBuilder {
    fn from(from: CrtOptions) -> Self {
        CrtOptionsBuilder {
            pixel_on_colour: from.pixel_on_colour,
            pixel_off_colour: from.pixel_off_colour,
            decay_alpha: from.decay_alpha,
            scanline_alpha: from.scanline_alpha,
            scanline_period: from.scanline_period,
            geometry: from.geometry,
        }
    }
}

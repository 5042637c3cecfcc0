use image::RgbaImage;

use crate::display::palette::Rgba;
use crate::error::MalformedUpdate;

/// A monochrome `width * height` pixel grid, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    pixels: Vec<bool>,
}

impl PixelGrid {
    /// An all-off grid.
    pub fn blank(width: u32, height: u32) -> Self {
        PixelGrid {
            width,
            height,
            pixels: vec![false; (width * height) as usize],
        }
    }

    /// Unpacks a bit-packed buffer (1 bit per pixel, row-major, MSB first) into a grid.
    ///
    /// Any bits past `width * height` are ignored.
    pub fn decode(packed: &[u8], width: u32, height: u32) -> Result<Self, MalformedUpdate> {
        if width == 0 || height == 0 {
            return Err(MalformedUpdate::EmptyScreen { width, height });
        }

        let pixel_count = width as usize * height as usize;
        let required = (pixel_count + 7) / 8;

        if packed.len() < required {
            return Err(MalformedUpdate::TruncatedScreen {
                width,
                height,
                required,
                actual: packed.len(),
            });
        }

        let pixels = (0..pixel_count)
            .map(|i| (packed[i / 8] >> (7 - (i % 8))) & 0x1 == 1)
            .collect();

        Ok(PixelGrid { width, height, pixels })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.pixels[(x + y * self.width) as usize]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, on: bool) {
        if x < self.width && y < self.height {
            self.pixels[(x + y * self.width) as usize] = on;
        }
    }

    pub fn pixels(&self) -> &[bool] {
        &self.pixels
    }

    pub fn lit_count(&self) -> usize {
        self.pixels.iter().filter(|p| **p).count()
    }

    /// Colours the grid into a low resolution image, ready to be upscaled.
    pub fn to_image(&self, on: Rgba, off: Rgba) -> RgbaImage {
        let (on, off): (image::Rgba<u8>, image::Rgba<u8>) = (on.into(), off.into());

        RgbaImage::from_fn(self.width, self.height, |x, y| if self.pixel(x, y) { on } else { off })
    }
}

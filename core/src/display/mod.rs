use image::RgbaImage;

pub mod frame;
pub mod overlay;
pub mod palette;
pub mod phosphor;

/// Width of the bezel artwork, and therefore of every composed frame.
pub const FRAME_WIDTH: u32 = 1432;
pub const FRAME_HEIGHT: u32 = 1071;

/// Placement of the phosphor layer on the screen and of the screen in the bezel.
///
/// All values are in pixels of the final composed frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CrtGeometry {
    /// Size of the phosphor accumulation surface.
    pub surface_width: u32,
    pub surface_height: u32,
    /// Offset of the lit area inside the surface, simulates the scan margins of the tube.
    pub inset_x: u32,
    pub inset_y: u32,
    /// Size the raw grid is upscaled to.
    pub scaled_width: u32,
    pub scaled_height: u32,
    /// Where the surface sits inside the final frame, the tube opening of the bezel.
    pub surface_x: u32,
    pub surface_y: u32,
}

impl CrtGeometry {
    /// Whether the upscaled grid fits inside the surface at its inset.
    pub fn scaled_fits_surface(&self) -> bool {
        self.inset_x + self.scaled_width <= self.surface_width
            && self.inset_y + self.scaled_height <= self.surface_height
    }

    pub fn surface_fits_frame(&self, frame_width: u32, frame_height: u32) -> bool {
        self.surface_x + self.surface_width <= frame_width && self.surface_y + self.surface_height <= frame_height
    }
}

impl Default for CrtGeometry {
    fn default() -> Self {
        CrtGeometry {
            surface_width: 940,
            surface_height: 740,
            inset_x: 40,
            inset_y: 40,
            scaled_width: 860,
            scaled_height: 640,
            surface_x: 180,
            surface_y: 160,
        }
    }
}

/// Source-over composites `layer` onto `target` with its top left corner at `(x, y)`.
///
/// `target` has to be fully opaque, which every surface we draw to is, so the result stays opaque
/// and the blend is a plain integer lerp. Channels are truncated, meaning repeated draws of a
/// translucent black layer always bring a channel down to exactly `0`.
/// Whatever of `layer` falls outside `target` is cropped.
pub fn draw_over(target: &mut RgbaImage, layer: &RgbaImage, x: u32, y: u32) {
    let width = layer.width().min(target.width().saturating_sub(x));
    let height = layer.height().min(target.height().saturating_sub(y));

    for layer_y in 0..height {
        for layer_x in 0..width {
            let src = layer.get_pixel(layer_x, layer_y);
            let alpha = src[3] as u32;

            if alpha == 0 {
                continue;
            }

            let dst = target.get_pixel_mut(x + layer_x, y + layer_y);

            if alpha == 0xFF {
                *dst = *src;
                continue;
            }

            for channel in 0..3 {
                dst[channel] = ((src[channel] as u32 * alpha + dst[channel] as u32 * (0xFF - alpha)) / 0xFF) as u8;
            }
            dst[3] = 0xFF;
        }
    }
}

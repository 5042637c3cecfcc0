use std::sync::Arc;

use image::imageops::{resize, FilterType};
use image::{Rgba, RgbaImage};

use crate::display::draw_over;
use crate::display::frame::PixelGrid;
use crate::CrtOptions;

/// Simulates the afterglow of a CRT phosphor.
///
/// The surface is never cleared after construction. Each tick the newest frame is drawn onto it
/// and a translucent black fade mask is drawn over everything, so whatever is not redrawn loses a
/// constant fraction of its luminance per tick.
pub struct PhosphorCompositor {
    options: CrtOptions,
    surface: RgbaImage,
    fade_mask: RgbaImage,
    /// The grid the cached upscaled frame was rendered from, only rescaled when a new grid arrives.
    upscaled: Option<(Arc<PixelGrid>, RgbaImage)>,
}

impl PhosphorCompositor {
    pub fn new(options: CrtOptions) -> Self {
        let geometry = options.geometry;
        assert!(
            geometry.scaled_fits_surface(),
            "upscaled frame {}x{} at ({}, {}) does not fit a {}x{} phosphor surface",
            geometry.scaled_width,
            geometry.scaled_height,
            geometry.inset_x,
            geometry.inset_y,
            geometry.surface_width,
            geometry.surface_height
        );

        PhosphorCompositor {
            surface: RgbaImage::from_pixel(geometry.surface_width, geometry.surface_height, Rgba([0, 0, 0, 0xFF])),
            fade_mask: render_fade_mask(&options),
            options,
            upscaled: None,
        }
    }

    /// Draws `grid` onto the accumulation surface and ages everything on it by one tick.
    pub fn update(&mut self, grid: &Arc<PixelGrid>) -> &RgbaImage {
        let geometry = self.options.geometry;

        let stale = match &self.upscaled {
            Some((cached, _)) => !Arc::ptr_eq(cached, grid),
            None => true,
        };

        if stale {
            let low_res = grid.to_image(self.options.pixel_on_colour, self.options.pixel_off_colour);
            let scaled = resize(&low_res, geometry.scaled_width, geometry.scaled_height, FilterType::Triangle);
            self.upscaled = Some((grid.clone(), scaled));
        }

        if let Some((_, scaled)) = &self.upscaled {
            draw_over(&mut self.surface, scaled, geometry.inset_x, geometry.inset_y);
        }
        draw_over(&mut self.surface, &self.fade_mask, 0, 0);

        &self.surface
    }

    pub fn surface(&self) -> &RgbaImage {
        &self.surface
    }

    pub fn fade_mask(&self) -> &RgbaImage {
        &self.fade_mask
    }
}

/// Pre-renders the decay layer: a uniform translucent black fill with darker scanlines every
/// `scanline_period` rows.
fn render_fade_mask(options: &CrtOptions) -> RgbaImage {
    let geometry = options.geometry;
    let fill_alpha = options.decay_alpha as u32;
    let line_alpha = options.scanline_alpha as u32;
    // A scanline is drawn on top of the fill, so their alphas compound.
    let combined_alpha = (line_alpha + fill_alpha * (0xFF - line_alpha) / 0xFF) as u8;
    let period = options.scanline_period;

    RgbaImage::from_fn(geometry.surface_width, geometry.surface_height, |_, y| {
        if period != 0 && y % period == 0 {
            Rgba([0, 0, 0, combined_alpha])
        } else {
            Rgba([0, 0, 0, options.decay_alpha])
        }
    })
}

use std::path::Path;

use image::{Rgba, RgbaImage};

use crate::display::{draw_over, CrtGeometry};
use crate::error::ScreenError;
use crate::io::keypad::KeyFlags;

/// The bezel and glare artwork, loaded once and only ever read afterwards.
///
/// Their dimensions define the dimensions of every composed frame.
#[derive(Debug, Clone)]
pub struct StaticOverlayAssets {
    bezel: RgbaImage,
    glare: RgbaImage,
}

impl StaticOverlayAssets {
    pub fn new(bezel: RgbaImage, glare: RgbaImage) -> Result<Self, ScreenError> {
        if bezel.dimensions() != glare.dimensions() {
            return Err(ScreenError::asset(
                "glare",
                format!(
                    "glare is {}x{} while the bezel is {}x{}",
                    glare.width(),
                    glare.height(),
                    bezel.width(),
                    bezel.height()
                ),
            ));
        }

        Ok(StaticOverlayAssets { bezel, glare })
    }

    pub fn from_files(bezel: impl AsRef<Path>, glare: impl AsRef<Path>) -> Result<Self, ScreenError> {
        let bezel_image = Self::open_layer("bezel", bezel.as_ref())?;
        let glare_image = Self::open_layer("glare", glare.as_ref())?;

        log::info!("Loaded overlay images from {:?} and {:?}", bezel.as_ref(), glare.as_ref());

        Self::new(bezel_image, glare_image)
    }

    pub fn from_memory(bezel: &[u8], glare: &[u8]) -> Result<Self, ScreenError> {
        Self::new(Self::decode_layer("bezel", bezel)?, Self::decode_layer("glare", glare)?)
    }

    /// Loads a single overlay layer from disk, `asset` names the layer in the error.
    pub fn open_layer(asset: &'static str, path: impl AsRef<Path>) -> Result<RgbaImage, ScreenError> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|e| ScreenError::asset(asset, format!("{:?}: {}", path, e)))?;

        Ok(image.into_rgba8())
    }

    pub fn decode_layer(asset: &'static str, bytes: &[u8]) -> Result<RgbaImage, ScreenError> {
        let image = image::load_from_memory(bytes).map_err(|e| ScreenError::asset(asset, e))?;

        Ok(image.into_rgba8())
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.bezel.dimensions()
    }

    pub fn bezel(&self) -> &RgbaImage {
        &self.bezel
    }

    pub fn glare(&self) -> &RgbaImage {
        &self.glare
    }
}

/// A fully composed image, handed off to whoever presents it.
#[derive(Debug, Clone)]
pub struct FinalFrame {
    pub image: RgbaImage,
    /// The key state as of the tick that produced this frame, for status displays.
    pub keys: KeyFlags,
    pub tick: u64,
}

/// Places the phosphor surface inside the bezel and puts the glare on top.
pub struct OverlayCompositor {
    assets: StaticOverlayAssets,
    surface_x: u32,
    surface_y: u32,
}

impl OverlayCompositor {
    /// Fails if a phosphor surface of `geometry` would not fit inside the bezel.
    pub fn new(assets: StaticOverlayAssets, geometry: CrtGeometry) -> Result<Self, ScreenError> {
        let (width, height) = assets.dimensions();

        if !geometry.surface_fits_frame(width, height) {
            return Err(ScreenError::asset(
                "bezel",
                format!(
                    "a {}x{} bezel can't hold a {}x{} screen at ({}, {})",
                    width, height, geometry.surface_width, geometry.surface_height, geometry.surface_x, geometry.surface_y
                ),
            ));
        }

        Ok(OverlayCompositor {
            assets,
            surface_x: geometry.surface_x,
            surface_y: geometry.surface_y,
        })
    }

    pub fn compose(&self, phosphor_surface: &RgbaImage) -> RgbaImage {
        let (width, height) = self.assets.dimensions();
        let mut frame = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0xFF]));

        draw_over(&mut frame, phosphor_surface, self.surface_x, self.surface_y);
        draw_over(&mut frame, &self.assets.bezel, 0, 0);
        draw_over(&mut frame, &self.assets.glare, 0, 0);

        frame
    }
}

use anyhow::Context;
use image::RgbaImage;
use sdl2::pixels::Color;
use sdl2::pixels::PixelFormatEnum::ABGR8888;
use sdl2::render::{Texture, WindowCanvas};
use sdl2::video::FullscreenType;
use sdl2::VideoSubsystem;

const BYTES_PER_PIXEL: usize = 4;

/// The window the composed CRT frames end up in.
pub struct Renderer {
    pub main_window: WindowCanvas,
    main_texture: Texture,
    frame_width: u32,
}

impl Renderer {
    pub fn new(sdl_video_system: &VideoSubsystem, frame_width: u32, frame_height: u32) -> anyhow::Result<Self> {
        let mut main_window = sdl_video_system
            .window("Screenpad", frame_width / 2, frame_height / 2)
            .position_centered()
            .resizable()
            .allow_highdpi()
            .build()?
            .into_canvas()
            .accelerated()
            .build()?;
        let main_texture = setup_sdl(&mut main_window, frame_width, frame_height)?;

        Ok(Renderer {
            main_window,
            main_texture,
            frame_width,
        })
    }

    pub fn render_main_window(&mut self, frame: &RgbaImage) -> anyhow::Result<()> {
        fill_texture_and_copy(&mut self.main_window, &mut self.main_texture, frame, self.frame_width)?;

        self.main_window.present();
        Ok(())
    }

    pub fn toggle_main_window_fullscreen(&mut self, fullscreen: bool) {
        let mode = if fullscreen {
            FullscreenType::Desktop
        } else {
            FullscreenType::Off
        };

        if let Err(e) = self.main_window.window_mut().set_fullscreen(mode) {
            log::warn!("Failed to switch fullscreen mode: {}", e);
        }
    }

    pub fn set_title(&mut self, title: &str) {
        if let Err(e) = self.main_window.window_mut().set_title(title) {
            log::warn!("Failed to set window title: {}", e);
        }
    }
}

fn setup_sdl(canvas: &mut WindowCanvas, width: u32, height: u32) -> anyhow::Result<Texture> {
    canvas.set_draw_color(Color::RGB(0, 0, 0));
    canvas.clear();

    // Letterbox instead of stretching the bezel when the window has a different aspect ratio.
    canvas.set_logical_size(width, height)?;

    canvas.present();
    Ok(canvas.create_texture_streaming(ABGR8888, width, height)?)
}

/// `ABGR8888` is a packed format, on little endian machines that's `RGBA` byte order.
fn fill_texture_and_copy(
    canvas: &mut WindowCanvas,
    texture: &mut Texture,
    frame: &RgbaImage,
    frame_width: u32,
) -> anyhow::Result<()> {
    texture.update(None, frame.as_raw(), frame_width as usize * BYTES_PER_PIXEL)?;

    canvas.clear();
    canvas
        .copy(texture, None, None)
        .map_err(anyhow::Error::msg)
        .context("Failed to copy frame to the window")
}

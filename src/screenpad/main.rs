use anyhow::Context;
use crossbeam::channel::*;
use gumdrop::Options;
use log::LevelFilter;
use log::*;
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;
use simplelog::{CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode, WriteLogger};
use std::fs::{create_dir_all, File};
use std::sync::Arc;
use std::time::Instant;

use screenpad::network::KeyStateAnnouncer;
use screenpad::storage::{FileStorage, Storage};
use screenpad_core::display::frame::PixelGrid;
use screenpad_core::display::overlay::{FinalFrame, StaticOverlayAssets};
use screenpad_core::error::ScreenError;
use screenpad_core::peripherals::PeripheralStateStore;
use screenpad_core::render::{RenderLoop, RenderRunner};
use screenpad_core::scheduler::FRAME_DELAY;
use screenpad_core::{KeyFlags, KeyPad, DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH};

use crate::audio::BeepPlayer;
use crate::communication::{ChannelPresenter, ChannelToneGenerator};
use crate::ingest::IngestRunner;
use crate::keypad::keycode_to_key;
use crate::options::AppOptions;
use crate::rendering::Renderer;
use crate::state::{AppScreenState, AppSettings};

mod audio;
mod communication;
mod ingest;
mod keypad;
mod options;
mod rendering;
mod state;

const CONFIG_FILENAME: &str = "config.json";
const BUNDLED_BEZEL: &[u8] = include_bytes!("../../assets/crt_bezel.png");
const BUNDLED_GLARE: &[u8] = include_bytes!("../../assets/crt_glare.png");

fn main() -> anyhow::Result<()> {
    let options: AppOptions = AppOptions::parse_args_default_or_exit();
    init_logging(&options)?;

    let file_storage = FileStorage::new();
    if file_storage.is_none() {
        warn!("No home directory found, settings won't be saved");
    }
    let mut app_settings: AppSettings = file_storage
        .as_ref()
        .and_then(|storage| storage.get_value(CONFIG_FILENAME))
        .unwrap_or_default();
    let session = app_settings.with_overrides(&options);

    let assets = load_assets(&options)?;
    let (frame_width, frame_height) = assets.dimensions();
    let store = Arc::new(PeripheralStateStore::new(PixelGrid::blank(
        DEFAULT_SCREEN_WIDTH,
        DEFAULT_SCREEN_HEIGHT,
    )));

    let sdl_context = sdl2::init().map_err(anyhow::Error::msg)?;
    let audio_subsystem = sdl_context.audio().map_err(anyhow::Error::msg)?;
    let video_subsystem = sdl_context.video().map_err(anyhow::Error::msg)?;

    let mut renderer = Renderer::new(&video_subsystem, frame_width, frame_height)?;
    let mut beep_player = BeepPlayer::new(
        &audio_subsystem,
        session.tone_frequency,
        session.tone_volume,
        session.audio_mute,
    )
    .map_err(anyhow::Error::msg)?;

    let (frame_sender, frame_receiver) = bounded::<FinalFrame>(1);
    let (tone_sender, tone_receiver) = unbounded();

    let mut render_loop = RenderLoop::new(
        store.clone(),
        session.crt_options(),
        assets,
        ChannelPresenter::new(frame_sender),
        ChannelToneGenerator::new(tone_sender),
    )?;
    render_loop.set_tone_frequency(session.tone_frequency);
    let mut render_runner = RenderRunner::spawn(render_loop)?;

    let mut ingest_runner = IngestRunner::start(session.screen_group(), session.screen_port, store)
        .with_context(|| format!("Failed to join {}:{}", session.screen_group(), session.screen_port))?;
    let announcer = KeyStateAnnouncer::new(session.keypad_group(), session.keypad_port)?;
    info!("Announcing key presses to {}", announcer.target());

    let mut event_pump = sdl_context.event_pump().map_err(anyhow::Error::msg)?;
    let mut screen_state = AppScreenState::default();
    let mut keypad = KeyPad::new();
    let mut most_recent_frame: Option<FinalFrame> = None;
    let mut frames_shown = 0;
    let mut last_update_time = Instant::now();

    'mainloop: loop {
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                }
                | Event::Window {
                    win_event: WindowEvent::Close,
                    ..
                } => {
                    screen_state.exit = true;
                }
                Event::KeyDown {
                    keycode: Some(key),
                    repeat: false,
                    ..
                } => {
                    if let Some(flag) = keycode_to_key(key) {
                        if keypad.press(flag) {
                            announce(&announcer, &keypad);
                        }
                    } else {
                        match key {
                            Keycode::F11 => {
                                screen_state.fullscreen = !screen_state.fullscreen;
                                renderer.toggle_main_window_fullscreen(screen_state.fullscreen);
                            }
                            Keycode::F12 => save_screenshot(file_storage.as_ref(), most_recent_frame.as_ref()),
                            Keycode::M => {
                                app_settings.audio_mute = beep_player.toggle_mute();
                                info!("Beep {}", if beep_player.is_muted() { "muted" } else { "unmuted" });
                            }
                            _ => {}
                        }
                    }
                }
                Event::KeyUp {
                    keycode: Some(key), ..
                } => {
                    if let Some(flag) = keycode_to_key(key) {
                        keypad.release(flag);
                        announce(&announcer, &keypad);
                    }
                }
                _ => {}
            }
        }

        if screen_state.exit {
            break 'mainloop;
        }

        for request in tone_receiver.try_iter() {
            beep_player.handle_request(request);
        }

        match frame_receiver.recv_timeout(FRAME_DELAY) {
            Ok(frame) => {
                renderer.render_main_window(&frame.image)?;
                most_recent_frame = Some(frame);
                frames_shown += 1;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                error!("Render thread stopped unexpectedly");
                break 'mainloop;
            }
        }

        if last_update_time.elapsed().as_millis() >= 1000 {
            let average_delta = last_update_time.elapsed();
            let keys = most_recent_frame.as_ref().map(|f| f.keys).unwrap_or_else(KeyFlags::empty);
            renderer.set_title(&format!(
                "Screenpad - {:.2} FPS - Keys [{}]",
                frames_shown as f64 / average_delta.as_secs_f64(),
                keys.held_keys().map(|key| format!("{:X}", key)).collect::<Vec<_>>().join(" ")
            ));
            last_update_time = Instant::now();
            frames_shown = 0;
        }
    }

    ingest_runner.stop();
    render_runner.stop();

    if let Some(storage) = &file_storage {
        if let Err(e) = storage.save_value(CONFIG_FILENAME, &app_settings) {
            error!("Failed to save settings: {}", e);
        }
    }

    Ok(())
}

fn init_logging(options: &AppOptions) -> anyhow::Result<()> {
    let level = options.log_level.unwrap_or(LevelFilter::Info);
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(level, Config::default(), TerminalMode::Mixed)];

    if let Some(path) = &options.log_file {
        let file = File::create(path).with_context(|| format!("Failed to create log file {}", path))?;
        loggers.push(WriteLogger::new(
            level,
            ConfigBuilder::new().set_location_level(LevelFilter::Off).build(),
            std::io::BufWriter::new(file),
        ));
    }

    CombinedLogger::init(loggers)?;
    Ok(())
}

fn load_assets(options: &AppOptions) -> Result<StaticOverlayAssets, ScreenError> {
    match (&options.bezel, &options.glare) {
        (None, None) => StaticOverlayAssets::from_memory(BUNDLED_BEZEL, BUNDLED_GLARE),
        (Some(bezel), Some(glare)) => StaticOverlayAssets::from_files(bezel, glare),
        (Some(bezel), None) => StaticOverlayAssets::new(
            StaticOverlayAssets::open_layer("bezel", bezel)?,
            StaticOverlayAssets::decode_layer("glare", BUNDLED_GLARE)?,
        ),
        (None, Some(glare)) => StaticOverlayAssets::new(
            StaticOverlayAssets::decode_layer("bezel", BUNDLED_BEZEL)?,
            StaticOverlayAssets::open_layer("glare", glare)?,
        ),
    }
}

fn announce(announcer: &KeyStateAnnouncer, keypad: &KeyPad) {
    if let Err(e) = announcer.announce(keypad) {
        warn!("Failed to announce key state {:?}: {}", keypad.flags(), e);
    }
}

fn save_screenshot(storage: Option<&FileStorage>, frame: Option<&FinalFrame>) {
    let (storage, frame) = match (storage, frame) {
        (Some(storage), Some(frame)) => (storage, frame),
        _ => return,
    };

    let directory = storage.data_dir().join("screenshots");
    let path = directory.join(format!("screenpad-{}.png", frame.tick));

    let result = create_dir_all(&directory)
        .map_err(anyhow::Error::from)
        .and_then(|_| frame.image.save(&path).map_err(anyhow::Error::from));

    match result {
        Ok(()) => info!("Saved screenshot to {}", path.display()),
        Err(e) => error!("Failed to save screenshot to {}: {}", path.display(), e),
    }
}

use gumdrop::Options;
use log::LevelFilter;
use screenpad_core::display::palette::PhosphorTint;
use std::net::Ipv4Addr;

/// Command line overrides, these take precedence over `config.json` for the current session.
#[derive(Options, Debug, Default)]
pub struct AppOptions {
    /// Print this help message
    #[options()]
    help: bool,
    /// The multicast group the emulator broadcasts its peripheral state on
    #[options(no_short, meta = "ADDR")]
    pub group: Option<Ipv4Addr>,
    /// The port of the peripheral state broadcast
    #[options(no_short, meta = "PORT")]
    pub port: Option<u16>,
    /// The multicast group key presses are announced on
    #[options(no_short, meta = "ADDR")]
    pub keypad_group: Option<Ipv4Addr>,
    /// The port key presses are announced on
    #[options(no_short, meta = "PORT")]
    pub keypad_port: Option<u16>,
    /// A PNG to use as the bezel instead of the built in one
    #[options(no_short, meta = "PATH")]
    pub bezel: Option<String>,
    /// A PNG to use as the glare instead of the built in one
    #[options(no_short, meta = "PATH")]
    pub glare: Option<String>,
    /// The phosphor colour, either `green` or `white`
    #[options(no_short, meta = "TINT")]
    pub tint: Option<PhosphorTint>,
    /// The terminal log level (off, error, warn, info, debug, trace)
    #[options(no_short, meta = "LEVEL")]
    pub log_level: Option<LevelFilter>,
    /// Additionally write the log to this file
    #[options(no_short, meta = "PATH")]
    pub log_file: Option<String>,
    /// Start with the beep muted
    #[options(no_short)]
    pub mute: bool,
}

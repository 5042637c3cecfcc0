use crate::options::AppOptions;
use nanoserde::{DeJson, SerJson};
use screenpad::network::{DEFAULT_KEYPAD_GROUP, DEFAULT_KEYPAD_PORT, DEFAULT_SCREEN_GROUP, DEFAULT_SCREEN_PORT};
use screenpad_core::display::palette::PhosphorTint;
use screenpad_core::sound::{DEFAULT_TONE_FREQUENCY, DEFAULT_TONE_VOLUME};
use screenpad_core::{CrtOptions, CrtOptionsBuilder};
use std::net::Ipv4Addr;

#[derive(Default, Debug, Copy, Clone)]
/// Struct for non-persistent options during runtime.
pub struct AppScreenState {
    /// Whether the window is currently fullscreen.
    pub fullscreen: bool,
    /// Whether the app should exit asap
    pub exit: bool,
}

#[derive(Debug, Clone, PartialEq, SerJson, DeJson)]
/// Struct for persistent options.
pub struct AppSettings {
    /// `green` or `white`
    pub tint: String,
    pub decay_alpha: u8,
    pub scanline_alpha: u8,
    /// Every how many rows of the phosphor surface a scanline is drawn, 0 disables them.
    pub scanline_period: u32,
    pub tone_frequency: u32,
    pub tone_volume: f32,
    pub audio_mute: bool,
    pub screen_group: String,
    pub screen_port: u16,
    pub keypad_group: String,
    pub keypad_port: u16,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            tint: PhosphorTint::Green.to_string(),
            decay_alpha: 0x40,
            scanline_alpha: 0x80,
            scanline_period: 3,
            tone_frequency: DEFAULT_TONE_FREQUENCY,
            tone_volume: DEFAULT_TONE_VOLUME,
            audio_mute: false,
            screen_group: DEFAULT_SCREEN_GROUP.to_string(),
            screen_port: DEFAULT_SCREEN_PORT,
            keypad_group: DEFAULT_KEYPAD_GROUP.to_string(),
            keypad_port: DEFAULT_KEYPAD_PORT,
        }
    }
}

impl AppSettings {
    /// The settings for this session, with the command line taking precedence.
    pub fn with_overrides(&self, options: &AppOptions) -> AppSettings {
        let mut session = self.clone();

        if let Some(group) = options.group {
            session.screen_group = group.to_string();
        }
        if let Some(port) = options.port {
            session.screen_port = port;
        }
        if let Some(group) = options.keypad_group {
            session.keypad_group = group.to_string();
        }
        if let Some(port) = options.keypad_port {
            session.keypad_port = port;
        }
        if let Some(tint) = options.tint {
            session.tint = tint.to_string();
        }
        session.audio_mute |= options.mute;

        session
    }

    pub fn tint(&self) -> PhosphorTint {
        self.tint.parse().unwrap_or_else(|e| {
            log::warn!("{}, falling back to {}", e, PhosphorTint::default());
            PhosphorTint::default()
        })
    }

    pub fn screen_group(&self) -> Ipv4Addr {
        parse_group(&self.screen_group, DEFAULT_SCREEN_GROUP)
    }

    pub fn keypad_group(&self) -> Ipv4Addr {
        parse_group(&self.keypad_group, DEFAULT_KEYPAD_GROUP)
    }

    pub fn crt_options(&self) -> CrtOptions {
        CrtOptionsBuilder::new()
            .with_tint(self.tint())
            .with_decay_alpha(self.decay_alpha)
            .with_scanline_alpha(self.scanline_alpha)
            .with_scanline_period(self.scanline_period)
            .build()
    }
}

fn parse_group(group: &str, fallback: Ipv4Addr) -> Ipv4Addr {
    group.parse().unwrap_or_else(|e| {
        log::warn!("Invalid multicast group {:?} ({}), falling back to {}", group, e, fallback);
        fallback
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gumdrop::Options;
    use pretty_assertions::assert_eq;

    #[test]
    fn settings_survive_json() {
        let settings = AppSettings {
            tint: "white".to_string(),
            scanline_period: 0,
            ..AppSettings::default()
        };

        let json = settings.serialize_json();

        assert_eq!(AppSettings::deserialize_json(&json).unwrap(), settings);
    }

    #[test]
    fn defaults_match_the_emulator_broadcast() {
        let settings = AppSettings::default();

        assert_eq!(settings.screen_group(), Ipv4Addr::new(230, 0, 0, 0));
        assert_eq!((settings.screen_port, settings.keypad_port), (9999, 9998));
        assert_eq!(settings.tint(), PhosphorTint::Green);
        assert_eq!(settings.crt_options(), CrtOptions::default());
    }

    #[test]
    fn command_line_overrides_settings() {
        let options =
            AppOptions::parse_args_default(&["--port", "4000", "--tint", "white", "--keypad-group", "239.1.2.3", "--mute"])
                .unwrap();

        let session = AppSettings::default().with_overrides(&options);

        assert_eq!(session.screen_port, 4000);
        assert_eq!(session.tint(), PhosphorTint::White);
        assert_eq!(session.keypad_group(), Ipv4Addr::new(239, 1, 2, 3));
        assert!(session.audio_mute);
        assert_eq!(session.screen_group(), DEFAULT_SCREEN_GROUP);
    }

    #[test]
    fn invalid_values_fall_back() {
        let settings = AppSettings {
            tint: "purple".to_string(),
            screen_group: "not an address".to_string(),
            ..AppSettings::default()
        };

        assert_eq!(settings.tint(), PhosphorTint::Green);
        assert_eq!(settings.screen_group(), DEFAULT_SCREEN_GROUP);
    }
}

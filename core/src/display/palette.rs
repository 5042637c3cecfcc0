use std::fmt;
use std::str::FromStr;

/// A straight (non-premultiplied) RGBA colour.
#[derive(Copy, Clone, Debug, Default, PartialOrd, PartialEq)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

impl Rgba {
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Rgba(r, g, b, 0xFF)
    }

    /// The same colour with its alpha set to zero.
    ///
    /// Keeping the colour channels of an off pixel equal to the on colour means bilinear
    /// upscaling only ever interpolates the alpha, so edges don't pick up a dark fringe.
    pub const fn transparent(self) -> Self {
        Rgba(self.0, self.1, self.2, 0x00)
    }
}

impl From<Rgba> for image::Rgba<u8> {
    fn from(colour: Rgba) -> Self {
        image::Rgba([colour.0, colour.1, colour.2, colour.3])
    }
}

impl From<(u8, u8, u8, u8)> for Rgba {
    fn from(rgba_tuple: (u8, u8, u8, u8)) -> Self {
        Rgba(rgba_tuple.0, rgba_tuple.1, rgba_tuple.2, rgba_tuple.3)
    }
}

impl Into<(u8, u8, u8, u8)> for Rgba {
    fn into(self) -> (u8, u8, u8, u8) {
        (self.0, self.1, self.2, self.3)
    }
}

pub const GREEN_PHOSPHOR: Rgba = Rgba::opaque(0x00, 0x88, 0x00);
pub const WHITE_PHOSPHOR: Rgba = Rgba::opaque(0xFF, 0xFF, 0xFF);

/// Colour presets for the lit pixels.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PhosphorTint {
    Green,
    White,
}

impl PhosphorTint {
    /// Returns the `(on, off)` pixel colours for this tint.
    pub fn colours(self) -> (Rgba, Rgba) {
        let on = match self {
            PhosphorTint::Green => GREEN_PHOSPHOR,
            PhosphorTint::White => WHITE_PHOSPHOR,
        };
        (on, on.transparent())
    }
}

impl Default for PhosphorTint {
    fn default() -> Self {
        PhosphorTint::Green
    }
}

impl FromStr for PhosphorTint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "green" => Ok(PhosphorTint::Green),
            "white" => Ok(PhosphorTint::White),
            other => Err(format!("unknown tint `{}`, expected `green` or `white`", other)),
        }
    }
}

impl fmt::Display for PhosphorTint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhosphorTint::Green => write!(f, "green"),
            PhosphorTint::White => write!(f, "white"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_off_colour_is_transparent_on_colour() {
        let (on, off) = PhosphorTint::Green.colours();

        assert_eq!(on, Rgba(0x00, 0x88, 0x00, 0xFF));
        assert_eq!(off, Rgba(0x00, 0x88, 0x00, 0x00));
    }

    #[test]
    fn test_parse_tint() {
        assert_eq!("White".parse::<PhosphorTint>(), Ok(PhosphorTint::White));
        assert_eq!("green".parse::<PhosphorTint>(), Ok(PhosphorTint::Green));
        assert!("amber".parse::<PhosphorTint>().is_err());
    }
}

//! Color channels and their propagation wavelengths

use super::units::{Meters, Nanometers};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wavelength used for the red channel (560 nm)
pub const RED_WAVELENGTH: Nanometers = Nanometers::new(560.0);
/// Wavelength used for the green channel and grayscale sources (530 nm)
pub const GREEN_WAVELENGTH: Nanometers = Nanometers::new(530.0);
/// Wavelength used for the blue channel (430 nm)
pub const BLUE_WAVELENGTH: Nanometers = Nanometers::new(430.0);

/// Image channel a field was taken from
///
/// Each channel propagates at its own fixed wavelength. Grayscale sources use
/// the green wavelength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Single-channel (luminance) source
    Gray,
    /// Red plane of an RGB source
    Red,
    /// Green plane of an RGB source
    Green,
    /// Blue plane of an RGB source
    Blue,
}

impl Channel {
    /// The three planes of an RGB source, in stacking order
    pub const RGB: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    /// Wavelength this channel propagates at
    #[must_use]
    pub const fn wavelength_nm(self) -> Nanometers {
        match self {
            Self::Red => RED_WAVELENGTH,
            Self::Gray | Self::Green => GREEN_WAVELENGTH,
            Self::Blue => BLUE_WAVELENGTH,
        }
    }

    /// Wavelength in meters
    #[must_use]
    pub fn wavelength(self) -> Meters {
        self.wavelength_nm().to_meters()
    }

    /// Lowercase display label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Gray => "gray",
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_channel_wavelengths() {
        assert_relative_eq!(*Channel::Red.wavelength(), 560e-9, max_relative = 1e-12);
        assert_relative_eq!(*Channel::Green.wavelength(), 530e-9, max_relative = 1e-12);
        assert_relative_eq!(*Channel::Blue.wavelength(), 430e-9, max_relative = 1e-12);
    }

    #[test]
    fn test_gray_uses_green_wavelength() {
        assert_eq!(Channel::Gray.wavelength(), Channel::Green.wavelength());
    }

    #[test]
    fn test_labels() {
        let labels: Vec<String> = Channel::RGB.iter().map(ToString::to_string).collect();
        assert_eq!(labels, ["red", "green", "blue"]);
    }
}

//! Image color spaces.

use crate::error::{Error, Result};

/// Color space of an image XObject, resolved from its `/ColorSpace` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorSpace {
    /// DeviceGray, CalGray, or ICCBased with one component
    Gray,
    /// DeviceRGB, CalRGB, or ICCBased with three components
    Rgb,
    /// DeviceCMYK, or ICCBased with four components
    Cmyk,
    /// Palette lookup into a base space
    Indexed {
        base: Box<ColorSpace>,
        hival: u8,
        lookup: Vec<u8>,
    },
    /// Anything we cannot convert (Lab, Separation, DeviceN, Pattern)
    Unsupported(String),
}

impl ColorSpace {
    /// Map a device or CIE-based family name to a color space.
    pub fn from_family(name: &str) -> Self {
        match name {
            "DeviceGray" | "CalGray" | "G" => ColorSpace::Gray,
            "DeviceRGB" | "CalRGB" | "RGB" => ColorSpace::Rgb,
            "DeviceCMYK" | "CMYK" => ColorSpace::Cmyk,
            other => ColorSpace::Unsupported(other.to_string()),
        }
    }

    /// Map an ICC profile component count to a color space.
    pub fn from_icc_components(n: i64) -> Self {
        match n {
            1 => ColorSpace::Gray,
            3 => ColorSpace::Rgb,
            4 => ColorSpace::Cmyk,
            other => ColorSpace::Unsupported(format!("ICCBased with {} components", other)),
        }
    }

    /// Number of color components per sample.
    pub fn components(&self) -> Result<usize> {
        match self {
            ColorSpace::Gray | ColorSpace::Indexed { .. } => Ok(1),
            ColorSpace::Rgb => Ok(3),
            ColorSpace::Cmyk => Ok(4),
            ColorSpace::Unsupported(name) => Err(Error::UnsupportedColorSpace(name.clone())),
        }
    }
}

/// Naive CMYK to RGB conversion without a color profile.
pub fn cmyk_to_rgb(c: u8, m: u8, y: u8, k: u8) -> [u8; 3] {
    let white = 255 - k as u16;
    let channel = |v: u8| ((255 - v as u16) * white / 255) as u8;
    [channel(c), channel(m), channel(y)]
}

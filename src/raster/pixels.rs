//! Raw sample buffers to `image` buffers.

use image::{DynamicImage, GrayImage, RgbImage};

use super::color::{cmyk_to_rgb, ColorSpace};
use crate::error::{Error, Result};

/// Build an image from unfiltered samples.
///
/// Rows are padded to a byte boundary; samples are packed MSB first.
/// `inverted` flips every component, as a `/Decode [1 0 ...]` array does.
pub fn samples_to_image(
    data: &[u8],
    width: u32,
    height: u32,
    bits_per_component: u8,
    space: &ColorSpace,
    inverted: bool,
) -> Result<DynamicImage> {
    let components = space.components()?;
    let values = unpack_samples(data, width, height, components, bits_per_component)?;

    match space {
        ColorSpace::Indexed {
            base,
            hival,
            lookup,
        } => {
            let base_components = base.components()?;
            let mut expanded = Vec::with_capacity(values.len() * base_components);
            for &index in &values {
                let start = usize::from(index).min(usize::from(*hival)) * base_components;
                let entry = lookup
                    .get(start..start + base_components)
                    .ok_or_else(|| Error::Decode("Indexed lookup table too short".to_string()))?;
                expanded.extend_from_slice(entry);
            }
            build(expanded, width, height, base)
        }
        _ => {
            let scaled = values
                .iter()
                .map(|&v| {
                    let v = scale_to_u8(v, bits_per_component);
                    if inverted {
                        255 - v
                    } else {
                        v
                    }
                })
                .collect();
            build(scaled, width, height, space)
        }
    }
}

/// Build an image from a 1-bit stencil mask.
///
/// Painted samples come out black on a white background. By default a 0 bit
/// is painted; `inverted` swaps that.
pub fn mask_to_image(data: &[u8], width: u32, height: u32, inverted: bool) -> Result<DynamicImage> {
    let bits = unpack_samples(data, width, height, 1, 1)?;
    let pixels = bits
        .iter()
        .map(|&bit| if (bit == 1) != inverted { 255 } else { 0 })
        .collect();
    build(pixels, width, height, &ColorSpace::Gray)
}

fn build(samples: Vec<u8>, width: u32, height: u32, space: &ColorSpace) -> Result<DynamicImage> {
    let image = match space {
        ColorSpace::Gray => GrayImage::from_raw(width, height, samples).map(DynamicImage::ImageLuma8),
        ColorSpace::Rgb => RgbImage::from_raw(width, height, samples).map(DynamicImage::ImageRgb8),
        ColorSpace::Cmyk => {
            let rgb = samples
                .chunks_exact(4)
                .flat_map(|p| cmyk_to_rgb(p[0], p[1], p[2], p[3]))
                .collect();
            RgbImage::from_raw(width, height, rgb).map(DynamicImage::ImageRgb8)
        }
        ColorSpace::Indexed { .. } => {
            return Err(Error::UnsupportedColorSpace(
                "Indexed with an Indexed base".to_string(),
            ))
        }
        ColorSpace::Unsupported(name) => return Err(Error::UnsupportedColorSpace(name.clone())),
    };

    image.ok_or_else(|| Error::Decode("sample buffer does not match image dimensions".to_string()))
}

/// Split packed rows into one value per sample.
fn unpack_samples(
    data: &[u8],
    width: u32,
    height: u32,
    components: usize,
    bits_per_component: u8,
) -> Result<Vec<u16>> {
    let bpc = usize::from(bits_per_component);
    if !matches!(bpc, 1 | 2 | 4 | 8 | 16) {
        return Err(Error::Decode(format!(
            "unsupported bits per component: {}",
            bits_per_component
        )));
    }

    let too_large = || {
        Error::Decode(format!(
            "image dimensions {}x{} with {} components at {} bits overflow",
            width, height, components, bpc
        ))
    };
    let samples_per_row = (width as usize)
        .checked_mul(components)
        .ok_or_else(too_large)?;
    let row_bytes = samples_per_row
        .checked_mul(bpc)
        .ok_or_else(too_large)?
        .div_ceil(8);
    let expected = row_bytes
        .checked_mul(height as usize)
        .ok_or_else(too_large)?;
    if data.len() < expected {
        return Err(Error::Decode(format!(
            "image data too short: expected {} bytes, got {}",
            expected,
            data.len()
        )));
    }

    let mut values = Vec::with_capacity(samples_per_row * height as usize);
    for row in data[..expected].chunks_exact(row_bytes) {
        match bpc {
            8 => values.extend(row.iter().map(|&b| u16::from(b))),
            16 => values.extend(
                row.chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]])),
            ),
            _ => {
                let mask = (1u16 << bpc) - 1;
                for i in 0..samples_per_row {
                    let bit = i * bpc;
                    let shift = 8 - bpc - (bit % 8);
                    values.push((u16::from(row[bit / 8]) >> shift) & mask);
                }
            }
        }
    }
    Ok(values)
}

fn scale_to_u8(value: u16, bits_per_component: u8) -> u8 {
    match bits_per_component {
        8 => value as u8,
        16 => (value >> 8) as u8,
        bpc => {
            let max = (1u32 << bpc) - 1;
            ((u32::from(value) * 255 + max / 2) / max) as u8
        }
    }
}

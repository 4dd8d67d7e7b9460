//! Embedded raster images.
//!
//! An [`ImageXObject`] is everything needed to turn one image stream into
//! pixels, detached from the document it came from.

mod color;
mod pixels;

pub use color::{cmyk_to_rgb, ColorSpace};
pub use pixels::{mask_to_image, samples_to_image};

use image::{DynamicImage, ImageFormat};
use lopdf::ObjectId;

use crate::error::{Error, Result};
use crate::filter::{decode_chain, DecodeParams, Decoded, Filter};

/// An image XObject read out of the document.
#[derive(Debug, Clone)]
pub struct ImageXObject {
    /// Object id of the image stream (its xref)
    pub id: ObjectId,
    /// Width in samples
    pub width: u32,
    /// Height in samples
    pub height: u32,
    /// Bits per color component
    pub bits_per_component: u8,
    /// Resolved color space; `None` for stencil masks and self-describing codecs
    pub color_space: Option<ColorSpace>,
    /// Whether this is a 1-bit stencil mask
    pub image_mask: bool,
    /// Whether `/Decode` reverses the sample range
    pub decode_inverted: bool,
    /// Filter chain, in decoding order
    pub filters: Vec<Filter>,
    /// Parameters for each filter in `filters`
    pub decode_params: Vec<DecodeParams>,
    /// Raw (still filtered) stream bytes
    pub data: Vec<u8>,
}

impl ImageXObject {
    /// Decode the stream into pixels.
    pub fn decode(&self) -> Result<DynamicImage> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Decode(format!(
                "image has empty dimensions {}x{}",
                self.width, self.height
            )));
        }

        match decode_chain(&self.data, &self.filters, &self.decode_params)? {
            Decoded::Jpeg(bytes) => Ok(image::load_from_memory_with_format(
                &bytes,
                ImageFormat::Jpeg,
            )?),
            Decoded::Samples(samples) if self.image_mask => {
                mask_to_image(&samples, self.width, self.height, self.decode_inverted)
            }
            Decoded::Samples(samples) => {
                let space = self.color_space.as_ref().ok_or_else(|| {
                    Error::UnsupportedColorSpace("missing /ColorSpace".to_string())
                })?;
                samples_to_image(
                    &samples,
                    self.width,
                    self.height,
                    self.bits_per_component,
                    space,
                    self.decode_inverted,
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::{Cursor, Write};

    fn rgb_xobject(data: Vec<u8>, filters: Vec<Filter>) -> ImageXObject {
        ImageXObject {
            id: (7, 0),
            width: 2,
            height: 1,
            bits_per_component: 8,
            color_space: Some(ColorSpace::Rgb),
            image_mask: false,
            decode_inverted: false,
            filters,
            decode_params: Vec::new(),
            data,
        }
    }

    #[test]
    fn test_decode_flate_rgb() {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&[10, 20, 30, 40, 50, 60]).unwrap();
        let xobj = rgb_xobject(encoder.finish().unwrap(), vec![Filter::Flate]);

        let rgb = xobj.decode().unwrap().to_rgb8();
        assert_eq!(rgb.dimensions(), (2, 1));
        assert_eq!(rgb.get_pixel(1, 0).0, [40, 50, 60]);
    }

    #[test]
    fn test_decode_jpeg() {
        let source = image::RgbImage::from_pixel(4, 4, image::Rgb([200, 10, 10]));
        let mut jpeg = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(source)
            .write_to(&mut jpeg, ImageFormat::Jpeg)
            .unwrap();

        let mut xobj = rgb_xobject(jpeg.into_inner(), vec![Filter::Dct]);
        xobj.width = 4;
        xobj.height = 4;
        let decoded = xobj.decode().unwrap();
        assert_eq!(decoded.width(), 4);
        assert_eq!(decoded.height(), 4);
    }

    #[test]
    fn test_corrupt_jpeg_fails() {
        let xobj = rgb_xobject(b"not a jpeg".to_vec(), vec![Filter::Dct]);
        assert!(xobj.decode().is_err());
    }

    #[test]
    fn test_missing_color_space() {
        let mut xobj = rgb_xobject(vec![0; 6], Vec::new());
        xobj.color_space = None;
        assert!(matches!(
            xobj.decode(),
            Err(Error::UnsupportedColorSpace(_))
        ));
    }

    #[test]
    fn test_zero_width() {
        let mut xobj = rgb_xobject(Vec::new(), Vec::new());
        xobj.width = 0;
        assert!(matches!(xobj.decode(), Err(Error::Decode(_))));
    }
}

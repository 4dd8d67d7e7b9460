//! Stream filters for image XObjects.
//!
//! Image streams carry a filter chain (`/Filter`, optionally an array) with
//! matching parameters (`/DecodeParms`). General-purpose filters are undone
//! here in order; the chain may end in an image codec (`DCTDecode`), in which
//! case the remaining bytes are handed back as an encoded image rather than
//! raw samples.

mod ascii;
mod flate;
mod lzw;
mod predictor;
mod runlength;

pub use predictor::DecodeParams;

use predictor::apply_predictor;

use crate::error::{Error, Result};

/// A PDF stream filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// zlib/deflate compression
    Flate,
    /// Lempel-Ziv-Welch compression
    Lzw,
    /// Hexadecimal text encoding
    AsciiHex,
    /// Base-85 text encoding
    Ascii85,
    /// Byte-oriented run-length encoding
    RunLength,
    /// Baseline/progressive JPEG
    Dct,
    /// JPEG 2000
    Jpx,
    /// CCITT Group 3/4 fax
    CcittFax,
    /// JBIG2 bi-level
    Jbig2,
}

impl Filter {
    /// Parse a filter name, including the abbreviations allowed in inline
    /// image dictionaries.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "FlateDecode" | "Fl" => Ok(Filter::Flate),
            "LZWDecode" | "LZW" => Ok(Filter::Lzw),
            "ASCIIHexDecode" | "AHx" => Ok(Filter::AsciiHex),
            "ASCII85Decode" | "A85" => Ok(Filter::Ascii85),
            "RunLengthDecode" | "RL" => Ok(Filter::RunLength),
            "DCTDecode" | "DCT" => Ok(Filter::Dct),
            "JPXDecode" => Ok(Filter::Jpx),
            "CCITTFaxDecode" | "CCF" => Ok(Filter::CcittFax),
            "JBIG2Decode" => Ok(Filter::Jbig2),
            other => Err(Error::UnsupportedFilter(other.to_string())),
        }
    }

    /// The canonical PDF name of this filter.
    pub fn name(&self) -> &'static str {
        match self {
            Filter::Flate => "FlateDecode",
            Filter::Lzw => "LZWDecode",
            Filter::AsciiHex => "ASCIIHexDecode",
            Filter::Ascii85 => "ASCII85Decode",
            Filter::RunLength => "RunLengthDecode",
            Filter::Dct => "DCTDecode",
            Filter::Jpx => "JPXDecode",
            Filter::CcittFax => "CCITTFaxDecode",
            Filter::Jbig2 => "JBIG2Decode",
        }
    }

    /// Image codecs must be the last filter in a chain.
    pub fn is_image_codec(&self) -> bool {
        matches!(
            self,
            Filter::Dct | Filter::Jpx | Filter::CcittFax | Filter::Jbig2
        )
    }
}

/// Output of running a filter chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// Raw, row-padded image samples.
    Samples(Vec<u8>),
    /// A complete JPEG file.
    Jpeg(Vec<u8>),
}

/// Run `data` through `filters` in order.
///
/// `params` is indexed in parallel with `filters`; missing entries use the
/// defaults.
pub fn decode_chain(data: &[u8], filters: &[Filter], params: &[DecodeParams]) -> Result<Decoded> {
    let mut current = data.to_vec();

    for (i, filter) in filters.iter().enumerate() {
        if filter.is_image_codec() && i + 1 != filters.len() {
            return Err(Error::Decode(format!(
                "{} must be the last filter in the chain",
                filter.name()
            )));
        }

        let default_params = DecodeParams::default();
        let params = params.get(i).unwrap_or(&default_params);

        current = match filter {
            Filter::Flate => apply_predictor(&flate::decode(&current)?, params)?,
            Filter::Lzw => apply_predictor(&lzw::decode(&current, params.early_change)?, params)?,
            Filter::AsciiHex => ascii::decode_hex(&current)?,
            Filter::Ascii85 => ascii::decode_85(&current)?,
            Filter::RunLength => runlength::decode(&current)?,
            Filter::Dct => return Ok(Decoded::Jpeg(current)),
            Filter::Jpx | Filter::CcittFax | Filter::Jbig2 => {
                return Err(Error::UnsupportedFilter(filter.name().to_string()))
            }
        };
    }

    Ok(Decoded::Samples(current))
}

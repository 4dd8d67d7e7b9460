//! `/DecodeParms` and predictor reversal for Flate and LZW streams.

use crate::error::{Error, Result};

/// Decode parameters attached to a Flate or LZW filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeParams {
    /// 1 = none, 2 = TIFF, 10-15 = PNG
    pub predictor: i64,
    /// Samples per row
    pub columns: usize,
    /// Color components per sample
    pub colors: usize,
    /// Bits per color component
    pub bits_per_component: usize,
    /// LZW code width switch timing
    pub early_change: bool,
}

impl Default for DecodeParams {
    fn default() -> Self {
        Self {
            predictor: 1,
            columns: 1,
            colors: 1,
            bits_per_component: 8,
            early_change: true,
        }
    }
}

impl DecodeParams {
    /// Bytes per row of samples, excluding any PNG tag byte.
    fn row_bytes(&self) -> Result<usize> {
        self.columns
            .checked_mul(self.colors)
            .and_then(|n| n.checked_mul(self.bits_per_component))
            .map(|bits| bits.div_ceil(8))
            .filter(|&n| n > 0)
            .ok_or_else(|| {
                Error::Decode(format!(
                    "invalid predictor row: {} columns x {} colors x {} bits",
                    self.columns, self.colors, self.bits_per_component
                ))
            })
    }

    /// Distance in bytes to the corresponding byte of the previous pixel.
    fn pixel_bytes(&self) -> Result<usize> {
        self.colors
            .checked_mul(self.bits_per_component)
            .map(|bits| bits.div_ceil(8).max(1))
            .ok_or_else(|| Error::Decode("invalid predictor pixel size".to_string()))
    }
}

/// Undo the predictor described by `params`.
pub fn apply_predictor(data: &[u8], params: &DecodeParams) -> Result<Vec<u8>> {
    match params.predictor {
        1 => Ok(data.to_vec()),
        2 => tiff_predictor(data, params),
        10..=15 => png_predictor(data, params),
        other => Err(Error::Decode(format!("Unsupported predictor: {}", other))),
    }
}

/// A predicted stream must hold at least one full row; checked before any
/// row buffer is allocated.
fn ensure_row_fits(row_len: usize, data_len: usize) -> Result<()> {
    if row_len > data_len {
        return Err(Error::Decode(format!(
            "predictor row of {} bytes exceeds {} bytes of data",
            row_len, data_len
        )));
    }
    Ok(())
}

fn tiff_predictor(data: &[u8], params: &DecodeParams) -> Result<Vec<u8>> {
    if params.bits_per_component != 8 {
        return Err(Error::Decode(format!(
            "TIFF predictor with {} bits per component",
            params.bits_per_component
        )));
    }

    let row_len = params.row_bytes()?;
    let bpp = params.pixel_bytes()?;
    ensure_row_fits(row_len, data.len())?;
    let mut output = data.to_vec();
    for row in output.chunks_mut(row_len) {
        for i in bpp..row.len() {
            row[i] = row[i].wrapping_add(row[i - bpp]);
        }
    }
    Ok(output)
}

fn png_predictor(data: &[u8], params: &DecodeParams) -> Result<Vec<u8>> {
    let row_len = params.row_bytes()?;
    let bpp = params.pixel_bytes()?;
    let stride = row_len + 1;
    ensure_row_fits(stride, data.len())?;

    let mut output = Vec::with_capacity(data.len() / stride * row_len);
    let mut prev = vec![0u8; row_len];

    // A short final row is dropped.
    for encoded in data.chunks_exact(stride) {
        let tag = encoded[0];
        let mut row = encoded[1..].to_vec();

        match tag {
            0 => {}
            1 => {
                for i in bpp..row_len {
                    row[i] = row[i].wrapping_add(row[i - bpp]);
                }
            }
            2 => {
                for i in 0..row_len {
                    row[i] = row[i].wrapping_add(prev[i]);
                }
            }
            3 => {
                for i in 0..row_len {
                    let left = if i >= bpp { row[i - bpp] as u16 } else { 0 };
                    let avg = ((left + prev[i] as u16) / 2) as u8;
                    row[i] = row[i].wrapping_add(avg);
                }
            }
            4 => {
                for i in 0..row_len {
                    let left = if i >= bpp { row[i - bpp] } else { 0 };
                    let upper_left = if i >= bpp { prev[i - bpp] } else { 0 };
                    row[i] = row[i].wrapping_add(paeth(left, prev[i], upper_left));
                }
            }
            other => {
                return Err(Error::Decode(format!("Invalid PNG predictor tag: {}", other)));
            }
        }

        output.extend_from_slice(&row);
        prev = row;
    }

    Ok(output)
}

fn paeth(a: u8, b: u8, c: u8) -> u8 {
    let p = a as i16 + b as i16 - c as i16;
    let pa = (p - a as i16).abs();
    let pb = (p - b as i16).abs();
    let pc = (p - c as i16).abs();
    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}

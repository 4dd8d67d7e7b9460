//! FlateDecode.

use std::io::Read;

use flate2::read::{DeflateDecoder, ZlibDecoder};

use crate::error::{Error, Result};

/// Inflate zlib-wrapped data.
///
/// Producers occasionally write truncated streams or drop the zlib header.
/// Whatever inflates before the corruption is kept, and a headerless stream
/// is retried as raw deflate.
pub fn decode(input: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    let zlib_err = match ZlibDecoder::new(input).read_to_end(&mut output) {
        Ok(_) => return Ok(output),
        Err(e) => e,
    };

    if !output.is_empty() {
        log::warn!(
            "FlateDecode: stream corrupt after {} bytes, keeping partial data: {}",
            output.len(),
            zlib_err
        );
        return Ok(output);
    }

    log::debug!("FlateDecode: zlib failed ({}), retrying as raw deflate", zlib_err);
    output.clear();
    match DeflateDecoder::new(input).read_to_end(&mut output) {
        Ok(_) => Ok(output),
        Err(_) if !output.is_empty() => Ok(output),
        Err(e) => Err(Error::Decode(format!("FlateDecode: {}", e))),
    }
}

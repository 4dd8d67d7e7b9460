//! RunLengthDecode.

use crate::error::{Error, Result};

/// Decode PackBits-style runs: a length byte of 0-127 copies the next
/// `n + 1` bytes, 129-255 repeats the next byte `257 - n` times, 128 ends
/// the data.
pub fn decode(input: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(input.len() * 2);
    let mut i = 0;

    while i < input.len() {
        let length = input[i] as usize;
        i += 1;

        match length {
            0..=127 => {
                let end = i + length + 1;
                let literal = input.get(i..end).ok_or_else(|| {
                    Error::Decode("RunLengthDecode: literal run past end of data".to_string())
                })?;
                output.extend_from_slice(literal);
                i = end;
            }
            128 => break,
            _ => {
                let byte = *input.get(i).ok_or_else(|| {
                    Error::Decode("RunLengthDecode: missing byte for repeat run".to_string())
                })?;
                output.resize(output.len() + 257 - length, byte);
                i += 1;
            }
        }
    }

    Ok(output)
}

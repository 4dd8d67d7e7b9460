//! ASCIIHexDecode and ASCII85Decode.

use crate::error::{Error, Result};

/// Decode hexadecimal text. Whitespace is ignored, `>` ends the data and an
/// odd trailing digit is padded with `0`.
pub fn decode_hex(input: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(input.len() / 2);
    let mut high: Option<u8> = None;

    for &byte in input {
        if byte == b'>' {
            break;
        }
        if byte.is_ascii_whitespace() {
            continue;
        }
        let nibble = hex_value(byte).ok_or_else(|| {
            Error::Decode(format!("ASCIIHexDecode: invalid hex digit '{}'", byte as char))
        })?;
        match high.take() {
            Some(h) => output.push((h << 4) | nibble),
            None => high = Some(nibble),
        }
    }

    if let Some(h) = high {
        output.push(h << 4);
    }
    Ok(output)
}

fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        _ => None,
    }
}

/// Decode base-85 text terminated by `~>`.
pub fn decode_85(input: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(input.len() * 4 / 5);
    let mut group = [0u8; 5];
    let mut count = 0;

    let body = input.strip_prefix(b"<~").unwrap_or(input);
    for &byte in body {
        match byte {
            b'~' => break,
            b'z' if count == 0 => output.extend_from_slice(&[0, 0, 0, 0]),
            b'!'..=b'u' => {
                group[count] = byte - b'!';
                count += 1;
                if count == 5 {
                    output.extend_from_slice(&group_value(&group)?.to_be_bytes());
                    count = 0;
                }
            }
            _ if byte.is_ascii_whitespace() => {}
            _ => {
                return Err(Error::Decode(format!(
                    "ASCII85Decode: invalid character '{}'",
                    byte as char
                )))
            }
        }
    }

    if count == 1 {
        return Err(Error::Decode(
            "ASCII85Decode: final group has a single character".to_string(),
        ));
    }
    if count > 1 {
        // Pad with 'u' and keep count - 1 bytes.
        for slot in group.iter_mut().skip(count) {
            *slot = 84;
        }
        let bytes = group_value(&group)?.to_be_bytes();
        output.extend_from_slice(&bytes[..count - 1]);
    }
    Ok(output)
}

fn group_value(group: &[u8; 5]) -> Result<u32> {
    group
        .iter()
        .try_fold(0u32, |acc, &digit| {
            acc.checked_mul(85)?.checked_add(u32::from(digit))
        })
        .ok_or_else(|| Error::Decode("ASCII85Decode: group overflows 32 bits".to_string()))
}

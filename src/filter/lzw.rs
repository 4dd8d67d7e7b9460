//! LZWDecode.

use weezl::{decode::Decoder, BitOrder};

use crate::error::{Error, Result};

/// Decompress MSB-first LZW data with 8-bit symbols.
///
/// `early_change` mirrors the `/EarlyChange` parameter: when set (the PDF
/// default), the code width grows one code early, as in TIFF.
pub fn decode(input: &[u8], early_change: bool) -> Result<Vec<u8>> {
    let mut decoder = if early_change {
        Decoder::with_tiff_size_switch(BitOrder::Msb, 8)
    } else {
        Decoder::new(BitOrder::Msb, 8)
    };

    let mut output = Vec::new();
    let result = decoder.into_vec(&mut output).decode_all(input);

    match result.status {
        Ok(_) => Ok(output),
        Err(e) if !output.is_empty() => {
            log::warn!(
                "LZWDecode: stream corrupt after {} bytes, keeping partial data: {}",
                output.len(),
                e
            );
            Ok(output)
        }
        Err(e) => Err(Error::Decode(format!("LZWDecode: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weezl::encode::Encoder;

    #[test]
    fn test_round_trip_early_change() {
        let data = b"ABABABABABABABABABAB";
        let encoded = Encoder::with_tiff_size_switch(BitOrder::Msb, 8)
            .encode(data)
            .unwrap();
        assert_eq!(decode(&encoded, true).unwrap(), data);
    }

    #[test]
    fn test_plain_code_switch() {
        let data: Vec<u8> = (0..=255u8).cycle().take(2000).collect();
        let encoded = Encoder::new(BitOrder::Msb, 8).encode(&data).unwrap();
        assert_eq!(decode(&encoded, false).unwrap(), data);
    }
}

//! Reading image XObject dictionaries.

use lopdf::{Dictionary, Object, ObjectId, Stream};

use super::document::SourceDocument;
use crate::error::{Error, Result};
use crate::filter::{decode_chain, DecodeParams, Decoded, Filter};
use crate::raster::{ColorSpace, ImageXObject};

/// Nesting limit for `/Indexed` base color spaces.
const MAX_COLOR_SPACE_DEPTH: usize = 4;

/// Read the image stream at `id` together with everything needed to decode it.
pub(crate) fn read_image_xobject(source: &SourceDocument, id: ObjectId) -> Result<ImageXObject> {
    let stream = source.raw().get_object(id)?.as_stream()?;
    let dict = &stream.dict;

    let width = dimension(source, dict, b"Width")?;
    let height = dimension(source, dict, b"Height")?;
    let image_mask = get_resolved(source, dict, b"ImageMask")
        .and_then(|o| o.as_bool().ok())
        .unwrap_or(false);

    let bits_per_component = if image_mask {
        1
    } else {
        int_entry(source, dict, b"BitsPerComponent").map_or(8, |b| b as u8)
    };

    let color_space = if image_mask {
        None
    } else {
        dict.get(b"ColorSpace")
            .ok()
            .map(|cs| read_color_space(source, cs, 0))
    };

    let (filters, decode_params) = read_filters(source, dict)?;

    Ok(ImageXObject {
        id,
        width,
        height,
        bits_per_component,
        color_space,
        image_mask,
        decode_inverted: decode_inverted(source, dict),
        filters,
        decode_params,
        data: stream.content.clone(),
    })
}

fn get_resolved<'a>(
    source: &'a SourceDocument,
    dict: &'a Dictionary,
    key: &[u8],
) -> Option<&'a Object> {
    dict.get(key).ok().and_then(|o| source.resolve(o).ok())
}

fn int_entry(source: &SourceDocument, dict: &Dictionary, key: &[u8]) -> Option<i64> {
    get_resolved(source, dict, key).and_then(|o| o.as_i64().ok())
}

fn dimension(source: &SourceDocument, dict: &Dictionary, key: &[u8]) -> Result<u32> {
    let key_name = String::from_utf8_lossy(key);
    let value = int_entry(source, dict, key)
        .ok_or_else(|| Error::Decode(format!("image is missing /{}", key_name)))?;
    u32::try_from(value)
        .map_err(|_| Error::Decode(format!("invalid image /{}: {}", key_name, value)))
}

/// `/Filter` and `/DecodeParms`, either of which may be a single entry or an
/// array.
fn read_filters(
    source: &SourceDocument,
    dict: &Dictionary,
) -> Result<(Vec<Filter>, Vec<DecodeParams>)> {
    let names: Vec<&Object> = match get_resolved(source, dict, b"Filter") {
        None | Some(Object::Null) => Vec::new(),
        Some(Object::Array(items)) => items.iter().collect(),
        Some(single) => vec![single],
    };

    let filters = names
        .into_iter()
        .map(|o| {
            let name = source.resolve(o)?.as_name_str()?;
            Filter::from_name(name)
        })
        .collect::<Result<Vec<_>>>()?;

    let params = match get_resolved(source, dict, b"DecodeParms") {
        Some(Object::Array(items)) => items.iter().map(|o| decode_params(source, o)).collect(),
        Some(single) => vec![decode_params(source, single)],
        None => Vec::new(),
    };

    Ok((filters, params))
}

fn decode_params(source: &SourceDocument, object: &Object) -> DecodeParams {
    let mut params = DecodeParams::default();
    let Some(dict) = source.resolve(object).ok().and_then(|o| o.as_dict().ok()) else {
        return params;
    };

    if let Some(predictor) = int_entry(source, dict, b"Predictor") {
        params.predictor = predictor;
    }
    if let Some(colors) = int_entry(source, dict, b"Colors") {
        params.colors = colors.max(1) as usize;
    }
    if let Some(bpc) = int_entry(source, dict, b"BitsPerComponent") {
        params.bits_per_component = bpc.max(1) as usize;
    }
    if let Some(columns) = int_entry(source, dict, b"Columns") {
        params.columns = columns.max(1) as usize;
    }
    if let Some(early_change) = int_entry(source, dict, b"EarlyChange") {
        params.early_change = early_change != 0;
    }
    params
}

/// Whether `/Decode` maps the first component from 1 down to 0.
fn decode_inverted(source: &SourceDocument, dict: &Dictionary) -> bool {
    let Some(Object::Array(range)) = get_resolved(source, dict, b"Decode") else {
        return false;
    };
    match (
        range.first().and_then(|o| o.as_float().ok()),
        range.get(1).and_then(|o| o.as_float().ok()),
    ) {
        (Some(low), Some(high)) => low > high,
        _ => false,
    }
}

/// Resolve a `/ColorSpace` value. Anything we cannot use becomes
/// [`ColorSpace::Unsupported`] so that self-describing codecs such as JPEG
/// still decode.
pub(crate) fn read_color_space(
    source: &SourceDocument,
    object: &Object,
    depth: usize,
) -> ColorSpace {
    let object = match source.resolve(object) {
        Ok(o) => o,
        Err(e) => return ColorSpace::Unsupported(e.to_string()),
    };

    match object {
        Object::Name(name) => ColorSpace::from_family(&String::from_utf8_lossy(name)),
        Object::Array(items) => {
            let family = items
                .first()
                .and_then(|o| source.resolve(o).ok())
                .and_then(|o| o.as_name_str().ok())
                .unwrap_or("");
            match family {
                "ICCBased" => icc_based(source, items.get(1), depth),
                "Indexed" | "I" if depth < MAX_COLOR_SPACE_DEPTH => indexed(source, items, depth)
                    .unwrap_or_else(|e| ColorSpace::Unsupported(e.to_string())),
                other => ColorSpace::from_family(other),
            }
        }
        other => ColorSpace::Unsupported(format!(
            "unexpected {} as color space",
            object_kind(other)
        )),
    }
}

fn icc_based(source: &SourceDocument, profile: Option<&Object>, depth: usize) -> ColorSpace {
    let Some(stream) = profile
        .and_then(|o| source.resolve(o).ok())
        .and_then(|o| o.as_stream().ok())
    else {
        return ColorSpace::Unsupported("ICCBased without a profile stream".to_string());
    };

    if let Some(n) = int_entry(source, &stream.dict, b"N") {
        return ColorSpace::from_icc_components(n);
    }
    match stream.dict.get(b"Alternate") {
        Ok(alternate) if depth < MAX_COLOR_SPACE_DEPTH => {
            read_color_space(source, alternate, depth + 1)
        }
        _ => ColorSpace::Unsupported("ICCBased without /N".to_string()),
    }
}

fn indexed(source: &SourceDocument, items: &[Object], depth: usize) -> Result<ColorSpace> {
    let (Some(base), Some(hival), Some(lookup)) = (items.get(1), items.get(2), items.get(3)) else {
        return Err(Error::Decode("Indexed color space needs four entries".to_string()));
    };

    let base = read_color_space(source, base, depth + 1);
    let hival = source.resolve(hival)?.as_i64()?.clamp(0, 255) as u8;
    let lookup = match source.resolve(lookup)? {
        Object::String(bytes, _) => bytes.clone(),
        Object::Stream(stream) => stream_bytes(source, stream)?,
        other => {
            return Err(Error::Decode(format!(
                "Indexed lookup is a {}",
                object_kind(other)
            )))
        }
    };

    Ok(ColorSpace::Indexed {
        base: Box::new(base),
        hival,
        lookup,
    })
}

/// Fully unfiltered contents of a non-image stream.
fn stream_bytes(source: &SourceDocument, stream: &Stream) -> Result<Vec<u8>> {
    let (filters, params) = read_filters(source, &stream.dict)?;
    match decode_chain(&stream.content, &filters, &params)? {
        Decoded::Samples(bytes) => Ok(bytes),
        Decoded::Jpeg(_) => Err(Error::Decode(
            "unexpected DCTDecode on a data stream".to_string(),
        )),
    }
}

fn object_kind(object: &Object) -> &'static str {
    match object {
        Object::Null => "null",
        Object::Boolean(_) => "boolean",
        Object::Integer(_) | Object::Real(_) => "number",
        Object::Name(_) => "name",
        Object::String(..) => "string",
        Object::Array(_) => "array",
        Object::Dictionary(_) => "dictionary",
        Object::Stream(_) => "stream",
        Object::Reference(_) => "reference",
    }
}

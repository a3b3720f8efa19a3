// UTF-8 signature normalization for non-CSV uploads

use bytes::{BufMut, Bytes, BytesMut};

/// UTF-8 byte-order mark.
pub const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Whether a declared media type is `text/csv`. Parameters such as `charset`
/// are ignored; a missing or unparsable type is not CSV.
pub fn is_csv(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.parse::<mime::Mime>().ok())
        .map(|m| m.essence_str() == mime::TEXT_CSV.essence_str())
        .unwrap_or(false)
}

/// Returns the bytes to store for an upload.
///
/// CSV passes through untouched. Anything else must be UTF-8 text and comes
/// back prefixed with [`UTF8_BOM`]. A signature already present is kept as
/// text, so such input ends up with two.
pub fn normalize_content(
    content_type: Option<&str>,
    data: Bytes,
) -> Result<Bytes, std::str::Utf8Error> {
    if is_csv(content_type) {
        return Ok(data);
    }

    std::str::from_utf8(&data)?;

    let mut out = BytesMut::with_capacity(UTF8_BOM.len() + data.len());
    out.put_slice(UTF8_BOM);
    out.put_slice(&data);
    Ok(out.freeze())
}

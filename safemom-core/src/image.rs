use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use safemom_types::{ImageRef, SafeMomError};

/// Encode raw image bytes as a `data:` URL.
///
/// # Errors
/// Returns `InvalidArg` for empty input or a MIME type that is not `image/*`.
pub fn data_url_from_bytes(mime: &str, bytes: &[u8]) -> Result<ImageRef, SafeMomError> {
    if bytes.is_empty() {
        return Err(SafeMomError::InvalidArg("image is empty".into()));
    }
    if !mime.starts_with("image/") {
        return Err(SafeMomError::InvalidArg(format!(
            "unsupported image type: {mime}"
        )));
    }
    Ok(ImageRef::new(format!(
        "data:{mime};base64,{}",
        STANDARD.encode(bytes)
    )))
}

/// Decode a `data:<mime>;base64,<payload>` reference back into its MIME type and bytes.
///
/// # Errors
/// Returns `InvalidArg` when the reference is not a base64 data URL.
pub fn decode_data_url(image: &ImageRef) -> Result<(String, Vec<u8>), SafeMomError> {
    let rest = image
        .as_str()
        .strip_prefix("data:")
        .ok_or_else(|| SafeMomError::InvalidArg("not a data URL".into()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| SafeMomError::InvalidArg("data URL has no payload".into()))?;
    let mime = meta
        .strip_suffix(";base64")
        .ok_or_else(|| SafeMomError::InvalidArg("data URL is not base64".into()))?;
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| SafeMomError::InvalidArg(format!("bad base64 payload: {e}")))?;
    Ok((mime.to_string(), bytes))
}

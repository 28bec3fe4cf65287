//! CAPTCHA image encoding for the vision API.

use base64::Engine;

/// Known image signatures and their MIME types.
const IMAGE_SIGNATURES: &[(&[u8], &str)] = &[
    (&[0x89, 0x50, 0x4E, 0x47], "image/png"),
    (&[0xFF, 0xD8, 0xFF], "image/jpeg"),
    (&[0x47, 0x49, 0x46, 0x38], "image/gif"),
    (b"RIFF", "image/webp"),
];

/// Guesses the MIME type from magic bytes; PNG if unknown (SiteGuard serves
/// PNG).
pub fn image_mime(bytes: &[u8]) -> &'static str {
    IMAGE_SIGNATURES
        .iter()
        .find(|(magic, _)| bytes.starts_with(magic))
        .map(|(_, mime)| *mime)
        .unwrap_or("image/png")
}

/// Encodes image bytes as a `data:` URL.
pub fn to_data_url(bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        image_mime(bytes),
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

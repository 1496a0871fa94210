//! Character-encoding repair for fetched HTML
//!
//! The t.me preview pages do not reliably declare an encoding, and a
//! mis-decoded page corrupts title and body extraction irreversibly, so every
//! fetched body passes through here before any HTML parsing happens.

use encoding_rs::WINDOWS_1252;

/// Convert raw response bytes to a UTF-8 string
///
/// Valid UTF-8 passes through unchanged. Anything else is decoded as
/// Windows-1252, which per the WHATWG encoding standard also covers
/// ISO-8859-1 labelled content and cannot fail; invalid sequences are
/// substituted rather than surfaced as an error.
///
/// # Examples
///
/// ```
/// use telepost::parser::encoding::to_utf8;
///
/// assert_eq!(to_utf8("caf\u{e9}".as_bytes()), "café");
/// assert_eq!(to_utf8(&[0x63, 0x61, 0x66, 0xe9]), "café");
/// ```
#[must_use]
pub fn to_utf8(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            tracing::debug!(len = bytes.len(), "Input is not UTF-8, decoding as Windows-1252");
            let (cow, _encoding, _had_errors) = WINDOWS_1252.decode(bytes);
            cow.into_owned()
        }
    }
}

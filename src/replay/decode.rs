//! Payload decoding for archived pages
//!
//! The charset is taken from a byte order mark, then the `Content-Type`
//! header, then a `<meta>` declaration near the top of the document, and
//! defaults to UTF-8. Pages declared as windows-1256 are frequently UTF-8 in
//! practice, so those are decoded as strict UTF-8 instead; if that fails the
//! record cannot be decoded.

use crate::archive::{ArchiveError, CaptureRecord, HttpResponse, WarcRecord};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1256};
use thiserror::Error;

/// How far into the payload a `<meta>` charset is looked for
const META_SNIFF_LIMIT: usize = 1024;

/// Errors raised while decoding a payload
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("record block is not an HTTP response: {0}")]
    Http(#[from] ArchiveError),

    #[error("payload declared as {declared} is not valid UTF-8: {source}")]
    InvalidUtf8 {
        declared: &'static str,
        source: std::string::FromUtf8Error,
    },
}

/// Decoded text of an archived payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPayload {
    pub text: String,

    /// Name of the encoding the text was decoded with
    pub encoding: &'static str,

    /// True when a windows-1256 declaration was overridden with UTF-8
    pub redecoded: bool,
}

/// Parses a record's HTTP message and decodes its payload
pub fn decode_record(record: &WarcRecord) -> Result<DecodedPayload, DecodeError> {
    let response = record.http_response()?;
    decode_response(&response)
}

/// Decodes the payload of an archived response
pub fn decode_response(response: &HttpResponse) -> Result<DecodedPayload, DecodeError> {
    decode_payload(&response.payload, response.charset().as_deref())
}

/// Decodes `payload` given the charset declared by the HTTP headers, if any
pub fn decode_payload(
    payload: &[u8],
    header_charset: Option<&str>,
) -> Result<DecodedPayload, DecodeError> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(payload) {
        let (text, _) = encoding.decode_without_bom_handling(&payload[bom_len..]);
        return Ok(DecodedPayload {
            text: text.into_owned(),
            encoding: encoding.name(),
            redecoded: false,
        });
    }

    let declared = header_charset
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .or_else(|| sniff_meta_charset(payload).and_then(|label| Encoding::for_label(label.as_bytes())))
        .unwrap_or(UTF_8);

    if declared == WINDOWS_1256 {
        let text = String::from_utf8(payload.to_vec()).map_err(|source| DecodeError::InvalidUtf8 {
            declared: declared.name(),
            source,
        })?;
        return Ok(DecodedPayload {
            text,
            encoding: UTF_8.name(),
            redecoded: true,
        });
    }

    let (text, had_errors) = declared.decode_without_bom_handling(payload);
    if had_errors {
        tracing::trace!("Replaced malformed {} sequences", declared.name());
    }
    Ok(DecodedPayload {
        text: text.into_owned(),
        encoding: declared.name(),
        redecoded: false,
    })
}

/// Finds a `charset=` declaration in the head of an HTML document
///
/// Covers both `<meta charset="...">` and the `http-equiv` form.
fn sniff_meta_charset(payload: &[u8]) -> Option<String> {
    let head = &payload[..payload.len().min(META_SNIFF_LIMIT)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();

    let mut rest = head.as_str();
    while let Some(meta_at) = rest.find("<meta") {
        rest = &rest[meta_at + "<meta".len()..];
        let tag = &rest[..rest.find('>').unwrap_or(rest.len())];
        if let Some(charset_at) = tag.find("charset=") {
            let value = tag[charset_at + "charset=".len()..]
                .trim_start_matches(['"', '\'', ' '])
                .split(['"', '\'', ' ', ';', '/', '>'])
                .next()
                .unwrap_or_default();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

//! The HTTP message held in a `response` record block

use crate::archive::{ArchiveError, ArchiveResult};
use flate2::read::GzDecoder;
use httparse::Status;
use std::io::Read;

/// Most header fields accepted in an archived response head
const MAX_HEADERS: usize = 128;

/// An HTTP response as stored in a `response` record block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status line, e.g. `HTTP/1.1 200 OK` (empty if the block had none)
    pub status_line: String,

    /// Response headers in wire order
    pub headers: Vec<(String, String)>,

    /// Entity body with transfer and content encodings removed
    pub payload: Vec<u8>,
}

impl HttpResponse {
    /// Parses an HTTP message out of a record block
    ///
    /// Blocks that don't start with `HTTP/` are taken as a bare payload.
    /// Chunked transfer encoding and gzip content encoding are undone when
    /// declared; if undoing them fails the raw bytes are kept. Header values
    /// that aren't UTF-8 are converted lossily.
    pub fn parse(block: &[u8]) -> ArchiveResult<Self> {
        if !block.starts_with(b"HTTP/") {
            return Ok(Self {
                status_line: String::new(),
                headers: Vec::new(),
                payload: block.to_vec(),
            });
        }

        let mut fields = [httparse::EMPTY_HEADER; MAX_HEADERS];
        let mut head = httparse::Response::new(&mut fields);
        let head_len = match head.parse(block) {
            Ok(Status::Complete(len)) => len,
            Ok(Status::Partial) => {
                return Err(ArchiveError::MalformedHttp(
                    "no blank line after response headers".to_string(),
                ))
            }
            Err(e) => return Err(ArchiveError::MalformedHttp(e.to_string())),
        };

        let status_line = format!(
            "HTTP/1.{} {} {}",
            head.version.unwrap_or(1),
            head.code.unwrap_or_default(),
            head.reason.unwrap_or_default()
        )
        .trim_end()
        .to_string();
        let headers = head
            .headers
            .iter()
            .map(|field| {
                (
                    field.name.to_string(),
                    String::from_utf8_lossy(field.value).trim().to_string(),
                )
            })
            .collect();

        let mut response = Self {
            status_line,
            headers,
            payload: block[head_len..].to_vec(),
        };
        response.decode_payload();
        Ok(response)
    }

    /// Serializes status line, headers and payload into a record block
    pub fn to_block(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.payload.len() + 256);
        out.extend_from_slice(self.status_line.as_bytes());
        out.extend_from_slice(b"\r\n");
        for (name, value) in &self.headers {
            out.extend_from_slice(name.as_bytes());
            out.extend_from_slice(b": ");
            out.extend_from_slice(value.as_bytes());
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(b"\r\n");
        out.extend_from_slice(&self.payload);
        out
    }

    /// Looks up a header by name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The `charset` parameter of the Content-Type header, lowercased
    pub fn charset(&self) -> Option<String> {
        self.header("Content-Type").and_then(charset_param)
    }

    fn decode_payload(&mut self) {
        let chunked = self
            .header("Transfer-Encoding")
            .is_some_and(|value| value.to_ascii_lowercase().contains("chunked"));
        if chunked {
            match dechunk(&self.payload) {
                Some(body) => self.payload = body,
                None => tracing::debug!("Payload declared chunked but isn't, keeping raw bytes"),
            }
        }

        let gzipped = self
            .header("Content-Encoding")
            .is_some_and(|value| value.to_ascii_lowercase().contains("gzip"));
        if gzipped {
            let mut body = Vec::new();
            match GzDecoder::new(self.payload.as_slice()).read_to_end(&mut body) {
                Ok(_) => self.payload = body,
                Err(e) => tracing::debug!("Failed to gunzip payload, keeping raw bytes: {}", e),
            }
        }
    }
}

/// Extracts a lowercased `charset=` parameter from a Content-Type value
pub(crate) fn charset_param(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("charset") {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            Some(value.to_ascii_lowercase())
        } else {
            None
        }
    })
}

/// Undoes chunked transfer encoding, None if the bytes aren't valid chunks
fn dechunk(mut data: &[u8]) -> Option<Vec<u8>> {
    let mut body = Vec::with_capacity(data.len());
    loop {
        let (size_len, size) = match httparse::parse_chunk_size(data).ok()? {
            Status::Complete(parsed) => parsed,
            Status::Partial => return None,
        };
        let size = usize::try_from(size).ok()?;
        data = &data[size_len..];

        if size == 0 {
            return Some(body);
        }
        if data.len() < size {
            return None;
        }
        body.extend_from_slice(&data[..size]);
        data = &data[size..];
        data = data.strip_prefix(b"\r\n").unwrap_or(data);
    }
}

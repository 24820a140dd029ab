//! Building and inspecting `response` records

use crate::archive::{ArchiveResult, HttpResponse};
use sha2::{Digest, Sha256};
use warc::{BufferedBody, Record, RecordType, WarcHeader};

/// A record with its block held in memory
pub type WarcRecord = Record<BufferedBody>;

/// `Content-Type` of a record whose block is an HTTP response
const RESPONSE_CONTENT_TYPE: &str = "application/http; msgtype=response";

/// Accessors replay needs on a captured record
pub trait CaptureRecord {
    /// True for `response` records, the ones holding captured pages
    fn is_response(&self) -> bool;

    /// The record's `WARC-Target-URI`, angle brackets removed
    fn target_uri(&self) -> Option<String>;

    /// Parses the block as an HTTP response
    fn http_response(&self) -> ArchiveResult<HttpResponse>;
}

impl CaptureRecord for WarcRecord {
    fn is_response(&self) -> bool {
        matches!(self.warc_type(), RecordType::Response)
    }

    fn target_uri(&self) -> Option<String> {
        self.header(WarcHeader::TargetURI).map(|uri| {
            uri.trim()
                .trim_start_matches('<')
                .trim_end_matches('>')
                .to_string()
        })
    }

    fn http_response(&self) -> ArchiveResult<HttpResponse> {
        HttpResponse::parse(self.body())
    }
}

/// Builds a `response` record around an HTTP response
///
/// The record ID, date and length are filled in by `warc`; the target URI,
/// content type and SHA-256 digests are added here.
pub fn response_record(target_uri: &str, response: &HttpResponse) -> ArchiveResult<WarcRecord> {
    let block = response.to_block();
    let block_digest = sha256_digest(&block);

    let mut record = WarcRecord::with_body(block);
    record.set_warc_type(RecordType::Response);
    record.set_header(WarcHeader::TargetURI, target_uri)?;
    record.set_header(WarcHeader::ContentType, RESPONSE_CONTENT_TYPE)?;
    record.set_header(WarcHeader::BlockDigest, block_digest)?;
    record.set_header(WarcHeader::PayloadDigest, sha256_digest(&response.payload))?;
    Ok(record)
}

/// Formats a `sha256:<hex>` digest
fn sha256_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("sha256:{}", hex::encode(hasher.finalize()))
}

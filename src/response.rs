//! Direct-output (download) destinations
//!
//! The mapper never talks to an HTTP stack itself. Callers wrap their
//! response in a [`ResponseSink`], call [`prepare_download`] before exporting,
//! and the exporter hands the finished payload over in one `write_body` call.

use std::io;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_DISPOSITION: &str = "Content-Disposition";
pub const PRAGMA: &str = "Pragma";

pub const SPREADSHEET_CONTENT_TYPE: &str = "application/vnd.ms-excel; charset=utf-8";
pub const ERROR_CONTENT_TYPE: &str = "text/html; charset=UTF-8";

/// Download name used when the caller has none
pub const DEFAULT_DOWNLOAD_NAME: &str = "导出数据.xlsx";

/// A writable response: headers plus a body
pub trait ResponseSink {
    /// Set a header, replacing any previous value of the same name
    fn set_header(&mut self, name: &str, value: &str);

    /// Discard anything buffered but not yet sent
    fn clear_buffer(&mut self);

    fn write_body(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Switch headers to a readable error page. Called before an export
    /// error is returned to the caller.
    fn reset_for_error(&mut self) {
        self.set_header(CONTENT_TYPE, ERROR_CONTENT_TYPE);
        self.set_header(CONTENT_DISPOSITION, "inline");
    }
}

/// Clear buffered output and set attachment headers for a spreadsheet download
pub fn prepare_download(sink: &mut dyn ResponseSink, filename: &str) {
    sink.clear_buffer();
    sink.set_header(PRAGMA, "public");
    sink.set_header(CONTENT_TYPE, SPREADSHEET_CONTENT_TYPE);
    sink.set_header(
        CONTENT_DISPOSITION,
        &format!("attachment; filename={}", filename),
    );
}

/// In-memory response, for frameworks that build responses from bytes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferedResponse {
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl BufferedResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Header value, looked up case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_parts(self) -> (Vec<(String, String)>, Vec<u8>) {
        (self.headers, self.body)
    }
}

impl ResponseSink for BufferedResponse {
    fn set_header(&mut self, name: &str, value: &str) {
        match self
            .headers
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
        {
            Some(entry) => entry.1 = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    fn clear_buffer(&mut self) {
        self.body.clear();
    }

    fn write_body(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.body.extend_from_slice(bytes);
        Ok(())
    }
}

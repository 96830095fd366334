//! Transfer headers and streaming for built packages.
//!
//! A [`Download`] is the finalized form of a template destined for an HTTP
//! response: the built package bytes plus the header set to emit with them.
//! Streaming writes to a caller-supplied sink and returns control; process
//! exit policy is left to the embedding application.

use crate::error::Result;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// An ordered header collection with case-insensitive name replacement.
///
/// Constructed per template instance and merged with caller overrides at
/// emission time; there is no shared mutable default.
#[derive(Debug, Clone)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// The fixed header set emitted with a downloaded package.
    pub(crate) fn transfer_defaults() -> Self {
        Self {
            entries: vec![
                ("Content-Description".into(), "File Transfer".into()),
                ("Content-Transfer-Encoding".into(), "binary".into()),
                ("Content-Type".into(), "application/msword".into()),
                ("Expires".into(), "0".into()),
            ],
        }
    }

    /// Set a header, replacing any existing value for the same name.
    ///
    /// Name comparison is case-insensitive; insertion order is preserved.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&name))
        {
            Some((_, v)) => *v = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Get a header value by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over headers in emission order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of headers.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no headers.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A built package ready to be streamed to a response channel.
#[derive(Debug)]
pub struct Download {
    headers: Headers,
    path: PathBuf,
    len: u64,
}

impl Download {
    pub(crate) fn new(path: PathBuf, len: u64, mut headers: Headers) -> Self {
        headers.set("Content-Length", len.to_string());
        Self { headers, path, len }
    }

    /// The headers to emit before the package bytes, Content-Length included.
    #[inline]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Size of the built package in bytes.
    #[inline]
    pub fn content_length(&self) -> u64 {
        self.len
    }

    /// Location of the built package on disk.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stream the package bytes into `sink`.
    ///
    /// Returns the number of bytes written. The file is left in place and
    /// can be streamed again.
    pub fn write_to<W: Write>(&self, mut sink: W) -> Result<u64> {
        let mut file = File::open(&self.path)?;
        Ok(io::copy(&mut file, &mut sink)?)
    }

    /// Consume the download and return the path of the built package.
    ///
    /// The caller takes ownership of the file from here.
    #[inline]
    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_headers_present() {
        let headers = Headers::transfer_defaults();
        assert_eq!(headers.get("Content-Description"), Some("File Transfer"));
        assert_eq!(headers.get("Content-Transfer-Encoding"), Some("binary"));
        assert_eq!(headers.get("Content-Type"), Some("application/msword"));
        assert_eq!(headers.get("Expires"), Some("0"));
        assert_eq!(headers.len(), 4);
    }

    #[test]
    fn test_set_replaces_case_insensitively() {
        let mut headers = Headers::transfer_defaults();
        headers.set("content-type", "application/octet-stream");
        assert_eq!(headers.get("Content-Type"), Some("application/octet-stream"));
        assert_eq!(headers.len(), 4);
    }

    #[test]
    fn test_set_appends_new_names() {
        let mut headers = Headers::transfer_defaults();
        headers.set("Content-Disposition", "attachment");
        assert_eq!(headers.get("content-disposition"), Some("attachment"));
        assert_eq!(headers.len(), 5);
        // New names go to the end
        assert_eq!(headers.iter().last().unwrap().0, "Content-Disposition");
    }
}

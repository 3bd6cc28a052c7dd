// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Ordered header view and wire-format header-size reconstruction

use crate::har::Header;

/// An ordered list of header name/value pairs
///
/// Iteration order is the order the automation layer delivered the headers
/// in, which is what makes the reconstructed header-size deterministic.
/// Lookup is case-insensitive per HTTP semantics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    /// Create an empty header list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header pair
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// Get the first value for a header name, case-insensitively
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over pairs in delivery order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Convert to HAR header records, preserving order
    pub fn to_har(&self) -> Vec<Header> {
        self.0
            .iter()
            .map(|(n, v)| Header::new(n.clone(), v.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<(String, String)>> for Headers {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }
}

impl FromIterator<(String, String)> for Headers {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Byte length of the reconstructed request header block:
/// `METHOD PATH VERSION\r\n` followed by `Key: Value\r\n` per header pair,
/// with no trailing blank line.
pub fn request_headers_size(
    method: &str,
    path: &str,
    http_version: &str,
    headers: &[Header],
) -> i64 {
    let mut block = format!("{} {} {}\r\n", method, path, http_version);
    for header in headers {
        block.push_str(&format!("{}: {}\r\n", header.name, header.value));
    }
    block.len() as i64
}

/// Byte length of the reconstructed response header block:
/// `VERSION STATUS STATUS_TEXT\r\n` followed by `Key: Value\r\n` per header
/// pair, followed by the blank line terminating the block.
pub fn response_headers_size(
    http_version: &str,
    status: i64,
    status_text: &str,
    headers: &[Header],
) -> i64 {
    let mut block = format!("{} {} {}\r\n", http_version, status, status_text);
    for header in headers {
        block.push_str(&format!("{}: {}\r\n", header.name, header.value));
    }
    block.push_str("\r\n");
    block.len() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordered_lookup() {
        let mut headers = Headers::new();
        headers.push("Host", "example.com");
        headers.push("Accept", "*/*");

        assert_eq!(headers.get("host"), Some("example.com"));
        assert_eq!(headers.get("ACCEPT"), Some("*/*"));
        assert_eq!(headers.get("cookie"), None);

        let har = headers.to_har();
        assert_eq!(har[0].name, "Host");
        assert_eq!(har[1].name, "Accept");
    }

    #[test]
    fn test_request_headers_size_worked_example() {
        // "GET /foo HTTP/1.1\r\n" = 19 bytes
        // "Host: example.com\r\n" = 19 bytes
        // "Accept: */*\r\n"       = 13 bytes
        let headers = vec![
            Header::new("Host", "example.com"),
            Header::new("Accept", "*/*"),
        ];
        let size = request_headers_size("GET", "/foo", "HTTP/1.1", &headers);
        assert_eq!(size, 19 + 19 + 13);
    }

    #[test]
    fn test_response_headers_size_worked_example() {
        // "HTTP/1.1 200 OK\r\n"        = 17 bytes
        // "Content-Type: text/html\r\n" = 25 bytes
        // "\r\n"                        = 2 bytes
        let headers = vec![Header::new("Content-Type", "text/html")];
        let size = response_headers_size("HTTP/1.1", 200, "OK", &headers);
        assert_eq!(size, 17 + 25 + 2);
    }

    #[test]
    fn test_sizes_count_bytes_not_chars() {
        // Non-ASCII header values count by UTF-8 byte length
        let headers = vec![Header::new("X-Name", "caf\u{e9}")];
        let with_multibyte = request_headers_size("GET", "/", "HTTP/1.1", &headers);
        let ascii = request_headers_size("GET", "/", "HTTP/1.1", &[Header::new("X-Name", "cafe")]);
        assert_eq!(with_multibyte, ascii + 1);
    }

    #[test]
    fn test_empty_header_set() {
        assert_eq!(
            request_headers_size("GET", "/", "HTTP/1.1", &[]),
            "GET / HTTP/1.1\r\n".len() as i64
        );
        assert_eq!(
            response_headers_size("HTTP/1.1", 204, "No Content", &[]),
            "HTTP/1.1 204 No Content\r\n\r\n".len() as i64
        );
    }
}

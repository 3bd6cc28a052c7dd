// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Post body conversion for HAR records

use bytes::Bytes;

use super::query::form_data_to_params;
use super::DEFAULT_MIME_TYPE;
use crate::har::PostData;

/// Mime type whose bodies are additionally decomposed into parameters
const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Build the HAR post data descriptor for a request body.
///
/// Returns `None` when the request carries no body. Binary bodies
/// (`application/octet-stream`) keep the text field empty instead of
/// inlining raw bytes; form-encoded bodies are decomposed into name/value
/// parameters on top of the decoded text. Invalid UTF-8 decodes lossily
/// with replacement characters, never failing.
pub fn post_data_for_har(body: Option<&Bytes>, content_type: Option<&str>) -> Option<PostData> {
    let body = body?;
    let content_type = content_type.unwrap_or(DEFAULT_MIME_TYPE);

    let text = if content_type == DEFAULT_MIME_TYPE {
        String::new()
    } else {
        String::from_utf8_lossy(body).into_owned()
    };

    let params = if content_type == FORM_URLENCODED {
        form_data_to_params(&String::from_utf8_lossy(body))
    } else {
        Vec::new()
    };

    Some(PostData {
        mime_type: content_type.to_string(),
        params,
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_body() {
        assert!(post_data_for_har(None, Some("text/plain")).is_none());
    }

    #[test]
    fn test_plain_text_body() {
        let body = Bytes::from_static(b"hello");
        let post_data = post_data_for_har(Some(&body), Some("text/plain")).unwrap();
        assert_eq!(post_data.mime_type, "text/plain");
        assert_eq!(post_data.text, "hello");
        assert!(post_data.params.is_empty());
    }

    #[test]
    fn test_octet_stream_omits_text() {
        let body = Bytes::from_static(&[0x00, 0xff, 0x10]);
        let post_data = post_data_for_har(Some(&body), Some("application/octet-stream")).unwrap();
        assert_eq!(post_data.text, "");
        assert!(post_data.params.is_empty());
    }

    #[test]
    fn test_missing_content_type_treated_as_binary() {
        let body = Bytes::from_static(b"payload");
        let post_data = post_data_for_har(Some(&body), None).unwrap();
        assert_eq!(post_data.mime_type, "application/octet-stream");
        assert_eq!(post_data.text, "");
    }

    #[test]
    fn test_form_urlencoded_decomposes_params() {
        let body = Bytes::from_static(b"username=test&password=pass");
        let post_data =
            post_data_for_har(Some(&body), Some("application/x-www-form-urlencoded")).unwrap();
        assert_eq!(post_data.text, "username=test&password=pass");
        assert_eq!(post_data.params.len(), 2);
        assert_eq!(post_data.params[0].name, "username");
        assert_eq!(post_data.params[1].value.as_deref(), Some("pass"));
    }

    #[test]
    fn test_invalid_utf8_decodes_lossily() {
        let body = Bytes::from_static(&[b'h', b'i', 0xff]);
        let post_data = post_data_for_har(Some(&body), Some("text/plain")).unwrap();
        assert_eq!(post_data.text, "hi\u{fffd}");
    }
}

// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Pure codecs for headers, cookies, query strings and post bodies
//!
//! Everything here is stateless: raw header/cookie/query text in, structured
//! HAR records out. The reconciler calls these from event handlers and
//! enrichment units alike.

mod cookie;
mod headers;
mod post_data;
mod query;

pub use cookie::{cookies_for_har, parse_cookie};
pub use headers::{request_headers_size, response_headers_size, Headers};
pub use post_data::post_data_for_har;
pub use query::{form_data_to_params, query_to_query_params};

/// Mime type assumed when a request or response carries no content-type
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

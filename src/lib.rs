// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # hartracer - HAR capture for browser automation
//!
//! Incrementally assembles an HTTP Archive (HAR 1.2) log by observing the
//! network and page lifecycle events a browser-automation layer emits.
//! Events arrive out of order, in multiple phases and with partial data;
//! the tracer reconciles them into a single consistent log.
//!
//! ## How it works
//!
//! - Each request gets exactly one entry, created when the request is sent
//!   and refined as the response and completion events arrive.
//! - Data that resolves late (response bodies, authoritative headers,
//!   server address, TLS details, page milestones) is fetched by deferred
//!   enrichment units so the event dispatch path never blocks.
//! - `flush` joins all pending enrichment, finalizes page timings and
//!   snapshots the log.
//!
//! Unknown pages or requests are ignored silently: the automation layer may
//! emit events outside the tracing window by design.
//!
//! ## Example
//!
//! ```rust,no_run
//! use hartracer::{ContextDescriptor, HarTracer, TracerConfig, TracerEvent};
//! use hartracer::PageCreatedPayload;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let context = ContextDescriptor::new("120.0.6099.28");
//!     let tracer = HarTracer::new(&context, TracerConfig::new("chromium"))?;
//!
//!     // Wire the automation layer's events into the tracer...
//!     tracer.handle_event(TracerEvent::PageCreated(PageCreatedPayload {
//!         page_id: "page-guid".to_string(),
//!     }));
//!
//!     // ...and snapshot the log once the session is done.
//!     let har = tracer.flush().await;
//!     println!("{}", har.to_json_pretty()?);
//!     Ok(())
//! }
//! ```

pub mod cdp;
pub mod codec;
pub mod error;
pub mod har;
pub mod timing;
pub mod tracer;

// Re-exports for convenience

// Tracer
pub use tracer::{ContextDescriptor, HarTracer, TracerConfig};
pub use tracer::{EntryStore, PageSlot, SharedEntry};
pub use tracer::{
    PageAccessor, PageCreatedPayload, PageLifecyclePayload, PageMilestone,
    RequestFinishedPayload, RequestSentPayload, ResponseAccessor, ResponseReceivedPayload,
    ResponseSizes, ServerAddr, TracerEvent,
};

// HAR model
pub use har::{
    Browser, Cache, CacheState, Content, Cookie, Creator, Entry, Har, Header, Log, Page,
    PageTimings, Param, PostData, QueryParameter, Request, Response, SecurityDetails, Timings,
};

// Codecs
pub use codec::{
    cookies_for_har, parse_cookie, post_data_for_har, query_to_query_params, Headers,
};

// Timing
pub use timing::{millis_to_roundish_millis, ResourceTiming};

// Errors
pub use error::{Error, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// HAR schema version emitted in the log
pub const HAR_VERSION: &str = "1.2";

/// HTTP version recorded until the negotiated version is determinable
pub const FALLBACK_HTTP_VERSION: &str = "HTTP/1.1";

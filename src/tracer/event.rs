// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Typed events consumed from the automation layer
//!
//! Each event the tracer subscribes to has an explicit payload struct,
//! validated at the boundary instead of passing loose dictionaries around.
//! Data that only becomes available after the event fires (body bytes,
//! resolved headers, server address, TLS details, page milestones) is not
//! carried in the payload; the payload carries an accessor capability the
//! enrichment units await later.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::codec::Headers;
use crate::error::Result;
use crate::har::SecurityDetails;
use crate::timing::ResourceTiming;

/// Resolved network address of the server that answered a response
#[derive(Debug, Clone, PartialEq)]
pub struct ServerAddr {
    pub ip_address: String,
    pub port: u16,
}

/// Final body/transfer byte counts for a finished request, `-1` when the
/// automation layer could not determine them
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSizes {
    pub body_size: i64,
    pub transfer_size: i64,
}

impl Default for ResponseSizes {
    fn default() -> Self {
        Self {
            body_size: -1,
            transfer_size: -1,
        }
    }
}

/// Result of evaluating a page-lifecycle milestone: the document title and
/// the milestone's absolute timestamp in milliseconds
#[derive(Debug, Clone, PartialEq)]
pub struct PageMilestone {
    pub title: String,
    pub timestamp: f64,
}

/// Capabilities for reading response data that resolves after the
/// response-received event. Every method is a suspension point awaiting the
/// automation layer; each is best-effort single-attempt.
#[async_trait]
pub trait ResponseAccessor: Send + Sync {
    /// Raw response body bytes
    async fn body(&self) -> Result<Bytes>;

    /// The authoritative request header set, once fully resolved
    async fn request_headers(&self) -> Result<Headers>;

    /// The authoritative response header set, once fully resolved
    async fn response_headers(&self) -> Result<Headers>;

    /// Server address, when the connection exposes one
    async fn server_addr(&self) -> Result<Option<ServerAddr>>;

    /// TLS details, when the exchange was secure
    async fn security_details(&self) -> Result<Option<SecurityDetails>>;

    /// Final body/transfer sizes
    async fn sizes(&self) -> Result<ResponseSizes>;
}

/// Capability for evaluating page-level lifecycle milestones in the page's
/// script context
#[async_trait]
pub trait PageAccessor: Send + Sync {
    /// Title plus the dom-content-loaded timestamp
    async fn content_loaded_milestone(&self) -> Result<PageMilestone>;

    /// Title plus the load-event timestamp
    async fn load_milestone(&self) -> Result<PageMilestone>;
}

/// A new page was opened in the traced context
#[derive(Debug, Clone, PartialEq)]
pub struct PageCreatedPayload {
    pub page_id: String,
}

/// A request left the network stack
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSentPayload {
    pub page_id: String,
    pub request_id: String,
    pub method: String,
    pub url: String,
    /// Provisional header view; rewritten once the resolved set is known
    pub headers: Headers,
    pub post_data: Option<Bytes>,
    /// Identity of the request this one was redirected from, if any
    pub redirected_from: Option<String>,
}

/// Response headers and status arrived for an in-flight request
#[derive(Clone)]
pub struct ResponseReceivedPayload {
    pub page_id: String,
    pub request_id: String,
    pub status: i64,
    pub status_text: String,
    /// The request object's current (still provisional) header view
    pub request_headers: Headers,
    pub response_headers: Headers,
    pub post_data: Option<Bytes>,
    pub timing: ResourceTiming,
    pub accessor: Arc<dyn ResponseAccessor>,
}

impl fmt::Debug for ResponseReceivedPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseReceivedPayload")
            .field("page_id", &self.page_id)
            .field("request_id", &self.request_id)
            .field("status", &self.status)
            .field("status_text", &self.status_text)
            .field("timing", &self.timing)
            .finish_non_exhaustive()
    }
}

/// The exchange completed; final sizes and HTTP version are determinable
#[derive(Clone)]
pub struct RequestFinishedPayload {
    pub request_id: String,
    /// Negotiated HTTP version, when known
    pub http_version: Option<String>,
    pub accessor: Arc<dyn ResponseAccessor>,
}

impl fmt::Debug for RequestFinishedPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestFinishedPayload")
            .field("request_id", &self.request_id)
            .field("http_version", &self.http_version)
            .finish_non_exhaustive()
    }
}

/// A page-lifecycle milestone fired (dom-content-loaded or load)
#[derive(Clone)]
pub struct PageLifecyclePayload {
    pub page_id: String,
    pub accessor: Arc<dyn PageAccessor>,
}

impl fmt::Debug for PageLifecyclePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageLifecyclePayload")
            .field("page_id", &self.page_id)
            .finish_non_exhaustive()
    }
}

/// Every event the tracer reconciles, as a closed variant set
#[derive(Debug, Clone)]
pub enum TracerEvent {
    PageCreated(PageCreatedPayload),
    RequestSent(RequestSentPayload),
    ResponseReceived(ResponseReceivedPayload),
    RequestFinished(RequestFinishedPayload),
    DomContentLoaded(PageLifecyclePayload),
    Load(PageLifecyclePayload),
}

// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Event reconciler
//!
//! Drives the entry store from the automation layer's event stream. Each
//! request moves through started -> response-received -> finished; partial
//! data arriving at each step is merged into the same entry record, and
//! anything that resolves late (body bytes, authoritative headers, server
//! address, TLS details, final sizes, page milestones) is fetched by a
//! spawned enrichment unit tracked until flush.
//!
//! Every enrichment unit owns a disjoint set of entry fields, so units may
//! complete in any order without losing writes.

use std::sync::atomic::Ordering;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use futures::future::join_all;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;
use url::Url;

use super::event::{
    PageCreatedPayload, PageLifecyclePayload, RequestFinishedPayload, RequestSentPayload,
    ResponseReceivedPayload, TracerEvent,
};
use super::store::EntryStore;
use crate::cdp;
use crate::codec::{
    cookies_for_har, post_data_for_har, query_to_query_params, request_headers_size,
    response_headers_size, DEFAULT_MIME_TYPE,
};
use crate::error::{Error, Result};
use crate::har::{
    Browser, Cache, Content, Creator, Entry, Har, Log, Request, Response, Timings,
};
use crate::timing::{datetime_to_millis, millis_to_datetime, timings_from_resource};
use crate::{FALLBACK_HTTP_VERSION, HAR_VERSION};

/// Descriptor of the automation context being traced
#[derive(Debug, Clone, Default)]
pub struct ContextDescriptor {
    /// Version of the browser the context belongs to; `None` when the
    /// context has no associated browser
    pub browser_version: Option<String>,
}

impl ContextDescriptor {
    pub fn new(browser_version: impl Into<String>) -> Self {
        Self {
            browser_version: Some(browser_version.into()),
        }
    }
}

/// Tracer configuration
#[derive(Debug, Clone)]
pub struct TracerConfig {
    /// Browser name recorded in the log's browser descriptor
    pub browser_name: String,
    /// Skip response body capture entirely
    pub omit_content: bool,
}

impl TracerConfig {
    /// Config for the given browser name, with content capture enabled
    pub fn new(browser_name: impl Into<String>) -> Self {
        Self {
            browser_name: browser_name.into(),
            omit_content: false,
        }
    }

    /// Set whether response bodies are omitted
    pub fn omit_content(mut self, omit: bool) -> Self {
        self.omit_content = omit;
        self
    }
}

/// Assembles a HAR log from automation-layer events.
///
/// Handlers never block the dispatch path: network-dependent reads are
/// spawned as enrichment units and joined by [`flush`](HarTracer::flush),
/// the single synchronization barrier.
pub struct HarTracer {
    omit_content: bool,
    creator: Creator,
    browser: Browser,
    store: EntryStore,
    /// Pending enrichment units; flush takes the current set
    tasks: Mutex<Vec<JoinHandle<()>>>,
    /// CDP responseReceived events collected for the remote-IP pass
    cdp_events: Mutex<Vec<cdp::ResponseReceivedEvent>>,
}

impl HarTracer {
    /// Create a tracer for the given context.
    ///
    /// Fails with [`Error::BrowserUnavailable`] when the context carries no
    /// browser handle, since the log's browser descriptor cannot be
    /// populated.
    pub fn new(context: &ContextDescriptor, config: TracerConfig) -> Result<Self> {
        let browser_version = context
            .browser_version
            .clone()
            .ok_or(Error::BrowserUnavailable)?;

        Ok(Self {
            omit_content: config.omit_content,
            creator: Creator {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                comment: None,
            },
            browser: Browser {
                name: config.browser_name,
                version: browser_version,
                comment: None,
            },
            store: EntryStore::new(),
            tasks: Mutex::new(Vec::new()),
            cdp_events: Mutex::new(Vec::new()),
        })
    }

    /// Dispatch one automation-layer event to its handler
    pub fn handle_event(&self, event: TracerEvent) {
        match event {
            TracerEvent::PageCreated(payload) => self.on_page_created(payload),
            TracerEvent::RequestSent(payload) => self.on_request_sent(payload),
            TracerEvent::ResponseReceived(payload) => self.on_response_received(payload),
            TracerEvent::RequestFinished(payload) => self.on_request_finished(payload),
            TracerEvent::DomContentLoaded(payload) => self.on_dom_content_loaded(payload),
            TracerEvent::Load(payload) => self.on_load(payload),
        }
    }

    /// Collect a CDP `Network.responseReceived` event for the flush-time
    /// remote-IP annotation pass
    pub fn record_response_received(&self, event: cdp::ResponseReceivedEvent) {
        self.cdp_events.lock().push(event);
    }

    fn on_page_created(&self, payload: PageCreatedPayload) {
        self.store.add_page(&payload.page_id);
    }

    fn on_request_sent(&self, payload: RequestSentPayload) {
        let Some(slot) = self.store.page(&payload.page_id) else {
            debug!(page_id = %payload.page_id, "request for untracked page, ignoring");
            return;
        };

        let query_string = Url::parse(&payload.url)
            .ok()
            .and_then(|url| url.query().map(query_to_query_params))
            .unwrap_or_default();

        let mime_type = payload
            .headers
            .get("content-type")
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string();

        let entry = Entry {
            pageref: Some(slot.page.read().id.clone()),
            started_date_time: chrono::Utc::now(),
            time: -1.0,
            request: Request {
                method: payload.method,
                url: payload.url.clone(),
                http_version: FALLBACK_HTTP_VERSION.to_string(),
                cookies: Vec::new(),
                headers: Vec::new(),
                query_string,
                post_data: None,
                headers_size: -1,
                body_size: -1,
                comment: None,
            },
            response: Response {
                status: -1,
                status_text: String::new(),
                http_version: FALLBACK_HTTP_VERSION.to_string(),
                cookies: Vec::new(),
                headers: Vec::new(),
                content: Content::unknown(mime_type),
                redirect_url: String::new(),
                headers_size: -1,
                body_size: -1,
                transfer_size: None,
                remote_ip_address: None,
                comment: None,
            },
            cache: Cache::default(),
            timings: Timings::sentinel(),
            server_ip_address: None,
            server_port: None,
            security_details: None,
            comment: None,
        };

        if let Some(from_request_id) = &payload.redirected_from {
            if !self.store.link_redirect(from_request_id, &payload.url) {
                debug!(
                    from = %from_request_id,
                    "redirect source has no entry, leaving chain unlinked"
                );
            }
        }

        self.store.insert_entry(&payload.request_id, entry);
    }

    fn on_response_received(&self, payload: ResponseReceivedPayload) {
        let Some(slot) = self.store.page(&payload.page_id) else {
            debug!(page_id = %payload.page_id, "response for untracked page, ignoring");
            return;
        };
        let Some(entry) = self.store.lookup(&payload.request_id) else {
            debug!(request_id = %payload.request_id, "response for unknown request, ignoring");
            return;
        };

        {
            let mut record = entry.write();

            // Rewrite the provisional request view with what the request
            // object reports now; the authoritative set lands later via the
            // resolved-headers enrichment unit.
            record.request.headers = payload.request_headers.to_har();
            record.request.cookies = cookies_for_har(payload.request_headers.get("cookie"), ";");
            record.request.post_data = post_data_for_har(
                payload.post_data.as_ref(),
                payload.request_headers.get("content-type"),
            );

            record.response = Response {
                status: payload.status,
                status_text: payload.status_text.clone(),
                http_version: FALLBACK_HTTP_VERSION.to_string(),
                cookies: cookies_for_har(payload.response_headers.get("set-cookie"), "\n"),
                headers: payload.response_headers.to_har(),
                content: Content::unknown(
                    payload
                        .response_headers
                        .get("content-type")
                        .unwrap_or(DEFAULT_MIME_TYPE),
                ),
                redirect_url: String::new(),
                headers_size: -1,
                body_size: -1,
                transfer_size: None,
                remote_ip_address: None,
                comment: None,
            };

            let (timings, total) = timings_from_resource(&payload.timing);
            record.timings = timings;
            record.time = total;
        }

        // The page-created event fires before any network timing exists, so
        // the page may start retroactively once the first response reports
        // an earlier start timestamp.
        let start_time = payload.timing.start_time;
        if start_time >= 0.0 {
            let mut page = slot.page.write();
            if datetime_to_millis(page.started_date_time) > start_time {
                page.started_date_time = millis_to_datetime(start_time);
            }
        }

        let accessor = payload.accessor;

        // Owns content.text / content.encoding
        if !self.omit_content && payload.status == 200 {
            let entry = entry.clone();
            let accessor = accessor.clone();
            self.spawn(async move {
                if let Ok(body) = accessor.body().await {
                    let mut record = entry.write();
                    record.response.content.text = Some(BASE64_STANDARD.encode(&body));
                    record.response.content.encoding = Some("base64".to_string());
                }
            });
        }

        // Owns request/response headers and cookies
        {
            let entry = entry.clone();
            let accessor = accessor.clone();
            self.spawn(async move {
                if let Ok(headers) = accessor.request_headers().await {
                    let mut record = entry.write();
                    record.request.cookies = cookies_for_har(headers.get("cookie"), ";");
                    record.request.headers = headers.to_har();
                }
                if let Ok(headers) = accessor.response_headers().await {
                    let mut record = entry.write();
                    record.response.cookies = cookies_for_har(headers.get("set-cookie"), "\n");
                    record.response.headers = headers.to_har();
                }
            });
        }

        // Owns serverIPAddress / _serverPort
        {
            let entry = entry.clone();
            let accessor = accessor.clone();
            self.spawn(async move {
                if let Ok(Some(addr)) = accessor.server_addr().await {
                    let mut record = entry.write();
                    record.server_ip_address = Some(addr.ip_address);
                    record.server_port = Some(addr.port);
                }
            });
        }

        // Owns _securityDetails
        {
            let entry = entry.clone();
            self.spawn(async move {
                if let Ok(Some(details)) = accessor.security_details().await {
                    entry.write().security_details = Some(details);
                }
            });
        }
    }

    fn on_request_finished(&self, payload: RequestFinishedPayload) {
        let Some(entry) = self.store.lookup(&payload.request_id) else {
            debug!(request_id = %payload.request_id, "finish for unknown request, ignoring");
            return;
        };

        let http_version = payload
            .http_version
            .unwrap_or_else(|| FALLBACK_HTTP_VERSION.to_string());
        let accessor = payload.accessor;

        // Owns http versions, header sizes, body/transfer sizes
        self.spawn(async move {
            let request_headers = accessor.request_headers().await.ok();
            let response_headers = accessor.response_headers().await.ok();
            let sizes = accessor.sizes().await.unwrap_or_default();

            let (method, url) = {
                let record = entry.read();
                (record.request.method.clone(), record.request.url.clone())
            };

            let mut record = entry.write();
            record.request.http_version = http_version.clone();
            record.response.http_version = http_version.clone();

            if let (Some(headers), Ok(parsed)) = (request_headers, Url::parse(&url)) {
                record.request.headers_size = request_headers_size(
                    &method,
                    parsed.path(),
                    &http_version,
                    &headers.to_har(),
                );
            }

            if let Some(headers) = response_headers {
                record.response.headers_size = response_headers_size(
                    &http_version,
                    record.response.status,
                    &record.response.status_text,
                    &headers.to_har(),
                );
            }

            record.response.body_size = sizes.body_size;
            record.response.transfer_size = Some(sizes.transfer_size);
        });
    }

    fn on_dom_content_loaded(&self, payload: PageLifecyclePayload) {
        let Some(slot) = self.store.page(&payload.page_id) else {
            debug!(page_id = %payload.page_id, "dom-content-loaded for untracked page, ignoring");
            return;
        };

        // Owns page_timings.on_content_load
        let page = slot.page.clone();
        self.spawn(async move {
            if let Ok(milestone) = payload.accessor.content_loaded_milestone().await {
                page.write().page_timings.on_content_load = milestone.timestamp;
            }
        });
    }

    fn on_load(&self, payload: PageLifecyclePayload) {
        let Some(slot) = self.store.page(&payload.page_id) else {
            debug!(page_id = %payload.page_id, "load for untracked page, ignoring");
            return;
        };

        // Owns title and page_timings.on_load
        let page = slot.page.clone();
        self.spawn(async move {
            if let Ok(milestone) = payload.accessor.load_milestone().await {
                let mut record = page.write();
                record.title = milestone.title;
                record.page_timings.on_load = milestone.timestamp;
            }
        });
    }

    /// Await every enrichment unit scheduled so far, finalize page timings
    /// and snapshot the log into a HAR document.
    ///
    /// Units scheduled after this call begins are not part of the join.
    /// Page milestones convert from absolute timestamps to offsets relative
    /// to the page start exactly once; flushing again without intervening
    /// events returns the same offsets.
    pub async fn flush(&self) -> Har {
        let pending = std::mem::take(&mut *self.tasks.lock());
        join_all(pending).await;

        for slot in self.store.pages_in_order() {
            if slot.finalized.swap(true, Ordering::SeqCst) {
                continue;
            }
            let mut page = slot.page.write();
            let started = datetime_to_millis(page.started_date_time);
            let timings = &mut page.page_timings;

            timings.on_content_load = if timings.on_content_load >= 0.0 {
                timings.on_content_load - started
            } else {
                -1.0
            };
            timings.on_load = if timings.on_load >= 0.0 {
                timings.on_load - started
            } else {
                -1.0
            };
        }

        let mut har = Har {
            log: Log {
                version: HAR_VERSION.to_string(),
                creator: self.creator.clone(),
                browser: self.browser.clone(),
                pages: self
                    .store
                    .pages_in_order()
                    .iter()
                    .map(|slot| slot.page.read().clone())
                    .collect(),
                entries: self
                    .store
                    .entries_in_order()
                    .iter()
                    .map(|entry| entry.read().clone())
                    .collect(),
                comment: None,
            },
        };

        cdp::annotate_remote_ip(&mut har, &self.cdp_events.lock());
        har
    }

    fn spawn<F>(&self, unit: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        self.tasks.lock().push(tokio::spawn(unit));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Headers;

    fn tracer() -> HarTracer {
        HarTracer::new(
            &ContextDescriptor::new("120.0"),
            TracerConfig::new("chromium"),
        )
        .unwrap()
    }

    #[test]
    fn test_constructor_requires_browser_handle() {
        let result = HarTracer::new(&ContextDescriptor::default(), TracerConfig::new("chromium"));
        assert!(matches!(result, Err(Error::BrowserUnavailable)));
    }

    #[test]
    fn test_config_builder() {
        let config = TracerConfig::new("firefox").omit_content(true);
        assert_eq!(config.browser_name, "firefox");
        assert!(config.omit_content);
    }

    #[test]
    fn test_request_for_untracked_page_is_ignored() {
        let tracer = tracer();
        tracer.handle_event(TracerEvent::RequestSent(RequestSentPayload {
            page_id: "never-created".to_string(),
            request_id: "r1".to_string(),
            method: "GET".to_string(),
            url: "https://example.com/".to_string(),
            headers: Headers::new(),
            post_data: None,
            redirected_from: None,
        }));

        assert!(tracer.store.lookup("r1").is_none());
        assert!(tracer.store.entries_in_order().is_empty());
    }

    #[test]
    fn test_log_skeleton_at_flush() {
        let tracer = tracer();
        tracer.handle_event(TracerEvent::PageCreated(PageCreatedPayload {
            page_id: "p1".to_string(),
        }));

        let har = tokio_test::block_on(tracer.flush());

        assert_eq!(har.log.version, "1.2");
        assert_eq!(har.log.creator.name, "hartracer");
        assert_eq!(har.log.browser.name, "chromium");
        assert_eq!(har.log.browser.version, "120.0");
        assert_eq!(har.log.pages.len(), 1);
        assert_eq!(har.log.pages[0].id, "page_0");
        assert_eq!(har.log.pages[0].page_timings.on_load, -1.0);
    }
}

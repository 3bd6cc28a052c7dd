// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Entry and page store
//!
//! Maps stable request/page identities to their accumulating HAR records
//! while preserving the append-only log order the HAR contract requires:
//! pages in creation order, entries in request-sent order. Records are
//! shared behind `Arc<RwLock<_>>` so enrichment units can keep writing
//! disjoint fields after later events have been dispatched.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};

use crate::har::{Entry, Page, PageTimings};

/// Shared handle to an accumulating entry record
pub type SharedEntry = Arc<RwLock<Entry>>;

/// A tracked page plus its finalize latch.
///
/// The latch makes flush idempotent: milestone timestamps are converted
/// from absolute to relative exactly once, no matter how often the log is
/// flushed.
#[derive(Debug)]
pub struct PageSlot {
    pub page: Arc<RwLock<Page>>,
    pub finalized: AtomicBool,
}

/// Store for in-flight requests and tracked pages
#[derive(Debug, Default)]
pub struct EntryStore {
    /// Page identity -> page record
    pages: DashMap<String, Arc<PageSlot>>,
    /// Request identity -> entry record
    entries: DashMap<String, SharedEntry>,
    /// Pages in creation order
    page_order: Mutex<Vec<Arc<PageSlot>>>,
    /// Entries in request-sent order
    entry_order: Mutex<Vec<SharedEntry>>,
    /// Counter feeding the generated `page_<n>` ids
    next_page: AtomicU64,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new page under the given identity, assigning the next
    /// sequential `page_<n>` id. The page starts untitled with both
    /// milestones unobserved.
    pub fn add_page(&self, page_id: &str) -> Arc<PageSlot> {
        let sequence = self.next_page.fetch_add(1, Ordering::SeqCst);
        let slot = Arc::new(PageSlot {
            page: Arc::new(RwLock::new(Page {
                started_date_time: Utc::now(),
                id: format!("page_{}", sequence),
                title: String::new(),
                page_timings: PageTimings::default(),
                comment: None,
            })),
            finalized: AtomicBool::new(false),
        });

        self.page_order.lock().push(slot.clone());
        self.pages.insert(page_id.to_string(), slot.clone());
        slot
    }

    /// Look up a tracked page by identity
    pub fn page(&self, page_id: &str) -> Option<Arc<PageSlot>> {
        self.pages.get(page_id).map(|slot| slot.value().clone())
    }

    /// Insert the entry for a newly sent request. The entry becomes visible
    /// in the log sequence immediately, so a request that never completes
    /// still appears (partially populated) at flush.
    pub fn insert_entry(&self, request_id: &str, entry: Entry) -> SharedEntry {
        let shared: SharedEntry = Arc::new(RwLock::new(entry));
        self.entry_order.lock().push(shared.clone());
        self.entries.insert(request_id.to_string(), shared.clone());
        shared
    }

    /// Look up the entry for an in-flight request
    pub fn lookup(&self, request_id: &str) -> Option<SharedEntry> {
        self.entries.get(request_id).map(|entry| entry.value().clone())
    }

    /// Point the prior request's redirect target at the new request's URL.
    /// No-op when the prior request has no entry (it may have started
    /// before tracing attached). Returns whether a link was recorded.
    pub fn link_redirect(&self, from_request_id: &str, to_url: &str) -> bool {
        match self.entries.get(from_request_id) {
            Some(entry) => {
                entry.write().response.redirect_url = to_url.to_string();
                true
            }
            None => false,
        }
    }

    /// Pages in creation order
    pub fn pages_in_order(&self) -> Vec<Arc<PageSlot>> {
        self.page_order.lock().clone()
    }

    /// Entries in request-sent order
    pub fn entries_in_order(&self) -> Vec<SharedEntry> {
        self.entry_order.lock().clone()
    }
}

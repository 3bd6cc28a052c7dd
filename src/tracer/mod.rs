// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Event reconciliation engine
//!
//! Correlates the automation layer's page/request/response/lifecycle events
//! into accumulating HAR records and schedules the deferred enrichment that
//! fills in data the events cannot deliver synchronously.

mod event;
mod reconciler;
mod store;

pub use event::{
    PageAccessor, PageCreatedPayload, PageLifecyclePayload, PageMilestone,
    RequestFinishedPayload, RequestSentPayload, ResponseAccessor, ResponseReceivedPayload,
    ResponseSizes, ServerAddr, TracerEvent,
};
pub use reconciler::{ContextDescriptor, HarTracer, TracerConfig};
pub use store::{EntryStore, PageSlot, SharedEntry};

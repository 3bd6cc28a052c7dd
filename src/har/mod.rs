// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HAR 1.2 data model
//!
//! Record types for the HTTP Archive format, with the serialization contract
//! the tracer guarantees: camel-cased field names, absent optionals omitted
//! entirely (never `null`), datetimes as ISO-8601 strings, and the `-1`
//! sentinel emitted literally where the schema expects "unknown".

mod model;

pub use model::{
    Browser, Cache, CacheState, Content, Cookie, Creator, Entry, Har, Header, Log, Page,
    PageTimings, Param, PostData, QueryParameter, Request, Response, SecurityDetails, Timings,
};

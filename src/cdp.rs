// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Typed CDP `Network.responseReceived` payloads
//!
//! Raw CDP events arrive as loosely-shaped JSON; they are deserialized into
//! these structs at the boundary before the tracer touches them. The only
//! consumer is the flush-time pass that stamps the remote IP address onto
//! each matching entry.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::har::Har;

/// `Network.responseReceived` event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseReceivedEvent {
    pub request_id: String,
    pub loader_id: String,
    pub timestamp: f64,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub response: ResponsePayload,
    pub frame_id: String,
}

/// Response descriptor nested inside the event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePayload {
    pub url: String,
    pub status: i64,
    pub status_text: String,
    pub headers: HashMap<String, String>,
    pub mime_type: String,
    pub connection_reused: bool,
    pub connection_id: i64,
    pub encoded_data_length: f64,
    pub security_state: String,
    #[serde(default)]
    pub response_time: Option<f64>,
    #[serde(default)]
    pub request_headers: Option<HashMap<String, String>>,
    #[serde(default)]
    pub request_headers_text: Option<String>,
    #[serde(rename = "remoteIPAddress", default)]
    pub remote_ip_address: Option<String>,
    #[serde(default)]
    pub remote_port: Option<u16>,
    #[serde(default)]
    pub from_disk_cache: Option<bool>,
    #[serde(default)]
    pub from_service_worker: Option<bool>,
    #[serde(default)]
    pub from_prefetch_cache: Option<bool>,
    #[serde(default)]
    pub timing: Option<HashMap<String, f64>>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub headers_text: Option<String>,
}

/// Stamp the remote IP address reported by CDP onto each entry whose
/// request URL matched a traced response, as both the response comment and
/// the `_remoteIPAddress` extension field.
pub(crate) fn annotate_remote_ip(har: &mut Har, events: &[ResponseReceivedEvent]) {
    // url -> remote IP table; later events win, matching CDP replay order
    let mut memo: HashMap<&str, Option<&str>> = HashMap::new();
    for event in events {
        memo.insert(
            event.response.url.as_str(),
            event.response.remote_ip_address.as_deref(),
        );
    }

    for entry in &mut har.log.entries {
        let remote_ip = memo
            .get(entry.request.url.as_str())
            .copied()
            .flatten()
            .map(String::from);
        entry.response.comment = remote_ip.clone();
        entry.response.remote_ip_address = remote_ip;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_from_cdp_json() {
        let json = r#"{
            "requestId": "1000.1",
            "loaderId": "L1",
            "timestamp": 123.45,
            "type": "Document",
            "frameId": "F1",
            "response": {
                "url": "https://example.com/",
                "status": 200,
                "statusText": "OK",
                "headers": {"content-type": "text/html"},
                "mimeType": "text/html",
                "connectionReused": false,
                "connectionId": 42,
                "encodedDataLength": 1234.0,
                "securityState": "secure",
                "remoteIPAddress": "93.184.216.34",
                "remotePort": 443
            }
        }"#;

        let event: ResponseReceivedEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.request_id, "1000.1");
        assert_eq!(event.resource_type, "Document");
        assert_eq!(
            event.response.remote_ip_address.as_deref(),
            Some("93.184.216.34")
        );
        assert_eq!(event.response.remote_port, Some(443));
        assert!(event.response.timing.is_none());
    }
}

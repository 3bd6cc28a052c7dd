// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Timing arithmetic
//!
//! Pure conversions from the raw absolute-millisecond timestamps the
//! automation layer reports into HAR-legal phase timings. The `-1` sentinel
//! marks an unmeasured milestone and flows through the arithmetic verbatim:
//! a negative total elapsed time is the downstream signal for incomplete
//! timing and must not be clamped away.

use chrono::{DateTime, Utc};

use crate::har::Timings;

/// Raw resource timing milestones for one exchange.
///
/// All values are absolute timestamps in milliseconds; `-1` means the
/// milestone was not measured.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceTiming {
    pub start_time: f64,
    pub domain_lookup_start: f64,
    pub domain_lookup_end: f64,
    pub connect_start: f64,
    pub connect_end: f64,
    pub secure_connection_start: f64,
    pub request_start: f64,
    pub response_start: f64,
    pub response_end: f64,
}

impl Default for ResourceTiming {
    fn default() -> Self {
        Self {
            start_time: -1.0,
            domain_lookup_start: -1.0,
            domain_lookup_end: -1.0,
            connect_start: -1.0,
            connect_end: -1.0,
            secure_connection_start: -1.0,
            request_start: -1.0,
            response_start: -1.0,
            response_end: -1.0,
        }
    }
}

/// Truncate a millisecond value to microsecond granularity: multiply by
/// 1000, truncate toward zero, divide by 1000. Keeps three decimal digits,
/// not whole milliseconds.
pub fn millis_to_roundish_millis(value: f64) -> f64 {
    (value * 1000.0).trunc() / 1000.0
}

/// Absolute milliseconds since the Unix epoch for a datetime
pub fn datetime_to_millis(dt: DateTime<Utc>) -> f64 {
    dt.timestamp_micros() as f64 / 1000.0
}

/// Datetime for an absolute millisecond timestamp
pub fn millis_to_datetime(millis: f64) -> DateTime<Utc> {
    DateTime::from_timestamp_micros((millis * 1000.0) as i64).unwrap_or(DateTime::UNIX_EPOCH)
}

/// Compute the per-phase breakdown and total elapsed time for a response.
///
/// Each phase is gated on its end milestone: if the end is unmeasured the
/// phase is `-1`. `send` is fixed at 0 per HAR convention (not independently
/// measurable). The total is the verbatim sum of the five variable phases,
/// sentinels included, so one unmeasured phase makes the total negative.
pub fn timings_from_resource(timing: &ResourceTiming) -> (Timings, f64) {
    let dns = if timing.domain_lookup_end != -1.0 {
        millis_to_roundish_millis(timing.domain_lookup_end - timing.domain_lookup_start)
    } else {
        -1.0
    };

    let connect = if timing.connect_end != -1.0 {
        millis_to_roundish_millis(timing.connect_end - timing.connect_start)
    } else {
        -1.0
    };

    let ssl = if timing.connect_end != -1.0 {
        millis_to_roundish_millis(timing.connect_end - timing.secure_connection_start)
    } else {
        -1.0
    };

    let wait = if timing.response_start != -1.0 {
        millis_to_roundish_millis(timing.response_start - timing.request_start)
    } else {
        -1.0
    };

    let receive = if timing.response_end != -1.0 {
        millis_to_roundish_millis(timing.response_end - timing.response_start)
    } else {
        -1.0
    };

    let total = dns + connect + ssl + wait + receive;

    let timings = Timings {
        blocked: None,
        dns: Some(dns),
        connect: Some(connect),
        ssl: Some(ssl),
        send: 0.0,
        wait,
        receive,
        comment: None,
    };

    (timings, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_roundish_millis_truncates_toward_zero() {
        assert_eq!(millis_to_roundish_millis(0.0), 0.0);
        assert_eq!(millis_to_roundish_millis(0.1), 0.1);
        assert_eq!(millis_to_roundish_millis(1.23456), 1.234);
        assert_eq!(millis_to_roundish_millis(1.9999), 1.999);
        assert_eq!(millis_to_roundish_millis(5.6789), 5.678);
    }

    #[test]
    fn test_datetime_to_millis_epoch() {
        let epoch = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(datetime_to_millis(epoch), 0.0);
    }

    #[test]
    fn test_millis_datetime_round_trip() {
        let dt = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(millis_to_datetime(datetime_to_millis(dt)), dt);
    }

    fn complete_timing() -> ResourceTiming {
        // Phases: dns=5, connect=10, ssl=3, wait=20, receive=7
        ResourceTiming {
            start_time: 1000.0,
            domain_lookup_start: 1000.0,
            domain_lookup_end: 1005.0,
            connect_start: 1005.0,
            connect_end: 1015.0,
            secure_connection_start: 1012.0,
            request_start: 1015.0,
            response_start: 1035.0,
            response_end: 1042.0,
        }
    }

    #[test]
    fn test_complete_breakdown_sums() {
        let (timings, total) = timings_from_resource(&complete_timing());
        assert_eq!(timings.dns, Some(5.0));
        assert_eq!(timings.connect, Some(10.0));
        assert_eq!(timings.ssl, Some(3.0));
        assert_eq!(timings.send, 0.0);
        assert_eq!(timings.wait, 20.0);
        assert_eq!(timings.receive, 7.0);
        assert_eq!(total, 45.0);
    }

    #[test]
    fn test_sentinel_propagates_into_negative_total() {
        let mut timing = complete_timing();
        timing.domain_lookup_end = -1.0;
        let (timings, total) = timings_from_resource(&timing);
        assert_eq!(timings.dns, Some(-1.0));
        assert!(total < 45.0);
        assert_eq!(total, -1.0 + 10.0 + 3.0 + 20.0 + 7.0);
    }

    #[test]
    fn test_all_sentinels_total_negative() {
        let (timings, total) = timings_from_resource(&ResourceTiming::default());
        assert_eq!(timings.dns, Some(-1.0));
        assert_eq!(timings.wait, -1.0);
        assert_eq!(total, -5.0);
    }

    #[test]
    fn test_sub_millisecond_phases_truncate() {
        let mut timing = complete_timing();
        timing.response_end = 1035.0 + 7.123456;
        let (timings, _) = timings_from_resource(&timing);
        assert_eq!(timings.receive, 7.123);
    }
}

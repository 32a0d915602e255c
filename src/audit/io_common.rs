// Field parsers shared by the readers.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::net::IpAddr;

use vote_resolution::VoteRecord;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Reads a time as seconds since 1970.
///
/// Times without an offset are taken as UTC.
pub fn parse_timestamp(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(x) = s.parse::<i64>() {
        return Some(x);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp());
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S %z") {
        return Some(dt.timestamp());
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&ndt).timestamp());
        }
    }
    None
}

pub fn parse_ip(s: &str) -> Option<String> {
    let s = s.trim();
    s.parse::<IpAddr>().ok().map(|_| s.to_string())
}

/// Builds a record out of the raw fields. Votes without a name are dropped.
pub fn make_record(name: &str, time: Option<&str>, ip: Option<&str>) -> Option<VoteRecord> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some(VoteRecord {
        raw_name: name.to_string(),
        timestamp: time.and_then(parse_timestamp),
        ip: ip.and_then(parse_ip),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps() {
        assert_eq!(parse_timestamp("1709287200"), Some(1709287200));
        assert_eq!(parse_timestamp(" 2024-03-01 10:00:00 "), Some(1709287200));
        assert_eq!(parse_timestamp("2024-03-01T10:00:00"), Some(1709287200));
        assert_eq!(parse_timestamp("2024-03-01T10:00:00Z"), Some(1709287200));
        assert_eq!(parse_timestamp("2024-03-01T12:00:00+02:00"), Some(1709287200));
        assert_eq!(parse_timestamp("2024-03-01 12:00:00 +0200"), Some(1709287200));
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn ips() {
        assert_eq!(parse_ip("10.0.0.1"), Some("10.0.0.1".to_string()));
        assert_eq!(parse_ip(" ::1 "), Some("::1".to_string()));
        assert_eq!(parse_ip("10.0.0.256"), None);
        assert_eq!(parse_ip("localhost"), None);
        assert_eq!(parse_ip(""), None);
    }

    #[test]
    fn records() {
        assert_eq!(make_record("  ", Some("1"), Some("10.0.0.1")), None);
        assert_eq!(
            make_record(" Alice ", Some("garbage"), Some("10.0.0.1")),
            Some(VoteRecord::new("Alice", None, Some("10.0.0.1")))
        );
    }
}

//! Run Metadata Collection
//!
//! Collects the header fields of a report: host name, start time and the
//! serialized problem.
//!
//! ## Host Name
//!
//! - `$HOSTNAME` if set and non-empty
//! - `/proc/sys/kernel/hostname` (Linux)
//! - `/etc/hostname`
//!
//! An undeterminable host name is left empty and rendered as `UNKNOWN`.

use chrono::{DateTime, Utc};
use planbench_core::MotionRequest;

/// Payload tag for problems serialized by [`serialize_problem`]
pub const PROBLEM_PAYLOAD_TAG: &str = "JSON";

/// Host name of this machine, empty if it cannot be determined
pub fn hostname() -> String {
    if let Ok(name) = std::env::var("HOSTNAME") {
        let name = name.trim();
        if !name.is_empty() {
            return name.to_string();
        }
    }

    ["/proc/sys/kernel/hostname", "/etc/hostname"]
        .iter()
        .filter_map(|path| std::fs::read_to_string(path).ok())
        .map(|content| content.trim().to_string())
        .find(|name| !name.is_empty())
        .unwrap_or_default()
}

/// Current UTC time
pub fn start_time() -> DateTime<Utc> {
    Utc::now()
}

/// Problem description embedded in the report header
pub fn serialize_problem(request: &MotionRequest) -> String {
    match serde_json::to_string_pretty(request) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Failed to serialize benchmark problem: {}", e);
            String::new()
        }
    }
}

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use fleet_core::TimestampMs;

/// Milliseconds since UNIX epoch; used when a fleet file does not pin the clock.
pub fn now_ms() -> TimestampMs {
    let dur = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    dur.as_millis() as TimestampMs
}

/// Expands a leading `~` to the home directory.
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).to_string())
}

//! Display records for block rows

use crate::block::{Block, BlockPayload};
use serde::Serialize;
use std::time::Duration;

/// One row of the block list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayBlock {
    pub height: u64,
    pub era: u64,
    pub transaction_count: usize,
    /// Unix epoch milliseconds.
    pub timestamp: u64,
    pub hash: String,
}

impl From<&BlockPayload> for DisplayBlock {
    fn from(payload: &BlockPayload) -> Self {
        DisplayBlock {
            height: payload.header.height,
            era: payload.header.era_id,
            transaction_count: payload.body.transaction_count(),
            timestamp: payload.header.timestamp,
            hash: payload.hash.clone(),
        }
    }
}

impl From<&Block> for DisplayBlock {
    fn from(block: &Block) -> Self {
        DisplayBlock::from(block.payload())
    }
}

impl DisplayBlock {
    pub fn age(&self, now_ms: u64) -> String {
        format_age(self.timestamp, now_ms)
    }

    pub fn short_hash(&self) -> String {
        shorten_hash(&self.hash, 10, 8)
    }
}

/// Current wall clock in epoch milliseconds.
pub fn now_millis() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}

/// Human readable age, truncated to whole seconds. Timestamps in the future
/// (clock skew) read as "just now".
pub fn format_age(timestamp_ms: u64, now_ms: u64) -> String {
    let secs = now_ms.saturating_sub(timestamp_ms) / 1000;
    if secs == 0 {
        return "just now".to_string();
    }
    format!(
        "{} ago",
        humantime::format_duration(Duration::from_secs(secs))
    )
}

/// Keep the first `head` and last `tail` characters of a hash.
pub fn shorten_hash(hash: &str, head: usize, tail: usize) -> String {
    let chars: Vec<char> = hash.chars().collect();
    if chars.len() <= head + tail + 3 {
        return hash.to_string();
    }
    let start: String = chars[..head].iter().collect();
    let end: String = chars[chars.len() - tail..].iter().collect();
    format!("{}...{}", start, end)
}

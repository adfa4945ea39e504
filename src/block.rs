//! Block schema as returned by the node, and the version normalizer
//!
//! Nodes answer `chain_get_block` with a block wrapped in a version tag:
//! `{"Version1": {...}}` before the 2.0 upgrade, `{"Version2": {...}}` after.
//! Both variants share the fields the explorer displays, so normalization is a
//! matter of unwrapping whichever tag is present.

use crate::error::{ExplorerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub height: u64,
    pub era_id: u64,
    /// Unix epoch milliseconds.
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub timestamp: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockBody {
    /// Keyed by transaction lane; only the key count is displayed.
    #[serde(default)]
    pub transactions: BTreeMap<String, serde_json::Value>,
}

impl BlockBody {
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }
}

/// Fields shared by both block versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockPayload {
    pub hash: String,
    pub header: BlockHeader,
    #[serde(default)]
    pub body: BlockBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockVersion {
    V1,
    V2,
}

/// A block with its version tag resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Version1(BlockPayload),
    Version2(BlockPayload),
}

impl Block {
    pub fn version(&self) -> BlockVersion {
        match self {
            Block::Version1(_) => BlockVersion::V1,
            Block::Version2(_) => BlockVersion::V2,
        }
    }

    pub fn payload(&self) -> &BlockPayload {
        match self {
            Block::Version1(payload) | Block::Version2(payload) => payload,
        }
    }

    pub fn into_payload(self) -> BlockPayload {
        match self {
            Block::Version1(payload) | Block::Version2(payload) => payload,
        }
    }

    pub fn height(&self) -> u64 {
        self.payload().header.height
    }
}

/// Block as it appears on the wire.
///
/// Kept as two optional fields rather than a serde enum so that a payload with
/// neither tag still deserializes and can be reported as
/// [`ExplorerError::UnknownBlockVersion`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBlock {
    #[serde(rename = "Version1", default, skip_serializing_if = "Option::is_none")]
    pub version1: Option<BlockPayload>,
    #[serde(rename = "Version2", default, skip_serializing_if = "Option::is_none")]
    pub version2: Option<BlockPayload>,
}

impl RawBlock {
    /// Resolve the version tag. `Version2` is checked first.
    pub fn normalize(self) -> Result<Block> {
        match (self.version1, self.version2) {
            (_, Some(v2)) => Ok(Block::Version2(v2)),
            (Some(v1), None) => Ok(Block::Version1(v1)),
            (None, None) => Err(ExplorerError::UnknownBlockVersion),
        }
    }

    pub fn height(&self) -> Result<u64> {
        self.version2
            .as_ref()
            .or(self.version1.as_ref())
            .map(|payload| payload.header.height)
            .ok_or(ExplorerError::UnknownBlockVersion)
    }
}

impl From<Block> for RawBlock {
    fn from(block: Block) -> Self {
        match block {
            Block::Version1(payload) => RawBlock {
                version1: Some(payload),
                version2: None,
            },
            Block::Version2(payload) => RawBlock {
                version1: None,
                version2: Some(payload),
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockWithSignatures {
    #[serde(default)]
    pub block: Option<RawBlock>,
}

/// Result of a block lookup, latest or by height.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(default)]
    pub block_with_signatures: Option<BlockWithSignatures>,
}

impl BlockInfo {
    pub fn with_block(block: RawBlock) -> Self {
        BlockInfo {
            api_version: None,
            block_with_signatures: Some(BlockWithSignatures { block: Some(block) }),
        }
    }

    pub fn block(&self) -> Option<&RawBlock> {
        self.block_with_signatures.as_ref()?.block.as_ref()
    }

    pub fn into_block(self) -> Option<RawBlock> {
        self.block_with_signatures?.block
    }
}

mod timestamp {
    use chrono::DateTime;
    use serde::{de, Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum WireTimestamp {
        Millis(u64),
        Rfc3339(String),
    }

    /// Accepts epoch millis or an RFC 3339 string.
    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match WireTimestamp::deserialize(deserializer)? {
            WireTimestamp::Millis(ms) => Ok(ms),
            WireTimestamp::Rfc3339(text) => {
                let parsed = DateTime::parse_from_rfc3339(&text).map_err(de::Error::custom)?;
                u64::try_from(parsed.timestamp_millis())
                    .map_err(|_| de::Error::custom(format!("timestamp before epoch: {}", text)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload_json(height: u64) -> serde_json::Value {
        json!({
            "hash": format!("{:064x}", height),
            "header": {
                "height": height,
                "era_id": 7,
                "timestamp": 1_700_000_000_000u64,
                "parent_hash": "ab".repeat(32),
            },
            "body": {
                "transactions": { "0": [], "3": ["cd".repeat(32)] }
            }
        })
    }

    #[test]
    fn test_version1_unwraps_unchanged() {
        let raw: RawBlock = serde_json::from_value(json!({ "Version1": payload_json(42) })).unwrap();
        let expected: BlockPayload = serde_json::from_value(payload_json(42)).unwrap();

        let block = raw.normalize().unwrap();
        assert_eq!(block.version(), BlockVersion::V1);
        assert_eq!(block.into_payload(), expected);
    }

    #[test]
    fn test_version2_unwraps_unchanged() {
        let raw: RawBlock = serde_json::from_value(json!({ "Version2": payload_json(9) })).unwrap();
        let expected: BlockPayload = serde_json::from_value(payload_json(9)).unwrap();

        let block = raw.normalize().unwrap();
        assert_eq!(block.version(), BlockVersion::V2);
        assert_eq!(block.height(), 9);
        assert_eq!(block.payload(), &expected);
    }

    #[test]
    fn test_untagged_block_is_unknown_version() {
        let raw: RawBlock = serde_json::from_value(json!({})).unwrap();
        assert_eq!(raw.height(), Err(ExplorerError::UnknownBlockVersion));
        assert_eq!(raw.normalize(), Err(ExplorerError::UnknownBlockVersion));
    }

    #[test]
    fn test_version2_wins_when_both_tags_present() {
        let raw: RawBlock = serde_json::from_value(json!({
            "Version1": payload_json(1),
            "Version2": payload_json(2),
        }))
        .unwrap();
        assert_eq!(raw.height().unwrap(), 2);
        assert_eq!(raw.normalize().unwrap().version(), BlockVersion::V2);
    }

    #[test]
    fn test_rfc3339_timestamp_is_converted_to_millis() {
        let header: BlockHeader = serde_json::from_value(json!({
            "height": 3,
            "era_id": 0,
            "timestamp": "2024-05-01T12:00:00.250Z",
        }))
        .unwrap();
        assert_eq!(header.timestamp, 1_714_564_800_250);
    }

    #[test]
    fn test_pre_epoch_timestamp_is_rejected() {
        let result: std::result::Result<BlockHeader, _> = serde_json::from_value(json!({
            "height": 3,
            "era_id": 0,
            "timestamp": "1969-12-31T23:59:59Z",
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_body_without_transactions_counts_zero() {
        let payload: BlockPayload = serde_json::from_value(json!({
            "hash": "00",
            "header": { "height": 0, "era_id": 0, "timestamp": 0 },
            "body": { "deploy_hashes": [], "transfer_hashes": [] }
        }))
        .unwrap();
        assert_eq!(payload.body.transaction_count(), 0);
    }

    #[test]
    fn test_block_info_without_signed_block() {
        let info: BlockInfo = serde_json::from_value(json!({ "api_version": "2.0.0" })).unwrap();
        assert!(info.block().is_none());
        assert!(info.into_block().is_none());

        let info: BlockInfo =
            serde_json::from_value(json!({ "block_with_signatures": { "proofs": [] } })).unwrap();
        assert!(info.into_block().is_none());
    }

    #[test]
    fn test_raw_block_from_block_keeps_tag() {
        let payload: BlockPayload = serde_json::from_value(payload_json(5)).unwrap();
        let raw = RawBlock::from(Block::Version1(payload.clone()));
        assert_eq!(raw.version1, Some(payload));
        assert!(raw.version2.is_none());
    }
}

//! LRU cache of display records keyed by block height
//!
//! A block below the tip never changes while the network stays up, so paging
//! back and forth only has to hit the node for heights that were not seen
//! before. A relaunch starts a new chain, so the controller clears it then.
use crate::display::DisplayBlock;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Thread-safe, cloneable handle; clones share the same entries.
#[derive(Clone)]
pub struct BlockCache {
    cache: Arc<RwLock<LruCache<u64, DisplayBlock>>>,
}

impl BlockCache {
    pub const DEFAULT_CAPACITY: usize = 100;

    pub fn new(capacity: usize) -> Self {
        // A zero capacity is bumped to one entry.
        let capacity_nz = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Arc::new(RwLock::new(LruCache::new(capacity_nz))),
        }
    }

    /// Look up a height. A hit counts as a use, so this takes the write lock.
    pub async fn get(&self, height: u64) -> Option<DisplayBlock> {
        let mut cache = self.cache.write().await;
        cache.get(&height).cloned()
    }

    pub async fn put(&self, block: DisplayBlock) {
        let mut cache = self.cache.write().await;
        cache.put(block.height, block);
    }

    pub async fn clear(&self) {
        self.cache.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.is_empty()
    }

    pub async fn capacity(&self) -> usize {
        self.cache.read().await.cap().get()
    }
}

impl Default for BlockCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

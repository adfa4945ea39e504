//! Fetch controller for the paginated block list
//!
//! One fetch runs per trigger: a page change, or the network coming up. The
//! latest block gives the chain tip, the tip gives a [`PageWindow`], and the
//! heights in the window are fetched concurrently and joined all-or-nothing.
//!
//! Every fetch takes a generation number. When it completes, the result is
//! only stored if no newer fetch has started since, so a slow response for a
//! page the user already left never overwrites the page they are on.

use crate::cache::BlockCache;
use crate::client::ChainClient;
use crate::display::DisplayBlock;
use crate::error::{ExplorerError, Result};
use crate::pagination::{page_window, PageWindow};
use futures::future::try_join_all;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// A fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    pub current_page: u64,
    pub is_last_page: bool,
    /// Descending by height, at most one page long.
    pub blocks: Vec<DisplayBlock>,
}

impl PageState {
    pub fn empty(page: u64) -> Self {
        Self {
            current_page: page,
            is_last_page: true,
            blocks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// Network not running; nothing is fetched.
    Paused,
    Loading,
    Ready(PageState),
    /// Fetch succeeded but there is nothing to show.
    Empty,
    Error(String),
}

/// Everything the controller owns, copied out for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerState {
    pub page: u64,
    pub is_last_page: bool,
    pub network_running: bool,
    pub view: ViewState,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            page: 1,
            is_last_page: false,
            network_running: false,
            view: ViewState::Paused,
        }
    }
}

/// Fetch one page from `client`.
///
/// A failing or empty "latest block" call yields an empty last page, so a
/// paused backend shows "no blocks" rather than an error. Failures of the
/// per-height lookups, and blocks of unknown version, are errors.
pub async fn fetch_page<C: ChainClient + ?Sized>(
    client: &C,
    cache: Option<&BlockCache>,
    page: u64,
    page_size: usize,
) -> Result<PageState> {
    let latest = match client.get_latest_block_info().await {
        Ok(info) => info,
        Err(e) => {
            warn!(page, "latest block unavailable, showing no blocks: {}", e);
            return Ok(PageState::empty(page));
        }
    };
    let Some(tip) = latest.into_block() else {
        debug!(page, "latest block info carried no block");
        return Ok(PageState::empty(page));
    };

    let window: PageWindow = page_window(tip.height()?, page, page_size)?;
    if window.is_empty() {
        return Ok(PageState::empty(page));
    }

    let lookups = window
        .heights
        .iter()
        .map(|&height| fetch_display_block(client, cache, height));
    let mut blocks: Vec<DisplayBlock> = try_join_all(lookups)
        .await?
        .into_iter()
        .flatten()
        .collect();

    blocks.sort_by(|a, b| b.height.cmp(&a.height));
    blocks.truncate(page_size);
    let is_last_page = blocks.len() < page_size;

    Ok(PageState {
        current_page: page,
        is_last_page,
        blocks,
    })
}

/// Resolve one height. `Ok(None)` when the node answered without a block.
async fn fetch_display_block<C: ChainClient + ?Sized>(
    client: &C,
    cache: Option<&BlockCache>,
    height: u64,
) -> Result<Option<DisplayBlock>> {
    if let Some(cache) = cache {
        if let Some(hit) = cache.get(height).await {
            return Ok(Some(hit));
        }
    }

    let info = client.get_block_info_by_height(height).await?;
    // Deliberately skipped instead of failing the page; the page just comes up short.
    let Some(raw) = info.into_block() else {
        debug!(height, "block info carried no block, skipping");
        return Ok(None);
    };
    let row = DisplayBlock::from(&raw.normalize()?);

    if let Some(cache) = cache {
        cache.put(row.clone()).await;
    }
    Ok(Some(row))
}

pub struct BlocksController<C: ?Sized> {
    client: Arc<C>,
    cache: Option<BlockCache>,
    page_size: usize,
    generation: AtomicU64,
    state: RwLock<ControllerState>,
}

impl<C: ChainClient + ?Sized> BlocksController<C> {
    pub fn new(client: Arc<C>, page_size: usize) -> Self {
        Self {
            client,
            cache: None,
            page_size,
            generation: AtomicU64::new(0),
            state: RwLock::new(ControllerState::default()),
        }
    }

    pub fn with_cache(mut self, cache: BlockCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub async fn snapshot(&self) -> ControllerState {
        self.state.read().await.clone()
    }

    pub async fn view(&self) -> ViewState {
        self.state.read().await.view.clone()
    }

    /// Update the network flag. Coming up clears the cache (a relaunch
    /// starts a fresh chain) and triggers a fetch; going down pauses the
    /// view and drops any fetch still in flight.
    pub async fn set_network_running(&self, running: bool) -> ViewState {
        let was_running = {
            let mut state = self.state.write().await;
            let was_running = state.network_running;
            state.network_running = running;
            if !running {
                self.generation.fetch_add(1, Ordering::SeqCst);
                state.view = ViewState::Paused;
                return ViewState::Paused;
            }
            was_running
        };

        if was_running {
            self.view().await
        } else {
            info!("network running, loading blocks");
            self.clear_cache().await;
            self.refresh().await
        }
    }

    /// Forget every cached row.
    pub async fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear().await;
        }
    }

    /// Advance one page unless the current page is the last.
    pub async fn next_page(&self) -> ViewState {
        {
            let mut state = self.state.write().await;
            if state.is_last_page {
                return state.view.clone();
            }
            state.page += 1;
        }
        self.refresh().await
    }

    /// Go back one page; page 1 stays on page 1.
    pub async fn previous_page(&self) -> ViewState {
        {
            let mut state = self.state.write().await;
            if state.page <= 1 {
                return state.view.clone();
            }
            state.page -= 1;
        }
        self.refresh().await
    }

    pub async fn go_to_page(&self, page: u64) -> Result<ViewState> {
        if page == 0 {
            return Err(ExplorerError::InvalidPage(
                "page numbers start at 1".to_string(),
            ));
        }
        self.state.write().await.page = page;
        Ok(self.refresh().await)
    }

    /// Fetch the current page and store the outcome, unless a newer fetch
    /// started meanwhile. Returns the view as it stands afterwards.
    pub async fn refresh(&self) -> ViewState {
        let (generation, page) = {
            let mut state = self.state.write().await;
            if !state.network_running {
                state.view = ViewState::Paused;
                return ViewState::Paused;
            }
            state.view = ViewState::Loading;
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            (generation, state.page)
        };

        let outcome = fetch_page(&*self.client, self.cache.as_ref(), page, self.page_size).await;

        let mut state = self.state.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(page, generation, "dropping stale page result");
            return state.view.clone();
        }

        match outcome {
            Ok(fetched) => {
                state.is_last_page = fetched.is_last_page;
                state.view = if fetched.blocks.is_empty() {
                    ViewState::Empty
                } else {
                    ViewState::Ready(fetched)
                };
            }
            Err(e) => {
                error!(page, "error fetching blocks: {}", e);
                state.view = ViewState::Error(e.to_string());
            }
        }
        state.view.clone()
    }
}

//! Fondant explorer - paginated block list for Casper-style networks
//!
//! # Architecture
//!
//! ## Block Data
//! - [`block`] - Wire block schema and the Version1/Version2 normalizer
//! - [`display`] - Display records and row formatting
//!
//! ## Paging
//! - [`pagination`] - Height windows below the chain tip
//! - [`controller`] - Fetch pipeline and view state machine
//! - [`cache`] - LRU cache of fetched rows
//!
//! ## Upstream Services
//! - [`client`] - Node client trait and JSON-RPC adapter
//! - [`status`] - Network running flag
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Block Data
// ============================================================================
pub mod block;
pub mod display;

// ============================================================================
// Paging
// ============================================================================
pub mod cache;
pub mod controller;
pub mod pagination;

// ============================================================================
// Upstream Services
// ============================================================================
pub mod client;
pub mod status;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;

pub use block::{Block, BlockInfo, BlockPayload, RawBlock};
pub use client::{ChainClient, RpcChainClient};
pub use controller::{BlocksController, ControllerState, PageState, ViewState};
pub use display::DisplayBlock;
pub use error::{ExplorerError, Result};
pub use pagination::{page_window, PageWindow, DISPLAY_PER_PAGE};

//! # vv Publisher Configuration
//!
//! Centralized limits and configuration loading for the event publisher.
//!
//! ## Features
//!
//! - **Transport Limits**: per-event and per-batch ceilings imposed by the
//!   event-distribution endpoint
//! - **Publisher Defaults**: base source locator, retry schedule, timeouts
//! - **Config Loading**: TOML file with `VV_` environment overrides
//!
//! ## Usage
//!
//! ```rust
//! use publisher_config::{limits, PublisherConfig};
//!
//! assert_eq!(limits::MAX_EVENTS_PER_BATCH, 100);
//!
//! let config = PublisherConfig::default();
//! assert!(config.validate().is_ok());
//! ```

pub mod limits;
pub mod publisher_config;

pub use publisher_config::{load_config, BatchSettings, PublisherConfig, RetrySettings};

// src/watch/mod.rs

//! File watching and change classification.
//!
//! This module is responsible for:
//! - Expanding the configured glob patterns into concrete paths, once.
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//! - Classifying each notification against the pipeline and forwarding the
//!   resulting stage index to the runtime.
//!
//! It does **not** debounce; that is the runtime's job.

pub mod event_handler;
pub mod patterns;
pub mod watcher;

pub use event_handler::{classify_event, is_content_change};
pub use patterns::{expand_pattern, expand_patterns};
pub use watcher::{WatcherHandle, spawn_watcher};

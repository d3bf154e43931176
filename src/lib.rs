//! # querywatch - Reactive Search Query Pipeline
//!
//! Watches a search input and produces a de-duplicated, focus-aware stream of query
//! states, with a placeholder side effect that is always restored when the stream ends.
//!
//! ## Features
//!
//! - **Immediate state**: a new watcher emits the current value and focus right away
//! - **De-duplication**: repeated keyups that do not change the normalized value are dropped
//! - **Focus-aware**: focus changes re-emit the current value with the new focus flag
//! - **Guaranteed teardown**: cancel, completion, error and drop all detach listeners and
//!   reset the placeholder exactly once
//!
//! ## Architecture
//!
//! - [`error`] - Centralized error types and handling
//! - [`element`] - Event source, raw text and placeholder interfaces, plus an in-memory element
//! - [`subscription`] - Subscription lifecycle and the [`Sequence`] stream type
//! - [`operators`] - Dispatch stamps plus generic combine-latest and de-duplication operators
//! - [`query`] - The value, focus, combine and placeholder stages and their assembly
//! - [`consumer`] - Delivery of query states to a downstream consumer
//! - [`script`] - Host interaction scripts used by the CLI

// Core modules
pub mod error;
pub mod scheduler;
pub mod transform;

// Pipeline building blocks
pub mod element;
pub mod operators;
pub mod subscription;

// Pipeline and its edges
pub mod consumer;
pub mod query;
pub mod script;

#[cfg(feature = "config")]
pub mod config;

// Re-export commonly used types for convenience
pub use error::{QueryError, Result};

// Public API surface for external usage
pub use element::{InputElement, Placeholder, QueryElement};
pub use query::{apply_placeholder_effect, watch_query_state, SearchQuery, WatchOptions};
pub use subscription::{Sequence, SubscriptionHandle};
pub use transform::{QueryValue, TransformFn, TransformKind};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

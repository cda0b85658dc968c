//! Incremental reconciliation scheduling.
//!
//! A [`Reconciler`] installs onto a [`quill_text::Viewer`], watches the
//! current document for edits, coalesces them into [`DirtyRegion`]s,
//! debounces bursts behind a quiescence window, and dispatches each pending
//! change (or the whole document, on an input swap) to pluggable
//! [`ReconcilingStrategy`] implementations, optionally routed by
//! content-type partition.
//!
//! Concurrency model:
//! - one producer side (whatever thread mutates the document or swaps the
//!   viewer input; listeners run synchronously there)
//! - one background worker thread per controller, draining at most one
//!   region per wake once a full debounce window passes with no further
//!   edits
//!
//! Strategy failures (errors or panics) are confined to the dispatch step;
//! they are logged and never stop the worker.

/// Controller lifecycle, configuration, and edit translation.
pub mod controller;
/// Strategy routing and failure isolation.
mod dispatch;
/// Cooperative cancellation for in-flight passes.
pub mod progress;
/// Thread-safe dirty-region FIFO shared with the worker.
pub mod queue;
/// Pending-change descriptors.
pub mod region;
/// Strategy traits.
pub mod strategy;
/// Debounce worker loop.
mod worker;

#[cfg(test)]
mod test_support;

pub use controller::{DEFAULT_DELAY, Reconciler};
pub use progress::ProgressMonitor;
pub use queue::DirtyRegionQueue;
pub use region::{DirtyKind, DirtyRegion, decompose_edit};
pub use strategy::{ReconcilingStrategy, ReconcilingStrategyExt, StrategyError};

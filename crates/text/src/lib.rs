//! Text-model boundary for the reconciliation scheduler: char-offset spans,
//! rope-backed documents with change listeners, content-type partitioning,
//! and the viewer input binding.

/// Rope-backed shared document with change listeners.
pub mod document;
/// Listener registration primitives.
pub mod listener;
/// Content-type partitioning over a document span.
pub mod partition;
/// Char-offset spans and typed subregions.
pub mod span;
/// Viewer input binding and swap notifications.
pub mod viewer;

pub use document::{Document, DocumentError, DocumentEvent, DocumentListener};
pub use listener::ListenerId;
pub use partition::{DEFAULT_CONTENT_TYPE, FencePartitioner, PartitionError, Partitioner};
pub use ropey::Rope;
pub use span::{Span, TypedRegion};
pub use viewer::{InputChange, InputListener, Viewer};

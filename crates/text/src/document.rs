use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use ropey::Rope;
use thiserror::Error;

use crate::listener::{ListenerId, Registry};
use crate::partition::{DEFAULT_CONTENT_TYPE, PartitionError, Partitioner};
use crate::span::{Span, TypedRegion};

/// One content change: `removed_len` chars at `offset` replaced by
/// `inserted`. A pure insertion has `removed_len == 0`; a pure removal has
/// an empty `inserted`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEvent {
	pub offset: usize,
	pub removed_len: usize,
	pub inserted: String,
}

/// Errors from document mutation.
#[derive(Debug, Error)]
pub enum DocumentError {
	/// The edit span does not fit the current document length.
	#[error("edit {offset}+{removed_len} exceeds document length {doc_len}")]
	OutOfRange {
		offset: usize,
		removed_len: usize,
		doc_len: usize,
	},
}

/// Callback invoked after each content change, on the mutating thread.
pub type DocumentListener = Box<dyn FnMut(&DocumentEvent) + Send>;

/// Shared handle to a mutable text document. All offsets are char offsets.
///
/// Clones refer to the same underlying document. Content changes notify
/// every registered listener synchronously on the mutating thread, after
/// the edit has been applied. Listeners must not register or detach
/// listeners on the same document from inside a notification.
#[derive(Clone)]
pub struct Document {
	shared: Arc<Shared>,
}

struct Shared {
	content: Mutex<Content>,
	listeners: Mutex<Registry<DocumentListener>>,
}

struct Content {
	rope: Rope,
	partitioner: Option<Box<dyn Partitioner>>,
}

impl Document {
	pub fn new(text: &str) -> Self {
		Self {
			shared: Arc::new(Shared {
				content: Mutex::new(Content {
					rope: Rope::from_str(text),
					partitioner: None,
				}),
				listeners: Mutex::new(Registry::default()),
			}),
		}
	}

	/// Length in chars.
	pub fn len(&self) -> usize {
		self.shared.content.lock().rope.len_chars()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn text(&self) -> String {
		self.shared.content.lock().rope.to_string()
	}

	/// Snapshot of the content rope (cheap clone).
	pub fn rope(&self) -> Rope {
		self.shared.content.lock().rope.clone()
	}

	/// Whether `other` is a handle to this same document.
	pub fn same(&self, other: &Document) -> bool {
		Arc::ptr_eq(&self.shared, &other.shared)
	}

	/// Replaces `removed_len` chars at `offset` with `inserted`, then
	/// notifies listeners.
	pub fn replace(
		&self,
		offset: usize,
		removed_len: usize,
		inserted: &str,
	) -> Result<(), DocumentError> {
		{
			let mut content = self.shared.content.lock();
			let doc_len = content.rope.len_chars();
			let end = offset.checked_add(removed_len);
			if end.is_none_or(|end| end > doc_len) {
				return Err(DocumentError::OutOfRange {
					offset,
					removed_len,
					doc_len,
				});
			}
			if removed_len > 0 {
				content.rope.remove(offset..offset + removed_len);
			}
			if !inserted.is_empty() {
				content.rope.insert(offset, inserted);
			}
		}
		let event = DocumentEvent {
			offset,
			removed_len,
			inserted: inserted.to_string(),
		};
		for listener in self.shared.listeners.lock().iter_mut() {
			listener(&event);
		}
		Ok(())
	}

	pub fn add_listener(&self, listener: DocumentListener) -> ListenerId {
		self.shared.listeners.lock().add(listener)
	}

	pub fn remove_listener(&self, id: ListenerId) {
		self.shared.listeners.lock().remove(id);
	}

	/// Installs the partitioner consulted by [`Self::partition`], replacing
	/// any previous one.
	pub fn set_partitioner(&self, partitioner: Box<dyn Partitioner>) {
		self.shared.content.lock().partitioner = Some(partitioner);
	}

	/// Splits `span` into typed subregions.
	///
	/// Without an installed partitioner the result is a single region of
	/// [`DEFAULT_CONTENT_TYPE`] covering `span`. Fails when `span` does not
	/// fit the current document length.
	pub fn partition(&self, span: Span) -> Result<Vec<TypedRegion>, PartitionError> {
		let content = self.shared.content.lock();
		let doc_len = content.rope.len_chars();
		if span.end() > doc_len {
			return Err(PartitionError::OutOfRange {
				offset: span.offset,
				len: span.len,
				doc_len,
			});
		}
		match &content.partitioner {
			Some(partitioner) => partitioner.partition(&content.rope, span),
			None => Ok(vec![TypedRegion::new(span, DEFAULT_CONTENT_TYPE)]),
		}
	}
}

impl fmt::Debug for Document {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Document").field("len", &self.len()).finish_non_exhaustive()
	}
}

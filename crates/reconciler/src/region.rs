use quill_text::Span;

/// Kind of change a [`DirtyRegion`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirtyKind {
	Insert,
	Remove,
}

/// One pending change awaiting dispatch.
///
/// Created by the controller from a document event (or synthesized on an
/// input swap), enqueued, dequeued exactly once, and discarded after
/// dispatch. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirtyRegion {
	offset: usize,
	len: usize,
	kind: DirtyKind,
	text: Option<String>,
}

impl DirtyRegion {
	/// An insertion of `text` at `offset`. Length is the char count of the
	/// inserted text.
	pub fn insert(offset: usize, text: impl Into<String>) -> Self {
		let text = text.into();
		Self {
			offset,
			len: text.chars().count(),
			kind: DirtyKind::Insert,
			text: Some(text),
		}
	}

	/// A removal of `len` chars at `offset`. The removed text is not
	/// retained.
	pub fn remove(offset: usize, len: usize) -> Self {
		Self {
			offset,
			len,
			kind: DirtyKind::Remove,
			text: None,
		}
	}

	pub fn offset(&self) -> usize {
		self.offset
	}

	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	pub fn kind(&self) -> DirtyKind {
		self.kind
	}

	/// Inserted text; `None` for removals.
	pub fn text(&self) -> Option<&str> {
		self.text.as_deref()
	}

	/// The affected span, as used for partition routing.
	pub fn span(&self) -> Span {
		Span::new(self.offset, self.len)
	}
}

/// Decomposes a raw edit into dirty regions.
///
/// A pure insertion or pure removal maps to one region; a replacement maps
/// to a removal followed by an insertion at the same offset, in that order.
pub fn decompose_edit(offset: usize, removed_len: usize, inserted: &str) -> Vec<DirtyRegion> {
	if removed_len == 0 && !inserted.is_empty() {
		vec![DirtyRegion::insert(offset, inserted)]
	} else if inserted.is_empty() {
		vec![DirtyRegion::remove(offset, removed_len)]
	} else {
		vec![
			DirtyRegion::remove(offset, removed_len),
			DirtyRegion::insert(offset, inserted),
		]
	}
}

/// A contiguous run of document content, measured in chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
	pub offset: usize,
	pub len: usize,
}

impl Span {
	pub const fn new(offset: usize, len: usize) -> Self {
		Self { offset, len }
	}

	/// Offset one past the last char covered by this span.
	pub const fn end(&self) -> usize {
		self.offset + self.len
	}

	pub const fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Overlap with `other`, or `None` when the spans do not share content.
	pub fn intersect(&self, other: Span) -> Option<Span> {
		let start = self.offset.max(other.offset);
		let end = self.end().min(other.end());
		(start < end).then(|| Span::new(start, end - start))
	}
}

/// A subregion of a document carrying the content type assigned to it by a
/// partitioner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedRegion {
	pub span: Span,
	pub content_type: String,
}

impl TypedRegion {
	pub fn new(span: Span, content_type: impl Into<String>) -> Self {
		Self {
			span,
			content_type: content_type.into(),
		}
	}
}

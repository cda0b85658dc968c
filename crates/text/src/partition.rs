use ropey::Rope;
use thiserror::Error;

use crate::span::{Span, TypedRegion};

/// Content type reported when no partitioner is installed.
pub const DEFAULT_CONTENT_TYPE: &str = "text";

/// Errors from computing a content-type partitioning.
#[derive(Debug, Error)]
pub enum PartitionError {
	/// The requested span does not fit the current document length.
	#[error("span {offset}+{len} exceeds document length {doc_len}")]
	OutOfRange {
		offset: usize,
		len: usize,
		doc_len: usize,
	},

	/// Partitioner-specific failure.
	#[error("partitioning failed: {0}")]
	Failed(String),
}

/// Splits a span of document content into typed subregions.
///
/// Implementations must return regions in document order, clipped to the
/// requested span. Empty subregions may be omitted.
pub trait Partitioner: Send {
	fn partition(&self, text: &Rope, span: Span) -> Result<Vec<TypedRegion>, PartitionError>;
}

/// Line-rule partitioner splitting a document on triple-backtick fences.
///
/// Lines from an opening fence through its closing fence (both inclusive)
/// form one region of the configured code content type; everything else is
/// [`DEFAULT_CONTENT_TYPE`]. An unclosed fence runs to the end of the
/// document.
pub struct FencePartitioner {
	code_content_type: String,
}

impl FencePartitioner {
	pub fn new(code_content_type: impl Into<String>) -> Self {
		Self {
			code_content_type: code_content_type.into(),
		}
	}
}

impl Partitioner for FencePartitioner {
	fn partition(&self, text: &Rope, span: Span) -> Result<Vec<TypedRegion>, PartitionError> {
		// (start, end, is_code) runs over the whole document, char offsets.
		let mut runs: Vec<(usize, usize, bool)> = Vec::new();
		let mut run_start = 0usize;
		let mut offset = 0usize;
		let mut in_code = false;

		for line in text.lines() {
			let line_len = line.len_chars();
			let fence = {
				let mut chars = line.chars();
				chars.next() == Some('`') && chars.next() == Some('`') && chars.next() == Some('`')
			};
			if fence && !in_code {
				if offset > run_start {
					runs.push((run_start, offset, false));
				}
				run_start = offset;
				in_code = true;
			} else if fence && in_code {
				runs.push((run_start, offset + line_len, true));
				run_start = offset + line_len;
				in_code = false;
			}
			offset += line_len;
		}
		if offset > run_start {
			runs.push((run_start, offset, in_code));
		}

		let mut regions = Vec::new();
		for (start, end, is_code) in runs {
			if let Some(clipped) = Span::new(start, end - start).intersect(span) {
				let content_type = if is_code {
					self.code_content_type.as_str()
				} else {
					DEFAULT_CONTENT_TYPE
				};
				regions.push(TypedRegion::new(clipped, content_type));
			}
		}
		Ok(regions)
	}
}

//! Routing of dequeued dirty regions (or whole-document signals) to
//! strategies, with per-invocation failure isolation.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use parking_lot::Mutex;
use quill_text::{Document, Span, TypedRegion};

use crate::progress::ProgressMonitor;
use crate::region::DirtyRegion;
use crate::strategy::ReconcilingStrategy;

/// Registered strategies, fixed to one of two dispatch policies at
/// construction.
enum StrategySet {
	/// One strategy handles every dispatch regardless of content type.
	Single(Box<dyn ReconcilingStrategy>),
	/// Strategies routed by content-type partition; unregistered types are
	/// skipped silently.
	ByContentType(HashMap<String, Box<dyn ReconcilingStrategy>>),
}

impl StrategySet {
	fn iter_mut(&mut self) -> Box<dyn Iterator<Item = &mut Box<dyn ReconcilingStrategy>> + '_> {
		match self {
			Self::Single(strategy) => Box::new(std::iter::once(strategy)),
			Self::ByContentType(map) => Box::new(map.values_mut()),
		}
	}
}

/// Dispatch step between the worker and the strategies.
///
/// Holds the current document binding (updated on input swaps) and the
/// progress monitor forwarded to extension-capable strategies.
pub(crate) struct StrategyDispatcher {
	strategies: Mutex<StrategySet>,
	document: Mutex<Option<Document>>,
	monitor: Mutex<ProgressMonitor>,
}

impl StrategyDispatcher {
	pub(crate) fn single(mut strategy: Box<dyn ReconcilingStrategy>) -> Self {
		let monitor = ProgressMonitor::new();
		if let Some(ext) = strategy.as_ext() {
			ext.set_progress_monitor(monitor.clone());
		}
		Self {
			strategies: Mutex::new(StrategySet::Single(strategy)),
			document: Mutex::new(None),
			monitor: Mutex::new(monitor),
		}
	}

	pub(crate) fn partitioned() -> Self {
		Self {
			strategies: Mutex::new(StrategySet::ByContentType(HashMap::new())),
			document: Mutex::new(None),
			monitor: Mutex::new(ProgressMonitor::new()),
		}
	}

	/// Registers `strategy` for `content_type`, replacing any previous one.
	/// The extension capability is probed here, once; the dispatch path
	/// never re-inspects it.
	pub(crate) fn register(&self, content_type: &str, mut strategy: Box<dyn ReconcilingStrategy>) {
		if let Some(ext) = strategy.as_ext() {
			ext.set_progress_monitor(self.monitor.lock().clone());
		}
		if let Some(document) = self.document.lock().clone() {
			strategy.set_document(&document);
		}
		match &mut *self.strategies.lock() {
			StrategySet::Single(_) => {
				tracing::warn!(
					content_type,
					"Ignoring per-content-type registration on a single-strategy reconciler"
				);
			}
			StrategySet::ByContentType(map) => {
				map.insert(content_type.to_string(), strategy);
			}
		}
	}

	/// Rebinds the current document and propagates it to every strategy.
	pub(crate) fn set_document(&self, document: Option<&Document>) {
		*self.document.lock() = document.cloned();
		if let Some(document) = document {
			for strategy in self.strategies.lock().iter_mut() {
				strategy.set_document(document);
			}
		}
	}

	/// Replaces the progress monitor and forwards it to extension-capable
	/// strategies.
	pub(crate) fn set_progress_monitor(&self, monitor: ProgressMonitor) {
		*self.monitor.lock() = monitor.clone();
		for strategy in self.strategies.lock().iter_mut() {
			if let Some(ext) = strategy.as_ext() {
				ext.set_progress_monitor(monitor.clone());
			}
		}
	}

	/// Asks a cooperative in-flight dispatch to stop early.
	pub(crate) fn cancel_progress(&self) {
		self.monitor.lock().cancel();
	}

	/// Re-arms the monitor for the next dispatch cycle.
	pub(crate) fn reset_progress(&self) {
		self.monitor.lock().reset();
	}

	/// Whether the monitor was canceled during the pass that just ran.
	pub(crate) fn progress_canceled(&self) -> bool {
		self.monitor.lock().is_canceled()
	}

	/// Runs the one-time setup hook on every extension-capable strategy.
	pub(crate) fn initial_reconcile(&self) {
		for strategy in self.strategies.lock().iter_mut() {
			if let Some(ext) = strategy.as_ext() {
				let outcome = panic::catch_unwind(AssertUnwindSafe(|| ext.initial_reconcile()));
				if outcome.is_err() {
					tracing::error!("Strategy panicked during initial reconcile");
				}
			}
		}
	}

	/// Dispatches one dequeued region; `None` is the whole-document signal.
	pub(crate) fn process(&self, dirty: Option<&DirtyRegion>) {
		let Some(document) = self.document.lock().clone() else {
			tracing::trace!("Skipping dispatch with no bound document");
			return;
		};
		let span = match dirty {
			Some(region) => region.span(),
			None => Span::new(0, document.len()),
		};
		match &mut *self.strategies.lock() {
			StrategySet::Single(strategy) => {
				invoke(strategy.as_mut(), dirty, span, None);
			}
			StrategySet::ByContentType(map) => {
				for sub in compute_partitioning(&document, span) {
					let Some(strategy) = map.get_mut(&sub.content_type) else {
						tracing::trace!(
							content_type = %sub.content_type,
							"No strategy registered for subregion; skipping"
						);
						continue;
					};
					invoke(strategy.as_mut(), dirty, sub.span, Some(&sub.content_type));
				}
			}
		}
	}
}

/// Partitioning failures degrade to an empty list: a stale span racing a
/// further edit is expected, not fatal.
fn compute_partitioning(document: &Document, span: Span) -> Vec<TypedRegion> {
	match document.partition(span) {
		Ok(regions) => regions,
		Err(error) => {
			tracing::debug!(
				%error,
				offset = span.offset,
				len = span.len,
				"Partitioning failed; nothing dispatched this cycle"
			);
			Vec::new()
		}
	}
}

/// One isolated strategy invocation. Errors are logged; panics are caught so
/// a faulty strategy cannot take down the worker thread.
fn invoke(
	strategy: &mut dyn ReconcilingStrategy,
	dirty: Option<&DirtyRegion>,
	span: Span,
	content_type: Option<&str>,
) {
	let call = panic::catch_unwind(AssertUnwindSafe(|| match dirty {
		Some(region) => strategy.reconcile_region(region, span),
		None => strategy.reconcile(span),
	}));
	match call {
		Ok(Ok(())) => {}
		Ok(Err(error)) => {
			tracing::warn!(
				%error,
				content_type,
				offset = span.offset,
				len = span.len,
				"Reconcile pass failed"
			);
		}
		Err(_) => {
			tracing::error!(
				content_type,
				offset = span.offset,
				len = span.len,
				"Strategy panicked during reconcile"
			);
		}
	}
}

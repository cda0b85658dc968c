//! Strategy doubles shared by the dispatcher and controller tests.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use quill_text::{Document, Span};

use crate::progress::ProgressMonitor;
use crate::region::DirtyRegion;
use crate::strategy::{ReconcilingStrategy, ReconcilingStrategyExt, StrategyError};

/// One observed reconcile call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
	Incremental { dirty: DirtyRegion, span: Span },
	Whole { span: Span },
}

#[derive(Default)]
struct LogInner {
	calls: Vec<(Instant, Call)>,
	documents: Vec<String>,
	initial_count: usize,
	monitors: Vec<ProgressMonitor>,
}

/// Shared record of everything a [`RecordingStrategy`] observed.
#[derive(Clone, Default)]
pub(crate) struct Log {
	inner: Arc<Mutex<LogInner>>,
}

impl Log {
	pub(crate) fn calls(&self) -> Vec<Call> {
		self.inner.lock().calls.iter().map(|(_, call)| call.clone()).collect()
	}

	pub(crate) fn timed_calls(&self) -> Vec<(Instant, Call)> {
		self.inner.lock().calls.clone()
	}

	pub(crate) fn call_count(&self) -> usize {
		self.inner.lock().calls.len()
	}

	pub(crate) fn clear_calls(&self) {
		self.inner.lock().calls.clear();
	}

	pub(crate) fn documents(&self) -> Vec<String> {
		self.inner.lock().documents.clone()
	}

	pub(crate) fn initial_count(&self) -> usize {
		self.inner.lock().initial_count
	}

	pub(crate) fn last_monitor(&self) -> Option<ProgressMonitor> {
		self.inner.lock().monitors.last().cloned()
	}
}

/// Configurable strategy double. The default records calls and succeeds.
pub(crate) struct RecordingStrategy {
	log: Log,
	/// Number of leading reconcile calls that panic before recording.
	pub(crate) panic_budget: usize,
	/// Every recorded call returns `StrategyError::Failed`.
	pub(crate) fail_always: bool,
	/// The next reconcile call blocks until the progress monitor is
	/// canceled, records the call, and returns `StrategyError::Canceled`.
	pub(crate) wait_for_cancel_once: bool,
	/// Whether [`ReconcilingStrategy::as_ext`] exposes the extension.
	pub(crate) ext: bool,
	monitor: Option<ProgressMonitor>,
}

impl RecordingStrategy {
	pub(crate) fn new(log: &Log) -> Self {
		Self {
			log: log.clone(),
			panic_budget: 0,
			fail_always: false,
			wait_for_cancel_once: false,
			ext: false,
			monitor: None,
		}
	}

	pub(crate) fn with_ext(log: &Log) -> Self {
		Self {
			ext: true,
			..Self::new(log)
		}
	}

	fn note(&mut self, call: Call) -> Result<(), StrategyError> {
		if self.panic_budget > 0 {
			self.panic_budget -= 1;
			panic!("strategy double panics on purpose");
		}
		if self.wait_for_cancel_once {
			self.wait_for_cancel_once = false;
			let monitor = self.monitor.clone().unwrap_or_default();
			let deadline = Instant::now() + Duration::from_secs(5);
			while !monitor.is_canceled() && Instant::now() < deadline {
				thread::sleep(Duration::from_millis(2));
			}
			self.log.inner.lock().calls.push((Instant::now(), call));
			return Err(StrategyError::Canceled);
		}
		self.log.inner.lock().calls.push((Instant::now(), call));
		if self.fail_always {
			Err(StrategyError::Failed("strategy double fails on purpose".into()))
		} else {
			Ok(())
		}
	}
}

impl ReconcilingStrategy for RecordingStrategy {
	fn set_document(&mut self, document: &Document) {
		self.log.inner.lock().documents.push(document.text());
	}

	fn reconcile_region(&mut self, dirty: &DirtyRegion, span: Span) -> Result<(), StrategyError> {
		self.note(Call::Incremental {
			dirty: dirty.clone(),
			span,
		})
	}

	fn reconcile(&mut self, span: Span) -> Result<(), StrategyError> {
		self.note(Call::Whole { span })
	}

	fn as_ext(&mut self) -> Option<&mut dyn ReconcilingStrategyExt> {
		if self.ext { Some(self) } else { None }
	}
}

impl ReconcilingStrategyExt for RecordingStrategy {
	fn set_progress_monitor(&mut self, monitor: ProgressMonitor) {
		self.monitor = Some(monitor.clone());
		self.log.inner.lock().monitors.push(monitor);
	}

	fn initial_reconcile(&mut self) {
		self.log.inner.lock().initial_count += 1;
	}
}

/// Polls `condition` until it holds or a generous deadline passes.
pub(crate) fn wait_until(name: &str, mut condition: impl FnMut() -> bool) {
	let deadline = Instant::now() + Duration::from_secs(5);
	while Instant::now() < deadline {
		if condition() {
			return;
		}
		thread::sleep(Duration::from_millis(5));
	}
	panic!("timed out waiting for {name}");
}

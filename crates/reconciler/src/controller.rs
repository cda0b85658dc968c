//! Reconciler controller: lifecycle, configuration, and translation of
//! document/viewer notifications into queued dirty regions.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use quill_text::{Document, DocumentEvent, InputChange, ListenerId, Viewer};

use crate::dispatch::StrategyDispatcher;
use crate::progress::ProgressMonitor;
use crate::queue::DirtyRegionQueue;
use crate::region::{self, DirtyRegion};
use crate::strategy::ReconcilingStrategy;
use crate::worker::Worker;

/// Default debounce window.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Debounced reconciliation controller.
///
/// Owns the dirty-region queue and the background worker. Once installed
/// onto a [`Viewer`], it follows the viewer's input document, translates
/// edits into dirty regions (incremental mode) or whole-document signals,
/// and has the worker dispatch them to the configured strategies after a
/// quiet debounce window.
///
/// Dropping the controller uninstalls it, so the worker thread never
/// outlives its owner.
pub struct Reconciler {
	core: Arc<Core>,
	worker: Option<Worker>,
	installed: Option<Installed>,
}

struct Installed {
	viewer: Viewer,
	input_listener: ListenerId,
}

/// State shared with the viewer/document listener closures.
struct Core {
	queue: DirtyRegionQueue,
	dispatcher: Arc<StrategyDispatcher>,
	incremental: AtomicBool,
	binding: Mutex<Option<Binding>>,
}

/// The currently bound document and its registered change listener.
struct Binding {
	document: Document,
	listener: ListenerId,
}

impl Reconciler {
	/// A single-strategy reconciler: `strategy` handles every dispatch
	/// regardless of content type.
	pub fn new(strategy: Box<dyn ReconcilingStrategy>) -> Self {
		Self::with_dispatcher(StrategyDispatcher::single(strategy))
	}

	/// A partition-routed reconciler. Strategies are registered per content
	/// type with [`Self::register_strategy`]; subregions of unregistered
	/// types are skipped.
	pub fn with_partitioning() -> Self {
		Self::with_dispatcher(StrategyDispatcher::partitioned())
	}

	fn with_dispatcher(dispatcher: StrategyDispatcher) -> Self {
		Self {
			core: Arc::new(Core {
				queue: DirtyRegionQueue::new(DEFAULT_DELAY),
				dispatcher: Arc::new(dispatcher),
				incremental: AtomicBool::new(false),
				binding: Mutex::new(None),
			}),
			worker: None,
			installed: None,
		}
	}

	/// Registers `strategy` for `content_type`, replacing any previous one.
	/// Ignored (with a warning) in single-strategy mode.
	pub fn register_strategy(&self, content_type: &str, strategy: Box<dyn ReconcilingStrategy>) {
		self.core.dispatcher.register(content_type, strategy);
	}

	/// Sets the debounce window; effective from the next worker wake. A zero
	/// delay disables debouncing and processes edits as they arrive.
	pub fn set_delay(&self, delay: Duration) {
		self.core.queue.set_delay(delay);
	}

	/// Switches between incremental and whole-document mode.
	///
	/// In incremental mode edits are decomposed into dirty regions and input
	/// swaps purge pending work and inject synthetic remove/insert regions,
	/// keeping strategies' change history consistent. Otherwise every
	/// dispatch covers the whole document.
	pub fn set_incremental(&self, incremental: bool) {
		self.core.incremental.store(incremental, Ordering::Release);
	}

	/// Replaces the monitor handed to extension-capable strategies.
	pub fn set_progress_monitor(&self, monitor: ProgressMonitor) {
		self.core.dispatcher.set_progress_monitor(monitor);
	}

	/// Binds to `viewer`'s input notifications and starts the background
	/// worker. If the viewer already has an input document it is adopted as
	/// a fresh swap. Installing while installed re-installs.
	pub fn install(&mut self, viewer: &Viewer) {
		self.uninstall();
		let core = Arc::clone(&self.core);
		let input_listener = viewer.add_input_listener(Box::new(move |change| match change {
			InputChange::AboutToChange { old, .. } => core.input_about_to_change(old.as_ref()),
			InputChange::Changed { new, .. } => core.input_changed(new.as_ref()),
		}));
		self.installed = Some(Installed {
			viewer: viewer.clone(),
			input_listener,
		});
		if let Some(document) = viewer.input() {
			self.core.input_changed(Some(&document));
		}
		self.worker = Some(Worker::spawn(
			self.core.queue.clone(),
			Arc::clone(&self.core.dispatcher),
		));
		tracing::debug!("Reconciler installed");
	}

	/// Detaches all listeners, stops the worker, and discards any pending
	/// regions, so a later [`Self::install`] starts from a clean queue.
	/// Idempotent; calling it twice, or before install, is a no-op.
	pub fn uninstall(&mut self) {
		if let Some(installed) = self.installed.take() {
			installed.viewer.remove_input_listener(installed.input_listener);
		}
		self.core.unbind_document();
		if let Some(mut worker) = self.worker.take() {
			worker.cancel_and_join();
			tracing::debug!("Reconciler uninstalled");
		}
		self.core.queue.reset();
	}
}

impl Drop for Reconciler {
	fn drop(&mut self) {
		self.uninstall();
	}
}

impl Core {
	/// Translates a raw document edit into queue work.
	fn document_changed(&self, event: &DocumentEvent) {
		if self.queue.is_active() {
			// The in-flight pass is working on stale content; ask it to
			// stop early.
			self.dispatcher.cancel_progress();
		}
		if self.incremental.load(Ordering::Acquire) {
			for region in region::decompose_edit(event.offset, event.removed_len, &event.inserted) {
				self.queue.append(region);
				self.queue.note_edit();
			}
		} else {
			self.queue.note_edit();
		}
	}

	/// First phase of an input swap: flush state tied to the old document.
	fn input_about_to_change(&self, old: Option<&Document>) {
		if self.incremental.load(Ordering::Acquire) {
			self.queue.purge();
			if let Some(old) = old {
				let old_len = old.len();
				if old_len > 0 {
					// Closing removal, so incremental strategies see a clean
					// "everything removed" before the new document's insert.
					self.queue.append(DirtyRegion::remove(0, old_len));
				}
			}
		}
		self.unbind_document();
	}

	/// Second phase of an input swap: bind the new document and force a
	/// whole-document pass.
	fn input_changed(self: &Arc<Self>, new: Option<&Document>) {
		let Some(document) = new else { return };
		self.bind_document(document);
		self.dispatcher.set_document(Some(document));
		self.force_reconcile(document);
	}

	fn bind_document(self: &Arc<Self>, document: &Document) {
		let core = Arc::clone(self);
		let listener = document.add_listener(Box::new(move |event| core.document_changed(event)));
		*self.binding.lock() = Some(Binding {
			document: document.clone(),
			listener,
		});
	}

	fn unbind_document(&self) {
		if let Some(binding) = self.binding.lock().take() {
			binding.document.remove_listener(binding.listener);
		}
	}

	/// Forces a full pass: incremental mode enqueues a whole-document
	/// insert; otherwise the worker is signaled with no region, which
	/// dispatches the full document span.
	fn force_reconcile(&self, document: &Document) {
		if self.incremental.load(Ordering::Acquire) && !document.is_empty() {
			self.queue.append(DirtyRegion::insert(0, document.text()));
		}
		self.queue.note_edit();
	}
}

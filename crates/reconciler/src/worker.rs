//! Background worker: runs the one-time setup hook, then the debounce loop.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::dispatch::StrategyDispatcher;
use crate::queue::{DirtyRegionQueue, Wake};

/// Handle to a controller's background thread.
pub(crate) struct Worker {
	handle: Option<JoinHandle<()>>,
	queue: DirtyRegionQueue,
}

impl Worker {
	/// Spawns the worker thread for `queue`.
	pub(crate) fn spawn(queue: DirtyRegionQueue, dispatcher: Arc<StrategyDispatcher>) -> Self {
		queue.clear_canceled();
		let loop_queue = queue.clone();
		let handle = thread::Builder::new()
			.name("quill-reconciler".into())
			.spawn(move || run(loop_queue, dispatcher));
		let handle = match handle {
			Ok(handle) => Some(handle),
			Err(error) => {
				tracing::error!(%error, "Failed to spawn reconciler worker thread");
				None
			}
		};
		Self {
			handle,
			queue,
		}
	}

	/// Signals cancellation and joins the thread. The cancel signal wakes a
	/// mid-window wait, so this does not depend on the debounce delay.
	pub(crate) fn cancel_and_join(&mut self) {
		self.queue.cancel();
		if let Some(handle) = self.handle.take()
			&& handle.join().is_err()
		{
			tracing::error!("Reconciler worker thread panicked");
		}
	}
}

fn run(queue: DirtyRegionQueue, dispatcher: Arc<StrategyDispatcher>) {
	dispatcher.initial_reconcile();
	loop {
		match queue.await_work() {
			Wake::Canceled => break,
			Wake::NotDirty => {}
			Wake::Deferred => {
				tracing::trace!("Debounce window re-armed; deferring");
			}
			Wake::Dispatch(region) => {
				dispatcher.reset_progress();
				dispatcher.process(region.as_ref());
				queue.finish_cycle(|| dispatcher.progress_canceled());
				queue.clear_active();
			}
		}
	}
	tracing::debug!("Reconciler worker terminated");
}

//! Dirty-region FIFO shared between the edit-producing side and the worker.
//!
//! One lock covers both the queue entries and the worker's scheduling flags
//! so appends happen-before the worker observes them, and a purge on input
//! swap happens-before any later dequeue. The condition variable carries the
//! wake signal; `active` is a lock-free best-effort flag the producer reads
//! to decide whether an in-flight dispatch should be asked to cancel.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use crate::region::DirtyRegion;

/// Thread-safe strict-FIFO queue of [`DirtyRegion`]s.
///
/// Clones are handles to the same queue. Entries are never merged or
/// reordered, and a removed entry is never re-enqueued. Owned by exactly one
/// controller instance.
#[derive(Clone)]
pub struct DirtyRegionQueue {
	shared: Arc<Shared>,
}

struct Shared {
	inner: Mutex<Inner>,
	wake: Condvar,
	active: AtomicBool,
}

struct Inner {
	entries: VecDeque<DirtyRegion>,
	canceled: bool,
	reset_pending: bool,
	dirty: bool,
	delay: Duration,
}

/// Outcome of one debounce cycle, in evaluation order.
pub(crate) enum Wake {
	/// Cancellation requested; the worker must terminate.
	Canceled,
	/// No pending work; absorbs spurious wakes from purge or delay changes.
	NotDirty,
	/// An edit landed inside the window; wait out another full window.
	Deferred,
	/// Process now. `None` is the whole-document signal.
	Dispatch(Option<DirtyRegion>),
}

impl DirtyRegionQueue {
	pub fn new(delay: Duration) -> Self {
		Self {
			shared: Arc::new(Shared {
				inner: Mutex::new(Inner {
					entries: VecDeque::new(),
					canceled: false,
					reset_pending: false,
					dirty: false,
					delay,
				}),
				wake: Condvar::new(),
				active: AtomicBool::new(false),
			}),
		}
	}

	/// Appends to the tail and wakes one waiting consumer.
	pub fn append(&self, region: DirtyRegion) {
		let mut inner = self.shared.inner.lock();
		inner.entries.push_back(region);
		self.shared.wake.notify_one();
	}

	/// Pops the head without blocking; `None` when the queue is empty.
	pub fn remove_next(&self) -> Option<DirtyRegion> {
		self.shared.inner.lock().entries.pop_front()
	}

	/// Atomically discards all pending entries. Used when the bound document
	/// is swapped.
	pub fn purge(&self) {
		self.shared.inner.lock().entries.clear();
	}

	pub fn len(&self) -> usize {
		self.shared.inner.lock().entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Marks pending work and, when a debounce window is configured, re-arms
	/// it so the worker defers until a full quiet window elapses. With a
	/// zero delay the worker is woken without the defer step.
	pub(crate) fn note_edit(&self) {
		let mut inner = self.shared.inner.lock();
		inner.dirty = true;
		if !inner.delay.is_zero() {
			inner.reset_pending = true;
		}
		self.shared.wake.notify_one();
	}

	/// Updates the debounce window; effective from the next worker wake.
	pub(crate) fn set_delay(&self, delay: Duration) {
		self.shared.inner.lock().delay = delay;
		self.shared.wake.notify_all();
	}

	/// Requests worker termination and forces an immediate wake, so shutdown
	/// latency is bounded by wake delivery rather than the debounce window.
	pub(crate) fn cancel(&self) {
		self.shared.inner.lock().canceled = true;
		self.shared.wake.notify_all();
	}

	/// Re-arms a previously canceled queue for a fresh worker.
	pub(crate) fn clear_canceled(&self) {
		let mut inner = self.shared.inner.lock();
		inner.canceled = false;
		inner.reset_pending = false;
	}

	/// One debounce cycle: waits out the window (or a wake), then classifies
	/// the worker's next step.
	pub(crate) fn await_work(&self) -> Wake {
		let mut inner = self.shared.inner.lock();
		if inner.canceled {
			return Wake::Canceled;
		}
		let delay = inner.delay;
		if delay.is_zero() {
			// No debounce window: wait only while idle, so a wake that lands
			// mid-dispatch cannot strand queued work behind a lost notify.
			if !inner.dirty {
				self.shared.wake.wait(&mut inner);
			}
		} else {
			let _ = self.shared.wake.wait_for(&mut inner, delay);
		}
		if inner.canceled {
			Wake::Canceled
		} else if !inner.dirty {
			Wake::NotDirty
		} else if inner.reset_pending {
			inner.reset_pending = false;
			Wake::Deferred
		} else {
			// Raised before the lock drops so there is no instant where the
			// entry is gone but the dispatch does not yet read as in flight.
			self.shared.active.store(true, Ordering::Release);
			Wake::Dispatch(inner.entries.pop_front())
		}
	}

	/// Ends a dispatch cycle. The dirty flag stays raised while entries
	/// remain (the backlog drains one region per subsequent wake) or when
	/// `pass_canceled` reports the pass was truncated mid-flight, so the
	/// interrupted change is redone instead of dropped.
	///
	/// `pass_canceled` is evaluated under the queue lock: a producer cancels
	/// the monitor before it marks the edit, so either the cancel is visible
	/// here or the edit's own dirty mark lands after this write.
	pub(crate) fn finish_cycle(&self, pass_canceled: impl FnOnce() -> bool) {
		let mut inner = self.shared.inner.lock();
		inner.dirty = !inner.entries.is_empty() || pass_canceled();
	}

	/// Drops all pending work and scheduling state. Called on uninstall so a
	/// later install starts from a clean queue.
	pub(crate) fn reset(&self) {
		let mut inner = self.shared.inner.lock();
		inner.entries.clear();
		inner.dirty = false;
		inner.reset_pending = false;
	}

	/// Marks the dispatch raised by [`Self::await_work`] as finished.
	pub(crate) fn clear_active(&self) {
		self.shared.active.store(false, Ordering::Release);
	}

	/// Whether a dispatch is currently in flight. Best-effort; read without
	/// the lock.
	pub(crate) fn is_active(&self) -> bool {
		self.shared.active.load(Ordering::Acquire)
	}
}

#[cfg(test)]
mod tests;

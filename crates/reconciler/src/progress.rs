use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cancellation flag shared between the controller and extension-capable
/// strategies.
///
/// The controller cancels it when a new edit lands while a dispatch is in
/// flight; a cooperative strategy polls [`Self::is_canceled`] and returns
/// early. The worker re-arms the flag before each dispatch. The core never
/// forcibly aborts a running strategy.
#[derive(Debug, Clone, Default)]
pub struct ProgressMonitor {
	canceled: Arc<AtomicBool>,
}

impl ProgressMonitor {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn cancel(&self) {
		self.canceled.store(true, Ordering::Release);
	}

	pub fn is_canceled(&self) -> bool {
		self.canceled.load(Ordering::Acquire)
	}

	/// Re-arms the flag for the next dispatch cycle.
	pub(crate) fn reset(&self) {
		self.canceled.store(false, Ordering::Release);
	}
}

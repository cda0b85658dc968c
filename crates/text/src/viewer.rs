use std::sync::Arc;

use parking_lot::Mutex;

use crate::document::Document;
use crate::listener::{ListenerId, Registry};

/// Phases of a document input swap. Listeners see both, in order, for every
/// swap.
#[derive(Debug, Clone)]
pub enum InputChange {
	/// The viewer is about to replace `old` with `new`; `old` is still the
	/// current input.
	AboutToChange {
		old: Option<Document>,
		new: Option<Document>,
	},
	/// The swap is complete; `new` is the current input.
	Changed {
		old: Option<Document>,
		new: Option<Document>,
	},
}

/// Callback invoked for each phase of an input swap, on the swapping thread.
pub type InputListener = Box<dyn FnMut(&InputChange) + Send>;

/// Shared handle to a viewer's document input.
///
/// Stands in for the widget that would own the document in a full UI; the
/// reconciler only needs the current input and the two-phase swap
/// notification.
#[derive(Clone, Default)]
pub struct Viewer {
	shared: Arc<Shared>,
}

#[derive(Default)]
struct Shared {
	input: Mutex<Option<Document>>,
	listeners: Mutex<Registry<InputListener>>,
}

impl Viewer {
	pub fn new() -> Self {
		Self::default()
	}

	/// Current input document, if any.
	pub fn input(&self) -> Option<Document> {
		self.shared.input.lock().clone()
	}

	/// Swaps the input document, notifying listeners about-to-change before
	/// the swap and changed after it.
	pub fn set_input(&self, new: Option<Document>) {
		let old = self.shared.input.lock().clone();
		self.notify(&InputChange::AboutToChange {
			old: old.clone(),
			new: new.clone(),
		});
		*self.shared.input.lock() = new.clone();
		self.notify(&InputChange::Changed { old, new });
	}

	pub fn add_input_listener(&self, listener: InputListener) -> ListenerId {
		self.shared.listeners.lock().add(listener)
	}

	pub fn remove_input_listener(&self, id: ListenerId) {
		self.shared.listeners.lock().remove(id);
	}

	fn notify(&self, change: &InputChange) {
		for listener in self.shared.listeners.lock().iter_mut() {
			listener(change);
		}
	}
}

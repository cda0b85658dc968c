/// Identifier handed out when a listener is registered, used to detach it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Ordered listener registry keyed by [`ListenerId`].
///
/// Dispatch order is registration order. Not a public type; documents and
/// viewers each wrap one behind their own lock.
pub(crate) struct Registry<F> {
	next_id: u64,
	entries: Vec<(ListenerId, F)>,
}

impl<F> Default for Registry<F> {
	fn default() -> Self {
		Self {
			next_id: 0,
			entries: Vec::new(),
		}
	}
}

impl<F> Registry<F> {
	pub(crate) fn add(&mut self, listener: F) -> ListenerId {
		self.next_id += 1;
		let id = ListenerId(self.next_id);
		self.entries.push((id, listener));
		id
	}

	pub(crate) fn remove(&mut self, id: ListenerId) {
		self.entries.retain(|(entry, _)| *entry != id);
	}

	pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut F> {
		self.entries.iter_mut().map(|(_, listener)| listener)
	}
}

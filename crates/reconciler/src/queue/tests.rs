use std::time::Duration;

use pretty_assertions::assert_eq;

use super::*;

fn queue() -> DirtyRegionQueue {
	DirtyRegionQueue::new(Duration::from_millis(50))
}

#[test]
fn strict_fifo_order() {
	let queue = queue();
	let regions = vec![
		DirtyRegion::insert(0, "a"),
		DirtyRegion::remove(1, 2),
		DirtyRegion::insert(3, "bc"),
	];
	for region in &regions {
		queue.append(region.clone());
	}
	assert_eq!(queue.len(), 3);
	for region in &regions {
		assert_eq!(queue.remove_next().as_ref(), Some(region));
	}
	assert_eq!(queue.remove_next(), None);
	assert!(queue.is_empty());
}

#[test]
fn purge_discards_everything() {
	let queue = queue();
	queue.append(DirtyRegion::insert(0, "a"));
	queue.append(DirtyRegion::insert(1, "b"));
	queue.purge();
	assert!(queue.is_empty());
	assert_eq!(queue.remove_next(), None);
	// Still usable afterwards.
	queue.append(DirtyRegion::insert(0, "c"));
	assert_eq!(queue.len(), 1);
}

#[test]
fn clones_are_the_same_queue() {
	let queue = queue();
	let alias = queue.clone();
	queue.append(DirtyRegion::insert(0, "a"));
	assert_eq!(alias.len(), 1);
	assert_eq!(alias.remove_next(), Some(DirtyRegion::insert(0, "a")));
	assert!(queue.is_empty());
}

#[test]
fn await_work_classifies_cancellation_first() {
	let queue = queue();
	queue.append(DirtyRegion::insert(0, "a"));
	queue.note_edit();
	queue.cancel();
	assert!(matches!(queue.await_work(), Wake::Canceled));
}

#[test]
fn await_work_defers_once_then_dispatches() {
	let queue = DirtyRegionQueue::new(Duration::from_millis(1));
	queue.append(DirtyRegion::insert(0, "a"));
	queue.note_edit();
	assert!(matches!(queue.await_work(), Wake::Deferred));
	match queue.await_work() {
		Wake::Dispatch(region) => assert_eq!(region, Some(DirtyRegion::insert(0, "a"))),
		_ => panic!("expected a dispatch after the deferred window"),
	}
}

#[test]
fn dispatch_without_entries_is_the_whole_document_signal() {
	let queue = DirtyRegionQueue::new(Duration::from_millis(1));
	queue.note_edit();
	assert!(matches!(queue.await_work(), Wake::Deferred));
	assert!(matches!(queue.await_work(), Wake::Dispatch(None)));
}

#[test]
fn not_dirty_after_a_clean_finish() {
	let queue = DirtyRegionQueue::new(Duration::from_millis(1));
	queue.note_edit();
	let _ = queue.await_work();
	let _ = queue.await_work();
	queue.finish_cycle(|| false);
	assert!(matches!(queue.await_work(), Wake::NotDirty));
}

#[test]
fn finish_rearms_while_entries_remain() {
	let queue = DirtyRegionQueue::new(Duration::from_millis(1));
	queue.append(DirtyRegion::insert(0, "a"));
	queue.append(DirtyRegion::insert(1, "b"));
	queue.note_edit();
	assert!(matches!(queue.await_work(), Wake::Deferred));
	assert!(matches!(queue.await_work(), Wake::Dispatch(Some(_))));
	queue.finish_cycle(|| false);
	match queue.await_work() {
		Wake::Dispatch(region) => assert_eq!(region, Some(DirtyRegion::insert(1, "b"))),
		_ => panic!("expected the remaining entry to dispatch on the next wake"),
	}
	queue.finish_cycle(|| false);
	assert!(matches!(queue.await_work(), Wake::NotDirty));
}

#[test]
fn finish_rearms_after_a_canceled_pass() {
	let queue = DirtyRegionQueue::new(Duration::from_millis(1));
	queue.note_edit();
	assert!(matches!(queue.await_work(), Wake::Deferred));
	assert!(matches!(queue.await_work(), Wake::Dispatch(None)));
	queue.finish_cycle(|| true);
	assert!(matches!(queue.await_work(), Wake::Dispatch(None)));
}

#[test]
fn reset_discards_entries_and_dirtiness() {
	let queue = DirtyRegionQueue::new(Duration::from_millis(1));
	queue.append(DirtyRegion::insert(0, "a"));
	queue.note_edit();
	queue.reset();
	assert!(queue.is_empty());
	assert!(matches!(queue.await_work(), Wake::NotDirty));
}

use quill_text::{Document, Span};
use thiserror::Error;

use crate::progress::ProgressMonitor;
use crate::region::DirtyRegion;

/// Errors a strategy may report from a reconcile pass.
///
/// Reported to the log sink by the dispatcher; never fatal to the worker.
#[derive(Debug, Error)]
pub enum StrategyError {
	/// The strategy observed a canceled progress monitor and stopped early.
	#[error("reconcile pass canceled")]
	Canceled,

	/// Strategy-specific failure.
	#[error("{0}")]
	Failed(String),
}

/// A pluggable analysis callback driven by the reconciler.
///
/// All calls for one controller arrive serialized on that controller's
/// worker thread, except [`Self::set_document`], which runs on the thread
/// performing the input swap. Implementations must not assume any other
/// thread identity.
pub trait ReconcilingStrategy: Send {
	/// Rebinds the strategy to the document it will reconcile. Called on
	/// registration (when a document is already bound) and on every input
	/// swap.
	fn set_document(&mut self, document: &Document);

	/// Reconciles an incremental change. `dirty` is what changed; `span` is
	/// the subregion to re-analyze, equal to the dirty span in
	/// single-strategy mode.
	fn reconcile_region(&mut self, dirty: &DirtyRegion, span: Span) -> Result<(), StrategyError>;

	/// Reconciles `span` with no incremental information available; treat it
	/// as the least span worth re-analyzing.
	fn reconcile(&mut self, span: Span) -> Result<(), StrategyError>;

	/// Optional extension capability. Checked when the strategy is
	/// registered, never during dispatch; the default has no extension.
	fn as_ext(&mut self) -> Option<&mut dyn ReconcilingStrategyExt> {
		None
	}
}

/// Optional strategy capabilities: progress reporting and one-time setup.
pub trait ReconcilingStrategyExt: ReconcilingStrategy {
	/// Hands the strategy the monitor to poll for cancellation. Called
	/// before any reconcile call, and again whenever the controller's
	/// monitor is replaced.
	fn set_progress_monitor(&mut self, monitor: ProgressMonitor);

	/// One-time setup pass, run on the worker thread once per install,
	/// before any edit-driven reconcile call.
	fn initial_reconcile(&mut self);
}

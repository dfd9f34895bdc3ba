use log::trace;

/// Handle for a scheduled render pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameRequest(u64);

/// Single-slot queue of render passes waiting for the next display refresh.
///
/// Scheduling replaces whatever is pending, so any number of triggers
/// between two ticks collapse into one pass. The host calls
/// [`FrameScheduler::take_due`] once per refresh.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    next_id: u64,
    pending: Option<FrameRequest>,
    superseded: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the pending request, if any, and queue a new one.
    pub fn schedule(&mut self) -> FrameRequest {
        if let Some(stale) = self.pending.take() {
            trace!("frame request {} superseded", stale.0);
            self.superseded += 1;
        }

        self.next_id += 1;
        let request = FrameRequest(self.next_id);
        self.pending = Some(request);
        request
    }

    pub fn cancel(&mut self) -> Option<FrameRequest> {
        let cancelled = self.pending.take();
        if let Some(request) = cancelled {
            trace!("frame request {} cancelled", request.0);
        }
        cancelled
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Hand the pending request to the caller; yields it at most once.
    pub fn take_due(&mut self) -> Option<FrameRequest> {
        self.pending.take()
    }

    /// Requests dropped because a newer one replaced them.
    pub fn superseded(&self) -> u64 {
        self.superseded
    }
}

//! Auto-dismiss timer state machine
//!
//! Each timed toast owns one [`TimerRecord`]: the remaining time, the
//! current phase, at most one outstanding deadline in the shared
//! [`TimerQueue`], and the progress-bar transition kept in lockstep with
//! it. Hover pauses the countdown without losing the remaining time;
//! leaving resumes it for exactly what was left.
//!
//! Deadlines are fired by the host pumping [`Notifier::update`] with the
//! current monotonic time, so the whole lifecycle is deterministic under
//! test.
//!
//! [`Notifier::update`]: crate::Notifier::update

use melba_dom::NodeId;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Key for an outstanding deadline in the [`TimerQueue`].
    pub struct TimerId;
}

/// What to do when a deadline comes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deadline {
    /// Duration elapsed: dismiss the toast.
    AutoDismiss(NodeId),
    /// Exit animation never reported completion: force removal.
    ExitFallback(NodeId),
}

/// Pending deadlines, fired in due order from `update`.
#[derive(Debug, Default)]
pub struct TimerQueue {
    entries: SlotMap<TimerId, (u64, Deadline)>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `deadline` to fire once `now >= at_ms`.
    pub fn schedule(&mut self, at_ms: u64, deadline: Deadline) -> TimerId {
        self.entries.insert((at_ms, deadline))
    }

    /// Cancels a pending deadline. Stale ids are ignored.
    pub fn cancel(&mut self, id: TimerId) {
        self.entries.remove(id);
    }

    /// Removes and returns every due deadline, ordered by due time.
    pub fn due(&mut self, now_ms: u64) -> Vec<Deadline> {
        let mut ready: Vec<(u64, TimerId)> = self
            .entries
            .iter()
            .filter(|(_, &(at, _))| at <= now_ms)
            .map(|(id, &(at, _))| (at, id))
            .collect();
        ready.sort_unstable_by_key(|&(at, _)| at);
        ready
            .into_iter()
            .filter_map(|(_, id)| self.entries.remove(id).map(|(_, d)| d))
            .collect()
    }

    /// Number of pending deadlines.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lifecycle of a toast's countdown. A toast with duration 0 never gets a
/// record at all (the machine's idle state).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    /// Counting down toward dismissal.
    Running,
    /// Hover-suspended; remaining time is frozen.
    Paused,
    /// Deadline elapsed and dismissal was triggered.
    Fired,
    /// Torn down before firing (manual close, clear, eviction).
    Cancelled,
}

/// Progress-bar transition synchronized with the countdown: a linear sweep
/// from some starting fraction down to zero over a segment duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressState {
    from: f32,
    segment_ms: u64,
    started_at_ms: u64,
    frozen: Option<f32>,
}

impl ProgressState {
    /// Starts a full sweep (1.0 → 0.0) over `duration_ms`.
    pub fn new(now_ms: u64, duration_ms: u64) -> Self {
        Self {
            from: 1.0,
            segment_ms: duration_ms,
            started_at_ms: now_ms,
            frozen: None,
        }
    }

    /// Remaining fraction of the bar at `now_ms`, in `0.0..=1.0`.
    pub fn fraction(&self, now_ms: u64) -> f32 {
        if let Some(frozen) = self.frozen {
            return frozen;
        }
        if self.segment_ms == 0 {
            return 0.0;
        }
        let elapsed = now_ms.saturating_sub(self.started_at_ms) as f32;
        let t = (elapsed / self.segment_ms as f32).clamp(0.0, 1.0);
        self.from * (1.0 - t)
    }

    /// Freezes the bar at its current computed width.
    pub fn freeze(&mut self, now_ms: u64) {
        self.frozen = Some(self.fraction(now_ms));
    }

    /// Resumes the sweep from the frozen width down to zero over
    /// `remaining_ms`.
    pub fn resume(&mut self, now_ms: u64, remaining_ms: u64) {
        self.from = self.frozen.take().unwrap_or(self.from);
        self.started_at_ms = now_ms;
        self.segment_ms = remaining_ms;
    }
}

/// Countdown bookkeeping for one toast. Kept in the notifier's side table,
/// never on the element itself.
#[derive(Debug)]
pub struct TimerRecord {
    pub remaining_ms: u64,
    pub started_at_ms: u64,
    pub phase: TimerPhase,
    /// The single outstanding deadline, when running.
    pub deadline: Option<TimerId>,
    pub progress: Option<ProgressState>,
}

impl TimerRecord {
    /// A running countdown for `duration_ms`, with `deadline` scheduled by
    /// the caller. `progress` is present when the toast has a bar.
    pub fn running(now_ms: u64, duration_ms: u64, deadline: TimerId, with_progress: bool) -> Self {
        Self {
            remaining_ms: duration_ms,
            started_at_ms: now_ms,
            phase: TimerPhase::Running,
            deadline: Some(deadline),
            progress: with_progress.then(|| ProgressState::new(now_ms, duration_ms)),
        }
    }

    /// Suspends the countdown. Returns the deadline to cancel, or `None`
    /// if the record was not running (the call is then a no-op).
    pub fn pause(&mut self, now_ms: u64) -> Option<TimerId> {
        if self.phase != TimerPhase::Running {
            return None;
        }
        let handle = self.deadline.take()?;
        let elapsed = now_ms.saturating_sub(self.started_at_ms);
        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed);
        self.phase = TimerPhase::Paused;
        if let Some(progress) = &mut self.progress {
            progress.freeze(now_ms);
        }
        Some(handle)
    }

    /// Restarts the countdown for the frozen remaining time. Returns true
    /// when a new deadline should be scheduled; a no-op unless paused with
    /// time left.
    pub fn resume(&mut self, now_ms: u64) -> bool {
        if self.phase != TimerPhase::Paused || self.remaining_ms == 0 {
            return false;
        }
        self.phase = TimerPhase::Running;
        self.started_at_ms = now_ms;
        if let Some(progress) = &mut self.progress {
            progress.resume(now_ms, self.remaining_ms);
        }
        true
    }

    /// Tears the countdown down before it fires. Returns the deadline to
    /// cancel, if one was outstanding.
    pub fn cancel(&mut self) -> Option<TimerId> {
        if matches!(self.phase, TimerPhase::Running | TimerPhase::Paused) {
            self.phase = TimerPhase::Cancelled;
        }
        self.deadline.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use melba_dom::Document;

    fn node() -> NodeId {
        Document::new().create_element("div")
    }

    #[test]
    fn queue_fires_in_due_order() {
        let mut queue = TimerQueue::new();
        let n = node();
        queue.schedule(300, Deadline::ExitFallback(n));
        queue.schedule(100, Deadline::AutoDismiss(n));

        assert!(queue.due(50).is_empty());
        assert_eq!(queue.due(300), vec![Deadline::AutoDismiss(n), Deadline::ExitFallback(n)]);
        assert!(queue.is_empty());
    }

    #[test]
    fn cancelled_deadline_never_fires() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule(100, Deadline::AutoDismiss(node()));
        queue.cancel(id);
        assert!(queue.due(1000).is_empty());
    }

    #[test]
    fn pause_clamps_remaining_and_clears_deadline() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule(1000, Deadline::AutoDismiss(node()));
        let mut record = TimerRecord::running(0, 1000, id, false);

        let cancelled = record.pause(300).expect("running record pauses");
        queue.cancel(cancelled);
        assert_eq!(record.phase, TimerPhase::Paused);
        assert_eq!(record.remaining_ms, 700);
        assert!(record.deadline.is_none());

        // Second pause is a no-op.
        assert!(record.pause(400).is_none());
        assert_eq!(record.remaining_ms, 700);
    }

    #[test]
    fn pause_past_deadline_floors_at_zero() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule(1000, Deadline::AutoDismiss(node()));
        let mut record = TimerRecord::running(0, 1000, id, false);

        record.pause(5000);
        assert_eq!(record.remaining_ms, 0);
        // Nothing left to resume.
        assert!(!record.resume(6000));
    }

    #[test]
    fn resume_restarts_for_exactly_the_remainder() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule(1000, Deadline::AutoDismiss(node()));
        let mut record = TimerRecord::running(0, 1000, id, false);

        record.pause(250);
        assert!(record.resume(9000));
        assert_eq!(record.phase, TimerPhase::Running);
        assert_eq!(record.remaining_ms, 750);
        assert_eq!(record.started_at_ms, 9000);

        // Resume while running is a no-op.
        assert!(!record.resume(9100));
    }

    #[test]
    fn cancel_is_terminal() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule(1000, Deadline::AutoDismiss(node()));
        let mut record = TimerRecord::running(0, 1000, id, false);

        assert_eq!(record.cancel(), Some(id));
        assert_eq!(record.phase, TimerPhase::Cancelled);
        assert!(record.cancel().is_none());
        assert!(record.pause(100).is_none());
        assert!(!record.resume(100));
    }

    #[test]
    fn progress_sweeps_linearly_to_zero() {
        let progress = ProgressState::new(1000, 2000);
        assert_eq!(progress.fraction(1000), 1.0);
        assert!((progress.fraction(2000) - 0.5).abs() < 1e-6);
        assert_eq!(progress.fraction(3000), 0.0);
        assert_eq!(progress.fraction(9999), 0.0);
    }

    #[test]
    fn progress_freeze_and_resume_stay_in_lockstep() {
        let mut progress = ProgressState::new(0, 1000);
        progress.freeze(400);
        // Frozen width holds regardless of time passing.
        assert!((progress.fraction(99_000) - 0.6).abs() < 1e-6);

        progress.resume(100_000, 600);
        assert!((progress.fraction(100_000) - 0.6).abs() < 1e-6);
        assert!((progress.fraction(100_300) - 0.3).abs() < 1e-6);
        assert_eq!(progress.fraction(100_600), 0.0);
    }

    #[test]
    fn timed_record_tracks_progress_only_when_bar_exists() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule(500, Deadline::AutoDismiss(node()));
        let with = TimerRecord::running(0, 500, id, true);
        assert!(with.progress.is_some());

        let id = queue.schedule(500, Deadline::AutoDismiss(node()));
        let without = TimerRecord::running(0, 500, id, false);
        assert!(without.progress.is_none());
    }
}

//! Toast lifecycle management
//!
//! [`Notifier`] is the public entry point: it owns the document, the
//! per-position container registry, the toast side table, and the deadline
//! queue behind one shared handle. Hosts pump it with
//! [`update`](Notifier::update) every frame and route input through
//! [`click`](Notifier::click), [`pointer_entered`](Notifier::pointer_entered),
//! [`pointer_left`](Notifier::pointer_left), and
//! [`animation_finished`](Notifier::animation_finished).
//!
//! All per-toast bookkeeping (timers, close listeners, the removing flag)
//! lives in the side table keyed by node id, never on the elements
//! themselves.

use std::future::Future;
use std::sync::{Arc, Mutex};

use melba_dom::{Document, NodeId};
use rustc_hash::FxHashMap;

use crate::message::PromiseMessages;
use crate::options::{CloseCallback, Position, ToastKind, ToastOptions};
use crate::registry::ContainerRegistry;
use crate::style;
use crate::style::ANIMATION_CLASSES;
use crate::timer::{Deadline, TimerId, TimerPhase, TimerQueue, TimerRecord};
use crate::view;

/// How long a dismissed toast may wait for its exit animation before it is
/// removed anyway. Covers hosts that never report animation completion.
pub const EXIT_FALLBACK_MS: u64 = 400;

/// Errors surfaced by the public dismissal path.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The node was not created by this notifier, or is already gone.
    #[error("node is not a toast managed by this notifier")]
    ForeignNode,
}

/// Per-toast bookkeeping held in the notifier's side table.
struct ToastRecord {
    container: NodeId,
    /// Invoked exactly once, in order, when the toast is finally removed.
    close_listeners: Vec<CloseCallback>,
    pause_on_hover: bool,
    /// Idempotency guard: once set, further dismissals are no-ops.
    removing: bool,
    exit_fallback: Option<TimerId>,
    timer: Option<TimerRecord>,
}

struct NotifierInner {
    doc: Document,
    registry: ContainerRegistry,
    toasts: FxHashMap<NodeId, ToastRecord>,
    timers: TimerQueue,
    /// Single-slot reference to the current loading toast.
    loading: Option<NodeId>,
    reduced_motion: bool,
    now_ms: u64,
    /// Close listeners of finalized toasts, invoked after the lock drops.
    pending_close: Vec<CloseCallback>,
}

impl NotifierInner {
    fn new() -> Self {
        Self {
            doc: Document::new(),
            registry: ContainerRegistry::new(),
            toasts: FxHashMap::default(),
            timers: TimerQueue::new(),
            loading: None,
            reduced_motion: false,
            now_ms: 0,
            pending_close: Vec::new(),
        }
    }

    fn show_options(&mut self, options: ToastOptions) -> NodeId {
        let opts = options.normalize();
        let container = self.registry.get(&mut self.doc, opts.position);
        self.evict_for(container, opts.max_toasts);

        let toast = view::build_toast(&mut self.doc, &opts);
        self.doc.append_child(container, toast);

        let mut record = ToastRecord {
            container,
            close_listeners: opts.on_close.iter().cloned().collect(),
            pause_on_hover: opts.pause_on_hover,
            removing: false,
            exit_fallback: None,
            timer: None,
        };
        if opts.duration_ms > 0 {
            let deadline = self
                .timers
                .schedule(self.now_ms + opts.duration_ms, Deadline::AutoDismiss(toast));
            record.timer = Some(TimerRecord::running(
                self.now_ms,
                opts.duration_ms,
                deadline,
                opts.show_progress,
            ));
        }
        self.toasts.insert(toast, record);
        tracing::debug!(kind = %opts.kind, position = %opts.position, duration_ms = opts.duration_ms, "showing toast");
        toast
    }

    fn sugar(&mut self, kind: ToastKind, message: String, options: Option<ToastOptions>) -> NodeId {
        let mut opts = options.unwrap_or_default();
        opts.message = message;
        opts.kind = Some(kind);
        self.show_options(opts)
    }

    /// Makes room for one more toast: while the container already holds
    /// `max` live toasts, the earliest-inserted one is dismissed.
    fn evict_for(&mut self, container: NodeId, max: usize) {
        let live: Vec<NodeId> = self
            .doc
            .children(container)
            .iter()
            .copied()
            .filter(|id| self.toasts.get(id).map(|r| !r.removing).unwrap_or(false))
            .collect();
        if live.len() >= max {
            for &oldest in live.iter().take(live.len() + 1 - max) {
                tracing::debug!(?oldest, "evicting oldest toast");
                self.dismiss_node(oldest);
            }
        }
    }

    fn loading(&mut self, message: String, options: Option<ToastOptions>) -> NodeId {
        // At most one loading toast: replace, never stack.
        if let Some(previous) = self.loading.take() {
            self.dismiss_node(previous);
        }

        let mut opts = options.unwrap_or_default();
        opts.message = message;
        opts.kind = Some(ToastKind::Info);
        opts.duration_ms = Some(0);
        opts.dismissible = Some(false);
        opts.show_progress = Some(false);
        opts.position = Some(Position::Center);
        let normalized = opts.normalize();

        let container = self.registry.get(&mut self.doc, Position::Center);
        let loader = view::build_loader(&mut self.doc, &normalized);
        self.doc.append_child(container, loader);
        self.toasts.insert(
            loader,
            ToastRecord {
                container,
                close_listeners: normalized.on_close.into_iter().collect(),
                pause_on_hover: false,
                removing: false,
                exit_fallback: None,
                timer: None,
            },
        );
        self.loading = Some(loader);
        tracing::debug!("showing loading toast");
        loader
    }

    fn dismiss_loading(&mut self) {
        if let Some(node) = self.loading.take() {
            self.dismiss_node(node);
        }
    }

    fn clear(&mut self) {
        tracing::debug!("clearing all toasts");
        for container in self.doc.find_by_class(style::CONTAINER) {
            for toast in self.doc.descendants_with_class(container, style::TOAST) {
                self.dismiss_node(toast);
            }
        }
        self.loading = None;
    }

    /// Starts removal of a toast. Idempotent: a toast already mid-removal
    /// is left alone, so a timer firing on the same tick as a manual close
    /// cleans up exactly once.
    fn dismiss_node(&mut self, node: NodeId) {
        let cancelled = {
            let Some(record) = self.toasts.get_mut(&node) else {
                return;
            };
            if record.removing {
                return;
            }
            record.removing = true;
            record.timer.as_mut().and_then(TimerRecord::cancel)
        };
        if let Some(id) = cancelled {
            self.timers.cancel(id);
        }
        tracing::debug!(?node, "dismissing toast");

        if self.reduced_motion {
            self.finalize(node);
        } else {
            self.doc.remove_class(node, ANIMATION_CLASSES.enter);
            self.doc.add_class(node, ANIMATION_CLASSES.exit);
            let fallback = self
                .timers
                .schedule(self.now_ms + EXIT_FALLBACK_MS, Deadline::ExitFallback(node));
            if let Some(record) = self.toasts.get_mut(&node) {
                record.exit_fallback = Some(fallback);
            }
        }
    }

    /// Second half of removal: detach the node, clean the container, queue
    /// the close listeners. Guarded by record removal, so the exit
    /// animation and the fallback deadline can both call it and only the
    /// first has any effect.
    fn finalize(&mut self, node: NodeId) {
        let Some(record) = self.toasts.remove(&node) else {
            return;
        };
        if let Some(id) = record.exit_fallback {
            self.timers.cancel(id);
        }
        self.doc.remove(node);
        self.registry.cleanup(&mut self.doc, record.container);
        if self.loading == Some(node) {
            self.loading = None;
        }
        tracing::debug!(?node, "toast removed");
        self.pending_close.extend(record.close_listeners);
    }

    fn tick(&mut self, now_ms: u64) {
        // Time never runs backwards; a lagging host input is clamped.
        self.now_ms = self.now_ms.max(now_ms);
        for deadline in self.timers.due(self.now_ms) {
            match deadline {
                Deadline::AutoDismiss(node) => {
                    let fire = match self.toasts.get_mut(&node) {
                        Some(record) if !record.removing => {
                            if let Some(timer) = record.timer.as_mut() {
                                timer.deadline = None;
                                timer.phase = TimerPhase::Fired;
                            }
                            true
                        }
                        _ => false,
                    };
                    if fire {
                        tracing::trace!(?node, "auto-dismiss fired");
                        self.dismiss_node(node);
                    }
                }
                Deadline::ExitFallback(node) => self.finalize(node),
            }
        }
    }

    fn pointer_entered(&mut self, node: NodeId) {
        let Some(root) = self.toast_root(node) else {
            return;
        };
        let now = self.now_ms;
        let paused = {
            let Some(record) = self.toasts.get_mut(&root) else {
                return;
            };
            if record.removing || !record.pause_on_hover {
                return;
            }
            record.timer.as_mut().and_then(|t| t.pause(now))
        };
        if let Some(id) = paused {
            self.timers.cancel(id);
            tracing::trace!(?root, "countdown paused");
        }
    }

    fn pointer_left(&mut self, node: NodeId) {
        let Some(root) = self.toast_root(node) else {
            return;
        };
        let now = self.now_ms;
        let remaining = {
            let Some(record) = self.toasts.get_mut(&root) else {
                return;
            };
            if record.removing {
                return;
            }
            match record.timer.as_mut() {
                Some(timer) => {
                    if timer.resume(now) {
                        Some(timer.remaining_ms)
                    } else {
                        None
                    }
                }
                None => None,
            }
        };
        if let Some(remaining_ms) = remaining {
            let id = self.timers.schedule(now + remaining_ms, Deadline::AutoDismiss(root));
            if let Some(timer) = self.toasts.get_mut(&root).and_then(|r| r.timer.as_mut()) {
                timer.deadline = Some(id);
            }
            tracing::trace!(?root, remaining_ms, "countdown resumed");
        }
    }

    /// Handles a click landing on `target`. Activating a close control
    /// dismisses its toast and reports the click handled, so the host
    /// stops further propagation.
    fn click(&mut self, target: NodeId) -> bool {
        let mut on_close_control = false;
        let mut current = Some(target);
        let mut root = None;
        while let Some(id) = current {
            if self.doc.has_class(id, style::CLOSE) {
                on_close_control = true;
            }
            if self.toasts.contains_key(&id) {
                root = Some(id);
                break;
            }
            current = self.doc.parent(id);
        }
        match (on_close_control, root) {
            (true, Some(toast)) => {
                self.dismiss_node(toast);
                true
            }
            _ => false,
        }
    }

    fn animation_finished(&mut self, node: NodeId) {
        // Enter-animation completions land here too; only an exit matters.
        let removing = self.toasts.get(&node).map(|r| r.removing).unwrap_or(false);
        if removing {
            self.finalize(node);
        }
    }

    /// Resolves any node inside a toast to the toast's root.
    fn toast_root(&self, node: NodeId) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(id) = current {
            if self.toasts.contains_key(&id) {
                return Some(id);
            }
            current = self.doc.parent(id);
        }
        None
    }

    fn take_pending_close(&mut self) -> Vec<CloseCallback> {
        std::mem::take(&mut self.pending_close)
    }
}

/// Cloneable handle to one toast system. All state lives behind the
/// handle; there are no process-wide globals, so independent notifiers
/// (one per window, or one per test) never interfere.
///
/// # Example
///
/// ```
/// use melba::{Notifier, ToastOptions};
///
/// let notifier = Notifier::new();
/// notifier.success("saved", None);
/// notifier.show(ToastOptions::new("plain toast").duration_ms(0));
/// assert_eq!(notifier.toast_count(melba::Position::TopRight), 2);
/// ```
#[derive(Clone)]
pub struct Notifier {
    inner: Arc<Mutex<NotifierInner>>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(NotifierInner::new())),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, NotifierInner> {
        self.inner.lock().unwrap()
    }

    /// Invokes close listeners collected during the last mutation, outside
    /// the lock so they are free to call back into this notifier.
    fn drain_close_listeners(&self) {
        loop {
            let pending = self.lock().take_pending_close();
            if pending.is_empty() {
                break;
            }
            for listener in pending {
                listener();
            }
        }
    }

    /// Displays a toast built from `options`. Returns the toast's node so
    /// hosts can target it later (hover routing, [`Notifier::dismiss`]).
    pub fn show(&self, options: ToastOptions) -> NodeId {
        let node = self.lock().show_options(options);
        self.drain_close_listeners();
        node
    }

    /// Success toast. Fields in `options` other than message and kind are
    /// honored; message and kind are forced.
    pub fn success(&self, message: impl Into<String>, options: Option<ToastOptions>) -> NodeId {
        let node = self.lock().sugar(ToastKind::Success, message.into(), options);
        self.drain_close_listeners();
        node
    }

    /// Error toast; announced assertively.
    pub fn error(&self, message: impl Into<String>, options: Option<ToastOptions>) -> NodeId {
        let node = self.lock().sugar(ToastKind::Error, message.into(), options);
        self.drain_close_listeners();
        node
    }

    /// Warning toast.
    pub fn warning(&self, message: impl Into<String>, options: Option<ToastOptions>) -> NodeId {
        let node = self.lock().sugar(ToastKind::Warning, message.into(), options);
        self.drain_close_listeners();
        node
    }

    /// Info toast.
    pub fn info(&self, message: impl Into<String>, options: Option<ToastOptions>) -> NodeId {
        let node = self.lock().sugar(ToastKind::Info, message.into(), options);
        self.drain_close_listeners();
        node
    }

    /// Shows the persistent centered loading toast, replacing any previous
    /// one. Always non-dismissible, without progress, at
    /// [`Position::Center`].
    pub fn loading(&self, message: impl Into<String>, options: Option<ToastOptions>) -> NodeId {
        let node = self.lock().loading(message.into(), options);
        self.drain_close_listeners();
        node
    }

    /// Dismisses the tracked loading toast, if one is showing.
    pub fn dismiss_loading(&self) {
        self.lock().dismiss_loading();
        self.drain_close_listeners();
    }

    /// Wraps an async task with toast feedback: a loading toast while it
    /// runs, then a success or error toast once it settles. The task's
    /// result is returned unchanged, so failures still propagate to the
    /// caller after being displayed.
    ///
    /// The loading toast is always dismissed before the terminal toast
    /// appears, on both outcomes.
    pub async fn promise<T, E, F>(
        &self,
        task: F,
        messages: PromiseMessages<T, E>,
        options: Option<ToastOptions>,
    ) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        self.loading(messages.loading, options.clone());

        let result = task.await;
        match &result {
            Ok(value) => {
                self.dismiss_loading();
                self.success(messages.success.resolve(value), options);
            }
            Err(error) => {
                self.dismiss_loading();
                self.error(messages.error.resolve(error), options);
            }
        }
        result
    }

    /// Dismisses every toast in every container and forgets the loading
    /// toast.
    pub fn clear(&self) {
        self.lock().clear();
        self.drain_close_listeners();
    }

    /// Dismisses one toast by identity. Fails if the node is not a live
    /// toast created by this notifier; dismissing a toast already on its
    /// way out is a valid no-op.
    pub fn dismiss(&self, node: NodeId) -> Result<(), Error> {
        {
            let mut inner = self.lock();
            if !inner.toasts.contains_key(&node) {
                return Err(Error::ForeignNode);
            }
            inner.dismiss_node(node);
        }
        self.drain_close_listeners();
        Ok(())
    }

    /// Advances the notifier's clock and fires every due deadline:
    /// auto-dismissals and exit-animation fallbacks. Hosts call this every
    /// frame with monotonic milliseconds.
    pub fn update(&self, now_ms: u64) {
        self.lock().tick(now_ms);
        self.drain_close_listeners();
    }

    /// Pointer entered a toast (or any node inside one): pauses its
    /// countdown when pause-on-hover is enabled.
    pub fn pointer_entered(&self, node: NodeId) {
        self.lock().pointer_entered(node);
    }

    /// Pointer left a toast: resumes a paused countdown for the remaining
    /// time.
    pub fn pointer_left(&self, node: NodeId) {
        self.lock().pointer_left(node);
    }

    /// Routes a click. Returns true when the click activated a close
    /// control and was consumed.
    pub fn click(&self, target: NodeId) -> bool {
        let handled = self.lock().click(target);
        self.drain_close_listeners();
        handled
    }

    /// Host report that a toast's CSS animation finished. Completes a
    /// pending removal ahead of the fallback deadline.
    pub fn animation_finished(&self, node: NodeId) {
        self.lock().animation_finished(node);
        self.drain_close_listeners();
    }

    /// When set, dismissal skips the exit animation and removes toasts
    /// immediately (the reduced-motion media preference).
    pub fn set_reduced_motion(&self, reduced: bool) {
        self.lock().reduced_motion = reduced;
    }

    /// Read access to the retained tree, for rendering and inspection.
    pub fn with_document<R>(&self, f: impl FnOnce(&Document) -> R) -> R {
        f(&self.lock().doc)
    }

    /// Number of live (not mid-removal) toasts in a position's container.
    pub fn toast_count(&self, position: Position) -> usize {
        let inner = self.lock();
        let Some(container) =
            inner
                .doc
                .find_with_attr(style::CONTAINER, "data-position", position.as_str())
        else {
            return 0;
        };
        inner
            .doc
            .children(container)
            .iter()
            .filter(|id| inner.toasts.get(*id).map(|r| !r.removing).unwrap_or(false))
            .count()
    }

    /// Remaining progress-bar fraction for a toast, if it has one.
    pub fn progress_fraction(&self, node: NodeId) -> Option<f32> {
        let inner = self.lock();
        let now = inner.now_ms;
        inner
            .toasts
            .get(&node)
            .and_then(|r| r.timer.as_ref())
            .and_then(|t| t.progress.as_ref())
            .map(|p| p.fraction(now))
    }

    /// Countdown phase of a toast's timer, if it ever had one.
    pub fn timer_phase(&self, node: NodeId) -> Option<TimerPhase> {
        self.lock().toasts.get(&node).and_then(|r| r.timer.as_ref()).map(|t| t.phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet(notifier: &Notifier) {
        notifier.set_reduced_motion(true);
    }

    #[test]
    fn show_places_toast_in_its_container() {
        let notifier = Notifier::new();
        let toast = notifier.show(ToastOptions::new("hi").position(Position::BottomLeft));
        assert_eq!(notifier.toast_count(Position::BottomLeft), 1);
        notifier.with_document(|doc| {
            let container = doc.parent(toast).unwrap();
            assert!(doc.has_class(container, style::CONTAINER));
            assert_eq!(doc.attr(container, "data-position"), Some("bottom-left"));
        });
    }

    #[test]
    fn sugar_forces_kind_over_caller_options() {
        let notifier = Notifier::new();
        let toast = notifier.success("ok", Some(ToastOptions::new("ignored").kind(ToastKind::Error)));
        notifier.with_document(|doc| {
            assert!(doc.has_class(toast, "melba-success"));
            let msg = doc.descendants_with_class(toast, style::MESSAGE)[0];
            assert_eq!(doc.text(msg), Some("ok"));
        });
    }

    #[test]
    fn second_loading_call_replaces_the_first() {
        let notifier = Notifier::new();
        quiet(&notifier);
        let first = notifier.loading("one", None);
        let second = notifier.loading("two", None);
        assert_ne!(first, second);
        assert_eq!(notifier.toast_count(Position::Center), 1);
        notifier.with_document(|doc| assert!(!doc.contains(first)));
    }

    #[test]
    fn dismiss_loading_clears_slot_and_container() {
        let notifier = Notifier::new();
        quiet(&notifier);
        notifier.loading("working", None);
        notifier.dismiss_loading();
        assert_eq!(notifier.toast_count(Position::Center), 0);
        // Second call with nothing tracked is a no-op.
        notifier.dismiss_loading();
    }

    #[test]
    fn click_on_close_control_is_consumed() {
        let notifier = Notifier::new();
        quiet(&notifier);
        let toast = notifier.show(ToastOptions::new("closable"));
        let close = notifier.with_document(|doc| view::close_button(doc, toast).unwrap());

        assert!(notifier.click(close));
        notifier.with_document(|doc| assert!(!doc.contains(toast)));
    }

    #[test]
    fn click_elsewhere_is_not_consumed() {
        let notifier = Notifier::new();
        let toast = notifier.show(ToastOptions::new("msg"));
        let msg = notifier.with_document(|doc| doc.descendants_with_class(toast, style::MESSAGE)[0]);

        assert!(!notifier.click(msg));
        assert!(!notifier.click(toast));
        assert_eq!(notifier.toast_count(Position::TopRight), 1);
    }

    #[test]
    fn dismissing_a_foreign_node_fails() {
        let notifier = Notifier::new();
        let toast = notifier.show(ToastOptions::new("x"));
        let container = notifier.with_document(|doc| doc.parent(toast).unwrap());

        assert_eq!(notifier.dismiss(container), Err(Error::ForeignNode));
        assert!(notifier.dismiss(toast).is_ok());
    }

    #[test]
    fn exit_class_swaps_on_dismissal() {
        let notifier = Notifier::new();
        let toast = notifier.show(ToastOptions::new("x"));
        notifier.dismiss(toast).unwrap();
        notifier.with_document(|doc| {
            assert!(!doc.has_class(toast, ANIMATION_CLASSES.enter));
            assert!(doc.has_class(toast, ANIMATION_CLASSES.exit));
            assert!(doc.is_attached(toast)); // waiting for exit animation
        });

        notifier.animation_finished(toast);
        notifier.with_document(|doc| assert!(!doc.contains(toast)));
    }

    #[test]
    fn timer_phase_reflects_lifecycle() {
        let notifier = Notifier::new();
        let timed = notifier.show(ToastOptions::new("x").duration_ms(1000));
        assert_eq!(notifier.timer_phase(timed), Some(TimerPhase::Running));

        notifier.pointer_entered(timed);
        assert_eq!(notifier.timer_phase(timed), Some(TimerPhase::Paused));

        notifier.dismiss(timed).unwrap();
        assert_eq!(notifier.timer_phase(timed), Some(TimerPhase::Cancelled));

        let persistent = notifier.show(ToastOptions::new("y").duration_ms(0));
        assert_eq!(notifier.timer_phase(persistent), None);
    }
}

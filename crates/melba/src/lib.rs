//! Melba – a toast notification library for retained-tree UIs.
//!
//! Toasts are short-lived status messages stacked in per-position
//! containers. Melba owns their whole lifecycle: element construction with
//! ARIA wiring, auto-dismiss countdowns with pause-on-hover, progress
//! fractions, eviction when a container is full, a single loading slot,
//! and async task feedback via [`Notifier::promise`].
//!
//! The library never touches wall-clock time or platform timers. Hosts
//! drive it by calling [`Notifier::update`] with monotonic milliseconds
//! and routing input events to the notifier; in exchange every behavior
//! is deterministic and testable.
//!
//! ```
//! use melba::{Notifier, Position, ToastOptions};
//!
//! let toasts = Notifier::new();
//! toasts.update(0);
//!
//! let id = toasts.show(
//!     ToastOptions::new("profile saved")
//!         .position(Position::BottomRight)
//!         .duration_ms(2_000),
//! );
//!
//! toasts.update(1_999);
//! assert_eq!(toasts.toast_count(Position::BottomRight), 1);
//!
//! toasts.update(2_000);
//! toasts.animation_finished(id);
//! assert_eq!(toasts.toast_count(Position::BottomRight), 0);
//! ```

pub mod message;
pub mod notifier;
pub mod options;
pub mod registry;
pub mod style;
pub mod timer;
pub mod view;

pub use message::{MessageText, PromiseMessages};
pub use notifier::{Error, Notifier, EXIT_FALLBACK_MS};
pub use options::{
    CloseCallback, Defaults, NormalizedOptions, Position, ToastKind, ToastOptions, DEFAULTS,
};
pub use style::{AnimationClasses, ANIMATION_CLASSES};
pub use timer::TimerPhase;

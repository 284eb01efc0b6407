//! Class-name contract between the library and the host stylesheet
//!
//! The library only toggles these names; the stylesheet owns the actual
//! appearance and the enter/exit animations they trigger.

/// Root class carried by every toast (and the loading toast).
pub const TOAST: &str = "melba";
/// Per-position tray holding a stack of toasts.
pub const CONTAINER: &str = "melba-container";
/// Wrapper around icon, message, and close control.
pub const CONTENT: &str = "melba-content";
/// Message span.
pub const MESSAGE: &str = "melba-msg";
/// Kind icon glyph.
pub const ICON: &str = "melba-icon";
/// Close control.
pub const CLOSE: &str = "melba-close";
/// Remaining-time progress bar.
pub const PROGRESS_BAR: &str = "melba-progress-bar";
/// Loading toast wrapper.
pub const LOADER: &str = "melba-loader";
/// Loading spinner.
pub const SPINNER: &str = "melba-spinner";

/// Kind accent class (`melba-success`, `melba-error`, ...).
pub fn kind_class(kind: crate::ToastKind) -> String {
    format!("melba-{kind}")
}

/// Animation class names the stylesheet is expected to define.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationClasses {
    /// Applied on insertion; drives the entrance animation.
    pub enter: &'static str,
    /// Swapped in on dismissal; drives the exit animation.
    pub exit: &'static str,
    /// Alternative slide-style entrance, for stylesheets that prefer it.
    pub slide_enter: &'static str,
    /// Alternative slide-style exit.
    pub slide_exit: &'static str,
}

/// The animation class-name record.
pub const ANIMATION_CLASSES: AnimationClasses = AnimationClasses {
    enter: "melba-enter",
    exit: "melba-exit",
    slide_enter: "melba-slide-enter",
    slide_exit: "melba-slide-exit",
};

//! Toast configuration and normalization
//!
//! Callers build a partial [`ToastOptions`]; [`ToastOptions::normalize`]
//! merges it over [`DEFAULTS`] into a [`NormalizedOptions`] where every
//! field has a value. Normalization is pure: the same input always yields
//! the same merged result, and caller-supplied fields always win.

use std::fmt;
use std::sync::Arc;

/// Callback invoked when a toast is closed.
pub type CloseCallback = Arc<dyn Fn() + Send + Sync>;

/// Visual category of a toast. Determines the accent class, the default
/// icon glyph, and the assertiveness of the announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
    #[default]
    Default,
}

impl ToastKind {
    /// Class-name suffix (`melba-success`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Warning => "warning",
            ToastKind::Info => "info",
            ToastKind::Default => "default",
        }
    }

    /// ARIA live politeness: errors interrupt, everything else waits.
    pub fn aria_live(&self) -> &'static str {
        match self {
            ToastKind::Error => "assertive",
            _ => "polite",
        }
    }

    /// Default icon glyph for the kind.
    pub fn icon(&self) -> &'static str {
        match self {
            ToastKind::Success => "✓",
            ToastKind::Error => "✕",
            ToastKind::Warning => "⚠",
            ToastKind::Info => "ℹ",
            ToastKind::Default => "●",
        }
    }
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Screen position a toast container is anchored to.
///
/// `Center` is reserved for loading toasts; regular toasts stack in one of
/// the six edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Position {
    #[default]
    TopRight,
    TopLeft,
    TopCenter,
    BottomRight,
    BottomLeft,
    BottomCenter,
    Center,
}

impl Position {
    /// Stable identifier used for the container's `data-position` tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::TopRight => "top-right",
            Position::TopLeft => "top-left",
            Position::TopCenter => "top-center",
            Position::BottomRight => "bottom-right",
            Position::BottomLeft => "bottom-left",
            Position::BottomCenter => "bottom-center",
            Position::Center => "center",
        }
    }

    /// Human wording for the container's accessible label.
    pub fn label(&self) -> &'static str {
        match self {
            Position::TopRight => "top right",
            Position::TopLeft => "top left",
            Position::TopCenter => "top center",
            Position::BottomRight => "bottom right",
            Position::BottomLeft => "bottom left",
            Position::BottomCenter => "bottom center",
            Position::Center => "center",
        }
    }

    /// All positions, in display-priority order.
    pub const ALL: [Position; 7] = [
        Position::TopRight,
        Position::TopLeft,
        Position::TopCenter,
        Position::BottomRight,
        Position::BottomLeft,
        Position::BottomCenter,
        Position::Center,
    ];
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default values applied to unset [`ToastOptions`] fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Defaults {
    pub kind: ToastKind,
    pub duration_ms: u64,
    pub position: Position,
    pub dismissible: bool,
    pub show_progress: bool,
    pub show_icon: bool,
    pub pause_on_hover: bool,
    pub max_toasts: usize,
}

/// The documented defaults record.
pub const DEFAULTS: Defaults = Defaults {
    kind: ToastKind::Default,
    duration_ms: 3000,
    position: Position::TopRight,
    dismissible: true,
    show_progress: true,
    show_icon: true,
    pause_on_hover: true,
    max_toasts: 5,
};

/// Partial, caller-supplied toast configuration.
///
/// Only the message is required; every other field falls back to
/// [`DEFAULTS`] during normalization.
///
/// # Example
///
/// ```
/// use melba::{Position, ToastOptions};
///
/// let opts = ToastOptions::new("saved")
///     .duration_ms(5000)
///     .position(Position::BottomLeft)
///     .dismissible(false);
/// let normalized = opts.normalize();
/// assert_eq!(normalized.duration_ms, 5000);
/// assert!(normalized.show_progress); // defaulted
/// ```
#[derive(Clone, Default)]
pub struct ToastOptions {
    pub(crate) message: String,
    pub(crate) kind: Option<ToastKind>,
    pub(crate) duration_ms: Option<u64>,
    pub(crate) position: Option<Position>,
    pub(crate) dismissible: Option<bool>,
    pub(crate) show_progress: Option<bool>,
    pub(crate) show_icon: Option<bool>,
    pub(crate) icon: Option<String>,
    pub(crate) pause_on_hover: Option<bool>,
    pub(crate) on_close: Option<CloseCallback>,
    pub(crate) max_toasts: Option<usize>,
}

impl fmt::Debug for ToastOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastOptions")
            .field("message", &self.message)
            .field("kind", &self.kind)
            .field("duration_ms", &self.duration_ms)
            .field("position", &self.position)
            .field("dismissible", &self.dismissible)
            .field("show_progress", &self.show_progress)
            .field("show_icon", &self.show_icon)
            .field("icon", &self.icon)
            .field("pause_on_hover", &self.pause_on_hover)
            .field("on_close", &self.on_close.as_ref().map(|_| "…"))
            .field("max_toasts", &self.max_toasts)
            .finish()
    }
}

impl ToastOptions {
    /// Starts options for a toast carrying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Visual kind (success, error, ...).
    pub fn kind(mut self, kind: ToastKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Auto-dismiss duration in milliseconds. `0` keeps the toast until it
    /// is dismissed manually.
    pub fn duration_ms(mut self, ms: u64) -> Self {
        self.duration_ms = Some(ms);
        self
    }

    /// Screen position of the stack this toast joins.
    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Whether the toast gets a close control.
    pub fn dismissible(mut self, dismissible: bool) -> Self {
        self.dismissible = Some(dismissible);
        self
    }

    /// Whether a progress bar tracks the remaining time.
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = Some(show);
        self
    }

    /// Whether a kind icon is shown in front of the message.
    pub fn show_icon(mut self, show: bool) -> Self {
        self.show_icon = Some(show);
        self
    }

    /// Custom icon glyph, overriding the kind mapping.
    pub fn icon(mut self, glyph: impl Into<String>) -> Self {
        self.icon = Some(glyph.into());
        self
    }

    /// Whether hovering pauses the auto-dismiss countdown.
    pub fn pause_on_hover(mut self, pause: bool) -> Self {
        self.pause_on_hover = Some(pause);
        self
    }

    /// Callback fired once when the toast is closed, by any path.
    pub fn on_close(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_close = Some(Arc::new(callback));
        self
    }

    /// Per-container ceiling; the oldest toast is evicted beyond it.
    pub fn max_toasts(mut self, max: usize) -> Self {
        self.max_toasts = Some(max.max(1));
        self
    }

    /// Merges the options over [`DEFAULTS`]. Pure: caller-set fields win,
    /// unset fields take the documented default.
    pub fn normalize(self) -> NormalizedOptions {
        NormalizedOptions {
            message: self.message,
            kind: self.kind.unwrap_or(DEFAULTS.kind),
            duration_ms: self.duration_ms.unwrap_or(DEFAULTS.duration_ms),
            position: self.position.unwrap_or(DEFAULTS.position),
            dismissible: self.dismissible.unwrap_or(DEFAULTS.dismissible),
            show_progress: self.show_progress.unwrap_or(DEFAULTS.show_progress),
            show_icon: self.show_icon.unwrap_or(DEFAULTS.show_icon),
            icon: self.icon,
            pause_on_hover: self.pause_on_hover.unwrap_or(DEFAULTS.pause_on_hover),
            on_close: self.on_close,
            max_toasts: self.max_toasts.unwrap_or(DEFAULTS.max_toasts),
        }
    }
}

/// [`ToastOptions`] with every field resolved.
#[derive(Clone)]
pub struct NormalizedOptions {
    pub message: String,
    pub kind: ToastKind,
    pub duration_ms: u64,
    pub position: Position,
    pub dismissible: bool,
    pub show_progress: bool,
    pub show_icon: bool,
    /// Custom glyph; `None` falls back to [`ToastKind::icon`].
    pub icon: Option<String>,
    pub pause_on_hover: bool,
    pub on_close: Option<CloseCallback>,
    pub max_toasts: usize,
}

impl NormalizedOptions {
    /// The glyph actually rendered when icons are enabled.
    pub fn icon_glyph(&self) -> &str {
        self.icon.as_deref().unwrap_or_else(|| self.kind.icon())
    }
}

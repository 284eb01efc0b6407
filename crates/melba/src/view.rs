//! Toast element construction
//!
//! Builds the visual structure of a toast from normalized options. The
//! builder only shapes the tree; timers, progress animation, and event
//! wiring stay with the [`Notifier`](crate::Notifier).

use melba_dom::{Document, NodeId};

use crate::options::NormalizedOptions;
use crate::style;
use crate::style::ANIMATION_CLASSES;

/// Builds a regular toast: accent-classed root with `role=alert`, the
/// message, and the optional icon, close control, and progress bar.
pub fn build_toast(doc: &mut Document, options: &NormalizedOptions) -> NodeId {
    let toast = doc.create_element("div");
    doc.add_class(toast, style::TOAST);
    doc.add_class(toast, &style::kind_class(options.kind));
    doc.add_class(toast, ANIMATION_CLASSES.enter);
    doc.set_attr(toast, "role", "alert");
    doc.set_attr(toast, "aria-live", options.kind.aria_live());
    doc.set_attr(toast, "aria-atomic", "true");

    let content = doc.create_element("div");
    doc.add_class(content, style::CONTENT);

    if options.show_icon {
        let icon = doc.create_element("div");
        doc.add_class(icon, style::ICON);
        doc.set_text(icon, options.icon_glyph());
        doc.set_attr(icon, "aria-hidden", "true");
        doc.append_child(content, icon);
    }

    let message = doc.create_element("span");
    doc.add_class(message, style::MESSAGE);
    doc.set_text(message, options.message.as_str());
    doc.append_child(content, message);

    if options.dismissible {
        let close = doc.create_element("button");
        doc.add_class(close, style::CLOSE);
        doc.set_attr(close, "aria-label", "Close notification");
        doc.set_attr(close, "type", "button");
        doc.append_child(content, close);
    }

    doc.append_child(toast, content);

    if options.show_progress && options.duration_ms > 0 {
        let bar = doc.create_element("div");
        doc.add_class(bar, style::PROGRESS_BAR);
        doc.append_child(toast, bar);
    }

    toast
}

/// Builds the loading toast: `role=status`, busy marker, spinner, message.
/// Always non-dismissible and without a progress bar.
pub fn build_loader(doc: &mut Document, options: &NormalizedOptions) -> NodeId {
    let toast = doc.create_element("div");
    doc.add_class(toast, style::TOAST);
    doc.add_class(toast, &style::kind_class(options.kind));
    doc.add_class(toast, ANIMATION_CLASSES.enter);
    doc.set_attr(toast, "role", "status");
    doc.set_attr(toast, "aria-live", "polite");
    doc.set_attr(toast, "aria-busy", "true");

    let wrapper = doc.create_element("div");
    doc.add_class(wrapper, style::LOADER);

    let spinner = doc.create_element("div");
    doc.add_class(spinner, style::SPINNER);
    doc.set_attr(spinner, "aria-label", "Loading");
    doc.append_child(wrapper, spinner);

    if !options.message.is_empty() {
        let message = doc.create_element("span");
        doc.add_class(message, style::MESSAGE);
        doc.set_text(message, options.message.as_str());
        doc.append_child(wrapper, message);
    }

    doc.append_child(toast, wrapper);
    toast
}

/// Finds the progress bar child of a toast, if one was built.
pub fn progress_bar(doc: &Document, toast: NodeId) -> Option<NodeId> {
    doc.descendants_with_class(toast, style::PROGRESS_BAR).into_iter().next()
}

/// Finds the close control of a toast, if one was built.
pub fn close_button(doc: &Document, toast: NodeId) -> Option<NodeId> {
    doc.descendants_with_class(toast, style::CLOSE).into_iter().next()
}

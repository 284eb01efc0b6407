//! Container registry
//!
//! Maps each [`Position`] to the singleton tray element holding that
//! position's toast stack. Trays are created lazily on the first toast for
//! a position, cached, and removed from the page the moment their last
//! toast is gone.

use indexmap::IndexMap;
use melba_dom::{Document, NodeId};

use crate::options::Position;
use crate::style;

/// Per-position cache of tray elements.
///
/// A cached id can go stale (the tray was removed behind the cache's
/// back), so every lookup re-validates attachment and falls back to a page
/// scan before creating a fresh tray. At most one tray per position is
/// ever attached at a time.
#[derive(Debug, Default)]
pub struct ContainerRegistry {
    containers: IndexMap<Position, NodeId>,
}

impl ContainerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the tray for `position`, creating it if none is attached.
    pub fn get(&mut self, doc: &mut Document, position: Position) -> NodeId {
        if let Some(&cached) = self.containers.get(&position) {
            if doc.is_attached(cached) {
                return cached;
            }
            self.containers.shift_remove(&position);
        }

        // A tray may persist on the page outside this cache's knowledge.
        if let Some(existing) = doc.find_with_attr(style::CONTAINER, "data-position", position.as_str()) {
            self.containers.insert(position, existing);
            return existing;
        }

        let container = doc.create_element("div");
        doc.add_class(container, style::CONTAINER);
        doc.set_attr(container, "data-position", position.as_str());
        doc.set_attr(container, "aria-label", format!("Notifications ({})", position.label()));
        let body = doc.body();
        doc.append_child(body, container);
        self.containers.insert(position, container);
        tracing::debug!(%position, "created toast container");
        container
    }

    /// Removes `container` from the page if it has no children left, and
    /// drops any cache entry pointing at it.
    pub fn cleanup(&mut self, doc: &mut Document, container: NodeId) {
        if !doc.contains(container) || doc.child_count(container) > 0 {
            return;
        }
        doc.remove(container);
        self.containers.retain(|_, &mut id| id != container);
        tracing::debug!("removed empty toast container");
    }

    /// Currently cached trays, in creation order.
    pub fn containers(&self) -> impl Iterator<Item = (Position, NodeId)> + '_ {
        self.containers.iter().map(|(&p, &n)| (p, n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_position_returns_same_container() {
        let mut doc = Document::new();
        let mut registry = ContainerRegistry::new();

        let a = registry.get(&mut doc, Position::TopRight);
        let b = registry.get(&mut doc, Position::TopRight);
        assert_eq!(a, b);
        assert_eq!(doc.find_by_class(style::CONTAINER).len(), 1);
    }

    #[test]
    fn distinct_positions_get_distinct_containers() {
        let mut doc = Document::new();
        let mut registry = ContainerRegistry::new();

        let right = registry.get(&mut doc, Position::TopRight);
        let left = registry.get(&mut doc, Position::BottomLeft);
        assert_ne!(right, left);
        assert_eq!(doc.attr(left, "data-position"), Some("bottom-left"));
        assert_eq!(doc.attr(left, "aria-label"), Some("Notifications (bottom left)"));
    }

    #[test]
    fn stale_cache_entry_is_replaced() {
        let mut doc = Document::new();
        let mut registry = ContainerRegistry::new();

        let first = registry.get(&mut doc, Position::TopRight);
        doc.remove(first);
        let second = registry.get(&mut doc, Position::TopRight);
        assert_ne!(first, second);
        assert!(doc.is_attached(second));
    }

    #[test]
    fn adopts_container_created_outside_the_cache() {
        let mut doc = Document::new();
        let foreign = doc.create_element("div");
        doc.add_class(foreign, style::CONTAINER);
        doc.set_attr(foreign, "data-position", "top-center");
        let body = doc.body();
        doc.append_child(body, foreign);

        let mut registry = ContainerRegistry::new();
        assert_eq!(registry.get(&mut doc, Position::TopCenter), foreign);
    }

    #[test]
    fn cleanup_removes_only_empty_containers() {
        let mut doc = Document::new();
        let mut registry = ContainerRegistry::new();

        let container = registry.get(&mut doc, Position::TopRight);
        let toast = doc.create_element("div");
        doc.append_child(container, toast);

        registry.cleanup(&mut doc, container);
        assert!(doc.is_attached(container));

        doc.remove(toast);
        registry.cleanup(&mut doc, container);
        assert!(!doc.contains(container));

        // Next lookup builds a fresh tray rather than resurrecting the id.
        let fresh = registry.get(&mut doc, Position::TopRight);
        assert_ne!(fresh, container);
    }
}

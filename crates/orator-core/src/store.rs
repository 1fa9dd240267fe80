//! SlideStore: single source of truth for a deck during an editing session.
//!
//! All reads and writes of slides and their content trees go through this
//! container. Mutations are synchronous state transitions; an optional
//! observer is notified after each one, which is how persistence (see
//! [`crate::autosave`]) and a rendering layer hook in. The store is passed
//! by handle to whoever needs it — there is no global singleton.
//!
//! Lookup failures (unknown slide or node id) are silent no-ops: a drag or
//! edit event can race a deletion or an in-flight AI reload, and the store
//! cannot tell a stale event from a legitimate one. The only fail-fast path
//! is `reorder_slide`, whose indices come straight from the same render pass
//! that produced the drag event and are a caller bug when out of range.

use std::sync::Arc;

use crate::{rewrite_node, ContentNode, NodeValue, Slide, Theme};

/// Called with the full slide set after every mutation.
pub type Observer = Box<dyn FnMut(&[Slide]) + Send>;

#[derive(Default)]
pub struct SlideStore {
    slides: Vec<Slide>,
    current_slide: usize,
    theme: Theme,
    observer: Option<Observer>,
}

impl SlideStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the mutation observer, replacing any previous one.
    pub fn subscribe(&mut self, observer: Observer) {
        self.observer = Some(observer);
    }

    /// Replace the whole deck (after loading from disk or AI generation).
    ///
    /// Precondition: the incoming slides already carry valid, duplicate-free
    /// `order` values. No renumbering happens here.
    pub fn load_slides(&mut self, slides: Vec<Slide>) {
        log::debug!("loading {} slides", slides.len());
        self.slides = slides;
        self.current_slide = 0;
        self.publish();
    }

    /// Raw slide set, in storage order (not display order).
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Slides in display order: stable sort on `order`, original encounter
    /// order as tie-break. Pure projection, never mutates.
    pub fn ordered_slides(&self) -> Vec<Slide> {
        let mut ordered = self.slides.clone();
        ordered.sort_by_key(|s| s.order);
        ordered
    }

    pub fn current_slide(&self) -> usize {
        self.current_slide
    }

    pub fn set_current_slide(&mut self, index: usize) {
        self.current_slide = index;
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Insert a slide at `index` in display order (clamped to `[0, len]`).
    ///
    /// The slide gets a fresh id — the same layout template can be dropped
    /// twice — and becomes the current slide. Afterwards
    /// `ordered_slides()[index]` is the inserted slide and all `order`
    /// values are `0..n`.
    pub fn insert_slide_at(&mut self, mut slide: Slide, index: usize) {
        slide.id = crate::new_id();
        self.sort_by_order();
        let at = index.min(self.slides.len());
        self.slides.insert(at, slide);
        self.renumber();
        self.current_slide = at;
        self.publish();
    }

    /// Delete a slide by id and renumber. Unknown ids are a no-op, so a
    /// second delete of the same slide is harmless.
    pub fn remove_slide(&mut self, id: &str) {
        self.sort_by_order();
        self.slides.retain(|s| s.id != id);
        self.renumber();
        if self.current_slide >= self.slides.len() {
            self.current_slide = self.slides.len().saturating_sub(1);
        }
        self.publish();
    }

    /// Move the slide at display position `from` to position `to`.
    ///
    /// `to` addresses the list *after* the slide is taken out (array-splice
    /// convention): on `[A, B, C]`, `reorder_slide(0, 2)` yields `[B, C, A]`.
    ///
    /// Panics when either index is outside the current deck — these indices
    /// come from validated drag events and out-of-range values are a caller
    /// bug.
    pub fn reorder_slide(&mut self, from: usize, to: usize) {
        let len = self.slides.len();
        assert!(from < len, "reorder_slide: from index {from} out of range ({len} slides)");
        assert!(to < len, "reorder_slide: to index {to} out of range ({len} slides)");
        self.sort_by_order();
        let moved = self.slides.remove(from);
        self.slides.insert(to, moved);
        self.renumber();
        self.publish();
    }

    /// Replace the leaf value of the node `node_id` inside slide `slide_id`.
    ///
    /// The node keeps its id and position; nodes along the path from the
    /// root are rebuilt, sibling subtrees keep their `Arc` identity. Unknown
    /// slide or node ids leave everything untouched.
    pub fn update_leaf_value(&mut self, slide_id: &str, node_id: &str, value: NodeValue) {
        let Some(slide) = self.slides.iter_mut().find(|s| s.id == slide_id) else {
            log::debug!("update_leaf_value: slide {slide_id} not found");
            return;
        };
        let updated = rewrite_node(&slide.content, &|node: &ContentNode| {
            (node.id == node_id).then(|| ContentNode {
                value: value.clone(),
                ..node.clone()
            })
        });
        match updated {
            Some(root) => {
                slide.content = root;
                self.publish();
            }
            None => log::debug!("update_leaf_value: node {node_id} not found in {slide_id}"),
        }
    }

    /// Splice `node` into the child list of container `parent_id` at `index`
    /// (clamped to the child count — drop targets are computed optimistically
    /// by the UI). No-op when the slide or parent is missing, or when
    /// `parent_id` names a leaf node.
    pub fn insert_component(&mut self, slide_id: &str, node: ContentNode, parent_id: &str, index: usize) {
        let Some(slide) = self.slides.iter_mut().find(|s| s.id == slide_id) else {
            log::debug!("insert_component: slide {slide_id} not found");
            return;
        };
        let item = Arc::new(node);
        let updated = rewrite_node(&slide.content, &|candidate: &ContentNode| {
            if candidate.id != parent_id {
                return None;
            }
            let NodeValue::Nodes(children) = &candidate.value else {
                log::warn!("insert_component: {parent_id} is not a container");
                return None;
            };
            let mut children = children.clone();
            let at = index.min(children.len());
            children.insert(at, Arc::clone(&item));
            Some(ContentNode {
                value: NodeValue::Nodes(children),
                ..candidate.clone()
            })
        });
        match updated {
            Some(root) => {
                slide.content = root;
                self.publish();
            }
            None => log::debug!("insert_component: parent {parent_id} not found in {slide_id}"),
        }
    }

    /// Bring the backing vector into display order so positional edits line
    /// up with what the user sees.
    fn sort_by_order(&mut self) {
        self.slides.sort_by_key(|s| s.order);
    }

    /// Renumber `order` to the dense sequence `0..n` by current position.
    /// Only valid right after `sort_by_order`.
    fn renumber(&mut self) {
        for (i, slide) in self.slides.iter_mut().enumerate() {
            slide.order = i;
        }
    }

    fn publish(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer(&self.slides);
        }
    }
}

//! Pointer interaction for the history panel.
//!
//! The page is reached only through [`ScrollTargetResolver`] and
//! [`TimelineCallbacks`], so the controller runs without a DOM. Time is passed
//! in by the host event loop; the long-hover timer fires from [`tick`] and is
//! dropped whenever the pointer leaves or moves to another bar.
//!
//! [`tick`]: InteractionController::tick

use crate::config::InteractionConfig;
use crate::ir::RecordKind;
use crate::layout::Layout;
use std::collections::HashMap;
use std::time::{Duration, Instant};

pub const BAR_ELEMENT_PREFIX: &str = "history-bar-";

/// Element id of a bar in the history panel.
pub fn bar_element_id(id: &str) -> String {
    format!("{BAR_ELEMENT_PREFIX}{id}")
}

/// Element id of the content card for a record.
pub fn card_element_id(kind: RecordKind, id: &str) -> String {
    format!("{}-{id}", kind.as_str())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollTarget {
    Bar(String),
    Card(RecordKind, String),
}

impl ScrollTarget {
    pub fn element_id(&self) -> String {
        match self {
            Self::Bar(id) => bar_element_id(id),
            Self::Card(kind, id) => card_element_id(*kind, id),
        }
    }
}

/// Brings a page element into view; returns `false` when no element matches.
pub trait ScrollTargetResolver {
    fn scroll_into_view(&mut self, element_id: &str) -> bool;
}

/// Fire-and-forget notifications to the host page.
pub trait TimelineCallbacks {
    fn on_item_hover(&mut self, id: Option<&str>);
    fn on_long_hover(&mut self, id: &str);
    fn on_toggle(&mut self);
}

#[derive(Debug)]
struct PendingHover {
    id: String,
    due: Instant,
}

pub struct InteractionController<C, R> {
    callbacks: C,
    resolver: R,
    kinds: HashMap<String, RecordKind>,
    long_hover: Duration,
    pending: Option<PendingHover>,
    hovered: Option<String>,
    open: bool,
}

impl<C: TimelineCallbacks, R: ScrollTargetResolver> InteractionController<C, R> {
    pub fn new(layout: &Layout, config: &InteractionConfig, callbacks: C, resolver: R) -> Self {
        let kinds = layout
            .items
            .iter()
            .map(|item| (item.record.id.clone(), item.record.kind))
            .collect();
        Self {
            callbacks,
            resolver,
            kinds,
            long_hover: Duration::from_millis(config.long_hover_ms),
            pending: None,
            hovered: None,
            open: true,
        }
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn has_pending_long_hover(&self) -> bool {
        self.pending.is_some()
    }

    /// Pointer entered the bar of `id`. Unknown ids are ignored.
    pub fn pointer_enter(&mut self, id: &str, at: Instant) {
        if !self.kinds.contains_key(id) {
            tracing::debug!(id, "pointer entered unknown bar");
            return;
        }
        if self.hovered.as_deref() == Some(id) {
            return;
        }
        self.hovered = Some(id.to_string());
        self.pending = Some(PendingHover {
            id: id.to_string(),
            due: at + self.long_hover,
        });
        self.callbacks.on_item_hover(Some(id));
    }

    pub fn pointer_leave(&mut self) {
        self.pending = None;
        if self.hovered.take().is_some() {
            self.callbacks.on_item_hover(None);
        }
    }

    /// Advances the long-hover timer; returns `true` if it fired.
    pub fn tick(&mut self, now: Instant) -> bool {
        let due = matches!(&self.pending, Some(pending) if now >= pending.due);
        if !due {
            return false;
        }
        match self.pending.take() {
            Some(pending) => {
                self.callbacks.on_long_hover(&pending.id);
                true
            }
            None => false,
        }
    }

    /// Scrolls the record's content card into view.
    pub fn click(&mut self, id: &str) -> bool {
        let Some(kind) = self.kinds.get(id).copied() else {
            return false;
        };
        let target = ScrollTarget::Card(kind, id.to_string());
        self.scroll(&target)
    }

    /// Scrolls the record's bar into view, e.g. when its card is hovered.
    pub fn reveal_bar(&mut self, id: &str) -> bool {
        if !self.kinds.contains_key(id) {
            return false;
        }
        self.scroll(&ScrollTarget::Bar(id.to_string()))
    }

    /// Opens or closes the panel. Closing drops any hover state.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        if !self.open {
            self.pointer_leave();
        }
        self.callbacks.on_toggle();
        self.open
    }

    pub fn into_parts(self) -> (C, R) {
        (self.callbacks, self.resolver)
    }

    fn scroll(&mut self, target: &ScrollTarget) -> bool {
        let element_id = target.element_id();
        let found = self.resolver.scroll_into_view(&element_id);
        if !found {
            tracing::warn!(element = %element_id, "scroll target not found");
        }
        found
    }
}

//! # Change notification
//!
//! Layer stacks announce every observable mutation through a [`ChangeSignal`]. Downstream caches
//! (a composited snapshot, thumbnails, a layer list widget) key their invalidation off these
//! emissions, so the number of emissions is part of the contract: one logical operation, one
//! emission, no matter how many layers it touched.
//!
//! While a batch is held open, changes are collected instead of emitted. Closing the outermost
//! batch emits them as a single change, a [`Change::Batch`] if there were several.

use crate::canvas::{CanvasSize, ResizeMode};
use crate::state::layer::LayerID;

pub type SubscriptionID = crate::EditorID<Subscription>;

#[derive(Clone, Debug, PartialEq)]
pub enum Change {
    LayerAdded(LayerID),
    LayerRemoved(LayerID),
    LayerMoved {
        target: LayerID,
        from: usize,
        to: usize,
    },
    /// Name, opacity, blend mode, lock, or visibility changed.
    LayerProperties(LayerID),
    /// Strokes were added, removed, or cleared.
    LayerContent(LayerID),
    ActiveLayer(Option<LayerID>),
    /// Every layer was remapped for a canvas size change.
    Transformed {
        from: CanvasSize,
        to: CanvasSize,
        mode: ResizeMode,
    },
    /// Several changes made as one logical operation.
    Batch(Box<[Change]>),
}

/// A registered callback.
pub struct Subscription {
    id: SubscriptionID,
    callback: Box<dyn FnMut(&Change)>,
}

#[derive(Default)]
pub struct ChangeSignal {
    subscribers: Vec<Subscription>,
    /// Nesting depth of open batches.
    held: usize,
    // Optimize for one change per batch, the most common case.
    pending: smallvec::SmallVec<[Change; 1]>,
    emissions: u64,
}
impl ChangeSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Call `callback` on every emission until unsubscribed.
    pub fn subscribe(&mut self, callback: impl FnMut(&Change) + 'static) -> SubscriptionID {
        let id = SubscriptionID::default();
        self.subscribers.push(Subscription {
            id,
            callback: Box::new(callback),
        });
        id
    }
    /// Returns `false` if there was no such subscription.
    pub fn unsubscribe(&mut self, id: SubscriptionID) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|sub| sub.id != id);
        before != self.subscribers.len()
    }
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
    /// Total number of emissions since creation. Each batch counts once.
    #[must_use]
    pub fn emissions(&self) -> u64 {
        self.emissions
    }
    #[must_use]
    pub fn is_held(&self) -> bool {
        self.held != 0
    }
    /// Emit now, or defer until the outermost batch closes.
    /// Returns `true` if the change was emitted immediately.
    pub fn emit(&mut self, change: Change) -> bool {
        if self.is_held() {
            self.pending.push(change);
            false
        } else {
            self.dispatch(&change);
            true
        }
    }
    /// Open a batch. Must be paired with [`Self::release`].
    pub fn hold(&mut self) {
        self.held += 1;
    }
    /// Close a batch. Closing the outermost one emits everything collected as a single change.
    /// Returns `true` if an emission happened.
    pub fn release(&mut self) -> bool {
        let Some(held) = self.held.checked_sub(1) else {
            log::warn!("change signal released without a matching hold");
            return false;
        };
        self.held = held;
        if held != 0 || self.pending.is_empty() {
            return false;
        }
        let change = if self.pending.len() == 1 {
            // Just checked the length.
            self.pending.pop().unwrap_or(Change::Batch(Box::new([])))
        } else {
            Change::Batch(std::mem::take(&mut self.pending).into_vec().into_boxed_slice())
        };
        self.dispatch(&change);
        true
    }
    fn dispatch(&mut self, change: &Change) {
        self.emissions += 1;
        log::trace!("change #{}: {change:?}", self.emissions);
        for sub in &mut self.subscribers {
            (sub.callback)(change);
        }
    }
}
impl std::fmt::Debug for ChangeSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeSignal")
            .field("subscribers", &self.subscribers.len())
            .field("held", &self.held)
            .field("pending", &self.pending)
            .field("emissions", &self.emissions)
            .finish()
    }
}

//! Focus trap lifecycle: one trap per open modal, stacked for nested modals
//!
//! # States
//!
//! - `Inactive`: no modal open, Tab presses pass through untouched.
//! - `Active`: a modal is open; the controller owns its focusable set and
//!   intercepts Tab presses at the edges of that set.
//!
//! # Invariants
//!
//! - An inactive controller never cancels an event or moves focus.
//! - `deactivate()` discards the focusable set.
//! - Only the topmost trap of a [`TrapStack`] reacts to key events.

use super::element::ElementId;
use super::enumerate::{FocusableQuery, FocusableSet};
use super::trap::{self, FocusHost, FocusTarget, TrapEvent, UntrackedForward};

/// Per-modal trap state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrapState {
    pub container: ElementId,
    pub focusable: FocusableSet,
}

/// Focus trap for a single modal
#[derive(Debug, Clone, Default)]
pub struct FocusTrapController {
    state: Option<TrapState>,
    policy: UntrackedForward,
}

impl FocusTrapController {
    pub fn new(policy: UntrackedForward) -> Self {
        Self {
            state: None,
            policy,
        }
    }

    /// Inactive -> Active: enumerate the container's focusable elements
    ///
    /// Activating an already-active controller re-targets it.
    pub fn activate<Q>(&mut self, container: ElementId, query: &Q)
    where
        Q: FocusableQuery + ?Sized,
    {
        let focusable = query.query_focusable(container);
        tracing::debug!(
            container = %container,
            focusable = focusable.len(),
            "Focus trap activated"
        );
        self.state = Some(TrapState {
            container,
            focusable,
        });
    }

    /// Re-enumerate after the modal's content changed
    pub fn refresh<Q>(&mut self, query: &Q)
    where
        Q: FocusableQuery + ?Sized,
    {
        if let Some(state) = self.state.as_mut() {
            state.focusable = query.query_focusable(state.container);
            tracing::debug!(
                container = %state.container,
                focusable = state.focusable.len(),
                "Focus trap refreshed"
            );
        }
    }

    /// Active -> Inactive
    pub fn deactivate(&mut self) {
        if let Some(state) = self.state.take() {
            tracing::debug!(container = %state.container, "Focus trap deactivated");
        }
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&TrapState> {
        self.state.as_ref()
    }

    /// Current focusable set (empty while inactive)
    pub fn focusable(&self) -> &FocusableSet {
        static EMPTY: FocusableSet = FocusableSet::empty();
        self.state.as_ref().map(|s| &s.focusable).unwrap_or(&EMPTY)
    }

    /// Element to auto-focus when the modal opens
    pub fn initial_focus(&self) -> Option<ElementId> {
        self.state.as_ref().and_then(|s| s.focusable.first())
    }

    /// Handle a key event while the modal is open
    pub fn on_key<E, H>(
        &self,
        event: &mut E,
        active: Option<ElementId>,
        host: &mut H,
    ) -> Option<FocusTarget>
    where
        E: TrapEvent + ?Sized,
        H: FocusHost + ?Sized,
    {
        let state = self.state.as_ref()?;
        trap::handle(event, &state.focusable, active, host, self.policy)
    }
}

/// Trap pushed for a nested modal, with the focus to restore on close
#[derive(Debug, Clone)]
struct StackedTrap {
    trap: FocusTrapController,
    restore_to: Option<ElementId>,
}

/// Stack of traps for nested modals
///
/// Pushing detaches the previous top (it stops seeing key events);
/// popping re-attaches it and hands back the focus to restore.
#[derive(Debug, Clone, Default)]
pub struct TrapStack {
    traps: Vec<StackedTrap>,
    policy: UntrackedForward,
}

impl TrapStack {
    pub fn new(policy: UntrackedForward) -> Self {
        Self {
            traps: Vec::new(),
            policy,
        }
    }

    /// Open a trap over `container` on top of the stack
    ///
    /// `restore_to` is the element focused before the modal opened.
    pub fn push<Q>(&mut self, container: ElementId, query: &Q, restore_to: Option<ElementId>)
    where
        Q: FocusableQuery + ?Sized,
    {
        let mut trap = FocusTrapController::new(self.policy);
        trap.activate(container, query);
        self.traps.push(StackedTrap { trap, restore_to });
        tracing::debug!(depth = self.traps.len(), "Trap pushed");
    }

    /// Close the top trap, returning the focus to restore
    pub fn pop(&mut self) -> Option<ElementId> {
        let mut top = self.traps.pop()?;
        top.trap.deactivate();
        tracing::debug!(depth = self.traps.len(), "Trap popped");
        top.restore_to
    }

    /// Re-enumerate the top trap after content changes
    pub fn refresh_top<Q>(&mut self, query: &Q)
    where
        Q: FocusableQuery + ?Sized,
    {
        if let Some(top) = self.traps.last_mut() {
            top.trap.refresh(query);
        }
    }

    pub fn top(&self) -> Option<&FocusTrapController> {
        self.traps.last().map(|t| &t.trap)
    }

    pub fn depth(&self) -> usize {
        self.traps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traps.is_empty()
    }

    /// Drop every trap, deactivating each one
    pub fn clear(&mut self) {
        for mut stacked in self.traps.drain(..).rev() {
            stacked.trap.deactivate();
        }
        tracing::debug!("Trap stack cleared");
    }

    /// Route a key event to the topmost trap only
    pub fn on_key<E, H>(
        &self,
        event: &mut E,
        active: Option<ElementId>,
        host: &mut H,
    ) -> Option<FocusTarget>
    where
        E: TrapEvent + ?Sized,
        H: FocusHost + ?Sized,
    {
        self.top()?.on_key(event, active, host)
    }
}

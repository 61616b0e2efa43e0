//! Tab wrap-around policy for modal focus traps
//!
//! The trap only intervenes at the edges of the focusable set. Interior
//! Tab presses are left to the host's native navigation; at the last
//! element a forward Tab wraps to the first, at the first element a
//! backward Tab wraps to the last.
//!
//! ```text
//!   Shift+Tab on [0] ──────────────┐
//!                                  ▼
//!   [0] ── Tab ── [1] ── Tab ── [N-1]
//!    ▲                             │
//!    └───────────── Tab on [N-1] ──┘
//! ```
//!
//! [`decide`] is pure. [`handle`] applies its outcome: cancel the event
//! once and ask the host to move focus.

use super::element::ElementId;
use super::enumerate::FocusableSet;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Keys as the trap sees them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab,
    Enter,
    Escape,
    Space,
    Backspace,
    Char(char),
    Other,
}

/// A key-down event the trap can react to
///
/// The trap never constructs these; it reads them and may cancel the
/// host's default handling.
pub trait TrapEvent {
    fn key(&self) -> Key;
    fn shift(&self) -> bool;
    /// Suppress the host's default navigation for this event
    fn cancel_default(&mut self);
}

/// The single capability the trap needs from its host
pub trait FocusHost {
    fn move_focus_to(&mut self, target: ElementId);
}

/// Which edge the trap wrapped from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrap {
    /// Forward past the end, back to the first element
    ToFirst,
    /// Backward past the start, round to the last element
    ToLast,
}

/// Where focus goes after an intercepted Tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusTarget {
    pub element: ElementId,
    pub wrap: Wrap,
}

/// Forward-Tab behaviour when the active element is not in the set
///
/// An untracked element sits at index -1, which always satisfies the
/// backward wrap condition but never the forward one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UntrackedForward {
    /// Take no action and let the host place focus
    #[default]
    Native,
    /// Pull focus to the first element
    FocusFirst,
}

impl UntrackedForward {
    /// Parse policy string from config ("native" | "first")
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "first" | "focus_first" | "focus-first" => Self::FocusFirst,
            _ => Self::Native,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::FocusFirst => "first",
        }
    }
}

/// Decide whether a key press wraps focus, and where to
///
/// Returns `None` when the host's default navigation should proceed.
pub fn decide(
    key: Key,
    shift: bool,
    set: &FocusableSet,
    active: Option<ElementId>,
    policy: UntrackedForward,
) -> Option<FocusTarget> {
    if key != Key::Tab || set.is_empty() {
        return None;
    }

    let current = active.and_then(|id| set.position(id));
    let last_index = set.len() - 1;

    if shift {
        // Index -1 (untracked) counts as "at the start"
        match current {
            None | Some(0) => set.last().map(|element| FocusTarget {
                element,
                wrap: Wrap::ToLast,
            }),
            Some(_) => None,
        }
    } else {
        match current {
            Some(i) if i >= last_index => set.first().map(|element| FocusTarget {
                element,
                wrap: Wrap::ToFirst,
            }),
            None if policy == UntrackedForward::FocusFirst => {
                set.first().map(|element| FocusTarget {
                    element,
                    wrap: Wrap::ToFirst,
                })
            }
            _ => None,
        }
    }
}

/// React to a key event: cancel it and move focus when the trap wraps
pub fn handle<E, H>(
    event: &mut E,
    set: &FocusableSet,
    active: Option<ElementId>,
    host: &mut H,
    policy: UntrackedForward,
) -> Option<FocusTarget>
where
    E: TrapEvent + ?Sized,
    H: FocusHost + ?Sized,
{
    let target = decide(event.key(), event.shift(), set, active, policy)?;

    event.cancel_default();
    host.move_focus_to(target.element);

    tracing::debug!(
        target_element = %target.element,
        wrap = ?target.wrap,
        set_len = set.len(),
        "Focus trap wrapped"
    );

    Some(target)
}

// ─────────────────────────────────────────────────────────────────────────────
// Terminal adapter
// ─────────────────────────────────────────────────────────────────────────────

/// crossterm key event wrapped with a cancellation flag
///
/// Terminals report Shift+Tab as `BackTab`; it maps to Tab with shift held.
#[derive(Debug, Clone)]
pub struct TerminalKey {
    pub event: KeyEvent,
    cancelled: bool,
}

impl TerminalKey {
    pub fn new(event: KeyEvent) -> Self {
        Self {
            event,
            cancelled: false,
        }
    }

    /// Whether the trap suppressed default handling
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl TrapEvent for TerminalKey {
    fn key(&self) -> Key {
        match self.event.code {
            KeyCode::Tab | KeyCode::BackTab => Key::Tab,
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Escape,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Char(' ') => Key::Space,
            KeyCode::Char(c) => Key::Char(c),
            _ => Key::Other,
        }
    }

    fn shift(&self) -> bool {
        self.event.code == KeyCode::BackTab || self.event.modifiers.contains(KeyModifiers::SHIFT)
    }

    fn cancel_default(&mut self) {
        self.cancelled = true;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::focus::element::{ElementKind, ElementTree};
    use crate::focus::enumerate::FocusableQuery;

    /// Key event that counts how often it was cancelled
    pub(crate) struct CountingEvent {
        pub key: Key,
        pub shift: bool,
        pub cancels: usize,
    }

    impl CountingEvent {
        pub fn tab() -> Self {
            Self { key: Key::Tab, shift: false, cancels: 0 }
        }

        pub fn shift_tab() -> Self {
            Self { key: Key::Tab, shift: true, cancels: 0 }
        }

        pub fn with_key(key: Key) -> Self {
            Self { key, shift: false, cancels: 0 }
        }
    }

    impl TrapEvent for CountingEvent {
        fn key(&self) -> Key {
            self.key
        }

        fn shift(&self) -> bool {
            self.shift
        }

        fn cancel_default(&mut self) {
            self.cancels += 1;
        }
    }

    /// Host that records every focus transfer
    #[derive(Default)]
    pub(crate) struct RecordingHost {
        pub moves: Vec<ElementId>,
    }

    impl FocusHost for RecordingHost {
        fn move_focus_to(&mut self, target: ElementId) {
            self.moves.push(target);
        }
    }

    pub(crate) fn buttons(n: usize) -> (ElementTree, FocusableSet, Vec<ElementId>) {
        let mut tree = ElementTree::new();
        let root = tree.root(ElementKind::Container, "modal");
        let ids: Vec<_> = (0..n)
            .map(|i| tree.append(root, ElementKind::Button, format!("b{}", i + 1)).unwrap())
            .collect();
        let set = tree.query_focusable(root);
        (tree, set, ids)
    }

    #[test]
    fn test_forward_from_last_wraps_to_first() {
        let (_, set, b) = buttons(3);
        let mut event = CountingEvent::tab();
        let mut host = RecordingHost::default();

        let target = handle(&mut event, &set, Some(b[2]), &mut host, UntrackedForward::Native);

        assert_eq!(target, Some(FocusTarget { element: b[0], wrap: Wrap::ToFirst }));
        assert_eq!(event.cancels, 1);
        assert_eq!(host.moves, vec![b[0]]);
    }

    #[test]
    fn test_backward_from_first_wraps_to_last() {
        let (_, set, b) = buttons(3);
        let mut event = CountingEvent::shift_tab();
        let mut host = RecordingHost::default();

        let target = handle(&mut event, &set, Some(b[0]), &mut host, UntrackedForward::Native);

        assert_eq!(target.map(|t| t.element), Some(b[2]));
        assert_eq!(event.cancels, 1);
        assert_eq!(host.moves, vec![b[2]]);
    }

    #[test]
    fn test_interior_tab_left_to_host() {
        let (_, set, b) = buttons(3);
        let mut event = CountingEvent::tab();
        let mut host = RecordingHost::default();

        let target = handle(&mut event, &set, Some(b[1]), &mut host, UntrackedForward::Native);

        assert!(target.is_none());
        assert_eq!(event.cancels, 0);
        assert!(host.moves.is_empty());
    }

    #[test]
    fn test_non_tab_key_never_cancels() {
        let (_, set, b) = buttons(1);
        for key in [Key::Enter, Key::Escape, Key::Space, Key::Char('a'), Key::Other] {
            for active in [None, Some(b[0])] {
                let mut event = CountingEvent::with_key(key);
                let mut host = RecordingHost::default();
                assert!(handle(&mut event, &set, active, &mut host, UntrackedForward::FocusFirst).is_none());
                assert_eq!(event.cancels, 0);
            }
        }
    }

    #[test]
    fn test_empty_set_never_cancels() {
        let set = FocusableSet::empty();
        for shift in [false, true] {
            assert!(decide(Key::Tab, shift, &set, None, UntrackedForward::FocusFirst).is_none());
        }
    }

    #[test]
    fn test_every_index_across_sizes() {
        for n in 1..=6 {
            let (_, set, b) = buttons(n);
            for i in 0..n {
                let forward = decide(Key::Tab, false, &set, Some(b[i]), UntrackedForward::Native);
                if i == n - 1 {
                    assert_eq!(forward.map(|t| t.element), Some(b[0]), "n={n} i={i}");
                } else {
                    assert!(forward.is_none(), "n={n} i={i}");
                }

                let backward = decide(Key::Tab, true, &set, Some(b[i]), UntrackedForward::Native);
                if i == 0 {
                    assert_eq!(backward.map(|t| t.element), Some(b[n - 1]), "n={n} i={i}");
                } else {
                    assert!(backward.is_none(), "n={n} i={i}");
                }
            }
        }
    }

    #[test]
    fn test_single_element_wraps_onto_itself() {
        let (_, set, b) = buttons(1);
        let fwd = decide(Key::Tab, false, &set, Some(b[0]), UntrackedForward::Native);
        let back = decide(Key::Tab, true, &set, Some(b[0]), UntrackedForward::Native);
        assert_eq!(fwd.map(|t| t.element), Some(b[0]));
        assert_eq!(back.map(|t| t.element), Some(b[0]));
    }

    #[test]
    fn test_untracked_active_element() {
        let (mut tree, set, b) = buttons(3);
        let outside = tree.root(ElementKind::Button, "behind the modal");

        for active in [None, Some(outside)] {
            // Backward always wraps to the last element
            let back = decide(Key::Tab, true, &set, active, UntrackedForward::Native);
            assert_eq!(back.map(|t| t.element), Some(b[2]));

            // Forward defers to the host unless asked to pull focus in
            assert!(decide(Key::Tab, false, &set, active, UntrackedForward::Native).is_none());
            let pulled = decide(Key::Tab, false, &set, active, UntrackedForward::FocusFirst);
            assert_eq!(pulled.map(|t| t.element), Some(b[0]));
        }
    }

    #[test]
    fn test_decision_is_repeatable() {
        let (_, set, b) = buttons(3);
        let first = decide(Key::Tab, false, &set, Some(b[2]), UntrackedForward::Native);
        for _ in 0..5 {
            assert_eq!(decide(Key::Tab, false, &set, Some(b[2]), UntrackedForward::Native), first);
        }
    }

    #[test]
    fn test_terminal_backtab_is_shift_tab() {
        let mut back = TerminalKey::new(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT));
        assert_eq!(back.key(), Key::Tab);
        assert!(back.shift());
        assert!(!back.is_cancelled());
        back.cancel_default();
        assert!(back.is_cancelled());

        let plain = TerminalKey::new(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
        assert!(!plain.shift());
        let space = TerminalKey::new(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE));
        assert_eq!(space.key(), Key::Space);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!(UntrackedForward::parse("first"), UntrackedForward::FocusFirst);
        assert_eq!(UntrackedForward::parse("NATIVE"), UntrackedForward::Native);
        assert_eq!(UntrackedForward::parse("bogus"), UntrackedForward::Native);
    }
}

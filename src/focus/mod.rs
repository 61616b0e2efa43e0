//! Modal focus trapping
//!
//! Confines keyboard Tab navigation to the focusable elements of the open
//! modal. The pieces are layered bottom-up:
//!
//! ```text
//! ElementTree ──query_focusable──▶ FocusableSet
//!                                      │
//!                     TrapEvent ──▶ decide / handle ──▶ FocusHost
//!                                      │
//!                     FocusTrapController (Inactive | Active)
//!                                      │
//!                     TrapStack (nested modals, topmost only)
//! ```
//!
//! The trap never owns "current focus". It asks its host to move focus
//! through [`FocusHost`], which keeps it testable with fake handles.

pub mod controller;
pub mod element;
pub mod enumerate;
pub mod trap;

pub use controller::TrapStack;
pub use element::{ElementId, ElementKind, ElementTree, InputType};
pub use enumerate::FocusableQuery;
pub use trap::{FocusHost, Key, TerminalKey, TrapEvent, UntrackedForward};

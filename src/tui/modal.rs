// Modal system for TUI overlays
//
// Modals own their form and translate activations (Space/Enter on a
// control) into actions. App holds the stack of open modals and the focus
// traps that go with them, and acts on returned ModalAction values.

use chrono::NaiveDate;

use super::forms::{
    AppliedRange, ConfirmForm, DateRangeForm, HelpForm, SettingsForm, STATUS_BUSY, STATUS_ERR,
};
use crate::focus::{ElementId, ElementTree};
use crate::settings::SettingsUpdate;

/// Actions returned by modal input handling
#[derive(Debug, Clone, PartialEq)]
pub enum ModalAction {
    /// Input consumed, no state change needed
    None,
    /// Close this modal
    Close,
    /// Visible controls changed, re-enumerate the trap
    Refresh,
    /// Send validated settings to the API
    Save(SettingsUpdate),
    /// Ask before throwing away unsaved edits
    ConfirmDiscard,
    /// Close this modal and the one beneath it
    Discard,
    /// Use a new date range
    Apply(AppliedRange),
}

/// Available modal types
pub enum Modal {
    Help(HelpForm),
    Settings(SettingsForm),
    DateRange(DateRangeForm),
    ConfirmDiscard(ConfirmForm),
}

impl Modal {
    pub fn help(tree: &mut ElementTree) -> Self {
        Modal::Help(HelpForm::build(tree))
    }

    pub fn settings(tree: &mut ElementTree, integration: &str) -> Self {
        Modal::Settings(SettingsForm::build(tree, integration))
    }

    pub fn date_range(tree: &mut ElementTree, current: &AppliedRange) -> Self {
        Modal::DateRange(DateRangeForm::build(tree, current))
    }

    pub fn confirm_discard(tree: &mut ElementTree) -> Self {
        Modal::ConfirmDiscard(ConfirmForm::build(tree))
    }

    /// Root element the modal's trap is scoped to
    pub fn container(&self) -> ElementId {
        match self {
            Modal::Help(f) => f.root,
            Modal::Settings(f) => f.root,
            Modal::DateRange(f) => f.root,
            Modal::ConfirmDiscard(f) => f.root,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Modal::Help(_) => " Help ",
            Modal::Settings(_) => " Integration Settings ",
            Modal::DateRange(_) => " Date Range ",
            Modal::ConfirmDiscard(_) => " Discard changes? ",
        }
    }

    /// Preferred (width, height) of the overlay
    pub fn size(&self) -> (u16, u16) {
        match self {
            Modal::Help(_) => (52, 16),
            Modal::Settings(_) => (64, 13),
            Modal::DateRange(_) => (44, 14),
            Modal::ConfirmDiscard(_) => (40, 7),
        }
    }

    /// Space or Enter on a non-text control
    pub fn activate(
        &mut self,
        tree: &mut ElementTree,
        element: ElementId,
        today: NaiveDate,
    ) -> ModalAction {
        match self {
            Modal::Help(form) if element == form.close => ModalAction::Close,
            Modal::Help(_) => ModalAction::None,

            Modal::Settings(form) => {
                if element == form.save {
                    save_settings(form, tree)
                } else if element == form.cancel {
                    cancel_settings(form, tree)
                } else {
                    ModalAction::None
                }
            }

            Modal::DateRange(form) => {
                if let Some(preset) = form.preset_for(element) {
                    if form.select(tree, preset) {
                        ModalAction::Refresh
                    } else {
                        ModalAction::None
                    }
                } else if element == form.apply {
                    apply_range(form, tree, today)
                } else if element == form.cancel {
                    ModalAction::Close
                } else {
                    ModalAction::None
                }
            }

            Modal::ConfirmDiscard(form) => {
                if element == form.discard {
                    ModalAction::Discard
                } else if element == form.keep {
                    ModalAction::Close
                } else {
                    ModalAction::None
                }
            }
        }
    }

    /// Enter inside a text field submits the form
    pub fn submit(&mut self, tree: &mut ElementTree, today: NaiveDate) -> ModalAction {
        match self {
            Modal::Settings(form) => save_settings(form, tree),
            Modal::DateRange(form) => apply_range(form, tree, today),
            _ => ModalAction::None,
        }
    }

    /// Esc
    pub fn dismiss(&mut self, tree: &mut ElementTree) -> ModalAction {
        match self {
            Modal::Settings(form) => cancel_settings(form, tree),
            _ => ModalAction::Close,
        }
    }
}

fn save_settings(form: &mut SettingsForm, tree: &mut ElementTree) -> ModalAction {
    if form.busy {
        return ModalAction::None;
    }
    match form.update(tree).validate() {
        Ok(update) => {
            form.busy = true;
            form.set_status(tree, STATUS_BUSY, "Testing connection");
            ModalAction::Save(update)
        }
        Err(e) => {
            form.set_status(tree, STATUS_ERR, e.detail());
            ModalAction::None
        }
    }
}

fn cancel_settings(form: &SettingsForm, tree: &ElementTree) -> ModalAction {
    if form.is_dirty(tree) {
        ModalAction::ConfirmDiscard
    } else {
        ModalAction::Close
    }
}

fn apply_range(form: &DateRangeForm, tree: &mut ElementTree, today: NaiveDate) -> ModalAction {
    match form.resolve(tree, today) {
        Ok(range) => ModalAction::Apply(range),
        Err(message) => {
            form.set_error(tree, &message);
            ModalAction::None
        }
    }
}

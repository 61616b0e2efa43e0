// TUI application state
//
// App owns the element tree, the stack of open modals and the focus trap
// for each of them. Key handling is synchronous; HTTP work is queued as
// effects for the event loop to run and comes back as AppMessage values.

use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::components::toast::Toast;
use super::forms::{AppliedRange, STATUS_ERR};
use super::modal::{Modal, ModalAction};
use super::theme::Theme;
use crate::config::Config;
use crate::focus::{
    ElementId, ElementKind, ElementTree, FocusHost, InputType, Key, TerminalKey, TrapEvent,
    TrapStack,
};
use crate::logging::LogBuffer;
use crate::settings::{IntegrationSettings, SaveResponse, SettingsError, SettingsUpdate};

/// Work the event loop should run off the UI task
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadSettings {
        integration: String,
    },
    SaveSettings {
        integration: String,
        update: SettingsUpdate,
    },
}

/// Results delivered back to the UI task
#[derive(Debug)]
pub enum AppMessage {
    SettingsLoaded(Result<IntegrationSettings, SettingsError>),
    SettingsSaved(Result<SaveResponse, SettingsError>),
}

/// The element with keyboard focus
///
/// Kept separate from App so the trap can borrow it mutably while the
/// trap stack itself is borrowed.
#[derive(Debug, Default)]
pub struct FocusState {
    pub focused: Option<ElementId>,
}

impl FocusHost for FocusState {
    fn move_focus_to(&mut self, target: ElementId) {
        tracing::trace!(element = %target, "Focus moved");
        self.focused = Some(target);
    }
}

/// Main application state for the TUI
pub struct App {
    pub should_quit: bool,

    /// Integration edited by the settings modal
    pub integration: String,

    pub log_buffer: LogBuffer,
    pub theme: Theme,

    /// Elements of every open modal (reset when the last one closes)
    pub tree: ElementTree,

    /// Open modals, topmost last; parallel to `traps`
    pub modals: Vec<Modal>,
    pub traps: TrapStack,
    pub focus: FocusState,

    /// Date range shown on the main screen
    pub range: AppliedRange,

    /// Server URL from the last successful save
    pub saved_server_url: Option<String>,

    pub toast: Option<Toast>,

    pub today: NaiveDate,

    effects: Vec<Effect>,
}

impl App {
    pub fn new(config: &Config, log_buffer: LogBuffer) -> Self {
        let today = Local::now().date_naive();
        Self {
            should_quit: false,
            integration: config.integration.clone(),
            log_buffer,
            theme: Theme::default(),
            tree: ElementTree::new(),
            modals: Vec::new(),
            traps: TrapStack::new(config.trap.untracked_forward),
            focus: FocusState::default(),
            range: AppliedRange::default_for(today),
            saved_server_url: None,
            toast: None,
            today,
            effects: Vec::new(),
        }
    }

    /// Periodic housekeeping from the tick timer
    pub fn tick(&mut self) {
        self.today = Local::now().date_naive();
        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        }
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast::new(message));
    }

    /// Drain queued effects
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    pub fn top_modal(&self) -> Option<&Modal> {
        self.modals.last()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Modal stack
    // ─────────────────────────────────────────────────────────────────────

    /// Push a modal and trap focus inside it
    pub fn open_modal(&mut self, modal: Modal) {
        let restore_to = self.focus.focused;
        self.traps.push(modal.container(), &self.tree, restore_to);
        tracing::debug!(
            modal = modal.title().trim(),
            depth = self.modals.len() + 1,
            "Modal opened"
        );
        self.modals.push(modal);

        self.focus.focused = self.traps.top().and_then(|t| t.initial_focus());
    }

    /// Pop the top modal and restore the focus it displaced
    pub fn close_top(&mut self) {
        let Some(modal) = self.modals.pop() else {
            return;
        };
        tracing::debug!(
            modal = modal.title().trim(),
            depth = self.modals.len(),
            "Modal closed"
        );
        self.focus.focused = self.traps.pop();

        if self.modals.is_empty() {
            self.tree = ElementTree::new();
            self.focus.focused = None;
        } else {
            // The uncovered modal may have changed while it sat underneath
            self.traps.refresh_top(&self.tree);
        }
    }

    pub fn open_settings(&mut self) {
        let modal = Modal::settings(&mut self.tree, &self.integration);
        self.open_modal(modal);
        self.effects.push(Effect::LoadSettings {
            integration: self.integration.clone(),
        });
    }

    pub fn open_date_range(&mut self) {
        let modal = Modal::date_range(&mut self.tree, &self.range);
        self.open_modal(modal);
    }

    pub fn open_help(&mut self) {
        let modal = Modal::help(&mut self.tree);
        self.open_modal(modal);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Input
    // ─────────────────────────────────────────────────────────────────────

    /// Layered dispatch: open modal first, then global keys
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        if key_event.kind != KeyEventKind::Press {
            return;
        }

        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && key_event.code == KeyCode::Char('c')
        {
            self.should_quit = true;
            return;
        }

        if self.modals.is_empty() {
            self.handle_global_key(key_event.code);
        } else {
            self.handle_modal_key(key_event);
        }
    }

    fn handle_global_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Char('s') | KeyCode::Char('S') => self.open_settings(),
            KeyCode::Char('d') | KeyCode::Char('D') => self.open_date_range(),
            KeyCode::Char('?') => self.open_help(),
            _ => {}
        }
    }

    fn handle_modal_key(&mut self, key_event: KeyEvent) {
        let mut event = TerminalKey::new(key_event);
        let focused = self.focus.focused;
        let text_field = focused.filter(|&id| {
            self.tree
                .get(id)
                .is_some_and(|el| el.kind.accepts_text())
        });

        let action = match (event.key(), text_field) {
            (Key::Tab, _) => {
                let shift = event.shift();
                self.traps.on_key(&mut event, focused, &mut self.focus);
                if !event.is_cancelled() {
                    self.native_tab(shift);
                }
                ModalAction::None
            }
            (Key::Escape, _) => match self.modals.last_mut() {
                Some(modal) => modal.dismiss(&mut self.tree),
                None => ModalAction::None,
            },
            (Key::Enter, Some(_)) => match self.modals.last_mut() {
                Some(modal) => modal.submit(&mut self.tree, self.today),
                None => ModalAction::None,
            },
            (Key::Enter | Key::Space, None) => match (self.modals.last_mut(), focused) {
                (Some(modal), Some(id)) => modal.activate(&mut self.tree, id, self.today),
                _ => ModalAction::None,
            },
            (Key::Space, Some(id)) => {
                self.insert_char(id, ' ');
                ModalAction::None
            }
            (Key::Char(c), Some(id)) => {
                self.insert_char(id, c);
                ModalAction::None
            }
            (Key::Backspace, Some(id)) => {
                if let Some(el) = self.tree.get_mut(id) {
                    el.value.pop();
                }
                ModalAction::None
            }
            _ => ModalAction::None,
        };

        self.apply_action(action);
    }

    /// Default Tab movement when the trap did not intervene
    ///
    /// Steps to the neighbouring element of the top modal's set; an
    /// untracked focus enters the set at its near edge.
    fn native_tab(&mut self, shift: bool) {
        let Some(trap) = self.traps.top() else {
            return;
        };
        let set = trap.focusable();

        let next = match self.focus.focused.and_then(|id| set.position(id)) {
            Some(i) if shift => i.checked_sub(1).and_then(|j| set.get(j)),
            Some(i) => set.get(i + 1),
            None if shift => set.last(),
            None => set.first(),
        };

        if let Some(id) = next {
            self.focus.move_focus_to(id);
        }
    }

    fn insert_char(&mut self, id: ElementId, c: char) {
        let Some(el) = self.tree.get_mut(id) else {
            return;
        };
        if el.kind == ElementKind::Input(InputType::Date)
            && (el.value.len() >= 10 || !(c.is_ascii_digit() || c == '-'))
        {
            return;
        }
        el.value.push(c);
    }

    fn apply_action(&mut self, action: ModalAction) {
        match action {
            ModalAction::None => {}
            ModalAction::Close => self.close_top(),
            ModalAction::Refresh => {
                self.traps.refresh_top(&self.tree);
            }
            ModalAction::Save(update) => {
                let integration = match self.modals.last() {
                    Some(Modal::Settings(form)) => form.integration.clone(),
                    _ => self.integration.clone(),
                };
                tracing::debug!(integration = %integration, "Saving settings");
                self.effects
                    .push(Effect::SaveSettings { integration, update });
            }
            ModalAction::ConfirmDiscard => {
                let modal = Modal::confirm_discard(&mut self.tree);
                self.open_modal(modal);
            }
            ModalAction::Discard => {
                self.close_top();
                self.close_top();
            }
            ModalAction::Apply(range) => {
                tracing::info!(range = range.preset.label(), since = %range.since, "Date range applied");
                self.range = range;
                self.close_top();
                self.show_toast(format!("Showing activity since {}", range.since));
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Async results
    // ─────────────────────────────────────────────────────────────────────

    pub fn handle_message(&mut self, message: AppMessage) {
        let form = self.modals.iter_mut().find_map(|m| match m {
            Modal::Settings(form) => Some(form),
            _ => None,
        });

        match message {
            AppMessage::SettingsLoaded(Ok(settings)) => {
                if let Some(form) = form {
                    form.apply_loaded(&mut self.tree, &settings);
                }
            }
            AppMessage::SettingsLoaded(Err(e)) => {
                tracing::warn!("Could not load settings: {}", e);
                if let Some(form) = form {
                    form.set_status(&mut self.tree, STATUS_ERR, &e.to_string());
                }
            }
            AppMessage::SettingsSaved(Ok(response)) => {
                if let Some(form) = form {
                    form.mark_saved(&mut self.tree);
                    self.saved_server_url = Some(self.tree.value(form.url).trim().to_string());
                }
                if matches!(self.modals.last(), Some(Modal::Settings(_))) {
                    self.close_top();
                }
                self.show_toast(format!("✓ {}", response.message));
            }
            AppMessage::SettingsSaved(Err(e)) => match form {
                Some(form) => {
                    form.busy = false;
                    form.set_status(&mut self.tree, STATUS_ERR, &e.to_string());
                }
                // Modal was discarded while the request was in flight
                None => self.toast = Some(Toast::error(e.to_string())),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::{FocusableQuery, UntrackedForward};
    use crate::tui::forms::RangePreset;

    fn app() -> App {
        let mut app = App::new(&Config::default(), LogBuffer::new());
        app.today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn back_tab(app: &mut App) {
        app.handle_key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn top_set(app: &App) -> Vec<ElementId> {
        app.traps.top().unwrap().focusable().as_slice().to_vec()
    }

    fn settings_form(app: &App) -> &crate::tui::forms::SettingsForm {
        app.modals
            .iter()
            .find_map(|m| match m {
                Modal::Settings(f) => Some(f),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_tab_cycles_inside_date_range() {
        let mut app = app();
        press(&mut app, KeyCode::Char('d'));

        let set = top_set(&app);
        assert_eq!(set.len(), 7);
        assert_eq!(app.focus.focused, Some(set[0]));

        // Walk forward through every control and wrap back to the first
        for expected in set.iter().skip(1) {
            press(&mut app, KeyCode::Tab);
            assert_eq!(app.focus.focused, Some(*expected));
        }
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus.focused, Some(set[0]));

        // And backward from the first wraps to the last
        back_tab(&mut app);
        assert_eq!(app.focus.focused, Some(set[6]));
    }

    #[test]
    fn test_custom_range_joins_the_cycle() {
        let mut app = app();
        press(&mut app, KeyCode::Char('d'));

        // Focus "Custom" (fifth radio) and pick it
        for _ in 0..4 {
            press(&mut app, KeyCode::Tab);
        }
        press(&mut app, KeyCode::Char(' '));

        let set = top_set(&app);
        assert_eq!(set.len(), 8);
        let Some(Modal::DateRange(form)) = app.top_modal() else {
            panic!("date range modal should be open");
        };
        let start = form.start;
        assert_eq!(set[5], start);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus.focused, Some(start));
        type_text(&mut app, "2025-x02-01");
        assert_eq!(app.tree.value(start), "2025-02-01");

        press(&mut app, KeyCode::Enter);
        assert!(app.modals.is_empty());
        assert_eq!(app.range.preset, RangePreset::Custom);
        assert_eq!(app.range.since, NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        assert!(app.toast.is_some());
    }

    #[test]
    fn test_invalid_custom_date_keeps_modal_open() {
        let mut app = app();
        press(&mut app, KeyCode::Char('d'));
        for _ in 0..4 {
            press(&mut app, KeyCode::Tab);
        }
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "2025-99-99");
        press(&mut app, KeyCode::Enter);

        let Some(Modal::DateRange(form)) = app.top_modal() else {
            panic!("date range modal should stay open");
        };
        let status = &app.tree.get(form.status).unwrap().label;
        assert!(status.starts_with(STATUS_ERR));
    }

    #[test]
    fn test_help_single_control_keeps_focus() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        let close = top_set(&app)[0];

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus.focused, Some(close));
        back_tab(&mut app);
        assert_eq!(app.focus.focused, Some(close));

        // Keys that mean something on the main screen are absorbed
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Enter);
        assert!(app.modals.is_empty());
        assert!(app.traps.is_empty());
        assert!(app.tree.get(close).is_none());
    }

    #[test]
    fn test_settings_open_queues_load() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'));

        assert_eq!(
            app.take_effects(),
            vec![Effect::LoadSettings {
                integration: "sonarr".into()
            }]
        );
        assert!(app.take_effects().is_empty());

        app.handle_message(AppMessage::SettingsLoaded(Ok(IntegrationSettings {
            server_url: Some("http://sonarr.local:8989".into()),
            api_key_configured: true,
        })));
        let form = settings_form(&app);
        assert_eq!(app.tree.value(form.url), "http://sonarr.local:8989");
        assert_eq!(app.focus.focused, Some(form.url));
    }

    #[test]
    fn test_settings_save_flow() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'));
        app.take_effects();

        type_text(&mut app, "http://sonarr.local:8989");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "0123456789abcdef");
        press(&mut app, KeyCode::Enter);

        let effects = app.take_effects();
        assert_eq!(effects.len(), 1);
        let Effect::SaveSettings { update, .. } = &effects[0] else {
            panic!("expected a save");
        };
        assert_eq!(update.server_url, "http://sonarr.local:8989");

        // A second submit while busy does nothing
        press(&mut app, KeyCode::Enter);
        assert!(app.take_effects().is_empty());

        app.handle_message(AppMessage::SettingsSaved(Ok(SaveResponse {
            success: true,
            message: "Connection successful".into(),
        })));
        assert!(app.modals.is_empty());
        assert_eq!(app.saved_server_url.as_deref(), Some("http://sonarr.local:8989"));
        assert!(app.toast.as_ref().unwrap().message.contains("Connection successful"));
    }

    #[test]
    fn test_settings_error_shown_inline() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'));
        type_text(&mut app, "http://sonarr.local:8989");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "key");
        press(&mut app, KeyCode::Enter);

        app.handle_message(AppMessage::SettingsSaved(Err(SettingsError::Connection(
            "Connection refused".into(),
        ))));

        let form = settings_form(&app);
        assert!(!form.busy);
        let status = &app.tree.get(form.status).unwrap().label;
        assert!(status.contains("Connection refused"));
        assert_eq!(app.modals.len(), 1);
    }

    #[test]
    fn test_save_error_after_discard_becomes_toast() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'));
        type_text(&mut app, "http://sonarr.local:8989");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "key");
        press(&mut app, KeyCode::Enter);

        // Esc on a dirty form asks first; Tab to Discard and confirm
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        assert!(app.modals.is_empty());

        app.handle_message(AppMessage::SettingsSaved(Err(SettingsError::Unauthenticated(
            "Not authenticated".into(),
        ))));
        let toast = app.toast.as_ref().unwrap();
        assert!(toast.is_error);
        assert!(app.modals.is_empty());
    }

    #[test]
    fn test_invalid_settings_never_leave_the_form() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'));
        app.take_effects();

        type_text(&mut app, "sonarr.local");
        press(&mut app, KeyCode::Enter);

        assert!(app.take_effects().is_empty());
        let form = settings_form(&app);
        assert!(app.tree.get(form.status).unwrap().label.starts_with(STATUS_ERR));
    }

    #[test]
    fn test_discard_confirmation_stacks_and_restores_focus() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'));
        type_text(&mut app, "http://edited");

        // Shift+Tab from the URL field wraps to Cancel
        back_tab(&mut app);
        let cancel = settings_form(&app).cancel;
        assert_eq!(app.focus.focused, Some(cancel));

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.modals.len(), 2);
        assert_eq!(app.traps.depth(), 2);

        // Only the confirmation's two buttons are reachable now
        let confirm = top_set(&app);
        assert_eq!(confirm.len(), 2);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus.focused, Some(confirm[0]));

        // Keep editing: back to the settings modal, focus on Cancel again
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.modals.len(), 1);
        assert_eq!(app.focus.focused, Some(cancel));

        // Discard closes both
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        assert!(app.modals.is_empty());
        assert!(app.traps.is_empty());
    }

    #[test]
    fn test_uncovered_modal_reenumerated_on_close() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'));
        type_text(&mut app, "http://edited");
        assert_eq!(top_set(&app).len(), 4);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.modals.len(), 2);

        // The settings form changes while the confirmation covers it
        let save = settings_form(&app).save;
        app.tree.set_disabled(save, true);

        // Keep editing
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.modals.len(), 1);
        let set = top_set(&app);
        assert_eq!(set.len(), 3);
        assert!(!set.contains(&save));

        // Tab from the key field skips the disabled Save button
        let form = settings_form(&app);
        let (api_key, cancel) = (form.api_key, form.cancel);
        app.focus.focused = Some(api_key);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus.focused, Some(cancel));
    }

    #[test]
    fn test_clean_settings_cancel_closes_directly() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Esc);
        assert!(app.modals.is_empty());
    }

    #[test]
    fn test_untracked_focus_policy() {
        let mut config = Config::default();
        config.trap.untracked_forward = UntrackedForward::FocusFirst;
        let mut app = App::new(&config, LogBuffer::new());
        press(&mut app, KeyCode::Char('?'));
        let close = top_set(&app)[0];

        app.focus.focused = None;
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus.focused, Some(close));
    }

    #[test]
    fn test_main_screen_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        assert!(app.focus.focused.is_none());

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_reopened_modal_starts_fresh() {
        let mut app = app();
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('d'));

        let Some(Modal::DateRange(form)) = app.top_modal() else {
            panic!("date range modal should be open");
        };
        assert_eq!(app.tree.query_focusable(form.root).len(), 7);
    }
}

// Modal forms - the element trees behind each modal
//
// Each form builds its subtree under a fresh root in the shared element
// tree and remembers the handles it needs. Control state (input text,
// radio selection, status line) lives on the elements themselves so the
// renderer can draw any form generically.

use chrono::{Datelike, Duration, NaiveDate};

use crate::focus::{ElementId, ElementKind, ElementTree, InputType};
use crate::settings::{IntegrationSettings, SettingsUpdate};

/// Status lines start with one of these so the renderer can color them
pub const STATUS_OK: &str = "✓ ";
pub const STATUS_ERR: &str = "✗ ";
pub const STATUS_BUSY: &str = "… ";

fn append(tree: &mut ElementTree, parent: ElementId, kind: ElementKind, label: &str) -> ElementId {
    // Parents always come from the same builder, so the append cannot miss
    tree.append(parent, kind, label)
        .unwrap_or_else(|| tree.root(ElementKind::Text, label))
}

// ─────────────────────────────────────────────────────────────────────────────
// Help
// ─────────────────────────────────────────────────────────────────────────────

pub struct HelpForm {
    pub root: ElementId,
    pub close: ElementId,
}

impl HelpForm {
    pub fn build(tree: &mut ElementTree) -> Self {
        let root = tree.root(ElementKind::Container, "Help");
        for line in [
            "s          Integration settings",
            "d          Date range",
            "?          This help",
            "q          Quit",
            "",
            "Tab        Next control (wraps inside a modal)",
            "Shift+Tab  Previous control",
            "Space      Press button / pick radio",
            "Enter      Press button / submit form",
            "Esc        Close modal",
        ] {
            append(tree, root, ElementKind::Text, line);
        }
        let close = append(tree, root, ElementKind::Button, "Close");
        Self { root, close }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Integration settings
// ─────────────────────────────────────────────────────────────────────────────

pub struct SettingsForm {
    pub root: ElementId,
    pub integration: String,
    pub url: ElementId,
    pub api_key: ElementId,
    pub status: ElementId,
    pub save: ElementId,
    pub cancel: ElementId,
    /// Server URL as last loaded, for dirty tracking
    original_url: String,
    /// A save request is in flight
    pub busy: bool,
}

impl SettingsForm {
    pub fn build(tree: &mut ElementTree, integration: &str) -> Self {
        let root = tree.root(ElementKind::Container, "Integration settings");
        append(
            tree,
            root,
            ElementKind::Text,
            &format!("Connection settings for '{}'", integration),
        );
        let url = append(tree, root, ElementKind::Input(InputType::Url), "Server URL");
        tree.set_placeholder(url, "http://localhost:8989");
        let api_key = append(tree, root, ElementKind::Input(InputType::Password), "API key");
        let status = append(tree, root, ElementKind::Text, "");
        let save = append(tree, root, ElementKind::Button, "Test & Save");
        let cancel = append(tree, root, ElementKind::Button, "Cancel");

        let form = Self {
            root,
            integration: integration.to_string(),
            url,
            api_key,
            status,
            save,
            cancel,
            original_url: String::new(),
            busy: false,
        };
        form.set_status(tree, STATUS_BUSY, "Loading current settings");
        form
    }

    /// Fill the form from the server's current settings
    pub fn apply_loaded(&mut self, tree: &mut ElementTree, settings: &IntegrationSettings) {
        let url = settings.server_url.clone().unwrap_or_default();
        // Keep anything the user typed while the request was in flight
        if tree.value(self.url).is_empty() {
            tree.set_value(self.url, url.clone());
        }
        self.original_url = url;

        let placeholder = if settings.api_key_configured {
            "•••••••• (configured, re-enter to change)"
        } else {
            "not configured"
        };
        tree.set_placeholder(self.api_key, placeholder);
        self.clear_status(tree);
    }

    pub fn update(&self, tree: &ElementTree) -> SettingsUpdate {
        SettingsUpdate::new(tree.value(self.url), tree.value(self.api_key))
    }

    /// Unsaved edits: a changed URL or any typed key
    pub fn is_dirty(&self, tree: &ElementTree) -> bool {
        tree.value(self.url).trim() != self.original_url.trim()
            || !tree.value(self.api_key).is_empty()
    }

    /// Record a successful save as the new baseline
    pub fn mark_saved(&mut self, tree: &mut ElementTree) {
        self.original_url = tree.value(self.url).trim().to_string();
        tree.set_value(self.api_key, "");
        self.busy = false;
    }

    pub fn set_status(&self, tree: &mut ElementTree, prefix: &str, message: &str) {
        tree.set_label(self.status, format!("{}{}", prefix, message));
    }

    pub fn clear_status(&self, tree: &mut ElementTree) {
        tree.set_label(self.status, "");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Date range
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePreset {
    Last7Days,
    Last30Days,
    Last90Days,
    ThisYear,
    Custom,
}

impl RangePreset {
    pub const ALL: [RangePreset; 5] = [
        RangePreset::Last7Days,
        RangePreset::Last30Days,
        RangePreset::Last90Days,
        RangePreset::ThisYear,
        RangePreset::Custom,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Last7Days => "Last 7 days",
            Self::Last30Days => "Last 30 days",
            Self::Last90Days => "Last 90 days",
            Self::ThisYear => "This year",
            Self::Custom => "Custom",
        }
    }

    /// Start date relative to `today` (None for Custom)
    pub fn since(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Last7Days => Some(today - Duration::days(7)),
            Self::Last30Days => Some(today - Duration::days(30)),
            Self::Last90Days => Some(today - Duration::days(90)),
            Self::ThisYear => NaiveDate::from_ymd_opt(today.year(), 1, 1),
            Self::Custom => None,
        }
    }
}

/// The range shown on the main screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedRange {
    pub preset: RangePreset,
    pub since: NaiveDate,
}

impl AppliedRange {
    pub fn default_for(today: NaiveDate) -> Self {
        Self {
            preset: RangePreset::Last7Days,
            since: today - Duration::days(7),
        }
    }
}

pub struct DateRangeForm {
    pub root: ElementId,
    pub radios: Vec<(RangePreset, ElementId)>,
    /// Wrapper around the custom start date, hidden unless Custom is picked
    pub custom_group: ElementId,
    pub start: ElementId,
    pub status: ElementId,
    pub apply: ElementId,
    pub cancel: ElementId,
}

impl DateRangeForm {
    pub fn build(tree: &mut ElementTree, current: &AppliedRange) -> Self {
        let root = tree.root(ElementKind::Container, "Date range");
        let group = append(tree, root, ElementKind::Container, "Range");

        let mut radios = Vec::with_capacity(RangePreset::ALL.len());
        let mut custom_group = None;
        let mut start = None;
        for preset in RangePreset::ALL {
            let radio = append(tree, group, ElementKind::Input(InputType::Radio), preset.label());
            tree.set_checked(radio, preset == current.preset);
            radios.push((preset, radio));

            if preset == RangePreset::Custom {
                // Sits right after the Custom radio in document order
                let wrapper = append(tree, group, ElementKind::Container, "Custom range");
                let field = append(tree, wrapper, ElementKind::Input(InputType::Date), "Start date");
                tree.set_placeholder(field, "YYYY-MM-DD");
                if current.preset == RangePreset::Custom {
                    tree.set_value(field, current.since.format("%Y-%m-%d").to_string());
                }
                tree.set_hidden(wrapper, current.preset != RangePreset::Custom);
                custom_group = Some(wrapper);
                start = Some(field);
            }
        }

        let status = append(tree, root, ElementKind::Text, "");
        let apply = append(tree, root, ElementKind::Button, "Apply");
        let cancel = append(tree, root, ElementKind::Button, "Cancel");

        // Custom is always in ALL, the fallbacks are never used
        let custom_group = custom_group.unwrap_or(group);
        let start = start.unwrap_or(status);

        Self {
            root,
            radios,
            custom_group,
            start,
            status,
            apply,
            cancel,
        }
    }

    pub fn preset_for(&self, element: ElementId) -> Option<RangePreset> {
        self.radios
            .iter()
            .find(|(_, id)| *id == element)
            .map(|(preset, _)| *preset)
    }

    pub fn selected(&self, tree: &ElementTree) -> RangePreset {
        self.radios
            .iter()
            .find(|(_, id)| tree.get(*id).is_some_and(|el| el.checked))
            .map(|(preset, _)| *preset)
            .unwrap_or(RangePreset::Last7Days)
    }

    /// Check the radio for `preset`
    ///
    /// Returns true when the set of visible controls changed.
    pub fn select(&self, tree: &mut ElementTree, preset: RangePreset) -> bool {
        for (p, id) in &self.radios {
            tree.set_checked(*id, *p == preset);
        }

        let show_custom = preset == RangePreset::Custom;
        let was_hidden = tree.get(self.custom_group).is_some_and(|el| el.hidden);
        tree.set_hidden(self.custom_group, !show_custom);
        tree.set_label(self.status, "");
        was_hidden == show_custom
    }

    /// Turn the form state into a range, or an error message for the status line
    pub fn resolve(&self, tree: &ElementTree, today: NaiveDate) -> Result<AppliedRange, String> {
        let preset = self.selected(tree);
        let since = match preset.since(today) {
            Some(date) => date,
            None => {
                let raw = tree.value(self.start).trim();
                let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|_| format!("'{}' is not a date (YYYY-MM-DD)", raw))?;
                if date > today {
                    return Err("Start date is in the future".to_string());
                }
                date
            }
        };
        Ok(AppliedRange { preset, since })
    }

    pub fn set_error(&self, tree: &mut ElementTree, message: &str) {
        tree.set_label(self.status, format!("{}{}", STATUS_ERR, message));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Discard confirmation
// ─────────────────────────────────────────────────────────────────────────────

pub struct ConfirmForm {
    pub root: ElementId,
    pub keep: ElementId,
    pub discard: ElementId,
}

impl ConfirmForm {
    pub fn build(tree: &mut ElementTree) -> Self {
        let root = tree.root(ElementKind::Container, "Discard changes?");
        append(tree, root, ElementKind::Text, "Your edits have not been saved.");
        let keep = append(tree, root, ElementKind::Button, "Keep editing");
        let discard = append(tree, root, ElementKind::Button, "Discard");
        Self { root, keep, discard }
    }
}

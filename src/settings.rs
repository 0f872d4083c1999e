/// Extension settings persisted in browser storage.
///
/// The settings object lives under a single storage bucket and is written
/// back whole on every change, the same JSON shape (camelCase keys) the
/// options and popup pages share.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::format::{ClipboardSettings, CopyFormat};

/// Storage key the settings object is persisted under.
pub const SETTINGS_BUCKET: &str = "tab-grab-ext-settings";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    System,
}

/// Which tabs the popup list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveFilter {
    All,
    Pinned,
}

/// Per-format user templates. Only the plain format is templated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Templates {
    pub plain: String,
}

impl Default for Templates {
    fn default() -> Self {
        Templates {
            plain: "{URL}".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub theme: Theme,
    pub is_grouping_enabled: bool,
    pub is_hide_pinned_enabled: bool,
    pub current_window_only: bool,
    pub active_filter: ActiveFilter,
    pub selected_copy_format: CopyFormat,
    pub copy_title_enabled: bool,
    pub templates: Templates,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            theme: Theme::Light,
            is_grouping_enabled: false,
            is_hide_pinned_enabled: false,
            current_window_only: false,
            active_filter: ActiveFilter::All,
            selected_copy_format: CopyFormat::Plain,
            copy_title_enabled: false,
            templates: Templates::default(),
        }
    }
}

impl Settings {
    /// The two fields the formatter reads.
    pub fn clipboard(&self) -> ClipboardSettings {
        ClipboardSettings {
            copy_title_enabled: self.copy_title_enabled,
            template: self.templates.plain.clone(),
        }
    }

    /// Placeholder text for the template editor, matching the effective
    /// default output shape for the current title toggle.
    pub fn template_hint(&self) -> &'static str {
        if self.copy_title_enabled {
            "{TITLE} - {URL}"
        } else {
            "{URL}"
        }
    }
}

/// Problems worth warning about in the options page template editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateWarning {
    /// The template uses `{TITLE}` while the title toggle is off, so the
    /// placeholder will be removed from the output.
    TitleWillBeStripped,
    /// A placeholder-like token that is not exactly `{TITLE}` or `{URL}`:
    /// wrong casing, stray whitespace inside the braces, or doubled braces.
    /// Unrelated brace tokens are left alone.
    MalformedPlaceholder,
}

/// Check the plain template for the warnings shown in the options page.
/// Warnings never block saving; the formatter stays total regardless.
pub fn validate_template(template: &str, copy_title_enabled: bool) -> Vec<TemplateWarning> {
    static DOUBLE_BRACES: OnceLock<Regex> = OnceLock::new();
    static PLACEHOLDER_LIKE: OnceLock<Regex> = OnceLock::new();

    let double_braces = DOUBLE_BRACES
        .get_or_init(|| Regex::new(r"(?i)\{\{(?:TITLE|URL)\}\}").expect("template pattern"));
    let placeholder_like = PLACEHOLDER_LIKE
        .get_or_init(|| Regex::new(r"(?i)\{\s*(?:TITLE|URL)\s*\}").expect("template pattern"));

    let mut warnings = Vec::new();

    if template.contains("{TITLE}") && !copy_title_enabled {
        warnings.push(TemplateWarning::TitleWillBeStripped);
    }

    let has_typo = double_braces.is_match(template)
        || placeholder_like
            .find_iter(template)
            .any(|m| m.as_str() != "{TITLE}" && m.as_str() != "{URL}");
    if has_typo {
        warnings.push(TemplateWarning::MalformedPlaceholder);
    }

    warnings
}

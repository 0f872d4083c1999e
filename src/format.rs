/// Clipboard/export formatting for selected tabs.
///
/// All functions here are pure and total: malformed or empty fields render
/// as empty segments, nothing panics, nothing touches the browser.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::tab_data::TabItem;

/// Filename handed to the download bridge for CSV exports.
pub const CSV_EXPORT_FILENAME: &str = "tab-grab-export.csv";

/// MIME type for CSV downloads.
pub const CSV_MIME_TYPE: &str = "text/csv;charset=utf-8;";

/// Placeholder for the tab title in plain-text templates.
pub const TITLE_PLACEHOLDER: &str = "{TITLE}";

/// Placeholder for the tab URL in plain-text templates.
pub const URL_PLACEHOLDER: &str = "{URL}";

/// Output format selected for the copy/export action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CopyFormat {
    Plain,
    Markdown,
    Json,
    Csv,
}

impl Default for CopyFormat {
    fn default() -> Self {
        CopyFormat::Plain
    }
}

impl CopyFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            CopyFormat::Plain => "plain",
            CopyFormat::Markdown => "markdown",
            CopyFormat::Json => "json",
            CopyFormat::Csv => "csv",
        }
    }

    /// Label for the main action button in the popup.
    pub fn button_label(&self) -> &'static str {
        match self {
            CopyFormat::Plain => "Copy URLs",
            CopyFormat::Markdown => "Copy Markdown",
            CopyFormat::Json => "Copy JSON",
            CopyFormat::Csv => "Export CSV",
        }
    }

    /// Short name used in "copied" notifications.
    pub fn notice_label(&self) -> &'static str {
        match self {
            CopyFormat::Plain => "URLs",
            CopyFormat::Markdown => "Markdown",
            CopyFormat::Json => "JSON",
            CopyFormat::Csv => "CSV",
        }
    }
}

/// The two settings fields the formatter reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipboardSettings {
    pub copy_title_enabled: bool,
    pub template: String,
}

#[derive(Serialize, Deserialize)]
struct ExportedTab {
    title: String,
    url: String,
}

/// Format the given tabs in the requested output format.
pub fn format_tabs(tabs: &[TabItem], format: CopyFormat, settings: &ClipboardSettings) -> String {
    match format {
        CopyFormat::Plain => format_plain(tabs, settings),
        CopyFormat::Markdown => format_markdown(tabs),
        CopyFormat::Json => format_json(tabs),
        CopyFormat::Csv => format_csv(tabs),
    }
}

/// One `[title](url)` line per tab. Brackets and parens in the title or URL
/// are emitted verbatim.
pub fn format_markdown(tabs: &[TabItem]) -> String {
    tabs.iter()
        .map(|tab| format!("[{}]({})", tab.title, tab.url))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pretty-printed JSON array of `{title, url}` objects in input order.
pub fn format_json(tabs: &[TabItem]) -> String {
    let rows: Vec<ExportedTab> = tabs
        .iter()
        .map(|tab| ExportedTab {
            title: tab.title.clone(),
            url: tab.url.clone(),
        })
        .collect();

    serde_json::to_string_pretty(&rows).unwrap_or_default()
}

/// CSV with a `title,url` header, every field quote-wrapped and internal
/// quotes doubled. An empty tab list yields the empty string, not a lone
/// header. No trailing newline.
pub fn format_csv(tabs: &[TabItem]) -> String {
    if tabs.is_empty() {
        return String::new();
    }

    let mut rows = Vec::with_capacity(tabs.len() + 1);
    rows.push("title,url".to_string());

    for tab in tabs {
        let fields: Vec<String> = [&tab.title, &tab.url]
            .iter()
            .map(|field| format!("\"{}\"", field.replace('"', "\"\"")))
            .collect();
        rows.push(fields.join(","));
    }

    rows.join("\n")
}

/// Plain-text formatting, driven by the user template when one is set.
///
/// With no template the output is `title - url` or bare `url` per tab,
/// depending on the title toggle. With a template:
/// - toggle on, template lacks `{TITLE}`: the template is considered
///   incomplete for title display and the fixed `title - url` shape is used
///   instead (the template content is deliberately overridden);
/// - toggle on, template has `{TITLE}`: straight substitution;
/// - toggle off: `{TITLE}` is stripped from the template first, taking an
///   adjacent separator with it where possible, then `{URL}` is substituted.
pub fn format_plain(tabs: &[TabItem], settings: &ClipboardSettings) -> String {
    if !settings.template.is_empty() {
        let has_title = settings.template.contains(TITLE_PLACEHOLDER);

        if settings.copy_title_enabled && !has_title {
            return tabs
                .iter()
                .map(|tab| format!("{} - {}", tab.title, tab.url))
                .collect::<Vec<_>>()
                .join("\n");
        }

        let effective_template = if settings.copy_title_enabled {
            settings.template.clone()
        } else {
            strip_title_placeholder(&settings.template)
        };
        return apply_template(tabs, &effective_template);
    }

    if settings.copy_title_enabled {
        tabs.iter()
            .map(|tab| format!("{} - {}", tab.title, tab.url))
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        tabs.iter()
            .map(|tab| tab.url.clone())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn apply_template(tabs: &[TabItem], template: &str) -> String {
    tabs.iter()
        .map(|tab| {
            template
                .replace(TITLE_PLACEHOLDER, &tab.title)
                .replace(URL_PLACEHOLDER, &tab.url)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Remove every `{TITLE}` from a template, preferring to also swallow an
/// adjacent dash/colon separator and its whitespace. The pass order matters:
/// later passes assume earlier ones already removed the separator cases.
pub fn strip_title_placeholder(template: &str) -> String {
    static STRIP_PASSES: OnceLock<[Regex; 5]> = OnceLock::new();
    let passes = STRIP_PASSES.get_or_init(|| {
        [
            // Title with a trailing separator ("{TITLE} - ", "{TITLE}: ")
            Regex::new(r"\{TITLE\}\s*[-–—:]\s*").expect("strip pattern"),
            // Separator followed by the title (" - {TITLE}")
            Regex::new(r"[-–—:]\s*\{TITLE\}").expect("strip pattern"),
            // Title with trailing whitespace
            Regex::new(r"\{TITLE\}\s*").expect("strip pattern"),
            // Leading whitespace then title
            Regex::new(r"\s*\{TITLE\}").expect("strip pattern"),
            // Any placeholder still standing
            Regex::new(r"\{TITLE\}").expect("strip pattern"),
        ]
    });

    let mut cleaned = template.to_string();
    for pass in passes {
        cleaned = pass.replace_all(&cleaned, "").into_owned();
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tab(title: &str, url: &str) -> TabItem {
        TabItem::new(0, url.to_string(), title.to_string(), false)
    }

    fn settings(copy_title_enabled: bool, template: &str) -> ClipboardSettings {
        ClipboardSettings {
            copy_title_enabled,
            template: template.to_string(),
        }
    }

    #[test]
    fn test_plain_no_template_urls_only() {
        let tabs = vec![tab("A", "http://a.com")];
        assert_eq!(format_plain(&tabs, &settings(false, "")), "http://a.com");
    }

    #[test]
    fn test_plain_no_template_with_titles() {
        let tabs = vec![tab("A", "http://a.com"), tab("B", "http://b.com")];
        assert_eq!(
            format_plain(&tabs, &settings(true, "")),
            "A - http://a.com\nB - http://b.com"
        );
    }

    #[test]
    fn test_plain_template_substitutes_both_placeholders() {
        let tabs = vec![tab("A", "http://a.com")];
        assert_eq!(
            format_plain(&tabs, &settings(true, "{TITLE} | {URL}")),
            "A | http://a.com"
        );
    }

    #[test]
    fn test_plain_template_substitutes_all_occurrences() {
        let tabs = vec![tab("A", "http://a.com")];
        assert_eq!(
            format_plain(&tabs, &settings(true, "{URL} {TITLE} {URL}")),
            "http://a.com A http://a.com"
        );
    }

    #[test]
    fn test_plain_template_without_title_forces_fixed_format() {
        // The user template is overridden when the toggle asks for titles
        // but the template has nowhere to put one.
        let tabs = vec![tab("A", "http://a.com")];
        assert_eq!(
            format_plain(&tabs, &settings(true, "* {URL}")),
            "A - http://a.com"
        );
    }

    #[test]
    fn test_plain_template_title_stripped_when_toggle_off() {
        let tabs = vec![tab("A", "http://a.com")];
        assert_eq!(
            format_plain(&tabs, &settings(false, "{TITLE} - {URL}")),
            "http://a.com"
        );
    }

    #[test]
    fn test_plain_template_is_case_sensitive() {
        let tabs = vec![tab("A", "http://a.com")];
        assert_eq!(
            format_plain(&tabs, &settings(true, "{title} {TITLE}")),
            "{title} A"
        );
    }

    #[test]
    fn test_strip_removes_trailing_separator() {
        assert_eq!(strip_title_placeholder("{TITLE} - {URL}"), "{URL}");
        assert_eq!(strip_title_placeholder("{TITLE}: {URL}"), "{URL}");
        assert_eq!(strip_title_placeholder("{TITLE} — {URL}"), "{URL}");
    }

    #[test]
    fn test_strip_removes_preceding_separator() {
        assert_eq!(strip_title_placeholder("{URL} - {TITLE}"), "{URL} ");
    }

    #[test]
    fn test_strip_bare_placeholder() {
        assert_eq!(strip_title_placeholder("{TITLE}{URL}"), "{URL}");
    }

    #[test]
    fn test_strip_adjacent_placeholders() {
        // The first pass consumes "{TITLE}:" and the colon belonging to the
        // second placeholder; pass order is load-bearing here.
        assert_eq!(strip_title_placeholder("{TITLE}:{TITLE}"), "");
    }

    #[test]
    fn test_strip_without_placeholder_is_identity() {
        assert_eq!(strip_title_placeholder("{URL} | done"), "{URL} | done");
        assert_eq!(strip_title_placeholder(""), "");
    }

    #[test]
    fn test_markdown() {
        let tabs = vec![tab("A", "http://a.com"), tab("B", "http://b.com")];
        assert_eq!(
            format_markdown(&tabs),
            "[A](http://a.com)\n[B](http://b.com)"
        );
    }

    #[test]
    fn test_markdown_no_escaping() {
        let tabs = vec![tab("A [draft]", "http://a.com/x(1)")];
        assert_eq!(format_markdown(&tabs), "[A [draft]](http://a.com/x(1))");
    }

    #[test]
    fn test_json_round_trip() {
        let tabs = vec![tab("A \"quoted\"", "http://a.com"), tab("B", "http://b.com")];
        let out = format_json(&tabs);

        let parsed: Vec<ExportedTab> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].title, "A \"quoted\"");
        assert_eq!(parsed[0].url, "http://a.com");
        assert_eq!(parsed[1].url, "http://b.com");
    }

    #[test]
    fn test_json_pretty_printed() {
        let out = format_json(&[tab("A", "http://a.com")]);
        assert!(out.starts_with("[\n  {"));
    }

    #[test]
    fn test_csv_empty_input_has_no_header() {
        assert_eq!(format_csv(&[]), "");
    }

    #[test]
    fn test_csv_header_and_rows() {
        let tabs = vec![tab("A", "http://a.com"), tab("B", "http://b.com")];
        let out = format_csv(&tabs);
        let lines: Vec<&str> = out.split('\n').collect();

        assert_eq!(lines.len(), tabs.len() + 1);
        assert_eq!(lines[0], "title,url");
        assert_eq!(lines[1], "\"A\",\"http://a.com\"");
        assert!(!out.ends_with('\n'));
    }

    #[test]
    fn test_csv_doubles_internal_quotes() {
        let tabs = vec![tab("Say \"hi\"", "http://a.com")];
        let out = format_csv(&tabs);
        assert_eq!(out.split('\n').nth(1).unwrap(), "\"Say \"\"hi\"\"\",\"http://a.com\"");
    }

    #[test]
    fn test_format_tabs_dispatch() {
        let tabs = vec![tab("A", "http://a.com")];
        let plain = settings(false, "");

        assert_eq!(format_tabs(&tabs, CopyFormat::Plain, &plain), "http://a.com");
        assert_eq!(
            format_tabs(&tabs, CopyFormat::Markdown, &plain),
            "[A](http://a.com)"
        );
        assert!(format_tabs(&tabs, CopyFormat::Json, &plain).contains("\"url\": \"http://a.com\""));
        assert!(format_tabs(&tabs, CopyFormat::Csv, &plain).starts_with("title,url"));
    }

    #[test]
    fn test_copy_format_serde_lowercase() {
        assert_eq!(serde_json::to_string(&CopyFormat::Markdown).unwrap(), "\"markdown\"");
        let back: CopyFormat = serde_json::from_str("\"csv\"").unwrap();
        assert_eq!(back, CopyFormat::Csv);
    }

    #[test]
    fn test_empty_fields_render_empty() {
        let tabs = vec![tab("", "")];
        assert_eq!(format_plain(&tabs, &settings(true, "")), " - ");
        assert_eq!(format_markdown(&tabs), "[]()");
        assert_eq!(format_csv(&tabs), "title,url\n\"\",\"\"");
    }
}

/// Heuristic URL extraction from freeform text.
///
/// Input may be pasted text or the decoded contents of an uploaded
/// .txt/.csv/.json file. The text is classified into exactly one of five
/// shapes, tried in a fixed priority order; the first strategy that matches
/// wins and later ones are never consulted. Precision on the cleanest shape
/// is preferred over recall: a JSON blob full of commas must not be read as
/// CSV, so JSON is tried before CSV.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

/// Extract an ordered list of URLs from an arbitrary text blob.
///
/// Order of appearance is preserved and duplicates are kept. Never fails:
/// unrecognizable input yields whatever the fallback scan finds, possibly
/// nothing.
pub fn extract_urls(text: &str) -> Vec<String> {
    let detectors: [fn(&str) -> Option<Vec<String>>; 4] =
        [plain_url_lines, markdown_links, json_array, csv_lines];

    for detect in detectors {
        if let Some(urls) = detect(text) {
            return urls;
        }
    }

    fallback_scan(text)
}

fn is_http_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

fn trimmed_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Strategy 1: every non-blank line is a bare URL.
///
/// All-or-nothing on purpose: a single stray line (a comment, a header)
/// disqualifies the whole blob and sends it to the lower-priority
/// strategies, even if most lines are valid URLs.
fn plain_url_lines(text: &str) -> Option<Vec<String>> {
    let lines = trimmed_lines(text);
    if lines.iter().all(|line| is_http_url(line)) {
        Some(lines.into_iter().map(String::from).collect())
    } else {
        None
    }
}

/// Strategy 2: Markdown links `[text](http...)` anywhere in the text.
fn markdown_links(text: &str) -> Option<Vec<String>> {
    static MD_LINK: OnceLock<Regex> = OnceLock::new();
    let re = MD_LINK
        .get_or_init(|| Regex::new(r"\[.*?\]\((https?://[^\s)]+)\)").expect("markdown pattern"));

    let urls: Vec<String> = re
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect();

    if urls.is_empty() { None } else { Some(urls) }
}

/// Strategy 3: a JSON array of objects carrying a `url` property.
///
/// A parse failure or a non-array document is not an error, it just means
/// the text was not this shape.
fn json_array(text: &str) -> Option<Vec<String>> {
    let parsed: Value = serde_json::from_str(text).ok()?;
    let items = parsed.as_array()?;

    let urls: Vec<String> = items.iter().filter_map(json_url).collect();
    if urls.is_empty() { None } else { Some(urls) }
}

fn json_url(item: &Value) -> Option<String> {
    let url = match item.get("url")? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if url.is_empty() { None } else { Some(url) }
}

/// Strategy 4: CSV-ish lines where the second field is a URL.
///
/// Only comma-containing lines are considered; the second field has one
/// leading and one trailing quote stripped, is trimmed, and must carry an
/// http(s) prefix. A `title,url` header row fails the prefix check and
/// drops out naturally.
fn csv_lines(text: &str) -> Option<Vec<String>> {
    let urls: Vec<String> = trimmed_lines(text)
        .into_iter()
        .filter(|line| line.contains(','))
        .filter_map(|line| {
            let field = line.split(',').nth(1)?;
            let field = field.strip_prefix('"').unwrap_or(field);
            let field = field.strip_suffix('"').unwrap_or(field);
            let url = field.trim();
            if is_http_url(url) {
                Some(url.to_string())
            } else {
                None
            }
        })
        .collect();

    if urls.is_empty() { None } else { Some(urls) }
}

/// Strategy 5: unconditional scan for anything URL-shaped.
fn fallback_scan(text: &str) -> Vec<String> {
    static URL_SCAN: OnceLock<Regex> = OnceLock::new();
    let re = URL_SCAN
        .get_or_init(|| Regex::new(r#"https?://[^\s<>"'`]+"#).expect("url pattern"));

    re.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

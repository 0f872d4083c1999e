/// Domain labels for grouped tab rendering and tab-group titles.

use url::Url;

use crate::tab_data::TabItem;

/// Bucket for tabs whose URL cannot be parsed or has no hostname.
pub const OTHER_GROUP: &str = "Other";

/// Group label for a tab URL: the hostname with a leading `www.` stripped
/// (case-insensitively), or [`OTHER_GROUP`] when there is no usable
/// hostname (about:blank, chrome:// pages, garbage).
pub fn group_label(url: &str) -> String {
    hostname(url)
        .map(|host| strip_www(&host).to_string())
        .unwrap_or_else(|| OTHER_GROUP.to_string())
}

/// Title for a new browser tab group, taken from the first selected tab:
/// its hostname when the URL parses, otherwise its title, otherwise a
/// generic fallback.
pub fn group_title(tab: &TabItem) -> String {
    if let Some(host) = hostname(&tab.url) {
        return strip_www(&host).to_string();
    }
    if !tab.title.is_empty() {
        return tab.title.clone();
    }
    "Tab Group".to_string()
}

fn hostname(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Some(host.to_string()),
        _ => None,
    }
}

fn strip_www(host: &str) -> &str {
    let is_www = host.len() > 4
        && host
            .get(..4)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("www."));
    if is_www { &host[4..] } else { host }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_label_strips_www() {
        assert_eq!(group_label("https://www.google.com/search"), "google.com");
        assert_eq!(group_label("https://WWW.Example.com/"), "example.com");
    }

    #[test]
    fn test_group_label_keeps_other_subdomains() {
        assert_eq!(group_label("https://mail.google.com"), "mail.google.com");
    }

    #[test]
    fn test_group_label_unparsable_url() {
        assert_eq!(group_label("not a url"), OTHER_GROUP);
        assert_eq!(group_label(""), OTHER_GROUP);
    }

    #[test]
    fn test_group_label_no_hostname() {
        assert_eq!(group_label("about:blank"), OTHER_GROUP);
    }

    #[test]
    fn test_group_label_port_and_localhost() {
        assert_eq!(group_label("http://localhost:3000/app"), "localhost");
        assert_eq!(group_label("http://127.0.0.1:8080"), "127.0.0.1");
    }

    #[test]
    fn test_group_title_prefers_hostname() {
        let tab = TabItem::new(
            1,
            "https://www.github.com/x".to_string(),
            "GitHub".to_string(),
            false,
        );
        assert_eq!(group_title(&tab), "github.com");
    }

    #[test]
    fn test_group_title_falls_back_to_title() {
        let tab = TabItem::new(1, "nope".to_string(), "My Tab".to_string(), false);
        assert_eq!(group_title(&tab), "My Tab");
    }

    #[test]
    fn test_group_title_generic_fallback() {
        let tab = TabItem::new(1, "nope".to_string(), String::new(), false);
        assert_eq!(group_title(&tab), "Tab Group");
    }
}

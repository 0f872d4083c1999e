/// Data structures for Tab Grab

use serde::{Deserialize, Serialize};

/// A browser tab as shown in the popup list.
///
/// Field names follow the browser's tab objects (camelCase) so the result of
/// `browser.tabs.query` deserializes directly; fields the browser omits
/// (`selected`) fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TabItem {
    pub id: i32,
    pub title: String,
    pub url: String,
    pub fav_icon_url: String,
    pub selected: bool,
    pub pinned: bool,
    pub active: bool,
    pub window_id: i32,
}

impl TabItem {
    pub fn new(id: i32, url: String, title: String, pinned: bool) -> TabItem {
        TabItem {
            id,
            title,
            url,
            pinned,
            ..TabItem::default()
        }
    }

    /// Normalize a freshly queried tab: blank titles become "Untitled" and
    /// any selection state the browser happened to carry is cleared.
    pub fn normalized(mut self) -> Self {
        if self.title.is_empty() {
            self.title = "Untitled".to_string();
        }
        self.selected = false;
        self
    }
}

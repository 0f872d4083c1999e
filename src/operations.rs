/// Tab list operations: filtering, selection, grouping, pin/group plans.
///
/// Everything here is pure. The popup holds the full tab list in state,
/// derives the visible view through these functions, and hands the
/// resulting id lists to the browser bridge.

use std::collections::BTreeMap;

use crate::domain::{self, group_label};
use crate::settings::ActiveFilter;
use crate::tab_data::TabItem;

/// The nine colors the tabGroups API accepts.
pub const TAB_GROUP_COLORS: [&str; 9] = [
    "grey", "blue", "red", "yellow", "green", "pink", "purple", "cyan", "orange",
];

/// Tabs visible under the current filter and search query.
///
/// The pinned filter shows only pinned tabs; the all filter optionally
/// hides them. The query is a case-insensitive substring match over title
/// and URL.
pub fn visible_tabs(
    tabs: &[TabItem],
    filter: ActiveFilter,
    hide_pinned: bool,
    query: &str,
) -> Vec<TabItem> {
    let base = tabs.iter().filter(|tab| match filter {
        ActiveFilter::Pinned => tab.pinned,
        ActiveFilter::All => !(hide_pinned && tab.pinned),
    });

    let query = query.to_lowercase();
    base.filter(|tab| {
        query.is_empty()
            || tab.title.to_lowercase().contains(&query)
            || tab.url.to_lowercase().contains(&query)
    })
    .cloned()
    .collect()
}

/// Checkbox state for the select-all control over the visible tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectAllState {
    pub checked: bool,
    pub indeterminate: bool,
}

pub fn select_all_state(visible: &[TabItem]) -> SelectAllState {
    let selected = visible.iter().filter(|tab| tab.selected).count();
    SelectAllState {
        checked: !visible.is_empty() && selected == visible.len(),
        indeterminate: selected > 0 && selected < visible.len(),
    }
}

/// Toggle select-all: if every visible tab is selected, deselect them all,
/// otherwise select them all. Tabs outside the visible view keep their
/// state.
pub fn toggle_select_all(tabs: &mut [TabItem], visible: &[TabItem]) {
    let all_selected = !visible.is_empty() && visible.iter().all(|tab| tab.selected);
    let target = !all_selected;

    for tab in tabs.iter_mut() {
        if visible.iter().any(|v| v.id == tab.id) {
            tab.selected = target;
        }
    }
}

/// Flip the selection of a single tab.
pub fn toggle_selection(tabs: &mut [TabItem], tab_id: i32) {
    if let Some(tab) = tabs.iter_mut().find(|tab| tab.id == tab_id) {
        tab.selected = !tab.selected;
    }
}

/// Shift-click range selection: select every tab between the anchor and the
/// target in the visible view (inclusive, either direction). Returns false
/// when either endpoint is not visible, in which case the caller should
/// fall back to a plain toggle.
pub fn select_range(
    tabs: &mut [TabItem],
    visible: &[TabItem],
    anchor_id: i32,
    target_id: i32,
) -> bool {
    let anchor = visible.iter().position(|tab| tab.id == anchor_id);
    let target = visible.iter().position(|tab| tab.id == target_id);

    let (Some(anchor), Some(target)) = (anchor, target) else {
        return false;
    };

    let (start, end) = if anchor <= target {
        (anchor, target)
    } else {
        (target, anchor)
    };

    for visible_tab in &visible[start..=end] {
        if let Some(tab) = tabs.iter_mut().find(|tab| tab.id == visible_tab.id) {
            tab.selected = true;
        }
    }
    true
}

pub fn selected_tabs(tabs: &[TabItem]) -> Vec<TabItem> {
    tabs.iter().filter(|tab| tab.selected).cloned().collect()
}

/// Visible tabs bucketed by domain label, groups sorted lexicographically,
/// tabs in original order within each group.
pub fn group_tabs_by_domain(visible: &[TabItem]) -> Vec<(String, Vec<TabItem>)> {
    let mut groups: BTreeMap<String, Vec<TabItem>> = BTreeMap::new();
    for tab in visible {
        groups
            .entry(group_label(&tab.url))
            .or_default()
            .push(tab.clone());
    }
    groups.into_iter().collect()
}

/// Toggle every tab whose domain label matches, for the group-header
/// checkbox in grouped view.
pub fn toggle_group(tabs: &mut [TabItem], label: &str) {
    for tab in tabs.iter_mut() {
        if group_label(&tab.url) == label {
            tab.selected = !tab.selected;
        }
    }
}

/// Pin plan for the selected tabs: each gets its pinned state flipped.
pub fn pin_updates(selected: &[TabItem]) -> Vec<(i32, bool)> {
    selected.iter().map(|tab| (tab.id, !tab.pinned)).collect()
}

/// What to create when grouping the selected tabs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpec {
    pub tab_ids: Vec<i32>,
    pub title: String,
    pub color: &'static str,
}

/// Build a tab-group plan from the selection. The title comes from the
/// first selected tab and the color from `color_index` (the caller rolls
/// the dice), wrapped into the palette.
pub fn group_spec(selected: &[TabItem], color_index: usize) -> Option<GroupSpec> {
    let first = selected.first()?;
    Some(GroupSpec {
        tab_ids: selected.iter().map(|tab| tab.id).collect(),
        title: domain::group_title(first),
        color: TAB_GROUP_COLORS[color_index % TAB_GROUP_COLORS.len()],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tab(id: i32, url: &str, title: &str, pinned: bool) -> TabItem {
        TabItem::new(id, url.to_string(), title.to_string(), pinned)
    }

    fn sample_tabs() -> Vec<TabItem> {
        vec![
            tab(1, "https://www.google.com/search", "Google", false),
            tab(2, "https://github.com/yewstack", "Yew", true),
            tab(3, "https://mail.google.com", "Gmail", false),
            tab(4, "about:blank", "Blank", false),
        ]
    }

    #[test]
    fn test_visible_tabs_all() {
        let tabs = sample_tabs();
        let visible = visible_tabs(&tabs, ActiveFilter::All, false, "");
        assert_eq!(visible.len(), 4);
    }

    #[test]
    fn test_visible_tabs_pinned_filter() {
        let tabs = sample_tabs();
        let visible = visible_tabs(&tabs, ActiveFilter::Pinned, false, "");
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 2);
    }

    #[test]
    fn test_visible_tabs_hide_pinned() {
        let tabs = sample_tabs();
        let visible = visible_tabs(&tabs, ActiveFilter::All, true, "");
        assert!(visible.iter().all(|tab| !tab.pinned));
        assert_eq!(visible.len(), 3);
    }

    #[test]
    fn test_visible_tabs_search_matches_title_and_url() {
        let tabs = sample_tabs();

        let by_title = visible_tabs(&tabs, ActiveFilter::All, false, "gmail");
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].id, 3);

        let by_url = visible_tabs(&tabs, ActiveFilter::All, false, "GOOGLE.COM");
        assert_eq!(by_url.len(), 2);
    }

    #[test]
    fn test_select_all_state() {
        let mut visible = visible_tabs(&sample_tabs(), ActiveFilter::All, false, "");

        assert_eq!(select_all_state(&visible), SelectAllState::default());

        visible[0].selected = true;
        let state = select_all_state(&visible);
        assert!(!state.checked);
        assert!(state.indeterminate);

        for tab in visible.iter_mut() {
            tab.selected = true;
        }
        let state = select_all_state(&visible);
        assert!(state.checked);
        assert!(!state.indeterminate);

        assert_eq!(select_all_state(&[]), SelectAllState::default());
    }

    #[test]
    fn test_toggle_select_all_only_touches_visible() {
        let mut tabs = sample_tabs();
        let visible = visible_tabs(&tabs, ActiveFilter::All, true, "");

        toggle_select_all(&mut tabs, &visible);

        // The pinned tab is hidden and stays unselected.
        assert!(tabs.iter().filter(|t| t.id != 2).all(|t| t.selected));
        assert!(!tabs.iter().find(|t| t.id == 2).unwrap().selected);

        toggle_select_all(&mut tabs, &visible);
        assert!(tabs.iter().all(|t| !t.selected));
    }

    #[test]
    fn test_toggle_selection() {
        let mut tabs = sample_tabs();
        toggle_selection(&mut tabs, 3);
        assert!(tabs[2].selected);
        toggle_selection(&mut tabs, 3);
        assert!(!tabs[2].selected);

        // Unknown id is a no-op
        toggle_selection(&mut tabs, 99);
        assert!(tabs.iter().all(|t| !t.selected));
    }

    #[test]
    fn test_select_range() {
        let mut tabs = sample_tabs();
        let visible = visible_tabs(&tabs, ActiveFilter::All, false, "");

        assert!(select_range(&mut tabs, &visible, 4, 2));
        assert!(!tabs[0].selected);
        assert!(tabs[1].selected);
        assert!(tabs[2].selected);
        assert!(tabs[3].selected);
    }

    #[test]
    fn test_select_range_missing_endpoint() {
        let mut tabs = sample_tabs();
        let visible = visible_tabs(&tabs, ActiveFilter::Pinned, false, "");

        // Tab 1 is not visible under the pinned filter.
        assert!(!select_range(&mut tabs, &visible, 1, 2));
        assert!(tabs.iter().all(|t| !t.selected));
    }

    #[test]
    fn test_group_tabs_by_domain() {
        let tabs = sample_tabs();
        let groups = group_tabs_by_domain(&tabs);

        let labels: Vec<&str> = groups.iter().map(|(label, _)| label.as_str()).collect();
        assert_eq!(labels, vec!["Other", "github.com", "google.com", "mail.google.com"]);

        let google = &groups.iter().find(|(l, _)| l == "google.com").unwrap().1;
        assert_eq!(google.len(), 1);
        assert_eq!(google[0].id, 1);
    }

    #[test]
    fn test_toggle_group() {
        let mut tabs = sample_tabs();
        toggle_group(&mut tabs, "google.com");

        assert!(tabs[0].selected);
        assert!(!tabs[1].selected);
        assert!(!tabs[2].selected); // mail.google.com is its own group

        toggle_group(&mut tabs, "google.com");
        assert!(!tabs[0].selected);
    }

    #[test]
    fn test_pin_updates_flip_each_tab() {
        let tabs = sample_tabs();
        let selected = vec![tabs[0].clone(), tabs[1].clone()];

        assert_eq!(pin_updates(&selected), vec![(1, true), (2, false)]);
    }

    #[test]
    fn test_group_spec() {
        let tabs = sample_tabs();
        let selected = vec![tabs[0].clone(), tabs[2].clone()];

        let spec = group_spec(&selected, 12).unwrap();
        assert_eq!(spec.tab_ids, vec![1, 3]);
        assert_eq!(spec.title, "google.com");
        // Index wraps into the palette
        assert_eq!(spec.color, TAB_GROUP_COLORS[3]);
    }

    #[test]
    fn test_group_spec_empty_selection() {
        assert_eq!(group_spec(&[], 0), None);
    }
}

/// Popup UI for the Tab Grab extension

use patternfly_yew::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::extract::extract_urls;
use crate::format::{self, CopyFormat};
use crate::operations::{
    SelectAllState, TAB_GROUP_COLORS, group_spec, group_tabs_by_domain, pin_updates,
    select_all_state, select_range, selected_tabs, toggle_group, toggle_select_all,
    toggle_selection, visible_tabs,
};
use crate::settings::{ActiveFilter, SETTINGS_BUCKET, Settings};
use crate::tab_data::TabItem;

// Import JS bridge functions
#[wasm_bindgen(module = "/popup.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn queryTabs(current_window_only: bool) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn updateTabPinned(tab_id: i32, pinned: bool) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn groupTabs(tab_ids: JsValue, title: &str, color: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn openTab(url: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn writeClipboard(text: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn downloadFile(content: &str, file_name: &str, mime_type: &str)
    -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn pickLinksFile() -> Result<JsValue, JsValue>;
}

#[derive(Clone, PartialEq)]
enum AppState {
    Idle,
    Loading(String),
    Notice(String),
    Error(String),
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| AppState::Idle);
    let settings = use_state(Settings::default);
    let tabs = use_state(Vec::<TabItem>::new);
    let search_query = use_state(String::new);
    let last_clicked = use_state(|| None::<i32>);
    let modal_open = use_state(|| false);
    let links_text = use_state(String::new);

    // Load settings and tabs on mount
    {
        let state = state.clone();
        let settings = settings.clone();
        let tabs = tabs.clone();
        use_effect_with((), move |_| {
            state.set(AppState::Loading("Loading tabs...".to_string()));
            spawn_local(async move {
                let loaded = load_settings().await.unwrap_or_else(|err| {
                    log::warn!("using default settings: {}", err);
                    Settings::default()
                });
                match load_tabs(loaded.current_window_only).await {
                    Ok(loaded_tabs) => {
                        settings.set(loaded);
                        tabs.set(loaded_tabs);
                        state.set(AppState::Idle);
                    }
                    Err(err) => state.set(AppState::Error(err)),
                }
            });
            || ()
        });
    }

    let visible = visible_tabs(
        &tabs,
        settings.active_filter,
        settings.is_hide_pinned_enabled,
        &search_query,
    );
    let all_count = tabs.len();
    let pinned_count = tabs.iter().filter(|tab| tab.pinned).count();
    let selection = selected_tabs(&tabs);
    let select_state = select_all_state(&visible);
    let is_busy = matches!(*state, AppState::Loading(_));

    // Persist a settings change and update state
    let save = {
        let settings = settings.clone();
        move |updated: Settings| {
            settings.set(updated.clone());
            spawn_local(async move {
                if let Err(err) = save_settings(&updated).await {
                    log::error!("failed to save settings: {}", err);
                }
            });
        }
    };

    let on_search = {
        let search_query = search_query.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            search_query.set(input.value());
        })
    };

    let on_filter = {
        let save = save.clone();
        let settings = settings.clone();
        move |filter: ActiveFilter| {
            let save = save.clone();
            let settings = settings.clone();
            Callback::from(move |_: MouseEvent| {
                let mut updated = (*settings).clone();
                updated.active_filter = filter;
                save(updated);
            })
        }
    };

    let on_toggle_grouping = {
        let save = save.clone();
        let settings = settings.clone();
        Callback::from(move |_: MouseEvent| {
            let mut updated = (*settings).clone();
            updated.is_grouping_enabled = !updated.is_grouping_enabled;
            save(updated);
        })
    };

    let on_toggle_hide_pinned = {
        let save = save.clone();
        let settings = settings.clone();
        Callback::from(move |_: MouseEvent| {
            let mut updated = (*settings).clone();
            updated.is_hide_pinned_enabled = !updated.is_hide_pinned_enabled;
            save(updated);
        })
    };

    let on_toggle_current_window = {
        let save = save.clone();
        let settings = settings.clone();
        let tabs = tabs.clone();
        let state = state.clone();
        Callback::from(move |_: MouseEvent| {
            let mut updated = (*settings).clone();
            updated.current_window_only = !updated.current_window_only;
            let current_window_only = updated.current_window_only;
            save(updated);

            // The window scope changed, so the tab list must be requeried
            let tabs = tabs.clone();
            let state = state.clone();
            state.set(AppState::Loading("Loading tabs...".to_string()));
            spawn_local(async move {
                match load_tabs(current_window_only).await {
                    Ok(reloaded) => {
                        tabs.set(reloaded);
                        state.set(AppState::Idle);
                    }
                    Err(err) => state.set(AppState::Error(err)),
                }
            });
        })
    };

    let on_format = {
        let save = save.clone();
        let settings = settings.clone();
        move |fmt: CopyFormat| {
            let save = save.clone();
            let settings = settings.clone();
            Callback::from(move |_: MouseEvent| {
                let mut updated = (*settings).clone();
                updated.selected_copy_format = fmt;
                save(updated);
            })
        }
    };

    let on_select_all = {
        let tabs = tabs.clone();
        let visible = visible.clone();
        Callback::from(move |_: MouseEvent| {
            let mut updated = (*tabs).clone();
            toggle_select_all(&mut updated, &visible);
            tabs.set(updated);
        })
    };

    let on_toggle_tab = {
        let tabs = tabs.clone();
        let visible = visible.clone();
        let last_clicked = last_clicked.clone();
        move |tab_id: i32| {
            let tabs = tabs.clone();
            let visible = visible.clone();
            let last_clicked = last_clicked.clone();
            Callback::from(move |e: MouseEvent| {
                let mut updated = (*tabs).clone();
                let ranged = e.shift_key()
                    && matches!(*last_clicked, Some(anchor) if anchor != tab_id)
                    && select_range(
                        &mut updated,
                        &visible,
                        (*last_clicked).unwrap_or(tab_id),
                        tab_id,
                    );
                if !ranged {
                    toggle_selection(&mut updated, tab_id);
                    last_clicked.set(Some(tab_id));
                }
                tabs.set(updated);
            })
        }
    };

    let on_toggle_group = {
        let tabs = tabs.clone();
        move |label: String| {
            let tabs = tabs.clone();
            Callback::from(move |_: MouseEvent| {
                let mut updated = (*tabs).clone();
                toggle_group(&mut updated, &label);
                tabs.set(updated);
            })
        }
    };

    let on_copy = {
        let state = state.clone();
        let settings = settings.clone();
        let selection = selection.clone();
        Callback::from(move |_: MouseEvent| {
            if selection.is_empty() {
                return;
            }
            let state = state.clone();
            let format_kind = settings.selected_copy_format;
            let output = format::format_tabs(&selection, format_kind, &settings.clipboard());

            spawn_local(async move {
                let result = match format_kind {
                    CopyFormat::Csv => {
                        downloadFile(&output, format::CSV_EXPORT_FILENAME, format::CSV_MIME_TYPE)
                            .await
                            .map(|_| "CSV file exported".to_string())
                    }
                    _ => writeClipboard(&output)
                        .await
                        .map(|_| format!("Selected {} copied", format_kind.notice_label())),
                };
                match result {
                    Ok(notice) => state.set(AppState::Notice(notice)),
                    Err(err) => state.set(AppState::Error(format!("Copy failed: {:?}", err))),
                }
            });
        })
    };

    let on_pin = {
        let state = state.clone();
        let tabs = tabs.clone();
        let settings = settings.clone();
        let selection = selection.clone();
        Callback::from(move |_: MouseEvent| {
            if selection.is_empty() {
                return;
            }
            let state = state.clone();
            let tabs = tabs.clone();
            let updates = pin_updates(&selection);
            let current_window_only = settings.current_window_only;

            state.set(AppState::Loading("Updating pins...".to_string()));
            spawn_local(async move {
                for (tab_id, pinned) in updates {
                    if let Err(err) = updateTabPinned(tab_id, pinned).await {
                        state.set(AppState::Error(format!("Pin failed: {:?}", err)));
                        return;
                    }
                }
                match load_tabs(current_window_only).await {
                    Ok(reloaded) => {
                        tabs.set(reloaded);
                        state.set(AppState::Idle);
                    }
                    Err(err) => state.set(AppState::Error(err)),
                }
            });
        })
    };

    let on_group_tabs = {
        let state = state.clone();
        let selection = selection.clone();
        Callback::from(move |_: MouseEvent| {
            let color_index = (js_sys::Math::random() * TAB_GROUP_COLORS.len() as f64) as usize;
            let Some(spec) = group_spec(&selection, color_index) else {
                return;
            };
            let state = state.clone();

            spawn_local(async move {
                let ids = match serde_wasm_bindgen::to_value(&spec.tab_ids) {
                    Ok(ids) => ids,
                    Err(err) => {
                        state.set(AppState::Error(format!("Group failed: {:?}", err)));
                        return;
                    }
                };
                match groupTabs(ids, &spec.title, spec.color).await {
                    Ok(_) => state.set(AppState::Notice(format!("Grouped as {}", spec.title))),
                    Err(err) => state.set(AppState::Error(format!("Group failed: {:?}", err))),
                }
            });
        })
    };

    let on_open_modal = {
        let modal_open = modal_open.clone();
        Callback::from(move |_: MouseEvent| modal_open.set(true))
    };

    let on_close_modal = {
        let modal_open = modal_open.clone();
        let links_text = links_text.clone();
        Callback::from(move |_: MouseEvent| {
            modal_open.set(false);
            links_text.set(String::new());
        })
    };

    let on_links_input = {
        let links_text = links_text.clone();
        Callback::from(move |e: InputEvent| {
            let area: HtmlTextAreaElement = e.target_unchecked_into();
            links_text.set(area.value());
        })
    };

    let on_upload = {
        let state = state.clone();
        let links_text = links_text.clone();
        Callback::from(move |_: MouseEvent| {
            let state = state.clone();
            let links_text = links_text.clone();
            spawn_local(async move {
                let text = match pickLinksFile().await {
                    Ok(value) => value.as_string().unwrap_or_default(),
                    Err(err) => {
                        state.set(AppState::Error(format!("Failed to read file: {:?}", err)));
                        return;
                    }
                };
                let urls = extract_urls(&text);
                if urls.is_empty() {
                    state.set(AppState::Error("No valid URLs found in the file".to_string()));
                    return;
                }
                let joined = urls.join("\n");
                let merged = if links_text.is_empty() {
                    joined
                } else {
                    format!("{}\n{}", *links_text, joined)
                };
                links_text.set(merged);
            });
        })
    };

    let on_open_links = {
        let state = state.clone();
        let modal_open = modal_open.clone();
        let links_text = links_text.clone();
        Callback::from(move |_: MouseEvent| {
            if links_text.trim().is_empty() {
                return;
            }
            let links = extract_urls(&links_text);
            if links.is_empty() {
                state.set(AppState::Error("No valid URLs found".to_string()));
                return;
            }
            let state = state.clone();
            let modal_open = modal_open.clone();
            let links_text = links_text.clone();
            spawn_local(async move {
                for link in &links {
                    if let Err(err) = openTab(link).await {
                        log::warn!("failed to open {}: {:?}", link, err);
                    }
                }
                links_text.set(String::new());
                modal_open.set(false);
                state.set(AppState::Notice(format!("Opened {} links", links.len())));
            });
        })
    };

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Tab Grab"}</h1>

            // Search and open-links row
            <div class="toolbar-row">
                <input
                    type="text"
                    class="search-input"
                    placeholder="Search tabs by title or URL..."
                    value={(*search_query).clone()}
                    oninput={on_search}
                />
                <Button onclick={on_open_modal} variant={ButtonVariant::Primary}>
                    {"Open URLs"}
                </Button>
            </div>

            // Filter tabs
            <div class="pf-v5-c-tabs tabs-nav">
                <ul class="pf-v5-c-tabs__list">
                    <li class={filter_tab_class(settings.active_filter == ActiveFilter::All)}>
                        <button class="pf-v5-c-tabs__link" onclick={on_filter(ActiveFilter::All)}>
                            <span class="pf-v5-c-tabs__item-text">
                                {format!("All Tabs ({})", all_count)}
                            </span>
                        </button>
                    </li>
                    <li class={filter_tab_class(settings.active_filter == ActiveFilter::Pinned)}>
                        <button class="pf-v5-c-tabs__link" onclick={on_filter(ActiveFilter::Pinned)}>
                            <span class="pf-v5-c-tabs__item-text">
                                {format!("Pinned ({})", pinned_count)}
                            </span>
                        </button>
                    </li>
                </ul>
            </div>

            // View toggles
            <div class="toggles-row">
                <label class="toggle-label">
                    <input
                        type="checkbox"
                        checked={settings.is_grouping_enabled}
                        onclick={on_toggle_grouping}
                    />
                    {"Group domains"}
                </label>
                <label class="toggle-label">
                    <input
                        type="checkbox"
                        checked={settings.is_hide_pinned_enabled}
                        onclick={on_toggle_hide_pinned}
                    />
                    {"Hide pinned"}
                </label>
                <label class="toggle-label">
                    <input
                        type="checkbox"
                        checked={settings.current_window_only}
                        onclick={on_toggle_current_window}
                    />
                    {"Current window"}
                </label>
            </div>

            // Status display
            {match &*state {
                AppState::Loading(msg) => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{msg}</p>
                    </div>
                },
                AppState::Notice(msg) => html! {
                    <Alert r#type={AlertType::Success} title={msg.clone()} inline={true}>
                    </Alert>
                },
                AppState::Error(err) => html! {
                    <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                        {err.clone()}
                    </Alert>
                },
                AppState::Idle => html! {}
            }}

            // Select-all header
            <div class="select-all-row">
                <input
                    type="checkbox"
                    checked={select_state.checked}
                    class={select_all_class(&select_state)}
                    onclick={on_select_all}
                />
                <span class="selected-count">
                    {format!("{} of {} selected", selection.len(), visible.len())}
                </span>
            </div>

            // Tab list, flat or grouped by domain
            <div class="tab-list">
                if settings.is_grouping_enabled {
                    {for group_tabs_by_domain(&visible).into_iter().map(|(label, group)| {
                        let header_onclick = on_toggle_group(label.clone());
                        html! {
                            <div key={label.clone()}>
                                <div class="group-header" onclick={header_onclick}>
                                    <span class="group-label">{&label}</span>
                                    <span class="group-count">{group.len()}</span>
                                </div>
                                <div class="group-tabs">
                                    {for group.iter().map(|tab| tab_row(tab, on_toggle_tab(tab.id), state.clone()))}
                                </div>
                            </div>
                        }
                    })}
                } else {
                    {for visible.iter().map(|tab| tab_row(tab, on_toggle_tab(tab.id), state.clone()))}
                }
            </div>

            // Actions
            <div class="format-row">
                {for [CopyFormat::Plain, CopyFormat::Markdown, CopyFormat::Json, CopyFormat::Csv]
                    .into_iter()
                    .map(|fmt| {
                        let selected = settings.selected_copy_format == fmt;
                        html! {
                            <button
                                class={if selected { "format-chip format-chip-active" } else { "format-chip" }}
                                onclick={on_format(fmt)}
                            >
                                {fmt.as_str()}
                            </button>
                        }
                    })}
            </div>
            <div class="actions-row">
                <Button
                    onclick={on_copy}
                    disabled={is_busy || selection.is_empty()}
                    variant={ButtonVariant::Primary}
                    block={true}
                >
                    {settings.selected_copy_format.button_label()}
                </Button>
                <Button
                    onclick={on_pin}
                    disabled={is_busy || selection.is_empty()}
                    variant={ButtonVariant::Secondary}
                    block={true}
                >
                    {"Pin / Unpin"}
                </Button>
                <Button
                    onclick={on_group_tabs}
                    disabled={is_busy || selection.is_empty()}
                    variant={ButtonVariant::Secondary}
                    block={true}
                >
                    {"Group Tabs"}
                </Button>
            </div>

            // Open-links modal
            if *modal_open {
                <div class="modal-overlay">
                    <div class="modal-box">
                        <h2 class="modal-title">{"Open Multiple Links"}</h2>
                        <Button onclick={on_upload} variant={ButtonVariant::Secondary}>
                            {"Upload Links File (.txt, .csv, .json)"}
                        </Button>
                        <textarea
                            class="links-textarea"
                            rows="8"
                            placeholder="Paste links here, or upload a file"
                            value={(*links_text).clone()}
                            oninput={on_links_input}
                        />
                        <div class="modal-actions">
                            <Button onclick={on_close_modal} variant={ButtonVariant::Secondary} block={true}>
                                {"Cancel"}
                            </Button>
                            <Button onclick={on_open_links} variant={ButtonVariant::Primary} block={true}>
                                {"Open All Links"}
                            </Button>
                        </div>
                    </div>
                </div>
            }

            <p class="footer-popup">
                {"Tab Grab v0.1.0"}
            </p>
        </div>
    }
}

fn tab_row(tab: &TabItem, onclick: Callback<MouseEvent>, state: UseStateHandle<AppState>) -> Html {
    let url = tab.url.clone();
    let on_copy_url = Callback::from(move |_: MouseEvent| {
        let url = url.clone();
        let state = state.clone();
        spawn_local(async move {
            if let Err(err) = writeClipboard(&url).await {
                state.set(AppState::Error(format!("Copy failed: {:?}", err)));
            }
        });
    });

    html! {
        <div class="tab-row" key={tab.id}>
            <input type="checkbox" checked={tab.selected} onclick={onclick} />
            if !tab.fav_icon_url.is_empty() {
                <img class="tab-favicon" src={tab.fav_icon_url.clone()} alt="" />
            }
            <div class="tab-text">
                <span class="tab-title">{&tab.title}</span>
                <span class="tab-url">{&tab.url}</span>
            </div>
            if tab.pinned {
                <span class="tab-pin-marker">{"pinned"}</span>
            }
            <button class="tab-copy-button" onclick={on_copy_url}>{"Copy"}</button>
        </div>
    }
}

fn filter_tab_class(current: bool) -> &'static str {
    if current {
        "pf-v5-c-tabs__item pf-m-current"
    } else {
        "pf-v5-c-tabs__item"
    }
}

fn select_all_class(state: &SelectAllState) -> &'static str {
    if state.indeterminate {
        "select-all-checkbox select-all-indeterminate"
    } else {
        "select-all-checkbox"
    }
}

// Helper functions

async fn load_settings() -> Result<Settings, String> {
    let value = getStorage(SETTINGS_BUCKET)
        .await
        .map_err(|e| format!("Failed to get settings: {:?}", e))?;

    if value.is_null() || value.is_undefined() {
        return Ok(Settings::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| format!("Failed to parse settings: {:?}", e))
}

async fn save_settings(settings: &Settings) -> Result<(), String> {
    let value = serde_wasm_bindgen::to_value(settings)
        .map_err(|e| format!("Failed to serialize settings: {:?}", e))?;
    setStorage(SETTINGS_BUCKET, value)
        .await
        .map_err(|e| format!("Failed to save settings: {:?}", e))
}

async fn load_tabs(current_window_only: bool) -> Result<Vec<TabItem>, String> {
    let value = queryTabs(current_window_only)
        .await
        .map_err(|e| format!("Failed to get tabs: {:?}", e))?;

    let tabs: Vec<TabItem> = serde_wasm_bindgen::from_value(value)
        .map_err(|e| format!("Failed to parse tabs: {:?}", e))?;
    Ok(tabs.into_iter().map(TabItem::normalized).collect())
}

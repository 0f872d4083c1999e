/// Options page: clipboard settings and the plain-text template editor.

use patternfly_yew::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlTextAreaElement;
use yew::prelude::*;

use crate::settings::{SETTINGS_BUCKET, Settings, TemplateWarning, Templates, validate_template};

// Import JS bridge functions
#[wasm_bindgen(module = "/options.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;
}

#[derive(Clone, PartialEq)]
enum PageState {
    Loading,
    Idle,
    Error(String),
}

#[function_component(OptionsApp)]
pub fn options_app() -> Html {
    let state = use_state(|| PageState::Loading);
    let settings = use_state(Settings::default);

    {
        let state = state.clone();
        let settings = settings.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match load_settings().await {
                    Ok(loaded) => {
                        settings.set(loaded);
                        state.set(PageState::Idle);
                    }
                    Err(err) => state.set(PageState::Error(err)),
                }
            });
            || ()
        });
    }

    let save = {
        let state = state.clone();
        let settings = settings.clone();
        move |updated: Settings| {
            settings.set(updated.clone());
            let state = state.clone();
            spawn_local(async move {
                if let Err(err) = save_settings(&updated).await {
                    state.set(PageState::Error(err));
                }
            });
        }
    };

    let on_toggle_title = {
        let save = save.clone();
        let settings = settings.clone();
        Callback::from(move |_: MouseEvent| {
            let mut updated = (*settings).clone();
            updated.copy_title_enabled = !updated.copy_title_enabled;
            save(updated);
        })
    };

    let on_template_input = {
        let save = save.clone();
        let settings = settings.clone();
        Callback::from(move |e: InputEvent| {
            let area: HtmlTextAreaElement = e.target_unchecked_into();
            let mut updated = (*settings).clone();
            updated.templates.plain = area.value();
            save(updated);
        })
    };

    let on_reset = {
        let save = save.clone();
        let settings = settings.clone();
        Callback::from(move |_: MouseEvent| {
            let mut updated = (*settings).clone();
            updated.copy_title_enabled = Settings::default().copy_title_enabled;
            updated.templates = Templates::default();
            save(updated);
        })
    };

    let warnings = validate_template(&settings.templates.plain, settings.copy_title_enabled);

    html! {
        <div class="padding-20">
            <h1 class="options-title">{"Tab Grab Settings"}</h1>

            {match &*state {
                PageState::Loading => html! {
                    <div class="loading-text-center">
                        <Spinner />
                    </div>
                },
                PageState::Error(err) => html! {
                    <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                        {err.clone()}
                    </Alert>
                },
                PageState::Idle => html! {}
            }}

            <div class="options-section">
                <label class="toggle-label">
                    <input
                        type="checkbox"
                        checked={settings.copy_title_enabled}
                        onclick={on_toggle_title}
                    />
                    {"Copy Title with URL"}
                </label>
                <p class="options-hint">
                    {"When enabled, plain-text copies include each tab's title."}
                </p>
            </div>

            <div class="options-section">
                <label class="options-label" for="plain-template">{"Plain text template"}</label>
                <p class="options-hint">
                    {"Define a custom template using the {TITLE} and {URL} placeholders."}
                </p>
                <textarea
                    id="plain-template"
                    class="template-editor"
                    rows="3"
                    placeholder={settings.template_hint()}
                    value={settings.templates.plain.clone()}
                    oninput={on_template_input}
                />

                {for warnings.iter().map(|warning| {
                    let title = match warning {
                        TemplateWarning::TitleWillBeStripped => {
                            "\"Copy Title with URL\" is disabled. {TITLE} will be removed from output."
                        }
                        TemplateWarning::MalformedPlaceholder => {
                            "Potential typo detected. Use {TITLE} and {URL}."
                        }
                    };
                    html! {
                        <Alert r#type={AlertType::Warning} title={title} inline={true}>
                        </Alert>
                    }
                })}
            </div>

            <Button onclick={on_reset} variant={ButtonVariant::Secondary}>
                {"Reset to Defaults"}
            </Button>
        </div>
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

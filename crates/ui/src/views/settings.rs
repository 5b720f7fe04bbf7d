use dioxus::prelude::*;
use study_core::model::{AppSettings, AppSettingsDraft, DEFAULT_API_BASE_URL};

use crate::context::AppContext;

fn draft_from_inputs(api_base_url: &str, student_id: &str) -> AppSettingsDraft {
    AppSettingsDraft {
        api_base_url: Some(api_base_url.to_string()),
        history_student_id: Some(student_id.to_string()),
    }
}

#[component]
pub fn SettingsView() -> Element {
    let ctx = use_context::<AppContext>();
    let active_url = ctx.settings().effective_api_base_url().to_string();

    let mut api_base_url = use_signal(String::new);
    let mut student_id = use_signal(String::new);
    let mut status = use_signal(|| None::<String>);

    {
        let service = ctx.app_settings();
        use_future(move || {
            let service = service.clone();
            async move {
                match service.load().await {
                    Ok(settings) => {
                        api_base_url.set(settings.api_base_url().unwrap_or_default().to_string());
                        student_id.set(
                            settings
                                .history_student_id()
                                .map(ToString::to_string)
                                .unwrap_or_default(),
                        );
                    }
                    Err(err) => status.set(Some(err.to_string())),
                }
            }
        });
    }

    let on_save = {
        let service = ctx.app_settings();
        move |evt: FormEvent| {
            evt.prevent_default();
            let service = service.clone();
            let draft = draft_from_inputs(&api_base_url(), &student_id());
            spawn(async move {
                match service.save(draft).await {
                    Ok(saved) => status.set(Some(saved_message(&saved))),
                    Err(err) => status.set(Some(err.to_string())),
                }
            });
        }
    };

    rsx! {
        div { class: "page settings-page",
            h2 { "Settings" }
            p { class: "muted", "Connected to {active_url}" }
            form { class: "settings-form", onsubmit: on_save,
                label { "Server address"
                    input {
                        r#type: "url",
                        placeholder: DEFAULT_API_BASE_URL,
                        value: "{api_base_url}",
                        oninput: move |evt| api_base_url.set(evt.value()),
                    }
                }
                label { "Student id for results (optional)"
                    input {
                        r#type: "text",
                        value: "{student_id}",
                        oninput: move |evt| student_id.set(evt.value()),
                    }
                }
                button { class: "btn btn-primary", r#type: "submit", "Save" }
            }
            if let Some(message) = status() {
                p { class: "status", "{message}" }
            }
        }
    }
}

fn saved_message(saved: &AppSettings) -> String {
    format!(
        "Saved. {} will be used after restart.",
        saved.effective_api_base_url()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_inputs_fall_back_to_defaults() {
        let saved = draft_from_inputs("  ", "").validate().unwrap();
        assert_eq!(saved.effective_api_base_url(), DEFAULT_API_BASE_URL);
        assert_eq!(saved.history_student_id(), None);
    }

    #[test]
    fn saved_message_names_the_new_server() {
        let saved = draft_from_inputs("https://study.example.org/api/", "")
            .validate()
            .unwrap();
        assert_eq!(
            saved_message(&saved),
            "Saved. https://study.example.org/api will be used after restart."
        );
    }
}

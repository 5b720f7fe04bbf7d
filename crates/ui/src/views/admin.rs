use dioxus::prelude::*;
use services::{PromptRequest, TextPrompt};
use study_core::model::User;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};

#[component]
pub fn AdminView() -> Element {
    let ctx = use_context::<AppContext>();
    let mut status = use_signal(|| None::<String>);

    let resource = {
        let admin = ctx.admin();
        use_resource(move || {
            let admin = admin.clone();
            async move { admin.list_users().await.map_err(ViewError::from) }
        })
    };

    let reset_password = {
        let admin = ctx.admin();
        let prompt = ctx.prompt();
        use_callback(move |user: User| {
            let admin = admin.clone();
            let prompt = prompt.clone();
            spawn(async move {
                let request = PromptRequest::new(
                    "Reset password",
                    format!("New password for {}", user.name),
                )
                .secret();
                let Some(password) = prompt.request_text(request).await else {
                    return;
                };
                match admin.reset_password(&user.id, &password).await {
                    Ok(()) => status.set(Some(format!("Password updated for {}.", user.name))),
                    Err(err) => status.set(Some(err.to_string())),
                }
            });
        })
    };

    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page",
            h2 { "Users" }
            if let Some(message) = status() {
                p { class: "status", "{message}" }
            }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(users) => rsx! {
                    table { class: "user-table",
                        thead {
                            tr {
                                th { "Name" }
                                th { "Role" }
                                th { "Contact" }
                                th { "Batch" }
                                th {}
                            }
                        }
                        tbody {
                            for user in users {
                                UserRow { key: "{user.id}", user, on_reset: reset_password }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
            }
        }
    }
}

#[component]
fn UserRow(user: User, on_reset: Callback<User>) -> Element {
    let contact = user.contact().unwrap_or("-").to_string();
    let batch = user.batch_code.clone().unwrap_or_default();
    let name = user.name.clone();
    let role = user.role;
    rsx! {
        tr {
            td { "{name}" }
            td { "{role}" }
            td { "{contact}" }
            td { "{batch}" }
            td {
                button {
                    class: "btn btn-link",
                    r#type: "button",
                    onclick: move |_| on_reset.call(user.clone()),
                    "Reset password"
                }
            }
        }
    }
}

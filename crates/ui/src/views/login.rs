use dioxus::prelude::*;
use dioxus_router::use_navigator;
use study_core::model::{Credentials, Role};

use crate::context::{AppContext, CurrentUser};
use crate::routes::Route;

fn credentials_for(role: Role, identifier: String, secret: String) -> Credentials {
    match role {
        Role::Student => Credentials::Student {
            mobile: identifier,
            batch_code: secret,
        },
        Role::Teacher => Credentials::Teacher {
            email: identifier,
            password: secret,
        },
        Role::Admin => Credentials::Admin {
            email: identifier,
            password: secret,
        },
    }
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::Student => "Student",
        Role::Teacher => "Teacher",
        Role::Admin => "Admin",
    }
}

fn field_labels(role: Role) -> (&'static str, &'static str) {
    match role {
        Role::Student => ("Mobile number", "Batch code"),
        Role::Teacher | Role::Admin => ("Email", "Password"),
    }
}

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let mut current = use_context::<CurrentUser>();
    let navigator = use_navigator();

    let mut role = use_signal(|| Role::Student);
    let mut identifier = use_signal(String::new);
    let mut secret = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if busy() {
            return;
        }
        let auth = ctx.auth();
        let credentials = credentials_for(role(), identifier(), secret());
        busy.set(true);
        spawn(async move {
            match auth.login(credentials).await {
                Ok(user) => {
                    error.set(None);
                    current.set(Some(user));
                    navigator.push(Route::Home {});
                }
                Err(err) => error.set(Some(err.to_string())),
            }
            busy.set(false);
        });
    };

    let (id_label, secret_label) = field_labels(role());
    let secret_type = if role() == Role::Student { "text" } else { "password" };

    rsx! {
        div { class: "page login-page",
            h2 { "Sign in" }
            div { class: "login-roles", role: "tablist",
                for option in [Role::Student, Role::Teacher, Role::Admin] {
                    button {
                        class: if role() == option { "login-role login-role--active" } else { "login-role" },
                        r#type: "button",
                        onclick: move |_| {
                            role.set(option);
                            secret.set(String::new());
                            error.set(None);
                        },
                        "{role_label(option)}"
                    }
                }
            }
            form { class: "login-form", onsubmit: on_submit,
                label { "{id_label}"
                    input {
                        r#type: "text",
                        value: "{identifier}",
                        oninput: move |evt| identifier.set(evt.value()),
                    }
                }
                label { "{secret_label}"
                    input {
                        r#type: "{secret_type}",
                        value: "{secret}",
                        oninput: move |evt| secret.set(evt.value()),
                    }
                }
                if let Some(message) = error() {
                    p { class: "form-error", "{message}" }
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: busy(),
                    if busy() { "Signing in..." } else { "Sign in" }
                }
            }
        }
    }
}

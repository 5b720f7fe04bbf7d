use dioxus::prelude::*;
use dioxus_router::Link;
use study_core::model::Subject;

use crate::context::{AppContext, CurrentUser};
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let current = use_context::<CurrentUser>();
    let catalog = ctx.catalog();

    let resource = use_resource(move || {
        let catalog = catalog.clone();
        async move { catalog.subjects().await.map_err(ViewError::from) }
    });

    let state = view_state_from_resource(resource);
    let greeting = current
        .get()
        .map_or_else(|| "Welcome".to_string(), |user| format!("Welcome, {}", user.name));

    rsx! {
        div { class: "page",
            h2 { "{greeting}" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(subjects) => rsx! {
                    if subjects.is_empty() {
                        p { "No subjects yet." }
                    } else {
                        ul { class: "subject-grid",
                            for subject in subjects {
                                SubjectCard { key: "{subject.id}", subject }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    if err == ViewError::SignInRequired {
                        Link { class: "btn btn-primary", to: Route::Login {}, "Sign in" }
                    }
                },
            }
        }
    }
}

#[component]
fn SubjectCard(subject: Subject) -> Element {
    rsx! {
        li { class: "subject-card", style: "border-color: {subject.color}",
            Link { to: Route::Subject { subject_id: subject.id.to_string() },
                span { class: "subject-card__icon", "{subject.icon}" }
                span { class: "subject-card__name", "{subject.name}" }
            }
            if !subject.teacher_name.is_empty() {
                p { class: "subject-card__teacher", "{subject.teacher_name}" }
            }
            if !subject.description.is_empty() {
                p { class: "subject-card__description", "{subject.description}" }
            }
        }
    }
}

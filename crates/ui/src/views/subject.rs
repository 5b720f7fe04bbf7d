use dioxus::prelude::*;
use dioxus_router::Link;
use study_core::model::SubjectId;

use crate::context::{AppContext, CurrentUser};
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};

#[component]
pub fn SubjectView(subject_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let current = use_context::<CurrentUser>();
    let catalog = ctx.catalog();
    let authoring = ctx.authoring();
    let id = SubjectId::new(subject_id.clone());

    let chapters = {
        let id = id.clone();
        use_resource(move || {
            let catalog = catalog.clone();
            let id = id.clone();
            async move { catalog.chapters(&id).await.map_err(ViewError::from) }
        })
    };
    let quizzes = use_resource(move || {
        let authoring = authoring.clone();
        let id = id.clone();
        async move { authoring.list_quizzes(&id).await.map_err(ViewError::from) }
    });

    let chapters = view_state_from_resource(chapters);
    let quizzes = view_state_from_resource(quizzes);

    rsx! {
        div { class: "page",
            h2 { "Chapters" }
            match chapters {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(items) => rsx! {
                    if items.is_empty() {
                        p { "No chapters yet." }
                    } else {
                        ol { class: "chapter-list",
                            for chapter in items {
                                li { key: "{chapter.id}",
                                    Link { to: Route::Chapter { chapter_id: chapter.id.to_string() },
                                        "Chapter {chapter.number}: {chapter.name}"
                                    }
                                    if let Some(description) = chapter.description {
                                        p { class: "muted", "{description}" }
                                    }
                                }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
            }

            div { class: "section-header",
                h2 { "Quizzes" }
                if current.can_author() {
                    Link {
                        class: "btn btn-secondary",
                        to: Route::CreateQuiz { subject_id: subject_id.clone() },
                        "Create quiz"
                    }
                }
            }
            match quizzes {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(items) => rsx! {
                    if items.is_empty() {
                        p { "No quizzes for this subject yet." }
                    } else {
                        ul { class: "quiz-list",
                            for quiz in items {
                                li { key: "{quiz.id}",
                                    Link { to: Route::Quiz { quiz_id: quiz.id.to_string() }, "{quiz.title}" }
                                    span { class: "muted",
                                        " {quiz.question_count} questions · {quiz.time_limit_mins} min"
                                    }
                                }
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

use dioxus::prelude::*;
use dioxus_router::Link;
use study_core::model::ChapterId;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};

#[component]
pub fn ChapterView(chapter_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();
    let id = ChapterId::new(chapter_id);

    let resource = use_resource(move || {
        let catalog = catalog.clone();
        let id = id.clone();
        async move { catalog.topics(&id).await.map_err(ViewError::from) }
    });

    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page",
            h2 { "Topics" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(topics) => rsx! {
                    if topics.is_empty() {
                        p { "No topics in this chapter yet." }
                    } else {
                        ol { class: "topic-list",
                            for topic in topics {
                                li { key: "{topic.id}",
                                    Link { to: Route::Topic { topic_id: topic.id.to_string() },
                                        "{topic.number}. {topic.name}"
                                    }
                                    if let Some(description) = topic.description {
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
        }
    }
}

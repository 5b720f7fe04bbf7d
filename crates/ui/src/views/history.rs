use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{HistoryRowVm, map_history_rows};

#[component]
pub fn HistoryView() -> Element {
    let ctx = use_context::<AppContext>();
    let results = ctx.results();

    let mut resource = use_resource(move || {
        let results = results.clone();
        async move {
            let records = results.history().await.map_err(ViewError::from)?;
            Ok::<_, ViewError>(map_history_rows(&records))
        }
    });

    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page",
            h2 { "My Results" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(rows) => rsx! {
                    if rows.is_empty() {
                        p { "No quiz results yet." }
                    } else {
                        ul { class: "history-list",
                            for row in rows {
                                HistoryRow { key: "{row.quiz_id}-{row.completed_at_str}", row }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| resource.restart(),
                        "Retry"
                    }
                },
            }
        }
    }
}

#[component]
fn HistoryRow(row: HistoryRowVm) -> Element {
    let class = if row.passed { "history-row history-row--passed" } else { "history-row" };
    rsx! {
        li { class: "{class}",
            Link { class: "history-row__title", to: Route::Quiz { quiz_id: row.quiz_id.to_string() },
                "{row.title}"
            }
            span { class: "history-row__score", "{row.score_label} ({row.percentage_label})" }
            span { class: "history-row__date", "{row.completed_at_str}" }
        }
    }
}

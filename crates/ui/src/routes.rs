use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable, use_navigator};

use crate::context::{AppContext, CurrentUser};
use crate::views::{
    AdminView, ChapterView, CreateQuizView, HistoryView, HomeView, LoginView, PromptHost,
    QuizView, SettingsView, SubjectView, TopicView,
};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/login", LoginView)] Login {},
        #[route("/subjects/:subject_id", SubjectView)] Subject { subject_id: String },
        #[route("/subjects/:subject_id/new-quiz", CreateQuizView)] CreateQuiz { subject_id: String },
        #[route("/chapters/:chapter_id", ChapterView)] Chapter { chapter_id: String },
        #[route("/topics/:topic_id", TopicView)] Topic { topic_id: String },
        #[route("/quiz/:quiz_id", QuizView)] Quiz { quiz_id: String },
        #[route("/history", HistoryView)] History {},
        #[route("/admin", AdminView)] Admin {},
        #[route("/settings", SettingsView)] Settings {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
            PromptHost {}
        }
    }
}

#[component]
fn Sidebar() -> Element {
    let ctx = use_context::<AppContext>();
    let mut current = use_context::<CurrentUser>();
    let navigator = use_navigator();
    let user = current.get();
    let is_admin = current.is_admin();

    let on_logout = move |_| {
        let auth = ctx.auth();
        spawn(async move {
            if let Err(err) = auth.logout().await {
                log::warn!("logout failed: {err}");
            }
            current.set(None);
            navigator.push(Route::Login {});
        });
    };

    rsx! {
        nav { class: "sidebar",
            h1 { "Study" }
            ul {
                li { Link { to: Route::Home {}, "Subjects" } }
                if user.is_some() {
                    li { Link { to: Route::History {}, "My Results" } }
                }
                if is_admin {
                    li { Link { to: Route::Admin {}, "Users" } }
                }
                li { Link { to: Route::Settings {}, "Settings" } }
            }
            div { class: "sidebar__account",
                match user {
                    Some(user) => rsx! {
                        p { class: "sidebar__user", "{user.name} ({user.role})" }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: on_logout,
                            "Log out"
                        }
                    },
                    None => rsx! {
                        Link { class: "btn btn-primary", to: Route::Login {}, "Sign in" }
                    },
                }
            }
        }
    }
}

use dioxus::prelude::*;
use dioxus_router::Router;

use crate::context::{AppContext, CurrentUser};
use crate::routes::Route;

#[component]
pub fn App() -> Element {
    let ctx = use_context::<AppContext>();
    let mut current = use_context_provider(|| CurrentUser(Signal::new(None)));

    // Restore the stored session once per launch.
    use_future(move || {
        let auth = ctx.auth();
        async move {
            match auth.init().await {
                Ok(user) => current.set(user),
                Err(err) => log::warn!("could not restore session: {err}"),
            }
        }
    });

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }

        document::Title { "Study" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}

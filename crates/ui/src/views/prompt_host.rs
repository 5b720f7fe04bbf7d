use std::collections::VecDeque;

use dioxus::prelude::*;

use crate::context::AppContext;
use crate::prompt::PendingPrompt;

/// Renders queued text prompts one at a time as a modal dialog.
#[component]
pub fn PromptHost() -> Element {
    let ctx = use_context::<AppContext>();
    let mut queue = use_signal(VecDeque::<PendingPrompt>::new);
    let mut text = use_signal(String::new);

    {
        let prompt = ctx.prompt();
        use_future(move || {
            let receiver = prompt.take_receiver();
            async move {
                let Some(mut receiver) = receiver else {
                    log::warn!("prompt dialog mounted twice; ignoring the second host");
                    return;
                };
                while let Some(pending) = receiver.recv().await {
                    queue.write().push_back(pending);
                }
            }
        });
    }

    let mut answer = move |accept: bool| {
        let Some(pending) = queue.write().pop_front() else {
            return;
        };
        if accept {
            pending.answer(&text());
        } else {
            pending.cancel();
        }
        text.set(String::new());
    };

    let current = queue.read().front().map(|pending| pending.request().clone());
    let Some(request) = current else {
        return rsx! {};
    };
    let input_type = if request.secret { "password" } else { "text" };
    let placeholder = request.placeholder.clone().unwrap_or_default();

    rsx! {
        div { class: "overlay",
            form {
                class: "dialog prompt-dialog",
                role: "dialog",
                aria_modal: "true",
                onsubmit: move |evt: FormEvent| {
                    evt.prevent_default();
                    answer(true);
                },
                h3 { "{request.title}" }
                label { "{request.message}"
                    input {
                        r#type: "{input_type}",
                        autofocus: true,
                        placeholder: "{placeholder}",
                        value: "{text}",
                        oninput: move |evt| text.set(evt.value()),
                    }
                }
                div { class: "dialog__actions",
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| answer(false),
                        "Cancel"
                    }
                    button { class: "btn btn-primary", r#type: "submit", "OK" }
                }
            }
        }
    }
}

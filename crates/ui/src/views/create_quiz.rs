use dioxus::prelude::*;
use dioxus_router::use_navigator;
use services::{MAX_GENERATED_QUESTIONS, PromptRequest, TextPrompt};
use study_core::model::{OPTION_COUNT, QuestionDraft, QuizDraft, SubjectId};

use crate::context::{AppContext, CurrentUser};
use crate::routes::Route;
use crate::views::ViewError;

/// Append generated questions, replacing the untouched starter question.
fn merge_generated(draft: &mut QuizDraft, generated: Vec<QuestionDraft>) {
    if draft.questions.len() == 1 && draft.questions[0] == QuestionDraft::blank() {
        draft.questions.clear();
    }
    draft.questions.extend(generated);
}

fn parse_count(raw: &str) -> Option<u32> {
    raw.trim().parse().ok()
}

#[component]
pub fn CreateQuizView(subject_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let current = use_context::<CurrentUser>();
    let navigator = use_navigator();

    let subject = SubjectId::new(subject_id.clone());
    let mut draft = use_signal(|| QuizDraft::new(subject.clone()));
    let mut error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    let generate = {
        let authoring = ctx.authoring();
        let prompt = ctx.prompt();
        let subject = subject.clone();
        use_callback(move |()| {
            let authoring = authoring.clone();
            let prompt = prompt.clone();
            let subject = subject.clone();
            spawn(async move {
                let Some(topic) = prompt
                    .request_text(
                        PromptRequest::new("Generate questions", "Topic")
                            .with_placeholder("Newton's laws of motion"),
                    )
                    .await
                else {
                    return;
                };
                let Some(raw_count) = prompt
                    .request_text(
                        PromptRequest::new(
                            "Generate questions",
                            format!("How many questions? (1-{MAX_GENERATED_QUESTIONS})"),
                        )
                        .with_placeholder("5"),
                    )
                    .await
                else {
                    return;
                };
                let Some(count) = parse_count(&raw_count) else {
                    error.set(Some(format!("\"{raw_count}\" is not a number")));
                    return;
                };

                busy.set(true);
                match authoring.generate_questions(&subject, &topic, count).await {
                    Ok(generated) => {
                        error.set(None);
                        merge_generated(&mut draft.write(), generated);
                    }
                    Err(err) => error.set(Some(err.to_string())),
                }
                busy.set(false);
            });
        })
    };

    let save = {
        let authoring = ctx.authoring();
        use_callback(move |()| {
            let authoring = authoring.clone();
            let snapshot = draft.read().clone();
            let subject_id = subject_id.clone();
            busy.set(true);
            spawn(async move {
                match authoring.create_quiz(&snapshot).await {
                    Ok(_) => {
                        error.set(None);
                        navigator.push(Route::Subject { subject_id });
                    }
                    Err(err) => error.set(Some(err.to_string())),
                }
                busy.set(false);
            });
        })
    };

    if !current.can_author() {
        return rsx! {
            div { class: "page",
                p { "{ViewError::NotAllowed.message()}" }
            }
        };
    }

    let question_count = draft.read().questions.len();
    let title = draft.read().title.clone();
    let description = draft.read().description.clone();
    let time_limit = draft.read().time_limit_mins;

    rsx! {
        div { class: "page create-quiz",
            h2 { "New quiz" }
            label { "Title"
                input {
                    r#type: "text",
                    value: "{title}",
                    oninput: move |evt| draft.write().title = evt.value(),
                }
            }
            label { "Description"
                textarea {
                    value: "{description}",
                    oninput: move |evt| draft.write().description = evt.value(),
                }
            }
            label { "Time limit (minutes)"
                input {
                    r#type: "number",
                    min: "1",
                    value: "{time_limit}",
                    oninput: move |evt| draft.write().time_limit_mins = parse_count(&evt.value()).unwrap_or(0),
                }
            }

            ol { class: "question-editors",
                for index in 0..question_count {
                    QuestionEditor { key: "{index}", draft, index }
                }
            }

            div { class: "actions",
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| draft.write().questions.push(QuestionDraft::blank()),
                    "Add question"
                }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    disabled: busy(),
                    onclick: move |_| generate.call(()),
                    "Generate with AI"
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: busy(),
                    onclick: move |_| save.call(()),
                    "Publish quiz"
                }
            }
            if let Some(message) = error() {
                p { class: "form-error", "{message}" }
            }
        }
    }
}

#[component]
fn QuestionEditor(draft: Signal<QuizDraft>, index: usize) -> Element {
    let mut draft = draft;
    let Some(question) = draft.read().questions.get(index).cloned() else {
        return rsx! {};
    };
    let number = index + 1;
    let options: Vec<String> = (0..OPTION_COUNT)
        .map(|option| question.options.get(option).cloned().unwrap_or_default())
        .collect();

    rsx! {
        li { class: "question-editor",
            div { class: "question-editor__header",
                span { "Question {number}" }
                button {
                    class: "btn btn-link",
                    r#type: "button",
                    onclick: move |_| {
                        let mut draft = draft.write();
                        if index < draft.questions.len() {
                            draft.questions.remove(index);
                        }
                    },
                    "Remove"
                }
            }
            textarea {
                placeholder: "Question text",
                value: "{question.prompt}",
                oninput: move |evt| {
                    if let Some(q) = draft.write().questions.get_mut(index) {
                        q.prompt = evt.value();
                    }
                },
            }
            for (option, text) in options.into_iter().enumerate() {
                div { key: "{option}", class: "option-editor",
                    input {
                        r#type: "radio",
                        name: "correct-{index}",
                        checked: question.correct == Some(option),
                        onchange: move |_| {
                            if let Some(q) = draft.write().questions.get_mut(index) {
                                q.correct = Some(option);
                            }
                        },
                    }
                    input {
                        r#type: "text",
                        placeholder: format!("Option {}", option + 1),
                        value: "{text}",
                        oninput: move |evt| {
                            if let Some(q) = draft.write().questions.get_mut(index) {
                                if q.options.len() < OPTION_COUNT {
                                    q.options.resize(OPTION_COUNT, String::new());
                                }
                                q.options[option] = evt.value();
                            }
                        },
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generated(prompt: &str) -> QuestionDraft {
        QuestionDraft {
            prompt: prompt.into(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct: Some(0),
        }
    }

    #[test]
    fn generated_questions_replace_blank_starter() {
        let mut draft = QuizDraft::new(SubjectId::new("physics"));
        merge_generated(&mut draft, vec![generated("Q1"), generated("Q2")]);
        assert_eq!(draft.questions.len(), 2);
        assert_eq!(draft.questions[0].prompt, "Q1");
    }

    #[test]
    fn generated_questions_append_to_edited_draft() {
        let mut draft = QuizDraft::new(SubjectId::new("physics"));
        draft.questions[0].prompt = "My own question".into();
        merge_generated(&mut draft, vec![generated("Q1")]);
        assert_eq!(draft.questions.len(), 2);
        assert_eq!(draft.questions[0].prompt, "My own question");
    }

    #[test]
    fn count_parsing_trims_and_rejects_text() {
        assert_eq!(parse_count(" 12 "), Some(12));
        assert_eq!(parse_count("ten"), None);
    }
}

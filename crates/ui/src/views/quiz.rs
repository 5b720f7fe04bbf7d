use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use dioxus_router::use_navigator;
use services::{AttemptCommand, AttemptHandle, AttemptSnapshot};
use study_core::model::{AttemptPhase, Quiz, QuizId};

use crate::context::AppContext;
use crate::views::ViewError;
use crate::vm::{AttemptVm, OptionVm, QuestionVm, ResultVm};

type HandleSlot = Rc<RefCell<Option<AttemptHandle>>>;

fn send(slot: &HandleSlot, command: AttemptCommand) {
    match slot.borrow().as_ref() {
        Some(handle) => {
            if !handle.send(command) {
                log::debug!("attempt already finished, dropping {command:?}");
            }
        }
        None => log::debug!("no attempt running, dropping {command:?}"),
    }
}

#[component]
pub fn QuizView(quiz_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let slot: HandleSlot = use_hook(|| Rc::new(RefCell::new(None)));

    let mut quiz = use_signal(|| None::<Quiz>);
    let mut snapshot = use_signal(|| None::<AttemptSnapshot>);
    let mut load_error = use_signal(|| None::<ViewError>);

    {
        let attempts = ctx.attempts();
        let slot = slot.clone();
        use_future(move || {
            let attempts = attempts.clone();
            let slot = slot.clone();
            let id = QuizId::new(quiz_id.clone());
            async move {
                let loaded = match attempts.load(&id).await {
                    Ok(loaded) => loaded,
                    Err(err) => {
                        load_error.set(Some(ViewError::from(err)));
                        return;
                    }
                };
                let handle = attempts.begin(&loaded);
                let mut updates = handle.subscribe();
                *slot.borrow_mut() = Some(handle);
                quiz.set(Some(loaded));
                loop {
                    let latest = updates.borrow_and_update().clone();
                    snapshot.set(Some(latest));
                    if updates.changed().await.is_err() {
                        break;
                    }
                }
            }
        });
    }

    // Leaving the screen abandons the attempt. Nothing is submitted.
    {
        let slot = slot.clone();
        use_drop(move || {
            if let Some(handle) = slot.borrow_mut().take() {
                handle.cancel();
            }
        });
    }

    let dispatch = {
        let slot = slot.clone();
        use_callback(move |command: AttemptCommand| send(&slot, command))
    };

    #[cfg(test)]
    {
        if let Some(handles) = try_consume_context::<QuizTestHandles>() {
            handles.register(&slot);
        }
    }

    if let Some(err) = load_error() {
        return rsx! {
            div { class: "page",
                div { class: "dialog", role: "alertdialog",
                    h2 { "Could not open quiz" }
                    p { "{err.message()}" }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        onclick: move |_| navigator.go_back(),
                        "Go back"
                    }
                }
            }
        };
    }

    let vm = {
        let quiz = quiz.read();
        let snapshot = snapshot.read();
        match (quiz.as_ref(), snapshot.as_ref()) {
            (Some(quiz), Some(snapshot)) => Some(AttemptVm::new(quiz, snapshot)),
            _ => None,
        }
    };
    let Some(vm) = vm else {
        return rsx! {
            div { class: "page",
                p { "Loading..." }
            }
        };
    };

    let timer_class = if vm.low_time { "quiz-timer quiz-timer--low" } else { "quiz-timer" };
    let can_submit = vm.can_submit();

    rsx! {
        div { class: "page quiz-page",
            header { class: "quiz-header",
                h2 { "{vm.title}" }
                if vm.phase == AttemptPhase::Running {
                    span { class: "{timer_class}", "{vm.countdown}" }
                }
            }

            match vm.phase {
                AttemptPhase::NotStarted => rsx! {
                    div { class: "quiz-intro",
                        if let Some(description) = vm.description.clone() {
                            p { "{description}" }
                        }
                        p { class: "muted", "{vm.intro_label}" }
                        p { "The timer starts when you press Start. Answers are sent automatically when time runs out." }
                        button {
                            class: "btn btn-primary",
                            id: "quiz-start",
                            r#type: "button",
                            onclick: move |_| dispatch.call(AttemptCommand::Start),
                            "Start quiz"
                        }
                    }
                },
                AttemptPhase::Running => rsx! {
                    p { class: "quiz-progress", "{vm.progress_label}" }
                    if let Some(message) = vm.submit_error.clone() {
                        div { class: "banner banner--error",
                            p { "{message}" }
                            button {
                                class: "btn btn-secondary",
                                r#type: "button",
                                disabled: vm.submitting,
                                onclick: move |_| dispatch.call(AttemptCommand::Submit),
                                "Retry"
                            }
                        }
                    }
                    if let Some(notice) = vm.notice.clone() {
                        p { class: "quiz-notice", "{notice}" }
                    }
                    ol { class: "quiz-questions",
                        for question in vm.questions.clone() {
                            QuestionCard {
                                key: "{question.index}",
                                question,
                                editable: vm.editable,
                                on_command: dispatch,
                            }
                        }
                    }
                    footer { class: "quiz-footer",
                        button {
                            class: "btn btn-primary",
                            id: "quiz-submit",
                            r#type: "button",
                            disabled: !can_submit,
                            onclick: move |_| dispatch.call(AttemptCommand::Submit),
                            if vm.submitting { "Submitting..." } else { "Submit" }
                        }
                    }
                    if let Some(message) = vm.confirmation.clone() {
                        div { class: "overlay",
                            div { class: "dialog", role: "dialog", aria_modal: "true",
                                h3 { "Submit quiz?" }
                                p { "{message}" }
                                div { class: "dialog__actions",
                                    button {
                                        class: "btn btn-secondary",
                                        r#type: "button",
                                        onclick: move |_| dispatch.call(AttemptCommand::CancelConfirmation),
                                        "Keep answering"
                                    }
                                    button {
                                        class: "btn btn-primary",
                                        id: "quiz-confirm-submit",
                                        r#type: "button",
                                        onclick: move |_| dispatch.call(AttemptCommand::ConfirmSubmit),
                                        "Submit anyway"
                                    }
                                }
                            }
                        }
                    }
                },
                AttemptPhase::Submitted => rsx! {
                    if let Some(result) = vm.result.clone() {
                        ResultPanel { result }
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        onclick: move |_| navigator.go_back(),
                        "Done"
                    }
                },
            }
        }
    }
}

#[component]
fn QuestionCard(
    question: QuestionVm,
    editable: bool,
    on_command: Callback<AttemptCommand>,
) -> Element {
    let index = question.index;
    rsx! {
        li { class: if question.answered { "quiz-question quiz-question--answered" } else { "quiz-question" },
            p { class: "quiz-question__prompt", "Question {question.number}. {question.prompt}" }
            div { class: "quiz-options",
                for option in question.options {
                    OptionButton {
                        key: "{option.index}",
                        question: index,
                        option,
                        editable,
                        on_command,
                    }
                }
            }
        }
    }
}

#[component]
fn OptionButton(
    question: usize,
    option: OptionVm,
    editable: bool,
    on_command: Callback<AttemptCommand>,
) -> Element {
    // Tapping the chosen option again clears the answer.
    let command = if option.selected {
        AttemptCommand::Clear { question }
    } else {
        AttemptCommand::Select {
            question,
            option: option.index,
        }
    };
    let class = if option.selected { "quiz-option quiz-option--selected" } else { "quiz-option" };
    rsx! {
        button {
            class: "{class}",
            r#type: "button",
            disabled: !editable,
            onclick: move |_| on_command.call(command),
            span { class: "quiz-option__letter", "{option.letter}" }
            span { class: "quiz-option__text", "{option.text}" }
        }
    }
}

#[component]
fn ResultPanel(result: ResultVm) -> Element {
    let class = if result.passed { "quiz-result quiz-result--passed" } else { "quiz-result" };
    rsx! {
        div { class: "{class}",
            h3 { "Your score" }
            p { class: "quiz-result__score", "{result.score_label}" }
            p { class: "quiz-result__percentage", "{result.percentage_label}" }
            p { class: "quiz-result__message", "{result.message}" }
        }
    }
}

/// Lets view tests drive the running attempt without clicking.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuizTestHandles {
    slot: Rc<RefCell<Option<HandleSlot>>>,
}

#[cfg(test)]
impl QuizTestHandles {
    fn register(&self, slot: &HandleSlot) {
        let mut registered = self.slot.borrow_mut();
        if registered.is_none() {
            *registered = Some(slot.clone());
        }
    }

    pub(crate) fn send(&self, command: AttemptCommand) {
        let registered = self.slot.borrow();
        let slot = registered.as_ref().expect("quiz view registered");
        send(slot, command);
    }

    pub(crate) fn snapshot(&self) -> Option<AttemptSnapshot> {
        let registered = self.slot.borrow();
        let slot = registered.as_ref()?;
        let handle = slot.borrow();
        handle.as_ref().map(AttemptHandle::snapshot)
    }
}

//! Terminal front end: take one quiz or list past results without the desktop window.

use std::error::Error;

use services::{
    AppServices, AttemptCommand, AttemptHandle, AttemptSnapshot, PromptRequest, TerminalPrompt,
    TextPrompt,
};
use study_core::model::{AttemptPhase, Credentials, Quiz, QuizId, Role, User};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use ui::vm::{AttemptVm, map_history_rows};

const HELP: &str = "commands: start | <question> <option> (e.g. 2 b) | clear <question> | submit | yes | no | show | quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Command(AttemptCommand),
    Show,
    Help,
    Quit,
}

fn parse_option(raw: &str) -> Option<usize> {
    let raw = raw.trim().to_ascii_lowercase();
    match raw.as_str() {
        "a" | "1" => Some(0),
        "b" | "2" => Some(1),
        "c" | "3" => Some(2),
        "d" | "4" => Some(3),
        _ => None,
    }
}

/// Question numbers are 1-based on screen.
fn parse_question(raw: &str, question_count: usize) -> Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(number) if (1..=question_count).contains(&number) => Ok(number - 1),
        _ => Err(format!("pick a question between 1 and {question_count}")),
    }
}

fn parse_input(line: &str, question_count: usize) -> Result<Input, String> {
    let line = line.trim().to_ascii_lowercase();
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        ["start" | "s"] => Ok(Input::Command(AttemptCommand::Start)),
        ["submit"] => Ok(Input::Command(AttemptCommand::Submit)),
        ["yes" | "y"] => Ok(Input::Command(AttemptCommand::ConfirmSubmit)),
        ["no" | "n"] => Ok(Input::Command(AttemptCommand::CancelConfirmation)),
        ["show"] => Ok(Input::Show),
        ["help" | "?"] => Ok(Input::Help),
        ["quit" | "q"] => Ok(Input::Quit),
        ["clear", question] => Ok(Input::Command(AttemptCommand::Clear {
            question: parse_question(question, question_count)?,
        })),
        [question, option] => {
            let question = parse_question(question, question_count)?;
            let option = parse_option(option).ok_or("options are a, b, c or d")?;
            Ok(Input::Command(AttemptCommand::Select { question, option }))
        }
        _ => Err(HELP.to_string()),
    }
}

async fn ask(prompt: &TerminalPrompt, request: PromptRequest) -> Result<String, Box<dyn Error>> {
    prompt
        .request_text(request)
        .await
        .ok_or_else(|| "sign-in cancelled".into())
}

async fn read_credentials(prompt: &TerminalPrompt) -> Result<Credentials, Box<dyn Error>> {
    let role = prompt
        .request_text(
            PromptRequest::new("Sign in", "Role (student, teacher, admin)").with_placeholder("student"),
        )
        .await
        .map_or(Ok(Role::Student), |raw| raw.parse::<Role>())?;

    let credentials = match role {
        Role::Student => Credentials::Student {
            mobile: ask(prompt, PromptRequest::new("Sign in", "Mobile number")).await?,
            batch_code: ask(prompt, PromptRequest::new("Sign in", "Batch code")).await?,
        },
        Role::Teacher => Credentials::Teacher {
            email: ask(prompt, PromptRequest::new("Sign in", "Email")).await?,
            password: ask(prompt, PromptRequest::new("Sign in", "Password").secret()).await?,
        },
        Role::Admin => Credentials::Admin {
            email: ask(prompt, PromptRequest::new("Sign in", "Email")).await?,
            password: ask(prompt, PromptRequest::new("Sign in", "Password").secret()).await?,
        },
    };
    Ok(credentials)
}

async fn ensure_signed_in(
    services: &AppServices,
    prompt: &TerminalPrompt,
) -> Result<User, Box<dyn Error>> {
    let auth = services.auth();
    match auth.init().await {
        Ok(Some(user)) => return Ok(user),
        Ok(None) => {}
        Err(err) => log::warn!("could not check the saved session: {err}"),
    }

    let credentials = read_credentials(prompt).await?;
    let user = auth.login(credentials).await?;
    println!("Signed in as {} ({})", user.name, user.role);
    Ok(user)
}

fn print_questions(vm: &AttemptVm) {
    for question in &vm.questions {
        println!();
        println!("{}. {}", question.number, question.prompt);
        for option in &question.options {
            let marker = if option.selected { "*" } else { " " };
            println!("  {marker} {}) {}", option.letter.to_ascii_lowercase(), option.text);
        }
    }
    println!();
    println!("{}  [{}]", vm.progress_label, vm.countdown);
}

/// Prints what changed since the previous snapshot.
#[derive(Default)]
struct Reporter {
    phase: Option<AttemptPhase>,
    answered: usize,
    confirmation: Option<String>,
    submit_error: Option<String>,
    notice: Option<String>,
}

impl Reporter {
    fn report(&mut self, vm: &AttemptVm, snapshot: &AttemptSnapshot) {
        if self.phase != Some(vm.phase) {
            self.phase = Some(vm.phase);
            match vm.phase {
                AttemptPhase::NotStarted => {
                    println!("{}", vm.title);
                    if let Some(description) = &vm.description {
                        println!("{description}");
                    }
                    println!("{}", vm.intro_label);
                    println!("Type \"start\" when you are ready. {HELP}");
                }
                AttemptPhase::Running => print_questions(vm),
                AttemptPhase::Submitted => {}
            }
        }

        if vm.phase == AttemptPhase::Running {
            let remaining = snapshot.state.remaining_secs();
            if remaining > 0 && (remaining % 60 == 0 || remaining <= 10) {
                println!("time left {}", vm.countdown);
            }
            let answered = snapshot.state.answered_count();
            if answered != self.answered {
                self.answered = answered;
                println!("{}", vm.progress_label);
            }
        }

        if vm.confirmation != self.confirmation {
            self.confirmation.clone_from(&vm.confirmation);
            if let Some(message) = &vm.confirmation {
                println!("{message} (yes/no)");
            }
        }
        if vm.submit_error != self.submit_error {
            self.submit_error.clone_from(&vm.submit_error);
            if let Some(message) = &vm.submit_error {
                println!("{message}");
                println!("Type \"submit\" to try again.");
            }
        }
        if vm.notice != self.notice {
            self.notice.clone_from(&vm.notice);
            if let Some(notice) = &vm.notice {
                println!("{notice}");
            }
        }
        if let Some(rejected) = &snapshot.rejected {
            log::debug!("command refused: {rejected}");
        }
    }
}

/// Stdin is read by this one task; sign-in and the quiz share its lines.
fn spawn_stdin_lines() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    log::warn!("could not read from stdin: {err}");
                    break;
                }
            }
        }
    });
    rx
}

fn stdin_prompt() -> TerminalPrompt {
    TerminalPrompt::new(spawn_stdin_lines(), std::io::stdout())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Submitted,
    Abandoned,
    /// Input ended before the quiz was started.
    InputClosed,
}

/// Load `quiz_id`, then drive one attempt from stdin until it is submitted or abandoned.
pub async fn run_quiz(services: &AppServices, quiz_id: &QuizId) -> Result<(), Box<dyn Error>> {
    let prompt = stdin_prompt();
    ensure_signed_in(services, &prompt).await?;
    let mut lines = prompt.into_lines();

    let attempts = services.attempts();
    let quiz: Quiz = attempts.load(quiz_id).await?;
    let handle = attempts.begin(&quiz);
    match drive_attempt(&quiz, &handle, &mut lines).await? {
        Outcome::Submitted => {}
        Outcome::Abandoned => println!("Attempt abandoned. Nothing was submitted."),
        Outcome::InputClosed => println!("Input closed before the quiz started. Nothing was submitted."),
    }
    Ok(())
}

async fn drive_attempt(
    quiz: &Quiz,
    handle: &AttemptHandle,
    lines: &mut mpsc::UnboundedReceiver<String>,
) -> Result<Outcome, Box<dyn Error>> {
    let mut updates = handle.subscribe();
    let mut reporter = Reporter::default();
    let mut input_open = true;
    let mut start_sent = false;

    loop {
        let snapshot = updates.borrow_and_update().clone();
        let vm = AttemptVm::new(quiz, &snapshot);
        reporter.report(&vm, &snapshot);

        if vm.phase == AttemptPhase::Submitted {
            if let Some(result) = &vm.result {
                println!();
                println!("Score: {} ({})", result.score_label, result.percentage_label);
                println!("{}", result.message);
            }
            return Ok(Outcome::Submitted);
        }

        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    return Err("attempt stopped unexpectedly".into());
                }
            }
            line = lines.recv(), if input_open => {
                let Some(line) = line else {
                    // Nothing would ever start the timer.
                    if !start_sent && vm.phase == AttemptPhase::NotStarted {
                        handle.cancel();
                        return Ok(Outcome::InputClosed);
                    }
                    // The timer still submits when it runs out.
                    input_open = false;
                    continue;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_input(&line, quiz.question_count()) {
                    Ok(Input::Command(command)) => {
                        if handle.send(command) {
                            start_sent |= command == AttemptCommand::Start;
                        } else {
                            log::debug!("attempt already finished, dropping {command:?}");
                        }
                    }
                    Ok(Input::Show) => print_questions(&vm),
                    Ok(Input::Help) => println!("{HELP}"),
                    Ok(Input::Quit) => {
                        handle.cancel();
                        return Ok(Outcome::Abandoned);
                    }
                    Err(message) => println!("{message}"),
                }
            }
        }
    }
}

/// Print the signed-in student's past results, newest first.
pub async fn print_results(services: &AppServices) -> Result<(), Box<dyn Error>> {
    ensure_signed_in(services, &stdin_prompt()).await?;
    let records = services.results().history().await?;
    let rows = map_history_rows(&records);
    if rows.is_empty() {
        println!("No results yet.");
        return Ok(());
    }
    for row in rows {
        let mark = if row.passed { "+" } else { "-" };
        println!(
            "{mark} {}  {}  {} ({})",
            row.completed_at_str, row.title, row.score_label, row.percentage_label
        );
    }
    Ok(())
}

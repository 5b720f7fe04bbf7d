mod terminal;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{
    AdminService, AppServices, AppSettingsService, AttemptService, AuthContext, AuthoringService,
    CatalogService, ResultsService,
};
use study_core::model::{AppSettings, QuizId};
use ui::{App, DesktopLinkOpener, LinkOpenerRef, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    MissingQuizId,
    InvalidQuizId { raw: String },
    InvalidDbUrl { raw: String },
    InvalidApiUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::MissingQuizId => write!(f, "quiz requires --id <quiz_id>"),
            ArgsError::InvalidQuizId { raw } => write!(f, "invalid --id value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidApiUrl { raw } => write!(f, "invalid --api-url value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: AppServices,
    opener: LinkOpenerRef,
}

impl UiApp for DesktopApp {
    fn settings(&self) -> AppSettings {
        self.services.settings().clone()
    }

    fn auth(&self) -> Arc<AuthContext> {
        self.services.auth()
    }

    fn attempts(&self) -> Arc<AttemptService> {
        self.services.attempts()
    }

    fn catalog(&self) -> Arc<CatalogService> {
        self.services.catalog()
    }

    fn authoring(&self) -> Arc<AuthoringService> {
        self.services.authoring()
    }

    fn results(&self) -> Arc<ResultsService> {
        self.services.results()
    }

    fn admin(&self) -> Arc<AdminService> {
        self.services.admin()
    }

    fn app_settings(&self) -> Arc<AppSettingsService> {
        self.services.app_settings()
    }

    fn link_opener(&self) -> LinkOpenerRef {
        Arc::clone(&self.opener)
    }
}

#[derive(Debug)]
struct Args {
    db_url: String,
    api_url: Option<String>,
    log_level: Option<String>,
    quiz_id: Option<QuizId>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui      [--db <sqlite_url>] [--api-url <url>] [--log-level <filter>]");
    eprintln!("  cargo run -p app -- quiz    --id <quiz_id> [--db ...] [--api-url ...] [--log-level ...]");
    eprintln!("  cargo run -p app -- results [--db ...] [--api-url ...] [--log-level ...]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:study.sqlite3");
    eprintln!("  --api-url <saved in settings, else http://localhost:8001/api>");
    eprintln!("  --log-level info");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  STUDY_DB_URL, STUDY_API_URL, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Quiz,
    Results,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "quiz" => Some(Self::Quiz),
            "results" => Some(Self::Results),
            _ => None,
        }
    }
}

impl Args {
    fn parse(
        cmd: Command,
        args: &mut impl Iterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut db_url = env("STUDY_DB_URL")
            .map_or_else(|| normalize_sqlite_url("sqlite:study.sqlite3".into()), normalize_sqlite_url);
        let mut api_url = env("STUDY_API_URL").filter(|value| !value.trim().is_empty());
        let mut log_level = None;
        let mut quiz_id = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--api-url" => {
                    let value = require_value(args, "--api-url")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidApiUrl { raw: value });
                    }
                    api_url = Some(value);
                }
                "--log-level" => log_level = Some(require_value(args, "--log-level")?),
                "--id" if cmd == Command::Quiz => {
                    let value = require_value(args, "--id")?;
                    let parsed: QuizId = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidQuizId { raw: value.clone() })?;
                    quiz_id = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        if cmd == Command::Quiz && quiz_id.is_none() {
            return Err(ArgsError::MissingQuizId);
        }

        Ok(Self {
            db_url,
            api_url,
            log_level,
            quiz_id,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn init_logging(level: Option<&str>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(level) = level {
        builder.parse_filters(level);
    }
    if let Err(err) = builder.try_init() {
        eprintln!("logging already initialized: {err}");
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the desktop UI.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(cmd, &mut iter, |key| std::env::var(key).ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_logging(parsed.log_level.as_deref());
    log::debug!("starting {cmd:?} with db {}", parsed.db_url);

    // Open + migrate SQLite here so the library crates never touch the filesystem layout.
    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(
        &parsed.db_url,
        parsed.api_url.as_deref(),
        cache_dir(&parsed.db_url),
    )
    .await?;

    match cmd {
        Command::Ui => {
            if let Err(err) = services.auth().init().await {
                log::warn!("could not check the saved session: {err}");
            }

            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                services,
                opener: Arc::new(DesktopLinkOpener),
            });
            let context = build_app_context(&app);

            // Some dev setups default to an always-on-top window.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Study")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Quiz => {
            let quiz_id = parsed.quiz_id.ok_or(ArgsError::MissingQuizId)?;
            terminal::run_quiz(&services, &quiz_id).await
        }
        Command::Results => terminal::print_results(&services).await,
    }
}

/// Downloaded PDFs live next to the database.
fn cache_dir(db_url: &str) -> PathBuf {
    let db_path = db_url
        .strip_prefix("sqlite://")
        .map(|path| path.split('?').next().unwrap_or(path))
        .map(std::path::Path::new);
    match db_path.and_then(std::path::Path::parent) {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join("study-cache"),
        _ => std::env::temp_dir().join("study-cache"),
    }
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    match run().await {
        // A pending stdin read would otherwise keep the runtime alive.
        Ok(()) => std::process::exit(0),
        Err(err) => {
            // At this layer (binary glue), printing once is fine.
            eprintln!("{err}");
            std::process::exit(2);
        }
    }
}

pub mod app;
pub mod context;
pub mod platform;
pub mod prompt;
pub mod routes;
pub mod views;
pub mod vm;

pub use app::App;
pub use context::{AppContext, CurrentUser, UiApp, build_app_context};
pub use platform::{DesktopLinkOpener, LinkOpenerRef, UiLinkOpener};
pub use prompt::ModalPrompt;

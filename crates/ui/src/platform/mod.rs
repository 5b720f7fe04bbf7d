use std::path::Path;
use std::sync::Arc;

mod desktop;

/// Hands links and downloaded files to the operating system.
pub trait UiLinkOpener: Send + Sync {
    fn open_url(&self, url: &str);
    fn open_path(&self, path: &Path);
}

pub type LinkOpenerRef = Arc<dyn UiLinkOpener>;

pub use desktop::DesktopLinkOpener;

use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;

use super::UiLinkOpener;

/// Opens targets with the platform's default handler (browser, PDF viewer).
pub struct DesktopLinkOpener;

impl DesktopLinkOpener {
    fn launch(target: &OsStr) {
        #[cfg(target_os = "macos")]
        let spawned = Command::new("open").arg(target).spawn();
        #[cfg(target_os = "windows")]
        let spawned = Command::new("cmd")
            .args([OsStr::new("/C"), OsStr::new("start"), OsStr::new("")])
            .arg(target)
            .spawn();
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        let spawned = Command::new("xdg-open").arg(target).spawn();

        if let Err(err) = spawned {
            log::warn!("could not open {}: {err}", target.to_string_lossy());
        }
    }
}

impl UiLinkOpener for DesktopLinkOpener {
    fn open_url(&self, url: &str) {
        let url = url.trim();
        if url.is_empty() {
            return;
        }
        log::debug!("opening {url}");
        Self::launch(OsStr::new(url));
    }

    fn open_path(&self, path: &Path) {
        log::debug!("opening {}", path.display());
        Self::launch(path.as_os_str());
    }
}

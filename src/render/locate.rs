//! Chrome/Chromium binary resolution
//!
//! Search order: environment override, then a bundled copy next to the
//! executable or in the working directory, then well-known system locations.

use crate::HarvestError;
use std::path::{Path, PathBuf};

/// Environment variables consulted, in order, for an explicit browser binary
pub const BROWSER_ENV_OVERRIDES: &[&str] = &["PAGE_HARVEST_CHROME", "CHROME_PATH"];

/// Bundled locations relative to the running executable's directory
const BUNDLED_NEXT_TO_EXE: &[&str] = &["chromium/chrome", "chromium/chrome.exe"];

/// Bundled locations relative to the working directory
const BUNDLED_IN_WORKDIR: &[&str] = &[".chromium/chrome", ".chromium/chrome.exe"];

#[cfg(target_os = "linux")]
const WELL_KNOWN_PATHS: &[&str] = &[
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/usr/local/bin/chromium",
    "/snap/bin/chromium",
    "/opt/google/chrome/chrome",
];

#[cfg(target_os = "macos")]
const WELL_KNOWN_PATHS: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    "/Applications/Google Chrome Canary.app/Contents/MacOS/Google Chrome Canary",
];

#[cfg(target_os = "windows")]
const WELL_KNOWN_PATHS: &[&str] = &[
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files\Chromium\Application\chrome.exe",
];

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
const WELL_KNOWN_PATHS: &[&str] = &[];

/// Ordered list of places a browser binary may live
#[derive(Debug, Clone)]
pub struct BrowserLocator {
    overrides: Vec<PathBuf>,
    bundled: Vec<PathBuf>,
    system: Vec<PathBuf>,
}

impl Default for BrowserLocator {
    fn default() -> Self {
        Self::from_env()
    }
}

impl BrowserLocator {
    /// Builds the standard search order from the process environment
    pub fn from_env() -> Self {
        let overrides = BROWSER_ENV_OVERRIDES
            .iter()
            .filter_map(|var| std::env::var_os(var))
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .collect();

        let mut bundled = Vec::new();
        if let Some(exe_dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            bundled.extend(BUNDLED_NEXT_TO_EXE.iter().map(|rel| exe_dir.join(rel)));
        }
        bundled.extend(BUNDLED_IN_WORKDIR.iter().map(PathBuf::from));

        let system = WELL_KNOWN_PATHS.iter().map(PathBuf::from).collect();

        Self {
            overrides,
            bundled,
            system,
        }
    }

    /// Builds a locator from explicit candidate lists
    pub fn with_candidates(overrides: Vec<PathBuf>, bundled: Vec<PathBuf>, system: Vec<PathBuf>) -> Self {
        Self {
            overrides,
            bundled,
            system,
        }
    }

    /// All candidate paths, in search order
    pub fn candidates(&self) -> Vec<&Path> {
        self.overrides
            .iter()
            .chain(&self.bundled)
            .chain(&self.system)
            .map(PathBuf::as_path)
            .collect()
    }

    /// Returns the first candidate that exists as a file
    ///
    /// An override pointing at a missing file is logged and skipped.
    pub fn resolve(&self) -> Result<PathBuf, HarvestError> {
        for path in &self.overrides {
            if path.is_file() {
                tracing::debug!("Using browser from environment override: {}", path.display());
                return Ok(path.clone());
            }
            tracing::warn!("Browser override {} does not exist, continuing search", path.display());
        }

        if let Some(path) = self.bundled.iter().chain(&self.system).find(|p| p.is_file()) {
            tracing::debug!("Found browser binary at {}", path.display());
            return Ok(path.clone());
        }

        Err(HarvestError::BrowserNotFound {
            searched: self
                .candidates()
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
    }
}

//! Chromium browser management
//!
//! Handles locating the Chromium executable and managing the lifecycle of
//! the browser process that backs a session.

use std::path::PathBuf;
use std::time::Duration;

use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Prefix of the stderr line that announces the DevTools endpoint.
const DEVTOOLS_BANNER: &str = "DevTools listening on ";

/// How long to wait for the browser to announce its DevTools endpoint.
const ENDPOINT_WAIT: Duration = Duration::from_secs(30);

/// Browser launch configuration supplied by the caller.
///
/// The runtime never reads process-wide mutable state on its own behalf;
/// everything it needs to start a browser arrives through this value.
#[derive(Debug, Clone, Default)]
pub struct LaunchConfig {
    /// Explicit path to the Chromium executable. When set, the file must
    /// exist; no fallback discovery is attempted.
    pub executable: Option<PathBuf>,
    /// Run without a visible window.
    pub headless: bool,
    /// Extra arguments appended to the launch invocation.
    pub extra_args: Vec<String>,
}

/// Resolve the Chromium executable for the given configuration.
///
/// Resolution order:
/// 1. `config.executable` - must exist, otherwise the error is surfaced
///    immediately (no network activity has happened yet)
/// 2. `PESO_CHROMIUM` environment variable (runtime override)
/// 3. `which` lookup of common binary names on `PATH`
/// 4. Well-known install locations
///
/// # Errors
///
/// Returns [`Error::BrowserNotFound`] for an explicit path that does not
/// exist, or [`Error::BrowserNotDiscovered`] when every fallback fails.
pub fn resolve_executable(config: &LaunchConfig) -> Result<PathBuf> {
    if let Some(path) = &config.executable {
        if path.is_file() {
            return Ok(path.clone());
        }
        return Err(Error::BrowserNotFound { path: path.clone() });
    }

    if let Ok(env_path) = std::env::var("PESO_CHROMIUM") {
        let path = PathBuf::from(env_path);
        if path.is_file() {
            return Ok(path);
        }
        warn!(
            target = "peso",
            path = %path.display(),
            "PESO_CHROMIUM is set but does not point at a file; falling back"
        );
    }

    for name in [
        "chromium",
        "chromium-browser",
        "google-chrome",
        "google-chrome-stable",
        "chrome",
    ] {
        if let Ok(path) = which::which(name) {
            debug!(target = "peso", binary = name, path = %path.display(), "found browser on PATH");
            return Ok(path);
        }
    }

    #[cfg(not(windows))]
    let common_locations = [
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/usr/bin/google-chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    ];

    #[cfg(windows)]
    let common_locations = [
        "C:\\Program Files\\Google\\Chrome\\Application\\chrome.exe",
        "C:\\Program Files (x86)\\Google\\Chrome\\Application\\chrome.exe",
    ];

    for location in &common_locations {
        let path = PathBuf::from(location);
        if path.is_file() {
            return Ok(path);
        }
    }

    Err(Error::BrowserNotDiscovered)
}

/// Extract the WebSocket endpoint from the DevTools banner line.
fn parse_devtools_banner(line: &str) -> Option<&str> {
    line.trim().strip_prefix(DEVTOOLS_BANNER).map(str::trim)
}

/// Manages the Chromium process lifecycle.
///
/// The process is launched with `--remote-debugging-port=0` and a scratch
/// profile directory; the DevTools WebSocket endpoint is read from the
/// banner the browser prints on stderr. The profile directory lives as long
/// as this value and is removed when it is dropped.
#[derive(Debug)]
pub struct BrowserProcess {
    process: Child,
    ws_endpoint: String,
    _profile_dir: TempDir,
}

impl BrowserProcess {
    /// Launch a Chromium process and wait for its DevTools endpoint.
    ///
    /// Executable resolution happens first, before the process is spawned,
    /// so a missing binary fails without any side effects.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BrowserNotFound`]/[`Error::BrowserNotDiscovered`] if
    /// the executable cannot be resolved, and [`Error::LaunchFailed`] if the
    /// process does not come up or never announces an endpoint.
    pub async fn launch(config: &LaunchConfig) -> Result<Self> {
        let executable = resolve_executable(config)?;
        let profile_dir = TempDir::with_prefix("peso-profile-")?;

        let mut cmd = Command::new(&executable);
        cmd.arg("--remote-debugging-port=0")
            .arg(format!("--user-data-dir={}", profile_dir.path().display()))
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true);

        if config.headless {
            cmd.arg("--headless=new");
        }
        for arg in &config.extra_args {
            cmd.arg(arg);
        }

        debug!(target = "peso", executable = %executable.display(), headless = config.headless, "launching browser");

        let mut child = cmd
            .spawn()
            .map_err(|e| Error::LaunchFailed(format!("failed to spawn process: {e}")))?;

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::LaunchFailed("stderr pipe missing".to_string()))?;

        let mut lines = BufReader::new(stderr).lines();
        let endpoint = tokio::time::timeout(ENDPOINT_WAIT, async {
            while let Some(line) = lines
                .next_line()
                .await
                .map_err(|e| Error::LaunchFailed(format!("failed to read stderr: {e}")))?
            {
                if let Some(endpoint) = parse_devtools_banner(&line) {
                    return Ok(endpoint.to_string());
                }
            }
            Err(Error::LaunchFailed(
                "browser exited before announcing a DevTools endpoint".to_string(),
            ))
        })
        .await
        .map_err(|_| {
            Error::LaunchFailed(format!(
                "no DevTools endpoint within {}s",
                ENDPOINT_WAIT.as_secs()
            ))
        })??;

        // Keep draining stderr so the child never blocks on a full pipe.
        tokio::spawn(async move { while let Ok(Some(_)) = lines.next_line().await {} });

        debug!(target = "peso", endpoint = %endpoint, "browser ready");

        Ok(Self {
            process: child,
            ws_endpoint: endpoint,
            _profile_dir: profile_dir,
        })
    }

    /// The DevTools WebSocket endpoint announced by the browser.
    pub fn ws_endpoint(&self) -> &str {
        &self.ws_endpoint
    }

    /// Shut the browser down and reap the process.
    pub async fn shutdown(mut self) -> Result<()> {
        self.process
            .kill()
            .await
            .map_err(|e| Error::LaunchFailed(format!("failed to kill process: {e}")))?;

        match tokio::time::timeout(Duration::from_secs(5), self.process.wait()).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(Error::LaunchFailed(format!(
                "failed to wait for process: {e}"
            ))),
            Err(_) => Err(Error::LaunchFailed(
                "process shutdown timeout after 5 seconds".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_missing_executable_fails_before_launch() {
        let config = LaunchConfig {
            executable: Some(PathBuf::from("/does/not/exist/chrome")),
            ..Default::default()
        };
        match resolve_executable(&config) {
            Err(Error::BrowserNotFound { path }) => {
                assert_eq!(path, PathBuf::from("/does/not/exist/chrome"));
            }
            other => panic!("expected BrowserNotFound, got {other:?}"),
        }
    }

    #[test]
    fn explicit_existing_executable_is_used_verbatim() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = LaunchConfig {
            executable: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let resolved = resolve_executable(&config).unwrap();
        assert_eq!(resolved, file.path());
    }

    #[test]
    fn banner_line_yields_endpoint() {
        let line = "DevTools listening on ws://127.0.0.1:33195/devtools/browser/abc-def";
        assert_eq!(
            parse_devtools_banner(line),
            Some("ws://127.0.0.1:33195/devtools/browser/abc-def")
        );
    }

    #[test]
    fn unrelated_stderr_lines_are_ignored() {
        assert_eq!(parse_devtools_banner("[WARNING] fontconfig"), None);
        assert_eq!(parse_devtools_banner(""), None);
    }
}

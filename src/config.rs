//! Runtime configuration, resolved once from the environment

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Window name override, wins over every other title source
pub const WINDOW_NAME_VAR: &str = "CLAUDE_WINDOW_NAME";
const ROOT_VAR: &str = "TERMINAL_NOTIFIER_ROOT";
const SINK_VAR: &str = "TERMINAL_NOTIFIER_SINK";
const TIMEOUT_VAR: &str = "TERMINAL_NOTIFIER_TIMEOUT_SECS";

pub const DEFAULT_PROJECT_NAME: &str = "Backend_CPP";
pub const DEFAULT_TOAST_TIMEOUT: Duration = Duration::from_secs(10);

/// Which notification mechanism to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SinkChoice {
    /// PowerShell if the interpreter is on PATH, native otherwise
    #[default]
    Auto,
    PowerShell,
    Native,
}

impl SinkChoice {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(SinkChoice::Auto),
            "powershell" => Some(SinkChoice::PowerShell),
            "native" => Some(SinkChoice::Native),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Non-empty `CLAUDE_WINDOW_NAME`, if any
    pub window_name: Option<String>,
    /// Directory holding `.states/`
    pub project_root: PathBuf,
    pub project_name: String,
    pub toast_timeout: Duration,
    pub sink: SinkChoice,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_name: None,
            project_root: PathBuf::from("."),
            project_name: DEFAULT_PROJECT_NAME.to_string(),
            toast_timeout: DEFAULT_TOAST_TIMEOUT,
            sink: SinkChoice::Auto,
        }
    }
}

impl Config {
    /// Build from process environment; unparsable values fall back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let window_name = non_empty_var(WINDOW_NAME_VAR);

        let project_root = non_empty_var(ROOT_VAR)
            .map(PathBuf::from)
            .or_else(|| env::current_dir().ok())
            .unwrap_or(defaults.project_root);

        let sink = match non_empty_var(SINK_VAR) {
            Some(value) => SinkChoice::parse(&value).unwrap_or_else(|| {
                tracing::warn!(value = %value, "Unknown {SINK_VAR}, using auto");
                SinkChoice::Auto
            }),
            None => SinkChoice::Auto,
        };

        let toast_timeout = non_empty_var(TIMEOUT_VAR)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.toast_timeout);

        Self {
            window_name,
            project_root,
            project_name: defaults.project_name,
            toast_timeout,
            sink,
        }
    }

    /// `<project_root>/.states`
    pub fn states_dir(&self) -> PathBuf {
        self.project_root.join(".states")
    }

    /// `<project_root>/.states/original-title.txt`
    pub fn fallback_title_path(&self) -> PathBuf {
        self.states_dir().join("original-title.txt")
    }
}

/// Env var value, treating unset and empty alike
fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

//! Window identity and per-window title persistence

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::TitleError;

/// Env vars identifying a terminal session, first non-empty wins
const WINDOW_ID_VARS: &[&str] = &[
    "WT_SESSION",
    "TERM_SESSION_ID",
    "WEZTERM_PANE",
    "TMUX_PANE",
    "KITTY_WINDOW_ID",
];

pub const DEFAULT_WINDOW_ID: &str = "default";

const BOM: char = '\u{feff}';

/// Derive window id from the process environment
pub fn get_window_id() -> String {
    window_id_from(|name| env::var(name).ok())
}

fn window_id_from(lookup: impl Fn(&str) -> Option<String>) -> String {
    WINDOW_ID_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_WINDOW_ID.to_string())
}

/// Map a window id onto a safe file-name fragment
fn sanitize_window_id(window_id: &str) -> String {
    let sanitized: String = window_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if sanitized.is_empty() {
        DEFAULT_WINDOW_ID.to_string()
    } else {
        sanitized
    }
}

/// `<states_dir>/window-<id>.title`
pub fn get_persistent_title_path(states_dir: &Path, window_id: &str) -> PathBuf {
    states_dir.join(format!("window-{}.title", sanitize_window_id(window_id)))
}

/// Strip BOM and surrounding whitespace; `None` when nothing is left
pub fn clean_title(raw: &str) -> Option<&str> {
    let title = raw.strip_prefix(BOM).unwrap_or(raw).trim();
    let title = title.strip_prefix(BOM).unwrap_or(title).trim();
    (!title.is_empty()).then_some(title)
}

/// Read a single-line title file (UTF-8, optional BOM)
///
/// Missing or blank files yield `NotFound`; anything else unreadable is `Io`.
pub fn read_title_file(path: &Path) -> Result<String, TitleError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(TitleError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(TitleError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    clean_title(&raw)
        .map(str::to_string)
        .ok_or_else(|| TitleError::NotFound {
            path: path.to_path_buf(),
        })
}

/// Persistence for per-window titles
pub trait TitleStore {
    /// `Ok(None)` when nothing is stored for this window
    fn load(&self, window_id: &str) -> Result<Option<String>, TitleError>;

    fn save(&self, window_id: &str, title: &str) -> Result<(), TitleError>;
}

/// One file per window under `.states/`
#[derive(Debug, Clone)]
pub struct FileTitleStore {
    states_dir: PathBuf,
}

impl FileTitleStore {
    pub fn new(states_dir: impl Into<PathBuf>) -> Self {
        Self {
            states_dir: states_dir.into(),
        }
    }
}

impl TitleStore for FileTitleStore {
    fn load(&self, window_id: &str) -> Result<Option<String>, TitleError> {
        let path = get_persistent_title_path(&self.states_dir, window_id);
        match read_title_file(&path) {
            Ok(title) => Ok(Some(title)),
            Err(TitleError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&self, window_id: &str, title: &str) -> Result<(), TitleError> {
        let path = get_persistent_title_path(&self.states_dir, window_id);
        let io_err = |source| TitleError::Io {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.states_dir).map_err(io_err)?;
        fs::write(&path, title.trim()).map_err(io_err)?;

        tracing::debug!(
            event = "title.saved",
            window_id,
            path = %path.display(),
        );
        Ok(())
    }
}

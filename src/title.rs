//! Window title resolution: env override → per-window file → fallback file → "Terminal"

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::TitleError;
use crate::terminal::{ConsoleTitle, TerminalTitle};
use crate::window::{self, FileTitleStore, TitleStore};

/// Title used when no other source yields one
pub const DEFAULT_TITLE: &str = "Terminal";

/// Display name + project name for a window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    pub window_name: String,
    pub project_name: String,
}

pub struct TitleResolver<S = FileTitleStore, T = ConsoleTitle> {
    config: Config,
    store: S,
    terminal: T,
}

impl TitleResolver {
    /// Resolver backed by `.states/` files and the live console
    pub fn from_config(config: Config) -> Self {
        let store = FileTitleStore::new(config.states_dir());
        Self::new(config, store, ConsoleTitle)
    }
}

impl<S: TitleStore, T: TerminalTitle> TitleResolver<S, T> {
    pub fn new(config: Config, store: S, terminal: T) -> Self {
        Self {
            config,
            store,
            terminal,
        }
    }

    /// Env override, then `.states/original-title.txt`, then "Terminal"
    pub fn resolve_fallback_title(&self) -> String {
        if let Some(name) = self.config.window_name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }

        let path = self.config.fallback_title_path();
        match window::read_title_file(&path) {
            Ok(title) => title,
            Err(e) => {
                debug!(event = "title.fallback_default", error = %e);
                DEFAULT_TITLE.to_string()
            }
        }
    }

    /// Persisted title for the window if any, else the fallback chain
    pub fn get_window_info(&self, window_id: Option<&str>) -> WindowInfo {
        let window_id = resolve_window_id(window_id);

        let persisted = match self.store.load(&window_id) {
            Ok(title) => title,
            Err(e) => {
                warn!(event = "title.load_failed", window_id = %window_id, error = %e);
                None
            }
        };

        let window_name = persisted.unwrap_or_else(|| self.resolve_fallback_title());

        WindowInfo {
            window_name,
            project_name: self.config.project_name.clone(),
        }
    }

    /// Persist title for the window, then apply it to the live terminal
    pub fn set_window_title(&self, title: &str, window_id: Option<&str>) -> Result<(), TitleError> {
        let window_id = resolve_window_id(window_id);

        self.store.save(&window_id, title)?;
        self.terminal
            .set_terminal_title(title)
            .map_err(|source| TitleError::Terminal { source })?;

        info!(event = "title.set", window_id = %window_id, title);
        Ok(())
    }
}

fn resolve_window_id(window_id: Option<&str>) -> String {
    match window_id {
        Some(id) => id.to_string(),
        None => window::get_window_id(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::fs;
    use std::io;
    use std::path::Path;
    use tempfile::TempDir;

    #[derive(Default)]
    struct MemoryStore {
        titles: RefCell<HashMap<String, String>>,
        fail_load: bool,
    }

    impl TitleStore for MemoryStore {
        fn load(&self, window_id: &str) -> Result<Option<String>, TitleError> {
            if self.fail_load {
                return Err(TitleError::Io {
                    path: "memory".into(),
                    source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
                });
            }
            Ok(self.titles.borrow().get(window_id).cloned())
        }

        fn save(&self, window_id: &str, title: &str) -> Result<(), TitleError> {
            self.titles
                .borrow_mut()
                .insert(window_id.to_string(), title.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingTerminal {
        titles: RefCell<Vec<String>>,
        fail: bool,
    }

    impl TerminalTitle for RecordingTerminal {
        fn set_terminal_title(&self, title: &str) -> io::Result<()> {
            if self.fail {
                return Err(io::Error::other("no tty"));
            }
            self.titles.borrow_mut().push(title.to_string());
            Ok(())
        }
    }

    fn config_in(root: &Path, window_name: Option<&str>) -> Config {
        Config {
            window_name: window_name.map(str::to_string),
            project_root: root.to_path_buf(),
            ..Default::default()
        }
    }

    fn write_fallback(root: &Path, content: &str) {
        let states = root.join(".states");
        fs::create_dir_all(&states).unwrap();
        fs::write(states.join("original-title.txt"), content).unwrap();
    }

    fn resolver(config: Config) -> TitleResolver<MemoryStore, RecordingTerminal> {
        TitleResolver::new(config, MemoryStore::default(), RecordingTerminal::default())
    }

    #[test]
    fn test_fallback_env_override_wins_over_file() {
        let dir = TempDir::new().unwrap();
        write_fallback(dir.path(), "FromFile");

        let r = resolver(config_in(dir.path(), Some("FromEnv")));
        assert_eq!(r.resolve_fallback_title(), "FromEnv");
    }

    #[test]
    fn test_fallback_empty_override_is_absent() {
        let dir = TempDir::new().unwrap();
        write_fallback(dir.path(), "FromFile");

        let r = resolver(config_in(dir.path(), Some("")));
        assert_eq!(r.resolve_fallback_title(), "FromFile");
    }

    #[test]
    fn test_fallback_file_bom_and_whitespace_stripped() {
        let dir = TempDir::new().unwrap();
        write_fallback(dir.path(), "\u{feff}MyTitle\n");

        let r = resolver(config_in(dir.path(), None));
        assert_eq!(r.resolve_fallback_title(), "MyTitle");
    }

    #[test]
    fn test_fallback_missing_file_is_terminal() {
        let dir = TempDir::new().unwrap();
        let r = resolver(config_in(dir.path(), None));
        assert_eq!(r.resolve_fallback_title(), "Terminal");
    }

    #[test]
    fn test_fallback_missing_root_is_terminal() {
        let r = resolver(config_in(Path::new("/definitely/not/a/real/root"), None));
        assert_eq!(r.resolve_fallback_title(), DEFAULT_TITLE);
    }

    #[test]
    fn test_window_info_prefers_persisted_title() {
        let dir = TempDir::new().unwrap();
        write_fallback(dir.path(), "FromFile");
        let r = resolver(config_in(dir.path(), Some("FromEnv")));
        r.store.save("w1", "Persisted").unwrap();

        let info = r.get_window_info(Some("w1"));
        assert_eq!(info.window_name, "Persisted");
        assert_eq!(info.project_name, "Backend_CPP");
    }

    #[test]
    fn test_window_info_falls_back_for_unknown_window() {
        let dir = TempDir::new().unwrap();
        let r = resolver(config_in(dir.path(), Some("FromEnv")));
        r.store.save("w1", "Persisted").unwrap();

        let info = r.get_window_info(Some("w2"));
        assert_eq!(info.window_name, "FromEnv");
        assert_eq!(info.project_name, "Backend_CPP");
    }

    #[test]
    fn test_window_info_store_error_falls_back() {
        let dir = TempDir::new().unwrap();
        let store = MemoryStore {
            fail_load: true,
            ..Default::default()
        };
        let r = TitleResolver::new(
            config_in(dir.path(), None),
            store,
            RecordingTerminal::default(),
        );

        assert_eq!(r.get_window_info(Some("w1")).window_name, "Terminal");
    }

    #[test]
    fn test_set_window_title_persists_and_sets_terminal() {
        let dir = TempDir::new().unwrap();
        let r = resolver(config_in(dir.path(), None));

        r.set_window_title("Deploy", Some("w1")).unwrap();

        assert_eq!(r.get_window_info(Some("w1")).window_name, "Deploy");
        assert_eq!(*r.terminal.titles.borrow(), vec!["Deploy".to_string()]);
    }

    #[test]
    fn test_set_window_title_terminal_error_propagates() {
        let dir = TempDir::new().unwrap();
        let terminal = RecordingTerminal {
            fail: true,
            ..Default::default()
        };
        let r = TitleResolver::new(config_in(dir.path(), None), MemoryStore::default(), terminal);

        let err = r.set_window_title("Deploy", Some("w1")).unwrap_err();
        assert!(matches!(err, TitleError::Terminal { .. }));
        // persisted before the terminal step
        assert_eq!(r.get_window_info(Some("w1")).window_name, "Deploy");
    }

    #[test]
    fn test_file_backed_round_trip() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path(), None);
        let r = TitleResolver::new(
            config.clone(),
            FileTitleStore::new(config.states_dir()),
            RecordingTerminal::default(),
        );

        r.set_window_title("O'Brien's box", Some("pane/3")).unwrap();

        assert!(dir.path().join(".states/window-pane_3.title").exists());
        assert_eq!(r.get_window_info(Some("pane/3")).window_name, "O'Brien's box");
        assert_eq!(r.get_window_info(Some("pane/4")).window_name, "Terminal");
    }
}

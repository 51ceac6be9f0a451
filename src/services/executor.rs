use crate::error::Result;
use crate::model::WindowRecord;
use crate::services::launcher::CommandLauncher;
use crate::services::mru_store::{self, MruStore};
use crate::services::selector::Action;
use crate::services::window_system::WindowSystem;
use tracing::{info, warn};

/// Применяет выбранное действие и обновляет MRU список
pub struct ActionExecutor<'a> {
    windows: &'a dyn WindowSystem,
    launcher: &'a dyn CommandLauncher,
    store: &'a MruStore,
}

impl<'a> ActionExecutor<'a> {
    pub fn new(
        windows: &'a dyn WindowSystem,
        launcher: &'a dyn CommandLauncher,
        store: &'a MruStore,
    ) -> Self {
        Self {
            windows,
            launcher,
            store,
        }
    }

    /// Выполнить действие. `mru` - согласованный список, из которого оно выбрано.
    pub fn execute(&self, action: &Action, mru: Vec<WindowRecord>) -> Result<()> {
        match action {
            Action::RunCommand(command) => {
                if command.trim().is_empty() {
                    return Ok(());
                }
                self.launcher.launch(command)
            }
            Action::FocusWindow(window) => {
                info!("Активация окна {} через {}", window, self.windows.name());
                self.windows.activate(&window.window_id)?;

                let mru = mru_store::promote(mru, window);
                // Фокус уже переключён, поэтому сбой записи не должен ронять вызов
                if let Err(e) = self.store.persist(&mru) {
                    warn!(
                        "Не удалось сохранить MRU список в {}: {}",
                        self.store.path().display(),
                        e
                    );
                }
                Ok(())
            }
            Action::NoOp => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlitterError;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingWindows {
        activated: RefCell<Vec<String>>,
        fail: bool,
    }

    impl WindowSystem for RecordingWindows {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn list_windows(&self) -> Result<Vec<WindowRecord>> {
            Ok(Vec::new())
        }

        fn active_window_id(&self) -> Result<Option<String>> {
            Ok(None)
        }

        fn activate(&self, window_id: &str) -> Result<()> {
            if self.fail {
                return Err(FlitterError::WindowSystem("activate failed".to_string()));
            }
            self.activated.borrow_mut().push(window_id.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingLauncher {
        launched: RefCell<Vec<String>>,
    }

    impl CommandLauncher for RecordingLauncher {
        fn launch(&self, command: &str) -> Result<()> {
            self.launched.borrow_mut().push(command.to_string());
            Ok(())
        }
    }

    fn window(id: &str) -> WindowRecord {
        WindowRecord::new(id).with_class("App.App")
    }

    fn ids(windows: &[WindowRecord]) -> Vec<&str> {
        windows.iter().map(|w| w.window_id.as_str()).collect()
    }

    #[test]
    fn test_run_command_launches_and_leaves_mru_alone() {
        let dir = tempfile::tempdir().unwrap();
        let store = MruStore::new(dir.path().join("mru.json"));
        let windows = RecordingWindows::default();
        let launcher = RecordingLauncher::default();
        let executor = ActionExecutor::new(&windows, &launcher, &store);

        executor
            .execute(&Action::RunCommand("firefox".to_string()), vec![window("A")])
            .unwrap();

        assert_eq!(*launcher.launched.borrow(), vec!["firefox".to_string()]);
        assert!(windows.activated.borrow().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_blank_command_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let store = MruStore::new(dir.path().join("mru.json"));
        let windows = RecordingWindows::default();
        let launcher = RecordingLauncher::default();
        let executor = ActionExecutor::new(&windows, &launcher, &store);

        executor
            .execute(&Action::RunCommand("  ".to_string()), Vec::new())
            .unwrap();

        assert!(launcher.launched.borrow().is_empty());
    }

    #[test]
    fn test_focus_activates_and_promotes() {
        let dir = tempfile::tempdir().unwrap();
        let store = MruStore::new(dir.path().join("mru.json"));
        let windows = RecordingWindows::default();
        let launcher = RecordingLauncher::default();
        let executor = ActionExecutor::new(&windows, &launcher, &store);

        let mru = vec![window("X"), window("Y"), window("Z")];
        executor
            .execute(&Action::FocusWindow(window("Y")), mru)
            .unwrap();

        assert_eq!(*windows.activated.borrow(), vec!["Y".to_string()]);
        assert_eq!(ids(&store.load()), vec!["Y", "X", "Z"]);
    }

    #[test]
    fn test_noop_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = MruStore::new(dir.path().join("mru.json"));
        store.persist(&[window("B"), window("A")]).unwrap();
        let windows = RecordingWindows::default();
        let launcher = RecordingLauncher::default();
        let executor = ActionExecutor::new(&windows, &launcher, &store);

        executor
            .execute(&Action::NoOp, vec![window("A"), window("B")])
            .unwrap();

        assert!(windows.activated.borrow().is_empty());
        assert!(launcher.launched.borrow().is_empty());
        assert_eq!(ids(&store.load()), vec!["B", "A"]);
    }

    #[test]
    fn test_activation_failure_propagates_without_persisting() {
        let dir = tempfile::tempdir().unwrap();
        let store = MruStore::new(dir.path().join("mru.json"));
        let windows = RecordingWindows {
            fail: true,
            ..Default::default()
        };
        let launcher = RecordingLauncher::default();
        let executor = ActionExecutor::new(&windows, &launcher, &store);

        let result = executor.execute(&Action::FocusWindow(window("A")), vec![window("A")]);

        assert!(matches!(result, Err(FlitterError::WindowSystem(_))));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_persist_failure_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mru.json");
        std::fs::create_dir_all(&path).unwrap();
        let store = MruStore::new(&path);
        let windows = RecordingWindows::default();
        let launcher = RecordingLauncher::default();
        let executor = ActionExecutor::new(&windows, &launcher, &store);

        let result = executor.execute(&Action::FocusWindow(window("A")), vec![window("A")]);

        assert!(result.is_ok());
        assert_eq!(*windows.activated.borrow(), vec!["A".to_string()]);
    }
}

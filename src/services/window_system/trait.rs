use crate::config::Backend;
use crate::error::Result;
use crate::flitter_error;
use crate::model::WindowRecord;
use tracing::{debug, info};

use super::dry_run::DryRunWindowSystem;
use super::ewmh::EwmhWindowSystem;
use super::wmctrl::WmctrlWindowSystem;

/// Capability interface to the window manager
pub trait WindowSystem {
    /// Backend name for logs
    fn name(&self) -> &'static str;

    /// Enumerate all currently open windows, without any filtering
    fn list_windows(&self) -> Result<Vec<WindowRecord>>;

    /// Id of the active window, or `None` if nothing is focused
    fn active_window_id(&self) -> Result<Option<String>>;

    /// The currently focused window among `windows` (the result of a
    /// previous [`WindowSystem::list_windows`] call), or `None` if nothing is focused
    fn focused_window(&self, windows: &[WindowRecord]) -> Result<Option<WindowRecord>> {
        let Some(window_id) = self.active_window_id()? else {
            return Ok(None);
        };

        let focused = windows
            .iter()
            .find(|window| window.window_id == window_id)
            .cloned();

        if focused.is_none() {
            debug!("Активное окно {} отсутствует в списке окон", window_id);
        }
        Ok(focused)
    }

    /// Ask the window manager to raise and focus the given window
    fn activate(&self, window_id: &str) -> Result<()>;
}

/// Factory function to create the window system adapter for the configured backend
pub fn create_window_system(backend: Backend, dry_run: bool) -> Result<Box<dyn WindowSystem>> {
    if dry_run {
        return Ok(Box::new(DryRunWindowSystem::new()));
    }

    match backend {
        Backend::Ewmh => Ok(Box::new(EwmhWindowSystem::connect()?)),
        Backend::Wmctrl => {
            let wmctrl = WmctrlWindowSystem::new();
            wmctrl.test()?;
            Ok(Box::new(wmctrl))
        }
        Backend::Auto => detect_window_system(),
    }
}

fn detect_window_system() -> Result<Box<dyn WindowSystem>> {
    info!("Определяем рабочий бэкенд оконной системы...");

    match EwmhWindowSystem::connect() {
        Ok(ewmh) => {
            info!("Используем EWMH");
            return Ok(Box::new(ewmh));
        }
        Err(e) => debug!("EWMH недоступен: {}", e),
    }

    let wmctrl = WmctrlWindowSystem::new();
    match wmctrl.test() {
        Ok(()) => {
            info!("Используем wmctrl");
            return Ok(Box::new(wmctrl));
        }
        Err(e) => debug!("wmctrl недоступен: {}", e),
    }

    Err(flitter_error!(
        window_system,
        "Ни один бэкенд оконной системы не работает"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_dry_run_ignores_backend() {
        let windows = create_window_system(Backend::Wmctrl, true).unwrap();
        assert_eq!(windows.name(), "dry-run");
    }

    #[test]
    fn test_default_focused_window_looks_up_active_id() {
        let windows = DryRunWindowSystem::new();
        let live = windows.list_windows().unwrap();
        let focused = windows.focused_window(&live).unwrap().unwrap();
        assert_eq!(Some(focused.window_id), windows.active_window_id().unwrap());
    }

    /// Бэкенд, который считает вызовы `list_windows`
    struct CountingWindows {
        listed: Cell<usize>,
        active: Option<String>,
    }

    impl WindowSystem for CountingWindows {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn list_windows(&self) -> Result<Vec<WindowRecord>> {
            self.listed.set(self.listed.get() + 1);
            Ok(vec![WindowRecord::new("0x1"), WindowRecord::new("0x2")])
        }

        fn active_window_id(&self) -> Result<Option<String>> {
            Ok(self.active.clone())
        }

        fn activate(&self, _window_id: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_focused_window_reuses_listed_windows() {
        let windows = CountingWindows {
            listed: Cell::new(0),
            active: Some("0x2".to_string()),
        };
        let live = windows.list_windows().unwrap();

        let focused = windows.focused_window(&live).unwrap();
        assert_eq!(focused.map(|window| window.window_id), Some("0x2".to_string()));
        assert_eq!(windows.listed.get(), 1);
    }

    #[test]
    fn test_focused_window_missing_from_list() {
        let windows = CountingWindows {
            listed: Cell::new(0),
            active: Some("0x9".to_string()),
        };
        let live = windows.list_windows().unwrap();
        assert!(windows.focused_window(&live).unwrap().is_none());

        let windows = CountingWindows {
            listed: Cell::new(0),
            active: None,
        };
        assert!(windows.focused_window(&live).unwrap().is_none());
    }
}

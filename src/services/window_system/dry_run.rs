use crate::error::Result;
use crate::flitter_error;
use crate::model::WindowRecord;
use tracing::info;

use super::r#trait::WindowSystem;

/// Эмуляция оконной системы: фиксированный набор окон, активация только логируется
pub struct DryRunWindowSystem {
    windows: Vec<WindowRecord>,
}

impl DryRunWindowSystem {
    pub fn new() -> Self {
        let fake_windows = [
            ("0x00e00001", "xterm.XTerm", "Terminal - dry_run"),
            ("0x00e00002", "Navigator.Firefox", "Browser - dry_run"),
            ("0x00e00003", "Navigator.Firefox", "Browser 2 - dry_run"),
            ("0x00e00004", "emacs.Emacs", "Editor - dry_run"),
        ];

        let windows = fake_windows
            .iter()
            .enumerate()
            .map(|(index, (window_id, wm_class, title))| {
                WindowRecord::new(*window_id)
                    .with_pid((1000 + index).to_string())
                    .with_class(*wm_class)
                    .with_machine("dry-run")
                    .with_title(*title)
            })
            .collect();

        Self { windows }
    }
}

impl WindowSystem for DryRunWindowSystem {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    fn list_windows(&self) -> Result<Vec<WindowRecord>> {
        Ok(self.windows.clone())
    }

    fn active_window_id(&self) -> Result<Option<String>> {
        Ok(self.windows.first().map(|window| window.window_id.clone()))
    }

    fn activate(&self, window_id: &str) -> Result<()> {
        let window = self
            .windows
            .iter()
            .find(|window| window.window_id == window_id)
            .ok_or_else(|| flitter_error!(window_system, "Dry-run: окно {} не существует", window_id))?;

        info!("Dry-run: эмулируем активацию окна {}", window);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_run_windows() {
        let windows = DryRunWindowSystem::new();
        let list = windows.list_windows().unwrap();

        assert_eq!(list.len(), 4);
        assert!(windows.activate(&list[1].window_id).is_ok());
        assert!(windows.activate("0xdeadbeef").is_err());
    }
}

use crate::error::{FlitterError, Result};
use crate::flitter_error;
use crate::model::WindowRecord;
use crate::trace_if_enabled;
use std::process::Command;
use tracing::debug;

use super::r#trait::WindowSystem;

/// Адаптер поверх утилиты `wmctrl`
pub struct WmctrlWindowSystem;

impl WmctrlWindowSystem {
    pub fn new() -> Self {
        Self
    }

    pub fn test(&self) -> Result<()> {
        let output = Command::new("wmctrl").args(["-m"]).output()?;
        if output.status.success() {
            Ok(())
        } else {
            Err(flitter_error!(window_system, "wmctrl -m завершился с ошибкой"))
        }
    }

    fn run(args: &[&str]) -> Result<std::process::Output> {
        debug!("Запуск wmctrl {:?}", args);
        Command::new("wmctrl")
            .args(args)
            .output()
            .map_err(|e| flitter_error!(window_system, "wmctrl не найден: {}", e))
    }
}

impl WindowSystem for WmctrlWindowSystem {
    fn name(&self) -> &'static str {
        "wmctrl"
    }

    fn list_windows(&self) -> Result<Vec<WindowRecord>> {
        let output = Self::run(&["-lxp"])?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(flitter_error!(window_system, "wmctrl -lxp вернул ошибку: {}", stderr.trim()));
        }

        parse_window_list(&String::from_utf8_lossy(&output.stdout))
    }

    fn active_window_id(&self) -> Result<Option<String>> {
        // wmctrl не умеет напрямую печатать активное окно, но в verbose
        // режиме `-a :ACTIVE:` сообщает его id
        let output = Self::run(&["-a", ":ACTIVE:", "-v"])?;
        if !output.status.success() {
            debug!("wmctrl не нашёл активное окно");
            return Ok(None);
        }

        let mut text = String::from_utf8_lossy(&output.stderr).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stdout));
        parse_active_window_output(&text).map(Some)
    }

    fn activate(&self, window_id: &str) -> Result<()> {
        let output = Self::run(&["-i", "-a", window_id])?;
        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(flitter_error!(
                window_system,
                "wmctrl не смог активировать окно {}: {}",
                window_id,
                stderr.trim()
            ))
        }
    }
}

fn parse_window_list(stdout: &str) -> Result<Vec<WindowRecord>> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            trace_if_enabled!("wmctrl: {}", line);
            parse_window_line(line)
        })
        .collect()
}

/// Разобрать строку `wmctrl -lxp`:
/// `<id> <desktop> <pid> <wm_class>  <machine> <title>`
///
/// Класс окна выравнивается пробелами, поэтому он отделяется от имени машины
/// минимум двумя пробелами. Заголовок может отсутствовать.
fn parse_window_line(line: &str) -> Result<WindowRecord> {
    let malformed = || FlitterError::MalformedOutput(line.to_string());

    let (window_id, rest) = split_field(line).ok_or_else(malformed)?;
    let (desktop, rest) = split_field(rest).ok_or_else(malformed)?;
    let (pid, rest) = split_field(rest).ok_or_else(malformed)?;

    let rest = rest.trim_start();
    let (wm_class, rest) = match rest.split_once("  ") {
        Some((wm_class, rest)) => (wm_class, rest),
        None => split_field(rest).ok_or_else(malformed)?,
    };

    let rest = rest.trim_start();
    let (machine, title) = match rest.split_once(char::is_whitespace) {
        Some((machine, title)) => (machine, title.trim_start()),
        None => (rest, ""),
    };
    if machine.is_empty() {
        return Err(malformed());
    }

    Ok(WindowRecord::new(window_id)
        .with_desktop(desktop)
        .with_pid(pid)
        .with_class(wm_class)
        .with_machine(machine)
        .with_title(title))
}

/// Первое поле строки и остаток после него
fn split_field(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    Some(match text.split_once(char::is_whitespace) {
        Some((field, rest)) => (field, rest),
        None => (text, ""),
    })
}

/// В выводе `wmctrl -a :ACTIVE: -v` id окна стоит последним словом строки
/// `Using window: 0x02a00001`
fn parse_active_window_output(output: &str) -> Result<String> {
    output
        .lines()
        .find(|line| line.contains("Using window"))
        .or_else(|| output.lines().nth(1))
        .and_then(|line| line.split_whitespace().last())
        .map(str::to_string)
        .ok_or_else(|| flitter_error!(malformed, "{}", output.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_window_line() {
        let line = "0x02a00001  0 4346   Navigator.Firefox     mistakenot The Mock Class - Firefox";
        let window = parse_window_line(line).unwrap();

        assert_eq!(window.window_id, "0x02a00001");
        assert_eq!(window.desktop, "0");
        assert_eq!(window.pid, "4346");
        assert_eq!(window.wm_class, "Navigator.Firefox");
        assert_eq!(window.machine, "mistakenot");
        assert_eq!(window.title, "The Mock Class - Firefox");
    }

    #[test]
    fn test_parse_window_line_without_title() {
        let line = "0x01e00003 -1 1523   conky.Conky           mistakenot";
        let window = parse_window_line(line).unwrap();

        assert_eq!(window.desktop, "-1");
        assert_eq!(window.wm_class, "conky.Conky");
        assert_eq!(window.machine, "mistakenot");
        assert_eq!(window.title, "");
    }

    #[test]
    fn test_parse_window_line_keeps_inner_title_spacing() {
        let line = "0x03c00007  1 2210   gnome-terminal-server.Gnome-terminal  host  vim  notes.txt";
        let window = parse_window_line(line).unwrap();

        assert_eq!(window.wm_class, "gnome-terminal-server.Gnome-terminal");
        assert_eq!(window.machine, "host");
        assert_eq!(window.title, "vim  notes.txt");
    }

    #[test]
    fn test_parse_malformed_line() {
        assert!(matches!(
            parse_window_line("0x02a00001  0"),
            Err(FlitterError::MalformedOutput(_))
        ));
    }

    #[test]
    fn test_parse_window_list_skips_blank_lines() {
        let stdout = "0x1  0 1   a.A  host one\n\n0x2  1 2   b.B  host two\n";
        let windows = parse_window_list(stdout).unwrap();

        assert_eq!(windows.len(), 2);
        assert_eq!(windows[1].window_id, "0x2");
        assert_eq!(windows[1].title, "two");
    }

    #[test]
    fn test_parse_active_window_output() {
        let output = "envir_utf8: 1\nUsing window: 0x02a00001\n";
        assert_eq!(parse_active_window_output(output).unwrap(), "0x02a00001");
    }

    #[test]
    fn test_parse_active_window_output_empty() {
        assert!(parse_active_window_output("").is_err());
    }
}

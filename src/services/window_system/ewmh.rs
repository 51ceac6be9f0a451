use crate::error::{FlitterError, Result};
use crate::flitter_error;
use crate::model::WindowRecord;
use tracing::debug;
use x11rb::connection::Connection;
use x11rb::errors::ReplyError;
use x11rb::protocol::xproto::{Atom, AtomEnum, ClientMessageEvent, ConnectionExt, EventMask, Window};
use x11rb::rust_connection::RustConnection;

use super::r#trait::WindowSystem;

/// Значение `_NET_WM_DESKTOP` для окон, видимых на всех рабочих столах
const ALL_DESKTOPS: u32 = 0xFFFF_FFFF;

/// Источник запроса в `_NET_ACTIVE_WINDOW`: 2 = пейджер/утилита пользователя
const SOURCE_PAGER: u32 = 2;

x11rb::atom_manager! {
    pub Atoms: AtomsCookie {
        _NET_CLIENT_LIST,
        _NET_ACTIVE_WINDOW,
        _NET_CURRENT_DESKTOP,
        _NET_WM_DESKTOP,
        _NET_WM_PID,
        _NET_WM_NAME,
        UTF8_STRING,
    }
}

/// Адаптер, работающий с X-сервером напрямую через EWMH хинты
pub struct EwmhWindowSystem {
    conn: RustConnection,
    root: Window,
    atoms: Atoms,
}

impl EwmhWindowSystem {
    pub fn connect() -> Result<Self> {
        let (conn, screen_num) = x11rb::connect(None)?;
        let root = conn
            .setup()
            .roots
            .get(screen_num)
            .map(|screen| screen.root)
            .ok_or_else(|| flitter_error!(window_system, "X-сервер не вернул экран {}", screen_num))?;
        let atoms = Atoms::new(&conn)?.reply()?;

        let system = Self { conn, root, atoms };
        // Оконный менеджер без _NET_CLIENT_LIST нам не подходит
        system.client_list()?;
        Ok(system)
    }

    fn client_list(&self) -> Result<Vec<Window>> {
        let reply = self
            .conn
            .get_property(false, self.root, self.atoms._NET_CLIENT_LIST, AtomEnum::WINDOW, 0, u32::MAX)?
            .reply()?;

        let windows = collect_client_list(reply.value32())?;
        Ok(windows)
    }

    fn cardinal(&self, window: Window, property: Atom, type_: impl Into<Atom>) -> Result<Option<u32>> {
        let reply = self
            .conn
            .get_property(false, window, property, type_, 0, 1)?
            .reply()?;
        Ok(reply.value32().and_then(|mut values| values.next()))
    }

    fn text(&self, window: Window, property: impl Into<Atom>, type_: impl Into<Atom>) -> Result<Option<Vec<u8>>> {
        let reply = self
            .conn
            .get_property(false, window, property, type_, 0, u32::MAX)?
            .reply()?;

        if reply.format != 8 || reply.value.is_empty() {
            Ok(None)
        } else {
            Ok(Some(reply.value))
        }
    }

    fn record(&self, window: Window) -> Result<WindowRecord> {
        let desktop = self
            .cardinal(window, self.atoms._NET_WM_DESKTOP, AtomEnum::CARDINAL)?
            .map(|desktop| (desktop as i32).to_string())
            .unwrap_or_else(|| "-1".to_string());

        let pid = self
            .cardinal(window, self.atoms._NET_WM_PID, AtomEnum::CARDINAL)?
            .unwrap_or(0);

        let wm_class = self
            .text(window, AtomEnum::WM_CLASS, AtomEnum::STRING)?
            .map(|value| join_wm_class(&value))
            .unwrap_or_default();

        let machine = self
            .text(window, AtomEnum::WM_CLIENT_MACHINE, AtomEnum::STRING)?
            .map(|value| lossy(&value))
            .unwrap_or_else(|| "N/A".to_string());

        let title = match self.text(window, self.atoms._NET_WM_NAME, self.atoms.UTF8_STRING)? {
            Some(value) => lossy(&value),
            None => self
                .text(window, AtomEnum::WM_NAME, AtomEnum::ANY)?
                .map(|value| lossy(&value))
                .unwrap_or_default(),
        };

        Ok(WindowRecord::new(format_window_id(window))
            .with_desktop(desktop)
            .with_pid(pid.to_string())
            .with_class(wm_class)
            .with_machine(machine)
            .with_title(title))
    }

    fn send_to_root(&self, window: Window, message_type: Atom, data: [u32; 5]) -> Result<()> {
        let event = ClientMessageEvent::new(32, window, message_type, data);
        self.conn
            .send_event(
                false,
                self.root,
                EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY,
                event,
            )?
            .check()?;
        Ok(())
    }
}

impl WindowSystem for EwmhWindowSystem {
    fn name(&self) -> &'static str {
        "ewmh"
    }

    fn list_windows(&self) -> Result<Vec<WindowRecord>> {
        let mut windows = Vec::new();
        for window in self.client_list()? {
            match self.record(window) {
                Ok(record) => windows.push(record),
                // Окно закрылось, пока мы его читали
                Err(FlitterError::X11Reply(ReplyError::X11Error(e))) => {
                    debug!("Пропускаем окно {}: {:?}", format_window_id(window), e.error_kind);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(windows)
    }

    fn active_window_id(&self) -> Result<Option<String>> {
        let active = self.cardinal(self.root, self.atoms._NET_ACTIVE_WINDOW, AtomEnum::WINDOW)?;
        Ok(active.filter(|window| *window != 0).map(format_window_id))
    }

    fn activate(&self, window_id: &str) -> Result<()> {
        let window = parse_window_id(window_id)?;

        // Как и wmctrl, сначала переключаемся на рабочий стол окна
        if let Some(desktop) = self.cardinal(window, self.atoms._NET_WM_DESKTOP, AtomEnum::CARDINAL)? {
            if desktop != ALL_DESKTOPS {
                debug!("Переключаемся на рабочий стол {}", desktop);
                self.send_to_root(self.root, self.atoms._NET_CURRENT_DESKTOP, [desktop, 0, 0, 0, 0])?;
            }
        }

        self.send_to_root(window, self.atoms._NET_ACTIVE_WINDOW, [SOURCE_PAGER, 0, 0, 0, 0])?;
        self.conn.flush()?;
        Ok(())
    }
}

/// `None` означает, что свойство отсутствует или имеет не тот формат
fn collect_client_list(windows: Option<impl Iterator<Item = Window>>) -> Result<Vec<Window>> {
    match windows {
        Some(windows) => Ok(windows.collect()),
        None => Err(flitter_error!(
            window_system,
            "оконный менеджер не поддерживает _NET_CLIENT_LIST"
        )),
    }
}

/// Id окна в том же виде, что печатает wmctrl
fn format_window_id(window: Window) -> String {
    format!("0x{:08x}", window)
}

fn parse_window_id(window_id: &str) -> Result<Window> {
    let trimmed = window_id.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => Window::from_str_radix(hex, 16),
        None => trimmed.parse::<Window>(),
    };
    parsed.map_err(|_| FlitterError::InvalidWindowId(window_id.to_string()))
}

/// `WM_CLASS` хранит две строки с завершающими нулями: instance и class
fn join_wm_class(value: &[u8]) -> String {
    value
        .split(|byte| *byte == 0)
        .filter(|part| !part.is_empty())
        .map(lossy)
        .collect::<Vec<_>>()
        .join(".")
}

fn lossy(value: &[u8]) -> String {
    String::from_utf8_lossy(value).into_owned()
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Атрибут окна, по которому можно искать совпадения
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowAttr {
    WindowId,
    Desktop,
    Pid,
    WmClass,
    Machine,
    Title,
}

impl WindowAttr {
    pub const ALL: [WindowAttr; 6] = [
        WindowAttr::WindowId,
        WindowAttr::Desktop,
        WindowAttr::Pid,
        WindowAttr::WmClass,
        WindowAttr::Machine,
        WindowAttr::Title,
    ];

    pub fn name(self) -> &'static str {
        match self {
            WindowAttr::WindowId => "window_id",
            WindowAttr::Desktop => "desktop",
            WindowAttr::Pid => "pid",
            WindowAttr::WmClass => "wm_class",
            WindowAttr::Machine => "machine",
            WindowAttr::Title => "title",
        }
    }
}

/// Снимок одного открытого окна.
///
/// Все поля хранятся строками в том виде, в каком их печатает `wmctrl -lxp`,
/// независимо от бэкенда. Два снимка равны, если совпадает `window_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowRecord {
    pub window_id: String,
    pub desktop: String,
    pub pid: String,
    pub wm_class: String,
    pub machine: String,
    #[serde(default)]
    pub title: String,
}

impl WindowRecord {
    pub fn new(window_id: impl Into<String>) -> Self {
        Self {
            window_id: window_id.into(),
            desktop: "0".to_string(),
            pid: "0".to_string(),
            wm_class: String::new(),
            machine: "N/A".to_string(),
            title: String::new(),
        }
    }

    pub fn with_desktop(mut self, desktop: impl Into<String>) -> Self {
        self.desktop = desktop.into();
        self
    }

    pub fn with_pid(mut self, pid: impl Into<String>) -> Self {
        self.pid = pid.into();
        self
    }

    pub fn with_class(mut self, wm_class: impl Into<String>) -> Self {
        self.wm_class = wm_class.into();
        self
    }

    pub fn with_machine(mut self, machine: impl Into<String>) -> Self {
        self.machine = machine.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn attr(&self, attr: WindowAttr) -> &str {
        match attr {
            WindowAttr::WindowId => &self.window_id,
            WindowAttr::Desktop => &self.desktop,
            WindowAttr::Pid => &self.pid,
            WindowAttr::WmClass => &self.wm_class,
            WindowAttr::Machine => &self.machine,
            WindowAttr::Title => &self.title,
        }
    }
}

impl PartialEq for WindowRecord {
    fn eq(&self, other: &Self) -> bool {
        self.window_id == other.window_id
    }
}

impl Eq for WindowRecord {}

impl Hash for WindowRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.window_id.hash(state);
    }
}

impl fmt::Display for WindowRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.wm_class.is_empty() {
            write!(f, "{} \"{}\"", self.window_id, self.title)
        } else {
            write!(f, "{} \"{}\" ({})", self.window_id, self.title, self.wm_class)
        }
    }
}

use super::window::{WindowAttr, WindowRecord};
use serde::{Deserialize, Serialize};

/// Описание приложения: набор ограничений-подстрок на атрибуты окна
/// плюс необязательная команда запуска.
///
/// Ограничение `wm_class = ".Firefox"` совпадёт с окном `Navigator.Firefox`.
/// Сравнение регистронезависимое. Команда в сопоставлении не участвует.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Descriptor {
    #[serde(default, alias = "id", skip_serializing_if = "Option::is_none")]
    pub window_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desktop: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wm_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

impl Descriptor {
    pub fn with_class(mut self, wm_class: impl Into<String>) -> Self {
        self.wm_class = Some(wm_class.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn constraint(&self, attr: WindowAttr) -> Option<&str> {
        let value = match attr {
            WindowAttr::WindowId => &self.window_id,
            WindowAttr::Desktop => &self.desktop,
            WindowAttr::Pid => &self.pid,
            WindowAttr::WmClass => &self.wm_class,
            WindowAttr::Machine => &self.machine,
            WindowAttr::Title => &self.title,
        };
        value.as_deref()
    }

    /// Все заданные ограничения (без `command`)
    pub fn constraints(&self) -> impl Iterator<Item = (WindowAttr, &str)> + '_ {
        WindowAttr::ALL
            .into_iter()
            .filter_map(move |attr| self.constraint(attr).map(|value| (attr, value)))
    }

    /// Есть ли хотя бы одно ограничение на атрибуты окна
    pub fn has_constraints(&self) -> bool {
        self.constraints().next().is_some()
    }

    /// Команда запуска, если она задана и не пустая
    pub fn command(&self) -> Option<&str> {
        self.command
            .as_deref()
            .map(str::trim)
            .filter(|command| !command.is_empty())
    }

    /// Проверить, соответствует ли окно всем ограничениям (регистронезависимо)
    pub fn matches(&self, window: &WindowRecord) -> bool {
        self.constraints().all(|(attr, needle)| {
            window
                .attr(attr)
                .to_lowercase()
                .contains(&needle.to_lowercase())
        })
    }

    /// Наложить поверх значения из `overrides` (заданные поля побеждают)
    pub fn overlay(mut self, overrides: Descriptor) -> Self {
        let Descriptor {
            window_id,
            desktop,
            pid,
            wm_class,
            machine,
            title,
            command,
        } = overrides;

        self.window_id = window_id.or(self.window_id);
        self.desktop = desktop.or(self.desktop);
        self.pid = pid.or(self.pid);
        self.wm_class = wm_class.or(self.wm_class);
        self.machine = machine.or(self.machine);
        self.title = title.or(self.title);
        self.command = command.or(self.command);
        self
    }
}

/// Проверить, соответствует ли окно любому из описаний
pub fn matches_any<'a, I>(window: &WindowRecord, descriptors: I) -> bool
where
    I: IntoIterator<Item = &'a Descriptor>,
{
    descriptors
        .into_iter()
        .any(|descriptor| descriptor.matches(window))
}

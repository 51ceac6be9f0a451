use crate::error::{FlitterError, Result};
use crate::model::Descriptor;
use crate::utils::paths;
use anyhow::Context;
use figment::{
    providers::{Env, Format, Json, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::info;

/// Конфигурация по умолчанию, если у пользователя нет своего файла
const DEFAULT_CONFIG: &str = include_str!("../flitter.json");

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub state: StateConfig,
    #[serde(default)]
    pub specs: BTreeMap<String, Descriptor>,
    #[serde(default)]
    pub ignore: Vec<Descriptor>,
    // Индекс алиасов в нижнем регистре - не сериализуется, строится после загрузки
    #[serde(skip)]
    alias_index: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WindowConfig {
    #[serde(default)]
    pub backend: Backend,
}

/// Способ общения с оконным менеджером
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Сначала EWMH, затем wmctrl
    #[default]
    Auto,
    /// Напрямую через X11 (EWMH хинты)
    Ewmh,
    /// Через утилиту wmctrl
    Wmctrl,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StateConfig {
    /// Путь к файлу MRU списка; по умолчанию в каталоге кэша пользователя
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mru_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            window: WindowConfig::default(),
            state: StateConfig::default(),
            specs: BTreeMap::new(),
            ignore: Vec::new(),
            alias_index: HashMap::new(),
        }
    }
}

impl Config {
    /// Загрузить конфигурацию. `~` в пути раскрывается; если файла нет,
    /// используется встроенная конфигурация по умолчанию.
    pub fn load(config_path: &str) -> Result<Self> {
        let path = paths::expand_tilde(config_path);

        let figment = if path.is_file() {
            info!("Конфигурация загружается из: {}", path.display());
            Figment::from(Serialized::defaults(Config::default())).merge(Json::file(&path))
        } else {
            info!(
                "Файл {} не найден, используется конфигурация по умолчанию",
                path.display()
            );
            Figment::from(Serialized::defaults(Config::default())).merge(Json::string(DEFAULT_CONFIG))
        };

        Self::from_figment(figment.merge(Env::prefixed("FLITTER_").split("__")), &path)
    }

    fn from_figment(figment: Figment, source: &Path) -> Result<Self> {
        let mut config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", source))?;

        config.validate()?;
        config.build_alias_index()?;

        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        for (alias, descriptor) in &self.specs {
            if alias.trim().is_empty() {
                anyhow::bail!("Пустой алиас в specs");
            }
            if !descriptor.has_constraints() && descriptor.command().is_none() {
                anyhow::bail!("Описание '{}' не содержит ни ограничений, ни команды", alias);
            }
        }

        for (i, descriptor) in self.ignore.iter().enumerate() {
            // Пустое описание совпало бы со всеми окнами
            if !descriptor.has_constraints() {
                anyhow::bail!("Пустое описание в ignore #{}", i + 1);
            }
        }

        Ok(())
    }

    /// Строит индекс алиасов без учёта регистра
    fn build_alias_index(&mut self) -> anyhow::Result<()> {
        self.alias_index.clear();
        for alias in self.specs.keys() {
            let lower = alias.to_lowercase();
            if let Some(existing) = self.alias_index.insert(lower, alias.clone()) {
                anyhow::bail!(
                    "Алиасы '{}' и '{}' совпадают без учёта регистра",
                    existing,
                    alias
                );
            }
        }
        Ok(())
    }

    /// Найти описание по алиасу (регистронезависимо)
    pub fn descriptor(&self, alias: &str) -> Result<&Descriptor> {
        match self
            .alias_index
            .get(&alias.to_lowercase())
            .and_then(|key| self.specs.get(key))
        {
            Some(descriptor) => Ok(descriptor),
            None => FlitterError::unknown_alias(alias),
        }
    }

    /// Все настроенные описания (для режима "прочих" окон)
    pub fn descriptors(&self) -> Vec<Descriptor> {
        self.specs.values().cloned().collect()
    }

    pub fn mru_path(&self) -> PathBuf {
        match &self.state.mru_file {
            Some(path) => paths::expand_tilde(path),
            None => paths::default_mru_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn load_json(json: &str) -> Result<Config> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flitter.json");
        fs::write(&path, json).unwrap();
        Config::load(path.to_str().unwrap())
    }

    #[test]
    fn test_default_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window.backend, Backend::Auto);
    }

    #[test]
    fn test_builtin_default_config_loads() {
        let config = Config::load("/nonexistent/flitter.json").unwrap();
        assert!(config.descriptor("firefox").is_ok());
        assert!(!config.ignore.is_empty());
    }

    #[test]
    fn test_load_specs_and_ignore() {
        let config = load_json(
            r#"{
                "specs": {
                    "Firefox": {"command": "firefox", "wm_class": ".Firefox"},
                    "term": {"wm_class": "Terminal.Terminal"}
                },
                "ignore": [{"wm_class": "desktop_window.Nautilus"}],
                "window": {"backend": "wmctrl"}
            }"#,
        )
        .unwrap();

        let firefox = config.descriptor("FIREFOX").unwrap();
        assert_eq!(firefox.wm_class.as_deref(), Some(".Firefox"));
        assert_eq!(firefox.command(), Some("firefox"));
        assert_eq!(config.descriptors().len(), 2);
        assert_eq!(config.ignore.len(), 1);
        assert_eq!(config.window.backend, Backend::Wmctrl);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_unknown_alias() {
        let config = load_json(r#"{"specs": {"term": {"wm_class": ".Terminal"}}}"#).unwrap();
        assert!(matches!(
            config.descriptor("firefox"),
            Err(FlitterError::UnknownAlias(alias)) if alias == "firefox"
        ));
    }

    #[test]
    fn test_aliases_colliding_by_case_are_rejected() {
        let result = load_json(
            r#"{"specs": {"Term": {"wm_class": "a"}, "term": {"wm_class": "b"}}}"#,
        );
        assert!(matches!(result, Err(FlitterError::Config(_))));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(load_json(r#"{"logging": {"level": "loud"}}"#).is_err());
        assert!(load_json(r#"{"window": {"backend": "sway"}}"#).is_err());
        assert!(load_json(r#"{"ignore": [{}]}"#).is_err());
        assert!(load_json(r#"{"specs": {"empty": {}}}"#).is_err());
        assert!(load_json(r#"{"specs": {"bad": {"klass": "x"}}}"#).is_err());
    }

    #[test]
    fn test_mru_path_override() {
        let mut config = Config::default();
        config.state.mru_file = Some("/tmp/flitter-test/mru.json".to_string());
        assert_eq!(config.mru_path(), PathBuf::from("/tmp/flitter-test/mru.json"));
    }
}

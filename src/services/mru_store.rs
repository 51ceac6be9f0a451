use crate::error::Result;
use crate::model::WindowRecord;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Сохранённый между вызовами MRU порядок окон.
///
/// Хранилище только читает и пишет список. Согласование с живыми окнами
/// ([`reconcile`]) и подъём окна ([`promote`]) работают над значениями и
/// файловую систему не трогают.
pub struct MruStore {
    path: PathBuf,
    read_only: bool,
}

impl MruStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            read_only: false,
        }
    }

    /// Хранилище, которое читает состояние, но никогда его не перезаписывает
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Загрузить сохранённый MRU список. Никогда не падает:
    /// отсутствующий или повреждённый файл означает пустой список.
    pub fn load(&self) -> Vec<WindowRecord> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!("MRU состояние не прочитано ({}): {}", self.path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<WindowRecord>>(&content) {
            Ok(windows) => {
                debug!("Загружено {} окон из MRU списка", windows.len());
                windows
            }
            Err(e) => {
                warn!(
                    "MRU состояние повреждено ({}), начинаем с пустого списка: {}",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Атомарно перезаписать MRU состояние: пишем во временный файл и переименовываем
    pub fn persist(&self, windows: &[WindowRecord]) -> Result<()> {
        if self.read_only {
            info!("Dry-run: MRU список из {} окон не сохраняется", windows.len());
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(windows)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        let mut temp_name = self.path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_file = PathBuf::from(temp_name);

        if let Err(e) = fs::write(&temp_file, json) {
            cleanup_temp_file(&temp_file, &e);
            return Err(e.into());
        }

        if let Err(e) = fs::rename(&temp_file, &self.path) {
            cleanup_temp_file(&temp_file, &e);
            return Err(e.into());
        }

        debug!("MRU список сохранён в {}", self.path.display());
        Ok(())
    }
}

fn cleanup_temp_file(temp_file: &Path, original_error: &std::io::Error) {
    if let Err(cleanup_err) = fs::remove_file(temp_file) {
        warn!(
            "Не удалось удалить временный файл {} после ошибки '{}': {}",
            temp_file.display(),
            original_error,
            cleanup_err
        );
    }
}

/// Согласовать сохранённый список с живыми окнами.
///
/// Закрытые окна выбрасываются, новые встают в начало в порядке `live`,
/// остальные сохраняют свой относительный MRU порядок. Снимки берутся из
/// `live`, чтобы заголовки и прочие атрибуты были актуальными.
pub fn reconcile(persisted: Vec<WindowRecord>, live: &[WindowRecord]) -> Vec<WindowRecord> {
    let mut known: Vec<WindowRecord> = Vec::with_capacity(persisted.len());
    for old in persisted {
        if known.contains(&old) {
            continue;
        }
        if let Some(current) = live.iter().find(|w| **w == old) {
            known.push(current.clone());
        }
    }

    let mut reconciled: Vec<WindowRecord> = live
        .iter()
        .filter(|w| !known.contains(w))
        .cloned()
        .collect();

    reconciled.extend(known);
    reconciled
}

/// Переместить окно в начало списка.
///
/// # Panics
///
/// Паникует, если окна нет в списке или оно встречается больше одного раза:
/// это ошибка в логике выбора, а не в пользовательских данных.
pub fn promote(mut windows: Vec<WindowRecord>, window: &WindowRecord) -> Vec<WindowRecord> {
    let Some(index) = windows.iter().position(|w| w == window) else {
        panic!("попытка поднять окно {}, которого нет в MRU списке", window);
    };

    let promoted = windows.remove(index);
    assert!(
        !windows.contains(&promoted),
        "окно {} встречается в MRU списке больше одного раза",
        promoted
    );
    windows.insert(0, promoted);
    windows
}

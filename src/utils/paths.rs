use std::path::PathBuf;

/// Имя файла MRU списка в каталоге кэша
const MRU_FILE_NAME: &str = "mru.json";

/// Запасной путь, если каталог кэша определить не удалось
const FALLBACK_MRU_FILE: &str = ".flitter-mru.json";

/// Раскрыть ведущий `~` в домашний каталог пользователя
pub fn expand_tilde(path: &str) -> PathBuf {
    expand_tilde_with(path, dirs::home_dir())
}

fn expand_tilde_with(path: &str, home: Option<PathBuf>) -> PathBuf {
    let Some(home) = home else {
        return PathBuf::from(path);
    };

    if path == "~" {
        home
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}

/// Путь к MRU списку по умолчанию: `<cache>/flitter/mru.json`
pub fn default_mru_path() -> PathBuf {
    default_mru_path_with(dirs::cache_dir(), dirs::home_dir())
}

fn default_mru_path_with(cache: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    match (cache, home) {
        (Some(cache), _) => cache.join("flitter").join(MRU_FILE_NAME),
        (None, Some(home)) => home.join(FALLBACK_MRU_FILE),
        (None, None) => PathBuf::from(FALLBACK_MRU_FILE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tilde() {
        let home = Some(PathBuf::from("/home/user"));

        assert_eq!(expand_tilde_with("~", home.clone()), PathBuf::from("/home/user"));
        assert_eq!(
            expand_tilde_with("~/.flitter.json", home.clone()),
            PathBuf::from("/home/user/.flitter.json")
        );
        assert_eq!(
            expand_tilde_with("/etc/flitter.json", home.clone()),
            PathBuf::from("/etc/flitter.json")
        );
        // ~user не поддерживается
        assert_eq!(expand_tilde_with("~other/x", home), PathBuf::from("~other/x"));
        assert_eq!(expand_tilde_with("~/x", None), PathBuf::from("~/x"));
    }

    #[test]
    fn test_default_mru_path() {
        assert_eq!(
            default_mru_path_with(Some("/home/user/.cache".into()), Some("/home/user".into())),
            PathBuf::from("/home/user/.cache/flitter/mru.json")
        );
        assert_eq!(
            default_mru_path_with(None, Some("/home/user".into())),
            PathBuf::from("/home/user/.flitter-mru.json")
        );
        assert_eq!(default_mru_path_with(None, None), PathBuf::from(".flitter-mru.json"));
    }
}

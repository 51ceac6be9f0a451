use tracing::{debug, warn};

/// Замечания о графической сессии, которые стоит показать пользователю
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionIssue {
    /// DISPLAY не задан: к X-серверу подключиться не получится
    NoDisplay,
    /// Wayland сессия: видны только окна, работающие через XWayland
    Wayland,
}

/// Проверить окружение графической сессии. Никогда не завершается ошибкой,
/// только предупреждает: решение принимает адаптер оконной системы.
pub fn check_session() {
    let display_var = std::env::var("DISPLAY").ok();
    let session_type = std::env::var("XDG_SESSION_TYPE").ok();

    let issues = session_issues(display_var.as_deref(), session_type.as_deref());
    if issues.is_empty() {
        debug!("Графическая сессия: DISPLAY={:?}, тип={:?}", display_var, session_type);
    }

    for issue in issues {
        match issue {
            SessionIssue::NoDisplay => {
                warn!("Переменная DISPLAY не задана, подключение к X-серверу скорее всего не удастся");
            }
            SessionIssue::Wayland => {
                warn!("Запущена Wayland сессия: переключаться можно только между окнами XWayland");
            }
        }
    }
}

fn session_issues(display: Option<&str>, session_type: Option<&str>) -> Vec<SessionIssue> {
    let mut issues = Vec::new();

    if display.map_or(true, |value| value.trim().is_empty()) {
        issues.push(SessionIssue::NoDisplay);
    }
    if session_type.is_some_and(|value| value.eq_ignore_ascii_case("wayland")) {
        issues.push(SessionIssue::Wayland);
    }

    issues
}

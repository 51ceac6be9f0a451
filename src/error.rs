use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlitterError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Не удалось подключиться к X-серверу: {0}")]
    X11Connect(#[from] x11rb::errors::ConnectError),

    #[error("Ошибка соединения с X-сервером: {0}")]
    X11Connection(#[from] x11rb::errors::ConnectionError),

    #[error("Ошибка ответа X-сервера: {0}")]
    X11Reply(#[from] x11rb::errors::ReplyError),

    #[error("Описание окна '{0}' не найдено в конфигурации")]
    UnknownAlias(String),

    #[error("Некорректный идентификатор окна: {0}")]
    InvalidWindowId(String),

    #[error("Не удалось разобрать вывод wmctrl: {0}")]
    MalformedOutput(String),

    #[error("Оконная система недоступна: {0}")]
    WindowSystem(String),

    #[error("Не удалось запустить команду: {0}")]
    Launch(String),
}

impl FlitterError {
    pub fn unknown_alias<T>(alias: impl Into<String>) -> Result<T> {
        Err(FlitterError::UnknownAlias(alias.into()))
    }
}

pub type Result<T> = std::result::Result<T, FlitterError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! flitter_error {
    (malformed, $($arg:tt)*) => {
        $crate::error::FlitterError::MalformedOutput(format!($($arg)*))
    };
    (window_system, $($arg:tt)*) => {
        $crate::error::FlitterError::WindowSystem(format!($($arg)*))
    };
    (launch, $($arg:tt)*) => {
        $crate::error::FlitterError::Launch(format!($($arg)*))
    };
}

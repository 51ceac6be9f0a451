use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};

mod config;
mod error;
mod model;
mod services;
mod utils;

use config::{Backend, Config};
use model::Descriptor;
use services::{
    create_launcher,
    create_window_system,
    mru_store,
    ActionExecutor,
    MruStore,
    Selector,
};

/// Constraint flags that `--id` and `--others` exclude
const CONSTRAINT_FLAGS: [&str; 5] = ["desktop", "pid", "wm_class", "machine", "title"];

#[derive(Parser, Debug)]
#[command(name = "flitter")]
#[command(version)]
#[command(about = "Запустить приложение, поднять его окно или переключиться на следующее")]
struct Args {
    /// Алиас описания окна из конфигурации (без учёта регистра)
    alias: Option<String>,

    /// Id окна
    #[arg(short = 'i', long = "id", conflicts_with_all = CONSTRAINT_FLAGS)]
    window_id: Option<String>,

    /// Рабочий стол окна
    #[arg(short, long)]
    desktop: Option<String>,

    /// PID процесса окна
    #[arg(short, long)]
    pid: Option<String>,

    /// WM_CLASS окна (instance.class)
    #[arg(short, long)]
    wm_class: Option<String>,

    /// Машина, на которой запущено приложение
    #[arg(short, long)]
    machine: Option<String>,

    /// Заголовок окна
    #[arg(short, long)]
    title: Option<String>,

    /// Команда запуска приложения
    #[arg(short, long)]
    command: Option<String>,

    /// Путь к файлу конфигурации
    #[arg(short = 'f', long = "file", default_value = "~/.flitter.json")]
    config: String,

    /// Переключаться между окнами, не подходящими ни под одно описание
    #[arg(short, long, conflicts_with_all = ["window_id", "command", "desktop", "pid", "wm_class", "machine", "title"])]
    others: bool,

    /// Бэкенд оконной системы (перекрывает window.backend из конфигурации)
    #[arg(long, value_enum)]
    backend: Option<Backend>,

    /// Режим сухого запуска (без реальных действий)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (перекрывает logging.level из конфигурации)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    /// Ограничения и команда, заданные в командной строке
    fn overrides(&self) -> Descriptor {
        Descriptor {
            window_id: self.window_id.clone(),
            desktop: self.desktop.clone(),
            pid: self.pid.clone(),
            wm_class: self.wm_class.clone(),
            machine: self.machine.clone(),
            title: self.title.clone(),
            command: self.command.clone(),
        }
    }

    /// Описание из конфигурации по алиасу с наложенными поверх флагами
    fn descriptor(&self, config: &Config) -> error::Result<Descriptor> {
        let base = match &self.alias {
            Some(alias) => config.descriptor(alias)?.clone(),
            None => Descriptor::default(),
        };
        Ok(base.overlay(self.overrides()))
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load(&args.config)?;

    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    init_tracing(level)?;

    debug!("flitter v{}", env!("CARGO_PKG_VERSION"));

    let descriptor = args.descriptor(&config)?;
    for (attr, value) in descriptor.constraints() {
        debug!("Ограничение: {} ~ {:?}", attr.name(), value);
    }

    if args.dry_run {
        warn!("Режим сухого запуска - реальные действия отключены");
    } else {
        utils::check_session();
    }

    let backend = args.backend.unwrap_or(config.window.backend);
    let windows = create_window_system(backend, args.dry_run)
        .context("Не удалось подключиться к оконной системе")?;
    let launcher = create_launcher(args.dry_run);

    let live = windows.list_windows()?;
    let focused = windows.focused_window(&live)?;
    debug!(
        "Открыто окон: {}, в фокусе: {}",
        live.len(),
        focused
            .as_ref()
            .map_or_else(|| "нет".to_string(), |window| window.to_string())
    );

    let mut store = MruStore::new(config.mru_path());
    if args.dry_run {
        store = store.read_only();
    }
    let mru = mru_store::reconcile(store.load(), &live);

    let known = config.descriptors();
    let selector = if args.others {
        Selector::others(&descriptor, &known)
    } else {
        Selector::new(&descriptor)
    }
    .with_ignore(&config.ignore);

    let action = selector.decide(&mru, focused.as_ref());
    info!("Выбрано действие: {}", action);

    ActionExecutor::new(&*windows, &*launcher, &store).execute(&action, mru)?;

    Ok(())
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .init();

    Ok(())
}

use crate::error::Result;
use crate::flitter_error;
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Запуск команды приложения
pub trait CommandLauncher {
    fn launch(&self, command: &str) -> Result<()>;
}

/// Запускает команду через `sh -c` и не ждёт её завершения
pub struct ShellLauncher;

impl CommandLauncher for ShellLauncher {
    fn launch(&self, command: &str) -> Result<()> {
        info!("Запуск команды: {}", command);

        let child = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| flitter_error!(launch, "{}: {}", command, e))?;

        debug!("Команда запущена, pid {}", child.id());
        Ok(())
    }
}

pub struct DryRunLauncher;

impl CommandLauncher for DryRunLauncher {
    fn launch(&self, command: &str) -> Result<()> {
        info!("Dry-run: эмулируем запуск команды: {}", command);
        Ok(())
    }
}

/// Factory function to create an appropriate launcher based on the dry_run flag
pub fn create_launcher(dry_run: bool) -> Box<dyn CommandLauncher> {
    if dry_run {
        Box::new(DryRunLauncher)
    } else {
        Box::new(ShellLauncher)
    }
}

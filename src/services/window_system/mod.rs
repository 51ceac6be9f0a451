//! WindowSystem adapters: responsibility and boundaries
//!
//! This module and its submodules are responsible ONLY for talking to the
//! window manager: enumerating open windows, reporting the focused one and
//! activating a window by id. They MUST NOT filter windows or make any
//! selection decisions. Ignoring desktop/panel windows is done through the
//! `ignore` list in the config, and choosing what to focus belongs to
//! `Selector`.

mod dry_run;
mod ewmh;
mod r#trait;
mod wmctrl;

pub use self::r#trait::{create_window_system, WindowSystem};

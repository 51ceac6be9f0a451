pub mod executor;
pub mod launcher;
pub mod mru_store;
pub mod selector;
pub mod window_system;

pub use executor::ActionExecutor;
pub use launcher::create_launcher;
pub use mru_store::MruStore;
pub use selector::Selector;
pub use window_system::create_window_system;

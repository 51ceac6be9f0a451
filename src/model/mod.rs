pub mod descriptor;
pub mod window;

pub use descriptor::{matches_any, Descriptor};
pub use window::WindowRecord;

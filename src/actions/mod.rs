pub mod browser;

pub use browser::{OpenError, open_in_browser};

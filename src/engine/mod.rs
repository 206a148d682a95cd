// engine module: runs searches off the UI thread

pub mod gh;
mod interface;
pub mod stub;

pub use gh::GhEngine;
pub use interface::{Engine, EngineHandle, Event, Request};
pub use stub::StubEngine;

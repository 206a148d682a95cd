// Pedantic: suppress noise for internal crate code.
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]

pub mod actions;
pub mod app;
pub mod column;
pub mod components;
pub mod config;
pub mod dashboard;
pub mod engine;
pub mod keys;
pub mod layout;
pub mod page;
pub mod panel;
pub mod types;
pub mod util;

//! Desktop application state: one window, one shared web view and the
//! page stack the session navigates.

mod core;
mod event_handler;
mod init;
mod navigation;
mod polling;
mod title;
mod types;

pub use self::core::TurboApp;

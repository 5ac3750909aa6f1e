pub mod action;
pub mod app;
pub mod config;
pub mod error;
pub mod event;
pub mod format;
pub mod history;
pub mod logging;
pub mod recorder;
pub mod store;
pub mod system;
pub mod ui;

//! InkBoard Application
//!
//! Configuration loading and script replay around an
//! [`inkboard_core::Whiteboard`] session.

mod app;
mod script;

pub use app::{App, AppConfig, AppError, AppResult};
pub use script::{Command, RunReport, ScriptRunner, parse_script};

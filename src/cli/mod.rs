//! Terminal front end for the login flow: argument parsing, telemetry setup,
//! and the prompt/notify/navigate glue around `LoginFlow`.

pub mod actions;
pub mod commands;
pub mod dispatch;
pub mod start;
pub mod telemetry;
pub mod terminal;

pub use start::start;

//! vintner-cli library - exposes the command and HTTP modules for tests

pub mod commands;
pub mod http;

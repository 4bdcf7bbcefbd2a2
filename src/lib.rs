pub mod cli;
pub mod config;
pub mod core;
pub mod shell;
pub mod venv;

pub use crate::core::error::{Result, VshError};

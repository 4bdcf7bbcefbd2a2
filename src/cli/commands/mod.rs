pub mod list;
pub mod venv;

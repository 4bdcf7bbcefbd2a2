pub mod builder;
pub mod discovery;
pub mod interpreter;
pub mod layout;
pub mod manager;
pub mod validator;

#[cfg(test)]
pub(crate) mod testing;

pub use builder::{BuildOptions, VenvBuilder};
pub use discovery::{find_environment_folders, EnvironmentFinder};
pub use manager::{CreateOptions, RemoveOptions, VenvManager};
pub use validator::{is_valid, validate_environment};

pub mod error;
pub mod fs;
pub mod path;
pub mod process;

pub use error::{Result, VshError};
pub use fs::{clear_directory, ensure_dir_exists, is_dir_empty, symlink_dir};
pub use path::{absolutize, resolve_path};
pub use process::ProcessExecutor;

pub mod env;
pub mod record;
pub mod store;
pub mod validation;

pub use env::{Environment, TOOL_NAME};
pub use record::VenvRecord;
pub use store::RecordStore;
pub use validation::{validate_venv_name, validate_venv_name_and_path};

pub mod enter;
pub mod family;
pub mod prompt;
pub mod rcfiles;

pub use enter::{enter, prepare, EnterOptions, ShellInvocation};
pub use family::ShellFamily;

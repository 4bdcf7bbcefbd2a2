use crate::config::env::Environment;
use crate::core::error::{Result, VshError};
use crate::core::ProcessExecutor;
use std::path::{Path, PathBuf};

const INTERPRETER_PREFIX: &str = "python";
const DEFAULT_INTERPRETERS: [&str; 2] = ["python3", "python"];

/// Locates a Python interpreter from a version (`3.11`), a name (`pypy3`) or a path.
///
/// Search order follows `PATH`; the first directory holding an executable with that name wins.
pub fn resolve(hint: Option<&str>, env: &Environment) -> Result<PathBuf> {
    let hint = match hint.map(str::trim).filter(|h| !h.is_empty()) {
        Some(hint) => hint,
        None => return find_default(env),
    };

    let as_path = env.cwd.join(hint);
    if as_path.exists() {
        return Ok(as_path);
    }

    let name = if hint.starts_with('p') {
        hint.to_string()
    } else {
        format!("{}{}", INTERPRETER_PREFIX, hint)
    };

    search(&name, env).ok_or(VshError::InterpreterNotFound { version: name })
}

/// Interpreter used when none was requested; falls back to the bare `python3` name.
pub fn default_interpreter(env: &Environment) -> PathBuf {
    find_default(env).unwrap_or_else(|_| PathBuf::from(DEFAULT_INTERPRETERS[0]))
}

fn find_default(env: &Environment) -> Result<PathBuf> {
    DEFAULT_INTERPRETERS
        .iter()
        .find_map(|name| search(name, env))
        .ok_or_else(|| VshError::InterpreterNotFound {
            version: DEFAULT_INTERPRETERS[0].to_string(),
        })
}

fn search(name: &str, env: &Environment) -> Option<PathBuf> {
    which::which_in(name, Some(&env.path), &env.cwd).ok()
}

/// `major.minor` of an interpreter, as reported by the interpreter itself.
pub async fn interpreter_version(interpreter: &Path) -> Result<String> {
    let version = ProcessExecutor::execute_with_output(
        interpreter,
        &[
            "-c",
            "import sys; print('{}.{}'.format(*sys.version_info[:2]))",
        ],
        None,
    )
    .await?;

    if version.is_empty() {
        return Err(VshError::InterpreterNotFound {
            version: interpreter.display().to_string(),
        });
    }
    Ok(version)
}

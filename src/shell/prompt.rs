use crate::shell::family::ShellFamily;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static ZERO_WIDTH_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\\e|\\x1b)\[[^m]*m").expect("valid regex"));

const DEFAULT_BASH_PROMPT: &str = r"\[\e[36m\]\w\[\e[0m\]\$ ";
const DEFAULT_ZSH_PROMPT: &str = "%F{cyan}%~%f%# ";

/// Wraps color escape codes in `\[ \]` so bash doesn't count them toward the line width.
///
/// Without this, bash under tmux corrupts the command line when walking history.
/// Codes that are already wrapped are left as they are.
pub fn escape_zero_length_codes(prompt: &str) -> String {
    ZERO_WIDTH_CODE_RE
        .replace_all(prompt, |caps: &Captures<'_>| {
            let whole = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
            let start = caps.get(0).map(|m| m.start()).unwrap_or_default();
            let end = caps.get(0).map(|m| m.end()).unwrap_or_default();
            let wrapped = prompt[..start].ends_with(r"\[") && prompt[end..].starts_with(r"\]");
            if wrapped {
                whole.to_string()
            } else {
                format!(r"\[{}\]", whole)
            }
        })
        .into_owned()
}

/// Prompt variable and value to export for the given shell.
pub fn prompt_var(
    family: ShellFamily,
    venv_name: &str,
    inherited: Option<&str>,
) -> Option<(&'static str, String)> {
    let var = family.prompt_var()?;
    let value = match family {
        ShellFamily::Bash => {
            let base = inherited
                .map(escape_zero_length_codes)
                .unwrap_or_else(|| DEFAULT_BASH_PROMPT.to_string());
            format!("({}) {}", venv_name, base)
        }
        ShellFamily::Zsh => {
            let base = inherited.unwrap_or(DEFAULT_ZSH_PROMPT);
            format!("({}) {}", venv_name, base)
        }
        ShellFamily::PowerShell | ShellFamily::Unknown => return None,
    };
    Some((var, value))
}

/// PowerShell prompt function that prefixes the environment name.
pub fn powershell_prompt_command(venv_name: &str) -> String {
    format!(
        "function prompt {{ \"({}) PS $($executionContext.SessionState.Path.CurrentLocation)> \" }}",
        venv_name
    )
}

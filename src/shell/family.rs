use std::path::Path;

/// The shells `vsh` knows how to drive.
///
/// Unknown shells are driven like POSIX shells but their prompt is left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellFamily {
    /// `bash` and `sh`; prompt lives in `PS1`.
    Bash,
    /// `zsh`; prompt lives in `PROMPT`.
    Zsh,
    /// Windows PowerShell or `pwsh`; prompt is a function.
    PowerShell,
    Unknown,
}

impl ShellFamily {
    pub fn detect(shell: &Path) -> Self {
        let name = shell
            .file_stem()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        match name.as_str() {
            "bash" | "sh" => Self::Bash,
            "zsh" => Self::Zsh,
            "powershell" | "pwsh" => Self::PowerShell,
            _ => Self::Unknown,
        }
    }

    /// Environment variable that holds the prompt, when the shell reads it from one.
    pub fn prompt_var(self) -> Option<&'static str> {
        match self {
            Self::Bash => Some("PS1"),
            Self::Zsh => Some("PROMPT"),
            Self::PowerShell | Self::Unknown => None,
        }
    }

    pub fn is_powershell(self) -> bool {
        self == Self::PowerShell
    }

    pub fn separator(self) -> &'static str {
        if self.is_powershell() {
            "; "
        } else {
            " && "
        }
    }

    /// Arguments placed before the composed script.
    pub fn leading_args(self, interactive: bool) -> Vec<String> {
        if self.is_powershell() {
            return ["-NoLogo", "-NonInteractive", "-ExecutionPolicy", "Bypass", "-Command"]
                .iter()
                .map(|s| s.to_string())
                .collect();
        }

        let mut args = Vec::new();
        if interactive {
            args.push("-i".to_string());
        }
        args.push("-c".to_string());
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_by_basename() {
        assert_eq!(ShellFamily::detect(Path::new("/bin/bash")), ShellFamily::Bash);
        assert_eq!(ShellFamily::detect(Path::new("/bin/sh")), ShellFamily::Bash);
        assert_eq!(ShellFamily::detect(Path::new("/usr/local/bin/zsh")), ShellFamily::Zsh);
        assert_eq!(
            ShellFamily::detect(Path::new("powershell.exe")),
            ShellFamily::PowerShell
        );
        assert_eq!(ShellFamily::detect(Path::new("/usr/bin/pwsh")), ShellFamily::PowerShell);
        assert_eq!(ShellFamily::detect(Path::new("/usr/bin/fish")), ShellFamily::Unknown);
    }

    #[test]
    fn posix_invocation_is_interactive_only_on_request() {
        assert_eq!(ShellFamily::Bash.leading_args(true), vec!["-i", "-c"]);
        assert_eq!(ShellFamily::Zsh.leading_args(false), vec!["-c"]);
        assert_eq!(ShellFamily::Unknown.prompt_var(), None);
        assert_eq!(ShellFamily::Bash.separator(), " && ");
    }

    #[test]
    fn powershell_bypasses_execution_policy() {
        let args = ShellFamily::PowerShell.leading_args(true);
        assert!(args.contains(&"Bypass".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("-Command"));
        assert_eq!(ShellFamily::PowerShell.separator(), "; ");
    }
}

//! Fixtures shared by unit tests.

use std::path::{Path, PathBuf};

/// Lays out a POSIX environment skeleton that passes validation without running Python.
pub(crate) fn fake_venv(root: &Path, name: &str, version: &str) -> PathBuf {
    let venv = root.join(name);
    let interpreter = format!("python{}", version);

    std::fs::create_dir_all(venv.join("bin")).unwrap();
    std::fs::create_dir_all(venv.join("include")).unwrap();
    std::fs::create_dir_all(venv.join("lib").join(&interpreter).join("site-packages")).unwrap();
    std::fs::write(venv.join("bin/activate"), "# activate\n").unwrap();
    std::fs::write(venv.join("bin/activate.fish"), "# activate.fish\n").unwrap();
    write_executable(&venv.join("bin").join(&interpreter), "#!/bin/sh\n");
    write_executable(&venv.join("bin/python"), "#!/bin/sh\n");
    std::fs::write(
        venv.join("pyvenv.cfg"),
        "home = /usr/bin\ninclude-system-site-packages = false\n",
    )
    .unwrap();

    venv
}

pub(crate) fn write_executable(path: &Path, content: &str) {
    std::fs::write(path, content).unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }
}

/// First `python3` on the real search path that ships `venv` and `ensurepip`.
///
/// Tests needing a working interpreter skip without one; once one is found a failed build
/// is a real failure.
pub(crate) fn real_python() -> Option<PathBuf> {
    let python = which::which("python3").ok()?;
    let usable = std::process::Command::new(&python)
        .args(["-c", "import venv, ensurepip"])
        .output()
        .is_ok_and(|output| output.status.success());
    usable.then_some(python)
}

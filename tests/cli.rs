use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};

fn vsh(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("vsh").unwrap();
    cmd.current_dir(home)
        .env_clear()
        .env("HOME", home)
        .env("PATH", "/usr/bin:/bin")
        .env("SHELL", "/bin/sh")
        .env("WORKON_HOME", home.join("envs"));
    cmd
}

#[cfg(unix)]
fn fake_venv(root: &Path, name: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let venv = root.join(name);
    std::fs::create_dir_all(venv.join("bin")).unwrap();
    std::fs::create_dir_all(venv.join("include")).unwrap();
    std::fs::create_dir_all(venv.join("lib/python3.11/site-packages")).unwrap();
    std::fs::write(venv.join("bin/activate.fish"), "").unwrap();
    let python = venv.join("bin/python3.11");
    std::fs::write(&python, "#!/bin/sh\n").unwrap();
    std::fs::set_permissions(&python, std::fs::Permissions::from_mode(0o755)).unwrap();
    venv
}

#[test]
fn prints_version() {
    let dir = tempfile::tempdir().unwrap();
    vsh(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "vsh {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn missing_name_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    vsh(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Missing"));
}

#[test]
fn names_with_spaces_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    vsh(dir.path())
        .arg("my env")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("may not include spaces"));
}

#[test]
fn removing_nothing_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    vsh(dir.path())
        .args(["--remove", "ghost"])
        .assert()
        .success();
}

#[cfg(unix)]
#[test]
fn lists_environments() {
    let dir = tempfile::tempdir().unwrap();
    let envs = dir.path().join("envs");
    std::fs::create_dir_all(&envs).unwrap();
    fake_venv(&envs, "demo");
    std::fs::create_dir_all(envs.join("plain")).unwrap();

    vsh(dir.path())
        .args(["--list", "--monochrome"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found demo under:"))
        .stdout(predicate::str::contains("plain").not());
}

#[cfg(unix)]
#[test]
fn exit_code_of_command_is_passed_through() {
    let dir = tempfile::tempdir().unwrap();
    let venv = fake_venv(dir.path(), "demo");

    vsh(dir.path())
        .arg("--path")
        .arg(&venv)
        .arg("exit 3")
        .assert()
        .code(3);

    vsh(dir.path())
        .arg("--path")
        .arg(&venv)
        .args(["echo", "hi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hi"));

    assert!(dir.path().join(".vsh/demo.cfg").exists());
}

#[cfg(unix)]
#[test]
fn remove_deletes_environment_and_record() {
    let dir = tempfile::tempdir().unwrap();
    let envs = dir.path().join("envs");
    std::fs::create_dir_all(&envs).unwrap();
    let venv = fake_venv(&envs, "demo");

    vsh(dir.path()).args(["demo", "true"]).assert().success();
    assert!(dir.path().join(".vsh/demo.cfg").exists());

    vsh(dir.path()).args(["--remove", "demo"]).assert().success();
    assert!(!venv.exists());
    assert!(!dir.path().join(".vsh/demo.cfg").exists());
}

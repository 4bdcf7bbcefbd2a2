use crate::config::env::{Environment, TOOL_NAME};
use crate::config::record::VenvRecord;
use crate::config::store::RecordStore;
use crate::core::error::{Result, VshError};
use crate::core::path::absolutize;
use crate::shell::family::ShellFamily;
use crate::shell::prompt;
use crate::shell::rcfiles::{detect_repo_root, find_vsh_rc_files, RcSearch};
use crate::venv::layout;
use colored::Colorize;
use std::collections::BTreeMap;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;

#[derive(Debug, Clone, Default)]
pub struct EnterOptions {
    /// Working directory to start in; persisted into the record when it differs.
    pub working: Option<PathBuf>,
    /// Start in the current directory regardless of the recorded working directory.
    pub ignore_working: bool,
    /// Pass `-i` to POSIX shells. Detected from stdout when unset.
    pub interactive: Option<bool>,
}

pub struct CapturedOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// A fully composed child process: program, arguments, environment and directory.
#[derive(Debug, Clone)]
pub struct ShellInvocation {
    pub venv_name: String,
    pub program: PathBuf,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub cwd: PathBuf,
}

impl ShellInvocation {
    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .env_clear()
            .envs(&self.env)
            .current_dir(&self.cwd);
        command
    }

    pub fn command_line(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        shlex::try_join(parts.iter().map(String::as_str)).unwrap_or_else(|_| parts.join(" "))
    }

    /// Runs with inherited stdio and returns the child's exit code unchanged.
    pub async fn run(&self) -> Result<i32> {
        let status = self
            .command()
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| {
                VshError::CommandFailed(format!("Failed to execute {}: {}", self.program.display(), e))
            })?;

        Ok(exit_code(status))
    }

    pub async fn output(&self) -> Result<CapturedOutput> {
        let output = self.command().output().await.map_err(|e| {
            VshError::CommandFailed(format!("Failed to execute {}: {}", self.program.display(), e))
        })?;

        Ok(CapturedOutput {
            exit_code: exit_code(output.status),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

#[cfg(unix)]
fn exit_code(status: std::process::ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code(status: std::process::ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

/// Loads the record for `path`, synthesizing and saving a default one when absent.
pub async fn read_or_create_record(
    store: &RecordStore,
    path: &Path,
    working: Option<&Path>,
    env: &Environment,
) -> Result<VenvRecord> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| VshError::VenvNameError {
            name: path.display().to_string(),
        })?;

    let mut record = if store.exists(name) {
        store.load(name, env).await?
    } else {
        let record = VenvRecord::new(name, path, working, env);
        store.save(&record).await?;
        record
    };

    // records are keyed by name, so another environment may own this one
    if record.venv_path != path {
        tracing::debug!(
            "Record {} pointed at {}, now {}",
            name,
            record.venv_path.display(),
            path.display()
        );
        record.venv_path = path.to_path_buf();
        record.working_path = working.map(Path::to_path_buf);
        store.save(&record).await?;
    }

    if let Some(working) = working {
        if record.working_path.as_deref() != Some(working) {
            tracing::debug!("Updating working path of {} to {}", name, working.display());
            record.working_path = Some(working.to_path_buf());
            store.save(&record).await?;
        }
    }

    Ok(record)
}

/// Environment variables for the child: the parent's plus the activation changes for `path`.
pub fn activated_env(
    path: &Path,
    record: &VenvRecord,
    env: &Environment,
) -> Result<BTreeMap<String, String>> {
    let mut vars = env.vars.clone();
    vars.insert(TOOL_NAME.to_ascii_uppercase(), record.venv_name.clone());
    vars.insert("VIRTUAL_ENV".to_string(), path.display().to_string());

    let mut paths = vec![layout::bin_dir(path)];
    paths.extend(env.search_path());
    let joined = std::env::join_paths(paths).map_err(|e| anyhow::anyhow!(e))?;
    vars.insert("PATH".to_string(), joined.to_string_lossy().to_string());

    if !env.disable_prompt {
        let family = ShellFamily::detect(&record.shell_path);
        let inherited = family
            .prompt_var()
            .and_then(|var| vars.get(var).filter(|v| !v.is_empty()).cloned());
        if let Some((var, value)) =
            prompt::prompt_var(family, &record.venv_name, inherited.as_deref())
        {
            vars.insert(var.to_string(), value);
        }
    }

    Ok(vars)
}

fn compose_command(command: &[String]) -> Result<String> {
    match command {
        [single] => Ok(single.clone()),
        tokens => shlex::try_join(tokens.iter().map(String::as_str))
            .map_err(|e| VshError::CommandFailed(format!("Cannot quote command: {}", e))),
    }
}

/// Builds the shell invocation that sources the startup snippets and then runs `command`.
pub async fn prepare(
    env: &Environment,
    store: &RecordStore,
    path: &Path,
    command: &[String],
    options: &EnterOptions,
) -> Result<ShellInvocation> {
    let path = absolutize(path, &env.home, &env.cwd);
    let working = options
        .working
        .as_deref()
        .map(|w| absolutize(w, &env.home, &env.cwd));
    let record = read_or_create_record(store, &path, working.as_deref(), env).await?;
    let vars = activated_env(&path, &record, env)?;
    let family = ShellFamily::detect(&record.shell_path);

    let mut commands = Vec::new();
    if family.is_powershell() && !env.disable_prompt {
        commands.push(prompt::powershell_prompt_command(&record.venv_name));
    }

    let search = RcSearch {
        system_dir: env.system_rc_dir.clone(),
        home: env.home.clone(),
        repo_root: detect_repo_root(&env.cwd).await,
        venv_path: path.clone(),
        fallback_working: record.working_path.clone().unwrap_or_else(|| env.cwd.clone()),
    };
    for rc_file in find_vsh_rc_files(&search).await? {
        let quoted = shlex::try_quote(&rc_file.to_string_lossy())
            .map(|q| q.into_owned())
            .map_err(|e| VshError::CommandFailed(format!("Cannot quote {}: {}", rc_file.display(), e)))?;
        commands.push(format!(". {}", quoted));
    }

    let command = if command.is_empty() {
        vec![record.shell_path.display().to_string()]
    } else {
        command.to_vec()
    };
    commands.push(compose_command(&command)?);

    let interactive = options
        .interactive
        .unwrap_or_else(|| std::io::stdout().is_terminal());
    let mut args = family.leading_args(interactive);
    args.push(commands.join(family.separator()));

    let cwd = if options.ignore_working {
        env.cwd.clone()
    } else {
        working
            .or_else(|| record.working_path.clone())
            .unwrap_or_else(|| env.cwd.clone())
    };

    Ok(ShellInvocation {
        venv_name: record.venv_name.clone(),
        program: record.shell_path.clone(),
        args,
        env: vars,
        cwd,
    })
}

/// Enters the environment at `path`, runs `command` and returns its exit code.
pub async fn enter(
    env: &Environment,
    store: &RecordStore,
    path: &Path,
    command: &[String],
    options: &EnterOptions,
) -> Result<i32> {
    let started = Instant::now();
    let invocation = prepare(env, store, path, command, options).await?;

    tracing::info!(
        "Running in {}: {}",
        invocation.venv_name.cyan(),
        invocation.command_line().green()
    );
    let code = invocation.run().await?;

    tracing::info!("Execution time: {:.3?}", started.elapsed());
    let code_text = if code == 0 {
        code.to_string().green()
    } else {
        code.to_string().red()
    };
    tracing::info!("Command return code: {}", code_text);
    Ok(code)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::shell::rcfiles::RC_FILE_NAME;
    use crate::venv::testing::fake_venv;

    struct Fixture {
        _dir: tempfile::TempDir,
        root: PathBuf,
        env: Environment,
        venv: PathBuf,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let root = std::fs::canonicalize(dir.path()).unwrap();
        let home = root.join("home");
        std::fs::create_dir_all(&home).unwrap();

        let mut vars = BTreeMap::new();
        vars.insert("HOME".to_string(), home.display().to_string());
        vars.insert("SHELL".to_string(), "/bin/sh".to_string());
        vars.insert("PATH".to_string(), "/usr/bin:/bin".to_string());
        let mut env = Environment::from_vars(vars, root.clone());
        env.system_rc_dir = root.join("etc");

        let venv = fake_venv(&root, "demo", "3.11");
        Fixture {
            _dir: dir,
            root,
            env,
            venv,
        }
    }

    fn options() -> EnterOptions {
        EnterOptions {
            interactive: Some(false),
            ..EnterOptions::default()
        }
    }

    fn cmd(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[tokio::test]
    async fn passes_output_and_exit_code_through() {
        let fx = fixture();
        let store = RecordStore::new(&fx.env);

        let invocation = prepare(&fx.env, &store, &fx.venv, &cmd(&["echo", "hi"]), &options())
            .await
            .unwrap();
        let output = invocation.output().await.unwrap();
        assert_eq!(output.exit_code, 0, "{}", output.stderr);
        assert!(output.stdout.contains("hi"));

        let invocation = prepare(&fx.env, &store, &fx.venv, &cmd(&["exit 3"]), &options())
            .await
            .unwrap();
        assert_eq!(invocation.output().await.unwrap().exit_code, 3);
    }

    #[tokio::test]
    async fn child_sees_activated_environment() {
        let fx = fixture();
        let store = RecordStore::new(&fx.env);

        let invocation = prepare(
            &fx.env,
            &store,
            &fx.venv,
            &cmd(&["echo \"$VSH|$VIRTUAL_ENV|$PATH|$PS1\""]),
            &options(),
        )
        .await
        .unwrap();
        let output = invocation.output().await.unwrap();
        let fields: Vec<&str> = output.stdout.trim_end().split('|').collect();

        assert_eq!(fields[0], "demo");
        assert_eq!(fields[1], fx.venv.display().to_string());
        assert!(fields[2].starts_with(&format!("{}:", fx.venv.join("bin").display())));
        assert!(fields[3].starts_with("(demo) "), "{}", fields[3]);
    }

    #[tokio::test]
    async fn first_entry_creates_record_and_snippet() {
        let fx = fixture();
        let store = RecordStore::new(&fx.env);
        assert!(!store.exists("demo"));

        prepare(&fx.env, &store, &fx.venv, &cmd(&["true"]), &options())
            .await
            .unwrap();

        assert!(store.exists("demo"));
        let snippet = std::fs::read_to_string(fx.venv.join(RC_FILE_NAME)).unwrap();
        assert!(snippet.starts_with("cd "), "{}", snippet);
    }

    #[tokio::test]
    async fn new_working_path_is_persisted() {
        let fx = fixture();
        let store = RecordStore::new(&fx.env);
        let work = fx.root.join("work");
        std::fs::create_dir_all(&work).unwrap();

        let opts = EnterOptions {
            working: Some(work.clone()),
            ..options()
        };
        let invocation = prepare(&fx.env, &store, &fx.venv, &cmd(&["pwd"]), &opts)
            .await
            .unwrap();
        assert_eq!(invocation.cwd, work);

        let record = store.load("demo", &fx.env).await.unwrap();
        assert_eq!(record.working_path, Some(work.clone()));

        // recorded working path is reused, unless ignored
        let invocation = prepare(&fx.env, &store, &fx.venv, &cmd(&["pwd"]), &options())
            .await
            .unwrap();
        assert_eq!(invocation.cwd, work);

        let opts = EnterOptions {
            ignore_working: true,
            ..options()
        };
        let invocation = prepare(&fx.env, &store, &fx.venv, &cmd(&["pwd"]), &opts)
            .await
            .unwrap();
        assert_eq!(invocation.cwd, fx.root);
    }

    #[tokio::test]
    async fn same_named_environments_do_not_collide() {
        let fx = fixture();
        let store = RecordStore::new(&fx.env);
        let first = fake_venv(&fx.root.join("a"), ".venv", "3.11");
        let second = fake_venv(&fx.root.join("b"), ".venv", "3.11");
        let work = fx.root.join("a/src");
        std::fs::create_dir_all(&work).unwrap();

        let opts = EnterOptions {
            working: Some(work.clone()),
            ..options()
        };
        let invocation = prepare(&fx.env, &store, &first, &cmd(&["true"]), &opts)
            .await
            .unwrap();
        assert_eq!(invocation.cwd, work);

        let invocation = prepare(
            &fx.env,
            &store,
            &second,
            &cmd(&["echo \"$VIRTUAL_ENV|$PATH\""]),
            &options(),
        )
        .await
        .unwrap();
        assert_eq!(invocation.cwd, fx.root);
        let output = invocation.output().await.unwrap();
        let fields: Vec<&str> = output.stdout.trim_end().split('|').collect();
        assert_eq!(fields[0], second.display().to_string());
        assert!(fields[1].starts_with(&format!("{}:", second.join("bin").display())));
        assert!(second.join(RC_FILE_NAME).exists());

        let record = store.load(".venv", &fx.env).await.unwrap();
        assert_eq!(record.venv_path, second);
        assert_eq!(record.working_path, None);
    }

    #[tokio::test]
    async fn disabled_prompt_is_left_alone() {
        let mut fx = fixture();
        fx.env.disable_prompt = true;
        fx.env.vars.insert("PS1".to_string(), "$ ".to_string());
        let store = RecordStore::new(&fx.env);

        let invocation = prepare(&fx.env, &store, &fx.venv, &cmd(&["true"]), &options())
            .await
            .unwrap();
        assert_eq!(invocation.env.get("PS1").map(String::as_str), Some("$ "));
    }

    #[tokio::test]
    async fn composes_posix_invocation() {
        let fx = fixture();
        let store = RecordStore::new(&fx.env);

        let invocation = prepare(
            &fx.env,
            &store,
            &fx.venv,
            &cmd(&["echo", "hello world"]),
            &options(),
        )
        .await
        .unwrap();

        assert_eq!(invocation.program, PathBuf::from("/bin/sh"));
        assert_eq!(invocation.args[0], "-c");
        let script = &invocation.args[1];
        assert!(script.starts_with(". "), "{}", script);
        assert!(script.ends_with(" && echo 'hello world'"), "{}", script);
    }
}

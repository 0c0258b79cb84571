use std::path::Path;
use std::process::ExitStatus;

/// Failure of a single task.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// The command ran and exited non-zero. Expected when checks fail.
    #[error("{command} closed with code {code}")]
    Failed { command: String, code: i32 },
    /// The shell could not be started at all.
    #[error("failed to start task {command:?}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Executes one task command in a project root.
pub trait TaskRunner {
    /// Run `command` in `root` and return a status message on success.
    fn run(&self, root: &Path, command: &str) -> Result<String, TaskError>;
}

/// Runs tasks through the platform shell.
///
/// The child inherits the environment and all three standard streams, so
/// output reaches the terminal as it is produced.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

#[cfg(unix)]
const SHELL: (&str, &str) = ("sh", "-c");
#[cfg(windows)]
const SHELL: (&str, &str) = ("cmd", "/C");

impl TaskRunner for ShellRunner {
    #[tracing::instrument(skip(self), fields(root = %root.display()))]
    fn run(&self, root: &Path, command: &str) -> Result<String, TaskError> {
        println!("executing task \"{command}\"");

        let (shell, flag) = SHELL;
        let output = duct::cmd(shell, [flag, command])
            .dir(root)
            .unchecked()
            .run()
            .map_err(|source| TaskError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let code = exit_code(output.status);
        if code != 0 {
            tracing::debug!(code, "task failed");
            return Err(TaskError::Failed {
                command: command.to_string(),
                code,
            });
        }
        Ok(format!("task \"{command}\" passed"))
    }
}

/// Exit code of a finished task; signal deaths map to `128 + signal` like a shell.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    -1
}

use serde::Serialize;
use std::path::Path;
use tokio::process::Command;

/// Result of an external tool invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOutcome {
    /// Command line as it was run, for reporting
    pub command: String,
    pub ok: bool,
    /// Combined stdout and stderr, or the spawn error
    pub output: String,
}

/// Run `go <args>` inside `dir`
pub async fn run_go_command(dir: &Path, args: &[&str]) -> CommandOutcome {
    run_command("go", dir, args).await
}

/// Run `program <args>` inside `dir`; never fails, the outcome carries the status
pub async fn run_command(program: &str, dir: &Path, args: &[&str]) -> CommandOutcome {
    let command = std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ");
    log::info!("Running '{command}' in {}", dir.display());

    match Command::new(program)
        .args(args)
        .current_dir(dir)
        .kill_on_drop(true)
        .output()
        .await
    {
        Ok(output) => {
            let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
            text.push_str(&String::from_utf8_lossy(&output.stderr));
            let ok = output.status.success();
            if !ok {
                log::warn!("'{command}' failed ({}): {}", output.status, text.trim());
            }
            CommandOutcome {
                command,
                ok,
                output: text,
            }
        }
        Err(e) => {
            log::warn!("Failed to spawn '{command}': {e}");
            CommandOutcome {
                command,
                ok: false,
                output: format!("failed to spawn {program}: {e}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[tokio::test]
    async fn test_captures_output_and_status() {
        let dir = tempfile::tempdir().unwrap();
        let ok = run_command("sh", dir.path(), &["-c", "echo out; echo err >&2"]).await;
        assert!(ok.ok);
        assert!(ok.output.contains("out") && ok.output.contains("err"));
        assert_eq!(ok.command, "sh -c echo out; echo err >&2");

        let failed = run_command("sh", dir.path(), &["-c", "exit 3"]).await;
        assert!(!failed.ok);
    }

    #[tokio::test]
    async fn test_missing_program_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = run_command("goinject-no-such-tool", dir.path(), &["x"]).await;
        assert!(!outcome.ok);
        assert!(outcome.output.contains("failed to spawn"));
    }
}

use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("stats subprocess timed out")]
    Timeout,

    #[error("stats subprocess exited non-zero: {stderr}")]
    NonZeroExit { stderr: String },

    #[error("failed to run stats subprocess: {0}")]
    Io(#[from] std::io::Error),
}

/// Invoke `{docker_bin} stats --no-stream` once and collect one JSON object
/// per running container.
pub async fn collect_stats(docker_bin: &str, timeout: Duration) -> Result<Vec<Value>, StatsError> {
    let output = tokio::time::timeout(
        timeout,
        Command::new(docker_bin)
            .args(["stats", "--format", "{{ json . }}", "--no-stream"])
            .kill_on_drop(true)
            .output(),
    )
    .await
    .map_err(|_| StatsError::Timeout)??;

    if !output.status.success() {
        return Err(StatsError::NonZeroExit {
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    Ok(parse_stat_lines(&String::from_utf8_lossy(&output.stdout)))
}

/// Parse newline-delimited JSON, keeping only the lines that parse.
///
/// `docker stats` interleaves diagnostics on stdout when a container
/// disappears mid-sample; those lines are dropped from the result.
pub fn parse_stat_lines(stdout: &str) -> Vec<Value> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match serde_json::from_str::<Value>(line) {
            Ok(stat) => Some(stat),
            Err(_) => {
                debug!("Dropping unparseable stats line: {}", line);
                None
            }
        })
        .collect()
}

use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

/// Timeout for api_key_command execution.
const API_KEY_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ApiKeyError {
    #[error("api_key_command failed: {0}")]
    CommandFailed(String),

    #[error("api_key_command timed out")]
    Timeout,
}

/// Source of API key for authentication.
#[derive(Debug, Clone)]
pub enum ApiKeySource {
    /// No authentication.
    None,
    /// Static API key.
    Static(String),
    /// Shell command that outputs the API key (for rotating tokens).
    Command(String),
}

impl ApiKeySource {
    pub fn from_config(api_key: Option<String>, api_key_command: Option<String>) -> Self {
        match (api_key, api_key_command) {
            (Some(key), _) if !key.trim().is_empty() => ApiKeySource::Static(key),
            (_, Some(cmd)) if !cmd.trim().is_empty() => ApiKeySource::Command(cmd),
            _ => ApiKeySource::None,
        }
    }

    pub fn is_configured(&self) -> bool {
        !matches!(self, ApiKeySource::None)
    }

    /// Get the current API key, executing the command if necessary.
    pub async fn get_key(&self) -> Result<Option<String>, ApiKeyError> {
        match self {
            ApiKeySource::None => Ok(None),
            ApiKeySource::Static(key) => Ok(Some(key.clone())),
            ApiKeySource::Command(cmd) => run_key_command(cmd, API_KEY_COMMAND_TIMEOUT)
                .await
                .map(Some),
        }
    }
}

/// Run `cmd` through `sh -c` and return its trimmed stdout.
///
/// The child is killed if `timeout` elapses first.
async fn run_key_command(cmd: &str, timeout: Duration) -> Result<String, ApiKeyError> {
    debug!(command = %cmd, "Fetching API key via command");

    let result = tokio::time::timeout(
        timeout,
        Command::new("sh")
            .arg("-c")
            .arg(cmd)
            .kill_on_drop(true)
            .output(),
    )
    .await;

    let output = match result {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            warn!(command = %cmd, error = %e, "api_key_command failed to execute");
            return Err(ApiKeyError::CommandFailed(e.to_string()));
        }
        Err(_) => {
            warn!(command = %cmd, "api_key_command timed out");
            return Err(ApiKeyError::Timeout);
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        warn!(command = %cmd, stderr = %stderr, "api_key_command failed");
        return Err(ApiKeyError::CommandFailed(format!(
            "exit status {}: {}",
            output.status, stderr
        )));
    }

    let key = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if key.is_empty() {
        return Err(ApiKeyError::CommandFailed("empty key".to_string()));
    }

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_key_wins_over_command() {
        let source =
            ApiKeySource::from_config(Some("sk-1".to_string()), Some("echo sk-2".to_string()));
        assert!(matches!(source, ApiKeySource::Static(ref k) if k == "sk-1"));
    }

    #[test]
    fn blank_values_mean_no_key() {
        let source = ApiKeySource::from_config(Some("  ".to_string()), None);
        assert!(!source.is_configured());
    }

    #[tokio::test]
    async fn command_output_is_trimmed() {
        let source = ApiKeySource::Command("echo '  sk-from-cmd  '".to_string());
        assert_eq!(source.get_key().await.unwrap(), Some("sk-from-cmd".to_string()));
    }

    #[tokio::test]
    async fn failing_command_is_an_error() {
        let source = ApiKeySource::Command("exit 3".to_string());
        assert!(matches!(
            source.get_key().await,
            Err(ApiKeyError::CommandFailed(_))
        ));
    }

    /// Whether `pid` is still a live (non-zombie) process.
    #[cfg(target_os = "linux")]
    fn process_alive(pid: u32) -> bool {
        match std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
            // Third field is the state; the command name before it is parenthesised.
            Ok(stat) => stat
                .rsplit_once(')')
                .and_then(|(_, rest)| rest.split_whitespace().next())
                .map(|state| state != "Z" && state != "X")
                .unwrap_or(false),
            Err(_) => false,
        }
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn timed_out_command_is_killed() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("pid");
        let cmd = format!("echo $$ > {}; exec sleep 30", pid_file.display());

        let result = run_key_command(&cmd, Duration::from_millis(300)).await;
        assert!(matches!(result, Err(ApiKeyError::Timeout)));

        let pid: u32 = std::fs::read_to_string(&pid_file)
            .unwrap()
            .trim()
            .parse()
            .unwrap();

        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while process_alive(pid) && std::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(
            !process_alive(pid),
            "key command {} still running after timeout",
            pid
        );
    }
}

//! Provider subprocess protocol.
//!
//! This module handles communication with external provider binaries
//! (e.g., `calsync-provider-google`) using JSON over stdin/stdout.
//!
//! Providers manage their own credentials and tokens. Core just passes
//! provider-specific parameters from the `[google]`/`[icloud]` config tables.

use crate::error::{CalSyncError, CalSyncResult};
use crate::remote::protocol::{Command, ProviderCommand, Request, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;
use tracing::debug;

const PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);
/// Sign-in involves the user, so it gets much longer.
const AUTH_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider(String);

impl Provider {
    pub fn from_name(name: &str) -> Self {
        Provider(name.to_string())
    }

    pub fn binary_name(&self) -> String {
        format!("calsync-provider-{}", self.0)
    }

    fn binary_path(&self) -> CalSyncResult<std::path::PathBuf> {
        let binary_name = self.binary_name();
        which::which(&binary_name).map_err(|_| CalSyncError::ProviderNotInstalled(binary_name))
    }

    /// Call a typed provider command and return the result.
    ///
    /// The response type is inferred from the command's associated type.
    pub async fn call<C: ProviderCommand>(&self, cmd: C) -> CalSyncResult<C::Response> {
        timeout(PROVIDER_TIMEOUT, self.call_raw(C::command(), cmd))
            .await
            .map_err(|_| CalSyncError::ProviderTimeout(PROVIDER_TIMEOUT.as_secs()))?
    }

    /// Call a command that waits on the user (sign-in).
    pub async fn call_interactive<C: ProviderCommand>(&self, cmd: C) -> CalSyncResult<C::Response> {
        timeout(AUTH_TIMEOUT, self.call_raw(C::command(), cmd))
            .await
            .map_err(|_| CalSyncError::ProviderTimeout(AUTH_TIMEOUT.as_secs()))?
    }

    /// Low-level call that sends a command with params and deserializes the response.
    async fn call_raw<P: Serialize, R: serde::de::DeserializeOwned>(
        &self,
        command: Command,
        params: P,
    ) -> CalSyncResult<R> {
        let params = serde_json::to_value(params)?;
        let request = Request { command, params };
        let request_json = serde_json::to_string(&request)?;

        let binary_path = self.binary_path()?;
        debug!(provider = %self.0, ?command, "Calling provider");

        let mut child = TokioCommand::new(&binary_path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                CalSyncError::Provider(format!("Failed to spawn {}: {}", binary_path.display(), e))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| CalSyncError::Provider("Provider stdin unavailable".into()))?;
        stdin
            .write_all(format!("{request_json}\n").as_bytes())
            .await?;
        drop(stdin);

        let output = child.wait_with_output().await?;

        if !output.status.success() {
            return Err(CalSyncError::Provider(format!(
                "{} exited with status: {}",
                self.binary_name(),
                output.status.code().unwrap_or(-1)
            )));
        }

        let response_str = String::from_utf8_lossy(&output.stdout);
        if response_str.trim().is_empty() {
            return Err(CalSyncError::Provider(
                "Provider returned no response".into(),
            ));
        }

        parse_response(&response_str)
    }
}

fn parse_response<R: serde::de::DeserializeOwned>(response_str: &str) -> CalSyncResult<R> {
    let response: Response<R> = serde_json::from_str(response_str)
        .map_err(|e| CalSyncError::Provider(format!("Failed to parse response: {}", e)))?;

    match response {
        Response::Success { data } => Ok(data),
        Response::Error { error } => Err(CalSyncError::Provider(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_name() {
        assert_eq!(
            Provider::from_name("icloud").binary_name(),
            "calsync-provider-icloud"
        );
    }

    #[test]
    fn test_parse_response_error_is_provider_error() {
        let result: CalSyncResult<String> =
            parse_response(r#"{"status":"error","error":"invalid_grant"}"#);
        assert!(matches!(result, Err(CalSyncError::Provider(msg)) if msg == "invalid_grant"));

        let garbage: CalSyncResult<String> = parse_response("not json");
        assert!(matches!(garbage, Err(CalSyncError::Provider(_))));
    }

    #[tokio::test]
    async fn test_missing_binary_reports_not_installed() {
        let provider = Provider::from_name("does-not-exist-anywhere");
        let result: CalSyncResult<Vec<crate::remote::protocol::CalendarInfo>> = provider
            .call(crate::remote::protocol::ListCalendars {
                remote_config: serde_json::Map::new(),
            })
            .await;

        assert!(matches!(result, Err(CalSyncError::ProviderNotInstalled(_))));
    }
}

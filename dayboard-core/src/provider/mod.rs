//! Calendar provider subprocess bridge.
//!
//! Talks to an external `dayboard-provider-<name>` binary using JSON over
//! stdin/stdout, so any executable that speaks the protocol can mirror a
//! calendar onto the board. Providers manage their own credentials; the
//! bridge just passes provider-specific parameters from the board config.

pub mod protocol;

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

use crate::calendar::{CalendarProvider, ExternalEvent, ExternalEventPatch};
use crate::error::{BoardError, BoardResult};
use crate::item::EventTime;
use crate::provider::protocol::{
    Command, CreateEvent, DeleteEvent, ListEvents, ProviderCommand, Request, Response, UpdateEvent,
};

const PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Provider-specific configuration passed through to the binary verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig(pub HashMap<String, toml::Value>);

impl From<&ProviderConfig> for serde_json::Map<String, serde_json::Value> {
    fn from(config: &ProviderConfig) -> Self {
        config
            .0
            .iter()
            .filter_map(|(k, v)| serde_json::to_value(v).ok().map(|v| (k.clone(), v)))
            .collect()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Provider {
    name: String,
    config: ProviderConfig,
}

impl Provider {
    pub fn new(name: &str, config: ProviderConfig) -> Self {
        Provider {
            name: name.to_string(),
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn provider_config(&self) -> serde_json::Map<String, serde_json::Value> {
        serde_json::Map::from(&self.config)
    }

    fn binary_path(&self) -> BoardResult<std::path::PathBuf> {
        let binary_name = format!("dayboard-provider-{}", self.name);
        which::which(&binary_name).map_err(|_| {
            BoardError::ProviderNotInstalled(format!(
                "Provider '{}' not found. Install it with:\n  cargo install {}",
                self.name, binary_name
            ))
        })
    }

    /// Call a typed provider command and return the result.
    ///
    /// The response type is inferred from the command's associated type,
    /// ensuring compile-time type safety.
    async fn call<C: ProviderCommand>(&self, cmd: C) -> BoardResult<C::Response> {
        timeout(PROVIDER_TIMEOUT, self.call_raw(C::command(), cmd))
            .await
            .map_err(|_| BoardError::ProviderTimeout(PROVIDER_TIMEOUT.as_secs()))?
    }

    /// Low-level call that sends a command with params and deserializes
    /// the response.
    async fn call_raw<P: Serialize, R: serde::de::DeserializeOwned>(
        &self,
        command: Command,
        params: P,
    ) -> BoardResult<R> {
        let params =
            serde_json::to_value(params).map_err(|e| BoardError::Serialization(e.to_string()))?;
        let request = Request { command, params };
        let request_json = serde_json::to_string(&request)
            .map_err(|e| BoardError::Serialization(e.to_string()))?;

        let binary_path = self.binary_path()?;

        let mut child = TokioCommand::new(&binary_path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::inherit())
            .spawn()
            .map_err(|e| {
                BoardError::Provider(format!("Failed to spawn {}: {}", binary_path.display(), e))
            })?;

        // Write request to stdin (unwrap safe: we piped stdin above)
        let mut stdin = child.stdin.take().unwrap();
        stdin
            .write_all(format!("{request_json}\n").as_bytes())
            .await?;
        drop(stdin);

        let output = child.wait_with_output().await?;

        if !output.status.success() {
            return Err(BoardError::Provider(format!(
                "Provider exited with status: {}",
                output.status.code().unwrap_or(-1)
            )));
        }

        let response_str = String::from_utf8_lossy(&output.stdout);
        if response_str.is_empty() {
            return Err(BoardError::Provider(
                "Provider returned no response".into(),
            ));
        }

        let response: Response<R> = serde_json::from_str(&response_str)
            .map_err(|e| BoardError::Provider(format!("Failed to parse response: {}", e)))?;

        match response {
            Response::Success { data } => Ok(data),
            Response::Error { error } => Err(BoardError::Provider(error)),
        }
    }
}

#[async_trait]
impl CalendarProvider for Provider {
    async fn list_upcoming(&self, days_ahead: i64) -> BoardResult<Vec<ExternalEvent>> {
        let now = Utc::now();
        let from = now.to_rfc3339();
        let to = (now + chrono::Duration::days(days_ahead)).to_rfc3339();

        self.call(ListEvents {
            provider_config: self.provider_config(),
            from,
            to,
        })
        .await
    }

    async fn create(
        &self,
        summary: &str,
        start: EventTime,
        end: EventTime,
    ) -> BoardResult<ExternalEvent> {
        self.call(CreateEvent {
            provider_config: self.provider_config(),
            summary: summary.to_string(),
            start,
            end,
        })
        .await
    }

    async fn update(
        &self,
        external_id: &str,
        patch: &ExternalEventPatch,
    ) -> BoardResult<ExternalEvent> {
        self.call(UpdateEvent {
            provider_config: self.provider_config(),
            event_id: external_id.to_string(),
            patch: patch.clone(),
        })
        .await
    }

    async fn delete(&self, external_id: &str) -> BoardResult<()> {
        self.call(DeleteEvent {
            provider_config: self.provider_config(),
            event_id: external_id.to_string(),
        })
        .await
    }
}

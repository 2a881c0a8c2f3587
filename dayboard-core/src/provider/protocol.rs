//! The JSON protocol spoken between dayboard and calendar provider
//! binaries over stdin/stdout.

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::calendar::{ExternalEvent, ExternalEventPatch};
use crate::item::EventTime;

pub trait ProviderCommand: Serialize {
    type Response: DeserializeOwned;
    fn command() -> Command;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    ListEvents,
    CreateEvent,
    UpdateEvent,
    DeleteEvent,
}

/// Request sent to the provider binary.
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    pub command: Command,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Response sent back by the provider binary.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response<T> {
    Success { data: T },
    Error { error: String },
}

impl<T: Serialize> Response<T> {
    pub fn success(data: T) -> String {
        serde_json::to_string(&Response::Success { data }).unwrap()
    }
}

impl Response<()> {
    pub fn error(msg: &str) -> String {
        serde_json::to_string(&Response::<()>::Error {
            error: msg.to_string(),
        })
        .unwrap()
    }
}

/// List events within a time range.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListEvents {
    /// Provider-specific config (e.g., account, calendar id)
    #[serde(flatten)]
    pub provider_config: serde_json::Map<String, serde_json::Value>,
    pub from: String,
    pub to: String,
}

impl ProviderCommand for ListEvents {
    type Response = Vec<ExternalEvent>;
    fn command() -> Command {
        Command::ListEvents
    }
}

/// Create a new event.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateEvent {
    #[serde(flatten)]
    pub provider_config: serde_json::Map<String, serde_json::Value>,
    pub summary: String,
    pub start: EventTime,
    pub end: EventTime,
}

impl ProviderCommand for CreateEvent {
    type Response = ExternalEvent;
    fn command() -> Command {
        Command::CreateEvent
    }
}

/// Update fields of an existing event.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateEvent {
    #[serde(flatten)]
    pub provider_config: serde_json::Map<String, serde_json::Value>,
    pub event_id: String,
    pub patch: ExternalEventPatch,
}

impl ProviderCommand for UpdateEvent {
    type Response = ExternalEvent;
    fn command() -> Command {
        Command::UpdateEvent
    }
}

/// Delete an event by its native id.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteEvent {
    #[serde(flatten)]
    pub provider_config: serde_json::Map<String, serde_json::Value>,
    pub event_id: String,
}

impl ProviderCommand for DeleteEvent {
    type Response = ();
    fn command() -> Command {
        Command::DeleteEvent
    }
}

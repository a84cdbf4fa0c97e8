//! Defines the JSON protocol used for communication between calsync
//! and provider binaries over stdin/stdout.

use serde::{Deserialize, Serialize, de::DeserializeOwned};

pub trait ProviderCommand: Serialize {
    type Response: DeserializeOwned;
    fn command() -> Command;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Authenticate,
    ListCalendars,
    ListEvents,
    CreateEvent,
    UpdateEvent,
}

/// Request sent from calsync to provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    pub command: Command,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Response sent from provider to calsync.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response<T> {
    Success { data: T },
    Error { error: String },
}

/// Run the provider's interactive sign-in.
#[derive(Debug, Serialize, Deserialize)]
pub struct Authenticate {
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
}

impl ProviderCommand for Authenticate {
    type Response = String; // Account identifier (e.g., email)
    fn command() -> Command {
        Command::Authenticate
    }
}

/// A calendar the signed-in account can see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarInfo {
    pub id: String,
    pub name: String,
}

/// List the account's calendars. Doubles as a connectivity check.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListCalendars {
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
}

impl ProviderCommand for ListCalendars {
    type Response = Vec<CalendarInfo>;
    fn command() -> Command {
        Command::ListCalendars
    }
}

/// List events within a time range.
///
/// Items come back in the store's native shape: Google event resources, or
/// `{ "href", "data" }` CalDAV resources for iCloud.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListEvents {
    /// Provider-specific config (e.g., calendar_id, account)
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
    pub from: String,
    pub to: String,
}

impl ProviderCommand for ListEvents {
    type Response = Vec<serde_json::Value>;
    fn command() -> Command {
        Command::ListEvents
    }
}

/// Create a new event from a native payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateEvent {
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
    pub event: serde_json::Value,
}

impl ProviderCommand for CreateEvent {
    type Response = String; // Native id (Google event id, CalDAV href)
    fn command() -> Command {
        Command::CreateEvent
    }
}

/// Replace an existing event.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateEvent {
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
    pub event_id: String,
    pub event: serde_json::Value,
}

impl ProviderCommand for UpdateEvent {
    type Response = ();
    fn command() -> Command {
        Command::UpdateEvent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_format() {
        let mut remote_config = serde_json::Map::new();
        remote_config.insert("calendar_id".to_string(), json!("primary"));

        let params = serde_json::to_value(ListEvents {
            remote_config,
            from: "2024-01-01T00:00:00Z".to_string(),
            to: "2024-01-31T00:00:00Z".to_string(),
        })
        .unwrap();
        let request = Request {
            command: ListEvents::command(),
            params,
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "command": "list_events",
                "params": {
                    "calendar_id": "primary",
                    "from": "2024-01-01T00:00:00Z",
                    "to": "2024-01-31T00:00:00Z"
                }
            })
        );
    }

    #[test]
    fn test_response_parsing() {
        let ok: Response<String> =
            serde_json::from_str(r#"{"status":"success","data":"evt_1"}"#).unwrap();
        assert!(matches!(ok, Response::Success { data } if data == "evt_1"));

        let err: Response<String> =
            serde_json::from_str(r#"{"status":"error","error":"token expired"}"#).unwrap();
        assert!(matches!(err, Response::Error { error } if error == "token expired"));

        let unit: Response<()> = serde_json::from_str(r#"{"status":"success","data":null}"#).unwrap();
        assert!(matches!(unit, Response::Success { .. }));
    }
}

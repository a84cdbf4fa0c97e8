//! Calendar stores reached through provider binaries.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::backend::Backend;
use crate::convert::{new_uid, to_google, to_ics};
use crate::date_range::DateRange;
use crate::error::{CalSyncError, CalSyncResult};
use crate::event::{CanonicalEvent, Source};
use crate::normalize::{CalDavResource, NativeEvent, ics_uid, normalize};
use crate::remote::protocol::{
    Authenticate, CalendarInfo, CreateEvent, ListCalendars, ListEvents, UpdateEvent,
};
use crate::remote::provider::Provider;

/// A `[google]` or `[icloud]` config table: the provider name plus whatever
/// parameters that provider wants (calendar_id, account, ...).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RemoteConfig {
    pub provider: String,
    #[serde(flatten)]
    pub params: HashMap<String, toml::Value>,
}

impl RemoteConfig {
    pub fn for_source(source: Source) -> Self {
        RemoteConfig {
            provider: source.provider_name().to_string(),
            params: HashMap::new(),
        }
    }
}

impl From<&RemoteConfig> for serde_json::Map<String, serde_json::Value> {
    fn from(config: &RemoteConfig) -> Self {
        config
            .params
            .iter()
            .filter_map(|(k, v)| serde_json::to_value(v).ok().map(|v| (k.clone(), v)))
            .collect()
    }
}

/// One calendar store behind a provider.
#[derive(Debug, Clone)]
pub struct Remote {
    source: Source,
    provider: Provider,
    config: RemoteConfig,
    local_tz: Tz,
}

impl Remote {
    /// `local_tz` places naive times in outgoing Google payloads.
    pub fn new(source: Source, config: RemoteConfig, local_tz: Tz) -> Self {
        Remote {
            source,
            provider: Provider::from_name(&config.provider),
            config,
            local_tz,
        }
    }

    fn remote_config(&self) -> serde_json::Map<String, serde_json::Value> {
        serde_json::Map::from(&self.config)
    }

    /// Run the provider's sign-in flow. Returns the account identifier.
    pub async fn authenticate(&self) -> CalSyncResult<String> {
        self.provider
            .call_interactive(Authenticate {
                remote_config: self.remote_config(),
            })
            .await
    }

    pub async fn list_calendars(&self) -> CalSyncResult<Vec<CalendarInfo>> {
        self.provider
            .call(ListCalendars {
                remote_config: self.remote_config(),
            })
            .await
    }

    /// Decode one native item, or explain why it was dropped.
    fn decode(&self, item: serde_json::Value) -> Option<CanonicalEvent> {
        let native = match self.source {
            Source::Google => NativeEvent::Google(item),
            Source::ICloud => match serde_json::from_value::<CalDavResource>(item) {
                Ok(resource) => NativeEvent::ICalendar(resource),
                Err(e) => {
                    warn!(calendar = %self.source, error = %e, "Dropping malformed CalDAV item");
                    return None;
                }
            },
        };

        let event = normalize(native);
        if event.is_none() {
            warn!(calendar = %self.source, "Dropping item that is not an event");
        }
        event
    }

    fn payload(&self, event: &CanonicalEvent, uid: &str) -> CalSyncResult<serde_json::Value> {
        Ok(match self.source {
            Source::Google => serde_json::to_value(to_google(event, self.local_tz))?,
            Source::ICloud => serde_json::json!({
                "uid": uid,
                "data": to_ics(event, uid),
            }),
        })
    }
}

#[async_trait]
impl Backend for Remote {
    fn source(&self) -> Source {
        self.source
    }

    async fn list_events(&self, range: &DateRange) -> CalSyncResult<Vec<CanonicalEvent>> {
        let items = self
            .provider
            .call(ListEvents {
                remote_config: self.remote_config(),
                from: range.from_rfc3339(),
                to: range.to_rfc3339(),
            })
            .await?;

        let fetched = items.len();
        let events: Vec<CanonicalEvent> =
            items.into_iter().filter_map(|item| self.decode(item)).collect();
        debug!(calendar = %self.source, fetched, kept = events.len(), "Fetched events");

        Ok(events)
    }

    async fn create_event(&self, event: &CanonicalEvent) -> CalSyncResult<String> {
        let event = self.payload(event, &new_uid())?;
        self.provider
            .call(CreateEvent {
                remote_config: self.remote_config(),
                event,
            })
            .await
    }

    async fn update_event(
        &self,
        target: &CanonicalEvent,
        event: &CanonicalEvent,
    ) -> CalSyncResult<()> {
        if target.id.is_empty() {
            return Err(CalSyncError::Unsupported(format!(
                "Cannot update '{}' in {}: target has no id",
                target.summary,
                self.source.calendar_name()
            )));
        }

        // An iCloud event keeps its UID across updates
        let uid = match self.source {
            Source::Google => String::new(),
            Source::ICloud => ics_uid(&target.raw).ok_or_else(|| {
                CalSyncError::Unsupported(format!(
                    "Cannot update '{}' in iCloud: stored event has no UID",
                    target.summary
                ))
            })?,
        };

        let event = self.payload(event, &uid)?;
        self.provider
            .call(UpdateEvent {
                remote_config: self.remote_config(),
                event_id: target.id.clone(),
                event,
            })
            .await
    }
}

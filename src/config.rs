//! Widget configuration

use serde::Deserialize;
use std::time::Duration;

/// Delay before a simulated reply is delivered
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(800);

/// Origin used to scope persisted flags when none is configured
pub const DEFAULT_ORIGIN: &str = "default";

/// Options accepted by `init`. Field names follow the host's camelCase
/// convention, e.g. `{"containerId": "chat-root"}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    pub container_id: String,
    #[serde(default = "default_reply_delay", rename = "replyDelayMs", with = "millis")]
    pub reply_delay: Duration,
    #[serde(default = "default_origin")]
    pub origin: String,
}

fn default_reply_delay() -> Duration {
    DEFAULT_REPLY_DELAY
}

fn default_origin() -> String {
    DEFAULT_ORIGIN.to_string()
}

impl WidgetConfig {
    pub fn new(container_id: impl Into<String>) -> Self {
        Self {
            container_id: container_id.into(),
            reply_delay: DEFAULT_REPLY_DELAY,
            origin: default_origin(),
        }
    }

    pub fn with_reply_delay(mut self, delay: Duration) -> Self {
        self.reply_delay = delay;
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Parse host-supplied JSON options
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Build from `RA_CHAT_*` environment variables.
    ///
    /// `RA_CHAT_CONTAINER` defaults to `ra-chat`; unparsable delays fall back
    /// to the default.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let container_id = var("RA_CHAT_CONTAINER").unwrap_or_else(|| "ra-chat".to_string());

        let reply_delay = var("RA_CHAT_REPLY_DELAY_MS")
            .and_then(|v| v.parse::<u64>().ok())
            .map_or(DEFAULT_REPLY_DELAY, Duration::from_millis);

        let origin = var("RA_CHAT_ORIGIN").unwrap_or_else(default_origin);

        Self {
            container_id,
            reply_delay,
            origin,
        }
    }
}

mod millis {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

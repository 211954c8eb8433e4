// Analytics event domain types
//
// An event is an immutable, append-only record of one visitor interaction.
// Classification labels are always derived server-side from the user agent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Event type used when the client does not send one.
pub const PAGEVIEW_EVENT: &str = "pageview";

/// Device class derived from the user agent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Mobile,
    Tablet,
    #[default]
    Desktop,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Mobile => "mobile",
            DeviceType::Tablet => "tablet",
            DeviceType::Desktop => "desktop",
        }
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for DeviceType {
    fn from(s: &str) -> Self {
        match s {
            "mobile" => DeviceType::Mobile,
            "tablet" => DeviceType::Tablet,
            _ => DeviceType::Desktop,
        }
    }
}

/// Browser family derived from the user agent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub enum Browser {
    Chrome,
    Firefox,
    Safari,
    Edge,
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
}

impl Browser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Chrome => "Chrome",
            Browser::Firefox => "Firefox",
            Browser::Safari => "Safari",
            Browser::Edge => "Edge",
            Browser::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Browser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Browser {
    fn from(s: &str) -> Self {
        match s {
            "Chrome" => Browser::Chrome,
            "Firefox" => Browser::Firefox,
            "Safari" => Browser::Safari,
            "Edge" => Browser::Edge,
            _ => Browser::Unknown,
        }
    }
}

/// Operating system derived from the user agent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub enum Os {
    Windows,
    #[serde(rename = "macOS")]
    MacOs,
    Linux,
    Android,
    #[serde(rename = "iOS")]
    Ios,
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
}

impl Os {
    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Windows => "Windows",
            Os::MacOs => "macOS",
            Os::Linux => "Linux",
            Os::Android => "Android",
            Os::Ios => "iOS",
            Os::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Os {
    fn from(s: &str) -> Self {
        match s {
            "Windows" => Os::Windows,
            "macOS" => Os::MacOs,
            "Linux" => Os::Linux,
            "Android" => Os::Android,
            "iOS" => Os::Ios,
            _ => Os::Unknown,
        }
    }
}

/// A stored analytics event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    /// Unique event ID (UUID v7).
    pub id: Uuid,
    /// Stable per-browser identifier supplied by the client.
    pub visitor_id: String,
    /// Per-tab session identifier supplied by the client.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Open-vocabulary event type ("pageview", "cta_click", ...).
    pub event_type: String,
    /// Path portion of the viewed URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    /// Raw user-agent header observed by the server.
    pub user_agent: String,
    pub device_type: DeviceType,
    pub browser: Browser,
    pub os: Os,
    /// Two-letter country code reported by the CDN, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Client-supplied metadata, stored as-is.
    pub metadata: serde_json::Value,
    /// Server-assigned insertion time.
    pub created_at: DateTime<Utc>,
}

/// Input for appending an event. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnalyticsEvent {
    pub visitor_id: String,
    pub session_id: Option<String>,
    pub event_type: String,
    pub page_path: Option<String>,
    pub referrer: Option<String>,
    pub user_agent: String,
    pub device_type: DeviceType,
    pub browser: Browser,
    pub os: Os,
    pub country: Option<String>,
    pub metadata: serde_json::Value,
}

impl NewAnalyticsEvent {
    /// Materialize the event with a fresh ID and the given insertion time.
    /// Used by stores that assign identifiers in-process.
    pub fn into_event(self, id: Uuid, created_at: DateTime<Utc>) -> AnalyticsEvent {
        AnalyticsEvent {
            id,
            visitor_id: self.visitor_id,
            session_id: self.session_id,
            event_type: self.event_type,
            page_path: self.page_path,
            referrer: self.referrer,
            user_agent: self.user_agent,
            device_type: self.device_type,
            browser: self.browser,
            os: self.os,
            country: self.country,
            metadata: self.metadata,
            created_at,
        }
    }
}

//! Protocol Messages
//!
//! JSON bodies exchanged between the front-end and the achievement gateway.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Deserialize};
use uuid::Uuid;

// =============================================================================
// RECORDS
// =============================================================================

/// A persisted achievement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    /// Store-assigned identifier (no update semantics).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Player name
    pub name: String,
    /// Level reached
    pub level: u32,
    /// ISO-8601 UTC timestamp with millisecond precision
    pub date: String,
}

impl Achievement {
    /// Create a record stamped with `at`.
    pub fn new(name: impl Into<String>, level: u32, at: DateTime<Utc>) -> Self {
        Self {
            id: Some(Uuid::new_v4()),
            name: name.into(),
            level,
            date: format_timestamp(at),
        }
    }

    /// Parse the record date.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.date)
            .ok()
            .map(|d| d.with_timezone(&Utc))
    }
}

/// Format a timestamp as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
///
/// Fixed width, so lexical order equals chronological order.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// =============================================================================
// CLIENT -> SERVER
// =============================================================================

/// A well-formed "record achievement" request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveAchievement {
    /// Player name (non-empty)
    pub name: String,
    /// Level reached (non-zero)
    pub level: u32,
}

/// Raw "record achievement" body as received by the gateway.
///
/// Both fields are optional so that presence can be checked explicitly.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveAchievementPayload {
    /// Player name
    #[serde(default)]
    pub name: Option<String>,
    /// Level reached
    #[serde(default)]
    pub level: Option<u32>,
}

impl SaveAchievementPayload {
    /// Reject missing or falsy fields (absent, null, empty name, level 0).
    pub fn validate(self) -> Result<SaveAchievement, &'static str> {
        let name = self.name.filter(|n| !n.is_empty());
        let level = self.level.filter(|l| *l != 0);

        match (name, level) {
            (Some(name), Some(level)) => Ok(SaveAchievement { name, level }),
            _ => Err("Missing name or level"),
        }
    }
}

// =============================================================================
// SERVER -> CLIENT
// =============================================================================

/// Body of a successful save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResponse {
    /// Always true when returned with 200
    pub success: bool,
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable reason
    pub error: String,
}

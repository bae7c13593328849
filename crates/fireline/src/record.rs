//! Core incident record types for fireline.
//!
//! This module defines the fundamental data structures for representing
//! incident records produced by the multi-step intake flow.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A category of incident, each with its own follow-up form schema.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Nature {
    /// Fire response (structure, vehicle, vegetation, ...).
    Fire,
    /// Prevention inspection or survey.
    Prevention,
    /// Community outreach activity.
    Community,
    /// Administrative or management activity.
    Management,
}

impl Nature {
    /// All natures, in canonical order.
    pub const ALL: [Self; 4] = [Self::Fire, Self::Prevention, Self::Community, Self::Management];

    /// The canonical snake_case name of this nature.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fire => "fire",
            Self::Prevention => "prevention",
            Self::Community => "community",
            Self::Management => "management",
        }
    }
}

impl std::fmt::Display for Nature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Completion state of an incident record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    /// Basic intake done, nature follow-up still outstanding.
    Pending,
    /// A nature payload has been merged; the record is complete.
    Ready,
}

impl std::fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Ready => f.write_str("ready"),
        }
    }
}

/// A single incident record in the store.
///
/// Created pending by basic intake, completed exactly once per nature by the
/// aggregation step. Records are never deleted and have no
/// edit-after-completion path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentRecord {
    /// When this record was created.
    pub created_at: DateTime<Utc>,

    /// Completion state.
    pub status: IncidentStatus,

    /// Nature-agnostic fields captured by the basic intake form.
    pub basic: Map<String, Value>,

    /// One nested payload per completed nature.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub natures: BTreeMap<Nature, Value>,
}

impl IncidentRecord {
    /// Create a new pending record from basic intake fields.
    #[must_use]
    pub fn new(basic: Map<String, Value>) -> Self {
        Self {
            created_at: Utc::now(),
            status: IncidentStatus::Pending,
            basic,
            natures: BTreeMap::new(),
        }
    }

    /// Check whether every mandatory step has completed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status == IncidentStatus::Ready
    }

    /// Check whether a payload for the given nature has been merged.
    #[must_use]
    pub fn has_nature(&self, nature: Nature) -> bool {
        self.natures.contains_key(&nature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic_fields() -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("station".to_string(), Value::String("12".to_string()));
        map
    }

    #[test]
    fn test_nature_display() {
        assert_eq!(Nature::Fire.to_string(), "fire");
        assert_eq!(Nature::Prevention.to_string(), "prevention");
        assert_eq!(Nature::Community.to_string(), "community");
        assert_eq!(Nature::Management.to_string(), "management");
    }

    #[test]
    fn test_nature_all_is_complete() {
        assert_eq!(Nature::ALL.len(), 4);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(IncidentStatus::Pending.to_string(), "pending");
        assert_eq!(IncidentStatus::Ready.to_string(), "ready");
    }

    #[test]
    fn test_new_record_is_pending() {
        let record = IncidentRecord::new(basic_fields());
        assert_eq!(record.status, IncidentStatus::Pending);
        assert!(!record.is_ready());
        assert!(record.natures.is_empty());
        assert_eq!(record.basic.get("station"), Some(&Value::String("12".to_string())));
    }

    #[test]
    fn test_has_nature() {
        let mut record = IncidentRecord::new(basic_fields());
        assert!(!record.has_nature(Nature::Fire));

        record
            .natures
            .insert(Nature::Fire, Value::Object(Map::new()));
        assert!(record.has_nature(Nature::Fire));
        assert!(!record.has_nature(Nature::Prevention));
    }

    #[test]
    fn test_record_serialization_round_trip() {
        let mut record = IncidentRecord::new(basic_fields());
        record
            .natures
            .insert(Nature::Prevention, Value::Object(Map::new()));
        record.status = IncidentStatus::Ready;

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"prevention\""));
        assert!(json.contains("\"ready\""));

        let back: IncidentRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }

    #[test]
    fn test_natures_omitted_when_empty() {
        let record = IncidentRecord::new(basic_fields());
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("natures"));
    }

    #[test]
    fn test_deserialize_without_natures_field() {
        let json = r#"{"created_at":"2026-01-05T10:00:00Z","status":"pending","basic":{}}"#;
        let record: IncidentRecord = serde_json::from_str(json).unwrap();
        assert!(record.natures.is_empty());
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use super::document::{
    client_fields, merge_fields, parse_fields, to_fields, Problems, ValidationError,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub id: String,
    pub name: String,
    pub country: String,
    pub description: String,
    pub coordinates: Coordinates,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Fields outside the fixed schema, kept as-is.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// The client-controlled part of a destination, as accepted on create and
/// produced by merging an update over a stored document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DestinationDraft {
    pub name: String,
    pub country: String,
    pub description: String,
    pub coordinates: Coordinates,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl DestinationDraft {
    pub fn new(
        name: impl Into<String>,
        country: impl Into<String>,
        description: impl Into<String>,
        coordinates: Coordinates,
    ) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            description: description.into(),
            coordinates,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Parses a create payload.
    pub fn from_payload(payload: Value) -> Result<Self, ValidationError> {
        parse_fields(client_fields(payload)?)
    }

    /// Trims text fields and checks the document invariants.
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        self.name = self.name.trim().to_string();
        self.country = self.country.trim().to_string();
        self.description = self.description.trim().to_string();

        let mut problems = Problems::default();
        problems.require_text("name", &self.name);
        problems.require_text("country", &self.country);
        problems.require_text("description", &self.description);
        if !self.coordinates.lat.is_finite() {
            problems.push("coordinates.lat", "must be a finite number");
        }
        if !self.coordinates.lon.is_finite() {
            problems.push("coordinates.lon", "must be a finite number");
        }
        problems.into_result()?;

        Ok(self)
    }
}

impl Destination {
    /// Builds a new document with a fresh id from an already validated draft.
    pub fn new(draft: DestinationDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            country: draft.country,
            description: draft.description,
            coordinates: draft.coordinates,
            created_at: now,
            updated_at: now,
            extra: draft.extra,
        }
    }

    /// Merges the top-level fields of `patch` over this document and
    /// validates the result. `self` is left untouched.
    pub fn patched(&self, patch: Value) -> Result<Self, ValidationError> {
        let patch = client_fields(patch)?;
        let draft: DestinationDraft = parse_fields(merge_fields(to_fields(&self.draft()), patch))?;
        let draft = draft.validate()?;

        Ok(Self {
            id: self.id.clone(),
            name: draft.name,
            country: draft.country,
            description: draft.description,
            coordinates: draft.coordinates,
            created_at: self.created_at,
            updated_at: Utc::now(),
            extra: draft.extra,
        })
    }

    pub fn draft(&self) -> DestinationDraft {
        DestinationDraft {
            name: self.name.clone(),
            country: self.country.clone(),
            description: self.description.clone(),
            coordinates: self.coordinates,
            extra: self.extra.clone(),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}, {}", self.name, self.country)?;
        writeln!(f, "{}", "=".repeat(self.name.len() + self.country.len() + 2))?;
        writeln!(f, "ID: {}", self.id)?;
        writeln!(
            f,
            "Coordinates: {:.4}, {:.4}",
            self.coordinates.lat, self.coordinates.lon
        )?;
        writeln!(f, "\n{}", self.description)?;

        if !self.extra.is_empty() {
            writeln!(f, "\nOther fields:")?;
            for (key, value) in &self.extra {
                writeln!(f, "  {}: {}", key, value)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn paris() -> DestinationDraft {
        DestinationDraft::new(
            "Paris",
            "France",
            "The capital city of France.",
            Coordinates::new(48.8566, 2.3522),
        )
    }

    #[test]
    fn test_from_payload_keeps_unknown_fields() {
        let draft = DestinationDraft::from_payload(json!({
            "name": "Paris",
            "country": "France",
            "description": "City of light",
            "coordinates": {"lat": 48.8566, "lon": 2.3522},
            "bestSeason": "spring",
            "languages": ["French"]
        }))
        .unwrap();

        assert_eq!(draft.extra.len(), 2);
        assert_eq!(draft.extra["bestSeason"], "spring");
        assert_eq!(draft.extra["languages"], json!(["French"]));
    }

    #[test]
    fn test_from_payload_ignores_system_fields() {
        let draft = DestinationDraft::from_payload(json!({
            "id": "client-chosen",
            "createdAt": "2020-01-01T00:00:00Z",
            "name": "Paris",
            "country": "France",
            "description": "City of light",
            "coordinates": {"lat": 48.8566, "lon": 2.3522}
        }))
        .unwrap();

        assert!(draft.extra.is_empty());
    }

    #[test]
    fn test_missing_coordinates_is_invalid() {
        let err = DestinationDraft::from_payload(json!({
            "name": "Paris",
            "country": "France",
            "description": "City of light"
        }))
        .unwrap_err();

        assert!(err.to_string().contains("coordinates"));
    }

    #[test]
    fn test_non_numeric_coordinates_are_invalid() {
        let result = DestinationDraft::from_payload(json!({
            "name": "Paris",
            "country": "France",
            "description": "City of light",
            "coordinates": {"lat": "north", "lon": 2.3522}
        }));

        assert!(result.is_err());
    }

    #[test]
    fn test_validate_trims_and_rejects_blank_text() {
        let draft = DestinationDraft::new("  Paris ", "France", "desc", Coordinates::new(1.0, 2.0))
            .validate()
            .unwrap();
        assert_eq!(draft.name, "Paris");

        let err = DestinationDraft::new("Paris", "   ", "", Coordinates::new(1.0, 2.0))
            .validate()
            .unwrap_err();
        assert_eq!(err.problems().len(), 2);
    }

    #[test]
    fn test_new_assigns_id_and_timestamps() {
        let a = Destination::new(paris());
        let b = Destination::new(paris());

        assert_ne!(a.id, b.id);
        assert_eq!(a.created_at, a.updated_at);
    }

    #[test]
    fn test_patched_merges_and_preserves_identity() {
        let original = Destination::new(paris().with_field("currency", "EUR"));

        let updated = original
            .patched(json!({"description": "Updated", "id": "ignored"}))
            .unwrap();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.name, "Paris");
        assert_eq!(updated.description, "Updated");
        assert_eq!(updated.extra["currency"], "EUR");
    }

    #[test]
    fn test_patched_rejects_blank_name() {
        let original = Destination::new(paris());
        let err = original.patched(json!({"name": " "})).unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn test_json_shape() {
        let destination = Destination::new(paris().with_field("currency", "EUR"));
        let value = serde_json::to_value(&destination).unwrap();

        assert_eq!(value["coordinates"]["lat"], 48.8566);
        assert_eq!(value["currency"], "EUR");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("extra").is_none());

        let parsed: Destination = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, destination);
    }

    #[test]
    fn test_display() {
        let output = format!("{}", Destination::new(paris()));
        assert!(output.contains("Paris, France"));
        assert!(output.contains("48.8566"));
    }
}

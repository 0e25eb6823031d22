//! Typed entities stored in the `region` and `event` tables.
//!
//! Field names serialize to the original column names (`NOC`, `type`) so the
//! JSON shape matches the database.

use serde::{Deserialize, Deserializer, Serialize};

/// A National Olympic Committee region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    #[serde(rename = "NOC")]
    pub noc: String,
    pub region: String,
    pub notes: Option<String>,
}

/// A paralympic games event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    #[serde(flatten)]
    pub fields: NewEvent,
}

/// Event fields without the store-assigned id
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub year: i64,
    pub country: String,
    pub host: String,
    #[serde(rename = "NOC")]
    pub noc: String,
    pub start: String,
    pub end: String,
    pub duration: Option<i64>,
    pub disabilities_included: String,
    pub countries: Option<i64>,
    pub events: Option<i64>,
    pub sports: Option<i64>,
    pub participants_m: Option<i64>,
    pub participants_f: Option<i64>,
    pub participants: Option<i64>,
    pub highlights: String,
}

/// Partial update for a region. Absent fields are left unchanged;
/// `notes: Some(None)` clears the notes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegionPatch {
    pub region: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
}

impl RegionPatch {
    pub fn apply(&self, region: &mut Region) {
        if let Some(name) = &self.region {
            region.region = name.clone();
        }
        if let Some(notes) = &self.notes {
            region.notes = notes.clone();
        }
    }
}

/// Partial update for an event. Nullable columns take `Some(None)` to clear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EventPatch {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub year: Option<i64>,
    pub country: Option<String>,
    pub host: Option<String>,
    #[serde(rename = "NOC")]
    pub noc: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub duration: Option<Option<i64>>,
    pub disabilities_included: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub countries: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    pub events: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    pub sports: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    pub participants_m: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    pub participants_f: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    pub participants: Option<Option<i64>>,
    pub highlights: Option<String>,
}

impl EventPatch {
    pub fn apply(&self, event: &mut NewEvent) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *target = v.clone();
            }
        }

        set(&mut event.kind, &self.kind);
        set(&mut event.year, &self.year);
        set(&mut event.country, &self.country);
        set(&mut event.host, &self.host);
        set(&mut event.noc, &self.noc);
        set(&mut event.start, &self.start);
        set(&mut event.end, &self.end);
        set(&mut event.duration, &self.duration);
        set(&mut event.disabilities_included, &self.disabilities_included);
        set(&mut event.countries, &self.countries);
        set(&mut event.events, &self.events);
        set(&mut event.sports, &self.sports);
        set(&mut event.participants_m, &self.participants_m);
        set(&mut event.participants_f, &self.participants_f);
        set(&mut event.participants, &self.participants);
        set(&mut event.highlights, &self.highlights);
    }
}

/// Distinguishes a field that is present-but-null from one that is absent
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

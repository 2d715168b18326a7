//! JSON parser for bus-line records.

use anyhow::Result;
use serde::Deserialize;
use serde::de::{Deserializer, MapAccess, Visitor};
use std::fmt;

/// One stop on a line, with the travel time in minutes from the previous
/// stop. The first stop's value is conventionally zero and is never added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stop {
    pub name: String,
    pub minutes_from_previous: u32,
}

/// Departures sharing one schedule, labeled by day type
/// (e.g. "ponedjeljak-subota", "nedjelja").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartureGroup {
    pub day_type: String,
    pub times: Vec<String>,
}

/// A full bus-line record as found in the input JSON files.
///
/// `stanice` and `polasci` are JSON objects whose key order is significant:
/// it fixes table column order and section order in the rendered output, so
/// both are deserialized into ordered `Vec`s rather than maps.
#[derive(Debug, Clone, Deserialize)]
pub struct LineRecord {
    #[serde(rename = "broj", default)]
    pub number: Option<u32>,
    #[serde(rename = "linija", default)]
    pub name: Option<String>,
    #[serde(rename = "napomena", default)]
    pub note: Option<String>,
    #[serde(rename = "stanice", default, deserialize_with = "ordered_stops")]
    pub stops: Vec<Stop>,
    #[serde(rename = "polasci", default, deserialize_with = "ordered_departures")]
    pub departures: Vec<DepartureGroup>,
}

/// Parses one line record from raw JSON bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not valid JSON for a line record.
pub fn parse_record(bytes: &[u8]) -> Result<LineRecord> {
    Ok(serde_json::from_slice(bytes)?)
}

fn ordered_stops<'de, D>(deserializer: D) -> Result<Vec<Stop>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StopsVisitor;

    impl<'de> Visitor<'de> for StopsVisitor {
        type Value = Vec<Stop>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of stop name to minutes from the previous stop")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut stops = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((name, minutes_from_previous)) = map.next_entry::<String, u32>()? {
                stops.push(Stop {
                    name,
                    minutes_from_previous,
                });
            }
            Ok(stops)
        }
    }

    deserializer.deserialize_map(StopsVisitor)
}

fn ordered_departures<'de, D>(deserializer: D) -> Result<Vec<DepartureGroup>, D::Error>
where
    D: Deserializer<'de>,
{
    struct DeparturesVisitor;

    impl<'de> Visitor<'de> for DeparturesVisitor {
        type Value = Vec<DepartureGroup>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of day-type label to a list of departure times")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut groups = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((day_type, times)) = map.next_entry::<String, Vec<String>>()? {
                groups.push(DepartureGroup { day_type, times });
            }
            Ok(groups)
        }
    }

    deserializer.deserialize_map(DeparturesVisitor)
}

//!  Bizim Transfer Agent
//!
//!  Copyright (C) 2026  Mamy Ratsimbazafy
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! # Places Results Parser
//!
//! Side-effect free decoding of place search predictions and place details.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ClientError, TransportError};
use crate::upstream_reply::{UpstreamReply, de_f64, de_opt_string, error_message};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceKind {
    Hotel,
    Airport,
    #[default]
    Other,
}

impl PlaceKind {
    pub fn from_types<S: AsRef<str>>(types: &[S]) -> Self {
        let has = |wanted: &[&str]| {
            types
                .iter()
                .any(|t| wanted.iter().any(|w| *w == t.as_ref()))
        };
        if has(&["airport"]) {
            PlaceKind::Airport
        } else if has(&["lodging", "hotel"]) {
            PlaceKind::Hotel
        } else {
            PlaceKind::Other
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(deserialize_with = "de_f64")]
    pub lat: f64,
    #[serde(deserialize_with = "de_f64")]
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Place {
    pub place_id: String,
    #[serde(alias = "name")]
    pub description: String,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub kind: PlaceKind,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PlaceSearchResult {
    pub places: Vec<Place>,
}

#[derive(Deserialize)]
struct PlaceList {
    #[serde(default, alias = "list", alias = "predictions", alias = "results")]
    places: Vec<Place>,
}

impl PlaceSearchResult {
    /// Accepts either a bare prediction array or a `status`-tagged object.
    pub fn from_json(value: Value) -> Result<Self, ClientError> {
        let mut places = match value {
            Value::Array(_) => serde_json::from_value::<Vec<Place>>(value)
                .map_err(|e| TransportError::Shape(e.to_string()))?,
            Value::Object(_) => UpstreamReply::<PlaceList>::loose(value)?.into_result()?.places,
            other => {
                return Err(TransportError::Shape(format!(
                    "expected a list of places, got {other}"
                ))
                .into());
            }
        };
        for place in &mut places {
            place.kind = PlaceKind::from_types(&place.types);
        }
        Ok(Self { places })
    }

    pub fn summary(&self) -> String {
        if self.places.is_empty() {
            return "No places found matching your query.".to_string();
        }
        let mut lines = vec![format!("Found {} location(s):", self.places.len())];
        for (i, place) in self.places.iter().enumerate() {
            lines.push(format!(
                "{}. {} [{}] (ID: {})",
                i + 1,
                place.description,
                kind_label(place.kind),
                place.place_id
            ));
        }
        lines.push(String::new());
        lines.push("Pass an ID to get_place_details to obtain coordinates.".to_string());
        lines.join("\n")
    }
}

#[derive(Deserialize)]
struct Geometry {
    location: Option<Coordinates>,
}

#[derive(Deserialize)]
struct RawPlaceDetails {
    #[serde(default, deserialize_with = "de_opt_string")]
    place_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    formatted_address: Option<String>,
    #[serde(default)]
    geometry: Option<Geometry>,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PlaceDetails {
    pub place_id: String,
    pub name: Option<String>,
    pub formatted_address: Option<String>,
    pub location: Option<Coordinates>,
    pub types: Vec<String>,
    pub kind: PlaceKind,
}

impl PlaceDetails {
    /// Decode a details reply. Geocoder replies nest the place under
    /// `result`; a reply without an id is attributed to `requested_id`.
    /// `ZERO_RESULTS`, or a reply describing no place at all, means the
    /// upstream does not know `requested_id`.
    pub fn from_json(value: Value, requested_id: &str) -> Result<Self, ClientError> {
        if !value.is_object() {
            return Err(TransportError::Shape(format!(
                "expected place details object, got {value}"
            ))
            .into());
        }
        let not_found = |value: &Value| ClientError::Upstream {
            status: None,
            message: error_message(value)
                .unwrap_or_else(|| format!("No place found with ID '{requested_id}'")),
        };
        let zero_results = value
            .get("status")
            .and_then(Value::as_str)
            .is_some_and(|s| s.eq_ignore_ascii_case("zero_results"));
        if zero_results {
            return Err(not_found(&value));
        }
        let reply = value.clone();

        let mut envelope = UpstreamReply::<Value>::loose(value)?.into_result()?;
        let body = match envelope.get_mut("result") {
            Some(inner) if inner.is_object() => inner.take(),
            _ => envelope,
        };
        let raw: RawPlaceDetails =
            serde_json::from_value(body).map_err(|e| TransportError::Shape(e.to_string()))?;
        if raw.place_id.is_none()
            && raw.name.is_none()
            && raw.formatted_address.is_none()
            && raw.geometry.is_none()
        {
            return Err(not_found(&reply));
        }

        Ok(Self {
            place_id: raw.place_id.unwrap_or_else(|| requested_id.to_string()),
            kind: PlaceKind::from_types(&raw.types),
            name: raw.name,
            formatted_address: raw.formatted_address,
            location: raw.geometry.and_then(|g| g.location),
            types: raw.types,
        })
    }

    pub fn summary(&self) -> String {
        let mut lines = vec!["Location Details:".to_string()];
        lines.push(format!("ID: {}", self.place_id));
        lines.push(format!("Name: {}", self.name.as_deref().unwrap_or("N/A")));
        lines.push(format!(
            "Address: {}",
            self.formatted_address.as_deref().unwrap_or("N/A")
        ));
        match self.location {
            Some(c) => {
                lines.push(format!("Latitude: {}", c.lat));
                lines.push(format!("Longitude: {}", c.lng));
            }
            None => lines.push("Coordinates: not available".to_string()),
        }
        if !self.types.is_empty() {
            lines.push(format!("Type: {}", self.types.join(", ")));
        }
        lines.join("\n")
    }
}

fn kind_label(kind: PlaceKind) -> &'static str {
    match kind {
        PlaceKind::Hotel => "hotel",
        PlaceKind::Airport => "airport",
        PlaceKind::Other => "place",
    }
}

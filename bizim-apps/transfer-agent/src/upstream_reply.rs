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

//! # Upstream Reply Envelope
//!
//! The upstream marks outcomes with a top-level `status` field:
//! `"success"` next to the payload, or `"error"` next to a `description`.
//! Place lookups proxy a geocoder and may omit the field entirely.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ClientError, TransportError};

const UNKNOWN_ERROR: &str = "Unknown error occurred";

#[derive(Debug)]
pub(crate) enum UpstreamReply<T> {
    Success(T),
    Failure(String),
}

impl<T: DeserializeOwned> UpstreamReply<T> {
    /// Replies from booking endpoints, which always carry `status`.
    pub(crate) fn tagged(value: Value) -> Result<Self, TransportError> {
        match value.get("status") {
            None => Err(TransportError::Shape(
                "missing 'status' field in upstream reply".to_string(),
            )),
            Some(_) => Self::loose(value),
        }
    }

    /// Replies where `status` is optional; absent means success.
    pub(crate) fn loose(value: Value) -> Result<Self, TransportError> {
        let status = match value.get("status") {
            None => None,
            Some(Value::String(s)) => Some(s.to_lowercase()),
            Some(other) => {
                return Err(TransportError::Shape(format!(
                    "'status' should be a string, got {other}"
                )));
            }
        };
        match status.as_deref() {
            None | Some("success") | Some("ok") | Some("zero_results") => serde_json::from_value(value)
                .map(UpstreamReply::Success)
                .map_err(|e| TransportError::Shape(e.to_string())),
            Some(status) if is_failure_status(status) => Ok(UpstreamReply::Failure(
                error_message(&value).unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            )),
            Some(other) => Err(TransportError::Shape(format!(
                "unknown upstream status '{other}'"
            ))),
        }
    }

    pub(crate) fn into_result(self) -> Result<T, ClientError> {
        match self {
            UpstreamReply::Success(payload) => Ok(payload),
            UpstreamReply::Failure(message) => Err(ClientError::Upstream {
                status: None,
                message,
            }),
        }
    }
}

/// Booking failures plus the geocoder's error statuses, lowercased.
fn is_failure_status(status: &str) -> bool {
    matches!(
        status,
        "error"
            | "fail"
            | "failed"
            | "not_found"
            | "invalid_request"
            | "request_denied"
            | "over_query_limit"
            | "over_daily_limit"
            | "unknown_error"
    )
}

/// Message for a body that reports a failure, whatever the HTTP status was.
pub(crate) fn failure_message(value: &Value) -> Option<String> {
    let failed = value
        .get("status")
        .and_then(Value::as_str)
        .is_some_and(|s| is_failure_status(&s.to_lowercase()));
    error_message(value).or_else(|| failed.then(|| UNKNOWN_ERROR.to_string()))
}

/// The upstream's own explanation, from whichever field it used.
pub(crate) fn error_message(value: &Value) -> Option<String> {
    ["description", "message", "error_message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Number(serde_json::Number),
    Text(String),
}

impl Loose {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Loose::Number(n) => n.as_f64(),
            Loose::Text(s) => s.trim().replace(',', ".").parse().ok(),
        }
    }

    fn into_string(self) -> String {
        match self {
            Loose::Number(n) => n.to_string(),
            Loose::Text(s) => s,
        }
    }
}

// The upstream is inconsistent about quoting numbers; these accept both.

pub(crate) fn de_f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let raw = Loose::deserialize(d)?;
    raw.as_f64()
        .ok_or_else(|| serde::de::Error::custom("expected a number"))
}

pub(crate) fn de_opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(Option::<Loose>::deserialize(d)?.and_then(|v| v.as_f64()))
}

pub(crate) fn de_opt_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    Ok(Option::<Loose>::deserialize(d)?
        .and_then(|v| v.as_f64())
        .filter(|v| *v >= 0.0 && *v <= f64::from(u32::MAX))
        .map(|v| v as u32))
}

pub(crate) fn de_i64<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    let parsed = match Loose::deserialize(d)? {
        Loose::Number(n) => n.as_i64(),
        Loose::Text(s) => s.trim().parse().ok(),
    };
    parsed.ok_or_else(|| serde::de::Error::custom("expected an integer"))
}

pub(crate) fn de_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let raw = Loose::deserialize(d)?;
    Ok(raw.into_string())
}

pub(crate) fn de_opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Loose>::deserialize(d)?
        .map(Loose::into_string)
        .filter(|s| !s.is_empty()))
}

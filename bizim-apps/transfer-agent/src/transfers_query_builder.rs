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

//! # Transfers Query Builder
//!
//! Side-effect free validation of a transfer search and its encoding into the
//! JSON body of `POST /query`. Nothing reaches the network unless every field
//! checks out.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::fmt;

use crate::error::{ValidationError, require};
use crate::places_query_builder::{Language, default_language};

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const TIME_FORMAT: &str = "%H:%M";

/// Currencies accepted by the upstream, keyed by its numeric ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum Currency {
    Try = 1,
    Eur = 2,
    Usd = 3,
    Gbp = 4,
    Rub = 6,
}

impl Currency {
    pub const ALL: [Currency; 5] = [
        Currency::Try,
        Currency::Eur,
        Currency::Usd,
        Currency::Gbp,
        Currency::Rub,
    ];

    pub fn id(&self) -> u8 {
        *self as u8
    }

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Try => "TRY",
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
            Currency::Gbp => "GBP",
            Currency::Rub => "RUB",
        }
    }

    pub fn from_id(id: i64) -> Option<Self> {
        Currency::ALL.into_iter().find(|c| i64::from(c.id()) == id)
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_uppercase();
        Currency::ALL.into_iter().find(|c| c.code() == code)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// `requesttype` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum TripType {
    OneWay = 1,
    RoundTrip = 2,
}

impl TripType {
    pub fn from_request_type(value: i64) -> Option<Self> {
        match value {
            1 => Some(TripType::OneWay),
            2 => Some(TripType::RoundTrip),
            _ => None,
        }
    }
}

fn default_request_type() -> i64 {
    TripType::OneWay as i64
}

fn default_currency_id() -> i64 {
    Currency::Eur.id().into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct TransferSearchParams {
    /// Pickup location name or address
    pub pickup: String,
    /// Pickup latitude, -90 to 90
    pub pickuplat: f64,
    /// Pickup longitude, -180 to 180
    pub pickuplng: f64,
    /// Dropoff location name or address
    pub dropoff: String,
    /// Dropoff latitude, -90 to 90
    pub dropofflat: f64,
    /// Dropoff longitude, -180 to 180
    pub dropofflng: f64,
    /// Number of adults, at least 1
    pub adult: i64,
    /// Number of children (0-16 years)
    #[serde(default)]
    pub child: i64,
    /// Number of infants (0-2 years)
    #[serde(default)]
    pub infant: i64,
    /// Pickup date, YYYY-MM-DD
    pub pickupdate: String,
    /// Pickup time, HH:MM (24h)
    pub pickuptime: String,
    /// Return date for round trips, YYYY-MM-DD
    #[serde(default)]
    pub dropoffdate: String,
    /// Return time for round trips, HH:MM (24h)
    #[serde(default)]
    pub dropofftime: String,
    /// 1 for one-way, 2 for round-trip
    #[serde(default = "default_request_type")]
    pub requesttype: i64,
    /// Currency id: 1=TRY, 2=EUR, 3=USD, 4=GBP, 6=RUB
    #[serde(default = "default_currency_id")]
    pub currencyid: i64,
    /// Response language: en, tr, de or ru
    #[serde(default = "default_language")]
    pub language: String,
}

/// Body of `POST /query`, only ever built from validated params.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct TransferQueryPayload<'a> {
    pickup: &'a str,
    pickuplat: f64,
    pickuplng: f64,
    dropoff: &'a str,
    dropofflat: f64,
    dropofflng: f64,
    adult: u32,
    child: u32,
    infant: u32,
    pickupdate: String,
    pickuptime: String,
    dropoffdate: String,
    dropofftime: String,
    requesttype: TripType,
    currencyid: Currency,
    language: Language,
}

impl TransferQueryPayload<'_> {
    pub(crate) fn currency(&self) -> Currency {
        self.currencyid
    }
}

fn check_latitude(value: f64, field: &'static str) -> Result<(), ValidationError> {
    require(value.is_finite() && (-90.0..=90.0).contains(&value), field, || {
        format!("latitude must be between -90 and 90, got {value}")
    })
}

fn check_longitude(value: f64, field: &'static str) -> Result<(), ValidationError> {
    require(
        value.is_finite() && (-180.0..=180.0).contains(&value),
        field,
        || format!("longitude must be between -180 and 180, got {value}"),
    )
}

fn check_count(value: i64, min: i64, field: &'static str) -> Result<u32, ValidationError> {
    require(value >= min, field, || {
        format!("must be at least {min}, got {value}")
    })?;
    u32::try_from(value).map_err(|_| ValidationError::new(field, format!("{value} is too large")))
}

pub(crate) fn parse_date(value: &str, field: &'static str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        ValidationError::new(field, format!("'{value}' is not a YYYY-MM-DD date"))
    })
}

pub(crate) fn parse_time(value: &str, field: &'static str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT)
        .map_err(|_| ValidationError::new(field, format!("'{value}' is not a HH:MM (24h) time")))
}

impl TransferSearchParams {
    pub fn trip_type(&self) -> Option<TripType> {
        TripType::from_request_type(self.requesttype)
    }

    pub fn currency(&self) -> Option<Currency> {
        Currency::from_id(self.currencyid)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.build_payload().map(|_| ())
    }

    pub(crate) fn build_payload(&self) -> Result<TransferQueryPayload<'_>, ValidationError> {
        require(!self.pickup.trim().is_empty(), "pickup", || {
            "pickup location is required".to_string()
        })?;
        require(!self.dropoff.trim().is_empty(), "dropoff", || {
            "dropoff location is required".to_string()
        })?;
        check_latitude(self.pickuplat, "pickuplat")?;
        check_longitude(self.pickuplng, "pickuplng")?;
        check_latitude(self.dropofflat, "dropofflat")?;
        check_longitude(self.dropofflng, "dropofflng")?;

        let adult = check_count(self.adult, 1, "adult")?;
        let child = check_count(self.child, 0, "child")?;
        let infant = check_count(self.infant, 0, "infant")?;

        let pickup_date = parse_date(&self.pickupdate, "pickupdate")?;
        let pickup_time = parse_time(&self.pickuptime, "pickuptime")?;

        let trip_type = self.trip_type().ok_or_else(|| {
            ValidationError::new(
                "requesttype",
                format!(
                    "must be 1 (one-way) or 2 (round-trip), got {}",
                    self.requesttype
                ),
            )
        })?;

        let (dropoff_date, dropoff_time) = match trip_type {
            TripType::OneWay => (String::new(), String::new()),
            TripType::RoundTrip => {
                require(!self.dropoffdate.trim().is_empty(), "dropoffdate", || {
                    "return date is required for round trips".to_string()
                })?;
                require(!self.dropofftime.trim().is_empty(), "dropofftime", || {
                    "return time is required for round trips".to_string()
                })?;
                let date = parse_date(&self.dropoffdate, "dropoffdate")?;
                let time = parse_time(&self.dropofftime, "dropofftime")?;
                require(
                    date.and_time(time) > pickup_date.and_time(pickup_time),
                    "dropoffdate",
                    || "return must be after the outbound pickup".to_string(),
                )?;
                (
                    date.format(DATE_FORMAT).to_string(),
                    time.format(TIME_FORMAT).to_string(),
                )
            }
        };

        let currency = self.currency().ok_or_else(|| {
            ValidationError::new(
                "currencyid",
                format!(
                    "unsupported currency id {}, expected 1=TRY, 2=EUR, 3=USD, 4=GBP or 6=RUB",
                    self.currencyid
                ),
            )
        })?;
        let language = Language::parse_field(&self.language, "language")?;

        Ok(TransferQueryPayload {
            pickup: self.pickup.trim(),
            pickuplat: self.pickuplat,
            pickuplng: self.pickuplng,
            dropoff: self.dropoff.trim(),
            dropofflat: self.dropofflat,
            dropofflng: self.dropofflng,
            adult,
            child,
            infant,
            pickupdate: pickup_date.format(DATE_FORMAT).to_string(),
            pickuptime: pickup_time.format(TIME_FORMAT).to_string(),
            dropoffdate: dropoff_date,
            dropofftime: dropoff_time,
            requesttype: trip_type,
            currencyid: currency,
            language,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn istanbul() -> TransferSearchParams {
        TransferSearchParams {
            pickup: "Istanbul Airport".into(),
            pickuplat: 41.2608,
            pickuplng: 28.7425,
            dropoff: "Taksim Square".into(),
            dropofflat: 41.0370,
            dropofflng: 28.9850,
            adult: 2,
            child: 0,
            infant: 0,
            pickupdate: "2023-06-15".into(),
            pickuptime: "14:00".into(),
            dropoffdate: String::new(),
            dropofftime: String::new(),
            requesttype: 1,
            currencyid: 2,
            language: "en".into(),
        }
    }

    #[test]
    fn payload_uses_upstream_field_names_and_numeric_enums() {
        let params = istanbul();
        let payload = serde_json::to_value(params.build_payload().unwrap()).unwrap();
        assert_eq!(payload["pickup"], json!("Istanbul Airport"));
        assert_eq!(payload["requesttype"], json!(1));
        assert_eq!(payload["currencyid"], json!(2));
        assert_eq!(payload["language"], json!("en"));
        assert_eq!(payload["adult"], json!(2));
        assert_eq!(payload["dropoffdate"], json!(""));
    }

    #[test]
    fn round_trip_requires_return_leg() {
        let mut params = istanbul();
        params.requesttype = 2;
        assert_eq!(params.validate().unwrap_err().field(), "dropoffdate");

        params.dropoffdate = "2023-06-20".into();
        assert_eq!(params.validate().unwrap_err().field(), "dropofftime");

        params.dropofftime = "21:30".into();
        let payload = serde_json::to_value(params.build_payload().unwrap()).unwrap();
        assert_eq!(payload["dropofftime"], json!("21:30"));
        assert_eq!(payload["requesttype"], json!(2));
    }

    #[test]
    fn return_before_pickup_is_rejected() {
        let mut params = istanbul();
        params.requesttype = 2;
        params.dropoffdate = "2023-06-15".into();
        params.dropofftime = "13:00".into();
        assert_eq!(params.validate().unwrap_err().field(), "dropoffdate");
    }

    #[test]
    fn currency_lookup_by_id_and_code() {
        assert_eq!(Currency::from_id(6), Some(Currency::Rub));
        assert_eq!(Currency::from_id(5), None);
        assert_eq!(Currency::from_code("gbp"), Some(Currency::Gbp));
        assert_eq!(Currency::Eur.id(), 2);
    }

    #[test]
    fn nan_coordinates_are_rejected() {
        let mut params = istanbul();
        params.dropofflng = f64::NAN;
        assert_eq!(params.validate().unwrap_err().field(), "dropofflng");
    }
}

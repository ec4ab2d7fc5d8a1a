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

//! # Reservations Query Builder
//!
//! Validation and JSON encoding for `POST /reservation` and `POST /list`.
//! Field names on the wire follow the upstream API, typos included
//! (`customercoutry`, `passangers`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ValidationError, require};
use crate::transfers_query_builder::{DATE_FORMAT, parse_date};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct PassengerInput {
    /// Passenger full name
    pub name: String,
    /// Passenger country, 2-letter ISO code
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct ReservationParams {
    /// Booking reference (UUID) from the transfer search result
    pub uuid: String,
    /// Customer first name
    pub first_name: String,
    /// Customer last name
    pub last_name: String,
    /// Customer email address
    #[serde(default)]
    pub email: String,
    /// Customer phone number with country code
    #[serde(default)]
    pub phone: String,
    /// Customer country, 2-letter ISO code
    pub country_code: String,
    /// Subroute ID of the chosen outbound option
    pub outbound_subroute_id: i64,
    #[serde(default)]
    pub flight_number: String,
    #[serde(default)]
    pub terminal: String,
    /// Notes for the driver
    #[serde(default)]
    pub notes: String,
    /// Subroute ID of the chosen return option, round trips only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_subroute_id: Option<i64>,
    #[serde(default)]
    pub return_flight_number: String,
    #[serde(default)]
    pub return_terminal: String,
    #[serde(default)]
    pub return_notes: String,
    /// Travelling passengers; defaults to the customer alone
    #[serde(default)]
    pub passengers: Vec<PassengerInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct TransferWayPayload<'a> {
    subrouteid: i64,
    flightnumber: &'a str,
    terminal: &'a str,
    notes: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct PassengerPayload {
    name: String,
    country: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ReservationPayload<'a> {
    uuid: &'a str,
    customername: &'a str,
    customersurname: &'a str,
    customeremail: &'a str,
    customertelephone: &'a str,
    customercoutry: String,
    transferway: Vec<TransferWayPayload<'a>>,
    passangers: Vec<PassengerPayload>,
}

fn check_country(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let value = value.trim();
    require(!value.is_empty(), field, || "country code is required".to_string())?;
    require(
        value.len() == 2 && value.chars().all(|c| c.is_ascii_alphabetic()),
        field,
        || format!("'{value}' is not a 2-letter ISO country code"),
    )?;
    Ok(value.to_lowercase())
}

fn check_email(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    require(!value.is_empty(), "email", || {
        "customer email address is required".to_string()
    })?;
    let well_formed = value
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    require(well_formed, "email", || {
        format!("'{value}' is not a valid email address")
    })
}

fn check_phone(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    require(!value.is_empty(), "phone", || {
        "customer phone number is required".to_string()
    })?;
    require(
        value.chars().any(|c| c.is_ascii_digit())
            && value
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')')),
        "phone",
        || format!("'{value}' is not a phone number"),
    )
}

impl ReservationParams {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.build_payload().map(|_| ())
    }

    pub(crate) fn build_payload(&self) -> Result<ReservationPayload<'_>, ValidationError> {
        require(!self.uuid.trim().is_empty(), "uuid", || {
            "booking reference (UUID) from the search results is required".to_string()
        })?;
        require(!self.first_name.trim().is_empty(), "first_name", || {
            "customer first name is required".to_string()
        })?;
        require(!self.last_name.trim().is_empty(), "last_name", || {
            "customer last name is required".to_string()
        })?;
        check_email(&self.email)?;
        check_phone(&self.phone)?;
        let country = check_country(&self.country_code, "country_code")?;
        require(self.outbound_subroute_id > 0, "outbound_subroute_id", || {
            "outbound subroute ID from the search results is required".to_string()
        })?;

        let mut transferway = vec![TransferWayPayload {
            subrouteid: self.outbound_subroute_id,
            flightnumber: self.flight_number.trim(),
            terminal: self.terminal.trim(),
            notes: self.notes.trim(),
        }];
        if let Some(id) = self.return_subroute_id {
            require(id > 0, "return_subroute_id", || {
                format!("must be a positive subroute ID, got {id}")
            })?;
            transferway.push(TransferWayPayload {
                subrouteid: id,
                flightnumber: self.return_flight_number.trim(),
                terminal: self.return_terminal.trim(),
                notes: self.return_notes.trim(),
            });
        }

        let passangers = if self.passengers.is_empty() {
            vec![PassengerPayload {
                name: format!("{} {}", self.first_name.trim(), self.last_name.trim()),
                country: country.clone(),
            }]
        } else {
            self.passengers
                .iter()
                .map(|p| {
                    require(!p.name.trim().is_empty(), "passengers", || {
                        "every passenger needs a name".to_string()
                    })?;
                    Ok(PassengerPayload {
                        name: p.name.trim().to_string(),
                        country: check_country(&p.country, "passengers")?,
                    })
                })
                .collect::<Result<Vec<_>, ValidationError>>()?
        };

        Ok(ReservationPayload {
            uuid: self.uuid.trim(),
            customername: self.first_name.trim(),
            customersurname: self.last_name.trim(),
            customeremail: self.email.trim(),
            customertelephone: self.phone.trim(),
            customercoutry: country,
            transferway,
            passangers,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListQueryType {
    CreateDate,
    FlightDate,
    ReservationNumber,
}

impl ListQueryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListQueryType::CreateDate => "createdate",
            ListQueryType::FlightDate => "flightdate",
            ListQueryType::ReservationNumber => "reservationnumber",
        }
    }
}

impl fmt::Display for ListQueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListQueryType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "createdate" => Ok(ListQueryType::CreateDate),
            "flightdate" => Ok(ListQueryType::FlightDate),
            "reservationnumber" => Ok(ListQueryType::ReservationNumber),
            other => Err(ValidationError::new(
                "query_type",
                format!(
                    "'{other}' is not one of 'createdate', 'flightdate' or 'reservationnumber'"
                ),
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "mcp", derive(schemars::JsonSchema))]
pub struct ReservationListParams {
    /// 'createdate', 'flightdate' or 'reservationnumber'
    pub query_type: String,
    /// Start date for date queries, YYYY-MM-DD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// End date for date queries, YYYY-MM-DD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Reservation number for direct lookups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservation_number: Option<i64>,
}

/// Body of `POST /list`; the variant decides which criteria are sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "querytype", rename_all = "lowercase")]
pub(crate) enum ReservationListPayload {
    CreateDate { start: String, end: String },
    FlightDate { start: String, end: String },
    ReservationNumber { reservationnumber: i64 },
}

fn required_date(
    value: Option<&str>,
    field: &'static str,
    query_type: ListQueryType,
) -> Result<NaiveDate, ValidationError> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ValidationError::new(field, format!("required for {query_type} queries")))?;
    parse_date(value, field)
}

impl ReservationListParams {
    pub fn by_create_date(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            query_type: ListQueryType::CreateDate.to_string(),
            start_date: Some(start.into()),
            end_date: Some(end.into()),
            reservation_number: None,
        }
    }

    pub fn by_flight_date(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            query_type: ListQueryType::FlightDate.to_string(),
            ..Self::by_create_date(start, end)
        }
    }

    pub fn by_number(reservation_number: i64) -> Self {
        Self {
            query_type: ListQueryType::ReservationNumber.to_string(),
            start_date: None,
            end_date: None,
            reservation_number: Some(reservation_number),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.build_payload().map(|_| ())
    }

    pub(crate) fn build_payload(&self) -> Result<ReservationListPayload, ValidationError> {
        let query_type: ListQueryType = self.query_type.parse()?;
        match query_type {
            ListQueryType::CreateDate | ListQueryType::FlightDate => {
                let start = required_date(self.start_date.as_deref(), "start_date", query_type)?;
                let end = required_date(self.end_date.as_deref(), "end_date", query_type)?;
                require(start <= end, "end_date", || {
                    format!("{end} is before start date {start}")
                })?;
                let start = start.format(DATE_FORMAT).to_string();
                let end = end.format(DATE_FORMAT).to_string();
                Ok(match query_type {
                    ListQueryType::CreateDate => ReservationListPayload::CreateDate { start, end },
                    _ => ReservationListPayload::FlightDate { start, end },
                })
            }
            ListQueryType::ReservationNumber => {
                let number = self.reservation_number.ok_or_else(|| {
                    ValidationError::new(
                        "reservation_number",
                        "required for reservationnumber queries",
                    )
                })?;
                require(number > 0, "reservation_number", || {
                    format!("must be positive, got {number}")
                })?;
                Ok(ReservationListPayload::ReservationNumber {
                    reservationnumber: number,
                })
            }
        }
    }
}

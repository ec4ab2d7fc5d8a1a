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

//! # Reservations Results Parser
//!
//! Side-effect free decoding of reservation confirmations and reservation
//! listings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;
use crate::upstream_reply::{UpstreamReply, de_opt_f64, de_opt_string, de_opt_u32, de_string};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ReservationConfirmation {
    #[serde(alias = "rezid", deserialize_with = "de_string")]
    pub reservation_id: String,
}

impl ReservationConfirmation {
    pub fn from_json(value: Value) -> Result<Self, ClientError> {
        UpstreamReply::<Self>::tagged(value)?.into_result()
    }

    pub fn summary(&self) -> String {
        [
            "Reservation successfully created.".to_string(),
            format!("Reservation number: {}", self.reservation_id),
            String::new(),
            "Keep this number for your records; a confirmation email follows.".to_string(),
        ]
        .join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ReservedTransfer {
    #[serde(alias = "pickupadres", default, deserialize_with = "de_opt_string")]
    pub pickup_address: Option<String>,
    #[serde(alias = "returnadres", default, deserialize_with = "de_opt_string")]
    pub dropoff_address: Option<String>,
    #[serde(alias = "flightdate", default, deserialize_with = "de_opt_string")]
    pub flight_date: Option<String>,
    #[serde(alias = "pickuptime", default, deserialize_with = "de_opt_string")]
    pub pickup_time: Option<String>,
    #[serde(alias = "car", default, deserialize_with = "de_opt_string")]
    pub vehicle: Option<String>,
    #[serde(alias = "duration", default, deserialize_with = "de_opt_u32")]
    pub duration_minutes: Option<u32>,
    #[serde(alias = "flightnumber", default, deserialize_with = "de_opt_string")]
    pub flight_number: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub terminal: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ReservedPassenger {
    #[serde(alias = "namesurname", deserialize_with = "de_string")]
    pub name: String,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Reservation {
    #[serde(alias = "reservationnumber", deserialize_with = "de_string")]
    pub reservation_number: String,
    #[serde(alias = "customername", default, deserialize_with = "de_opt_string")]
    pub customer_name: Option<String>,
    #[serde(alias = "customersurname", default, deserialize_with = "de_opt_string")]
    pub customer_surname: Option<String>,
    #[serde(alias = "customeremail", default, deserialize_with = "de_opt_string")]
    pub email: Option<String>,
    #[serde(alias = "customertel", default, deserialize_with = "de_opt_string")]
    pub phone: Option<String>,
    #[serde(alias = "adult", default, deserialize_with = "de_opt_u32")]
    pub adults: Option<u32>,
    #[serde(alias = "child", default, deserialize_with = "de_opt_u32")]
    pub children: Option<u32>,
    #[serde(alias = "infant", default, deserialize_with = "de_opt_u32")]
    pub infants: Option<u32>,
    #[serde(alias = "Amount", default, deserialize_with = "de_opt_f64")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub status: Option<String>,
    #[serde(alias = "paymenttype", default, deserialize_with = "de_opt_string")]
    pub payment_type: Option<String>,
    #[serde(alias = "createat", default, deserialize_with = "de_opt_string")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub ways: Vec<ReservedTransfer>,
    #[serde(alias = "passangers", default, deserialize_with = "nullable_vec")]
    pub passengers: Vec<ReservedPassenger>,
}

fn nullable_vec<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(d)?.unwrap_or_default())
}

#[derive(Deserialize)]
struct RawReservationList {
    #[serde(default, deserialize_with = "nullable_vec")]
    list: Vec<Reservation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ReservationList {
    pub reservations: Vec<Reservation>,
}

impl ReservationList {
    pub fn from_json(value: Value) -> Result<Self, ClientError> {
        let raw = UpstreamReply::<RawReservationList>::tagged(value)?.into_result()?;
        Ok(Self {
            reservations: raw.list,
        })
    }

    /// Reservation numbers in upstream order.
    pub fn ids(&self) -> Vec<&str> {
        self.reservations
            .iter()
            .map(|r| r.reservation_number.as_str())
            .collect()
    }

    pub fn summary(&self) -> String {
        if self.reservations.is_empty() {
            return "No reservations found matching your criteria.".to_string();
        }
        let na = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".to_string());
        let count = |v: Option<u32>| v.unwrap_or(0);

        let mut lines = vec![format!("Found {} reservation(s):", self.reservations.len())];
        for (i, res) in self.reservations.iter().enumerate() {
            lines.push(String::new());
            lines.push(format!("## Reservation {}", i + 1));
            lines.push(format!("Reservation number: {}", res.reservation_number));
            lines.push(format!(
                "Customer: {} {}",
                na(&res.customer_name),
                na(&res.customer_surname)
            ));
            lines.push(format!("Contact: {}, {}", na(&res.email), na(&res.phone)));
            lines.push(format!(
                "Passengers: {} adults, {} children, {} infants",
                count(res.adults),
                count(res.children),
                count(res.infants)
            ));
            if let Some(amount) = res.amount {
                lines.push(format!("Amount: {} {}", amount, na(&res.currency)));
            }
            lines.push(format!("Status: {}", na(&res.status)));
            lines.push(format!("Payment: {}", na(&res.payment_type)));
            lines.push(format!("Created: {}", na(&res.created_at)));

            if !res.ways.is_empty() {
                lines.push("Transfers:".to_string());
            }
            for (j, way) in res.ways.iter().enumerate() {
                let label = if j == 0 { "Outbound" } else { "Return" };
                lines.push(format!(
                    "- {label}: {} -> {}",
                    na(&way.pickup_address),
                    na(&way.dropoff_address)
                ));
                lines.push(format!(
                    "  Date: {}, pickup time: {}",
                    na(&way.flight_date),
                    na(&way.pickup_time)
                ));
                if let Some(vehicle) = &way.vehicle {
                    lines.push(format!("  Vehicle: {vehicle}"));
                }
                if let Some(flight) = &way.flight_number {
                    lines.push(format!("  Flight: {flight}, terminal: {}", na(&way.terminal)));
                }
            }

            if !res.passengers.is_empty() {
                lines.push("Passenger list:".to_string());
                for p in &res.passengers {
                    match &p.country {
                        Some(c) => lines.push(format!("- {} ({c})", p.name)),
                        None => lines.push(format!("- {}", p.name)),
                    }
                }
            }
        }
        lines.join("\n")
    }
}

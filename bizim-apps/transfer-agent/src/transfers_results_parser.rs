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

//! # Transfers Results Parser
//!
//! Side-effect free decoding of a `POST /query` reply into priced transfer
//! options grouped by leg.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;
use crate::transfers_query_builder::Currency;
use crate::upstream_reply::{
    UpstreamReply, de_f64, de_i64, de_opt_f64, de_opt_string, de_opt_u32, de_string,
};

#[derive(Deserialize)]
struct RawExtra {
    #[serde(rename = "UrunTanimi", default, deserialize_with = "de_opt_string")]
    name: Option<String>,
    #[serde(rename = "BirimFiyat", default, deserialize_with = "de_opt_f64")]
    unit_price: Option<f64>,
}

#[derive(Deserialize)]
struct RawOption {
    #[serde(deserialize_with = "de_string")]
    carname: String,
    #[serde(default, deserialize_with = "de_opt_string")]
    extramessage: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pickup: Option<String>,
    #[serde(default, deserialize_with = "de_opt_u32")]
    duration: Option<u32>,
    #[serde(deserialize_with = "de_f64")]
    price: f64,
    #[serde(default, deserialize_with = "de_opt_u32")]
    kisihakki: Option<u32>,
    #[serde(default, deserialize_with = "de_opt_u32")]
    bavulhakki: Option<u32>,
    #[serde(default)]
    extraurunler: Option<Vec<RawExtra>>,
    #[serde(default, deserialize_with = "de_opt_string")]
    routeid: Option<String>,
    #[serde(deserialize_with = "de_i64")]
    subrouteid: i64,
}

#[derive(Deserialize)]
struct RawWay {
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    from: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    to: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    date: Option<String>,
    #[serde(default)]
    list: Option<Vec<RawOption>>,
}

#[derive(Deserialize)]
struct RawTransferReply {
    #[serde(deserialize_with = "de_string")]
    uuid: String,
    #[serde(default, deserialize_with = "de_opt_string")]
    pickup: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    dropoff: Option<String>,
    #[serde(default, deserialize_with = "de_opt_u32")]
    adult: Option<u32>,
    #[serde(default, deserialize_with = "de_opt_u32")]
    child: Option<u32>,
    #[serde(default, deserialize_with = "de_opt_u32")]
    infant: Option<u32>,
    #[serde(default, deserialize_with = "de_opt_string")]
    currencysembol: Option<String>,
    #[serde(default)]
    ways: Option<Vec<RawWay>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Outbound,
    Return,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TransferExtra {
    pub name: String,
    pub unit_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TransferOption {
    pub vehicle: String,
    pub description: Option<String>,
    pub pickup_time: Option<String>,
    pub duration_minutes: Option<u32>,
    pub price: f64,
    pub currency: String,
    pub max_passengers: Option<u32>,
    pub max_luggage: Option<u32>,
    #[serde(default)]
    pub extras: Vec<TransferExtra>,
    pub route_id: Option<String>,
    /// Pass as `outbound_subroute_id` / `return_subroute_id` when booking.
    pub subroute_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TransferLeg {
    pub direction: Direction,
    pub from: Option<String>,
    pub to: Option<String>,
    pub date: Option<String>,
    pub options: Vec<TransferOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TransferSearchResult {
    /// Booking reference, required by `make_reservation`.
    pub uuid: String,
    pub pickup: Option<String>,
    pub dropoff: Option<String>,
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
    pub currency: String,
    pub currency_symbol: Option<String>,
    pub legs: Vec<TransferLeg>,
}

impl TransferSearchResult {
    /// Decode a `/query` reply priced in `currency`, the currency that was
    /// requested.
    pub fn from_json(value: Value, currency: Currency) -> Result<Self, ClientError> {
        let raw = UpstreamReply::<RawTransferReply>::tagged(value)?.into_result()?;
        let code = currency.code().to_string();

        let legs = raw
            .ways
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, way)| {
                let direction = match way.kind.as_deref() {
                    Some(kind) if kind.starts_with("yon1") => Direction::Outbound,
                    Some(_) => Direction::Return,
                    None if i == 0 => Direction::Outbound,
                    None => Direction::Return,
                };
                let options = way
                    .list
                    .unwrap_or_default()
                    .into_iter()
                    .map(|o| TransferOption {
                        vehicle: o.carname,
                        description: o.extramessage,
                        pickup_time: o.pickup,
                        duration_minutes: o.duration,
                        price: o.price,
                        currency: code.clone(),
                        max_passengers: o.kisihakki,
                        max_luggage: o.bavulhakki,
                        extras: o
                            .extraurunler
                            .unwrap_or_default()
                            .into_iter()
                            .filter_map(|e| {
                                e.name.map(|name| TransferExtra {
                                    name,
                                    unit_price: e.unit_price,
                                })
                            })
                            .collect(),
                        route_id: o.routeid,
                        subroute_id: o.subrouteid,
                    })
                    .collect();
                TransferLeg {
                    direction,
                    from: way.from,
                    to: way.to,
                    date: way.date,
                    options,
                }
            })
            .collect();

        Ok(Self {
            uuid: raw.uuid,
            pickup: raw.pickup,
            dropoff: raw.dropoff,
            adults: raw.adult.unwrap_or(0),
            children: raw.child.unwrap_or(0),
            infants: raw.infant.unwrap_or(0),
            currency: code,
            currency_symbol: raw.currencysembol,
            legs,
        })
    }

    /// Every option across all legs.
    pub fn options(&self) -> impl Iterator<Item = &TransferOption> {
        self.legs.iter().flat_map(|leg| leg.options.iter())
    }

    pub fn cheapest(&self, direction: Direction) -> Option<&TransferOption> {
        self.legs
            .iter()
            .filter(|leg| leg.direction == direction)
            .flat_map(|leg| leg.options.iter())
            .min_by(|a, b| a.price.total_cmp(&b.price))
    }

    pub fn summary(&self) -> String {
        let unit = self.currency_symbol.as_deref().unwrap_or(&self.currency);
        let mut lines = vec![
            format!(
                "Transfer options from {} to {}",
                self.pickup.as_deref().unwrap_or("?"),
                self.dropoff.as_deref().unwrap_or("?")
            ),
            format!(
                "Passengers: {} adults, {} children, {} infants",
                self.adults, self.children, self.infants
            ),
            String::new(),
            format!("Booking reference (UUID): {}", self.uuid),
        ];

        if self.options().next().is_none() {
            lines.push(String::new());
            lines.push("No transfers available for this route and date.".to_string());
            return lines.join("\n");
        }

        for leg in &self.legs {
            let heading = match leg.direction {
                Direction::Outbound => "Outbound",
                Direction::Return => "Return",
            };
            lines.push(String::new());
            lines.push(format!("## {heading} journey"));
            lines.push(format!(
                "{} -> {} on {}",
                leg.from.as_deref().unwrap_or("?"),
                leg.to.as_deref().unwrap_or("?"),
                leg.date.as_deref().unwrap_or("?")
            ));
            for (i, option) in leg.options.iter().enumerate() {
                lines.push(String::new());
                lines.push(format!(
                    "### Option {}: {} - {} {}",
                    i + 1,
                    option.vehicle,
                    option.price,
                    unit
                ));
                if let Some(desc) = &option.description {
                    lines.push(format!("Type: {desc}"));
                }
                if let Some(time) = &option.pickup_time {
                    lines.push(format!("Pickup time: {time}"));
                }
                if let Some(minutes) = option.duration_minutes {
                    lines.push(format!("Duration: {minutes} minutes"));
                }
                if let (Some(pax), Some(bags)) = (option.max_passengers, option.max_luggage) {
                    lines.push(format!("Capacity: {pax} passengers, {bags} luggage items"));
                }
                for extra in &option.extras {
                    match extra.unit_price {
                        Some(p) => lines.push(format!("Extra: {} ({p} {unit})", extra.name)),
                        None => lines.push(format!("Extra: {}", extra.name)),
                    }
                }
                lines.push(format!("Subroute ID: {} (needed for booking)", option.subroute_id));
            }
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reply() -> Value {
        json!({
            "status": "success",
            "uuid": "b7d0c1f4-3e1a-4c55-9d62-8f2a0e6b1c7d",
            "pickup": "Istanbul Airport",
            "dropoff": "Taksim Square",
            "adult": "2",
            "child": 0,
            "infant": 0,
            "currencysembol": "€",
            "ways": [
                {
                    "type": "yon1",
                    "from": "Istanbul Airport",
                    "to": "Taksim Square",
                    "date": "2023-06-15",
                    "list": [
                        {
                            "carname": "Mercedes Vito",
                            "extramessage": "Private",
                            "pickup": "14:00",
                            "duration": "55",
                            "price": "45.00",
                            "kisihakki": 6,
                            "bavulhakki": 6,
                            "extraurunler": [{"UrunTanimi": "Baby seat", "BirimFiyat": 5}],
                            "routeid": 311,
                            "subrouteid": "1201"
                        },
                        {
                            "carname": "Mercedes Sprinter",
                            "price": 70,
                            "subrouteid": 1202
                        }
                    ]
                },
                {
                    "type": "yon2",
                    "list": [{"carname": "Mercedes Vito", "price": 45, "subrouteid": 1301}]
                }
            ]
        })
    }

    #[test]
    fn options_are_grouped_by_leg() {
        let result = TransferSearchResult::from_json(reply(), Currency::Eur).unwrap();
        assert_eq!(result.adults, 2);
        assert_eq!(result.legs.len(), 2);
        assert_eq!(result.legs[1].direction, Direction::Return);
        assert_eq!(result.options().count(), 3);

        let vito = &result.legs[0].options[0];
        assert_eq!(vito.price, 45.0);
        assert_eq!(vito.currency, "EUR");
        assert_eq!(vito.subroute_id, 1201);
        assert_eq!(vito.route_id.as_deref(), Some("311"));
        assert_eq!(vito.extras[0].name, "Baby seat");
    }

    #[test]
    fn cheapest_outbound() {
        let result = TransferSearchResult::from_json(reply(), Currency::Eur).unwrap();
        assert_eq!(result.cheapest(Direction::Outbound).unwrap().subroute_id, 1201);
    }

    #[test]
    fn option_without_price_is_rejected() {
        let mut value = reply();
        value["ways"][0]["list"][1]
            .as_object_mut()
            .unwrap()
            .remove("price");
        let err = TransferSearchResult::from_json(value, Currency::Eur).unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn summary_mentions_uuid_and_subroutes() {
        let text = TransferSearchResult::from_json(reply(), Currency::Eur)
            .unwrap()
            .summary();
        assert!(text.contains("b7d0c1f4-3e1a-4c55-9d62-8f2a0e6b1c7d"));
        assert!(text.contains("Subroute ID: 1201 (needed for booking)"));
        assert!(text.contains("## Return journey"));
    }
}

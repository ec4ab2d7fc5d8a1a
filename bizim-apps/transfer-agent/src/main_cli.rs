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


//! CLI for the Bizim Transfer booking API.
//!
//! # Examples
//!
//! ```bash
//! bizim-transfer places "Istanbul Airport"
//! bizim-transfer place ChIJ_xxxx --language tr
//! bizim-transfer transfers --pickup "Istanbul Airport" --pickup-lat 41.2753 --pickup-lng 28.7519 \
//!     --dropoff "Taksim Square" --dropoff-lat 41.0370 --dropoff-lng 28.9850 \
//!     --date 2026-12-01 --time 14:00 --adults 2
//! bizim-transfer reservations --query-type createdate --start 2026-01-01 --end 2026-01-31 --json
//! ```

use anyhow::{Context, Result};
use bizim_transfer_agent::config::UpstreamArgs;
use bizim_transfer_agent::{
    BizimTransferClient, Currency, Direction, PassengerInput, PlaceDetailsParams,
    PlaceSearchParams, ReservationListParams, ReservationParams, TransferSearchParams,
    TransferSearchResult, TripType,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::cmp::max;

#[derive(Parser, Debug)]
#[command(name = "bizim-transfer")]
#[command(author, version, about = "Search places and transfers, manage reservations on Bizim Transfer")]
struct CliArgs {
    #[command(flatten)]
    upstream: UpstreamArgs,

    /// Print the structured result as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (debug logs on stderr)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search hotels, airports and addresses
    Places {
        query: String,
        #[arg(short, long, default_value = "en")]
        language: String,
    },

    /// Show address and coordinates of a place
    Place {
        place_id: String,
        #[arg(short, long, default_value = "en")]
        language: String,
    },

    /// Search transfer options between two points
    Transfers {
        #[arg(long)]
        pickup: String,
        #[arg(long, allow_negative_numbers = true)]
        pickup_lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        pickup_lng: f64,
        #[arg(long)]
        dropoff: String,
        #[arg(long, allow_negative_numbers = true)]
        dropoff_lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        dropoff_lng: f64,
        /// Pickup date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
        /// Pickup time (HH:MM)
        #[arg(short, long)]
        time: String,
        /// Return date, makes the search a round trip (YYYY-MM-DD)
        #[arg(short = 'R', long, requires = "return_time")]
        return_date: Option<String>,
        /// Return time (HH:MM)
        #[arg(long, requires = "return_date")]
        return_time: Option<String>,
        #[arg(short, long, default_value = "1")]
        adults: i64,
        #[arg(short, long, default_value = "0")]
        children: i64,
        #[arg(short, long, default_value = "0")]
        infants: i64,
        /// TRY, EUR, USD, GBP or RUB
        #[arg(short = 'C', long, default_value = "EUR")]
        currency: String,
        #[arg(short, long, default_value = "en")]
        language: String,
    },

    /// Book options from a transfer search
    Reserve {
        /// Booking reference from `transfers`
        #[arg(long)]
        uuid: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        /// 2-letter ISO country code
        #[arg(long)]
        country: String,
        #[arg(long)]
        subroute: i64,
        #[arg(long, default_value = "")]
        flight: String,
        #[arg(long, default_value = "")]
        terminal: String,
        #[arg(long, default_value = "")]
        notes: String,
        #[arg(long)]
        return_subroute: Option<i64>,
        #[arg(long, default_value = "")]
        return_flight: String,
        /// Passenger as "Full Name:cc", repeatable
        #[arg(short, long = "passenger")]
        passengers: Vec<String>,
    },

    /// List reservations by creation date, flight date or number
    Reservations {
        #[arg(short, long, default_value = "createdate")]
        query_type: String,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(short, long)]
        number: Option<i64>,
    },
}

/// Get terminal width for responsive tables
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(100)
}

fn parse_passenger(s: &str) -> Result<PassengerInput> {
    let (name, country) = s
        .rsplit_once(':')
        .ok_or_else(|| anyhow::anyhow!("Invalid passenger '{}', expected \"Full Name:cc\"", s))?;
    Ok(PassengerInput {
        name: name.trim().to_string(),
        country: country.trim().to_string(),
    })
}

fn fmt_duration(minutes: Option<u32>) -> String {
    match minutes {
        Some(m) if m >= 60 => format!("{}h{:02}", m / 60, m % 60),
        Some(m) => format!("{}min", m),
        None => "??".to_string(),
    }
}

fn print_transfers_table(result: &TransferSearchResult) {
    let width = get_terminal_width();
    let unit = result
        .currency_symbol
        .as_deref()
        .unwrap_or(&result.currency);
    let vehicle_col = result
        .options()
        .fold(7, |acc, o| max(acc, o.vehicle.chars().count()))
        .min(width.saturating_sub(40).max(10));

    println!(
        "Booking reference: {}  ({} adults, {} children, {} infants)",
        result.uuid, result.adults, result.children, result.infants
    );
    for leg in &result.legs {
        let heading = match leg.direction {
            Direction::Outbound => "Outbound",
            Direction::Return => "Return",
        };
        println!();
        println!(
            "{}: {} -> {} on {}",
            heading,
            leg.from.as_deref().unwrap_or("?"),
            leg.to.as_deref().unwrap_or("?"),
            leg.date.as_deref().unwrap_or("?")
        );
        println!("{}", "-".repeat(width.min(100)));
        if leg.options.is_empty() {
            println!("  no options");
            continue;
        }
        for option in &leg.options {
            let vehicle: String = option.vehicle.chars().take(vehicle_col).collect();
            let pax = option
                .max_passengers
                .map_or("?".to_string(), |p| p.to_string());
            println!(
                "  {:<vw$}  {:>9.2} {:<3}  {:>6}  {:>3} pax  subroute {}",
                vehicle,
                option.price,
                unit,
                fmt_duration(option.duration_minutes),
                pax,
                option.subroute_id,
                vw = vehicle_col
            );
        }
    }
    for (label, direction) in [("outbound", Direction::Outbound), ("return", Direction::Return)] {
        if let Some(best) = result.cheapest(direction) {
            println!(
                "\nCheapest {}: {} at {:.2} {}",
                label, best.vehicle, best.price, unit
            );
        }
    }
}

fn print_result<T: Serialize>(json: bool, result: &T, summary: impl FnOnce(&T) -> String) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(result).context("Failed to encode result")?;
        println!("{}", out);
    } else {
        println!("{}", summary(result));
    }
    Ok(())
}

async fn run(client: &BizimTransferClient, command: Command, json: bool) -> Result<()> {
    match command {
        Command::Places { query, language } => {
            let result = client
                .search_places(&PlaceSearchParams::new(query, language))
                .await?;
            print_result(json, &result, |r| r.summary())
        }
        Command::Place { place_id, language } => {
            let result = client
                .get_place_details(&PlaceDetailsParams::new(place_id, language))
                .await?;
            print_result(json, &result, |r| r.summary())
        }
        Command::Transfers {
            pickup,
            pickup_lat,
            pickup_lng,
            dropoff,
            dropoff_lat,
            dropoff_lng,
            date,
            time,
            return_date,
            return_time,
            adults,
            children,
            infants,
            currency,
            language,
        } => {
            let currency = Currency::from_code(&currency).ok_or_else(|| {
                anyhow::anyhow!("Unknown currency '{}', expected TRY, EUR, USD, GBP or RUB", currency)
            })?;
            let trip = if return_date.is_some() {
                TripType::RoundTrip
            } else {
                TripType::OneWay
            };
            let params = TransferSearchParams {
                pickup,
                pickuplat: pickup_lat,
                pickuplng: pickup_lng,
                dropoff,
                dropofflat: dropoff_lat,
                dropofflng: dropoff_lng,
                adult: adults,
                child: children,
                infant: infants,
                pickupdate: date,
                pickuptime: time,
                dropoffdate: return_date.unwrap_or_default(),
                dropofftime: return_time.unwrap_or_default(),
                requesttype: trip as i64,
                currencyid: currency.id().into(),
                language,
            };
            let result = client.search_transfers(&params).await?;
            if json {
                print_result(true, &result, |r| r.summary())
            } else {
                print_transfers_table(&result);
                Ok(())
            }
        }
        Command::Reserve {
            uuid,
            first_name,
            last_name,
            email,
            phone,
            country,
            subroute,
            flight,
            terminal,
            notes,
            return_subroute,
            return_flight,
            passengers,
        } => {
            let passengers = passengers
                .iter()
                .map(|p| parse_passenger(p))
                .collect::<Result<Vec<_>>>()?;
            let params = ReservationParams {
                uuid,
                first_name,
                last_name,
                email,
                phone,
                country_code: country,
                outbound_subroute_id: subroute,
                flight_number: flight,
                terminal,
                notes,
                return_subroute_id: return_subroute,
                return_flight_number: return_flight,
                return_terminal: String::new(),
                return_notes: String::new(),
                passengers,
            };
            let result = client.make_reservation(&params).await?;
            print_result(json, &result, |r| r.summary())
        }
        Command::Reservations {
            query_type,
            start,
            end,
            number,
        } => {
            let params = ReservationListParams {
                query_type,
                start_date: start,
                end_date: end,
                reservation_number: number,
            };
            let result = client.list_reservations(&params).await?;
            print_result(json, &result, |r| r.summary())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_timer(tracing_subscriber::fmt::time::ChronoUtc::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let config = args
        .upstream
        .into_config()
        .context("Invalid upstream configuration")?;
    let client = BizimTransferClient::new(config)?;

    if let Err(e) = run(&client, args.command, args.json).await {
        eprintln!("Request failed: {:#}", e);
        std::process::exit(1);
    }
    Ok(())
}

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


// Library for bizim-transfer-agent
// Client and MCP server for the Bizim Transfer booking API (places, transfers, reservations)

mod bizim_client;
pub mod config;
mod error;
mod places_query_builder;
mod places_results_parser;
mod reservations_query_builder;
mod reservations_results_parser;
mod transfers_query_builder;
mod transfers_results_parser;
mod upstream_reply;

#[cfg(feature = "mcp")]
pub mod mcp_server;

pub use bizim_client::BizimTransferClient;
pub use config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, UpstreamAuth, UpstreamConfig};
pub use error::{ClientError, TransportError, ValidationError};

pub use places_query_builder::{Language, PlaceDetailsParams, PlaceSearchParams};
pub use places_results_parser::{Coordinates, Place, PlaceDetails, PlaceKind, PlaceSearchResult};

pub use transfers_query_builder::{Currency, TransferSearchParams, TripType};
pub use transfers_results_parser::{
    Direction, TransferExtra, TransferLeg, TransferOption, TransferSearchResult,
};

pub use reservations_query_builder::{
    ListQueryType, PassengerInput, ReservationListParams, ReservationParams,
};
pub use reservations_results_parser::{
    Reservation, ReservationConfirmation, ReservationList, ReservedPassenger, ReservedTransfer,
};

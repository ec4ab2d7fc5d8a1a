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

//! # MCP Tool Surface
//!
//! Registers the five client operations as MCP tools. Arguments are the
//! client's own param types; results come back as a readable summary plus
//! the structured JSON, and client failures become failed tool calls that
//! carry the client's message unchanged.

use rmcp::handler::server::{ServerHandler, tool::ToolRouter, wrapper::Parameters};
use rmcp::model::{CallToolResult, Content};
use rmcp::{ErrorData, tool, tool_router};
use serde::Serialize;
use std::sync::Arc;

use crate::bizim_client::BizimTransferClient;
use crate::error::ClientError;
use crate::places_query_builder::{PlaceDetailsParams, PlaceSearchParams};
use crate::places_results_parser::{PlaceDetails, PlaceSearchResult};
use crate::reservations_query_builder::{ReservationListParams, ReservationParams};
use crate::reservations_results_parser::{ReservationConfirmation, ReservationList};
use crate::transfers_query_builder::TransferSearchParams;
use crate::transfers_results_parser::TransferSearchResult;

pub const TOOL_NAMES: [&str; 5] = [
    "search_places",
    "get_place_details",
    "search_transfers",
    "make_reservation",
    "list_reservations",
];

#[derive(Serialize)]
struct ToolData<'a, T: Serialize> {
    status: &'static str,
    #[serde(flatten)]
    data: &'a T,
}

fn respond<T: Serialize>(
    result: Result<T, ClientError>,
    summary: impl FnOnce(&T) -> String,
) -> Result<CallToolResult, ErrorData> {
    match result {
        Ok(data) => {
            let structured = serde_json::to_value(ToolData {
                status: "success",
                data: &data,
            })
            .map_err(|e| ErrorData::internal_error(e.to_string(), None))?;
            Ok(CallToolResult::success(vec![
                Content::text(summary(&data)),
                Content::json(structured)?,
            ]))
        }
        Err(e) => Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
    }
}

#[derive(Clone)]
pub struct TransferAgentServer {
    client: Arc<BizimTransferClient>,
    tool_router: ToolRouter<Self>,
}

impl TransferAgentServer {
    pub fn new(client: Arc<BizimTransferClient>) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    /// Registered tools with their generated input schemas.
    pub fn tools(&self) -> Vec<rmcp::model::Tool> {
        self.tool_router.list_all()
    }
}

#[tool_router]
impl TransferAgentServer {
    #[tool(
        name = "search_places",
        description = "Search locations (hotels, airports, addresses) by free text. Parameters: query, language (en/tr/de/ru, default en). Returns place IDs for get_place_details."
    )]
    pub async fn search_places(
        &self,
        params: Parameters<PlaceSearchParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self.client.search_places(&params.0).await;
        respond(result, PlaceSearchResult::summary)
    }

    #[tool(
        name = "get_place_details",
        description = "Get name, address, coordinates and type of a place. Parameters: place_id (from search_places), language (en/tr/de/ru)."
    )]
    pub async fn get_place_details(
        &self,
        params: Parameters<PlaceDetailsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self.client.get_place_details(&params.0).await;
        respond(result, PlaceDetails::summary)
    }

    #[tool(
        name = "search_transfers",
        description = "Search priced transfers between two points. Parameters: pickup, pickuplat, pickuplng, dropoff, dropofflat, dropofflng, adult (1+), child, infant, pickupdate (YYYY-MM-DD), pickuptime (HH:MM), requesttype (1 one-way, 2 round-trip), dropoffdate/dropofftime (round trips), currencyid (1 TRY, 2 EUR, 3 USD, 4 GBP, 6 RUB), language (en/tr/de/ru)."
    )]
    pub async fn search_transfers(
        &self,
        params: Parameters<TransferSearchParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self.client.search_transfers(&params.0).await;
        respond(result, TransferSearchResult::summary)
    }

    #[tool(
        name = "make_reservation",
        description = "Book transfer options from a search. Parameters: uuid (booking reference from search_transfers), first_name, last_name, email, phone, country_code (2-letter ISO), outbound_subroute_id, optional flight_number/terminal/notes, return_subroute_id and return_* for round trips, passengers [{name, country}]."
    )]
    pub async fn make_reservation(
        &self,
        params: Parameters<ReservationParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self.client.make_reservation(&params.0).await;
        respond(result, ReservationConfirmation::summary)
    }

    #[tool(
        name = "list_reservations",
        description = "List reservations. Parameters: query_type (createdate/flightdate/reservationnumber), start_date and end_date (YYYY-MM-DD) for date queries, reservation_number for direct lookups."
    )]
    pub async fn list_reservations(
        &self,
        params: Parameters<ReservationListParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self.client.list_reservations(&params.0).await;
        respond(result, ReservationList::summary)
    }
}

impl ServerHandler for TransferAgentServer {
    fn list_tools(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl Future<Output = Result<rmcp::model::ListToolsResult, rmcp::ErrorData>> + Send + '_
    {
        Box::pin(async move {
            let tools = self.tool_router.list_all();
            tracing::debug!("Returning {} tools", tools.len());
            Ok(rmcp::model::ListToolsResult::with_all_items(tools))
        })
    }

    fn call_tool(
        &self,
        request: rmcp::model::CallToolRequestParam,
        context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl Future<Output = Result<rmcp::model::CallToolResult, rmcp::ErrorData>> + Send + '_
    {
        tracing::debug!("call_tool: {}", request.name);
        let router = self.tool_router.clone();
        let self_clone = self.clone();
        Box::pin(async move {
            let context =
                rmcp::handler::server::tool::ToolCallContext::new(&self_clone, request, context);
            router.call(context).await
        })
    }

    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            protocol_version: rmcp::model::ProtocolVersion::V_2025_03_26,
            capabilities: rmcp::model::ServerCapabilities {
                tools: Some(rmcp::model::ToolsCapability::default()),
                ..Default::default()
            },
            server_info: rmcp::model::Implementation::from_build_env(),
            instructions: Some(
                "Airport and city transfers. Typical flow: search_places -> get_place_details \
                 for coordinates -> search_transfers -> make_reservation with the uuid and \
                 subroute IDs. list_reservations looks bookings up afterwards."
                    .to_string(),
            ),
        }
    }
}

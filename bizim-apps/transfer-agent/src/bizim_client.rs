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

//! # Bizim Transfer API Client
//!
//! Effectful (network) operations against the Bizim Transfer REST API.
//! Every call validates its params first and then performs exactly one HTTP
//! round trip over the shared connection pool.

use crate::config::UpstreamConfig;
use crate::error::{ClientError, TransportError, preview};
use crate::places_query_builder::{PlaceDetailsParams, PlaceSearchParams};
use crate::places_results_parser::{PlaceDetails, PlaceSearchResult};
use crate::reservations_query_builder::{ReservationListParams, ReservationParams};
use crate::reservations_results_parser::{ReservationConfirmation, ReservationList};
use crate::transfers_query_builder::TransferSearchParams;
use crate::transfers_results_parser::TransferSearchResult;
use crate::upstream_reply::failure_message;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use wreq::redirect::Policy;

#[derive(Clone)]
pub struct BizimTransferClient {
    client: Arc<wreq::Client>,
    config: Arc<UpstreamConfig>,
}

impl BizimTransferClient {
    pub fn new(config: UpstreamConfig) -> Result<Self> {
        let client = wreq::Client::builder()
            .redirect(Policy::default())
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        tracing::debug!(
            "Upstream client ready: {} (auth: {})",
            config.base_url,
            config.auth.scheme_name()
        );
        Ok(Self {
            client: Arc::new(client),
            config: Arc::new(config),
        })
    }
}

impl BizimTransferClient {
    fn url(&self, path: &str, query: &[(&'static str, String)]) -> String {
        let mut pairs: Vec<(&str, &str)> = query.iter().map(|(k, v)| (*k, v.as_str())).collect();
        if let Some(auth_pair) = self.config.auth.query_param() {
            pairs.push(auth_pair);
        }

        let mut url = self.config.endpoint(path);
        if !pairs.is_empty() {
            let encoded = pairs
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&encoded);
        }
        url
    }

    fn with_auth(&self, request: wreq::RequestBuilder) -> wreq::RequestBuilder {
        match self.config.auth.header() {
            Some((name, value)) => request.header(name, value),
            None => request,
        }
    }

    async fn get_json(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<Value, ClientError> {
        let url = self.url(path, query);
        tracing::info!("GET /{}", path);
        let request = self.with_auth(self.client.get(&url));
        self.send(request).await
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, ClientError> {
        let url = self.url(path, &[]);
        tracing::info!("POST /{}", path);
        let request = self.with_auth(self.client.post(&url)).json(body);
        self.send(request).await
    }

    async fn send(&self, request: wreq::RequestBuilder) -> Result<Value, ClientError> {
        let started = Instant::now();
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(
            "HTTP {} {} in {:?}, {} bytes",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown"),
            started.elapsed(),
            body.len()
        );

        let parsed = serde_json::from_str::<Value>(&body);

        if !status.is_success() {
            let message = parsed.as_ref().ok().and_then(failure_message);
            return Err(match message {
                Some(message) => ClientError::Upstream {
                    status: Some(status.as_u16()),
                    message,
                },
                None => TransportError::Status {
                    status: status.as_u16(),
                    body_preview: preview(&body, 500),
                }
                .into(),
            });
        }

        parsed.map_err(|source| {
            TransportError::Decode {
                source,
                body_preview: preview(&body, 300),
            }
            .into()
        })
    }
}

fn log_failure<T>(operation: &str, result: Result<T, ClientError>) -> Result<T, ClientError> {
    result.inspect_err(|e| match e {
        ClientError::Validation(v) => tracing::debug!("{operation} rejected locally: {v}"),
        ClientError::Upstream { status, message } => {
            tracing::warn!("{operation} refused by upstream (HTTP {status:?}): {message}")
        }
        ClientError::Transport(t) => tracing::warn!("{operation} failed: {t}"),
    })
}

impl BizimTransferClient {
    /// `GET /places`: free-text place search.
    pub async fn search_places(
        &self,
        params: &PlaceSearchParams,
    ) -> Result<PlaceSearchResult, ClientError> {
        let result = async {
            let query = params.query_pairs()?;
            tracing::info!("Searching places for '{}'", params.query.trim());
            let value = self.get_json("places", &query).await?;
            PlaceSearchResult::from_json(value)
        }
        .await;
        log_failure("search_places", result)
    }

    /// `GET /places/detail`. Unknown ids are reported by the upstream.
    pub async fn get_place_details(
        &self,
        params: &PlaceDetailsParams,
    ) -> Result<PlaceDetails, ClientError> {
        let result = async {
            let query = params.query_pairs()?;
            tracing::info!("Getting details for place ID {}", params.place_id.trim());
            let value = self.get_json("places/detail", &query).await?;
            PlaceDetails::from_json(value, params.place_id.trim())
        }
        .await;
        log_failure("get_place_details", result)
    }

    /// `POST /query`: priced transfer options between two points.
    pub async fn search_transfers(
        &self,
        params: &TransferSearchParams,
    ) -> Result<TransferSearchResult, ClientError> {
        let result = async {
            let payload = params.build_payload()?;
            tracing::info!(
                "Searching transfers from {} to {}",
                params.pickup.trim(),
                params.dropoff.trim()
            );
            let value = self.post_json("query", &payload).await?;
            let result = TransferSearchResult::from_json(value, payload.currency())?;
            tracing::debug!("Got {} transfer option(s)", result.options().count());
            Ok::<_, ClientError>(result)
        }
        .await;
        log_failure("search_transfers", result)
    }

    /// `POST /reservation`: book the options chosen from a search.
    pub async fn make_reservation(
        &self,
        params: &ReservationParams,
    ) -> Result<ReservationConfirmation, ClientError> {
        let result = async {
            let payload = params.build_payload()?;
            tracing::info!(
                "Making reservation for {} {}",
                params.first_name.trim(),
                params.last_name.trim()
            );
            let value = self.post_json("reservation", &payload).await?;
            ReservationConfirmation::from_json(value)
        }
        .await;
        log_failure("make_reservation", result)
    }

    /// `POST /list`: reservations by creation date, flight date or number.
    pub async fn list_reservations(
        &self,
        params: &ReservationListParams,
    ) -> Result<ReservationList, ClientError> {
        let result = async {
            let payload = params.build_payload()?;
            tracing::info!("Listing reservations with {}", params.query_type.trim());
            let value = self.post_json("list", &payload).await?;
            ReservationList::from_json(value)
        }
        .await;
        log_failure("list_reservations", result)
    }
}

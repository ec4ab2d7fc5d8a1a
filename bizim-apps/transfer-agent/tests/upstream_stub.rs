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


//! In-process stand-in for the Bizim Transfer API, shared by the test files.
//!
//! Every request is recorded (path, auth header, query string, JSON body) so
//! tests can assert how many upstream calls were made and what was sent.

#![allow(dead_code)]

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Json;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Place ids with canned failures on `/places/detail`.
pub const BROKEN_STRUCTURED: &str = "broken-structured";
pub const BROKEN_PLAIN: &str = "broken-plain";
pub const BROKEN_BARE: &str = "broken-bare";
pub const STRUCTURED_FAILURE_MESSAGE: &str = "Place lookup failed: upstream geocoder unavailable";
pub const UNKNOWN_PLACE: &str = "ChIJ-does-not-exist";
pub const INVALID_PLACE: &str = "not a place id";
pub const INVALID_PLACE_MESSAGE: &str = "Invalid 'placeid' parameter.";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub api_key: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
pub struct StubState {
    hits: AtomicUsize,
    requests: Mutex<Vec<Recorded>>,
}

impl StubState {
    fn record(&self, uri: &Uri, headers: &HeaderMap, body: Option<Value>) {
        self.hits.fetch_add(1, Ordering::SeqCst);
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        self.requests.lock().unwrap().push(Recorded {
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            authorization: header("authorization"),
            api_key: header("x-api-key"),
            body,
        });
    }
}

pub struct StubUpstream {
    pub base_url: String,
    state: Arc<StubState>,
}

impl StubUpstream {
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn hits_on(&self, path: &str) -> usize {
        self.requests().iter().filter(|r| r.path == path).count()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> Recorded {
        self.requests()
            .pop()
            .expect("stub upstream received no request")
    }
}

pub async fn spawn() -> StubUpstream {
    let state = Arc::new(StubState::default());
    let app = Router::new()
        .route("/places", get(places))
        .route("/places/detail", get(place_detail))
        .route("/query", post(transfer_query))
        .route("/reservation", post(reservation))
        .route("/list", post(list))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub upstream");
    let addr = listener.local_addr().expect("stub upstream address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub upstream stopped");
    });

    StubUpstream {
        base_url: format!("http://{addr}"),
        state,
    }
}

async fn places(
    State(state): State<Arc<StubState>>,
    uri: Uri,
    headers: HeaderMap,
) -> Json<Value> {
    state.record(&uri, &headers, None);
    Json(json!([
        {
            "place_id": "ChIJ-ist-airport",
            "description": "Istanbul Airport (IST), Arnavutkoy/Istanbul, Turkey",
            "types": ["airport", "point_of_interest"]
        },
        {
            "place_id": "ChIJ-taksim",
            "description": "Taksim Square, Beyoglu/Istanbul, Turkey",
            "types": ["route"]
        }
    ]))
}

async fn place_detail(
    State(state): State<Arc<StubState>>,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    state.record(&uri, &headers, None);
    let place_id = query.get("place_id").cloned().unwrap_or_default();
    match place_id.as_str() {
        BROKEN_STRUCTURED => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"status": "error", "description": STRUCTURED_FAILURE_MESSAGE})),
        )
            .into_response(),
        BROKEN_BARE => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"status": "error"})),
        )
            .into_response(),
        UNKNOWN_PLACE => Json(json!({"status": "ZERO_RESULTS"})).into_response(),
        INVALID_PLACE => Json(json!({
            "status": "INVALID_REQUEST",
            "error_message": INVALID_PLACE_MESSAGE
        }))
        .into_response(),
        BROKEN_PLAIN => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
        _ => Json(json!({
            "status": "OK",
            "result": {
                "place_id": place_id,
                "name": "Istanbul Airport",
                "formatted_address": "Tayakadin, Terminal Caddesi No:1, 34283 Arnavutkoy/Istanbul, Turkey",
                "geometry": {"location": {"lat": 41.2753, "lng": 28.7519}},
                "types": ["airport", "point_of_interest"]
            }
        }))
        .into_response(),
    }
}

async fn transfer_query(
    State(state): State<Arc<StubState>>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.record(&uri, &headers, Some(body.clone()));
    Json(json!({
        "status": "success",
        "uuid": "4f3b2c1d-9e8f-4a7b-8c6d-5e4f3a2b1c0d",
        "pickup": body["pickup"],
        "dropoff": body["dropoff"],
        "adult": body["adult"],
        "child": body["child"],
        "infant": body["infant"],
        "currencysembol": "€",
        "ways": [{
            "type": "yon1",
            "from": body["pickup"],
            "to": body["dropoff"],
            "date": body["pickupdate"],
            "list": [{
                "carname": "Mercedes Vito",
                "extramessage": "Private transfer",
                "pickup": body["pickuptime"],
                "duration": "55",
                "price": "45.00",
                "kisihakki": 6,
                "bavulhakki": 6,
                "routeid": 311,
                "subrouteid": 1201
            }]
        }]
    }))
}

async fn reservation(
    State(state): State<Arc<StubState>>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.record(&uri, &headers, Some(body));
    Json(json!({"status": "success", "rezid": 90211}))
}

async fn list(
    State(state): State<Arc<StubState>>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.record(&uri, &headers, Some(body));
    Json(json!({
        "status": "success",
        "list": [
            {
                "reservationnumber": 88231,
                "customername": "Ayse",
                "customersurname": "Yilmaz",
                "Amount": "45.00",
                "currency": "EUR",
                "status": "Confirmed"
            },
            {"reservationnumber": 88190, "customername": "John", "customersurname": "Doe"},
            {"reservationnumber": 88102, "customername": "Ivan", "customersurname": "Petrov"}
        ]
    }))
}

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


//! Input validation properties: bad input is rejected with the offending
//! field named, and nothing reaches the upstream.

mod upstream_stub;

use bizim_transfer_agent::{
    BizimTransferClient, Language, PlaceDetailsParams, PlaceSearchParams, ReservationListParams,
    TransferSearchParams, UpstreamAuth, UpstreamConfig,
};
use upstream_stub::StubUpstream;

fn client_for(stub: &StubUpstream) -> BizimTransferClient {
    BizimTransferClient::new(UpstreamConfig::new(stub.base_url.clone(), UpstreamAuth::default()))
        .expect("client")
}

fn one_way(lat: f64, lng: f64) -> TransferSearchParams {
    TransferSearchParams {
        pickup: "Antalya Airport".to_string(),
        pickuplat: lat,
        pickuplng: lng,
        dropoff: "Kemer".to_string(),
        dropofflat: 36.5978,
        dropofflng: 30.5602,
        adult: 1,
        child: 0,
        infant: 0,
        pickupdate: "2026-07-10".to_string(),
        pickuptime: "09:15".to_string(),
        dropoffdate: String::new(),
        dropofftime: String::new(),
        requesttype: 1,
        currencyid: 3,
        language: "ru".to_string(),
    }
}

#[tokio::test]
async fn every_supported_language_is_accepted() {
    let stub = upstream_stub::spawn().await;
    let client = client_for(&stub);

    for language in Language::ALL {
        let result = client
            .search_places(&PlaceSearchParams::new("Antalya", language.code()))
            .await;
        assert!(result.is_ok(), "{language}: {:?}", result.err());

        let upper = language.code().to_uppercase();
        assert!(
            PlaceSearchParams::new("Antalya", upper.as_str())
                .validate()
                .is_ok(),
            "{upper} should parse"
        );
    }
    assert_eq!(stub.hits(), Language::ALL.len());
    let sent: Vec<String> = stub
        .requests()
        .into_iter()
        .filter_map(|r| r.query)
        .collect();
    assert!(sent[1].ends_with("language=tr"), "{sent:?}");
}

#[tokio::test]
async fn unsupported_languages_are_rejected() {
    let stub = upstream_stub::spawn().await;
    let client = client_for(&stub);

    for code in ["fr", "", "english", "e n", "tr-TR"] {
        let err = client
            .search_places(&PlaceSearchParams::new("Antalya", code))
            .await
            .unwrap_err();
        assert_eq!(err.validation().map(|v| v.field()), Some("language"), "{code}");

        let err = client
            .get_place_details(&PlaceDetailsParams::new("ChIJ-antalya", code))
            .await
            .unwrap_err();
        assert!(err.is_validation(), "{code}");
    }
    assert_eq!(stub.hits(), 0);
}

#[tokio::test]
async fn out_of_range_coordinates_make_no_call() {
    let stub = upstream_stub::spawn().await;
    let client = client_for(&stub);

    let bad_latitudes = [90.0001, -90.5, 180.0, f64::NAN, f64::INFINITY];
    let bad_longitudes = [180.0001, -181.0, 360.0, f64::NAN, f64::NEG_INFINITY];

    for lat in bad_latitudes {
        let err = client
            .search_transfers(&one_way(lat, 30.8))
            .await
            .unwrap_err();
        assert_eq!(err.validation().map(|v| v.field()), Some("pickuplat"), "{lat}");
    }
    for lng in bad_longitudes {
        let err = client
            .search_transfers(&one_way(36.9, lng))
            .await
            .unwrap_err();
        assert_eq!(err.validation().map(|v| v.field()), Some("pickuplng"), "{lng}");
    }

    let mut params = one_way(36.9, 30.8);
    params.dropofflat = -91.0;
    let err = client.search_transfers(&params).await.unwrap_err();
    assert_eq!(err.validation().map(|v| v.field()), Some("dropofflat"));

    assert_eq!(stub.hits(), 0);
}

#[test]
fn coordinate_bounds_are_inclusive() {
    for (lat, lng) in [(90.0, 180.0), (-90.0, -180.0), (0.0, 0.0)] {
        assert!(one_way(lat, lng).validate().is_ok(), "({lat}, {lng})");
    }
}

#[tokio::test]
async fn adult_count_below_one_is_rejected() {
    let stub = upstream_stub::spawn().await;
    let client = client_for(&stub);

    for adult in [0, -1, i64::MIN] {
        let params = TransferSearchParams {
            adult,
            ..one_way(36.9, 30.8)
        };
        let err = client.search_transfers(&params).await.unwrap_err();
        assert_eq!(err.validation().map(|v| v.field()), Some("adult"), "{adult}");
    }

    let params = TransferSearchParams {
        child: -1,
        ..one_way(36.9, 30.8)
    };
    let err = client.search_transfers(&params).await.unwrap_err();
    assert_eq!(err.validation().map(|v| v.field()), Some("child"));

    assert_eq!(stub.hits(), 0);
}

#[test]
fn round_trip_needs_a_later_return() {
    let base = TransferSearchParams {
        requesttype: 2,
        ..one_way(36.9, 30.8)
    };

    let err = base.validate().unwrap_err();
    assert_eq!(err.field(), "dropoffdate");

    let before_pickup = TransferSearchParams {
        dropoffdate: "2026-07-09".to_string(),
        dropofftime: "10:00".to_string(),
        ..base.clone()
    };
    assert!(before_pickup.validate().is_err());

    let later = TransferSearchParams {
        dropoffdate: "2026-07-17".to_string(),
        dropofftime: "18:30".to_string(),
        ..base
    };
    assert!(later.validate().is_ok());
}

#[test]
fn unknown_currency_and_trip_type_are_rejected() {
    for currencyid in [0, 5, 7, -2] {
        let params = TransferSearchParams {
            currencyid,
            ..one_way(36.9, 30.8)
        };
        assert_eq!(params.validate().unwrap_err().field(), "currencyid");
    }
    let params = TransferSearchParams {
        requesttype: 3,
        ..one_way(36.9, 30.8)
    };
    assert_eq!(params.validate().unwrap_err().field(), "requesttype");
}

#[tokio::test]
async fn listing_criteria_are_checked_locally() {
    let stub = upstream_stub::spawn().await;
    let client = client_for(&stub);

    let reversed = ReservationListParams::by_flight_date("2026-02-10", "2026-02-01");
    let err = client.list_reservations(&reversed).await.unwrap_err();
    assert_eq!(err.validation().map(|v| v.field()), Some("end_date"));

    let unknown = ReservationListParams {
        query_type: "everything".to_string(),
        ..ReservationListParams::by_number(1)
    };
    let err = client.list_reservations(&unknown).await.unwrap_err();
    assert_eq!(err.validation().map(|v| v.field()), Some("query_type"));

    let zero = ReservationListParams::by_number(0);
    assert!(client.list_reservations(&zero).await.is_err());

    assert_eq!(stub.hits(), 0);
}

//! End-to-end session tests: real `HttpGateway` against wiremock providers,
//! in-memory persistence.

use std::sync::Arc;

use serde_json::json;
use wanderlist_core::{Coordinates, FlightQuote, PlaceRepository};
use wanderlist_enrich::{AddState, EnrichOutcome, InMemoryPlaceRepository, WishlistSession};
use wanderlist_gateway::{ClientCredentials, GatewaySettings, HttpGateway, HttpSettings};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway(server: &MockServer) -> Arc<HttpGateway> {
    let settings = GatewaySettings {
        amadeus_base_url: server.uri(),
        unsplash_base_url: server.uri(),
        geocode_base_url: server.uri(),
        geocode_language: "fr".to_string(),
        amadeus_credentials: Some(ClientCredentials {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
        }),
        unsplash_access_key: Some("key".to_string()),
        http: HttpSettings {
            timeout_secs: 5,
            user_agent: "wanderlist-test/0.1".to_string(),
            max_retries: 0,
            backoff_base_ms: 0,
        },
    };
    Arc::new(HttpGateway::new(settings).expect("gateway"))
}

async fn mount_providers(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v1/security/oauth2/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access_token": "tok", "expires_in": 1799 })),
        )
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/photos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "urls": { "regular": "https://images.test/porto?ixid=1" } }]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/shopping/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "name": "Livraria Lello" }, { "name": "Ribeira" }]
        })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/reverse-geocode-client"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "locality": "Porto",
            "countryName": "Portugal"
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn map_click_confirm_and_enrich() {
    let server = MockServer::start().await;
    mount_providers(&server).await;
    // "POR" is a 3-letter heuristic code, so it goes straight to the search.
    Mock::given(method("GET"))
        .and(path("/v2/shopping/flight-offers"))
        .and(query_param("originLocationCode", "PAR"))
        .and(query_param("destinationLocationCode", "POR"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "price": { "total": "74.99" },
                "itineraries": [{
                    "duration": "PT2H5M",
                    "segments": [{ "arrival": { "iataCode": "OPO" } }]
                }]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let repository = InMemoryPlaceRepository::new();
    let mut session = WishlistSession::new(gateway(&server), repository.clone(), "PAR");
    assert_eq!(session.load().await.unwrap(), 0);

    let marker = session
        .on_map_click(Coordinates {
            lat: 41.1579,
            lng: -8.6291,
        })
        .await
        .expect("marker");
    assert_eq!(marker.city_code, "POR");
    assert_eq!(session.view().await.add_state, AddState::TempSelected);

    let saved = session.on_confirm_add().await.unwrap();
    let outcome = session.wait_for_enrichment().await;
    assert!(matches!(outcome, Some(EnrichOutcome::Published(_))));

    let place = session.view().await.selected.expect("selected");
    assert_eq!(place.id, saved.id);
    assert_eq!(
        place.image_url.as_deref(),
        Some("https://images.test/porto?ixid=1&fit=crop&w=1200&q=80")
    );
    assert_eq!(place.what_to_see, vec!["Livraria Lello", "Ribeira"]);
    let estimate = place
        .flight_quote("PAR")
        .and_then(FlightQuote::estimate)
        .expect("estimate");
    assert_eq!(estimate.min, 75);
    assert_eq!(estimate.duration, "2h05");
    assert_eq!(estimate.arrival_airport, "OPO");

    // Enrichment is never persisted.
    let persisted = repository.list().await.unwrap();
    assert_eq!(persisted.len(), 1);
    assert!(persisted[0].what_to_see.is_empty());
}

#[tokio::test]
async fn failing_flight_provider_settles_on_unavailable() {
    let server = MockServer::start().await;
    mount_providers(&server).await;
    Mock::given(method("GET"))
        .and(path("/v2/shopping/flight-offers"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let repository = InMemoryPlaceRepository::new();
    let mut session = WishlistSession::new(gateway(&server), repository, "PAR");
    session.load().await.unwrap();
    session
        .on_map_click(Coordinates {
            lat: 41.1579,
            lng: -8.6291,
        })
        .await
        .unwrap();
    let saved = session.on_confirm_add().await.unwrap();
    session.wait_for_enrichment().await;

    for _ in 0..3 {
        session.on_select(&saved.id).await.unwrap();
        session.wait_for_enrichment().await;
    }

    let place = session.view().await.selected.unwrap();
    assert_eq!(place.flight_quote("PAR"), Some(&FlightQuote::Unavailable));
}

#![allow(clippy::unwrap_used)]
// Integration tests for `MobilityClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fleetwatch_api::mobility::MobilityClient;
use fleetwatch_api::transport::TransportConfig;
use fleetwatch_api::Error;

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, MobilityClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = MobilityClient::with_base_url(
        base_url,
        "driver".into(),
        "wheels".to_string().into(),
        TransportConfig::default(),
    )
    .unwrap();
    (server, client)
}

fn login_ok() -> serde_json::Value {
    json!({
        "Id": 7,
        "Preferences": [
            { "Value": "Km/h", "Text": "user.speed" },
            { "Value": "celsius", "Text": "°C" },
            { "Value": "", "Text": "(GMT +2:00) Athens, Bucharest" },
            { "Value": "dd MMM yyyy", "Text": "user.dateformat.long" }
        ]
    })
}

async fn mount_login_ok(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/Account/LogOnV3"))
        .and(body_string_contains("username=driver"))
        .and(body_string_contains("action=log+on"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_ok()))
        .expect(expected_calls)
        .mount(server)
        .await;
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn login_parses_preferences() {
    let (server, client) = setup().await;
    mount_login_ok(&server, 1).await;

    let prefs = client.authenticate().await.unwrap();
    assert_eq!(prefs.user_id.as_deref(), Some("7"));
    assert_eq!(prefs.speed_unit.as_deref(), Some("Km/h"));
    assert_eq!(prefs.temperature_unit.as_deref(), Some("°C"));
    assert_eq!(prefs.utc_offset_minutes, Some(120));
    assert_eq!(prefs.date_format.as_deref(), Some("%d %b %Y %H:%M:%S"));
}

#[tokio::test]
async fn html_login_body_is_auth_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/Account/LogOnV3"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Log on</html>"))
        .mount(&server)
        .await;

    let result = client.authenticate().await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
    assert!(!client.has_session().await);
}

// ── Unit list tests ─────────────────────────────────────────────────

#[tokio::test]
async fn units_fetch_requests_full_state() {
    let (server, client) = setup().await;
    mount_login_ok(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/Live/Unit/Units"))
        .and(query_param("ResetRequestDate", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Units": [{
                "HasData": true,
                "HtmlControl": "<ul class=\"curraux-details\"></ul>",
                "Unit": {
                    "UnitId": 9001,
                    "Name": "Company car",
                    "Latitude": 37.97,
                    "Longitude": 23.72,
                    "Speed": 54.0,
                    "Heading": 180.0,
                    "StatusFixed": "Moving",
                    "OdometerFormatted": "128534 km",
                    "LatestPointReceivedDateTimeFormatted": "15 Jun 2026 12:00:00",
                    "SensorInputs": [
                        { "Description": "External Battery", "Value": "12.4", "MeasurementSign": "V" }
                    ]
                }
            }]
        })))
        .mount(&server)
        .await;

    let (prefs, units) = client.units().await.unwrap();
    assert_eq!(prefs.speed_unit.as_deref(), Some("Km/h"));
    assert_eq!(units.len(), 1);
    let unit = &units[0];
    assert!(unit.has_data);
    assert_eq!(unit.unit.unit_id.to_string(), "9001");
    assert_eq!(unit.unit.name, "Company car");
    assert_eq!(unit.unit.sensor_inputs.len(), 1);
}

#[tokio::test]
async fn non_json_units_body_invalidates_session() {
    let (server, client) = setup().await;
    // Initial login; the re-login mock is mounted after reset.
    mount_login_ok(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/Live/Unit/Units"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Log on</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.units().await;
    assert!(
        matches!(result, Err(Error::SessionExpired)),
        "expected SessionExpired, got: {result:?}"
    );
    assert!(!client.has_session().await);

    // Next poll logs in again and succeeds.
    server.reset().await;
    mount_login_ok(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/Live/Unit/Units"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Units": [] })))
        .mount(&server)
        .await;

    let (_, units) = client.units().await.unwrap();
    assert!(units.is_empty());
}

#[tokio::test]
async fn session_is_reused_across_fetches() {
    let (server, client) = setup().await;
    mount_login_ok(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/Live/Unit/Units"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Units": [] })))
        .expect(2)
        .mount(&server)
        .await;

    client.units().await.unwrap();
    client.units().await.unwrap();
}

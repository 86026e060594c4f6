use chrono::NaiveDate;
use hourcast::config::OpenMeteoConfig;
use hourcast::datasources::OpenMeteoClient;
use hourcast::db::Database;
use hourcast::logic::{current_theme, select_current, Declined, ForecastService, TaskChange};
use hourcast::models::settings::{allow_unsuitable_tasks, set_allow_unsuitable_tasks};
use hourcast::models::{Location, ThemeTag, Tier};
use hourcast::HourcastError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn forecast_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "timezone": "America/New_York",
            "hourly": {
                "time": [
                    "2024-07-01T09:00",
                    "2024-07-01T10:00",
                    "2024-07-01T11:00",
                    "2024-07-01T12:00"
                ],
                "temperature_2m": [64.0, 42.0, 80.0, 99.0],
                "weather_code": [0, 61, 95, 1]
            }
        })))
        .mount(&server)
        .await;
    server
}

fn client(server: &MockServer) -> OpenMeteoClient {
    OpenMeteoClient::new(OpenMeteoConfig {
        base_url: server.uri(),
        forecast_days: 1,
        timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn fetch_classify_annotate_and_reload() {
    let server = forecast_server().await;
    let client = client(&server);
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("hourcast.db");
    let location = Location::new("Philadelphia", 39.95, -75.16).unwrap();

    let service = ForecastService::new(Database::open(&db_path).unwrap());
    let mut snapshot = service.refresh(&client, &location, 1).await.unwrap();

    let tiers: Vec<Tier> = snapshot.records.iter().map(|r| r.tier).collect();
    assert_eq!(
        tiers,
        vec![Tier::Good, Tier::Bad, Tier::Unsuitable, Tier::Unsuitable]
    );

    let recommendations: Vec<&str> = snapshot
        .insights
        .recommendations
        .iter()
        .map(|i| i.message.as_str())
        .collect();
    assert_eq!(
        recommendations,
        vec![
            "Task window 09:00 • Good Conditions • 64°",
            "Task window 10:00 • Bad Conditions • 42°",
        ]
    );

    let anomalies: Vec<&str> = snapshot
        .insights
        .anomalies
        .iter()
        .map(|i| i.message.as_str())
        .collect();
    assert_eq!(
        anomalies,
        vec![
            "10:00 swing • ~22° jump",
            "11:00 alert • Unsuitable Conditions ⚡",
            "11:00 swing • ~38° jump",
            "11:00 alert • Thunderstorm risk",
            "12:00 alert • Unsuitable Conditions 🔥",
            "12:00 swing • ~19° jump",
        ]
    );

    // Unsuitable hour stays closed until the override is stored
    let storm = snapshot.records[2].slot_id.clone();
    let db = service.tasks().store();
    let allow = allow_unsuitable_tasks(db, false);
    assert_eq!(
        service
            .tasks()
            .add_task(&mut snapshot.records, &storm, "walk dog", allow)
            .unwrap(),
        TaskChange::Unchanged(Declined::UnsuitableHour)
    );

    set_allow_unsuitable_tasks(db, true).unwrap();
    let allow = allow_unsuitable_tasks(db, false);
    assert!(service
        .tasks()
        .add_task(&mut snapshot.records, &storm, "walk dog", allow)
        .unwrap()
        .is_applied());

    let morning = snapshot.records[0].slot_id.clone();
    service
        .tasks()
        .add_task(&mut snapshot.records, &morning, "water plants", allow)
        .unwrap();
    drop(service);

    // A fresh process sees the same tasks on the same hours
    let service = ForecastService::new(Database::open(&db_path).unwrap());
    let reloaded = service.refresh(&client, &location, 2).await.unwrap();
    assert_eq!(reloaded.records[0].tasks, vec!["water plants"]);
    assert!(reloaded.records[1].tasks.is_empty());
    assert_eq!(reloaded.records[2].tasks, vec!["walk dog"]);
    assert_eq!(reloaded.insights, snapshot.insights);

    let now = NaiveDate::from_ymd_opt(2024, 7, 1)
        .unwrap()
        .and_hms_opt(11, 20, 0)
        .unwrap();
    let current = select_current(&reloaded.records, now);
    assert_eq!(current.map(|r| r.time_label()).as_deref(), Some("11:00"));
    assert_eq!(current_theme(current), ThemeTag::Thunderstorm);
}

#[tokio::test]
async fn invalid_location_fails_before_any_request() {
    let server = forecast_server().await;
    let client = client(&server);
    let service = ForecastService::new(Database::open_in_memory().unwrap());
    let location = Location {
        name: "Nowhere".into(),
        latitude: 10.0,
        longitude: 181.0,
    };

    let err = service.refresh(&client, &location, 1).await.unwrap_err();
    assert!(matches!(err, HourcastError::InvalidLocation(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn upstream_failure_is_blocking() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let service = ForecastService::new(Database::open_in_memory().unwrap());
    let location = Location::new("Philadelphia", 39.95, -75.16).unwrap();

    let err = service
        .refresh(&client(&server), &location, 1)
        .await
        .unwrap_err();
    assert!(err.is_blocking());
}

use chrono::{Duration, Local};
use eventhub_client::error::{ApiErrorKind, Error};
use eventhub_client::events::{Event, EventFilter, NewSession, RegistrationStatus};
use eventhub_client::EventHub;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A day far enough ahead that every session on it starts in the future
fn day() -> String {
    (Local::now().date_naive() + Duration::days(30))
        .format("%Y-%m-%d")
        .to_string()
}

fn at(time: &str) -> String {
    format!("{}T{}:00", day(), time)
}

fn event() -> Event {
    Event {
        id: "e1".to_string(),
        title: "RustConf".to_string(),
        description: None,
        category: Some("tech".to_string()),
        location: None,
        start_date: at("08:00"),
        end_date: at("20:00"),
        capacity: Some(100),
    }
}

async fn server_with_sessions() -> MockServer {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/events/e1/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "s1",
                "title": "Keynote",
                "speaker": "Ferris",
                "start_time": at("10:00"),
                "end_time": at("11:00")
            },
            {
                "id": "s2",
                "title": "Lunch",
                "start_time": at("13:00"),
                "end_time": at("14:00")
            }
        ])))
        .mount(&mock_server)
        .await;

    mock_server
}

#[tokio::test]
async fn test_list_events_sends_filter() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/events"))
        .and(query_param("search", "rust"))
        .and(query_param("category", "tech"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "e1",
                "title": "RustConf",
                "category": "tech",
                "start_date": "2030-09-10T08:00:00",
                "end_date": "2030-09-12T18:00:00"
            }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let hub = EventHub::new(&mock_server.uri()).unwrap();
    hub.state().set_filter(EventFilter {
        search: Some("rust".to_string()),
        category: Some("tech".to_string()),
        ..Default::default()
    });

    let events = hub.events().list_events(&hub.state().filter()).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].capacity, None);
}

#[tokio::test]
async fn test_get_missing_event() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/events/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "detail": "Event not found"
        })))
        .mount(&mock_server)
        .await;

    let hub = EventHub::new(&mock_server.uri()).unwrap();
    match hub.events().get_event("nope").await {
        Err(Error::Api(err)) => {
            assert_eq!(err.kind, ApiErrorKind::NotFound);
            assert_eq!(err.message, "Event not found");
        }
        other => panic!("expected not found, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_success_body_is_a_json_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/events/e1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let hub = EventHub::new(&mock_server.uri()).unwrap();
    match hub.events().get_event("e1").await {
        Err(err @ Error::Json(_)) => assert_eq!(err.api_kind(), None),
        other => panic!("expected a JSON error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_create_valid_session() {
    let mock_server = server_with_sessions().await;

    Mock::given(method("POST"))
        .and(path("/events/e1/sessions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "s3",
            "event_id": "e1",
            "title": "Workshop",
            "start_time": at("15:00"),
            "end_time": at("16:30")
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let hub = EventHub::new(&mock_server.uri()).unwrap();
    let session = NewSession::new("Workshop", at("15:00"), at("16:30")).with_speaker("Ferris");

    let created = hub.events().create_session(&event(), &session).await.unwrap();
    assert_eq!(created.id, "s3");
}

#[tokio::test]
async fn test_conflicting_session_is_not_submitted() {
    let mock_server = server_with_sessions().await;

    Mock::given(method("POST"))
        .and(path("/events/e1/sessions"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let hub = EventHub::new(&mock_server.uri()).unwrap();
    let session = NewSession::new("Talk", at("10:30"), at("11:30"));

    match hub.events().create_session(&event(), &session).await {
        Err(Error::Validation(result)) => {
            assert!(!result.is_valid);
            assert_eq!(result.errors.len(), 1);
            assert!(result.errors[0].contains("Keynote"));
        }
        other => panic!("expected a validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_check_session_reports_buffer_warning() {
    let mock_server = server_with_sessions().await;
    let hub = EventHub::new(&mock_server.uri()).unwrap();

    let session = NewSession::new("Q&A", at("11:00"), at("12:00"));
    let result = hub
        .events()
        .check_session(&event(), &session, None)
        .await
        .unwrap();

    assert!(result.is_valid);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("Keynote"));
}

#[tokio::test]
async fn test_update_session_ignores_itself() {
    let mock_server = server_with_sessions().await;

    Mock::given(method("PUT"))
        .and(path("/events/e1/sessions/s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "s1",
            "title": "Keynote",
            "start_time": at("10:30"),
            "end_time": at("11:30")
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let hub = EventHub::new(&mock_server.uri()).unwrap();
    let moved = NewSession::new("Keynote", at("10:30"), at("11:30"));

    let updated = hub
        .events()
        .update_session(&event(), "s1", &moved)
        .await
        .unwrap();
    assert_eq!(updated.start_time, at("10:30"));
}

#[tokio::test]
async fn test_register_and_cancel() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/events/e1/registrations"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "r1",
            "event_id": "e1",
            "user_id": "u1",
            "status": "waitlisted"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/events/e1/registrations/r1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let hub = EventHub::new(&mock_server.uri()).unwrap();
    let events = hub.events();

    let registration = events.register("e1").await.unwrap();
    assert_eq!(registration.status, RegistrationStatus::Waitlisted);

    events.cancel_registration("e1", "r1").await.unwrap();
}

#[tokio::test]
async fn test_validation_error_details_from_server() {
    let mock_server = server_with_sessions().await;

    Mock::given(method("POST"))
        .and(path("/events/e1/sessions"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Invalid session",
            "errors": { "title": ["must not be blank"] }
        })))
        .mount(&mock_server)
        .await;

    let hub = EventHub::new(&mock_server.uri()).unwrap();
    let session = NewSession::new("", at("16:00"), at("17:00"));

    match hub.events().create_session(&event(), &session).await {
        Err(Error::Api(err)) => {
            assert_eq!(err.kind, ApiErrorKind::ValidationError);
            assert_eq!(err.details[0].field, "title");
        }
        other => panic!("expected an API validation error, got {:?}", other),
    }
}

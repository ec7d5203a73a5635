// Integration tests driving list screens against a mocked dashboard backend.
use std::sync::Arc;
use std::time::Duration;

use panelsync::{
    open_list_screen, ClientConfig, ClientError, EntityDescriptor, ListQuery, QueryPatch, SortKey,
};
use panelsync_client::{AutoConfirm, NoticeLog};
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::new(Url::parse(&server.uri()).expect("mock url"))
}

fn students(names: &[(i64, &str)]) -> serde_json::Value {
    let rows: Vec<_> = names
        .iter()
        .map(|(id, name)| json!({ "id": id, "name": name, "type": "trainee", "program": "iot" }))
        .collect();
    json!({ "students": rows })
}

#[tokio::test]
async fn slow_stale_response_does_not_overwrite_fresh_one() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/students/"))
        .and(query_param("search", "ja"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(students(&[(1, "Jane Doe"), (4, "Jakob Stone")]))
                .set_delay(Duration::from_millis(600)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/students/"))
        .and(query_param("search", "jane"))
        .respond_with(ResponseTemplate::new(200).set_body_json(students(&[(1, "Jane Doe")])))
        .mount(&server)
        .await;

    let (controller, _) = open_list_screen(
        &config_for(&server),
        EntityDescriptor::students(),
        Arc::new(NoticeLog::new()),
        Arc::new(AutoConfirm::deny()),
    )
    .expect("screen");

    let (older, newer) = tokio::join!(
        controller.update(QueryPatch::search("ja")),
        controller.update(QueryPatch::search("jane")),
    );

    assert!(!older.expect("older").is_applied());
    assert!(newer.expect("newer").is_applied());
    let view = controller.view().lock();
    assert_eq!(view.len(), 1);
    assert!(view.rows()[0].contains("Jane Doe"));
}

#[tokio::test]
async fn serializes_only_non_empty_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/students/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(students(&[(2, "John Roe")])))
        .mount(&server)
        .await;

    let (controller, _) = open_list_screen(
        &config_for(&server),
        EntityDescriptor::students(),
        Arc::new(NoticeLog::new()),
        Arc::new(AutoConfirm::deny()),
    )
    .expect("screen");

    controller
        .update(QueryPatch::sort(SortKey::NameAsc))
        .await
        .expect("sorted");
    controller
        .update(QueryPatch::extra("program", "sod"))
        .await
        .expect("category");

    let requests = server.received_requests().await.expect("recorded");
    let first: Vec<(String, String)> = requests[0].url.query_pairs().into_owned().collect();
    assert_eq!(first, vec![("sort_by".to_string(), "name_asc".to_string())]);

    let second: Vec<(String, String)> = requests[1].url.query_pairs().into_owned().collect();
    assert!(second.contains(&("program".to_string(), "sod".to_string())));
    assert!(!second.iter().any(|(name, _)| name == "search" || name == "filter_type"));
}

#[tokio::test]
async fn activities_search_uses_their_own_parameter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/recent-activities/"))
        .and(query_param("action_search", "login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": 7, "action": "login", "user": "admin" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (controller, _) = open_list_screen(
        &config_for(&server),
        EntityDescriptor::activities(),
        Arc::new(NoticeLog::new()),
        Arc::new(AutoConfirm::deny()),
    )
    .expect("screen");

    let outcome = controller
        .update(QueryPatch::search("login"))
        .await
        .expect("query");
    assert_eq!(outcome.snapshot().map(|s| s.len()), Some(1));
    assert_eq!(controller.view().lock().rows()[0].cells[0], "login");
}

#[tokio::test]
async fn server_error_keeps_current_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/students/"))
        .and(query_param("search", "broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/students/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(students(&[(1, "Jane Doe"), (2, "John Roe")])),
        )
        .mount(&server)
        .await;

    let log = Arc::new(NoticeLog::new());
    let (controller, _) = open_list_screen(
        &config_for(&server),
        EntityDescriptor::students(),
        log.clone(),
        Arc::new(AutoConfirm::deny()),
    )
    .expect("screen");

    controller.refresh().await.expect("initial");
    let err = controller
        .update(QueryPatch::search("broken"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::UnexpectedStatus { .. }));
    assert_eq!(controller.view().lock().len(), 2);
    assert_eq!(log.messages(), vec!["An error occurred.".to_string()]);
}

#[tokio::test]
async fn hung_backend_turns_into_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(students(&[]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.request_timeout = Duration::from_millis(200);
    let log = Arc::new(NoticeLog::new());
    let (controller, _) = open_list_screen(
        &config,
        EntityDescriptor::students(),
        log.clone(),
        Arc::new(AutoConfirm::deny()),
    )
    .expect("screen");

    let err = controller.refresh().await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout));
    assert_eq!(
        log.messages(),
        vec!["The server took too long to respond.".to_string()]
    );
    assert_eq!(controller.query(), ListQuery::default());
}

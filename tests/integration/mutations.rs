// Integration tests for create/update/delete round trips through the controller.
use std::sync::Arc;

use panelsync::{
    open_list_screen, ClientConfig, ClientError, EntityDescriptor, EntityForm, HttpTransport,
    ListViewController, MutationResult, RecordId, TableView,
};
use panelsync_client::{AutoConfirm, ListView, NoticeLog};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Screen {
    server: MockServer,
    controller: ListViewController<TableView>,
    transport: Arc<HttpTransport>,
    log: Arc<NoticeLog>,
}

async fn students_screen() -> Screen {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/students/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "students": [
                { "id": 1, "name": "John Roe", "type": "internee-university", "program": "sod" },
                { "id": 2, "name": "Mary Major", "type": "trainee", "program": "iot" },
                { "id": 3, "name": "Ann Lee", "type": "trainee", "program": "sod" }
            ]
        })))
        .mount(&server)
        .await;

    let config = ClientConfig::new(Url::parse(&server.uri()).expect("mock url"));
    let log = Arc::new(NoticeLog::new());
    let (controller, transport) = open_list_screen(
        &config,
        EntityDescriptor::students(),
        log.clone(),
        Arc::new(AutoConfirm::accept()),
    )
    .expect("screen");
    transport.set_cookie("csrftoken=s3cr3t");
    controller.refresh().await.expect("initial rows");
    controller.view().lock().set_counter("total_students", "3");

    Screen {
        server,
        controller,
        transport,
        log,
    }
}

fn names(controller: &ListViewController<TableView>) -> Vec<String> {
    controller
        .view()
        .lock()
        .rows()
        .iter()
        .map(|row| row.cells[0].clone())
        .collect()
}

#[tokio::test]
async fn creating_jane_doe_appends_one_row_and_uses_server_totals() {
    let screen = students_screen().await;
    Mock::given(method("POST"))
        .and(path("/add-student/"))
        .and(header("X-CSRFToken", "s3cr3t"))
        .and(header("X-Requested-With", "XMLHttpRequest"))
        .and(body_string_contains("student-name=Jane+Doe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "student": { "id": 4, "name": "Jane Doe", "type": "trainee", "program": "iot" },
            "counts": { "total_students": 120, "iot_students": 64, "sod_students": 56 }
        })))
        .expect(1)
        .mount(&screen.server)
        .await;

    let controller = &screen.controller;
    let before = names(controller);
    let mut form = EntityForm::for_create(controller.entity());
    form.set("student-name", "Jane Doe");
    form.set("student-type", "trainee");
    form.set("student-program", "iot");

    let result = controller.submit_form(&mut form).await.expect("created");
    assert!(matches!(result, MutationResult::Created { .. }));

    let after = names(controller);
    assert_eq!(after.len(), before.len() + 1);
    assert_eq!(&after[..before.len()], &before[..]);
    assert_eq!(after.last().map(String::as_str), Some("Jane Doe"));
    let view = controller.view().lock();
    assert_eq!(view.counter("total_students"), Some("120"));
    assert_eq!(view.counter("sod_students"), Some("56"));
    assert!(!form.is_open());
}

#[tokio::test]
async fn rejected_update_changes_nothing() {
    let screen = students_screen().await;
    Mock::given(method("POST"))
        .and(path("/update-student/2/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "Student not found"
        })))
        .expect(1)
        .mount(&screen.server)
        .await;

    let controller = &screen.controller;
    let before = controller.view().lock().clone();
    let record = panelsync::RowRecord::new(2).with_field("name", "Mary Major");
    let mut form = EntityForm::for_update(controller.entity(), &record);
    form.set("student-name", "Mary Minor");

    let err = controller.submit_form(&mut form).await.unwrap_err();
    assert!(matches!(err, ClientError::Rejected { .. }));

    let after = controller.view().lock().clone();
    assert_eq!(after.rows(), before.rows());
    assert_eq!(after.counters(), before.counters());
    assert!(form.is_open());
    assert_eq!(form.get("student-name"), Some("Mary Minor"));
    assert_eq!(screen.log.messages(), vec!["Student not found".to_string()]);
}

#[tokio::test]
async fn update_patches_only_the_edited_row() {
    let screen = students_screen().await;
    Mock::given(method("POST"))
        .and(path("/update-student/2/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "student": { "id": 2, "name": "Mary Minor", "type": "trainee", "program": "iot" }
        })))
        .expect(1)
        .mount(&screen.server)
        .await;

    let controller = &screen.controller;
    let record = panelsync::RowRecord::new(2).with_field("name", "Mary Major");
    let mut form = EntityForm::for_update(controller.entity(), &record);
    form.set("student-name", "Mary Minor");
    controller.submit_form(&mut form).await.expect("updated");

    assert_eq!(names(controller), vec!["John Roe", "Mary Minor", "Ann Lee"]);
}

#[tokio::test]
async fn bulk_delete_posts_selected_ids_and_clears_selection() {
    let screen = students_screen().await;
    Mock::given(method("POST"))
        .and(path("/bulk-delete-students/"))
        .and(header("X-CSRFToken", "s3cr3t"))
        .and(body_json(json!({ "student_ids": [1, 3] })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "deleted_count": 2 })),
        )
        .expect(1)
        .mount(&screen.server)
        .await;

    let controller = &screen.controller;
    controller.toggle_selection_mode();
    controller.toggle_row(&RecordId::Int(1));
    controller.toggle_row(&RecordId::Int(3));
    assert!(controller.view().lock().selection().bulk_action_enabled);

    controller.bulk_delete().await.expect("bulk delete");

    assert_eq!(names(controller), vec!["Mary Major"]);
    assert!(!controller.is_any_selected());
    assert!(!controller.view().lock().selection().bulk_action_enabled);
}

#[tokio::test]
async fn empty_selection_never_reaches_the_server() {
    let screen = students_screen().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&screen.server)
        .await;

    screen.controller.toggle_selection_mode();
    let err = screen.controller.bulk_delete().await.unwrap_err();

    assert!(matches!(err, ClientError::EmptySelection));
    assert_eq!(
        screen.log.messages(),
        vec!["Select at least one student to delete.".to_string()]
    );
}

#[tokio::test]
async fn rotated_token_is_used_for_the_next_delete() {
    let screen = students_screen().await;
    Mock::given(method("POST"))
        .and(path("/delete-student/3/"))
        .and(header("X-CSRFToken", "fresh"))
        .and(body_string_contains("csrfmiddlewaretoken=fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&screen.server)
        .await;

    screen.transport.set_cookie("csrftoken=fresh");
    let result = screen
        .controller
        .delete_row(RecordId::Int(3))
        .await
        .expect("deleted");

    assert_eq!(
        result,
        MutationResult::Deleted {
            ids: vec![RecordId::Int(3)],
            removed: 1
        }
    );
    assert_eq!(names(&screen.controller), vec!["John Roe", "Mary Major"]);
}

#[tokio::test]
async fn transaction_create_reloads_list_and_formats_totals() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/recent-transactions/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "transactions": [
                { "id": 9, "date": "2024-05-01", "type": "Transport", "description": "Bus", "amount": "12.50" }
            ]
        })))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/add-expense/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "total_expenses": "512.50",
            "transport_expenses": "12.50"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::new(Url::parse(&server.uri()).expect("mock url"));
    let (controller, transport) = open_list_screen(
        &config,
        EntityDescriptor::transactions(),
        Arc::new(NoticeLog::new()),
        Arc::new(AutoConfirm::deny()),
    )
    .expect("screen");
    transport.set_cookie("csrftoken=t0k");
    controller.refresh().await.expect("rows");

    let mut form = EntityForm::for_create(controller.entity());
    form.set("expense-type", "Transport");
    form.set("expense-amount", "12.50");
    controller.submit_form(&mut form).await.expect("expense");

    let view = controller.view().lock();
    assert_eq!(view.len(), 1);
    assert_eq!(view.rows()[0].cells[3], "$12.50");
    assert_eq!(view.counter("total_expenses"), Some("$512.50"));
}

#[tokio::test]
async fn declined_confirmation_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = ClientConfig::new(Url::parse(&server.uri()).expect("mock url"));
    let (controller, transport) = open_list_screen(
        &config,
        EntityDescriptor::employees(),
        Arc::new(NoticeLog::new()),
        Arc::new(AutoConfirm::deny()),
    )
    .expect("screen");
    transport.set_cookie("csrftoken=t0k");

    let result = controller
        .delete_row(RecordId::Int(5))
        .await
        .expect("cancelled");
    assert_eq!(result, MutationResult::Cancelled);
}

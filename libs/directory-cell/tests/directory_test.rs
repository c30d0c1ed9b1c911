use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use directory_cell::router::directory_routes;
use directory_cell::services::directory::DirectoryService;
use shared_utils::test_utils::{MockStoreResponses, TestConfig};

fn test_app(mock_uri: &str) -> Router {
    directory_routes(TestConfig::for_mock_server(mock_uri).to_arc())
}

#[tokio::test]
async fn test_list_doctors() {
    let mock_server = MockServer::start().await;
    let app = test_app(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("order", "first_name.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::doctor_row(7, "Niamh", "Kelly", "Cardiology"),
            MockStoreResponses::doctor_row(9, "Patrick", "Doyle", "Dermatology"),
        ])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri("/doctors")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let doctors: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(doctors.as_array().unwrap().len(), 2);
    assert_eq!(doctors[0]["doctor_id"], 7);
    assert_eq!(doctors[0]["specialty"], "Cardiology");
    assert_eq!(doctors[1]["first_name"], "Patrick");
}

#[tokio::test]
async fn test_list_patients() {
    let mock_server = MockServer::start().await;
    let app = test_app(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("order", "first_name.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::patient_row(3, "Anna", "Byrne"),
        ])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri("/patients")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let patients: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(patients[0]["patient_id"], 3);
    assert_eq!(patients[0]["last_name"], "Byrne");
}

#[tokio::test]
async fn test_doctor_exists() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::for_mock_server(&mock_server.uri()).to_app_config();
    let directory = DirectoryService::new(&config);

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("doctor_id", "eq.7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "doctor_id": 7 }
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("doctor_id", "eq.99"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    assert!(directory.doctor_exists(7).await.unwrap());
    assert!(!directory.doctor_exists(99).await.unwrap());
}

#[tokio::test]
async fn test_list_doctors_storage_failure() {
    let mock_server = MockServer::start().await;
    let app = test_app(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "connection refused"
        })))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri("/doctors")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

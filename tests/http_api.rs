use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::web::Data;
use actix_web::{App, test};
use serde_json::{Value, json};

use leavedesk::config::Config;
use leavedesk::routes;
use leavedesk::service::advisor::DisabledAdvisor;
use leavedesk::service::leave::LeaveService;
use leavedesk::store::memory::MemoryStore;
use leavedesk::store::{EmployeeStore, LeaveStore};

fn test_config() -> Config {
    Config {
        database_url: None,
        jwt_secret: "integration-test-secret".into(),
        server_addr: "127.0.0.1:0".into(),
        access_token_ttl: 36000,
        annual_leave_allotment: 20,
        rate_login_per_min: 1000,
        rate_register_per_min: 1000,
        rate_protected_per_min: 1000,
        api_prefix: "/api".into(),
        advisor_api_url: "http://127.0.0.1:1".into(),
        advisor_api_key: None,
        advisor_model: "gpt-3.5-turbo".into(),
        advisor_timeout_ms: 100,
    }
}

fn app_state(config: &Config) -> (Data<LeaveService>, Data<dyn EmployeeStore>) {
    let store = Arc::new(MemoryStore::new());
    let employees: Arc<dyn EmployeeStore> = store.clone();
    let leaves: Arc<dyn LeaveStore> = store;
    let service = Data::new(LeaveService::new(
        employees.clone(),
        leaves,
        Arc::new(DisabledAdvisor),
        config.advisor_timeout(),
    ));
    (service, Data::from(employees))
}

// Governor keys requests by peer IP; TestRequests have none unless set.
fn peer() -> SocketAddr {
    "127.0.0.1:42000".parse().unwrap()
}

fn john() -> Value {
    json!({
        "employee_id": 1001,
        "full_name": "John Doe",
        "position": "Engineer",
        "email": "john.doe@company.com",
        "password": "s3cret"
    })
}

fn hr_manager() -> Value {
    json!({
        "employee_id": 2001,
        "full_name": "Helen Reyes",
        "position": "HR Manager",
        "email": "helen.reyes@company.com",
        "password": "s3cret",
        "role_id": 2
    })
}

fn register_req(body: Value) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/auth/register")
        .peer_addr(peer())
        .set_json(body)
}

fn login_req(email: &str, password: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/auth/login")
        .peer_addr(peer())
        .set_json(json!({ "email": email, "password": password }))
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

#[actix_web::test]
async fn register_login_submit_approve_flow() {
    let config = test_config();
    let (service, employees) = app_state(&config);
    let app = test::init_service(
        App::new()
            .app_data(service)
            .app_data(employees)
            .app_data(Data::new(config.clone()))
            .configure(move |cfg| routes::configure(cfg, config)),
    )
    .await;

    let resp = test::call_service(&app, register_req(john()).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let resp = test::call_service(&app, register_req(hr_manager()).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp =
        test::call_service(&app, login_req("john.doe@company.com", "s3cret").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["expires_in"], 36000);
    let employee_token = body["access_token"].as_str().unwrap().to_string();

    let resp =
        test::call_service(&app, login_req("helen.reyes@company.com", "s3cret").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let hr_token = body["access_token"].as_str().unwrap().to_string();

    // submit five days
    let req = test::TestRequest::post()
        .uri("/api/leaves")
        .peer_addr(peer())
        .insert_header(bearer(&employee_token))
        .set_json(json!({
            "start_date": "2026-03-02",
            "end_date": "2026-03-06",
            "reason": "Family vacation"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["status"], "PENDING");
    assert_eq!(created["requested_days"], 5);
    let leave_id = created["id"].as_str().unwrap().to_string();

    // approve with a note
    let req = test::TestRequest::put()
        .uri(&format!("/api/leaves/{leave_id}/approve"))
        .peer_addr(peer())
        .insert_header(bearer(&hr_token))
        .set_json(json!({ "note": "Enjoy your trip" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let decided: Value = test::read_body_json(resp).await;
    assert_eq!(decided["status"], "APPROVED");
    assert_eq!(decided["decision_note"], "Enjoy your trip");

    // balance moved
    let req = test::TestRequest::get()
        .uri("/api/employees/1001")
        .peer_addr(peer())
        .insert_header(bearer(&employee_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let profile: Value = test::read_body_json(resp).await;
    assert_eq!(profile["used_leave_days"], 5);
    assert_eq!(profile["remaining_leave_days"], 15);
}

#[actix_web::test]
async fn protected_routes_require_a_bearer_token() {
    let config = test_config();
    let (service, employees) = app_state(&config);
    let app = test::init_service(
        App::new()
            .app_data(service)
            .app_data(employees)
            .app_data(Data::new(config.clone()))
            .configure(move |cfg| routes::configure(cfg, config)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/leaves")
        .peer_addr(peer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/leaves")
        .peer_addr(peer())
        .insert_header(("Authorization", "Token abc"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/leaves")
        .peer_addr(peer())
        .insert_header(("Authorization", "Bearer not-a-jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn plain_employee_cannot_approve_over_http() {
    let config = test_config();
    let (service, employees) = app_state(&config);
    let app = test::init_service(
        App::new()
            .app_data(service)
            .app_data(employees)
            .app_data(Data::new(config.clone()))
            .configure(move |cfg| routes::configure(cfg, config)),
    )
    .await;

    test::call_service(&app, register_req(john()).to_request()).await;
    let resp =
        test::call_service(&app, login_req("john.doe@company.com", "s3cret").to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    let token = body["access_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/leaves")
        .peer_addr(peer())
        .insert_header(bearer(&token))
        .set_json(json!({ "start_date": "2026-03-02", "end_date": "2026-03-03" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let leave_id = created["id"].as_str().unwrap().to_string();

    // no body on purpose; the decision note is optional
    let req = test::TestRequest::put()
        .uri(&format!("/api/leaves/{leave_id}/approve"))
        .peer_addr(peer())
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn double_decision_returns_conflict() {
    let config = test_config();
    let (service, employees) = app_state(&config);
    let app = test::init_service(
        App::new()
            .app_data(service)
            .app_data(employees)
            .app_data(Data::new(config.clone()))
            .configure(move |cfg| routes::configure(cfg, config)),
    )
    .await;

    test::call_service(&app, register_req(john()).to_request()).await;
    test::call_service(&app, register_req(hr_manager()).to_request()).await;
    let resp =
        test::call_service(&app, login_req("john.doe@company.com", "s3cret").to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    let employee_token = body["access_token"].as_str().unwrap().to_string();
    let resp =
        test::call_service(&app, login_req("helen.reyes@company.com", "s3cret").to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    let hr_token = body["access_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/leaves")
        .peer_addr(peer())
        .insert_header(bearer(&employee_token))
        .set_json(json!({ "start_date": "2026-03-02", "end_date": "2026-03-03" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let created: Value = test::read_body_json(resp).await;
    let leave_id = created["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/api/leaves/{leave_id}/reject"))
        .peer_addr(peer())
        .insert_header(bearer(&hr_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::put()
        .uri(&format!("/api/leaves/{leave_id}/approve"))
        .peer_addr(peer())
        .insert_header(bearer(&hr_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].as_str().unwrap().contains("REJECTED"));
}

#[actix_web::test]
async fn duplicate_registration_returns_conflict() {
    let config = test_config();
    let (service, employees) = app_state(&config);
    let app = test::init_service(
        App::new()
            .app_data(service)
            .app_data(employees)
            .app_data(Data::new(config.clone()))
            .configure(move |cfg| routes::configure(cfg, config)),
    )
    .await;

    let resp = test::call_service(&app, register_req(john()).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let resp = test::call_service(&app, register_req(john()).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn wrong_password_is_unauthorized() {
    let config = test_config();
    let (service, employees) = app_state(&config);
    let app = test::init_service(
        App::new()
            .app_data(service)
            .app_data(employees)
            .app_data(Data::new(config.clone()))
            .configure(move |cfg| routes::configure(cfg, config)),
    )
    .await;

    test::call_service(&app, register_req(john()).to_request()).await;
    let resp =
        test::call_service(&app, login_req("john.doe@company.com", "nope").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn unknown_status_filter_is_a_bad_request() {
    let config = test_config();
    let (service, employees) = app_state(&config);
    let app = test::init_service(
        App::new()
            .app_data(service)
            .app_data(employees)
            .app_data(Data::new(config.clone()))
            .configure(move |cfg| routes::configure(cfg, config)),
    )
    .await;

    test::call_service(&app, register_req(john()).to_request()).await;
    let resp =
        test::call_service(&app, login_req("john.doe@company.com", "s3cret").to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    let token = body["access_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/leaves?status=CANCELLED")
        .peer_addr(peer())
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // filter parsing ignores case
    let req = test::TestRequest::get()
        .uri("/api/leaves?status=pending")
        .peer_addr(peer())
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let rows: Value = test::read_body_json(resp).await;
    assert!(rows.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn employees_cannot_read_other_profiles() {
    let config = test_config();
    let (service, employees) = app_state(&config);
    let app = test::init_service(
        App::new()
            .app_data(service)
            .app_data(employees)
            .app_data(Data::new(config.clone()))
            .configure(move |cfg| routes::configure(cfg, config)),
    )
    .await;

    test::call_service(&app, register_req(john()).to_request()).await;
    test::call_service(&app, register_req(hr_manager()).to_request()).await;
    let resp =
        test::call_service(&app, login_req("john.doe@company.com", "s3cret").to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    let employee_token = body["access_token"].as_str().unwrap().to_string();
    let resp =
        test::call_service(&app, login_req("helen.reyes@company.com", "s3cret").to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    let hr_token = body["access_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/employees/2001")
        .peer_addr(peer())
        .insert_header(bearer(&employee_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // HR sees everyone, and the hash never leaves the store
    let req = test::TestRequest::get()
        .uri("/api/employees/1001")
        .peer_addr(peer())
        .insert_header(bearer(&hr_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let profile: Value = test::read_body_json(resp).await;
    assert!(profile.get("password").is_none());
    assert_eq!(profile["annual_allotment"], 20);
}

#[actix_web::test]
async fn advisory_endpoint_degrades_without_backend() {
    let config = test_config();
    let (service, employees) = app_state(&config);
    let app = test::init_service(
        App::new()
            .app_data(service)
            .app_data(employees)
            .app_data(Data::new(config.clone()))
            .configure(move |cfg| routes::configure(cfg, config)),
    )
    .await;

    test::call_service(&app, register_req(john()).to_request()).await;
    let resp =
        test::call_service(&app, login_req("john.doe@company.com", "s3cret").to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    let token = body["access_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/advisory")
        .peer_addr(peer())
        .insert_header(bearer(&token))
        .set_json(json!({ "text": "Two weeks for a family wedding" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["analysis"], "advisory unavailable");
}

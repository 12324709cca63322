use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::app;
use serde_json::Value;
use tower::ServiceExt;

const TOKEN: &str = "Bearer sk_test";

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, TOKEN)
        .body(String::new())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, TOKEN)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

async fn send(router: &mut axum::routing::RouterIntoService<String>, req: Request<String>) -> axum::response::Response {
    use tower::Service;
    ServiceExt::ready(router).await.unwrap().call(req).await.unwrap()
}

// --- auth ---

#[tokio::test]
async fn missing_bearer_token_returns_401() {
    let resp = app()
        .oneshot(Request::builder().uri("/banks").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn empty_bearer_token_returns_401() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/banks")
                .header(http::header::AUTHORIZATION, "Bearer ")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- banks ---

#[tokio::test]
async fn list_banks() {
    let resp = app().oneshot(request("GET", "/banks")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "success");
    assert!(!body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn resolve_unknown_bank_returns_404() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/resolve-account",
            r#"{"settlement_bank":"999","account_number":"0123456789"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- clients ---

#[tokio::test]
async fn create_client_missing_phone_returns_422() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/clients",
            r#"{"first_name":"Ada","last_name":"Obi","email":"ada@example.com"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn get_client_not_found() {
    let resp = app().oneshot(request("GET", "/clients/42")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn client_lifecycle() {
    let mut router = app().into_service();

    let resp = send(
        &mut router,
        json_request(
            "POST",
            "/clients",
            r#"{"first_name":"Ada","last_name":"Obi","email":"ada@example.com","phone":"0801"}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let id = body_json(resp).await["data"]["id"].as_u64().unwrap();

    let resp = send(
        &mut router,
        json_request(
            "PUT",
            &format!("/clients/{id}"),
            r#"{"first_name":"Ada","last_name":"Obi-Eze","email":"ada@example.com","phone":"0801"}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["data"]["last_name"], "Obi-Eze");

    let resp = send(&mut router, request("DELETE", &format!("/clients/{id}"))).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(&mut router, request("GET", &format!("/clients/{id}"))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- invoices and payments ---

#[tokio::test]
async fn invoice_with_bad_fee_bearer_returns_422() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/invoices",
            r#"{"client":{"first_name":"A","last_name":"B","email":"c","phone":"d"},"due_date":"01/01/2027","fee_bearer":"bank","items":[]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn invoice_send_and_pay() {
    let mut router = app().into_service();

    let resp = send(
        &mut router,
        json_request(
            "POST",
            "/invoices",
            r#"{"client":{"first_name":"A","last_name":"B","email":"c","phone":"d"},"due_date":"01/01/2027","fee_bearer":"client","items":[{"item":"Pen"}]}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let invoice = body_json(resp).await;
    let reference = invoice["data"]["reference_code"].as_str().unwrap().to_string();
    assert_eq!(invoice["data"]["status"], "pending");

    let resp = send(&mut router, request("GET", &format!("/invoices/send/{reference}"))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["data"]["sent"], true);

    let payment = format!(
        r#"{{"reference_code":"{reference}","date":"02/01/2027","amount":"100","channel":"Cash"}}"#
    );
    let resp = send(&mut router, json_request("POST", "/payments", &payment)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = send(&mut router, request("GET", &format!("/invoices/{reference}"))).await;
    assert_eq!(body_json(resp).await["data"]["status"], "paid");

    let resp = send(&mut router, request("GET", &format!("/payments/{reference}"))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["data"]["channel"], "Cash");
}

#[tokio::test]
async fn payment_for_unknown_invoice_returns_404() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/payments",
            r#"{"reference_code":"nope","date":"02/01/2027","amount":"100","channel":"Cash"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- history ---

#[tokio::test]
async fn history_rejects_unknown_period() {
    let resp = app()
        .oneshot(json_request("POST", "/transfers/history", r#"{"period":"decade"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn history_lists_records() {
    let mut router = app().into_service();

    let transfer = r#"{"client":{"first_name":"A","last_name":"B","email":"c","phone":"d","settlement_bank":"058","account_number":"0123456789"},"amount":"5000"}"#;
    let resp = send(&mut router, json_request("POST", "/transfers", transfer)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    assert_eq!(created["data"]["client"]["settlement_bank"], "058");
    assert!(created["data"]["client"].get("id").is_none(), "embedded client has no id");

    let resp = send(
        &mut router,
        json_request(
            "POST",
            "/transfers/history",
            r#"{"period":"custom","start":"01/01/2026","end":"31/12/2026"}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["data"].as_array().unwrap().len(), 1);
}

// --- products ---

#[tokio::test]
async fn product_lifecycle() {
    let mut router = app().into_service();

    let resp = send(
        &mut router,
        json_request(
            "POST",
            "/products",
            r#"{"name":"Pen","description":"Blue","unit_cost":"100","type":"product"}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let id = body_json(resp).await["data"]["id"].as_u64().unwrap();

    let resp = send(&mut router, request("GET", "/products")).await;
    assert_eq!(body_json(resp).await["data"].as_array().unwrap().len(), 1);

    let resp = send(
        &mut router,
        json_request(
            "PUT",
            &format!("/products/{id}"),
            r#"{"name":"Pen","description":"Red","unit_cost":"120","type":"product"}"#,
        ),
    )
    .await;
    assert_eq!(body_json(resp).await["data"]["unit_cost"], "120");

    let resp = send(&mut router, request("DELETE", &format!("/products/{id}"))).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(&mut router, request("GET", &format!("/products/{id}"))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

//! Dashboard pages and the RPC console against a live gateway.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use service_gateway::registry::{Endpoint, Service, Value as Schema};

mod common;

fn greeter_srv(address: std::net::SocketAddr) -> Service {
    let mut service = common::service("go.micro.srv.greeter", address);
    service.endpoints = vec![Endpoint {
        name: "Say.Hello".into(),
        request: Some(Schema::message(
            "",
            "Request",
            vec![
                Schema::leaf("name", "string"),
                Schema::message("owner", "User", vec![Schema::leaf("userId", "int64")]),
                Schema::leaf("users", "[]User"),
            ],
        )),
        response: Some(Schema::message("", "Response", vec![Schema::leaf("msg", "string")])),
        ..Endpoint::default()
    }];
    service
}

#[tokio::test]
async fn test_index_lists_web_services() {
    let backend = common::dead_address().await;
    let gateway = common::start_gateway(
        common::test_config(),
        vec![
            common::service("go.micro.web.greeter", backend),
            common::service("go.micro.web.admin", backend),
            common::service("go.micro.srv.greeter", backend),
        ],
    )
    .await;

    let res = common::client().get(gateway.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let html = res.text().await.unwrap();

    let admin = html.find("href=\"/admin/\"").expect("admin listed");
    let greeter = html.find("href=\"/greeter/\"").expect("greeter listed");
    assert!(admin < greeter);
    assert!(!html.contains("go.micro.srv.greeter"));
}

#[tokio::test]
async fn test_registry_json() {
    let backend = common::dead_address().await;
    let gateway = common::start_gateway(
        common::test_config(),
        vec![
            common::service("go.micro.web.b", backend),
            common::service("go.micro.web.a", backend),
        ],
    )
    .await;

    let body: Value = common::client()
        .get(gateway.url("/registry"))
        .header("Content-Type", "application/json")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let names: Vec<&str> = body["services"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["go.micro.web.a", "go.micro.web.b"]);
}

#[tokio::test]
async fn test_registry_service_page() {
    let backend = common::dead_address().await;
    let gateway = common::start_gateway(common::test_config(), vec![greeter_srv(backend)]).await;
    let client = common::client();

    let res = client
        .get(gateway.url("/registry?service=go.micro.srv.greeter"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let html = res.text().await.unwrap();
    assert!(html.contains("Say.Hello"));
    assert!(html.contains(&backend.to_string()));
    assert!(html.contains("&quot;user_id&quot;: 64"));

    let json: Value = client
        .get(gateway.url("/registry?service=go.micro.srv.greeter"))
        .header("Content-Type", "application/json")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(json["services"][0]["endpoints"][0]["name"], "Say.Hello");
    assert_eq!(
        json["services"][0]["endpoints"][0]["request"]["values"][0],
        json!({"name": "name", "type": "string"})
    );
}

#[tokio::test]
async fn test_registry_unknown_service() {
    let gateway = common::start_gateway(common::test_config(), Vec::new()).await;

    let res = common::client()
        .get(gateway.url("/registry?service=go.micro.srv.nothing"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_client_page_prefills_examples() {
    let backend = common::dead_address().await;
    let gateway = common::start_gateway(common::test_config(), vec![greeter_srv(backend)]).await;
    let client = common::client();

    let json: Value = client
        .get(gateway.url("/client"))
        .header("Content-Type", "application/json")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(json["services"][0]["name"], "go.micro.srv.greeter");

    let html = client.get(gateway.url("/client")).send().await.unwrap().text().await.unwrap();
    assert!(html.contains("Say.Hello"));
    // the plural field reuses the nested User rendering
    assert!(html.contains("users"));
    assert!(!html.contains("[]User"));
}

#[tokio::test]
async fn test_rpc_call_through_selector() {
    let backend = common::start_greeter_backend().await;
    let gateway = common::start_gateway(common::test_config(), vec![greeter_srv(backend)]).await;

    let res = common::client()
        .post(gateway.url("/rpc"))
        .json(&json!({
            "service": "go.micro.srv.greeter",
            "endpoint": "Say.Hello",
            "request": "{\"name\": \"John\"}",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"msg": "Hello John"}));
}

#[tokio::test]
async fn test_rpc_form_with_explicit_address() {
    let backend = common::start_greeter_backend().await;
    let gateway = common::start_gateway(common::test_config(), Vec::new()).await;

    let res = common::client()
        .post(gateway.url("/rpc"))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(format!(
            "service=go.micro.srv.greeter&endpoint=Say.Hello&address={backend}&request=%7B%22name%22%3A%22Ann%22%7D"
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["msg"], "Hello Ann");
}

#[tokio::test]
async fn test_rpc_rejects_incomplete_calls() {
    let gateway = common::start_gateway(common::test_config(), Vec::new()).await;
    let client = common::client();

    let res = client
        .post(gateway.url("/rpc"))
        .json(&json!({"endpoint": "Say.Hello"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(gateway.url("/rpc"))
        .json(&json!({"service": "go.micro.srv.nothing", "endpoint": "Say.Hello"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_favicon_is_empty() {
    let gateway = common::start_gateway(common::test_config(), Vec::new()).await;
    let res = common::client().get(gateway.url("/favicon.ico")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

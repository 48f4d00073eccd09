//! Exercises the HTTP backend against a local server that mimics the
//! application's JSON endpoints.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use axum::Router;
use doc_core::lookup::{DirectoryRegistry, DocumentDirectory, LookupConfig, LookupError};
use doc_lookup::HttpDirectory;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

async fn buscar_fornecedor(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    match params.get("cnpj_cpf").map(String::as_str) {
        Some("11222333000181") => Json(json!({
            "id": 7,
            "nome": "Papelaria Central",
            "cnpj_cpf": "11222333000181"
        })),
        Some(_) => Json(json!({ "error": "Fornecedor não encontrado" })),
        None => Json(json!({ "error": "CPF/CNPJ não fornecido" })),
    }
}

async fn recursos(Path(id): Path<i64>) -> impl IntoResponse {
    match id {
        1 => Json(json!({ "recursos": [
            { "id": 10, "nome": "FUNDEB" },
            { "id": 11, "nome": "PNAE" }
        ]}))
        .into_response(),
        2 => Json(json!({})).into_response(),
        3 => (StatusCode::OK, "not json").into_response(),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
    }
}

async fn spawn_server() -> SocketAddr {
    let app = Router::new()
        .route("/documentos/api/buscar-fornecedor/", get(buscar_fornecedor))
        .route(
            "/documentos/api/recursos-por-secretaria/{id}/",
            get(recursos),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });
    addr
}

async fn directory() -> HttpDirectory {
    let addr = spawn_server().await;
    HttpDirectory::new(&format!("http://{addr}"), Duration::from_secs(5))
        .expect("valid base url")
}

#[tokio::test]
async fn finds_existing_supplier() {
    let dir = directory().await;

    let supplier = dir.find_supplier("11222333000181").await.unwrap();

    assert_eq!(supplier.id, 7);
    assert_eq!(supplier.nome, "Papelaria Central");
}

#[tokio::test]
async fn missing_supplier_maps_to_not_found() {
    let dir = directory().await;

    let err = dir.find_supplier("52998224725").await.unwrap_err();

    assert!(matches!(err, LookupError::NotFound), "got {err:?}");
}

#[tokio::test]
async fn lists_department_resources() {
    let dir = directory().await;

    let resources = dir.resources_for_department(1).await.unwrap();

    let names: Vec<_> = resources.iter().map(|r| r.nome.as_str()).collect();
    assert_eq!(names, vec!["FUNDEB", "PNAE"]);
}

#[tokio::test]
async fn missing_resources_key_is_empty_list() {
    let dir = directory().await;

    assert!(dir.resources_for_department(2).await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_json_is_a_decode_error() {
    let dir = directory().await;

    let err = dir.resources_for_department(3).await.unwrap_err();

    assert!(matches!(err, LookupError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn server_error_is_a_network_error() {
    let dir = directory().await;

    let err = dir.resources_for_department(99).await.unwrap_err();

    assert!(matches!(err, LookupError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn registry_builds_http_backend() {
    let addr = spawn_server().await;
    let mut registry = DirectoryRegistry::new();
    doc_lookup::register_backends(&mut registry);

    let config = LookupConfig {
        backend: "http".into(),
        connection: format!("http://{addr}/"),
        timeout_secs: 5,
    };
    let dir = registry.create(&config).await.expect("http backend");

    let supplier = dir.find_supplier("11222333000181").await.unwrap();
    assert_eq!(supplier.id, 7);
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dir = HttpDirectory::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();
    let err = dir.find_supplier("11222333000181").await.unwrap_err();

    assert!(matches!(err, LookupError::Network(_)), "got {err:?}");
}

// Utilitários compartilhados pelos testes de integração (PostgreSQL real via #[sqlx::test]).
#![allow(dead_code)]

use std::path::PathBuf;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tienda_api::{build_app, AppState, Config};
use tower::ServiceExt;

pub fn app(pool: PgPool) -> Router {
    let config = Config {
        database_url: String::new(),
        jwt_secret: "segredo-de-integracao".into(),
        port: 4000,
        backend_url: "http://localhost:4000".into(),
        uploads_dir: PathBuf::from("uploads"),
    };
    build_app(AppState::from_pool(pool, config))
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

/// Registra um usuário e devolve o token.
pub async fn register(app: &Router, username: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/users/register",
        None,
        Some(json!({
            "username": username,
            "nombre": "Admin",
            "apellido": "Tienda",
            "email": format!("{username}@tienda.pe"),
            "password": "secreto123"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["token"].as_str().unwrap().to_string()
}

pub async fn create_product(app: &Router, token: &str, codigo: &str, precio: f64, stock: i32) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/productos",
        Some(token),
        Some(json!({
            "codigo": codigo,
            "nombre": format!("Producto {codigo}"),
            "precio_compra": precio / 2.0,
            "precio_venta": precio,
            "stock_actual": stock,
            "stock_minimo": 1,
            "categoria": "periféricos"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_str().unwrap().to_string()
}

pub async fn stock_of(app: &Router, token: &str, product_id: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::GET,
        &format!("/api/productos/{product_id}"),
        Some(token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["stock_actual"].as_i64().unwrap()
}

pub fn checkout(lines: &[(&str, i32)]) -> Value {
    let productos: Vec<Value> = lines
        .iter()
        .map(|(id, cantidad)| json!({ "producto": id, "cantidad": cantidad }))
        .collect();
    json!({
        "usuario": { "nombre": "Ana Quispe", "email": "ana@correo.pe", "telefono": "999888777" },
        "productos": productos,
        "envio": { "direccion": "Av. El Sol 123", "ciudad": "Cusco", "provincia": "Cusco", "codigoPostal": "08000" },
        "pago": { "metodo": "efectivo" }
    })
}

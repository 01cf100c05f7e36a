mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use sqlx::PgPool;

use common::{app, create_product, register, send, stock_of};

async fn create_supplier(app: &axum::Router, token: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/proveedores",
        Some(token),
        Some(json!({
            "ruc": "20100000001",
            "nombre": "Importadora Lima",
            "email": "compras@importadora.pe",
            "telefono": "012223344",
            "direccion": "Jr. Callao 200"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_str().unwrap().to_string()
}

async fn create_order(app: &axum::Router, token: &str, supplier: &str, product: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/ordenes",
        Some(token),
        Some(json!({
            "proveedor": supplier,
            "productos": [{ "producto": product, "cantidad": 10, "precioUnitario": 12.5 }],
            "observaciones": "Reposición mensual"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer PostgreSQL (DATABASE_URL)"]
async fn order_totals_include_igv_and_do_not_touch_stock(pool: PgPool) {
    let app = app(pool);
    let token = register(&app, "comprador1").await;
    let supplier = create_supplier(&app, &token).await;
    let product = create_product(&app, &token, "PO-1", 20.0, 2).await;

    let order = create_order(&app, &token, &supplier, &product).await;
    assert_eq!(order["estado"], "pendiente");
    assert_eq!(order["subtotal"].as_f64().unwrap(), 125.0);
    assert_eq!(order["igv"].as_f64().unwrap(), 22.5);
    assert_eq!(order["total"].as_f64().unwrap(), 147.5);
    assert_eq!(order["proveedor"]["ruc"], "20100000001");
    assert_eq!(order["productos"][0]["producto"]["codigo"], "PO-1");

    assert_eq!(stock_of(&app, &token, &product).await, 2);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer PostgreSQL (DATABASE_URL)"]
async fn receiving_increments_stock_exactly_once(pool: PgPool) {
    let app = app(pool);
    let token = register(&app, "comprador2").await;
    let supplier = create_supplier(&app, &token).await;
    let product = create_product(&app, &token, "PO-2", 20.0, 2).await;
    let order = create_order(&app, &token, &supplier, &product).await;
    let uri = format!("/api/ordenes/{}", order["id"].as_str().unwrap());

    let (status, _) = send(&app, Method::PUT, &uri, Some(&token), Some(json!({ "estado": "aprobada" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stock_of(&app, &token, &product).await, 2);

    let (status, body) = send(&app, Method::PUT, &uri, Some(&token), Some(json!({ "estado": "recibida" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["estado"], "recibida");
    assert_eq!(stock_of(&app, &token, &product).await, 12);

    let (status, _) = send(&app, Method::PUT, &uri, Some(&token), Some(json!({ "estado": "recibida" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(stock_of(&app, &token, &product).await, 12);

    // Recebida também não pode ser apagada
    let (status, body) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "Solo se pueden eliminar órdenes pendientes");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer PostgreSQL (DATABASE_URL)"]
async fn invalid_status_and_pending_deletion(pool: PgPool) {
    let app = app(pool);
    let token = register(&app, "comprador3").await;
    let supplier = create_supplier(&app, &token).await;
    let product = create_product(&app, &token, "PO-3", 20.0, 0).await;
    let order = create_order(&app, &token, &supplier, &product).await;
    let uri = format!("/api/ordenes/{}", order["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::PUT, &uri, Some(&token), Some(json!({ "estado": "enviada" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "Estado no válido");

    let (status, body) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], "Orden eliminada correctamente");

    let (status, _) = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer PostgreSQL (DATABASE_URL)"]
async fn unknown_supplier_is_not_found(pool: PgPool) {
    let app = app(pool);
    let token = register(&app, "comprador4").await;
    let product = create_product(&app, &token, "PO-4", 20.0, 0).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/ordenes",
        Some(&token),
        Some(json!({
            "proveedor": uuid::Uuid::new_v4(),
            "productos": [{ "producto": product, "cantidad": 1, "precioUnitario": 1 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["msg"], "El proveedor no existe");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer PostgreSQL (DATABASE_URL)"]
async fn amounts_beyond_the_money_column_are_rejected(pool: PgPool) {
    let app = app(pool);
    let token = register(&app, "comprador5").await;
    let supplier = create_supplier(&app, &token).await;
    let product = create_product(&app, &token, "PO-5", 20.0, 5).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/ordenes",
        Some(&token),
        Some(json!({
            "proveedor": supplier,
            "productos": [{ "producto": product, "cantidad": 100, "precioUnitario": 1e27 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    // Cada linha cabe, mas o total com IGV passa de NUMERIC(12, 2)
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/ordenes",
        Some(&token),
        Some(json!({
            "proveedor": supplier,
            "productos": [{ "producto": product, "cantidad": 1, "precioUnitario": 9_000_000_000.0 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["msg"], "El monto total excede el máximo permitido");

    let (_, orders) = send(&app, Method::GET, "/api/ordenes", Some(&token), None).await;
    assert!(orders.as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer PostgreSQL (DATABASE_URL)"]
async fn receipt_that_would_overflow_stock_is_rolled_back(pool: PgPool) {
    let app = app(pool.clone());
    let token = register(&app, "comprador6").await;
    let supplier = create_supplier(&app, &token).await;
    let product = create_product(&app, &token, "PO-6", 20.0, 5).await;
    let order = create_order(&app, &token, &supplier, &product).await;
    let uri = format!("/api/ordenes/{}", order["id"].as_str().unwrap());

    sqlx::query("UPDATE productos SET stock_actual = 2147483640 WHERE codigo = 'PO-6'")
        .execute(&pool)
        .await
        .unwrap();

    let (status, body) = send(&app, Method::PUT, &uri, Some(&token), Some(json!({ "estado": "recibida" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "El stock de Producto PO-6 excedería el máximo permitido");

    assert_eq!(stock_of(&app, &token, &product).await, 2147483640);
    let (_, current) = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(current["estado"], "pendiente");
}

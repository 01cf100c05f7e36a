mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use sqlx::PgPool;

use common::{app, checkout, create_product, register, send, stock_of};

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer PostgreSQL (DATABASE_URL)"]
async fn selling_more_than_available_keeps_stock(pool: PgPool) {
    let app = app(pool);
    let token = register(&app, "vendedor1").await;
    let id = create_product(&app, &token, "TEC-1", 80.0, 3).await;

    let (status, body) = send(&app, Method::POST, "/api/ventas", None, Some(checkout(&[(&id, 5)]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "Stock insuficiente para Producto TEC-1. Disponible: 3");
    assert_eq!(stock_of(&app, &token, &id).await, 3);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer PostgreSQL (DATABASE_URL)"]
async fn selling_decrements_stock_and_numbers_the_order(pool: PgPool) {
    let app = app(pool);
    let token = register(&app, "vendedor2").await;
    let id = create_product(&app, &token, "TEC-2", 25.5, 3).await;

    let (status, body) = send(&app, Method::POST, "/api/ventas", None, Some(checkout(&[(&id, 2)]))).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["estado"], "pendiente");
    assert_eq!(body["total"].as_f64().unwrap(), 51.0);

    let numero = body["numeroOrden"].as_str().unwrap();
    let rest = numero.strip_prefix("ORD-").unwrap();
    let (millis, seq) = rest.split_once('-').unwrap();
    assert!(millis.chars().all(|c| c.is_ascii_digit()) && !millis.is_empty());
    assert!(seq.chars().all(|c| c.is_ascii_digit()) && !seq.is_empty());

    assert_eq!(stock_of(&app, &token, &id).await, 1);

    // O item guarda o snapshot do produto
    let (_, sales) = send(&app, Method::GET, "/api/ventas", Some(&token), None).await;
    let item = &sales[0]["productos"][0];
    assert_eq!(item["nombre"], "Producto TEC-2");
    assert_eq!(item["cantidad"], 2);
    assert_eq!(item["categoria"], "periféricos");
    assert_eq!(sales[0]["envio"]["codigoPostal"], "08000");
    assert_eq!(sales[0]["pago"]["metodo"], "efectivo");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer PostgreSQL (DATABASE_URL)"]
async fn failed_line_rolls_back_previous_lines(pool: PgPool) {
    let app = app(pool);
    let token = register(&app, "vendedor3").await;
    let first = create_product(&app, &token, "A-1", 10.0, 5).await;
    let second = create_product(&app, &token, "B-1", 10.0, 1).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/ventas",
        None,
        Some(checkout(&[(&first, 2), (&second, 4)])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(stock_of(&app, &token, &first).await, 5);
    assert_eq!(stock_of(&app, &token, &second).await, 1);

    let (_, sales) = send(&app, Method::GET, "/api/ventas", Some(&token), None).await;
    assert!(sales.as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer PostgreSQL (DATABASE_URL)"]
async fn unknown_product_is_not_found(pool: PgPool) {
    let app = app(pool);
    let missing = uuid::Uuid::new_v4().to_string();

    let (status, body) = send(&app, Method::POST, "/api/ventas", None, Some(checkout(&[(&missing, 1)]))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["msg"], format!("Producto {missing} no encontrado"));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer PostgreSQL (DATABASE_URL)"]
async fn cancelling_restores_stock_once(pool: PgPool) {
    let app = app(pool);
    let token = register(&app, "vendedor4").await;
    let a = create_product(&app, &token, "C-1", 15.0, 4).await;
    let b = create_product(&app, &token, "C-2", 30.0, 2).await;

    send(&app, Method::POST, "/api/ventas", None, Some(checkout(&[(&a, 3), (&b, 2)]))).await;
    let (_, sales) = send(&app, Method::GET, "/api/ventas", Some(&token), None).await;
    let sale_id = sales[0]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/ventas/{sale_id}/estado"),
        Some(&token),
        Some(json!({ "estado": "completado" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let cancel = format!("/api/ventas/{sale_id}/cancelar");
    let (status, body) = send(&app, Method::PUT, &cancel, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], "Venta cancelada correctamente");
    assert_eq!(stock_of(&app, &token, &a).await, 4);
    assert_eq!(stock_of(&app, &token, &b).await, 2);

    let (status, body) = send(&app, Method::PUT, &cancel, Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "Esta venta ya está cancelada");
    assert_eq!(stock_of(&app, &token, &a).await, 4);

    // Cancelada não volta a outro estado
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/ventas/{sale_id}/estado"),
        Some(&token),
        Some(json!({ "estado": "pendiente" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer PostgreSQL (DATABASE_URL)"]
async fn unknown_status_is_rejected(pool: PgPool) {
    let app = app(pool);
    let token = register(&app, "vendedor5").await;
    let id = create_product(&app, &token, "E-1", 5.0, 2).await;
    send(&app, Method::POST, "/api/ventas", None, Some(checkout(&[(&id, 1)]))).await;
    let (_, sales) = send(&app, Method::GET, "/api/ventas", Some(&token), None).await;
    let sale_id = sales[0]["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/ventas/{sale_id}/estado"),
        Some(&token),
        Some(json!({ "estado": "enviado" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["msg"],
        "Estado no válido. Los estados permitidos son: pendiente, completado, cancelado"
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requer PostgreSQL (DATABASE_URL)"]
async fn stats_and_dashboard_reflect_sales(pool: PgPool) {
    let app = app(pool);
    let token = register(&app, "gerente").await;
    let id = create_product(&app, &token, "S-1", 20.0, 10).await;

    send(&app, Method::POST, "/api/ventas", None, Some(checkout(&[(&id, 2)]))).await;
    send(&app, Method::POST, "/api/ventas", None, Some(checkout(&[(&id, 1)]))).await;

    let (status, stats) = send(&app, Method::GET, "/api/ventas/estadisticas", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["ventasTotales"], 2);
    assert_eq!(stats["ventasMes"], 2);
    assert_eq!(stats["ingresosMes"].as_f64().unwrap(), 60.0);
    assert_eq!(stats["productosMasVendidos"][0]["totalVendidos"], 3);

    let (status, resumen) = send(&app, Method::GET, "/api/dashboard/resumen", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resumen["ventasTotales"].as_f64().unwrap(), 60.0);
    assert_eq!(resumen["productosVendidos"], 3);
    assert_eq!(resumen["ventasHoy"].as_f64().unwrap(), 60.0);
    assert_eq!(resumen["ventasPorCategoria"][0]["categoria"], "periféricos");

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/dashboard/resumen?desde=2025-05-01&hasta=2025-04-01",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

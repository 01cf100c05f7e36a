// src/handlers/purchase_orders.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        extract::{AppJson, AppPath},
    },
    config::AppState,
    handlers::MessageResponse,
    middleware::auth::AuthenticatedUser,
    models::purchase_order::{
        CreatePurchaseOrderPayload, PurchaseOrder, UpdatePurchaseOrderStatusPayload,
    },
};

#[utoipa::path(
    get,
    path = "/api/ordenes",
    tag = "Ordenes de compra",
    responses(
        (status = 200, description = "Ordens, mais recentes primeiro", body = Vec<PurchaseOrder>),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let orders = app_state.purchase_order_service.list().await?;
    Ok(Json(orders))
}

#[utoipa::path(
    post,
    path = "/api/ordenes",
    tag = "Ordenes de compra",
    request_body = CreatePurchaseOrderPayload,
    responses(
        (status = 201, description = "Ordem criada como pendente", body = PurchaseOrder),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Fornecedor ou produto inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    AppJson(payload): AppJson<CreatePurchaseOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let order = app_state.purchase_order_service.create(payload, user.id).await?;

    Ok((StatusCode::CREATED, Json(order)))
}

#[utoipa::path(
    get,
    path = "/api/ordenes/{id}",
    tag = "Ordenes de compra",
    params(("id" = Uuid, Path, description = "ID da ordem")),
    responses(
        (status = 200, description = "Ordem detalhada", body = PurchaseOrder),
        (status = 404, description = "Ordem não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_order(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state.purchase_order_service.get(id).await?;
    Ok(Json(order))
}

#[utoipa::path(
    put,
    path = "/api/ordenes/{id}",
    tag = "Ordenes de compra",
    params(("id" = Uuid, Path, description = "ID da ordem")),
    request_body = UpdatePurchaseOrderStatusPayload,
    responses(
        (status = 200, description = "Estado atualizado (recibida soma ao estoque)", body = PurchaseOrder),
        (status = 400, description = "Estado inválido ou ordem já finalizada"),
        (status = 404, description = "Ordem não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_order_status(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdatePurchaseOrderStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state
        .purchase_order_service
        .update_status(id, &payload.estado)
        .await?;
    Ok(Json(order))
}

#[utoipa::path(
    delete,
    path = "/api/ordenes/{id}",
    tag = "Ordenes de compra",
    params(("id" = Uuid, Path, description = "ID da ordem")),
    responses(
        (status = 200, description = "Ordem removida", body = MessageResponse),
        (status = 400, description = "Ordem não está pendente"),
        (status = 404, description = "Ordem não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_order(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.purchase_order_service.delete(id).await?;
    Ok(Json(MessageResponse::new("Orden eliminada correctamente")))
}

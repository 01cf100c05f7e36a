// src/handlers/sales.rs

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
    models::sale::{CreateSalePayload, Sale, SaleCreated, SalesStats, UpdateSaleStatusPayload},
};

// POST /api/ventas (checkout público da loja)
#[utoipa::path(
    post,
    path = "/api/ventas",
    tag = "Ventas",
    request_body = CreateSalePayload,
    responses(
        (status = 201, description = "Venda registrada e estoque baixado", body = SaleCreated),
        (status = 400, description = "Dados inválidos ou estoque insuficiente"),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn create_sale(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<CreateSalePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let created = app_state.sale_service.create_sale(payload).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/ventas",
    tag = "Ventas",
    responses(
        (status = 200, description = "Vendas com itens, mais recentes primeiro", body = Vec<Sale>),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_sales(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let sales = app_state.sale_service.list_sales().await?;
    Ok(Json(sales))
}

#[utoipa::path(
    get,
    path = "/api/ventas/estadisticas",
    tag = "Ventas",
    responses(
        (status = 200, description = "Totais gerais, do mês e top 5 produtos", body = SalesStats),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn sales_stats(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.sale_service.stats().await?;
    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/api/ventas/{id}",
    tag = "Ventas",
    params(("id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Venda com itens", body = Sale),
        (status = 404, description = "Venda não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_sale(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let sale = app_state.sale_service.get_sale(id).await?;
    Ok(Json(sale))
}

#[utoipa::path(
    put,
    path = "/api/ventas/{id}/estado",
    tag = "Ventas",
    params(("id" = Uuid, Path, description = "ID da venda")),
    request_body = UpdateSaleStatusPayload,
    responses(
        (status = 200, description = "Venda atualizada", body = Sale),
        (status = 400, description = "Estado inválido ou venda cancelada"),
        (status = 404, description = "Venda não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_sale_status(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateSaleStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let sale = app_state
        .sale_service
        .update_status(id, &payload.estado)
        .await?;
    Ok(Json(sale))
}

#[utoipa::path(
    put,
    path = "/api/ventas/{id}/cancelar",
    tag = "Ventas",
    params(("id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Venda cancelada e estoque devolvido", body = MessageResponse),
        (status = 400, description = "Venda já cancelada"),
        (status = 404, description = "Venda não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancel_sale(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.sale_service.cancel_sale(id).await?;
    Ok(Json(MessageResponse::new("Venta cancelada correctamente")))
}

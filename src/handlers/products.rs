// src/handlers/products.rs

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
    models::product::{CreateProductPayload, Product, ProductImagePayload, UpdateProductPayload},
};

// --- VITRINE (público) ---

#[utoipa::path(
    get,
    path = "/api/productos/publico",
    tag = "Productos",
    responses((status = 200, description = "Produtos ativos", body = Vec<Product>))
)]
pub async fn list_public(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let products = app_state.product_service.list_active().await?;
    Ok(Json(products))
}

#[utoipa::path(
    get,
    path = "/api/productos/publico/{id}",
    tag = "Productos",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto ativo", body = Product),
        (status = 404, description = "Produto inexistente ou inativo")
    )
)]
pub async fn get_public(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state.product_service.get_public(id).await?;
    Ok(Json(product))
}

// --- PAINEL ---

#[utoipa::path(
    get,
    path = "/api/productos",
    tag = "Productos",
    responses(
        (status = 200, description = "Produtos ativos, ordenados por nome", body = Vec<Product>),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state.product_service.list_active().await?;
    Ok(Json(products))
}

#[utoipa::path(
    post,
    path = "/api/productos",
    tag = "Productos",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Produto criado", body = Product),
        (status = 400, description = "Dados inválidos ou código repetido")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    AppJson(payload): AppJson<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state.product_service.create(payload, user.id).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    get,
    path = "/api/productos/{id}",
    tag = "Productos",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto (ativo ou não)", body = Product),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state.product_service.get(id).await?;
    Ok(Json(product))
}

#[utoipa::path(
    put,
    path = "/api/productos/{id}",
    tag = "Productos",
    params(("id" = Uuid, Path, description = "ID do produto")),
    request_body = UpdateProductPayload,
    responses(
        (status = 200, description = "Produto atualizado", body = Product),
        (status = 400, description = "Dados inválidos ou código repetido"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state.product_service.update(id, payload).await?;
    Ok(Json(product))
}

#[utoipa::path(
    put,
    path = "/api/productos/{id}/imagen",
    tag = "Productos",
    params(("id" = Uuid, Path, description = "ID do produto")),
    request_body = ProductImagePayload,
    responses(
        (status = 200, description = "Imagem vinculada", body = Product),
        (status = 400, description = "Nenhuma imagem informada"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_product_image(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<ProductImagePayload>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state
        .product_service
        .set_image(id, payload.imagen.as_deref())
        .await?;
    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/api/productos/{id}",
    tag = "Productos",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto desativado", body = MessageResponse),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.product_service.delete(id).await?;
    Ok(Json(MessageResponse::new("Producto eliminado correctamente")))
}

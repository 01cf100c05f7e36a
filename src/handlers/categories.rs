// src/handlers/categories.rs

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
    models::category::{Category, CreateCategoryPayload, PublicCategory, UpdateCategoryPayload},
};

// GET /api/categorias/publico
#[utoipa::path(
    get,
    path = "/api/categorias/publico",
    tag = "Categorias",
    responses(
        (status = 200, description = "Categorias ativas, ordenadas por nome", body = Vec<PublicCategory>)
    )
)]
pub async fn list_public(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let categories = app_state.category_service.list_public().await?;
    Ok(Json(categories))
}

// GET /api/categorias
#[utoipa::path(
    get,
    path = "/api/categorias",
    tag = "Categorias",
    responses(
        (status = 200, description = "Todas as categorias (ativas e inativas)", body = Vec<Category>),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_categories(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let categories = app_state.category_service.list_all().await?;
    Ok(Json(categories))
}

// POST /api/categorias
#[utoipa::path(
    post,
    path = "/api/categorias",
    tag = "Categorias",
    request_body = CreateCategoryPayload,
    responses(
        (status = 201, description = "Categoria criada", body = Category),
        (status = 400, description = "Dados inválidos ou nome já existente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_category(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    AppJson(payload): AppJson<CreateCategoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let category = app_state.category_service.create(payload, user.id).await?;

    Ok((StatusCode::CREATED, Json(category)))
}

// GET /api/categorias/{id}
#[utoipa::path(
    get,
    path = "/api/categorias/{id}",
    tag = "Categorias",
    params(("id" = Uuid, Path, description = "ID da categoria")),
    responses(
        (status = 200, description = "Categoria", body = Category),
        (status = 401, description = "Categoria de outro usuário"),
        (status = 404, description = "Categoria não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_category(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let category = app_state.category_service.get_owned(id, user.id).await?;
    Ok(Json(category))
}

// PUT /api/categorias/{id}
#[utoipa::path(
    put,
    path = "/api/categorias/{id}",
    tag = "Categorias",
    params(("id" = Uuid, Path, description = "ID da categoria")),
    request_body = UpdateCategoryPayload,
    responses(
        (status = 200, description = "Categoria atualizada", body = Category),
        (status = 400, description = "Dados inválidos ou nome já existente"),
        (status = 401, description = "Categoria de outro usuário"),
        (status = 404, description = "Categoria não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_category(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateCategoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let category = app_state.category_service.update(id, user.id, payload).await?;
    Ok(Json(category))
}

// DELETE /api/categorias/{id}
#[utoipa::path(
    delete,
    path = "/api/categorias/{id}",
    tag = "Categorias",
    params(("id" = Uuid, Path, description = "ID da categoria")),
    responses(
        (status = 200, description = "Categoria desativada", body = MessageResponse),
        (status = 401, description = "Categoria de outro usuário"),
        (status = 404, description = "Categoria não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_category(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.category_service.delete(id, user.id).await?;
    Ok(Json(MessageResponse::new("Categoría eliminada correctamente")))
}

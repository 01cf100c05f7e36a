// src/handlers/dashboard.rs

use axum::{extract::State, response::IntoResponse, Json};

use crate::{
    common::{error::AppError, extract::AppQuery},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::dashboard::{DashboardQuery, DashboardSummary},
};

// GET /api/dashboard/resumen
#[utoipa::path(
    get,
    path = "/api/dashboard/resumen",
    tag = "Dashboard",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Indicadores de vendas e estoque no período", body = DashboardSummary),
        (status = 400, description = "Período inválido"),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    AppQuery(query): AppQuery<DashboardQuery>,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.dashboard_service.summary(&query).await?;
    Ok(Json(summary))
}

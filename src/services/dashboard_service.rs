// src/services/dashboard_service.rs

use chrono::{Datelike, NaiveDate, Utc};

use crate::{
    common::error::AppError,
    db::DashboardRepository,
    models::dashboard::{DashboardQuery, DashboardSummary},
};

/// Sem filtros, o período vai de 1º de janeiro do ano corrente até hoje.
pub fn resolve_range(
    query: &DashboardQuery,
    hoy: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), AppError> {
    let desde = match query.desde {
        Some(desde) => desde,
        None => NaiveDate::from_ymd_opt(hoy.year(), 1, 1)
            .ok_or_else(|| anyhow::anyhow!("Data inicial inválida para {hoy}"))?,
    };
    let hasta = query.hasta.unwrap_or(hoy);

    if desde > hasta {
        return Err(AppError::bad_request(
            "La fecha inicial no puede ser posterior a la fecha final",
        ));
    }
    Ok((desde, hasta))
}

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository) -> Self {
        Self { repo }
    }

    pub async fn summary(&self, query: &DashboardQuery) -> Result<DashboardSummary, AppError> {
        let hoy = Utc::now().date_naive();
        let (desde, hasta) = resolve_range(query, hoy)?;

        let (totals, ventas_por_categoria, ventas_por_mes) =
            self.repo.summary(desde, hasta, hoy).await?;

        Ok(DashboardSummary {
            desde,
            hasta,
            ventas_totales: totals.ventas_totales,
            productos_vendidos: totals.productos_vendidos,
            ventas_hoy: totals.ventas_hoy,
            productos_bajo_stock: totals.productos_bajo_stock,
            ventas_por_categoria,
            ventas_por_mes,
        })
    }
}

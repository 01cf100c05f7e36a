// src/models/dashboard.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// Período do resumo (datas inclusivas, `YYYY-MM-DD`).
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DashboardQuery {
    pub desde: Option<NaiveDate>,
    pub hasta: Option<NaiveDate>,
}

// Cards do topo
#[derive(Debug, Default, FromRow)]
pub struct DashboardTotals {
    pub ventas_totales: Decimal,
    pub productos_vendidos: i64,
    pub ventas_hoy: Decimal,
    pub productos_bajo_stock: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct CategorySales {
    #[schema(example = "Periféricos")]
    pub categoria: String,
    pub ventas: Decimal,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct MonthlySales {
    #[schema(example = "2025-03")]
    pub mes: String,
    pub ventas: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub desde: NaiveDate,
    pub hasta: NaiveDate,
    pub ventas_totales: Decimal,
    pub productos_vendidos: i64,
    pub ventas_hoy: Decimal,
    pub productos_bajo_stock: i64,
    pub ventas_por_categoria: Vec<CategorySales>,
    pub ventas_por_mes: Vec<MonthlySales>,
}

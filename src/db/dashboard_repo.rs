// src/db/dashboard_repo.rs

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::dashboard::{CategorySales, DashboardTotals, MonthlySales},
};

// Vendas canceladas não entram em nenhum número do painel.
// O dia de uma venda é a data UTC do `created_at`.

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lê tudo dentro de uma transação para que os números sejam do mesmo instante.
    pub async fn summary(
        &self,
        desde: NaiveDate,
        hasta: NaiveDate,
        hoy: NaiveDate,
    ) -> Result<(DashboardTotals, Vec<CategorySales>, Vec<MonthlySales>), AppError> {
        let mut tx = self.pool.begin().await?;

        let totals = sqlx::query_as::<_, DashboardTotals>(
            r#"
            SELECT
                (SELECT COALESCE(SUM(v.total), 0)
                   FROM ventas v
                  WHERE v.estado <> 'cancelado'
                    AND (v.created_at AT TIME ZONE 'UTC')::date BETWEEN $1 AND $2
                ) AS ventas_totales,
                (SELECT COALESCE(SUM(vi.cantidad), 0)::BIGINT
                   FROM venta_items vi
                   JOIN ventas v ON v.id = vi.venta_id
                  WHERE v.estado <> 'cancelado'
                    AND (v.created_at AT TIME ZONE 'UTC')::date BETWEEN $1 AND $2
                ) AS productos_vendidos,
                (SELECT COALESCE(SUM(v.total), 0)
                   FROM ventas v
                  WHERE v.estado <> 'cancelado'
                    AND (v.created_at AT TIME ZONE 'UTC')::date = $3
                ) AS ventas_hoy,
                (SELECT COUNT(*)
                   FROM productos p
                  WHERE p.estado = TRUE AND p.stock_actual <= p.stock_minimo
                ) AS productos_bajo_stock
            "#,
        )
        .bind(desde)
        .bind(hasta)
        .bind(hoy)
        .fetch_one(&mut *tx)
        .await?;

        let por_categoria = sqlx::query_as::<_, CategorySales>(
            r#"
            SELECT COALESCE(NULLIF(TRIM(vi.categoria), ''), 'Sin categoría') AS categoria,
                   SUM(vi.subtotal) AS ventas
            FROM venta_items vi
            JOIN ventas v ON v.id = vi.venta_id
            WHERE v.estado <> 'cancelado'
              AND (v.created_at AT TIME ZONE 'UTC')::date BETWEEN $1 AND $2
            GROUP BY 1
            ORDER BY ventas DESC, categoria ASC
            "#,
        )
        .bind(desde)
        .bind(hasta)
        .fetch_all(&mut *tx)
        .await?;

        let por_mes = sqlx::query_as::<_, MonthlySales>(
            r#"
            SELECT to_char(v.created_at AT TIME ZONE 'UTC', 'YYYY-MM') AS mes,
                   SUM(v.total) AS ventas
            FROM ventas v
            WHERE v.estado <> 'cancelado'
              AND (v.created_at AT TIME ZONE 'UTC')::date BETWEEN $1 AND $2
            GROUP BY 1
            ORDER BY 1 ASC
            "#,
        )
        .bind(desde)
        .bind(hasta)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((totals, por_categoria, por_mes))
    }
}

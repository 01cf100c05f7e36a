// src/db/sale_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::sale::{PaymentMethod, SaleItem, SaleRow, SaleStatus, TopProductRow},
};

const SALE_COLUMNS: &str = "id, numero_orden, cliente_nombre, cliente_email, cliente_telefono, \
     envio_direccion, envio_ciudad, envio_provincia, envio_codigo_postal, pago_metodo, \
     pago_estado, estado, subtotal, total, created_at, updated_at";

/// Cabeçalho de uma venda nova (cliente e envio copiados do checkout).
#[derive(Debug)]
pub struct NewSale<'a> {
    pub numero_orden: &'a str,
    pub cliente_nombre: &'a str,
    pub cliente_email: &'a str,
    pub cliente_telefono: Option<&'a str>,
    pub envio_direccion: &'a str,
    pub envio_ciudad: &'a str,
    pub envio_provincia: Option<&'a str>,
    pub envio_codigo_postal: Option<&'a str>,
    pub pago_metodo: PaymentMethod,
    pub subtotal: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSaleItem {
    pub producto_id: Uuid,
    pub nombre: String,
    pub precio_venta: Decimal,
    pub cantidad: i32,
    pub subtotal: Decimal,
    pub categoria: String,
}

#[derive(Clone)]
pub struct SaleRepository {
    pool: PgPool,
}

impl SaleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn next_number<'e, E>(&self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let seq: i64 = sqlx::query_scalar("SELECT nextval('ventas_numero_seq')")
            .fetch_one(executor)
            .await?;
        Ok(seq)
    }

    pub async fn insert_sale<'e, E>(&self, executor: E, sale: &NewSale<'_>) -> Result<SaleRow, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, SaleRow>(&format!(
            r#"
            INSERT INTO ventas (
                numero_orden, cliente_nombre, cliente_email, cliente_telefono,
                envio_direccion, envio_ciudad, envio_provincia, envio_codigo_postal,
                pago_metodo, subtotal, total
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {SALE_COLUMNS}
            "#
        ))
        .bind(sale.numero_orden)
        .bind(sale.cliente_nombre)
        .bind(sale.cliente_email)
        .bind(sale.cliente_telefono)
        .bind(sale.envio_direccion)
        .bind(sale.envio_ciudad)
        .bind(sale.envio_provincia)
        .bind(sale.envio_codigo_postal)
        .bind(sale.pago_metodo)
        .bind(sale.subtotal)
        .bind(sale.total)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        venta_id: Uuid,
        item: &NewSaleItem,
        posicion: i32,
    ) -> Result<SaleItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, SaleItem>(
            r#"
            INSERT INTO venta_items (
                venta_id, producto_id, nombre, precio_venta, cantidad, subtotal, categoria, posicion
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING venta_id, producto_id, nombre, precio_venta, cantidad, subtotal, categoria,
                      NULL::TEXT AS imagen
            "#,
        )
        .bind(venta_id)
        .bind(item.producto_id)
        .bind(&item.nombre)
        .bind(item.precio_venta)
        .bind(item.cantidad)
        .bind(item.subtotal)
        .bind(&item.categoria)
        .bind(posicion)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }

    /// Mais recentes primeiro.
    pub async fn list(&self) -> Result<Vec<SaleRow>, AppError> {
        let rows = sqlx::query_as::<_, SaleRow>(&format!(
            "SELECT {SALE_COLUMNS} FROM ventas ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<SaleRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, SaleRow>(&format!(
            "SELECT {SALE_COLUMNS} FROM ventas WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    /// Itens de várias vendas de uma vez, com a imagem atual de cada produto.
    pub async fn items_for<'e, E>(&self, executor: E, venta_ids: &[Uuid]) -> Result<Vec<SaleItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT vi.venta_id, vi.producto_id, vi.nombre, vi.precio_venta, vi.cantidad,
                   vi.subtotal, vi.categoria, p.imagen
            FROM venta_items vi
            LEFT JOIN productos p ON p.id = vi.producto_id
            WHERE vi.venta_id = ANY($1)
            ORDER BY vi.venta_id, vi.posicion
            "#,
        )
        .bind(venta_ids)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    /// Troca o estado se a venta ainda não estiver cancelada (compare-and-set).
    /// `None`: venda inexistente ou já cancelada.
    pub async fn set_status_unless_cancelled<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        estado: SaleStatus,
    ) -> Result<Option<SaleRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, SaleRow>(&format!(
            r#"
            UPDATE ventas SET estado = $2, updated_at = NOW()
            WHERE id = $1 AND estado <> 'cancelado'
            RETURNING {SALE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(estado)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    // --- ESTATÍSTICAS ---

    pub async fn count_all(&self) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ventas")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    /// Quantidade e soma dos totais das vendas em `[inicio, fim)`.
    pub async fn totals_between(
        &self,
        inicio: DateTime<Utc>,
        fim: DateTime<Utc>,
    ) -> Result<(i64, Decimal), AppError> {
        let totals = sqlx::query_as::<_, (i64, Decimal)>(
            r#"
            SELECT COUNT(*), COALESCE(SUM(total), 0)
            FROM ventas
            WHERE created_at >= $1 AND created_at < $2
            "#,
        )
        .bind(inicio)
        .bind(fim)
        .fetch_one(&self.pool)
        .await?;
        Ok(totals)
    }

    pub async fn top_products(&self, limit: i64) -> Result<Vec<TopProductRow>, AppError> {
        let rows = sqlx::query_as::<_, TopProductRow>(
            r#"
            SELECT vi.producto_id, p.nombre, p.imagen,
                   SUM(vi.cantidad)::BIGINT AS total_vendidos,
                   SUM(vi.subtotal) AS ingresos
            FROM venta_items vi
            LEFT JOIN productos p ON p.id = vi.producto_id
            GROUP BY vi.producto_id, p.nombre, p.imagen
            ORDER BY total_vendidos DESC, ingresos DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

// src/db/purchase_order_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::purchase_order::{
        NewPurchaseOrderLine, OrderTotals, PurchaseOrderItemRow, PurchaseOrderRow,
        PurchaseOrderStatus,
    },
};

// Cabeçalho + fornecedor; `o` = ordenes_compra, `pr` = proveedores
const ORDER_SELECT: &str = r#"
    SELECT o.id, o.numero_orden, o.fecha, o.proveedor_id,
           pr.nombre AS proveedor_nombre, pr.ruc AS proveedor_ruc,
           pr.email AS proveedor_email, pr.telefono AS proveedor_telefono,
           pr.direccion AS proveedor_direccion,
           o.subtotal, o.igv, o.total, o.estado, o.observaciones, o.usuario_id,
           o.created_at, o.updated_at
    FROM ordenes_compra o
    JOIN proveedores pr ON pr.id = o.proveedor_id
"#;

#[derive(Clone)]
pub struct PurchaseOrderRepository {
    pool: PgPool,
}

impl PurchaseOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<PurchaseOrderRow>, AppError> {
        let rows = sqlx::query_as::<_, PurchaseOrderRow>(&format!(
            "{ORDER_SELECT} ORDER BY o.created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<PurchaseOrderRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, PurchaseOrderRow>(&format!("{ORDER_SELECT} WHERE o.id = $1"))
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row)
    }

    pub async fn items_for<'e, E>(
        &self,
        executor: E,
        orden_ids: &[Uuid],
    ) -> Result<Vec<PurchaseOrderItemRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, PurchaseOrderItemRow>(
            r#"
            SELECT i.orden_id, i.producto_id,
                   p.nombre AS producto_nombre, p.codigo AS producto_codigo,
                   i.cantidad, i.precio_unitario, i.subtotal
            FROM orden_compra_items i
            JOIN productos p ON p.id = i.producto_id
            WHERE i.orden_id = ANY($1)
            ORDER BY i.orden_id, i.posicion
            "#,
        )
        .bind(orden_ids)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    /// Insere o cabeçalho; o número vem da sequence. Devolve o id.
    pub async fn insert_order<'e, E>(
        &self,
        executor: E,
        proveedor_id: Uuid,
        fecha: Option<NaiveDate>,
        totals: &OrderTotals,
        observaciones: Option<&str>,
        usuario_id: Uuid,
    ) -> Result<Uuid, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO ordenes_compra (
                proveedor_id, fecha, subtotal, igv, total, observaciones, usuario_id
            )
            VALUES ($1, COALESCE($2, CURRENT_DATE), $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(proveedor_id)
        .bind(fecha)
        .bind(totals.subtotal)
        .bind(totals.igv)
        .bind(totals.total)
        .bind(observaciones)
        .bind(usuario_id)
        .fetch_one(executor)
        .await?;
        Ok(id)
    }

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        orden_id: Uuid,
        line: &NewPurchaseOrderLine,
        posicion: i32,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO orden_compra_items (
                orden_id, producto_id, cantidad, precio_unitario, subtotal, posicion
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(orden_id)
        .bind(line.producto)
        .bind(line.cantidad)
        .bind(line.precio_unitario)
        .bind(line.subtotal)
        .bind(posicion)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Compare-and-set: só troca se o estado atual ainda for `from`.
    pub async fn transition_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        from: PurchaseOrderStatus,
        to: PurchaseOrderStatus,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE ordenes_compra SET estado = $3, updated_at = NOW()
            WHERE id = $1 AND estado = $2
            "#,
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Remove a ordem (e os itens, via cascade) somente se estiver pendente.
    pub async fn delete_pending(&self, id: Uuid) -> Result<bool, AppError> {
        let result =
            sqlx::query("DELETE FROM ordenes_compra WHERE id = $1 AND estado = 'pendiente'")
                .bind(id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() == 1)
    }
}

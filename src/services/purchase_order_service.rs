// src/services/purchase_order_service.rs

use std::collections::{BTreeSet, HashMap};

use rust_decimal::{Decimal, RoundingStrategy};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        validation::{line_amount, sum_amounts},
    },
    db::{ProductRepository, PurchaseOrderRepository, SupplierRepository},
    models::purchase_order::{
        CreatePurchaseOrderPayload, NewPurchaseOrderLine, OrderTotals, PurchaseOrder,
        PurchaseOrderItem, PurchaseOrderItemRow, PurchaseOrderLinePayload, PurchaseOrderRow,
        PurchaseOrderStatus,
    },
};

const NOT_FOUND: &str = "Orden no encontrada";

/// IGV peruano: 18%.
pub const IGV_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

pub fn build_lines(
    lines: &[PurchaseOrderLinePayload],
) -> Result<Vec<NewPurchaseOrderLine>, AppError> {
    lines
        .iter()
        .map(|line| {
            Ok(NewPurchaseOrderLine {
                producto: line.producto,
                cantidad: line.cantidad,
                precio_unitario: line.precio_unitario,
                subtotal: line_amount(line.precio_unitario, line.cantidad)?,
            })
        })
        .collect()
}

/// subtotal = Σ linhas; igv = 18% arredondado a centavos; total = subtotal + igv.
pub fn compute_order_totals(lines: &[NewPurchaseOrderLine]) -> Result<OrderTotals, AppError> {
    let subtotal = sum_amounts(lines.iter().map(|line| line.subtotal))?;
    let igv = subtotal
        .checked_mul(IGV_RATE)
        .ok_or_else(|| AppError::bad_request("El monto total excede el máximo permitido"))?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    Ok(OrderTotals {
        subtotal,
        igv,
        total: sum_amounts([subtotal, igv])?,
    })
}

fn assemble(rows: Vec<PurchaseOrderRow>, items: Vec<PurchaseOrderItemRow>) -> Vec<PurchaseOrder> {
    let mut by_order: HashMap<Uuid, Vec<PurchaseOrderItem>> = HashMap::new();
    for item in items {
        by_order.entry(item.orden_id).or_default().push(item.into());
    }
    rows.into_iter()
        .map(|row| {
            let productos = by_order.remove(&row.id).unwrap_or_default();
            PurchaseOrder::from_row(row, productos)
        })
        .collect()
}

#[derive(Clone)]
pub struct PurchaseOrderService {
    order_repo: PurchaseOrderRepository,
    product_repo: ProductRepository,
    supplier_repo: SupplierRepository,
    pool: PgPool,
}

impl PurchaseOrderService {
    pub fn new(
        order_repo: PurchaseOrderRepository,
        product_repo: ProductRepository,
        supplier_repo: SupplierRepository,
        pool: PgPool,
    ) -> Self {
        Self { order_repo, product_repo, supplier_repo, pool }
    }

    pub async fn list(&self) -> Result<Vec<PurchaseOrder>, AppError> {
        let rows = self.order_repo.list().await?;
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let items = self.order_repo.items_for(&self.pool, &ids).await?;
        Ok(assemble(rows, items))
    }

    pub async fn get(&self, id: Uuid) -> Result<PurchaseOrder, AppError> {
        let row = self
            .order_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found(NOT_FOUND))?;
        let items = self.order_repo.items_for(&self.pool, &[id]).await?;
        Ok(PurchaseOrder::from_row(row, items.into_iter().map(Into::into).collect()))
    }

    /// Cria a ordem como `pendiente`. O estoque só muda no recebimento.
    pub async fn create(
        &self,
        payload: CreatePurchaseOrderPayload,
        usuario_id: Uuid,
    ) -> Result<PurchaseOrder, AppError> {
        if self.supplier_repo.find_by_id(payload.proveedor).await?.is_none() {
            return Err(AppError::not_found("El proveedor no existe"));
        }

        let product_ids: Vec<Uuid> = payload
            .productos
            .iter()
            .map(|line| line.producto)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let found = self.product_repo.count_existing(&product_ids).await?;
        if found != product_ids.len() as i64 {
            return Err(AppError::not_found("Producto no encontrado"));
        }

        let lines = build_lines(&payload.productos)?;
        let totals = compute_order_totals(&lines)?;

        let mut tx = self.pool.begin().await?;

        let id = self
            .order_repo
            .insert_order(
                &mut *tx,
                payload.proveedor,
                payload.fecha,
                &totals,
                payload.observaciones.as_deref().map(str::trim),
                usuario_id,
            )
            .await?;

        for (posicion, line) in lines.iter().enumerate() {
            self.order_repo
                .insert_item(&mut *tx, id, line, posicion as i32)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(order_id = %id, total = %totals.total, "📦 Ordem de compra criada");
        self.get(id).await
    }

    /// `recibida` e `cancelada` são finais. Receber soma as quantidades ao estoque
    /// na mesma transação da troca de estado, que é um compare-and-set.
    pub async fn update_status(&self, id: Uuid, estado: &str) -> Result<PurchaseOrder, AppError> {
        let to = PurchaseOrderStatus::parse(estado)
            .ok_or_else(|| AppError::bad_request("Estado no válido"))?;

        let mut tx = self.pool.begin().await?;

        let current = self
            .order_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found(NOT_FOUND))?;

        if let Some(reason) = current.estado.locked_reason() {
            return Err(AppError::bad_request(reason));
        }
        if current.estado == to {
            tx.rollback().await?;
            return self.get(id).await;
        }

        let changed = self
            .order_repo
            .transition_status(&mut *tx, id, current.estado, to)
            .await?;
        if !changed {
            tracing::warn!(order_id = %id, "Estado da ordem mudou durante a atualização");
            return Err(AppError::bad_request(
                "La orden fue modificada por otra operación, intenta de nuevo",
            ));
        }

        if to == PurchaseOrderStatus::Recibida {
            let items = self.order_repo.items_for(&mut *tx, &[id]).await?;
            for item in &items {
                let restocked = self
                    .product_repo
                    .increment_stock(&mut *tx, item.producto_id, item.cantidad)
                    .await?;
                if !restocked {
                    tx.rollback().await?;
                    tracing::warn!(order_id = %id, producto_id = %item.producto_id, "Recebimento excederia o estoque máximo");
                    return Err(AppError::bad_request(format!(
                        "El stock de {} excedería el máximo permitido",
                        item.producto_nombre
                    )));
                }
            }
            tracing::info!(order_id = %id, lineas = items.len(), "Ordem recebida, estoque atualizado");
        }

        tx.commit().await?;

        tracing::info!(order_id = %id, from = ?current.estado, to = ?to, "Estado da ordem atualizado");
        self.get(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if self.order_repo.delete_pending(id).await? {
            tracing::info!(order_id = %id, "Ordem de compra removida");
            return Ok(());
        }

        match self.order_repo.find_by_id(&self.pool, id).await? {
            None => Err(AppError::not_found(NOT_FOUND)),
            Some(_) => Err(AppError::bad_request("Solo se pueden eliminar órdenes pendientes")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(cantidad: i32, precio: Decimal) -> PurchaseOrderLinePayload {
        PurchaseOrderLinePayload {
            producto: Uuid::new_v4(),
            cantidad,
            precio_unitario: precio,
        }
    }

    #[test]
    fn igv_rate_is_eighteen_percent() {
        assert_eq!(IGV_RATE, Decimal::new(18, 2));
    }

    #[test]
    fn totals_apply_igv_over_subtotal() {
        let lines = build_lines(&[
            line(10, Decimal::new(1250, 2)), // 125.00
            line(3, Decimal::new(999, 2)),   // 29.97
        ])
        .unwrap();
        assert_eq!(lines[1].subtotal, Decimal::new(2997, 2));

        let totals = compute_order_totals(&lines).unwrap();
        assert_eq!(totals.subtotal, Decimal::new(15497, 2));
        // 154.97 * 0.18 = 27.8946
        assert_eq!(totals.igv, Decimal::new(2789, 2));
        assert_eq!(totals.total, Decimal::new(18286, 2));
    }

    #[test]
    fn igv_rounds_half_away_from_zero() {
        // 0.25 * 0.18 = 0.045
        let lines = build_lines(&[line(1, Decimal::new(25, 2))]).unwrap();
        let totals = compute_order_totals(&lines).unwrap();
        assert_eq!(totals.igv, Decimal::new(5, 2));
    }

    #[test]
    fn empty_order_has_zero_totals() {
        let totals = compute_order_totals(&[]).unwrap();
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::ZERO);
    }

    #[test]
    fn huge_price_is_a_bad_request() {
        let err = build_lines(&[line(100, Decimal::from_i128_with_scale(10_i128.pow(27), 0))])
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn total_with_igv_must_fit_the_column() {
        // Cada linha cabe, mas a soma com IGV não
        let lines = build_lines(&[
            line(1, Decimal::new(900_000_000_000, 2)),
            line(1, Decimal::new(90_000_000_000, 2)),
        ])
        .unwrap();
        let err = compute_order_totals(&lines).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}

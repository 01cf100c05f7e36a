// src/services/sale_service.rs

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        validation::{line_amount, sum_amounts},
    },
    db::{
        sale_repo::{NewSale, NewSaleItem},
        ProductRepository, SaleRepository,
    },
    models::{
        product::Product,
        sale::{CreateSalePayload, Sale, SaleCreated, SaleItem, SaleRow, SaleStatus, SalesStats},
    },
};

const NOT_FOUND: &str = "Venta no encontrada";
const TOP_PRODUCTS: i64 = 5;

/// `ORD-<millis>-<sequência>`; a sequência do banco garante a unicidade.
pub fn format_sale_number(millis: i64, seq: i64) -> String {
    format!("ORD-{millis}-{seq}")
}

/// Snapshot do produto no momento da venda.
pub fn sale_line(product: &Product, cantidad: i32) -> Result<NewSaleItem, AppError> {
    Ok(NewSaleItem {
        producto_id: product.id,
        nombre: product.nombre.clone(),
        precio_venta: product.precio_venta,
        cantidad,
        subtotal: line_amount(product.precio_venta, cantidad)?,
        categoria: product.categoria.clone(),
    })
}

pub fn sale_total(items: &[NewSaleItem]) -> Result<Decimal, AppError> {
    sum_amounts(items.iter().map(|item| item.subtotal))
}

/// Início do mês de `now` e início do mês seguinte (UTC).
pub fn month_bounds(now: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = NaiveDate::from_ymd_opt(now.year(), now.month(), 1)?;
    let next = if now.month() == 12 {
        NaiveDate::from_ymd_opt(now.year() + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(now.year(), now.month() + 1, 1)?
    };
    Some((
        start.and_hms_opt(0, 0, 0)?.and_utc(),
        next.and_hms_opt(0, 0, 0)?.and_utc(),
    ))
}

fn assemble(rows: Vec<SaleRow>, items: Vec<SaleItem>) -> Vec<Sale> {
    let mut by_sale: HashMap<Uuid, Vec<SaleItem>> = HashMap::new();
    for item in items {
        by_sale.entry(item.venta_id).or_default().push(item);
    }
    rows.into_iter()
        .map(|row| {
            let productos = by_sale.remove(&row.id).unwrap_or_default();
            Sale::from_row(row, productos)
        })
        .collect()
}

#[derive(Clone)]
pub struct SaleService {
    sale_repo: SaleRepository,
    product_repo: ProductRepository,
    pool: PgPool,
}

impl SaleService {
    pub fn new(sale_repo: SaleRepository, product_repo: ProductRepository, pool: PgPool) -> Self {
        Self { sale_repo, product_repo, pool }
    }

    /// Checkout: baixa o estoque de cada linha e grava a venda, tudo ou nada.
    pub async fn create_sale(&self, payload: CreateSalePayload) -> Result<SaleCreated, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut lines = Vec::with_capacity(payload.productos.len());
        for line in &payload.productos {
            let decremented = self
                .product_repo
                .decrement_stock(&mut *tx, line.producto, line.cantidad)
                .await?;

            match decremented {
                Some(product) => lines.push(sale_line(&product, line.cantidad)?),
                None => {
                    // Desfaz as baixas anteriores antes de descobrir o motivo
                    tx.rollback().await?;
                    return Err(self.stock_failure(line.producto).await);
                }
            }
        }

        let total = sale_total(&lines)?;
        let seq = self.sale_repo.next_number(&mut *tx).await?;
        let numero_orden = format_sale_number(Utc::now().timestamp_millis(), seq);

        let new_sale = NewSale {
            numero_orden: &numero_orden,
            cliente_nombre: payload.usuario.nombre.trim(),
            cliente_email: payload.usuario.email.trim(),
            cliente_telefono: payload.usuario.telefono.as_deref(),
            envio_direccion: payload.envio.direccion.trim(),
            envio_ciudad: payload.envio.ciudad.trim(),
            envio_provincia: payload.envio.provincia.as_deref(),
            envio_codigo_postal: payload.envio.codigo_postal.as_deref(),
            pago_metodo: payload.pago.metodo,
            subtotal: total,
            total,
        };
        let row = self.sale_repo.insert_sale(&mut *tx, &new_sale).await?;

        for (posicion, line) in lines.iter().enumerate() {
            self.sale_repo
                .insert_item(&mut *tx, row.id, line, posicion as i32)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(sale_id = %row.id, numero_orden = %row.numero_orden, total = %row.total, "🛒 Venda registrada");

        Ok(SaleCreated {
            numero_orden: row.numero_orden,
            total: row.total,
            estado: row.estado,
            created_at: row.created_at,
        })
    }

    async fn stock_failure(&self, producto_id: Uuid) -> AppError {
        match self.product_repo.find_active_by_id(producto_id).await {
            Ok(Some(product)) => {
                tracing::warn!(%producto_id, disponible = product.stock_actual, "Estoque insuficiente");
                AppError::InsufficientStock {
                    producto: product.nombre,
                    disponible: product.stock_actual,
                }
            }
            Ok(None) => AppError::not_found(format!("Producto {producto_id} no encontrado")),
            Err(e) => e,
        }
    }

    pub async fn list_sales(&self) -> Result<Vec<Sale>, AppError> {
        let rows = self.sale_repo.list().await?;
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let items = self.sale_repo.items_for(&self.pool, &ids).await?;
        Ok(assemble(rows, items))
    }

    pub async fn get_sale(&self, id: Uuid) -> Result<Sale, AppError> {
        let row = self
            .sale_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found(NOT_FOUND))?;
        let items = self.sale_repo.items_for(&self.pool, &[id]).await?;
        Ok(Sale::from_row(row, items))
    }

    pub async fn update_status(&self, id: Uuid, estado: &str) -> Result<Sale, AppError> {
        let estado = SaleStatus::parse(estado).ok_or_else(|| {
            AppError::bad_request(format!(
                "Estado no válido. Los estados permitidos son: {}",
                SaleStatus::ALLOWED
            ))
        })?;

        if estado == SaleStatus::Cancelado {
            self.cancel_sale(id).await?;
            return self.get_sale(id).await;
        }

        match self
            .sale_repo
            .set_status_unless_cancelled(&self.pool, id, estado)
            .await?
        {
            Some(row) => {
                let items = self.sale_repo.items_for(&self.pool, &[id]).await?;
                tracing::info!(sale_id = %id, ?estado, "Estado da venda atualizado");
                Ok(Sale::from_row(row, items))
            }
            None => match self.sale_repo.find_by_id(&self.pool, id).await? {
                None => Err(AppError::not_found(NOT_FOUND)),
                Some(_) => Err(AppError::bad_request(
                    "No se puede cambiar el estado de una venta cancelada",
                )),
            },
        }
    }

    /// Cancela e devolve ao estoque as quantidades de cada linha, numa transação.
    pub async fn cancel_sale(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let cancelled = self
            .sale_repo
            .set_status_unless_cancelled(&mut *tx, id, SaleStatus::Cancelado)
            .await?;

        if cancelled.is_none() {
            let exists = self.sale_repo.find_by_id(&mut *tx, id).await?.is_some();
            tx.rollback().await?;
            return Err(if exists {
                AppError::bad_request("Esta venta ya está cancelada")
            } else {
                AppError::not_found(NOT_FOUND)
            });
        }

        let items = self.sale_repo.items_for(&mut *tx, &[id]).await?;
        for item in &items {
            let restored = self
                .product_repo
                .increment_stock(&mut *tx, item.producto_id, item.cantidad)
                .await?;
            if !restored {
                tx.rollback().await?;
                tracing::warn!(sale_id = %id, producto_id = %item.producto_id, "Devolução excederia o estoque máximo");
                return Err(AppError::bad_request(format!(
                    "El stock de {} excedería el máximo permitido",
                    item.nombre
                )));
            }
        }

        tx.commit().await?;

        tracing::info!(sale_id = %id, lineas = items.len(), "Venda cancelada e estoque restaurado");
        Ok(())
    }

    pub async fn stats(&self) -> Result<SalesStats, AppError> {
        let (inicio, fim) = month_bounds(Utc::now())
            .ok_or_else(|| anyhow::anyhow!("Não foi possível calcular o mês corrente"))?;

        let ventas_totales = self.sale_repo.count_all().await?;
        let (ventas_mes, ingresos_mes) = self.sale_repo.totals_between(inicio, fim).await?;
        let productos_mas_vendidos = self
            .sale_repo
            .top_products(TOP_PRODUCTS)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(SalesStats {
            ventas_totales,
            ventas_mes,
            ingresos_mes,
            productos_mas_vendidos,
        })
    }
}

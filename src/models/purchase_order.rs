// src/models/purchase_order.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::validate_amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "estado_orden_compra", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PurchaseOrderStatus {
    Pendiente,
    Aprobada,
    Recibida,
    Cancelada,
}

impl PurchaseOrderStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pendiente" => Some(Self::Pendiente),
            "aprobada" => Some(Self::Aprobada),
            "recibida" => Some(Self::Recibida),
            "cancelada" => Some(Self::Cancelada),
            _ => None,
        }
    }

    /// Recebida e cancelada não mudam mais; devolve o motivo para o cliente.
    pub fn locked_reason(self) -> Option<&'static str> {
        match self {
            Self::Recibida => Some("La orden ya fue recibida"),
            Self::Cancelada => Some("La orden está cancelada"),
            Self::Pendiente | Self::Aprobada => None,
        }
    }
}

// Cabeçalho da ordem com o fornecedor já resolvido (JOIN)
#[derive(Debug, Clone, FromRow)]
pub struct PurchaseOrderRow {
    pub id: Uuid,
    pub numero_orden: i64,
    pub fecha: NaiveDate,
    pub proveedor_id: Uuid,
    pub proveedor_nombre: String,
    pub proveedor_ruc: String,
    pub proveedor_email: String,
    pub proveedor_telefono: String,
    pub proveedor_direccion: String,
    pub subtotal: Decimal,
    pub igv: Decimal,
    pub total: Decimal,
    pub estado: PurchaseOrderStatus,
    pub observaciones: Option<String>,
    pub usuario_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct PurchaseOrderItemRow {
    pub orden_id: Uuid,
    pub producto_id: Uuid,
    pub producto_nombre: String,
    pub producto_codigo: String,
    pub cantidad: i32,
    pub precio_unitario: Decimal,
    pub subtotal: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SupplierSummary {
    pub id: Uuid,
    pub nombre: String,
    pub ruc: String,
    pub email: String,
    pub telefono: String,
    pub direccion: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductSummary {
    pub id: Uuid,
    pub nombre: String,
    pub codigo: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderItem {
    pub producto: ProductSummary,
    pub cantidad: i32,
    pub precio_unitario: Decimal,
    pub subtotal: Decimal,
}

impl From<PurchaseOrderItemRow> for PurchaseOrderItem {
    fn from(row: PurchaseOrderItemRow) -> Self {
        Self {
            producto: ProductSummary {
                id: row.producto_id,
                nombre: row.producto_nombre,
                codigo: row.producto_codigo,
            },
            cantidad: row.cantidad,
            precio_unitario: row.precio_unitario,
            subtotal: row.subtotal,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    pub id: Uuid,
    #[schema(example = 17)]
    pub numero_orden: i64,
    pub fecha: NaiveDate,
    pub proveedor: SupplierSummary,
    pub productos: Vec<PurchaseOrderItem>,
    pub subtotal: Decimal,
    pub igv: Decimal,
    pub total: Decimal,
    pub estado: PurchaseOrderStatus,
    pub observaciones: Option<String>,
    pub usuario: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PurchaseOrder {
    pub fn from_row(row: PurchaseOrderRow, productos: Vec<PurchaseOrderItem>) -> Self {
        Self {
            id: row.id,
            numero_orden: row.numero_orden,
            fecha: row.fecha,
            proveedor: SupplierSummary {
                id: row.proveedor_id,
                nombre: row.proveedor_nombre,
                ruc: row.proveedor_ruc,
                email: row.proveedor_email,
                telefono: row.proveedor_telefono,
                direccion: row.proveedor_direccion,
            },
            productos,
            subtotal: row.subtotal,
            igv: row.igv,
            total: row.total,
            estado: row.estado,
            observaciones: row.observaciones,
            usuario: row.usuario_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// --- PAYLOADS ---

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderLinePayload {
    pub producto: Uuid,
    #[validate(range(min = 1, max = 1000000, message = "La cantidad debe estar entre 1 y 1000000"))]
    pub cantidad: i32,
    #[validate(custom(function = "validate_amount"))]
    pub precio_unitario: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePurchaseOrderPayload {
    pub proveedor: Uuid,
    // Sem data, vale o dia de hoje
    pub fecha: Option<NaiveDate>,
    #[validate(length(min = 1, message = "La orden debe tener al menos un producto"), nested)]
    pub productos: Vec<PurchaseOrderLinePayload>,
    pub observaciones: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePurchaseOrderStatusPayload {
    #[schema(example = "recibida")]
    pub estado: String,
}

/// Linha já calculada, pronta para inserir.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPurchaseOrderLine {
    pub producto: Uuid,
    pub cantidad: i32,
    pub precio_unitario: Decimal,
    pub subtotal: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub igv: Decimal,
    pub total: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_are_locked() {
        assert_eq!(
            PurchaseOrderStatus::Recibida.locked_reason(),
            Some("La orden ya fue recibida")
        );
        assert_eq!(
            PurchaseOrderStatus::Cancelada.locked_reason(),
            Some("La orden está cancelada")
        );
        assert_eq!(PurchaseOrderStatus::Pendiente.locked_reason(), None);
        assert_eq!(PurchaseOrderStatus::Aprobada.locked_reason(), None);
    }

    #[test]
    fn order_lines_are_validated_inside_the_list() {
        let payload: CreatePurchaseOrderPayload = serde_json::from_str(&format!(
            r#"{{"proveedor":"{id}","productos":[{{"producto":"{id}","cantidad":2147483647,"precioUnitario":1e27}}]}}"#,
            id = Uuid::nil()
        ))
        .unwrap();
        let errors = payload.validate().unwrap_err();
        let details = errors.errors();
        assert!(details.contains_key("productos"));
    }

    #[test]
    fn parse_rejects_unknown_status() {
        assert_eq!(PurchaseOrderStatus::parse("aprobada"), Some(PurchaseOrderStatus::Aprobada));
        assert_eq!(PurchaseOrderStatus::parse("enviada"), None);
    }

    #[test]
    fn line_payload_uses_camel_case_price() {
        let line: PurchaseOrderLinePayload = serde_json::from_str(&format!(
            r#"{{"producto":"{}","cantidad":2,"precioUnitario":10.5}}"#,
            Uuid::nil()
        ))
        .unwrap();
        assert_eq!(line.precio_unitario, Decimal::new(105, 1));
        assert!(line.validate().is_ok());
    }
}

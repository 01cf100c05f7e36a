// src/models/sale.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::validate_not_blank;

// --- ENUMS (mapeados para os tipos do Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "estado_venta", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Pendiente,
    Completado,
    Cancelado,
}

impl SaleStatus {
    pub const ALLOWED: &'static str = "pendiente, completado, cancelado";

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pendiente" => Some(Self::Pendiente),
            "completado" => Some(Self::Completado),
            "cancelado" => Some(Self::Cancelado),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "metodo_pago", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Tarjeta,
    Efectivo,
    Transferencia,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "estado_pago", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pendiente,
    Completado,
    Fallido,
}

// --- LINHAS DO BANCO ---

#[derive(Debug, Clone, FromRow)]
pub struct SaleRow {
    pub id: Uuid,
    pub numero_orden: String,
    pub cliente_nombre: String,
    pub cliente_email: String,
    pub cliente_telefono: Option<String>,
    pub envio_direccion: String,
    pub envio_ciudad: String,
    pub envio_provincia: Option<String>,
    pub envio_codigo_postal: Option<String>,
    pub pago_metodo: PaymentMethod,
    pub pago_estado: PaymentStatus,
    pub estado: SaleStatus,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Item da venda com o snapshot de nome/preço/categoria do momento da compra.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct SaleItem {
    #[serde(skip_serializing)]
    pub venta_id: Uuid,
    #[serde(rename = "producto")]
    pub producto_id: Uuid,
    pub nombre: String,
    pub precio_venta: Decimal,
    pub cantidad: i32,
    pub subtotal: Decimal,
    pub categoria: String,
    // Imagem atual do produto (não faz parte do snapshot)
    pub imagen: Option<String>,
}

// --- RESPOSTA ---

#[derive(Debug, Serialize, ToSchema)]
pub struct Customer {
    pub nombre: String,
    pub email: String,
    pub telefono: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Shipping {
    pub direccion: String,
    pub ciudad: String,
    pub provincia: Option<String>,
    pub codigo_postal: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Payment {
    pub metodo: PaymentMethod,
    pub estado: PaymentStatus,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,
    #[schema(example = "ORD-1718200000000-42")]
    pub numero_orden: String,
    pub usuario: Customer,
    pub productos: Vec<SaleItem>,
    pub envio: Shipping,
    pub pago: Payment,
    pub estado: SaleStatus,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    pub fn from_row(row: SaleRow, productos: Vec<SaleItem>) -> Self {
        Self {
            id: row.id,
            numero_orden: row.numero_orden,
            usuario: Customer {
                nombre: row.cliente_nombre,
                email: row.cliente_email,
                telefono: row.cliente_telefono,
            },
            productos,
            envio: Shipping {
                direccion: row.envio_direccion,
                ciudad: row.envio_ciudad,
                provincia: row.envio_provincia,
                codigo_postal: row.envio_codigo_postal,
            },
            pago: Payment {
                metodo: row.pago_metodo,
                estado: row.pago_estado,
            },
            estado: row.estado,
            subtotal: row.subtotal,
            total: row.total,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Resposta do checkout.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleCreated {
    pub numero_orden: String,
    pub total: Decimal,
    pub estado: SaleStatus,
    pub created_at: DateTime<Utc>,
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CustomerPayload {
    #[validate(custom(function = "validate_not_blank", message = "El nombre del cliente es obligatorio"))]
    pub nombre: String,
    #[validate(email(message = "Por favor, ingresa un email válido"))]
    pub email: String,
    pub telefono: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct SaleLinePayload {
    pub producto: Uuid,
    #[validate(range(min = 1, max = 1000000, message = "La cantidad debe estar entre 1 y 1000000"))]
    pub cantidad: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShippingPayload {
    #[validate(custom(function = "validate_not_blank", message = "La dirección es obligatoria"))]
    pub direccion: String,
    #[validate(custom(function = "validate_not_blank", message = "La ciudad es obligatoria"))]
    pub ciudad: String,
    pub provincia: Option<String>,
    pub codigo_postal: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PaymentPayload {
    #[serde(default)]
    pub metodo: PaymentMethod,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSalePayload {
    #[validate(nested)]
    pub usuario: CustomerPayload,

    #[validate(length(min = 1, message = "La venta debe tener al menos un producto"), nested)]
    pub productos: Vec<SaleLinePayload>,

    #[validate(nested)]
    pub envio: ShippingPayload,

    #[serde(default)]
    pub pago: PaymentPayload,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSaleStatusPayload {
    #[schema(example = "completado")]
    pub estado: String,
}

// --- ESTATÍSTICAS ---

#[derive(Debug, FromRow)]
pub struct TopProductRow {
    pub producto_id: Uuid,
    pub nombre: Option<String>,
    pub imagen: Option<String>,
    pub total_vendidos: i64,
    pub ingresos: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TopProductRef {
    pub id: Uuid,
    pub nombre: Option<String>,
    pub imagen: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub producto: TopProductRef,
    pub total_vendidos: i64,
    pub ingresos: Decimal,
}

impl From<TopProductRow> for TopProduct {
    fn from(row: TopProductRow) -> Self {
        Self {
            producto: TopProductRef {
                id: row.producto_id,
                nombre: row.nombre,
                imagen: row.imagen,
            },
            total_vendidos: row.total_vendidos,
            ingresos: row.ingresos,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesStats {
    pub ventas_totales: i64,
    pub ventas_mes: i64,
    pub ingresos_mes: Decimal,
    pub productos_mas_vendidos: Vec<TopProduct>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_parsing_accepts_only_known_values() {
        assert_eq!(SaleStatus::parse("completado"), Some(SaleStatus::Completado));
        assert_eq!(SaleStatus::parse("cancelado"), Some(SaleStatus::Cancelado));
        assert_eq!(SaleStatus::parse("enviado"), None);
        assert_eq!(SaleStatus::parse("Pendiente"), None);
    }

    #[test]
    fn payment_defaults_to_card() {
        let payload: CreateSalePayload = serde_json::from_value(json!({
            "usuario": { "nombre": "Ana", "email": "ana@correo.pe" },
            "productos": [{ "producto": Uuid::nil(), "cantidad": 1 }],
            "envio": { "direccion": "Av. Sol 1", "ciudad": "Cusco", "codigoPostal": "08000" }
        }))
        .unwrap();

        assert_eq!(payload.pago.metodo, PaymentMethod::Tarjeta);
        assert_eq!(payload.envio.codigo_postal.as_deref(), Some("08000"));
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn empty_cart_and_zero_quantity_are_rejected() {
        let empty: CreateSalePayload = serde_json::from_value(json!({
            "usuario": { "nombre": "Ana", "email": "ana@correo.pe" },
            "productos": [],
            "envio": { "direccion": "Av. Sol 1", "ciudad": "Cusco" }
        }))
        .unwrap();
        assert!(empty.validate().unwrap_err().field_errors().contains_key("productos"));

        let zero: CreateSalePayload = serde_json::from_value(json!({
            "usuario": { "nombre": "Ana", "email": "ana@correo.pe" },
            "productos": [{ "producto": Uuid::nil(), "cantidad": 0 }],
            "envio": { "direccion": "Av. Sol 1", "ciudad": "Cusco" }
        }))
        .unwrap();
        assert!(zero.validate().is_err());
    }

    #[test]
    fn blank_customer_and_shipping_fields_are_rejected() {
        let payload: CreateSalePayload = serde_json::from_value(json!({
            "usuario": { "nombre": "   ", "email": "ana@correo.pe" },
            "productos": [{ "producto": Uuid::nil(), "cantidad": 1 }],
            "envio": { "direccion": " ", "ciudad": "Cusco" }
        }))
        .unwrap();
        let errors = payload.validate().unwrap_err();
        let details = errors.errors();
        assert!(details.contains_key("usuario"));
        assert!(details.contains_key("envio"));
    }

    #[test]
    fn quantity_has_an_upper_bound() {
        let payload: CreateSalePayload = serde_json::from_value(json!({
            "usuario": { "nombre": "Ana", "email": "ana@correo.pe" },
            "productos": [{ "producto": Uuid::nil(), "cantidad": i32::MAX }],
            "envio": { "direccion": "Av. Sol 1", "ciudad": "Cusco" }
        }))
        .unwrap();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn sale_serializes_nested_shape() {
        let now = Utc::now();
        let row = SaleRow {
            id: Uuid::new_v4(),
            numero_orden: "ORD-1-1".into(),
            cliente_nombre: "Ana".into(),
            cliente_email: "ana@correo.pe".into(),
            cliente_telefono: None,
            envio_direccion: "Av. Sol 1".into(),
            envio_ciudad: "Cusco".into(),
            envio_provincia: None,
            envio_codigo_postal: Some("08000".into()),
            pago_metodo: PaymentMethod::Efectivo,
            pago_estado: PaymentStatus::Pendiente,
            estado: SaleStatus::Pendiente,
            subtotal: Decimal::new(1000, 2),
            total: Decimal::new(1000, 2),
            created_at: now,
            updated_at: now,
        };
        let value = serde_json::to_value(Sale::from_row(row, vec![])).unwrap();

        assert_eq!(value["numeroOrden"], "ORD-1-1");
        assert_eq!(value["usuario"]["nombre"], "Ana");
        assert_eq!(value["envio"]["codigoPostal"], "08000");
        assert_eq!(value["pago"]["metodo"], "efectivo");
        assert_eq!(value["estado"], "pendiente");
    }
}

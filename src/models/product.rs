// src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::{validate_amount, validate_not_blank};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Product {
    pub id: Uuid,
    #[schema(example = "MOU-001")]
    pub codigo: String,
    #[schema(example = "Mouse inalámbrico")]
    pub nombre: String,
    pub descripcion: Option<String>,
    #[schema(example = 25.5)]
    pub precio_compra: Decimal,
    #[schema(example = 39.9)]
    pub precio_venta: Decimal,
    #[schema(example = 12)]
    pub stock_actual: i32,
    #[schema(example = 3)]
    pub stock_minimo: i32,
    // Texto livre (não é referência à tabela de categorias)
    #[schema(example = "periféricos")]
    pub categoria: String,
    pub imagen: Option<String>,
    pub estado: bool,
    pub creador: Uuid,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductPayload {
    #[validate(custom(function = "validate_not_blank", message = "El código es obligatorio"))]
    pub codigo: String,

    #[validate(custom(function = "validate_not_blank", message = "El nombre es obligatorio"))]
    pub nombre: String,

    pub descripcion: Option<String>,

    #[validate(custom(function = "validate_amount"))]
    pub precio_compra: Decimal,

    #[validate(custom(function = "validate_amount"))]
    pub precio_venta: Decimal,

    #[serde(default)]
    #[validate(range(min = 0, max = 1000000000, message = "El stock debe estar entre 0 y 1000000000"))]
    pub stock_actual: i32,

    #[serde(default)]
    #[validate(range(min = 0, max = 1000000000, message = "El stock mínimo debe estar entre 0 y 1000000000"))]
    pub stock_minimo: i32,

    #[validate(custom(function = "validate_not_blank", message = "La categoría es obligatoria"))]
    pub categoria: String,

    // Nome do arquivo em /uploads ou URL absoluta
    pub imagen: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProductPayload {
    #[validate(custom(function = "validate_not_blank", message = "El código no puede estar vacío"))]
    pub codigo: Option<String>,
    #[validate(custom(function = "validate_not_blank", message = "El nombre no puede estar vacío"))]
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    #[validate(custom(function = "validate_amount"))]
    pub precio_compra: Option<Decimal>,
    #[validate(custom(function = "validate_amount"))]
    pub precio_venta: Option<Decimal>,
    #[validate(range(min = 0, max = 1000000000, message = "El stock debe estar entre 0 y 1000000000"))]
    pub stock_actual: Option<i32>,
    #[validate(range(min = 0, max = 1000000000, message = "El stock mínimo debe estar entre 0 y 1000000000"))]
    pub stock_minimo: Option<i32>,
    #[validate(custom(function = "validate_not_blank", message = "La categoría no puede estar vacía"))]
    pub categoria: Option<String>,
    pub imagen: Option<String>,
    pub estado: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductImagePayload {
    #[schema(example = "1718200000000-mouse.jpg")]
    pub imagen: Option<String>,
}

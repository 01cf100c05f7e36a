// src/models/supplier.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::validate_not_blank;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: Uuid,
    #[schema(example = "20512345678")]
    pub ruc: String,
    #[schema(example = "Distribuidora Andina SAC")]
    pub nombre: String,
    #[schema(example = "ventas@andina.pe")]
    pub email: String,
    pub telefono: String,
    pub direccion: String,
    pub estado: bool,
    pub creador: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSupplierPayload {
    #[validate(custom(function = "validate_not_blank", message = "El RUC es obligatorio"))]
    pub ruc: String,
    #[validate(custom(function = "validate_not_blank", message = "El nombre es obligatorio"))]
    pub nombre: String,
    #[validate(email(message = "Por favor, ingresa un email válido"))]
    pub email: String,
    #[validate(custom(function = "validate_not_blank", message = "El teléfono es obligatorio"))]
    pub telefono: String,
    #[validate(custom(function = "validate_not_blank", message = "La dirección es obligatoria"))]
    pub direccion: String,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSupplierPayload {
    #[validate(custom(function = "validate_not_blank", message = "El RUC no puede estar vacío"))]
    pub ruc: Option<String>,
    #[validate(custom(function = "validate_not_blank", message = "El nombre no puede estar vacío"))]
    pub nombre: Option<String>,
    #[validate(email(message = "Por favor, ingresa un email válido"))]
    pub email: Option<String>,
    #[validate(custom(function = "validate_not_blank", message = "El teléfono no puede estar vacío"))]
    pub telefono: Option<String>,
    #[validate(custom(function = "validate_not_blank", message = "La dirección no puede estar vacía"))]
    pub direccion: Option<String>,
}

/// RUC e e-mail são gravados sem espaços e em minúsculas.
pub fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_trimmed_and_lowercased() {
        assert_eq!(normalize_key("  Ventas@Andina.PE "), "ventas@andina.pe");
        assert_eq!(normalize_key("20512345678"), "20512345678");
    }

    #[test]
    fn invalid_email_is_rejected() {
        let payload = CreateSupplierPayload {
            ruc: "20512345678".into(),
            nombre: "Andina".into(),
            email: "no-es-email".into(),
            telefono: "999".into(),
            direccion: "Av. Lima 123".into(),
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn whitespace_only_required_fields_are_rejected() {
        let payload = CreateSupplierPayload {
            ruc: "  ".into(),
            nombre: "Andina".into(),
            email: "ventas@andina.pe".into(),
            telefono: " ".into(),
            direccion: "\n".into(),
        };
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("ruc"));
        assert!(fields.contains_key("telefono"));
        assert!(fields.contains_key("direccion"));
        assert!(!fields.contains_key("nombre"));
    }
}

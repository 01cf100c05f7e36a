// src/models/category.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::validation::validate_not_blank;

pub const DEFAULT_COLOR: &str = "#3B82F6";
pub const DEFAULT_ICON: &str = "tag";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    #[schema(example = "Periféricos")]
    pub nombre: String,
    pub descripcion: Option<String>,
    #[schema(example = "#3B82F6")]
    pub color: String,
    #[schema(example = "tag")]
    pub icono: String,
    pub estado: bool,
    pub creador: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Projeção usada pela vitrine pública
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct PublicCategory {
    pub id: Uuid,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub color: String,
    pub icono: String,
}

/// Chave da unicidade do nome: trim + minúsculas (Unicode), independente do locale do banco.
pub fn name_key(nombre: &str) -> String {
    nombre.trim().to_lowercase()
}

/// Aceita `#RGB` ou `#RRGGBB`.
pub fn validate_hex_color(value: &str) -> Result<(), ValidationError> {
    let digits = value.strip_prefix('#').unwrap_or("");
    let valid_len = digits.len() == 3 || digits.len() == 6;
    if valid_len && digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Ok(());
    }
    let mut err = ValidationError::new("hex_color");
    err.message = Some("El color debe tener el formato #RRGGBB".into());
    Err(err)
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryPayload {
    #[validate(custom(function = "validate_not_blank", message = "El nombre es obligatorio"))]
    pub nombre: String,
    pub descripcion: Option<String>,
    #[validate(custom(function = "validate_hex_color"))]
    pub color: Option<String>,
    pub icono: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryPayload {
    #[validate(custom(function = "validate_not_blank", message = "El nombre no puede estar vacío"))]
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    #[validate(custom(function = "validate_hex_color"))]
    pub color: Option<String>,
    pub icono: Option<String>,
    pub estado: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        assert!(validate_hex_color("#3B82F6").is_ok());
        assert!(validate_hex_color("#fff").is_ok());
        assert!(validate_hex_color("3B82F6").is_err());
        assert!(validate_hex_color("#12345").is_err());
        assert!(validate_hex_color("#GGGGGG").is_err());
    }

    #[test]
    fn blank_name_is_rejected() {
        let payload = CreateCategoryPayload {
            nombre: String::new(),
            descripcion: None,
            color: None,
            icono: None,
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("nombre"));
    }

    #[test]
    fn whitespace_name_is_rejected() {
        let payload = CreateCategoryPayload {
            nombre: "   ".into(),
            descripcion: None,
            color: None,
            icono: None,
        };
        assert!(payload.validate().is_err());

        let changes = UpdateCategoryPayload {
            nombre: Some("\t ".into()),
            ..Default::default()
        };
        assert!(changes.validate().is_err());
    }

    #[test]
    fn name_key_folds_accents_and_case() {
        assert_eq!(name_key("  PERIFÉRICOS "), name_key("periféricos"));
        assert_ne!(name_key("Periféricos"), name_key("Perifericos"));
    }
}

use std::collections::HashMap;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Mensagem devolvida ao cliente em qualquer erro 500. O detalhe fica só no log.
pub const INTERNAL_ERROR_MESSAGE: &str = "Error en el servidor";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Uno o más campos no son válidos")]
    ValidationError(#[from] validator::ValidationErrors),

    // Corpo/parâmetros malformados e regras de negócio sem variante própria
    #[error("{0}")]
    BadRequest(String),

    #[error("Ya existe una cuenta con este email")]
    EmailAlreadyExists,

    #[error("El nombre de usuario ya está en uso")]
    UsernameAlreadyExists,

    #[error("Ya existe una categoría con ese nombre")]
    CategoryNameAlreadyExists,

    #[error("Ya existe un producto con ese código")]
    ProductCodeAlreadyExists,

    #[error("Ya existe un proveedor con ese RUC")]
    SupplierRucAlreadyExists,

    #[error("Ya existe un proveedor con ese email")]
    SupplierEmailAlreadyExists,

    #[error("Stock insuficiente para {producto}. Disponible: {disponible}")]
    InsufficientStock { producto: String, disponible: i32 },

    #[error("No existe una cuenta con este email")]
    AccountNotFound,

    #[error("La contraseña es incorrecta")]
    WrongPassword,

    #[error("Token de autenticación inválido o ausente")]
    InvalidToken,

    // O recurso existe mas pertence a outro usuário
    #[error("Acción no válida")]
    NotOwner,

    #[error("Usuario no encontrado")]
    UserNotFound,

    #[error("{0}")]
    NotFound(String),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::BadRequest(_)
            | AppError::EmailAlreadyExists
            | AppError::UsernameAlreadyExists
            | AppError::CategoryNameAlreadyExists
            | AppError::ProductCodeAlreadyExists
            | AppError::SupplierRucAlreadyExists
            | AppError::SupplierEmailAlreadyExists
            | AppError::InsufficientStock { .. } => StatusCode::BAD_REQUEST,

            AppError::AccountNotFound
            | AppError::WrongPassword
            | AppError::InvalidToken
            | AppError::NotOwner => StatusCode::UNAUTHORIZED,

            AppError::UserNotFound | AppError::NotFound(_) => StatusCode::NOT_FOUND,

            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest(message.into())
    }
}

/// Agrupa as mensagens do `validator` por campo.
fn validation_details(errors: &validator::ValidationErrors) -> HashMap<String, Vec<String>> {
    let mut details = HashMap::new();
    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        details.insert(field.to_string(), messages);
    }
    // Erros de structs aninhadas (itens da venda, endereço...) ficam sob o caminho do campo pai
    for (field, kind) in errors.errors() {
        match kind {
            validator::ValidationErrorsKind::Struct(inner) => {
                for (inner_field, messages) in validation_details(inner) {
                    details.insert(format!("{field}.{inner_field}"), messages);
                }
            }
            validator::ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    for (inner_field, messages) in validation_details(inner) {
                        details.insert(format!("{field}[{index}].{inner_field}"), messages);
                    }
                }
            }
            validator::ValidationErrorsKind::Field(_) => {}
        }
    }
    details
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if let AppError::ValidationError(errors) = &self {
            let body = Json(json!({
                "msg": self.to_string(),
                "details": validation_details(errors),
            }));
            return (status, body).into_response();
        }

        if status.is_server_error() {
            // O cliente recebe só a mensagem genérica.
            tracing::error!("Erro Interno do Servidor: {}", self);
            let body = Json(json!({ "msg": INTERNAL_ERROR_MESSAGE }));
            return (status, body).into_response();
        }

        let body = Json(json!({ "msg": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Converte violação de chave única (pelo nome da constraint) no erro de negócio correspondente.
pub fn map_unique_violation(e: sqlx::Error, map: impl Fn(&str) -> Option<AppError>) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            if let Some(mapped) = db_err.constraint().and_then(&map) {
                return mapped;
            }
        }
    }
    e.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use validator::Validate;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 3, message = "Muy corto"))]
        name: String,
    }

    #[tokio::test]
    async fn validation_errors_list_field_messages() {
        let errors = Sample { name: "ab".into() }.validate().unwrap_err();
        let response = AppError::from(errors).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["details"]["name"][0], "Muy corto");
    }

    #[tokio::test]
    async fn server_errors_hide_details() {
        let response = AppError::from(anyhow::anyhow!("conexão caiu")).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["msg"], INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn business_errors_map_to_expected_status() {
        assert_eq!(AppError::CategoryNameAlreadyExists.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotOwner.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::not_found("x").status_code(), StatusCode::NOT_FOUND);

        let stock = AppError::InsufficientStock { producto: "Mouse".into(), disponible: 3 };
        assert_eq!(stock.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(stock.to_string(), "Stock insuficiente para Mouse. Disponible: 3");
    }
}

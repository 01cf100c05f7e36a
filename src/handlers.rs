use serde::Serialize;
use utoipa::ToSchema;

pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod products;
pub mod purchase_orders;
pub mod sales;
pub mod suppliers;

/// Corpo `{ "msg": ... }` das operações sem outro retorno.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Operación realizada correctamente")]
    pub msg: String,
}

impl MessageResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

// src/services/product_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ProductRepository,
    models::product::{CreateProductPayload, Product, UpdateProductPayload},
};

const NOT_FOUND: &str = "Producto no encontrado";
const NO_IMAGE: &str = "No se subió ninguna imagen";

/// Transforma o valor recebido em link público da imagem.
/// URLs absolutas ficam como estão; um nome de arquivo aponta para `/uploads`.
pub fn resolve_image_url(backend_url: &str, value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if value.starts_with("http://") || value.starts_with("https://") {
        return Some(value.to_string());
    }
    let file_name = value.trim_start_matches('/');
    let file_name = file_name.strip_prefix("uploads/").unwrap_or(file_name);
    Some(format!("{backend_url}/uploads/{file_name}"))
}

#[derive(Clone)]
pub struct ProductService {
    repo: ProductRepository,
    backend_url: String,
}

impl ProductService {
    pub fn new(repo: ProductRepository, backend_url: String) -> Self {
        Self { repo, backend_url }
    }

    pub async fn list_active(&self) -> Result<Vec<Product>, AppError> {
        self.repo.list_active().await
    }

    pub async fn get_public(&self, id: Uuid) -> Result<Product, AppError> {
        self.repo
            .find_active_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(NOT_FOUND))
    }

    pub async fn get(&self, id: Uuid) -> Result<Product, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(NOT_FOUND))
    }

    pub async fn create(
        &self,
        payload: CreateProductPayload,
        creador: Uuid,
    ) -> Result<Product, AppError> {
        if self.repo.find_by_codigo(payload.codigo.trim(), None).await?.is_some() {
            return Err(AppError::ProductCodeAlreadyExists);
        }

        let imagen = payload
            .imagen
            .as_deref()
            .and_then(|value| resolve_image_url(&self.backend_url, value));

        let product = self.repo.create(&payload, imagen.as_deref(), creador).await?;
        tracing::info!(product_id = %product.id, codigo = %product.codigo, "Produto criado");
        Ok(product)
    }

    pub async fn update(&self, id: Uuid, changes: UpdateProductPayload) -> Result<Product, AppError> {
        if let Some(codigo) = changes.codigo.as_deref() {
            if self.repo.find_by_codigo(codigo.trim(), Some(id)).await?.is_some() {
                return Err(AppError::ProductCodeAlreadyExists);
            }
        }

        let imagen = changes
            .imagen
            .as_deref()
            .and_then(|value| resolve_image_url(&self.backend_url, value));

        self.repo
            .update(id, &changes, imagen.as_deref())
            .await?
            .ok_or_else(|| AppError::not_found(NOT_FOUND))
    }

    pub async fn set_image(&self, id: Uuid, value: Option<&str>) -> Result<Product, AppError> {
        let url = value
            .and_then(|value| resolve_image_url(&self.backend_url, value))
            .ok_or_else(|| AppError::bad_request(NO_IMAGE))?;

        let product = self
            .repo
            .set_image(id, &url)
            .await?
            .ok_or_else(|| AppError::not_found(NOT_FOUND))?;

        tracing::info!(product_id = %id, imagen = %url, "Imagem do produto atualizada");
        Ok(product)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.soft_delete(id).await? {
            return Err(AppError::not_found(NOT_FOUND));
        }
        tracing::info!(product_id = %id, "Produto desativado");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://localhost:4000";

    #[test]
    fn file_names_point_to_uploads() {
        assert_eq!(
            resolve_image_url(BASE, "1718-mouse.jpg").as_deref(),
            Some("http://localhost:4000/uploads/1718-mouse.jpg")
        );
        assert_eq!(
            resolve_image_url(BASE, "/uploads/1718-mouse.jpg").as_deref(),
            Some("http://localhost:4000/uploads/1718-mouse.jpg")
        );
    }

    #[test]
    fn absolute_urls_are_kept() {
        let url = "https://cdn.tienda.pe/mouse.png";
        assert_eq!(resolve_image_url(BASE, url).as_deref(), Some(url));
    }

    #[test]
    fn blank_value_has_no_image() {
        assert_eq!(resolve_image_url(BASE, "   "), None);
    }
}

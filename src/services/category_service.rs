// src/services/category_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CategoryRepository,
    models::category::{
        Category, CreateCategoryPayload, PublicCategory, UpdateCategoryPayload, DEFAULT_COLOR,
        DEFAULT_ICON,
    },
};

const NOT_FOUND: &str = "Categoría no encontrada";

#[derive(Clone)]
pub struct CategoryService {
    repo: CategoryRepository,
}

impl CategoryService {
    pub fn new(repo: CategoryRepository) -> Self {
        Self { repo }
    }

    pub async fn list_public(&self) -> Result<Vec<PublicCategory>, AppError> {
        self.repo.list_public().await
    }

    pub async fn list_all(&self) -> Result<Vec<Category>, AppError> {
        self.repo.list_all().await
    }

    pub async fn create(
        &self,
        payload: CreateCategoryPayload,
        creador: Uuid,
    ) -> Result<Category, AppError> {
        let nombre = payload.nombre.trim();
        if self.repo.find_by_name_ci(nombre, None).await?.is_some() {
            return Err(AppError::CategoryNameAlreadyExists);
        }

        let category = self
            .repo
            .create(
                nombre,
                payload.descripcion.as_deref(),
                payload.color.as_deref().unwrap_or(DEFAULT_COLOR),
                payload.icono.as_deref().unwrap_or(DEFAULT_ICON),
                creador,
            )
            .await?;

        tracing::info!(category_id = %category.id, "Categoria criada");
        Ok(category)
    }

    /// Busca a categoria e confere se pertence ao usuário.
    pub async fn get_owned(&self, id: Uuid, user_id: Uuid) -> Result<Category, AppError> {
        let category = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(NOT_FOUND))?;

        if category.creador != user_id {
            tracing::warn!(category_id = %id, %user_id, "Acesso a categoria de outro usuário");
            return Err(AppError::NotOwner);
        }
        Ok(category)
    }

    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        mut changes: UpdateCategoryPayload,
    ) -> Result<Category, AppError> {
        self.get_owned(id, user_id).await?;

        if let Some(nombre) = changes.nombre.as_mut() {
            *nombre = nombre.trim().to_string();
            if self.repo.find_by_name_ci(nombre, Some(id)).await?.is_some() {
                return Err(AppError::CategoryNameAlreadyExists);
            }
        }

        self.repo
            .update(id, &changes)
            .await?
            .ok_or_else(|| AppError::not_found(NOT_FOUND))
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        self.get_owned(id, user_id).await?;
        if !self.repo.soft_delete(id).await? {
            return Err(AppError::not_found(NOT_FOUND));
        }
        tracing::info!(category_id = %id, "Categoria desativada");
        Ok(())
    }
}

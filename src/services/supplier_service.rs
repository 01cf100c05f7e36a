// src/services/supplier_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{supplier_repo::SupplierFields, SupplierRepository},
    models::supplier::{normalize_key, CreateSupplierPayload, Supplier, UpdateSupplierPayload},
};

const NOT_FOUND: &str = "Proveedor no encontrado";

#[derive(Clone)]
pub struct SupplierService {
    repo: SupplierRepository,
}

impl SupplierService {
    pub fn new(repo: SupplierRepository) -> Self {
        Self { repo }
    }

    pub async fn list_for(&self, user_id: Uuid) -> Result<Vec<Supplier>, AppError> {
        self.repo.list_active_by_creator(user_id).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Supplier, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(NOT_FOUND))
    }

    pub async fn create(
        &self,
        payload: CreateSupplierPayload,
        creador: Uuid,
    ) -> Result<Supplier, AppError> {
        let ruc = normalize_key(&payload.ruc);
        let email = normalize_key(&payload.email);
        self.ensure_unique(Some(&ruc), Some(&email), None).await?;

        let supplier = self
            .repo
            .create(
                &ruc,
                payload.nombre.trim(),
                &email,
                payload.telefono.trim(),
                payload.direccion.trim(),
                creador,
            )
            .await?;

        tracing::info!(supplier_id = %supplier.id, ruc = %supplier.ruc, "Fornecedor criado");
        Ok(supplier)
    }

    pub async fn update(&self, id: Uuid, changes: UpdateSupplierPayload) -> Result<Supplier, AppError> {
        let ruc = changes.ruc.as_deref().map(normalize_key);
        let email = changes.email.as_deref().map(normalize_key);
        self.ensure_unique(ruc.as_deref(), email.as_deref(), Some(id)).await?;

        let fields = SupplierFields {
            ruc: ruc.as_deref(),
            nombre: changes.nombre.as_deref().map(str::trim),
            email: email.as_deref(),
            telefono: changes.telefono.as_deref().map(str::trim),
            direccion: changes.direccion.as_deref().map(str::trim),
        };

        self.repo
            .update(id, &fields)
            .await?
            .ok_or_else(|| AppError::not_found(NOT_FOUND))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.soft_delete(id).await? {
            return Err(AppError::not_found(NOT_FOUND));
        }
        tracing::info!(supplier_id = %id, "Fornecedor desativado");
        Ok(())
    }

    async fn ensure_unique(
        &self,
        ruc: Option<&str>,
        email: Option<&str>,
        exclude: Option<Uuid>,
    ) -> Result<(), AppError> {
        if let Some(ruc) = ruc {
            if self.repo.find_by_ruc(ruc, exclude).await?.is_some() {
                return Err(AppError::SupplierRucAlreadyExists);
            }
        }
        if let Some(email) = email {
            if self.repo.find_by_email(email, exclude).await?.is_some() {
                return Err(AppError::SupplierEmailAlreadyExists);
            }
        }
        Ok(())
    }
}

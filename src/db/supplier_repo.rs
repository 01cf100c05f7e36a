// src/db/supplier_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    models::supplier::Supplier,
};

const SUPPLIER_COLUMNS: &str =
    "id, ruc, nombre, email, telefono, direccion, estado, creador, created_at, updated_at";

fn map_supplier_error(e: sqlx::Error) -> AppError {
    map_unique_violation(e, |constraint| match constraint {
        "proveedores_ruc_key" => Some(AppError::SupplierRucAlreadyExists),
        "proveedores_email_key" => Some(AppError::SupplierEmailAlreadyExists),
        _ => None,
    })
}

/// Campos já normalizados pelo serviço.
#[derive(Debug, Default)]
pub struct SupplierFields<'a> {
    pub ruc: Option<&'a str>,
    pub nombre: Option<&'a str>,
    pub email: Option<&'a str>,
    pub telefono: Option<&'a str>,
    pub direccion: Option<&'a str>,
}

#[derive(Clone)]
pub struct SupplierRepository {
    pool: PgPool,
}

impl SupplierRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_active_by_creator(&self, creador: Uuid) -> Result<Vec<Supplier>, AppError> {
        let suppliers = sqlx::query_as::<_, Supplier>(&format!(
            r#"
            SELECT {SUPPLIER_COLUMNS} FROM proveedores
            WHERE creador = $1 AND estado = TRUE
            ORDER BY nombre ASC
            "#
        ))
        .bind(creador)
        .fetch_all(&self.pool)
        .await?;
        Ok(suppliers)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Supplier>, AppError> {
        let supplier = sqlx::query_as::<_, Supplier>(&format!(
            "SELECT {SUPPLIER_COLUMNS} FROM proveedores WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(supplier)
    }

    pub async fn find_by_ruc(
        &self,
        ruc: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<Supplier>, AppError> {
        let supplier = sqlx::query_as::<_, Supplier>(&format!(
            r#"
            SELECT {SUPPLIER_COLUMNS} FROM proveedores
            WHERE ruc = $1 AND ($2::uuid IS NULL OR id <> $2)
            "#
        ))
        .bind(ruc)
        .bind(exclude)
        .fetch_optional(&self.pool)
        .await?;
        Ok(supplier)
    }

    pub async fn find_by_email(
        &self,
        email: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<Supplier>, AppError> {
        let supplier = sqlx::query_as::<_, Supplier>(&format!(
            r#"
            SELECT {SUPPLIER_COLUMNS} FROM proveedores
            WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2)
            "#
        ))
        .bind(email)
        .bind(exclude)
        .fetch_optional(&self.pool)
        .await?;
        Ok(supplier)
    }

    pub async fn create(
        &self,
        ruc: &str,
        nombre: &str,
        email: &str,
        telefono: &str,
        direccion: &str,
        creador: Uuid,
    ) -> Result<Supplier, AppError> {
        sqlx::query_as::<_, Supplier>(&format!(
            r#"
            INSERT INTO proveedores (ruc, nombre, email, telefono, direccion, creador)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {SUPPLIER_COLUMNS}
            "#
        ))
        .bind(ruc)
        .bind(nombre)
        .bind(email)
        .bind(telefono)
        .bind(direccion)
        .bind(creador)
        .fetch_one(&self.pool)
        .await
        .map_err(map_supplier_error)
    }

    pub async fn update(
        &self,
        id: Uuid,
        fields: &SupplierFields<'_>,
    ) -> Result<Option<Supplier>, AppError> {
        sqlx::query_as::<_, Supplier>(&format!(
            r#"
            UPDATE proveedores SET
                ruc = COALESCE($2, ruc),
                nombre = COALESCE($3, nombre),
                email = COALESCE($4, email),
                telefono = COALESCE($5, telefono),
                direccion = COALESCE($6, direccion),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SUPPLIER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(fields.ruc)
        .bind(fields.nombre)
        .bind(fields.email)
        .bind(fields.telefono)
        .bind(fields.direccion)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_supplier_error)
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE proveedores SET estado = FALSE, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}

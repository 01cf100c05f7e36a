// src/db/category_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    models::category::{name_key, Category, PublicCategory, UpdateCategoryPayload},
};

const CATEGORY_COLUMNS: &str =
    "id, nombre, descripcion, color, icono, estado, creador, created_at, updated_at";

fn map_category_error(e: sqlx::Error) -> AppError {
    map_unique_violation(e, |constraint| {
        (constraint == "categorias_nombre_key").then_some(AppError::CategoryNameAlreadyExists)
    })
}

#[derive(Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Todas as categorias (ativas e inativas), para o painel.
    pub async fn list_all(&self) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categorias ORDER BY nombre ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    pub async fn list_public(&self) -> Result<Vec<PublicCategory>, AppError> {
        let categories = sqlx::query_as::<_, PublicCategory>(
            r#"
            SELECT id, nombre, descripcion, color, icono
            FROM categorias
            WHERE estado = TRUE
            ORDER BY nombre ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categorias WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    /// Busca pela chave do nome (`name_key`), ignorando `exclude` (a própria categoria num update).
    pub async fn find_by_name_ci(
        &self,
        nombre: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>(&format!(
            r#"
            SELECT {CATEGORY_COLUMNS} FROM categorias
            WHERE nombre_key = $1
              AND ($2::uuid IS NULL OR id <> $2)
            "#
        ))
        .bind(name_key(nombre))
        .bind(exclude)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    pub async fn create(
        &self,
        nombre: &str,
        descripcion: Option<&str>,
        color: &str,
        icono: &str,
        creador: Uuid,
    ) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>(&format!(
            r#"
            INSERT INTO categorias (nombre, nombre_key, descripcion, color, icono, creador)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(nombre)
        .bind(name_key(nombre))
        .bind(descripcion)
        .bind(color)
        .bind(icono)
        .bind(creador)
        .fetch_one(&self.pool)
        .await
        .map_err(map_category_error)
    }

    // Campos ausentes no payload mantêm o valor atual
    pub async fn update(
        &self,
        id: Uuid,
        changes: &UpdateCategoryPayload,
    ) -> Result<Option<Category>, AppError> {
        sqlx::query_as::<_, Category>(&format!(
            r#"
            UPDATE categorias SET
                nombre = COALESCE($2, nombre),
                nombre_key = COALESCE($7, nombre_key),
                descripcion = COALESCE($3, descripcion),
                color = COALESCE($4, color),
                icono = COALESCE($5, icono),
                estado = COALESCE($6, estado),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.nombre.as_deref())
        .bind(changes.descripcion.as_deref())
        .bind(changes.color.as_deref())
        .bind(changes.icono.as_deref())
        .bind(changes.estado)
        .bind(changes.nombre.as_deref().map(name_key))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_category_error)
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE categorias SET estado = FALSE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

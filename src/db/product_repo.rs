// src/db/product_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    models::product::{CreateProductPayload, Product, UpdateProductPayload},
};

const PRODUCT_COLUMNS: &str = "id, codigo, nombre, descripcion, precio_compra, precio_venta, \
     stock_actual, stock_minimo, categoria, imagen, estado, creador, created_at, updated_at";

fn map_product_error(e: sqlx::Error) -> AppError {
    map_unique_violation(e, |constraint| {
        (constraint == "productos_codigo_key").then_some(AppError::ProductCodeAlreadyExists)
    })
}

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_active(&self) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM productos WHERE estado = TRUE ORDER BY nombre ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM productos WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    pub async fn find_active_by_id(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM productos WHERE id = $1 AND estado = TRUE"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    pub async fn find_by_codigo(
        &self,
        codigo: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM productos
            WHERE codigo = $1 AND ($2::uuid IS NULL OR id <> $2)
            "#
        ))
        .bind(codigo)
        .bind(exclude)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    /// Quantos dos ids informados existem (ativos ou não).
    pub async fn count_existing(&self, ids: &[Uuid]) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM productos WHERE id = ANY($1)")
            .bind(ids)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn create(
        &self,
        payload: &CreateProductPayload,
        imagen: Option<&str>,
        creador: Uuid,
    ) -> Result<Product, AppError> {
        sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO productos (
                codigo, nombre, descripcion, precio_compra, precio_venta,
                stock_actual, stock_minimo, categoria, imagen, creador
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(payload.codigo.trim())
        .bind(&payload.nombre)
        .bind(payload.descripcion.as_deref())
        .bind(payload.precio_compra)
        .bind(payload.precio_venta)
        .bind(payload.stock_actual)
        .bind(payload.stock_minimo)
        .bind(&payload.categoria)
        .bind(imagen)
        .bind(creador)
        .fetch_one(&self.pool)
        .await
        .map_err(map_product_error)
    }

    pub async fn update(
        &self,
        id: Uuid,
        changes: &UpdateProductPayload,
        imagen: Option<&str>,
    ) -> Result<Option<Product>, AppError> {
        sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE productos SET
                codigo = COALESCE($2, codigo),
                nombre = COALESCE($3, nombre),
                descripcion = COALESCE($4, descripcion),
                precio_compra = COALESCE($5, precio_compra),
                precio_venta = COALESCE($6, precio_venta),
                stock_actual = COALESCE($7, stock_actual),
                stock_minimo = COALESCE($8, stock_minimo),
                categoria = COALESCE($9, categoria),
                imagen = COALESCE($10, imagen),
                estado = COALESCE($11, estado),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.codigo.as_deref().map(str::trim))
        .bind(changes.nombre.as_deref())
        .bind(changes.descripcion.as_deref())
        .bind(changes.precio_compra)
        .bind(changes.precio_venta)
        .bind(changes.stock_actual)
        .bind(changes.stock_minimo)
        .bind(changes.categoria.as_deref())
        .bind(imagen)
        .bind(changes.estado)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_product_error)
    }

    pub async fn set_image(&self, id: Uuid, imagen: &str) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE productos SET imagen = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(imagen)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE productos SET estado = FALSE, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- ESTOQUE ---

    /// Baixa atômica: só atualiza se o produto estiver ativo e houver saldo.
    /// `None` significa produto inexistente/inativo ou estoque insuficiente.
    pub async fn decrement_stock<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        cantidad: i32,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE productos
            SET stock_actual = stock_actual - $2, updated_at = NOW()
            WHERE id = $1 AND estado = TRUE AND stock_actual >= $2
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(cantidad)
        .fetch_optional(executor)
        .await?;
        Ok(product)
    }

    /// Soma ao estoque. `false` quando o produto não existe ou o resultado
    /// estouraria INTEGER; a condição é checada no próprio UPDATE.
    pub async fn increment_stock<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        cantidad: i32,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE productos
            SET stock_actual = stock_actual + $2, updated_at = NOW()
            WHERE id = $1 AND stock_actual <= 2147483647 - $2
            "#,
        )
        .bind(id)
        .bind(cantidad)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

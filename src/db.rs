// src/db.rs

use sqlx::PgPool;

pub mod user_repo;
pub use user_repo::UserRepository;
pub mod category_repo;
pub use category_repo::CategoryRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod supplier_repo;
pub use supplier_repo::SupplierRepository;
pub mod sale_repo;
pub use sale_repo::SaleRepository;
pub mod purchase_order_repo;
pub use purchase_order_repo::PurchaseOrderRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;

/// Aplica as migrações de `./migrations` (embutidas no binário).
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

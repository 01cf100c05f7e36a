// src/config.rs

use std::{env, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        CategoryRepository, DashboardRepository, ProductRepository, PurchaseOrderRepository,
        SaleRepository, SupplierRepository, UserRepository,
    },
    services::{
        auth::AuthService, category_service::CategoryService, dashboard_service::DashboardService,
        product_service::ProductService, purchase_order_service::PurchaseOrderService,
        sale_service::SaleService, supplier_service::SupplierService,
    },
};

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_UPLOADS_DIR: &str = "uploads";

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub port: u16,
    /// Base usada para montar os links públicos das imagens.
    pub backend_url: String,
    pub uploads_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT inválida: {raw}"))?,
            Err(_) => DEFAULT_PORT,
        };

        let backend_url = env::var("BACKEND_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_string();

        let uploads_dir = env::var("UPLOADS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_UPLOADS_DIR));

        Ok(Self {
            database_url,
            jwt_secret,
            port,
            backend_url,
            uploads_dir,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<Config>,
    pub auth_service: AuthService,
    pub category_service: CategoryService,
    pub product_service: ProductService,
    pub supplier_service: SupplierService,
    pub sale_service: SaleService,
    pub purchase_order_service: PurchaseOrderService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool, config))
    }

    /// Monta o gráfico de dependências sobre um pool já criado.
    pub fn from_pool(db_pool: PgPool, config: Config) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let category_repo = CategoryRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());
        let supplier_repo = SupplierRepository::new(db_pool.clone());
        let sale_repo = SaleRepository::new(db_pool.clone());
        let purchase_order_repo = PurchaseOrderRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo, config.jwt_secret.clone());
        let category_service = CategoryService::new(category_repo);
        let product_service = ProductService::new(product_repo.clone(), config.backend_url.clone());
        let supplier_service = SupplierService::new(supplier_repo.clone());
        let sale_service = SaleService::new(sale_repo, product_repo.clone(), db_pool.clone());
        let purchase_order_service = PurchaseOrderService::new(
            purchase_order_repo,
            product_repo,
            supplier_repo,
            db_pool.clone(),
        );
        let dashboard_service = DashboardService::new(dashboard_repo);

        Self {
            db_pool,
            config: Arc::new(config),
            auth_service,
            category_service,
            product_service,
            supplier_service,
            sale_service,
            purchase_order_service,
            dashboard_service,
        }
    }
}

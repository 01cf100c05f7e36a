// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Users ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::profile,

        // --- Categorias ---
        handlers::categories::list_public,
        handlers::categories::list_categories,
        handlers::categories::create_category,
        handlers::categories::get_category,
        handlers::categories::update_category,
        handlers::categories::delete_category,

        // --- Productos ---
        handlers::products::list_public,
        handlers::products::get_public,
        handlers::products::list_products,
        handlers::products::create_product,
        handlers::products::get_product,
        handlers::products::update_product,
        handlers::products::set_product_image,
        handlers::products::delete_product,

        // --- Proveedores ---
        handlers::suppliers::list_suppliers,
        handlers::suppliers::create_supplier,
        handlers::suppliers::get_supplier,
        handlers::suppliers::update_supplier,
        handlers::suppliers::delete_supplier,

        // --- Ventas ---
        handlers::sales::create_sale,
        handlers::sales::list_sales,
        handlers::sales::sales_stats,
        handlers::sales::get_sale,
        handlers::sales::update_sale_status,
        handlers::sales::cancel_sale,

        // --- Ordenes de compra ---
        handlers::purchase_orders::list_orders,
        handlers::purchase_orders::create_order,
        handlers::purchase_orders::get_order,
        handlers::purchase_orders::update_order_status,
        handlers::purchase_orders::delete_order,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
    ),
    components(
        schemas(
            handlers::MessageResponse,

            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Catálogo ---
            models::category::Category,
            models::category::PublicCategory,
            models::category::CreateCategoryPayload,
            models::category::UpdateCategoryPayload,
            models::product::Product,
            models::product::CreateProductPayload,
            models::product::UpdateProductPayload,
            models::product::ProductImagePayload,
            models::supplier::Supplier,
            models::supplier::CreateSupplierPayload,
            models::supplier::UpdateSupplierPayload,

            // --- Ventas ---
            models::sale::SaleStatus,
            models::sale::PaymentMethod,
            models::sale::PaymentStatus,
            models::sale::Sale,
            models::sale::SaleItem,
            models::sale::Customer,
            models::sale::Shipping,
            models::sale::Payment,
            models::sale::SaleCreated,
            models::sale::CreateSalePayload,
            models::sale::CustomerPayload,
            models::sale::SaleLinePayload,
            models::sale::ShippingPayload,
            models::sale::PaymentPayload,
            models::sale::UpdateSaleStatusPayload,
            models::sale::SalesStats,
            models::sale::TopProduct,
            models::sale::TopProductRef,

            // --- Ordenes de compra ---
            models::purchase_order::PurchaseOrderStatus,
            models::purchase_order::PurchaseOrder,
            models::purchase_order::PurchaseOrderItem,
            models::purchase_order::SupplierSummary,
            models::purchase_order::ProductSummary,
            models::purchase_order::CreatePurchaseOrderPayload,
            models::purchase_order::PurchaseOrderLinePayload,
            models::purchase_order::UpdatePurchaseOrderStatusPayload,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,
            models::dashboard::CategorySales,
            models::dashboard::MonthlySales,
        )
    ),
    tags(
        (name = "Users", description = "Registro, login e perfil"),
        (name = "Categorias", description = "Categorias do catálogo"),
        (name = "Productos", description = "Produtos, vitrine e imagens"),
        (name = "Proveedores", description = "Fornecedores"),
        (name = "Ventas", description = "Checkout, vendas e estatísticas"),
        (name = "Ordenes de compra", description = "Compras a fornecedores e recebimento de estoque"),
        (name = "Dashboard", description = "Indicadores e gráficos gerenciais")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

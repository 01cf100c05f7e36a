pub mod auth;
pub mod category_service;
pub mod dashboard_service;
pub mod product_service;
pub mod purchase_order_service;
pub mod sale_service;
pub mod supplier_service;

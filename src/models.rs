pub mod auth;
pub mod category;
pub mod dashboard;
pub mod product;
pub mod purchase_order;
pub mod sale;
pub mod supplier;
